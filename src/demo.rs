//! Random-tensor demo used to check the numeric stack end to end.

use rand::Rng;

use crate::core::array::{DType, ResultArray};
use crate::core::error::ArrayError;
use crate::domain::Real;

pub const DEMO_SHAPE: [usize; 2] = [2, 3];

/// Row-major matrix, `data.len() == rows * cols`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoMatrix {
    pub data: Vec<Real>,
    pub rows: usize,
    pub cols: usize,
}

impl DemoMatrix {
    /// Anything that is not a consistent 2-D tensor collapses to an empty matrix.
    pub fn from_dense<T: Copy + Into<Real>>(dims: &[usize], values: &[T]) -> Self {
        match dims {
            [rows, cols] if rows.checked_mul(*cols) == Some(values.len()) => Self {
                data: values.iter().map(|&v| v.into()).collect(),
                rows: *rows,
                cols: *cols,
            },
            _ => Self::default(),
        }
    }

    pub fn into_array(self) -> Result<ResultArray, ArrayError> {
        ResultArray::new(vec![self.rows, self.cols], DType::Float64, self.data)
    }
}

/// 2x3 sample from U[0, 1).
pub fn torch_demo() -> DemoMatrix {
    let mut rng = rand::thread_rng();
    let n: usize = DEMO_SHAPE.iter().product();
    let values: Vec<f32> = (0..n).map(|_| rng.gen::<f32>()).collect();
    DemoMatrix::from_dense(&DEMO_SHAPE, &values)
}

/// `torch_demo` as a shaped array, the form the smoke runner consumes.
pub fn torch_demo_array() -> anyhow::Result<ResultArray> {
    Ok(torch_demo().into_array()?)
}
