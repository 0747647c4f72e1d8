//! Dense, row-major numeric array with a shape and a dtype tag.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{fmt_shape, ArrayError};
use crate::domain::Real;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl DType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    pub const fn is_floating(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultArray {
    shape: Vec<usize>,
    dtype: DType,
    data: Vec<Real>,
}

impl ResultArray {
    pub fn new(shape: Vec<usize>, dtype: DType, data: Vec<Real>) -> Result<Self, ArrayError> {
        let expected = shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| ArrayError::Overflow(shape.clone()))?;
        if expected != data.len() {
            return Err(ArrayError::LengthMismatch {
                shape,
                expected,
                len: data.len(),
            });
        }
        Ok(Self { shape, dtype, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn shape_str(&self) -> String {
        fmt_shape(&self.shape)
    }

    fn write_block(&self, f: &mut fmt::Formatter<'_>, axis: usize, offset: usize) -> fmt::Result {
        f.write_str("[")?;
        let dim = self.shape[axis];
        if axis + 1 == self.shape.len() {
            for i in 0..dim {
                if i > 0 {
                    f.write_str(" ")?;
                }
                self.write_scalar(f, self.data[offset + i])?;
            }
        } else {
            let stride: usize = self.shape[axis + 1..].iter().product();
            for i in 0..dim {
                if i > 0 {
                    f.write_str("\n")?;
                    for _ in 0..=axis {
                        f.write_str(" ")?;
                    }
                }
                self.write_block(f, axis + 1, offset + i * stride)?;
            }
        }
        f.write_str("]")
    }

    fn write_scalar(&self, f: &mut fmt::Formatter<'_>, v: Real) -> fmt::Result {
        match self.dtype {
            DType::Bool => write!(f, "{}", if v != 0.0 { "True" } else { "False" }),
            DType::Int32 | DType::Int64 => write!(f, "{}", v as i64),
            DType::Float32 | DType::Float64 => write!(f, "{v:.8}"),
        }
    }
}

impl fmt::Display for ResultArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shape.is_empty() {
            return match self.data.first() {
                Some(&v) => self.write_scalar(f, v),
                None => f.write_str("[]"),
            };
        }
        if self.data.is_empty() {
            return f.write_str("[]");
        }
        self.write_block(f, 0, 0)
    }
}
