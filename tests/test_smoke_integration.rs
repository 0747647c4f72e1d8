use kronos_predict::core::error::SmokeError;
use kronos_predict::smoke::{check_result, run_smoke_with};
use kronos_predict::{torch_demo_array, DType, ResultArray};

fn fixed(shape: &[usize], dtype: DType) -> anyhow::Result<ResultArray> {
    let n = shape.iter().product();
    Ok(ResultArray::new(shape.to_vec(), dtype, vec![0.25; n])?)
}

#[test]
fn demo_passes_smoke_and_prints_report() {
    let mut out = Vec::new();
    let arr = run_smoke_with(torch_demo_array, &mut out).unwrap();
    assert_eq!(arr.shape(), &[2, 3]);

    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("torch_demo result shape: (2, 3)"));
    assert!(lines.next().unwrap().starts_with("[["));
    assert!(lines.next().unwrap().ends_with("]]"));
}

#[test]
fn smoke_scenarios() {
    let mut sink = std::io::sink();
    assert!(run_smoke_with(|| fixed(&[2, 3], DType::Float32), &mut sink).is_ok());
    assert!(run_smoke_with(|| fixed(&[2, 3], DType::Float64), &mut sink).is_ok());

    let err = run_smoke_with(|| fixed(&[3, 2], DType::Float64), &mut sink).unwrap_err();
    assert_eq!(err.to_string(), "Expected shape (2, 3), got (3, 2)");

    let err = run_smoke_with(|| fixed(&[2, 3], DType::Int32), &mut sink).unwrap_err();
    assert!(matches!(err, SmokeError::DtypeMismatch { actual: DType::Int32 }));

    let err = run_smoke_with(|| anyhow::bail!("boom"), &mut sink).unwrap_err();
    assert!(matches!(err, SmokeError::ExternalCall(_)));
}

#[test]
fn check_rejects_flat_vector() {
    let arr = fixed(&[6], DType::Float64).unwrap();
    let err = check_result(&arr).unwrap_err();
    assert_eq!(err.to_string(), "Expected shape (2, 3), got (6,)");
}
