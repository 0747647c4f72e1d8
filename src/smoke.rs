//! Smoke test over the demo tensor: call, print, check shape, check dtype.

use std::io::Write;

use crate::core::array::ResultArray;
use crate::core::error::SmokeError;
use crate::demo::DEMO_SHAPE;
use crate::infra::logging::log_metric;

/// Run the check against an arbitrary entry point, writing the report to `out`.
///
/// The first failing check aborts; an error from `entry` is returned as-is
/// before anything is printed.
pub fn run_smoke_with<F, W>(entry: F, out: &mut W) -> Result<ResultArray, SmokeError>
where
    F: FnOnce() -> anyhow::Result<ResultArray>,
    W: Write + ?Sized,
{
    let arr = entry().map_err(|e| {
        tracing::error!(error = %e, "smoke entry point failed");
        SmokeError::ExternalCall(e)
    })?;

    writeln!(out, "torch_demo result shape: {}", arr.shape_str())?;
    writeln!(out, "{arr}")?;

    check_result(&arr)?;
    log_metric("smoke", "checks_passed", 1.0);
    tracing::debug!(shape = %arr.shape_str(), dtype = %arr.dtype(), "smoke checks passed");
    Ok(arr)
}

pub fn check_result(arr: &ResultArray) -> Result<(), SmokeError> {
    if arr.shape() != DEMO_SHAPE {
        return Err(SmokeError::ShapeMismatch {
            expected: DEMO_SHAPE.to_vec(),
            actual: arr.shape().to_vec(),
        });
    }
    // float32 and float64 are both acceptable depending on the build
    if !arr.dtype().to_string().starts_with("float") {
        return Err(SmokeError::DtypeMismatch {
            actual: arr.dtype(),
        });
    }
    Ok(())
}
