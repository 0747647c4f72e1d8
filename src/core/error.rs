use thiserror::Error;

use crate::core::array::DType;

/// Errors raised while resolving plugins or instantiating their models.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error("Failed to load plugin library: {0}")]
    NotFound(String),
    #[error("Plugin does not export any KronosXPredict factories")]
    NoFactories,
    #[error("Realtime factory not available in plugin")]
    RealtimeUnavailable,
    #[error("Trainer factory not available in plugin")]
    TrainerUnavailable,
    #[error("{0}")]
    Factory(String),
}

/// Shape/length violations when building a result array.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArrayError {
    #[error("data length {len} does not match shape {shape:?} ({expected} elements)")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        len: usize,
    },
    #[error("size arithmetic overflow for shape {0:?}")]
    Overflow(Vec<usize>),
}

/// Failures of the smoke test runner.
#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("Expected shape {}, got {}", fmt_shape(.expected), fmt_shape(.actual))]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("Expected floating dtype, got {actual}")]
    DtypeMismatch { actual: DType },
    #[error(transparent)]
    ExternalCall(#[from] anyhow::Error),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Python-tuple rendering, `(2, 3)` or `(4,)`.
pub fn fmt_shape(shape: &[usize]) -> String {
    match shape {
        [single] => format!("({single},)"),
        dims => {
            let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_displays_plugin_messages() {
        let e = PluginError::NotFound("plugins/nope.so".into());
        assert_eq!(e.to_string(), "Failed to load plugin library: plugins/nope.so");
        assert_eq!(
            PluginError::NoFactories.to_string(),
            "Plugin does not export any KronosXPredict factories"
        );
    }

    #[test]
    fn shape_mismatch_reports_expected_and_actual() {
        let e = SmokeError::ShapeMismatch {
            expected: vec![2, 3],
            actual: vec![3, 2],
        };
        assert_eq!(e.to_string(), "Expected shape (2, 3), got (3, 2)");
    }

    #[test]
    fn it_converts_from_anyhow_unchanged() {
        let any: anyhow::Error = anyhow::anyhow!("backend exploded");
        let e: SmokeError = any.into();
        assert_eq!(e.to_string(), "backend exploded");
    }

    #[test]
    fn formats_single_and_empty_shapes() {
        assert_eq!(fmt_shape(&[4]), "(4,)");
        assert_eq!(fmt_shape(&[]), "()");
    }
}
