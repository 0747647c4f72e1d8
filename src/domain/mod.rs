use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Real = f64;
pub type TimePoint = DateTime<Utc>;
pub type ParameterBlob = Vec<u8>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Price,
    Return,
    Volatility,
    Direction,
    EventIntensity,
    Custom,
}

impl std::str::FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "price" => Ok(Self::Price),
            "return" => Ok(Self::Return),
            "volatility" => Ok(Self::Volatility),
            "direction" => Ok(Self::Direction),
            "event_intensity" | "eventintensity" => Ok(Self::EventIntensity),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown target kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "varx")]
    Varx,
    #[serde(rename = "state_space_mle")]
    StateSpaceMle,
    #[serde(rename = "garch_family")]
    GarchFamily,
    #[serde(rename = "hawkes")]
    Hawkes,
    #[serde(rename = "kernel_nonlinear")]
    KernelNonlinear,
    #[serde(rename = "gradient_boosting")]
    GradientBoosting,
    #[serde(rename = "neural_net")]
    NeuralNet,
    #[serde(rename = "custom")]
    Custom,
}

/// One tick of input. Models copy whatever they keep.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub t: TimePoint,
    pub endogenous: &'a [Real],
    pub exogenous: &'a [Real],
}

impl<'a> Observation<'a> {
    pub fn new(t: TimePoint, endogenous: &'a [Real], exogenous: &'a [Real]) -> Self {
        Self {
            t,
            endogenous,
            exogenous,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub values: Vec<Real>,
    pub kind: TargetKind,
    pub horizon_steps: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub t: TimePoint,
    pub endogenous: Vec<Real>,
    pub exogenous: Vec<Real>,
    pub target: Target,
}

impl TrainingSample {
    pub fn observation(&self) -> Observation<'_> {
        Observation::new(self.t, &self.endogenous, &self.exogenous)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub target_kind: TargetKind,
    pub steps_ahead: i32,
    pub want_uncertainty: bool,
}

impl PredictionRequest {
    pub fn new(target_kind: TargetKind) -> Self {
        Self {
            target_kind,
            steps_ahead: 1,
            want_uncertainty: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<TimePoint>,
    pub target_kind: TargetKind,
    pub steps_ahead: i32,
    pub mean: Vec<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance: Option<Vec<Real>>,
    #[serde(default)]
    pub scalars: BTreeMap<String, Real>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub kind: ModelKind,
    pub dim_endogenous: usize,
    pub dim_exogenous: usize,
    #[serde(default)]
    pub hyperparams: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub def: ModelDefinition,
    #[serde(default)]
    pub options: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub loss: f64,
    pub log_likelihood: f64,
    #[serde(default)]
    pub scalars: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_one_step_with_uncertainty() {
        let req = PredictionRequest::new(TargetKind::Volatility);
        assert_eq!(req.steps_ahead, 1);
        assert!(req.want_uncertainty);
    }

    #[test]
    fn parses_target_kind_case_insensitively() {
        assert_eq!("Return".parse::<TargetKind>().unwrap(), TargetKind::Return);
        assert_eq!(
            "event_intensity".parse::<TargetKind>().unwrap(),
            TargetKind::EventIntensity
        );
        assert!("sideways".parse::<TargetKind>().is_err());
    }

    #[test]
    fn prediction_result_omits_missing_variance() {
        let r = PredictionResult {
            based_on: None,
            target_kind: TargetKind::Price,
            steps_ahead: 2,
            mean: vec![1.5],
            variance: None,
            scalars: BTreeMap::new(),
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["target_kind"], "price");
        assert!(v.get("variance").is_none());
        assert!(v.get("based_on").is_none());
    }
}
