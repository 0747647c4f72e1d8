//! Built-in stub plugin: echoes the last observation and counts training samples.

use std::collections::BTreeMap;

use serde_json::Value as J;

use super::registry::PluginExports;
use crate::core::error::PluginError;
use crate::core::model::{ModelTrainer, RealtimeModel, TrainingDataIterator};
use crate::domain::{
    ModelKind, Observation, ParameterBlob, PredictionRequest, PredictionResult, Real, TimePoint,
    TrainingConfig, TrainingMetrics,
};

pub fn exports() -> PluginExports {
    PluginExports::new()
        .realtime(create_realtime_model)
        .trainer(create_trainer)
}

fn create_realtime_model(cfg: &J) -> Result<Box<dyn RealtimeModel>, PluginError> {
    Ok(Box::new(StubRealtimeModel::from_config(cfg)))
}

fn create_trainer(cfg: &J) -> Result<Box<dyn ModelTrainer>, PluginError> {
    Ok(Box::new(StubTrainer::new(cfg.clone())))
}

#[derive(Debug, Clone)]
pub struct StubRealtimeModel {
    required_count: i64,
    count: i64,
    last_time: Option<TimePoint>,
    last_endogenous: Vec<Real>,
}

impl StubRealtimeModel {
    pub fn from_config(cfg: &J) -> Self {
        let required_count = cfg
            .get("warmup_count")
            .and_then(|v| v.as_i64())
            .unwrap_or(1)
            .max(0);
        Self {
            required_count,
            count: 0,
            last_time: None,
            last_endogenous: Vec::new(),
        }
    }
}

impl RealtimeModel for StubRealtimeModel {
    fn ingest(&mut self, obs: &Observation<'_>) {
        self.last_endogenous = obs.endogenous.to_vec();
        self.last_time = Some(obs.t);
        self.count += 1;
    }

    fn ready(&self) -> bool {
        self.count >= self.required_count
    }

    fn predict(&self, req: &PredictionRequest) -> PredictionResult {
        let mut scalars = BTreeMap::new();
        scalars.insert("count".to_string(), self.count as Real);
        PredictionResult {
            based_on: self.last_time,
            target_kind: req.target_kind,
            steps_ahead: req.steps_ahead,
            mean: self.last_endogenous.clone(),
            variance: Some(vec![0.0; self.last_endogenous.len()]),
            scalars,
        }
    }

    fn reset(&mut self) {
        self.count = 0;
        self.last_endogenous.clear();
    }

    fn kind(&self) -> ModelKind {
        ModelKind::Custom
    }
}

pub struct StubTrainer {
    #[allow(dead_code)]
    cfg: J,
    params: ParameterBlob,
    metrics: TrainingMetrics,
}

impl StubTrainer {
    pub fn new(cfg: J) -> Self {
        Self {
            cfg,
            params: ParameterBlob::new(),
            metrics: TrainingMetrics::default(),
        }
    }
}

impl ModelTrainer for StubTrainer {
    fn fit(&mut self, data: &mut dyn TrainingDataIterator, _cfg: &TrainingConfig) {
        data.reset();
        let mut n = 0usize;
        while data.next_sample().is_some() {
            n += 1;
        }
        tracing::debug!(samples = n, "stub trainer fit");
        self.metrics.scalars.insert("samples_seen".into(), n as f64);
        self.metrics.loss = 0.0;
        self.metrics.log_likelihood = 0.0;
        self.params = vec![0];
    }

    fn parameters(&self) -> ParameterBlob {
        self.params.clone()
    }

    fn metrics(&self) -> TrainingMetrics {
        self.metrics.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::VecDataIterator;
    use crate::domain::{ModelDefinition, Target, TargetKind, TrainingSample};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn echoes_after_warmup() {
        let mut model = StubRealtimeModel::from_config(&json!({"warmup_count": 2}));
        let t = Utc::now();
        model.ingest(&Observation::new(t, &[1.0, 2.0, 3.0], &[]));
        assert!(!model.ready());
        model.ingest(&Observation::new(t, &[4.0, 5.0, 6.0], &[]));
        assert!(model.ready());

        let out = model.predict(&PredictionRequest::new(TargetKind::Return));
        assert_eq!(out.mean, vec![4.0, 5.0, 6.0]);
        assert_eq!(out.variance, Some(vec![0.0; 3]));
        assert_eq!(out.scalars["count"], 2.0);
        assert_eq!(out.based_on, Some(t));
        assert_eq!(out.target_kind, TargetKind::Return);
    }

    #[test]
    fn warmup_defaults_to_one() {
        let mut model = StubRealtimeModel::from_config(&json!({}));
        assert!(!model.ready());
        model.ingest(&Observation::new(Utc::now(), &[1.1], &[]));
        assert!(model.ready());
        assert_eq!(model.kind(), ModelKind::Custom);
    }

    #[test]
    fn negative_warmup_is_ready_immediately() {
        let model = StubRealtimeModel::from_config(&json!({"warmup_count": -3}));
        assert!(model.ready());
        assert_eq!(model.predict(&PredictionRequest::new(TargetKind::Price)).scalars["count"], 0.0);
    }

    #[test]
    fn reset_clears_state() {
        let mut model = StubRealtimeModel::from_config(&json!({"warmup_count": 1}));
        model.ingest(&Observation::new(Utc::now(), &[7.0], &[]));
        model.reset();
        assert!(!model.ready());
        assert!(model.predict(&PredictionRequest::new(TargetKind::Price)).mean.is_empty());
    }

    #[test]
    fn trainer_counts_samples() {
        let samples = (0..3)
            .map(|i| TrainingSample {
                t: Utc::now(),
                endogenous: vec![i as f64],
                exogenous: vec![],
                target: Target {
                    values: vec![],
                    kind: TargetKind::Custom,
                    horizon_steps: 0,
                },
            })
            .collect();
        let mut data = VecDataIterator::new(samples);
        // partially consumed; fit must rewind
        let _ = data.next_sample();

        let cfg = TrainingConfig {
            def: ModelDefinition {
                kind: ModelKind::Custom,
                dim_endogenous: 1,
                dim_exogenous: 0,
                hyperparams: Default::default(),
            },
            options: Default::default(),
        };
        let mut trainer = StubTrainer::new(json!({}));
        trainer.fit(&mut data, &cfg);
        assert_eq!(trainer.metrics().scalars["samples_seen"], 3.0);
        assert_eq!(trainer.metrics().loss, 0.0);
        assert_eq!(trainer.parameters(), vec![0u8]);
    }
}
