use crate::domain::{
    ModelKind, Observation, ParameterBlob, PredictionRequest, PredictionResult, TrainingConfig,
    TrainingMetrics, TrainingSample,
};

/// Online model fed one observation at a time.
pub trait RealtimeModel: Send {
    fn ingest(&mut self, obs: &Observation<'_>);
    fn ready(&self) -> bool;
    fn predict(&self, req: &PredictionRequest) -> PredictionResult;
    fn reset(&mut self);
    fn kind(&self) -> ModelKind;
}

/// Resettable source of training samples.
pub trait TrainingDataIterator {
    fn next_sample(&mut self) -> Option<TrainingSample>;
    fn reset(&mut self);
    fn size_hint(&self) -> usize;
}

pub trait ModelTrainer: Send {
    fn fit(&mut self, data: &mut dyn TrainingDataIterator, cfg: &TrainingConfig);
    fn parameters(&self) -> ParameterBlob;
    fn metrics(&self) -> TrainingMetrics;
}

/// In-memory iterator over a fixed sample set.
#[derive(Debug, Clone, Default)]
pub struct VecDataIterator {
    samples: Vec<TrainingSample>,
    pos: usize,
}

impl VecDataIterator {
    pub fn new(samples: Vec<TrainingSample>) -> Self {
        Self { samples, pos: 0 }
    }
}

impl TrainingDataIterator for VecDataIterator {
    fn next_sample(&mut self) -> Option<TrainingSample> {
        let s = self.samples.get(self.pos).cloned()?;
        self.pos += 1;
        Some(s)
    }

    fn reset(&mut self) {
        self.pos = 0;
    }

    fn size_hint(&self) -> usize {
        self.samples.len()
    }
}
