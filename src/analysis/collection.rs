use crate::analysis::sweep::EmitterSweep;
use crate::report::{SampleRecord, SweepRecord};

/// Every emitter sweep of one test run.
#[derive(Debug, Clone, Default)]
pub struct SweepCollection {
    /// Run folder name, e.g. `Hexel1002570-20220208-102829`.
    pub run_label: String,
    sweeps: Vec<EmitterSweep>,
}

impl SweepCollection {
    pub fn new(run_label: impl Into<String>) -> Self {
        Self {
            run_label: run_label.into(),
            sweeps: Vec::new(),
        }
    }

    pub fn push(&mut self, sweep: EmitterSweep) {
        self.sweeps.push(sweep);
    }

    pub fn sweeps(&self) -> &[EmitterSweep] {
        &self.sweeps
    }

    pub fn find(&self, label: &str) -> Option<&EmitterSweep> {
        self.sweeps.iter().find(|s| s.label() == label)
    }

    pub fn len(&self) -> usize {
        self.sweeps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sweeps.is_empty()
    }

    /// One row per sample across all sweeps.
    pub fn sample_records(&self) -> Vec<SampleRecord> {
        self.sweeps.iter().flat_map(SampleRecord::from_sweep).collect()
    }

    /// One row of derived metrics per sweep.
    pub fn sweep_records(&self) -> Vec<SweepRecord> {
        self.sweeps.iter().map(SweepRecord::from_sweep).collect()
    }
}
