//! Shared, read-only state for the analytics API.

use std::sync::Arc;

use crate::analysis::run_analysis;
use crate::config::AnalysisConfig;
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::AnalysisReport;

struct Snapshot {
    dataset: Dataset,
    report: AnalysisReport,
    config: AnalysisConfig,
}

/// Immutable snapshot shared by every request handler.
///
/// The dataset, the report computed from it and the configuration are
/// fixed at startup. Cloning only bumps a reference count.
#[derive(Clone)]
pub struct AppState {
    snapshot: Arc<Snapshot>,
}

impl AppState {
    /// Wraps an already computed report.
    pub fn new(dataset: Dataset, report: AnalysisReport, config: AnalysisConfig) -> Self {
        Self {
            snapshot: Arc::new(Snapshot {
                dataset,
                report,
                config,
            }),
        }
    }

    /// Runs the analysis once and wraps the result.
    pub fn build(dataset: Dataset, config: AnalysisConfig) -> AnalyticsResult<Self> {
        let report = run_analysis(&dataset, &config)?;
        Ok(Self::new(dataset, report, config))
    }

    /// The canonical records the report was computed from.
    pub fn dataset(&self) -> &Dataset {
        &self.snapshot.dataset
    }

    /// The precomputed report.
    pub fn report(&self) -> &AnalysisReport {
        &self.snapshot.report
    }

    /// The configuration the report was computed with.
    pub fn config(&self) -> &AnalysisConfig {
        &self.snapshot.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::sample_dataset;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_build_runs_analysis() {
        let state = AppState::build(sample_dataset(), AnalysisConfig::default()).unwrap();

        assert_eq!(state.report().record_counts.applications, 6);
        assert_eq!(state.dataset().enrollment.len(), 5);

        let clone = state.clone();
        assert_eq!(clone.report().run_id, state.report().run_id);
    }
}
