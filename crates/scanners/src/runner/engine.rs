use crate::core::{Detector, Finding};
use crate::model::ContractModel;
use crate::runner::DetectorRegistry;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::debug;

pub struct DetectionEngine<F: Finding> {
    registry: DetectorRegistry<F>,
}

impl<F: Finding> DetectionEngine<F> {
    pub fn new(registry: DetectorRegistry<F>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DetectorRegistry<F> {
        &self.registry
    }

    /// Runs every registered detector, concatenates their output in
    /// registration order and drops later findings whose id was already seen.
    pub fn run(&self, contract: &ContractModel) -> DetectionReport<F> {
        // Indexed parallel collect keeps registration order.
        let per_detector: Vec<Vec<F>> = self
            .registry
            .all()
            .par_iter()
            .map(|detector| {
                let findings = detector.detect(contract);
                debug!(
                    detector = detector.id(),
                    contract = %contract.name,
                    count = findings.len(),
                    "detector finished"
                );
                findings
            })
            .collect();

        let findings: Vec<F> = per_detector.into_iter().flatten().collect();
        let (findings, stats) = deduplicate(findings);

        if stats.removed_count > 0 {
            debug!(
                contract = %contract.name,
                removed = stats.removed_count,
                "dropped duplicate findings"
            );
        }

        DetectionReport {
            findings,
            deduplication_stats: stats,
        }
    }

    pub fn list_detectors(&self) -> Vec<DetectorInfo> {
        self.registry
            .all()
            .iter()
            .map(|d| DetectorInfo {
                id: d.id().to_string(),
                name: d.name().to_string(),
                description: d.description().to_string(),
            })
            .collect()
    }
}

fn deduplicate<F: Finding>(findings: Vec<F>) -> (Vec<F>, DeduplicationStats) {
    let original_count = findings.len();
    let mut seen = HashSet::new();
    let deduped: Vec<F> = findings
        .into_iter()
        .filter(|f| seen.insert(f.id().to_string()))
        .collect();
    let deduped_count = deduped.len();

    (
        deduped,
        DeduplicationStats {
            original_count,
            deduped_count,
            removed_count: original_count - deduped_count,
        },
    )
}

#[derive(Debug, Clone)]
pub struct DetectorInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeduplicationStats {
    pub original_count: usize,
    pub deduped_count: usize,
    pub removed_count: usize,
}

#[derive(Debug)]
pub struct DetectionReport<F> {
    findings: Vec<F>,
    deduplication_stats: DeduplicationStats,
}

impl<F> DetectionReport<F> {
    pub fn findings(&self) -> &[F] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<F> {
        self.findings
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn deduplication_stats(&self) -> DeduplicationStats {
        self.deduplication_stats
    }
}
