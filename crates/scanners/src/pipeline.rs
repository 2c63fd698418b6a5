//! End-to-end analysis of one source unit.

use crate::config::AnalysisConfig;
use crate::core::{score, GasFinding, Invariant, SecurityScore, Vulnerability};
use crate::error::Result;
use crate::model::{parse_contracts, ContractModel};
use crate::synthesis::{self, GeneratedTests};
use crate::{gas, invariants, vulnerabilities};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct ContractAnalysis {
    pub model: ContractModel,
    pub invariants: Vec<Invariant>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub gas_findings: Vec<GasFinding>,
    pub score: SecurityScore,
}

impl ContractAnalysis {
    pub fn name(&self) -> &str {
        &self.model.name
    }

    pub fn generate_tests(
        &self,
        config: &crate::config::SynthesisConfig,
        source_file: &str,
    ) -> GeneratedTests {
        synthesis::synthesize(
            &self.model,
            &self.invariants,
            &self.vulnerabilities,
            config,
            source_file,
        )
    }
}

/// Runs all three engines and the scorer over one contract.
pub fn analyze_contract(model: ContractModel, config: &AnalysisConfig) -> ContractAnalysis {
    let invariants = invariants::discover(&model);
    let vulnerabilities = vulnerabilities::detect(&model, config);
    let gas_findings = gas::advise(&model);
    let score = score(&vulnerabilities);

    debug!(
        "{}: {} invariants, {} vulnerabilities, {} gas findings, score {}",
        model.name,
        invariants.len(),
        vulnerabilities.len(),
        gas_findings.len(),
        score.score
    );

    ContractAnalysis {
        model,
        invariants,
        vulnerabilities,
        gas_findings,
        score,
    }
}

/// Parses `source` and analyzes every contract, interface and library in
/// declaration order. The parallel path yields the same order.
pub fn analyze_source(source: &str, config: &AnalysisConfig) -> Result<Vec<ContractAnalysis>> {
    let models = parse_contracts(source)?;
    info!("Analyzing {} contract(s)", models.len());

    let analyses = if config.parallel {
        models
            .into_par_iter()
            .map(|model| analyze_contract(model, config))
            .collect()
    } else {
        models
            .into_iter()
            .map(|model| analyze_contract(model, config))
            .collect()
    };

    Ok(analyses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Grade;

    const TWO: &str = r#"
        contract Alpha {
            function mint(address to, uint256 amount) public {}
        }
        contract Beta {
            constructor() {}
        }
    "#;

    #[test]
    fn test_declaration_order_and_scores() {
        let analyses = analyze_source(TWO, &AnalysisConfig::default()).unwrap();
        let names: Vec<&str> = analyses.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);

        assert_eq!(analyses[0].score.score, 75);
        assert_eq!(analyses[1].score.score, 100);
        assert_eq!(analyses[1].score.grade, Grade::APlus);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let parallel = analyze_source(TWO, &AnalysisConfig::default()).unwrap();
        let sequential = analyze_source(
            TWO,
            &AnalysisConfig {
                parallel: false,
                ..AnalysisConfig::default()
            },
        )
        .unwrap();
        assert_eq!(
            serde_json::to_string(&parallel).unwrap(),
            serde_json::to_string(&sequential).unwrap()
        );
    }

    #[test]
    fn test_empty_and_invalid_sources() {
        assert!(analyze_source("", &AnalysisConfig::default()).unwrap().is_empty());
        assert!(analyze_source("contract {", &AnalysisConfig::default()).is_err());
    }
}
