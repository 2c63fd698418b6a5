use crate::core::{GasFinding, GasPattern};
use crate::model::ContractModel;

const MAX_INDEXED: usize = 3;

#[derive(Default)]
pub struct EventIndexingAdvisor;

impl EventIndexingAdvisor {
    pub fn new() -> Self {
        Self
    }

    fn detect_impl(&self, contract: &ContractModel) -> Vec<GasFinding> {
        let mut findings = Vec::new();

        for event in &contract.events {
            let indexed = event.parameters.iter().filter(|p| p.indexed).count();
            if indexed >= MAX_INDEXED {
                continue;
            }

            let candidates: Vec<&str> = event
                .parameters
                .iter()
                .filter(|p| !p.indexed && p.ty.is_indexable_primitive())
                .map(|p| p.name.as_str())
                .take(MAX_INDEXED - indexed)
                .collect();

            if candidates.is_empty() {
                continue;
            }

            let named: Vec<String> = candidates
                .iter()
                .enumerate()
                .map(|(i, n)| if n.is_empty() { format!("#{}", i) } else { format!("`{}`", n) })
                .collect();

            findings.push(GasFinding {
                id: format!("GAS-EVENT-INDEX-{}", event.name),
                title: format!("Index parameters of `{}`", event.name),
                description: format!(
                    "`{}` indexes {} of {} possible parameters; value-type parameters can be \
                     indexed so off-chain consumers filter by topic instead of decoding data.",
                    event.name, indexed, MAX_INDEXED
                ),
                pattern: GasPattern::EventIndexing,
                subject: event.name.clone(),
                line: event.line,
                suggestion: format!("Mark {} as `indexed`.", named.join(", ")),
            });
        }

        findings
    }
}

crate::impl_detector!(
    EventIndexingAdvisor,
    finding: GasFinding,
    id: "event-indexing",
    name: "Event parameter indexing"
);
