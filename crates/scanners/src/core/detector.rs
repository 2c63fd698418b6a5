//! Detector trait for pluggable discovery rules.
//!
//! Each rule is an independent, pure function over one immutable
//! `ContractModel`. Rules share no mutable state, so an engine may run them
//! in any order or in parallel; the engine alone decides the output order.
//! New rules are added by registering another detector, never by editing an
//! existing one.

use crate::core::Finding;
use crate::model::ContractModel;

pub trait Detector: Send + Sync {
    type Finding: Finding;

    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        "No description provided"
    }

    /// A rule whose precondition does not hold returns an empty vector.
    fn detect(&self, contract: &ContractModel) -> Vec<Self::Finding>;
}

#[macro_export]
macro_rules! impl_detector {
    (
        $detector:ty,
        finding: $finding:ty,
        id: $id:expr,
        name: $name:expr
        $(, description: $description:expr)?
    ) => {
        impl $crate::core::Detector for $detector {
            type Finding = $finding;

            fn id(&self) -> &'static str {
                $id
            }

            fn name(&self) -> &'static str {
                $name
            }

            $(
                fn description(&self) -> &'static str {
                    $description
                }
            )?

            fn detect(&self, contract: &$crate::model::ContractModel) -> Vec<$finding> {
                self.detect_impl(contract)
            }
        }
    };
}
