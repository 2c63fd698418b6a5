//! Invariant discovery
//!
//! Eight independent rules, run in a fixed order. Each recognizes a contract
//! shape (token, NFT, vault, owned, pausable...) from the model alone and
//! emits the properties that shape is expected to preserve. Rules that can
//! phrase the property as a Solidity expression attach an assertion
//! template; the rest are claims the test synthesizer stubs out.

pub mod access_control;
pub mod arithmetic;
pub mod consistency;
pub mod nft;
pub mod pausable;
pub mod token;
pub mod unchecked_balance;
pub mod vault;

pub use access_control::AccessControlInvariants;
pub use arithmetic::ArithmeticInvariants;
pub use consistency::ConsistencyInvariants;
pub use nft::NftInvariants;
pub use pausable::PausableInvariants;
pub use token::TokenInvariants;
pub use unchecked_balance::UncheckedBalanceInvariants;
pub use vault::VaultInvariants;

use crate::core::Invariant;
use crate::model::ContractModel;
use crate::runner::{DetectionEngine, DetectorRegistry, DetectorRegistryBuilder};

pub type InvariantEngine = DetectionEngine<Invariant>;

pub fn registry() -> DetectorRegistry<Invariant> {
    DetectorRegistryBuilder::new()
        .with_detector(TokenInvariants::new())
        .with_detector(NftInvariants::new())
        .with_detector(VaultInvariants::new())
        .with_detector(UncheckedBalanceInvariants::new())
        .with_detector(AccessControlInvariants::new())
        .with_detector(PausableInvariants::new())
        .with_detector(ArithmeticInvariants::new())
        .with_detector(ConsistencyInvariants::new())
        .build()
}

pub fn engine() -> InvariantEngine {
    DetectionEngine::new(registry())
}

pub fn discover(contract: &ContractModel) -> Vec<Invariant> {
    engine().run(contract).into_findings()
}
