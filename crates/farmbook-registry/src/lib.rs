//! Agricultural registry domain rules and orchestration
//!
//! [`RegistryService`] wraps a [`farmbook_db::RegistryStore`] and enforces
//! the registry's rules: CPF normalization and uniqueness, existence checks
//! on foreign references, cascading deletes and the bulk "complete data"
//! registration with rollback.

pub mod cpf;
pub mod error;
pub mod service;
pub mod stats;
pub mod workflow;

pub use cpf::normalize_cpf;
pub use error::{RegistryError, Result};
pub use service::{
    FarmDeletion, FarmWithHarvests, LinkOutcome, ProducerDeletion, ProducerWithFarms,
    RegistryService, RollbackStrategy,
};
pub use stats::{AreaStats, CropStats, FarmStateStats, FarmSummary};
pub use workflow::{CompleteDataOutcome, CompleteDataRequest, FarmDraft, HarvestDraft};
