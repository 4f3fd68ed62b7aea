//! Search page state for the catalog: deep-link bootstrap and the search coordinator.

pub mod data_definitions;
pub mod search_coordinator;

pub use data_definitions::bootstrap::{BootstrapComplete, BootstrapLoader, BootstrapParams};
pub use search_coordinator::{CoordinatorPhase, Message, SearchCoordinator, UpdateResult};
