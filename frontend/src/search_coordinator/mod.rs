//! The faceted search state machine: bootstrap, dispatch, supersession, publication.

mod coordinator;
pub use coordinator::SearchCoordinator;

pub mod messages;
pub use messages::{CoordinatorPhase, Message, SearchCompletion, UpdateResult};
