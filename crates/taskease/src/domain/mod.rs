//! Domain facades for the task list.
//!
//! These facades combine store and prompt-service calls with the
//! validation and merge rules of the app.

mod ai;
mod config;
mod live;
mod tasks;

pub use ai::{AIDomain, MergeReport, PrioritizationProposal, MIN_TASKS_TO_PRIORITIZE};
pub use config::ConfigDomain;
pub use live::{LiveState, LiveTaskList};
pub use tasks::TasksDomain;
