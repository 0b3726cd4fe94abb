//! Task store abstraction and the local implementation.

mod local;
mod traits;

pub use local::LocalStore;
pub use traits::{BatchUpdate, Snapshot, Subscription, TaskStore};
