#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

//! # TaskEase
//!
//! A per-user task list with AI-assisted titles and priorities.
//!
//! The crate is layered leaf-first:
//! - [`storage`]: the live, owner-scoped task store
//! - [`auth`]: email/password accounts and the session stream
//! - [`ai`]: prompt templates, model providers and the prompt service
//! - [`domain`]: task operations, the live task list and the prioritization merge
//! - [`ui`]: terminal output for the `taskease` binary

pub mod ai;
pub mod auth;
pub mod domain;
pub mod entities;
pub mod errors;
pub mod storage;
pub mod ui;

pub use domain::{AIDomain, ConfigDomain, LiveState, LiveTaskList, TasksDomain};
pub use entities::{Identity, Task, TaskPatch};
pub use errors::{TaskEaseError, TaskEaseResult};
