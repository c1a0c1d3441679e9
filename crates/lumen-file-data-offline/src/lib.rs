//! Editor-side persistence for file reference records.
//!
//! [`Project`] durably stores [`lumen_file_data::FileRef`] records as
//! JSON documents inside a project directory and keeps an index of
//! them. The editor calls [`Project::reconcile_all`] once per batch of
//! reported file moves so every stored path converges on the file's
//! actual location.

// crate-specific lint exceptions:
//#![allow()]
#![warn(missing_docs)]

mod project;
pub use project::*;
