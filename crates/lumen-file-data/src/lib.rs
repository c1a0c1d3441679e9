//! Tracking of files that live outside the serialized-asset pipeline.
//!
//! Some files (video, audio banks, large raw data) are streamed straight
//! from disk and never pass through asset serialization. The host still
//! assigns each of them a permanent id, but nothing keeps a stored path
//! to such a file honest once the file moves.
//!
//! A [`FileRef`] records a display name, the permanent [`FileId`] the
//! host assigned to a file, and the file's path relative to a root
//! directory (the streamed-files folder). After every batch of file
//! moves, [`scan()`] re-resolves each record through a [`PathResolver`]
//! and rewrites stale paths, reporting records whose file can no longer
//! be located instead of silently dropping them.
//!
//! The root directory is never stored on a record; the environment
//! supplies it at each call, so records stay valid when the root itself
//! is relocated.

// crate-specific lint exceptions:
//#![allow()]
#![warn(missing_docs)]

mod file_id;
pub use file_id::*;

mod relative_path;
pub use relative_path::*;

mod file_ref;
pub use file_ref::*;

mod resolver;
pub use resolver::*;

mod scan;
pub use scan::*;
