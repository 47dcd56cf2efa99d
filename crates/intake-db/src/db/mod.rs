//! Database repositories for the data access layer.
//!
//! One repository per persisted entity; the intake service has exactly one.

pub mod submission;

pub use submission::SubmissionRepository;
