//! Database access layer for the intake service.

pub mod db;

pub use db::SubmissionRepository;
