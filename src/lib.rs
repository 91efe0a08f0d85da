//! OTrim Video Trimmer Library
//!
//! Hexagonal layout: `domain` holds the selection and gallery models and their
//! rules, `ports` the traits for external tools, `adapters` the ffmpeg, desktop
//! and file system implementations, `app` the controllers, and `views` the
//! terminal front ends.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;
pub mod views;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{MediaInfo, TimeSpec, TrimSession};
pub use error::{OtrimError, OtrimResult};
