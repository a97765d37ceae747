/// Configuration subsystem - search defaults and line-ending preferences
///
/// This module handles loading configuration from .padfindrc files.

pub mod rc;

// Re-export public interface
pub use rc::{RcConfig, RcLoader};
