//! Logging setup and filesystem helpers

pub mod fs;
pub mod logging;

pub use fs::{ensure_dir, replace_file};
pub use logging::{init_logging, LoggingConfig};
