//! Placeholder page written when no build artifact is available
//!
//! The page text lives in `assets/fallback.toml` and the markup in
//! `assets/fallback.html`; both are compiled into the binary. Rendering is pure
//! and deterministic, so every run produces byte-identical output.

mod content;
mod render;
mod writer;

use thiserror::Error;

pub use content::FallbackContent;
pub use render::{escape_html, render, Template};
pub use writer::FallbackGenerator;

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("Invalid fallback content: {0}")]
    Content(#[from] toml::de::Error),

    #[error("Unknown placeholder '{{{{{0}}}}}' in fallback template")]
    UnknownPlaceholder(String),

    #[error("Failed to write fallback page to {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
