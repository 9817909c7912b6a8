use super::{render, FallbackContent, FallbackError};
use crate::config::INDEX_FILE;
use crate::util::{ensure_dir, replace_file};
use std::path::{Path, PathBuf};
use tracing::info;

/// Holds the rendered placeholder page and writes it on demand.
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    page: String,
}

impl FallbackGenerator {
    pub fn new(content: &FallbackContent) -> Result<Self, FallbackError> {
        Ok(Self {
            page: render(content)?,
        })
    }

    pub fn embedded() -> Result<Self, FallbackError> {
        Self::new(&FallbackContent::embedded()?)
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    /// Writes the page to `output_dir/index.html`, replacing whatever is there.
    pub async fn write(&self, output_dir: &Path) -> Result<PathBuf, FallbackError> {
        ensure_dir(output_dir)
            .await
            .map_err(|source| FallbackError::Io {
                path: output_dir.to_path_buf(),
                source,
            })?;

        let path = output_dir.join(INDEX_FILE);
        replace_file(&path, self.page.as_bytes())
            .await
            .map_err(|source| FallbackError::Io {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), bytes = self.page.len(), "Placeholder page written");
        Ok(path)
    }
}
