use super::FallbackError;
use serde::Deserialize;

const EMBEDDED_CONTENT: &str = include_str!("../../assets/fallback.toml");

/// Text shown on the placeholder page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackContent {
    pub title: String,
    pub heading: String,
    pub tagline: String,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub notice: String,
}

impl FallbackContent {
    /// Content bundled with the binary.
    pub fn embedded() -> Result<Self, FallbackError> {
        Self::from_toml_str(EMBEDDED_CONTENT)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, FallbackError> {
        Ok(toml::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_content_parses() {
        let content = FallbackContent::embedded().unwrap();

        assert_eq!(content.heading, "Janatonese");
        assert!(content.title.contains("Janatonese"));
        assert_eq!(content.features.len(), 5);
        assert!(!content.description.is_empty());
    }

    #[test]
    fn test_optional_sections_default_empty() {
        let content = FallbackContent::from_toml_str(
            r#"
title = "T"
heading = "H"
tagline = "S"
"#,
        )
        .unwrap();

        assert!(content.features.is_empty());
        assert!(content.description.is_empty());
        assert_eq!(content.notice, "");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = FallbackContent::from_toml_str(
            r#"
title = "T"
heading = "H"
tagline = "S"
colour = "teal"
"#,
        );

        assert!(matches!(result, Err(FallbackError::Content(_))));
    }
}
