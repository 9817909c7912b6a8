use super::{FallbackContent, FallbackError};

const EMBEDDED_TEMPLATE: &str = include_str!("../../assets/fallback.html");

/// HTML skeleton with `{{name}}` placeholders.
#[derive(Debug, Clone)]
pub struct Template<'a> {
    source: &'a str,
}

impl Template<'static> {
    pub fn embedded() -> Self {
        Self {
            source: EMBEDDED_TEMPLATE,
        }
    }
}

impl<'a> Template<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Substitutes placeholders in a single pass; inserted text is never re-scanned.
    pub fn render(&self, content: &FallbackContent) -> Result<String, FallbackError> {
        let mut out = String::with_capacity(self.source.len() + 1024);
        let mut rest = self.source;

        while let Some(start) = rest.find("{{") {
            let Some(len) = rest[start + 2..].find("}}") else {
                break;
            };
            out.push_str(&rest[..start]);
            let name = rest[start + 2..start + 2 + len].trim();
            out.push_str(&placeholder_value(name, content)?);
            rest = &rest[start + 2 + len + 2..];
        }
        out.push_str(rest);

        Ok(out)
    }
}

fn placeholder_value(name: &str, content: &FallbackContent) -> Result<String, FallbackError> {
    let value = match name {
        "title" => escape_html(&content.title),
        "heading" => escape_html(&content.heading),
        "tagline" => escape_html(&content.tagline),
        "notice" => escape_html(&content.notice),
        "description" => content
            .description
            .iter()
            .map(|p| format!("      <p>{}</p>", escape_html(p)))
            .collect::<Vec<_>>()
            .join("\n"),
        "features" => content
            .features
            .iter()
            .map(|f| format!("    <div class=\"feature\">\u{2705} {}</div>", escape_html(f)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => return Err(FallbackError::UnknownPlaceholder(other.to_string())),
    };
    Ok(value)
}

/// Renders `content` into the embedded template.
pub fn render(content: &FallbackContent) -> Result<String, FallbackError> {
    Template::embedded().render(content)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
