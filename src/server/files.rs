use std::path::{Component, Path, PathBuf};

/// Decodes `%XX` escapes. Returns `None` for malformed escapes or non-UTF-8 results.
pub fn percent_decode(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Turns a URL path into a relative filesystem path.
///
/// Rejects `..`, absolute components and NUL bytes.
pub fn sanitize_rel_path(path: &str) -> Option<PathBuf> {
    if path.contains('\0') {
        return None;
    }
    let trimmed = path.trim_start_matches('/');
    let rel = PathBuf::from(trimmed);
    for comp in rel.components() {
        if matches!(
            comp,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        ) {
            return None;
        }
    }
    Some(rel)
}

fn has_hidden_segment(rel: &Path) -> bool {
    rel.components().any(|c| match c {
        Component::Normal(s) => s.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// Finds the file to serve for `rel` under `root`.
///
/// Directories resolve to their `index.html`. Dot-files are never served.
pub async fn resolve_static_file(root: &Path, rel: &Path) -> Option<PathBuf> {
    if has_hidden_segment(rel) {
        return None;
    }

    let full = root.join(rel);
    let metadata = tokio::fs::metadata(&full).await.ok()?;
    if metadata.is_file() {
        return Some(full);
    }

    if metadata.is_dir() {
        let index = full.join(crate::config::INDEX_FILE);
        if tokio::fs::metadata(&index).await.ok()?.is_file() {
            return Some(index);
        }
    }

    None
}

pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
        .as_str()
    {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "wasm" => "application/wasm",
        "txt" | "dart" | "yaml" | "yml" | "md" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        _ => "application/octet-stream",
    }
}
