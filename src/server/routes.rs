use super::files::{content_type_for, percent_decode, resolve_static_file, sanitize_rel_path};
use super::AppState;
use crate::config::INDEX_FILE;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub(super) async fn serve_request(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Response {
    if let Some(gate) = &state.gate {
        if !gate.ready.is_ready() && !gate.ready.wait(gate.timeout).await {
            warn!(
                path = %uri.path(),
                state = %gate.ready.state(),
                "Content not ready before timeout, serving current files"
            );
        }
    }

    let Some(rel) = percent_decode(uri.path()).and_then(|p| sanitize_rel_path(&p)) else {
        return (StatusCode::BAD_REQUEST, "invalid path").into_response();
    };

    if method == Method::GET || method == Method::HEAD {
        if let Some(file) = resolve_static_file(&state.output_dir, &rel).await {
            return serve_file(&file).await;
        }

        if let Ok(rest) = rel.strip_prefix(&state.mount) {
            if let Some(file) = resolve_static_file(&state.project_root, rest).await {
                return serve_file(&file).await;
            }
        }
    }

    debug!(method = %method, path = %uri.path(), "Serving app entry point");
    let index = state.output_dir.join(INDEX_FILE);
    match tokio::fs::metadata(&index).await {
        Ok(m) if m.is_file() => serve_file(&index).await,
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

async fn serve_file(path: &Path) -> Response {
    let bytes = match tokio::fs::read(path).await {
        Ok(v) => v,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read file");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to read {}", path.display()),
            )
                .into_response();
        }
    };

    let mut response = bytes.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(path)),
    );
    response
}
