use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::diagrams::render::ImageFormat;
use crate::diagrams::DiagramKind;
use crate::models::*;
use crate::utils::{attachment_header, diagram_download_name};
use crate::AppState;

use super::ApiError;

async fn load(state: &AppState, config_id: &str) -> Result<StoredConfig, ApiError> {
    state
        .store
        .get(config_id)
        .await
        .ok_or_else(|| ApiError::not_found("Configuration"))
}

/// Download one rendered diagram as an attachment
pub async fn get_diagram(
    State(state): State<Arc<AppState>>,
    Path(config_id): Path<String>,
    Query(query): Query<DiagramQuery>,
) -> Result<Response, ApiError> {
    let config = load(&state, &config_id).await?;

    let format = ImageFormat::parse(&query.format)
        .ok_or_else(|| ApiError::bad_request("Format must be 'png' or 'svg'"))?;
    let files = DiagramKind::parse(&query.diagram_type)
        .and_then(|kind| config.diagrams.get(&kind))
        .ok_or_else(|| {
            ApiError::bad_request(format!(
                "Diagram type '{}' not available",
                query.diagram_type
            ))
        })?;

    let path = files.path(format);
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        tracing::warn!("Diagram file {} unreadable: {}", path.display(), e);
        ApiError::not_found("Diagram file")
    })?;

    let filename = diagram_download_name(&config_id, &query.diagram_type, format.as_str());
    let body = Body::from_stream(ReaderStream::new(file));

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, attachment_header(&filename)),
        ],
        body,
    )
        .into_response())
}

/// Paths of every rendered diagram for a configuration
pub async fn get_all_diagrams(
    State(state): State<Arc<AppState>>,
    Path(config_id): Path<String>,
) -> Result<Json<DiagramsResponse>, ApiError> {
    let config = load(&state, &config_id).await?;
    Ok(Json(DiagramsResponse {
        config_id: config.id,
        filename: config.filename,
        diagrams: config.diagrams,
    }))
}

/// Mermaid markup for every diagram variant
pub async fn get_mermaid_diagrams(
    State(state): State<Arc<AppState>>,
    Path(config_id): Path<String>,
) -> Result<Json<MermaidResponse>, ApiError> {
    let config = load(&state, &config_id).await?;
    Ok(Json(MermaidResponse {
        config_id: config.id,
        filename: config.filename,
        diagrams: config.markup,
    }))
}

/// Mermaid markup for a single variant, as plain text
pub async fn get_mermaid_diagram(
    State(state): State<Arc<AppState>>,
    Path((config_id, diagram_type)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let config = load(&state, &config_id).await?;
    let markup = DiagramKind::parse(&diagram_type)
        .and_then(|kind| config.markup.get(&kind))
        .ok_or_else(|| {
            ApiError::bad_request(format!("Diagram type '{}' not available", diagram_type))
        })?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        markup.clone(),
    )
        .into_response())
}
