use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::diagrams::{mermaid, render};
use crate::models::*;
use crate::utils::{attachment_header, is_config_filename, upload_basename};
use crate::{parser, AppState};

use super::{ApiError, MessageResponse};

/// Upload, parse and render a configuration file (multipart field `file`)
pub async fn upload_config(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let (filename, data) = read_file_field(&mut multipart).await?;
    tracing::info!("Upload request received for file: {}", filename);

    if !is_config_filename(&filename) {
        tracing::warn!("Invalid file type: {}", filename);
        return Err(ApiError::bad_request(
            "Invalid file type. Please upload a .conf or .txt file",
        ));
    }

    let text = String::from_utf8(data)
        .map_err(|_| ApiError::bad_request("Configuration file must be UTF-8 text"))?;
    tracing::info!("File read successfully, size: {} bytes", text.len());

    let network = parser::parse(&text).map_err(|e| {
        tracing::warn!("Failed to parse {}: {}", filename, e);
        ApiError::unprocessable(format!("Error processing configuration: {}", e))
    })?;

    let config_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        "Configuration {} parsed: {} devices, {} interfaces",
        config_id,
        network.devices.len(),
        network.devices.iter().map(|d| d.interfaces.len()).sum::<usize>()
    );

    let diagrams = render::render_all(state.renderer.as_ref(), &config_id, &network).await;
    let markup = mermaid::generate_all(&network);
    tracing::info!(
        "Diagrams generated for {}: {:?}",
        config_id,
        diagrams.keys().map(|k| k.as_str()).collect::<Vec<_>>()
    );

    let stored = StoredConfig {
        id: config_id,
        filename,
        network,
        diagrams,
        markup,
        created_at: Utc::now(),
    };
    let response = UploadResponse::from_stored(&stored);
    state.store.insert(stored).await;
    tracing::info!(
        "Stored configuration {} ({} total)",
        response.config_id,
        state.store.len().await
    );

    Ok(Json(response))
}

/// Pull the `file` field out of a multipart body
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = upload_basename(field.file_name().unwrap_or_default()).to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
        return Ok((filename, data.to_vec()));
    }
    Err(ApiError::bad_request("No file uploaded"))
}

/// Get the parsed network model for a configuration
pub async fn get_parsed_config(
    State(state): State<Arc<AppState>>,
    Path(config_id): Path<String>,
) -> Result<Json<ParsedConfigResponse>, ApiError> {
    let config = state
        .store
        .get(&config_id)
        .await
        .ok_or_else(|| ApiError::not_found("Configuration"))?;

    Ok(Json(ParsedConfigResponse {
        config_id: config.id,
        filename: config.filename,
        network: config.network,
    }))
}

/// List all uploaded configurations
pub async fn list_configs(State(state): State<Arc<AppState>>) -> Json<ConfigListResponse> {
    let configs = state.store.list().await;
    tracing::info!("Returning {} configurations", configs.len());
    Json(ConfigListResponse { configs })
}

/// Delete a configuration and its rendered files
pub async fn delete_config(
    State(state): State<Arc<AppState>>,
    Path(config_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = state.store.delete(&config_id).await?;
    for files in removed.diagrams.values() {
        files.remove().await;
    }
    tracing::info!("Configuration deleted: {}", config_id);
    Ok(MessageResponse::new("Configuration deleted successfully"))
}

/// Serve the bundled sample configuration
pub async fn get_sample_config(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let path = std::path::Path::new(&state.config.sample_config_path);
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|_| ApiError::not_found("Sample configuration file"))?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("sample.conf");

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment_header(filename)),
        ],
        content,
    )
        .into_response())
}
