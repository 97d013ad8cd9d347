//! HTTP request handlers

use super::error::AppError;
use super::page::upload_page;
use super::retention;
use super::server::AppState;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::response::Html;

/// Name of the multipart field carrying the WAV file
pub const AUDIO_FIELD: &str = "audio";

/// Only client file names with this suffix are analyzed
pub const WAV_SUFFIX: &str = ".wav";

/// GET / - empty upload form
pub async fn index() -> Html<String> {
    Html(upload_page(None))
}

/// GET /health - liveness probe
pub async fn health() -> &'static str {
    "ok"
}

/// POST / - analyze an uploaded WAV file and show the figure
///
/// A missing `audio` field or a file name without the `.wav` suffix
/// re-renders the empty form.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let Some((file_name, data)) = read_audio_field(&mut multipart).await? else {
        tracing::debug!("no audio field in upload");
        return Ok(Html(upload_page(None)));
    };

    if !file_name.ends_with(WAV_SUFFIX) {
        tracing::warn!(file_name = %file_name, "rejected upload without .wav suffix");
        return Ok(Html(upload_page(None)));
    }

    // Client names are never used as paths
    let stored = state
        .config
        .upload_dir
        .join(format!("{}.wav", uuid::Uuid::new_v4()));
    tokio::fs::write(&stored, &data).await?;

    let artifact = state.config.artifact_name();
    let output = state.config.static_dir.join(&artifact);

    let config = state.config.clone();
    let pipeline = state.pipeline.clone();
    let input = stored.clone();
    let report = tokio::task::spawn_blocking(move || {
        let result = pipeline.process_file(&input, &output);
        match &result {
            Ok(_) => {
                let kept = retention::enforce(&config, Some(input.as_path()), Some(output.as_path()));
                if let Err(e) = kept {
                    tracing::warn!("failed to prune stored files: {}", e);
                }
            }
            Err(_) => {
                if let Err(e) = std::fs::remove_file(&input) {
                    tracing::warn!(stored = %input.display(), "failed to remove upload: {}", e);
                }
            }
        }
        result
    })
    .await??;

    tracing::info!(
        file_name = %file_name,
        stored = %stored.display(),
        artifact = %artifact,
        sample_rate = report.sample_rate,
        duration_secs = report.duration_secs,
        peak_hz = report.peak_hz,
        frames = report.frames,
        "rendered upload"
    );

    Ok(Html(upload_page(Some(&format!("./static/{}", artifact)))))
}

/// Find the `audio` field; other fields are skipped
async fn read_audio_field(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok(Some((file_name, data)));
    }
    Ok(None)
}
