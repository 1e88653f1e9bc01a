//! Media upload endpoint
//!
//! Profile photos are stored on disk and referenced by URL; event cover
//! images are inline on the event document instead and never pass through
//! here.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde_json::json;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::utils::errors::{CommitteeHubError, Result};
use crate::utils::helpers;

use super::AppState;

async fn upload(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Bytes,
) -> Result<Json<serde_json::Value>> {
    if !state.settings.features.media_uploads {
        return Err(CommitteeHubError::ServiceUnavailable(
            "Media uploads are disabled".to_string(),
        ));
    }

    if body.is_empty() {
        return Err(CommitteeHubError::InvalidInput(
            "Empty upload".to_string(),
        ));
    }
    if body.len() > state.settings.media.max_bytes {
        return Err(CommitteeHubError::InvalidInput(format!(
            "Upload exceeds the {} byte limit",
            state.settings.media.max_bytes
        )));
    }

    let kind = infer::get(&body).ok_or_else(|| {
        CommitteeHubError::InvalidInput("Unrecognized file type".to_string())
    })?;

    let mime_type: mime::Mime = kind.mime_type().parse().map_err(|_| {
        CommitteeHubError::InvalidInput("Unrecognized file type".to_string())
    })?;
    if mime_type.type_() != mime::IMAGE {
        return Err(CommitteeHubError::InvalidInput(
            "Only image uploads are allowed".to_string(),
        ));
    }

    let filename = helpers::sanitize_filename(&format!(
        "{}.{}",
        Uuid::new_v4().simple(),
        kind.extension()
    ));

    tokio::fs::create_dir_all(&state.settings.media.upload_dir).await?;
    let path = std::path::Path::new(&state.settings.media.upload_dir).join(&filename);
    tokio::fs::write(&path, &body).await?;

    tracing::info!(user_id = %user.user_id, filename = %filename, "Media uploaded");

    Ok(Json(json!({
        "url": format!("{}/{}", state.settings.media.base_url, filename)
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload))
}
