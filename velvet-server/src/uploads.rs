use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json,
};
use velvet_core::object_key;

use crate::{
    errors::{ServerError, ServerResult},
    serialized::Upload,
    Router, ServerContext,
};

/// Uploads above this size are rejected outright
const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    responses(
        (status = 200, body = Upload),
        (status = 400, description = "Missing file field or unsupported content type")
    )
)]
pub(crate) async fn upload(
    State(context): State<ServerContext>,
    mut multipart: Multipart,
) -> ServerResult<Json<Upload>> {
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let mime_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(e.to_string()))?;

            file = Some((filename, mime_type, bytes));
            break;
        }
    }

    let (filename, mime_type, bytes) =
        file.ok_or_else(|| ServerError::BadRequest("Missing file field".to_string()))?;

    if !(mime_type.starts_with("image/") || mime_type.starts_with("video/")) {
        return Err(ServerError::BadRequest(
            "Only image and video uploads are accepted".to_string(),
        ));
    }

    let key = object_key(&filename);

    let stored = context
        .app
        .storage
        .put_object(&key, &mime_type, bytes.to_vec())
        .await?;

    Ok(Json(Upload::from_object(stored, filename)))
}

pub fn router() -> Router {
    Router::new()
        .route("/", post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
}
