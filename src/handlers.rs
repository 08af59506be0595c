use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::{StatusCode, header},
    response::Response,
};
use bytes::{Bytes, BytesMut};
use chrono::{SecondsFormat, Utc};
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

use crate::{
    database,
    error::AppError,
    models::*,
    state::AppState,
    storage::StorageError,
    utils::{content_disposition, content_type_for, is_pdf, sanitize_filename},
};

/// A `file` field read from the multipart form.
struct PendingUpload {
    original_name: String,
    data: Bytes,
}

/// Upload a PDF using multipart/form-data (field `file`).
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let mut multipart =
        multipart.map_err(|_| AppError::BadRequest("No file uploaded".into()))?;

    let max_file_size = state.config.max_file_size;
    let mut upload: Option<PendingUpload> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        error!("Error parsing multipart: {}", e);
        AppError::from(e)
    })? {
        if field.name() != Some("file") {
            continue;
        }
        // A `file` field without a filename is a plain form value, not an upload
        let original_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let content_type = field.content_type().map(|s| s.to_string());

        if !is_pdf(content_type.as_deref(), &original_name) {
            warn!("Rejected non-PDF upload {:?} ({:?})", original_name, content_type);
            return Err(AppError::UnsupportedMediaType("Only PDF files are allowed".into()));
        }

        // Enforce the size ceiling while streaming so oversized payloads are never buffered whole
        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| {
            error!("Error reading file bytes: {}", e);
            AppError::from(e)
        })? {
            if (data.len() + chunk.len()) as u64 > max_file_size {
                warn!("Upload {:?} exceeds maximum limit of {} bytes", original_name, max_file_size);
                return Err(AppError::PayloadTooLarge(format!(
                    "File exceeds maximum limit of {} bytes",
                    max_file_size
                )));
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some(PendingUpload {
            original_name,
            data: data.freeze(),
        });
        break;
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;

    let filename = sanitize_filename(&upload.original_name)
        .ok_or_else(|| AppError::BadRequest("Invalid file name".into()))?;
    let filesize = upload.data.len() as i64;

    let stored = state.storage.store(&filename, upload.data).await.map_err(|e| match e {
        StorageError::InvalidName(name) => AppError::BadRequest(format!("Invalid file name: {}", name)),
        other => AppError::from(other),
    })?;

    let new_document = NewDocument {
        filename: stored.filename,
        filepath: stored.path,
        filesize,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let document = match database::insert_document(&state.pool, &new_document).await {
        Ok(document) => document,
        Err(e) => {
            // Do not leave a file on disk that no row points at
            if let Err(cleanup) = state.storage.delete(&new_document.filepath).await {
                error!("Failed to remove orphaned file {}: {}", new_document.filepath, cleanup);
            }
            return Err(e.into());
        }
    };

    info!(
        id = document.id,
        filename = %document.filename,
        filesize = document.filesize,
        "Document uploaded"
    );

    Ok((StatusCode::CREATED, Json(document)))
}

/// List every document, newest first.
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents = database::list_documents(&state.pool).await?;
    Ok(Json(documents))
}

/// Stream a document's bytes back as an attachment.
///
/// When the row exists but its file is gone from disk, the row is deleted
/// before answering 404, so later listings no longer show it.
pub async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_document_id(&id)?;

    let document = database::find_document(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    let object = match state.storage.open(&document.filepath).await {
        Ok(object) => object,
        Err(StorageError::NotFound(path)) => {
            warn!(id, path = %path, "Backing file missing, removing document record");
            database::delete_document(&state.pool, id).await?;
            return Err(AppError::NotFound("File missing on server".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut response = Response::new(Body::from_stream(ReaderStream::new(object.reader)));
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static(content_type_for(&document.filename)),
    );
    headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(object.len));

    // Suggest the stored filename for the client-side save
    headers.insert(
        header::CONTENT_DISPOSITION,
        header::HeaderValue::from_str(&content_disposition(&document.filename))
            .unwrap_or_else(|_| header::HeaderValue::from_static("attachment")),
    );

    Ok(response)
}

/// Delete a document row and its file.
///
/// Succeeds when the file was already missing; only an unknown id is a 404.
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_document_id(&id)?;

    let document = database::find_document(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    state.storage.delete(&document.filepath).await?;
    database::delete_document(&state.pool, id).await?;

    info!("Document deleted: {}", id);

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Deleted document {}", id),
    }))
}

/// Answers "OK" when the database responds.
pub async fn health_check(State(state): State<AppState>) -> Result<&'static str, AppError> {
    database::ping(&state.pool).await?;
    Ok("OK")
}

/// Ids that are not integers cannot match any row.
fn parse_document_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound("Not found".to_string()))
}
