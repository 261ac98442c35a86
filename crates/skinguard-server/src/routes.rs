//! HTTP routes: `POST /predict` and `GET /health`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::rt::time::timeout;
use actix_web::{get, post, web, HttpResponse, ResponseError};
use serde_json::json;

use skinguard_core::upload::{allowed_file, secure_filename, MAX_UPLOAD_BYTES};
use skinguard_core::{Classification, ClassifyError, Classifier};

/// Shared, read-only service state.
pub struct AppState {
    pub classifier: Arc<Classifier>,
    pub upload_dir: PathBuf,
    pub inference_timeout: Duration,
}

#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    #[multipart(limit = "5MiB")]
    file: Option<TempFile>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No file uploaded")]
    NoFile,
    #[error("No file selected")]
    NoFilename,
    #[error("Invalid file type")]
    InvalidType,
    #[error("{0}")]
    Classify(#[from] ClassifyError),
    #[error("failed to store upload: {0}")]
    Storage(#[from] std::io::Error),
    #[error("classification timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),
    #[error("classification worker failed")]
    Worker,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFile | ApiError::NoFilename | ApiError::InvalidType => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Classify(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Classify(_) | ApiError::Storage(_) | ApiError::Worker => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("predict failed: {self}");
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    let multipart = MultipartFormConfig::default()
        .total_limit(MAX_UPLOAD_BYTES + 64 * 1024)
        .error_handler(|err, _req| {
            let body = json!({ "error": err.to_string() });
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        });

    cfg.app_data(multipart).service(predict).service(health);
}

#[post("/predict")]
async fn predict(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> Result<HttpResponse, ApiError> {
    let upload = form.file.ok_or(ApiError::NoFile)?;
    let filename = upload.file_name.clone().unwrap_or_default();
    if filename.is_empty() {
        return Err(ApiError::NoFilename);
    }
    if !allowed_file(&filename) {
        return Err(ApiError::InvalidType);
    }

    let classifier = Arc::clone(&state.classifier);
    let upload_dir = state.upload_dir.clone();
    let work = web::block(move || -> Result<Classification, ApiError> {
        let bytes = std::fs::read(upload.file.path())?;
        let saved = store_upload(&upload_dir, &filename, &bytes)?;
        log::debug!("stored upload at {}", saved.display());
        Ok(classifier.classify(&bytes)?)
    });

    let classification = timeout(state.inference_timeout, work)
        .await
        .map_err(|_| ApiError::Timeout(state.inference_timeout))?
        .map_err(|_| ApiError::Worker)??;

    Ok(HttpResponse::Ok().json(classification))
}

#[get("/health")]
async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok", "head": state.classifier.head() }))
}

/// Write the upload under its sanitized name, falling back to a generated
/// one when nothing survives sanitization.
fn store_upload(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let mut name = secure_filename(filename);
    if name.is_empty() || !allowed_file(&name) {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "img".to_string());
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        name = format!("upload-{stamp}.{ext}");
    }

    let path = dir.join(name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}
