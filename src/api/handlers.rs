use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Path, State,
    },
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::logic::{ActionError, BulkDeleteOutcome, FieldError, ImageSource, PageController, PageSnapshot, UploadedFile};
use crate::model::{Group, Product, ResolvedGroup, Selection};
use crate::store::traits::Store;

pub type AppState<S> = Arc<Mutex<PageController<S>>>;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
            fields: Vec::new(),
        }
    }
}

/// Validation problems are the caller's to fix; store failures stay generic
fn action_error(err: ActionError, failure_message: &str) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ActionError::Validation(fields) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "Validation failed".to_string(),
                fields,
            }),
        ),
        ActionError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(failure_message)),
        ),
    }
}

fn multipart_error(context: &str, err: MultipartError) -> (StatusCode, Json<ErrorResponse>) {
    (
        err.status(),
        Json(ErrorResponse::new(&format!("{}: {}", context, err.body_text()))),
    )
}

#[derive(Debug, Deserialize)]
pub struct NewProductRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectionToggleRequest {
    pub included: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewGroupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selection: Selection,
    pub bulk_actions_visible: bool,
}

impl SelectionResponse {
    fn from_selection(selection: &Selection) -> Self {
        Self {
            selection: selection.clone(),
            bulk_actions_visible: selection.bulk_actions_visible(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModalResponse {
    pub modal_open: bool,
}

pub async fn get_page<S: Store>(State(state): State<AppState<S>>) -> Json<PageSnapshot> {
    let mut page = state.lock().await;
    Json(page.snapshot())
}

pub async fn reload_page<S: Store>(State(state): State<AppState<S>>) -> Json<PageSnapshot> {
    let mut page = state.lock().await;
    page.load().await;
    Json(page.snapshot())
}

pub async fn open_modal<S: Store>(State(state): State<AppState<S>>) -> Json<ModalResponse> {
    let mut page = state.lock().await;
    page.open_modal();
    Json(ModalResponse { modal_open: true })
}

pub async fn close_modal<S: Store>(State(state): State<AppState<S>>) -> Json<ModalResponse> {
    let mut page = state.lock().await;
    page.close_modal();
    Json(ModalResponse { modal_open: false })
}

pub async fn list_products<S: Store>(State(state): State<AppState<S>>) -> Json<Vec<Product>> {
    let page = state.lock().await;
    Json(page.products().to_vec())
}

pub async fn create_product<S: Store>(
    State(state): State<AppState<S>>,
    RequestJson(request): RequestJson<NewProductRequest>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, Json<ErrorResponse>)> {
    let mut page = state.lock().await;
    page.submit_product(
        request.title,
        request.notes,
        Some(ImageSource::Url(request.image)),
    )
    .await
    .map(|product| (StatusCode::CREATED, Json(product)))
    .map_err(|e| action_error(e, "Failed to add product"))
}

/// Multipart variant of product creation: `title`, `notes`, and either a `file`
/// part or an `image` URL part
pub async fn upload_product<S: Store>(
    State(state): State<AppState<S>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Product>), (StatusCode, Json<ErrorResponse>)> {
    let max_upload_bytes = state.lock().await.max_upload_bytes();

    let mut title = String::new();
    let mut notes = String::new();
    let mut image: Option<ImageSource> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read field", e))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "title" => {
                title = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Invalid title", e))?;
            }
            "notes" => {
                notes = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Invalid notes", e))?;
            }
            "image" => {
                let url = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Invalid image url", e))?;
                if image.is_none() {
                    image = Some(ImageSource::Url(url));
                }
            }
            "file" => {
                if let Some(file) = read_capped_file(field, max_upload_bytes)
                    .await
                    .map_err(|e| multipart_error("Failed to read file", e))?
                {
                    image = Some(file);
                }
            }
            _ => {}
        }
    }

    let mut page = state.lock().await;
    page.submit_product(title, notes, image)
        .await
        .map(|product| (StatusCode::CREATED, Json(product)))
        .map_err(|e| action_error(e, "Failed to add product"))
}

/// Receive a file part chunk by chunk, holding at most `max_upload_bytes` in memory.
///
/// Past the cap the rest of the part is read and discarded so the size can be
/// reported back as a validation error. An empty part yields `None`.
async fn read_capped_file(
    mut field: Field<'_>,
    max_upload_bytes: usize,
) -> Result<Option<ImageSource>, MultipartError> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(|s| s.to_string());

    let mut bytes = Vec::new();
    let mut size = 0usize;
    while let Some(chunk) = field.chunk().await? {
        size = size.saturating_add(chunk.len());
        if size <= max_upload_bytes {
            bytes.extend_from_slice(&chunk);
        } else if !bytes.is_empty() {
            bytes = Vec::new();
        }
    }

    if size == 0 {
        return Ok(None);
    }
    if size > max_upload_bytes {
        log::warn!("Discarded upload {} of {} bytes (limit {})", file_name, size, max_upload_bytes);
        return Ok(Some(ImageSource::Oversized { file_name, size }));
    }

    Ok(Some(ImageSource::File(UploadedFile {
        file_name,
        content_type,
        bytes,
    })))
}

pub async fn delete_product<S: Store>(
    State(state): State<AppState<S>>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let mut page = state.lock().await;
    page.delete_product(&product_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| action_error(e, "Failed to delete product"))
}

pub async fn get_selection<S: Store>(State(state): State<AppState<S>>) -> Json<SelectionResponse> {
    let page = state.lock().await;
    Json(SelectionResponse::from_selection(page.selection()))
}

pub async fn toggle_selection<S: Store>(
    State(state): State<AppState<S>>,
    Path(product_id): Path<String>,
    RequestJson(request): RequestJson<SelectionToggleRequest>,
) -> ApiResult<SelectionResponse> {
    let mut page = state.lock().await;
    page.toggle_selection(&product_id, request.included)
        .map_err(|e| action_error(e, "Failed to update selection"))?;
    Ok(Json(SelectionResponse::from_selection(page.selection())))
}

pub async fn clear_selection<S: Store>(State(state): State<AppState<S>>) -> Json<SelectionResponse> {
    let mut page = state.lock().await;
    page.clear_selection();
    Json(SelectionResponse::from_selection(page.selection()))
}

pub async fn delete_selected<S: Store>(State(state): State<AppState<S>>) -> ApiResult<BulkDeleteOutcome> {
    let mut page = state.lock().await;
    page.delete_selected()
        .await
        .map(Json)
        .map_err(|e| action_error(e, "Failed to delete selected products"))
}

pub async fn list_groups<S: Store>(State(state): State<AppState<S>>) -> Json<Vec<ResolvedGroup>> {
    let page = state.lock().await;
    Json(page.resolved_groups())
}

pub async fn create_group<S: Store>(
    State(state): State<AppState<S>>,
    RequestJson(request): RequestJson<NewGroupRequest>,
) -> Result<(StatusCode, Json<Group>), (StatusCode, Json<ErrorResponse>)> {
    let mut page = state.lock().await;
    page.create_group(request.name, request.notes)
        .await
        .map(|group| (StatusCode::CREATED, Json(group)))
        .map_err(|e| action_error(e, "Failed to create group"))
}
