//! Handlers de Documents
//!
//! CRUD de metadatos, subida multipart del fichero y descarga de los
//! bytes almacenados.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::document::{CreateDocumentRequest, Document, DocumentFilters},
    models::pagination::{resolve_page, Page},
    repositories::document_repository::DocumentRepository,
    services::file_storage_service::FileStorageService,
    services::scope_service::document_scope,
    services::validation_service::{validate_obj_reference, ReferencedEntity},
    state::AppState,
    utils::errors::{not_found_error, validation_error, AppError, AppResult},
};

/// Crear el router de documents
pub fn create_documents_router() -> Router<AppState> {
    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route("/documents/upload", post(upload_document))
        .route(
            "/documents/:document_id",
            get(retrieve_document)
                .put(update_document)
                .delete(delete_document),
        )
        .route("/documents/:document_id/download", get(download_document))
}

async fn validate_document_references(
    state: &AppState,
    document: &CreateDocumentRequest,
) -> Result<(), AppError> {
    let payload = serde_json::to_value(document)
        .map_err(|e| AppError::Internal(format!("Error serializando payload: {}", e)))?;

    validate_obj_reference(
        &state.pool,
        ReferencedEntity::Vehicle,
        Some(document.vehicle_id),
        &payload,
    )
    .await?;
    validate_obj_reference(
        &state.pool,
        ReferencedEntity::User,
        Some(document.user_id),
        &payload,
    )
    .await?;

    Ok(())
}

/// Listar documentos, con búsqueda por título, descripción, matrícula
/// o nombre del usuario
pub async fn list_documents(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<DocumentFilters>,
) -> AppResult<Json<Page<Document>>> {
    let (page, size, offset) = resolve_page(filters.page, filters.size);
    let scope = document_scope(&user);

    let (documents, total) = DocumentRepository::new(state.pool.clone())
        .list(
            &scope,
            filters.search.as_deref(),
            filters.file_type.as_deref(),
            size,
            offset,
        )
        .await?;

    Ok(Json(Page::new(documents, total, page, size)))
}

/// Crear un documento solo con metadatos
pub async fn create_document(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(document): Json<CreateDocumentRequest>,
) -> AppResult<(StatusCode, Json<Document>)> {
    document.validate()?;
    validate_document_references(&state, &document).await?;

    let created = DocumentRepository::new(state.pool.clone())
        .insert(&document)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Crear un documento con su fichero vía multipart
pub async fn upload_document(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Document>)> {
    let mut title = None;
    let mut description = String::new();
    let mut file_type = None;
    let mut vehicle_id = None;
    let mut user_id = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| validation_error(format!("Invalid multipart body: {}", e), None))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = Some(read_text_field(field).await?),
            "description" => description = read_text_field(field).await?,
            "file_type" => file_type = Some(read_text_field(field).await?),
            "vehicle_id" => vehicle_id = Some(read_id_field(field, "vehicle_id").await?),
            "user_id" => user_id = Some(read_id_field(field, "user_id").await?),
            "file" => {
                let filename = field
                    .file_name()
                    .map(|f| f.to_string())
                    .ok_or_else(|| validation_error("No filename provided", None))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| validation_error(format!("Invalid file field: {}", e), None))?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let document = CreateDocumentRequest {
        title: title.ok_or_else(|| validation_error("Missing field: title", None))?,
        description,
        file_type: file_type.ok_or_else(|| validation_error("Missing field: file_type", None))?,
        vehicle_id: vehicle_id.ok_or_else(|| validation_error("Missing field: vehicle_id", None))?,
        user_id: user_id.ok_or_else(|| validation_error("Missing field: user_id", None))?,
    };
    let (filename, content) = file.ok_or_else(|| validation_error("Missing field: file", None))?;

    document.validate()?;
    validate_document_references(&state, &document).await?;

    let storage = FileStorageService::from_config(&state.config);
    let (file_path, file_size) = storage.store(&filename, &content).await?;

    let repository = DocumentRepository::new(state.pool.clone());
    let created = match repository.insert(&document).await {
        Ok(created) => created,
        Err(e) => {
            storage.delete(&file_path).await;
            return Err(e);
        }
    };
    let created = repository.set_file(created.id, &file_path, file_size).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| validation_error(format!("Invalid multipart field: {}", e), None))
}

async fn read_id_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<i64, AppError> {
    let text = read_text_field(field).await?;
    text.parse()
        .map_err(|_| validation_error(format!("Field {} must be an integer", name), None))
}

/// Obtener un documento por ID
pub async fn retrieve_document(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(document_id): Path<i64>,
) -> AppResult<Json<Document>> {
    let scope = document_scope(&user);
    let document = DocumentRepository::new(state.pool.clone())
        .find_scoped(&scope, document_id)
        .await?
        .ok_or_else(|| not_found_error("Document"))?;

    Ok(Json(document))
}

/// Descargar los bytes del fichero de un documento
pub async fn download_document(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(document_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let scope = document_scope(&user);
    let document = DocumentRepository::new(state.pool.clone())
        .find_scoped(&scope, document_id)
        .await?
        .ok_or_else(|| not_found_error("Document"))?;

    let file_path = document
        .file_path
        .ok_or_else(|| not_found_error("Document file"))?;

    let storage = FileStorageService::from_config(&state.config);
    let content = storage.read(&file_path).await?;

    let filename = std::path::Path::new(&file_path)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("document")
        .to_string();

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        content,
    ))
}

/// Actualizar los metadatos de un documento
pub async fn update_document(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(document_id): Path<i64>,
    Json(document): Json<CreateDocumentRequest>,
) -> AppResult<Json<Document>> {
    document.validate()?;
    validate_document_references(&state, &document).await?;

    let repository = DocumentRepository::new(state.pool.clone());
    let scope = document_scope(&user);

    repository
        .find_scoped(&scope, document_id)
        .await?
        .ok_or_else(|| not_found_error("Document"))?;

    let updated = repository.update(document_id, &document).await?;

    Ok(Json(updated))
}

/// Eliminar un documento y su fichero almacenado
pub async fn delete_document(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(document_id): Path<i64>,
) -> AppResult<StatusCode> {
    let repository = DocumentRepository::new(state.pool.clone());
    let scope = document_scope(&user);

    let document = repository
        .find_scoped(&scope, document_id)
        .await?
        .ok_or_else(|| not_found_error("Document"))?;

    repository.delete(document_id).await?;

    if let Some(file_path) = document.file_path {
        FileStorageService::from_config(&state.config)
            .delete(&file_path)
            .await;
    }

    Ok(StatusCode::NO_CONTENT)
}
