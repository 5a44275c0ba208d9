//! Repositorio de Documents
//!
//! Los documentos no tienen scope por filas: cualquier usuario
//! autenticado ve todos. La búsqueda cruza título, descripción,
//! matrícula del vehículo y nombre del usuario.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::document::{CreateDocumentRequest, Document};
use crate::services::scope_service::RowScope;
use crate::utils::errors::AppError;

pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(
        qb: &mut QueryBuilder<'_, Postgres>,
        search: Option<&str>,
        file_type: Option<&str>,
    ) {
        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (d.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR d.description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR v.registration_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(file_type) = file_type {
            qb.push(" AND d.file_type = ").push_bind(file_type.to_string());
        }
    }

    pub async fn list(
        &self,
        scope: &RowScope,
        search: Option<&str>,
        file_type: Option<&str>,
        size: i64,
        offset: i64,
    ) -> Result<(Vec<Document>, i64), AppError> {
        if !matches!(scope, RowScope::All) {
            return Ok((Vec::new(), 0));
        }

        const BASE: &str = "FROM documents d \
                            JOIN vehicles v ON v.id = d.vehicle_id \
                            JOIN users u ON u.id = d.user_id \
                            WHERE 1=1";

        let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) {}", BASE));
        Self::push_filters(&mut count_qb, search, file_type);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT d.* {}", BASE));
        Self::push_filters(&mut qb, search, file_type);
        qb.push(" ORDER BY d.id DESC LIMIT ")
            .push_bind(size)
            .push(" OFFSET ")
            .push_bind(offset);

        let documents = qb
            .build_query_as::<Document>()
            .fetch_all(&self.pool)
            .await?;

        Ok((documents, total))
    }

    pub async fn find_scoped(
        &self,
        scope: &RowScope,
        id: i64,
    ) -> Result<Option<Document>, AppError> {
        if !matches!(scope, RowScope::All) {
            return Ok(None);
        }

        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(document)
    }

    pub async fn insert(&self, document: &CreateDocumentRequest) -> Result<Document, AppError> {
        let created = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (title, description, file_type, vehicle_id, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&document.title)
        .bind(&document.description)
        .bind(&document.file_type)
        .bind(document.vehicle_id)
        .bind(document.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, id: i64, document: &CreateDocumentRequest) -> Result<Document, AppError> {
        let updated = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET title = $2, description = $3, file_type = $4, vehicle_id = $5, user_id = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&document.title)
        .bind(&document.description)
        .bind(&document.file_type)
        .bind(document.vehicle_id)
        .bind(document.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Asociar el fichero almacenado a un documento existente
    pub async fn set_file(
        &self,
        id: i64,
        file_path: &str,
        file_size: i64,
    ) -> Result<Document, AppError> {
        let updated = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET file_path = $2, file_size = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(file_path)
        .bind(file_size)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
