//! Repositorio de Comments
//!
//! Un manager ve sus comentarios y los de los workers de su empresa;
//! el conjunto de subordinados de un worker es vacío.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::comment::{Comment, CreateCommentRequest};
use crate::services::scope_service::RowScope;
use crate::utils::errors::AppError;

pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &RowScope) -> bool {
        match scope {
            RowScope::All => true,
            RowScope::Owner(user_id) => {
                qb.push(" AND user_id = ").push_bind(*user_id);
                true
            }
            RowScope::OwnerOrSubordinates {
                user_id,
                company_id,
            } => {
                qb.push(" AND (user_id = ")
                    .push_bind(*user_id)
                    .push(" OR user_id IN (SELECT id FROM users WHERE company_id = ")
                    .push_bind(*company_id)
                    .push(" AND role = 'worker'))");
                true
            }
            _ => false,
        }
    }

    fn push_filters(
        qb: &mut QueryBuilder<'_, Postgres>,
        vehicle_id: Option<i64>,
        user_id: Option<i64>,
    ) {
        if let Some(vehicle_id) = vehicle_id {
            qb.push(" AND vehicle_id = ").push_bind(vehicle_id);
        }
        if let Some(user_id) = user_id {
            qb.push(" AND user_id = ").push_bind(user_id);
        }
    }

    pub async fn list(
        &self,
        scope: &RowScope,
        vehicle_id: Option<i64>,
        user_id: Option<i64>,
        size: i64,
        offset: i64,
    ) -> Result<(Vec<Comment>, i64), AppError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM comments WHERE 1=1");
        if !Self::push_scope(&mut count_qb, scope) {
            return Ok((Vec::new(), 0));
        }
        Self::push_filters(&mut count_qb, vehicle_id, user_id);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM comments WHERE 1=1");
        Self::push_scope(&mut qb, scope);
        Self::push_filters(&mut qb, vehicle_id, user_id);
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(size)
            .push(" OFFSET ")
            .push_bind(offset);

        let comments = qb.build_query_as::<Comment>().fetch_all(&self.pool).await?;

        Ok((comments, total))
    }

    pub async fn find_scoped(
        &self,
        scope: &RowScope,
        id: i64,
    ) -> Result<Option<Comment>, AppError> {
        let query = match scope {
            RowScope::All => {
                sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1").bind(id)
            }
            RowScope::Owner(user_id) => {
                sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1 AND user_id = $2")
                    .bind(id)
                    .bind(*user_id)
            }
            RowScope::OwnerOrSubordinates {
                user_id,
                company_id,
            } => sqlx::query_as::<_, Comment>(
                r#"
                SELECT * FROM comments
                WHERE id = $1
                  AND (user_id = $2 OR user_id IN
                       (SELECT id FROM users WHERE company_id = $3 AND role = 'worker'))
                "#,
            )
            .bind(id)
            .bind(*user_id)
            .bind(*company_id),
            _ => return Ok(None),
        };

        Ok(query.fetch_optional(&self.pool).await?)
    }

    pub async fn insert(
        &self,
        comment: &CreateCommentRequest,
        date: DateTime<Utc>,
    ) -> Result<Comment, AppError> {
        let created = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (content, date, vehicle_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&comment.content)
        .bind(date)
        .bind(comment.vehicle_id)
        .bind(comment.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        id: i64,
        comment: &CreateCommentRequest,
        date: DateTime<Utc>,
    ) -> Result<Comment, AppError> {
        let updated = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $2, date = $3, vehicle_id = $4, user_id = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&comment.content)
        .bind(date)
        .bind(comment.vehicle_id)
        .bind(comment.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
