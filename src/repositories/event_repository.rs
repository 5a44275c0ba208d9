//! Repositorio de Events
//!
//! Los eventos no tienen scope por filas: cualquier usuario autenticado
//! ve todos.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::event::{CreateEventRequest, Event};
use crate::services::scope_service::RowScope;
use crate::utils::errors::AppError;

pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(
        qb: &mut QueryBuilder<'_, Postgres>,
        vehicle_id: Option<i64>,
        document_id: Option<i64>,
        company_id: Option<i64>,
    ) {
        if let Some(vehicle_id) = vehicle_id {
            qb.push(" AND vehicle_id = ").push_bind(vehicle_id);
        }
        if let Some(document_id) = document_id {
            qb.push(" AND document_id = ").push_bind(document_id);
        }
        if let Some(company_id) = company_id {
            qb.push(" AND company_id = ").push_bind(company_id);
        }
    }

    pub async fn list(
        &self,
        scope: &RowScope,
        vehicle_id: Option<i64>,
        document_id: Option<i64>,
        company_id: Option<i64>,
        size: i64,
        offset: i64,
    ) -> Result<(Vec<Event>, i64), AppError> {
        if !matches!(scope, RowScope::All) {
            return Ok((Vec::new(), 0));
        }

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM events WHERE 1=1");
        Self::push_filters(&mut count_qb, vehicle_id, document_id, company_id);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM events WHERE 1=1");
        Self::push_filters(&mut qb, vehicle_id, document_id, company_id);
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(size)
            .push(" OFFSET ")
            .push_bind(offset);

        let events = qb.build_query_as::<Event>().fetch_all(&self.pool).await?;

        Ok((events, total))
    }

    pub async fn find_scoped(&self, scope: &RowScope, id: i64) -> Result<Option<Event>, AppError> {
        if !matches!(scope, RowScope::All) {
            return Ok(None);
        }

        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    pub async fn insert(
        &self,
        event: &CreateEventRequest,
        date: DateTime<Utc>,
    ) -> Result<Event, AppError> {
        let created = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (event_type, date, description, price, vehicle_id, document_id, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&event.event_type)
        .bind(date)
        .bind(&event.description)
        .bind(event.price)
        .bind(event.vehicle_id)
        .bind(event.document_id)
        .bind(event.company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        id: i64,
        event: &CreateEventRequest,
        date: DateTime<Utc>,
    ) -> Result<Event, AppError> {
        let updated = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET event_type = $2, date = $3, description = $4, price = $5, vehicle_id = $6,
                document_id = $7, company_id = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&event.event_type)
        .bind(date)
        .bind(&event.description)
        .bind(event.price)
        .bind(event.vehicle_id)
        .bind(event.document_id)
        .bind(event.company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
