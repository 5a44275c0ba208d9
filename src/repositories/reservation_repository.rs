//! Repositorio de Reservations

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::reservation::{CreateReservationRequest, Reservation};
use crate::services::scope_service::RowScope;
use crate::utils::errors::AppError;

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
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
    ) -> Result<(Vec<Reservation>, i64), AppError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM reservations WHERE 1=1");
        if !Self::push_scope(&mut count_qb, scope) {
            return Ok((Vec::new(), 0));
        }
        Self::push_filters(&mut count_qb, vehicle_id, user_id);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM reservations WHERE 1=1");
        Self::push_scope(&mut qb, scope);
        Self::push_filters(&mut qb, vehicle_id, user_id);
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(size)
            .push(" OFFSET ")
            .push_bind(offset);

        let reservations = qb
            .build_query_as::<Reservation>()
            .fetch_all(&self.pool)
            .await?;

        Ok((reservations, total))
    }

    /// Reservas con date_from posterior a now, ascendente por comienzo
    pub async fn list_upcoming(
        &self,
        scope: &RowScope,
        now: DateTime<Utc>,
        size: i64,
        offset: i64,
    ) -> Result<(Vec<Reservation>, i64), AppError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM reservations WHERE 1=1");
        if !Self::push_scope(&mut count_qb, scope) {
            return Ok((Vec::new(), 0));
        }
        count_qb.push(" AND date_from > ").push_bind(now);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM reservations WHERE 1=1");
        Self::push_scope(&mut qb, scope);
        qb.push(" AND date_from > ").push_bind(now);
        qb.push(" ORDER BY date_from LIMIT ")
            .push_bind(size)
            .push(" OFFSET ")
            .push_bind(offset);

        let reservations = qb
            .build_query_as::<Reservation>()
            .fetch_all(&self.pool)
            .await?;

        Ok((reservations, total))
    }

    pub async fn find_scoped(
        &self,
        scope: &RowScope,
        id: i64,
    ) -> Result<Option<Reservation>, AppError> {
        let query = match scope {
            RowScope::All => {
                sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
                    .bind(id)
            }
            RowScope::Owner(user_id) => sqlx::query_as::<_, Reservation>(
                "SELECT * FROM reservations WHERE id = $1 AND user_id = $2",
            )
            .bind(id)
            .bind(*user_id),
            _ => return Ok(None),
        };

        Ok(query.fetch_optional(&self.pool).await?)
    }

    pub async fn insert(
        &self,
        reservation: &CreateReservationRequest,
        reservation_date: DateTime<Utc>,
    ) -> Result<Reservation, AppError> {
        let created = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (date_from, date_to, reservation_date, vehicle_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(reservation.date_from)
        .bind(reservation.date_to)
        .bind(reservation_date)
        .bind(reservation.vehicle_id)
        .bind(reservation.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        id: i64,
        reservation: &CreateReservationRequest,
        reservation_date: DateTime<Utc>,
    ) -> Result<Reservation, AppError> {
        let updated = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET date_from = $2, date_to = $3, reservation_date = $4, vehicle_id = $5, user_id = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reservation.date_from)
        .bind(reservation.date_to)
        .bind(reservation_date)
        .bind(reservation.vehicle_id)
        .bind(reservation.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
