//! Repositorio de Refuels
//!
//! El scope de empresa se resuelve por el usuario que registró el
//! repostaje, no por el vehículo.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::refuel::{CreateRefuelRequest, Refuel};
use crate::services::scope_service::RowScope;
use crate::utils::errors::AppError;

pub struct RefuelRepository {
    pool: PgPool,
}

impl RefuelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &RowScope) -> bool {
        match scope {
            RowScope::All => true,
            RowScope::Company(company_id) => {
                qb.push(" AND u.company_id = ").push_bind(*company_id);
                true
            }
            RowScope::Owner(user_id) => {
                qb.push(" AND r.user_id = ").push_bind(*user_id);
                true
            }
            _ => false,
        }
    }

    fn push_filters(
        qb: &mut QueryBuilder<'_, Postgres>,
        vehicle_id: Option<i64>,
        document_id: Option<i64>,
        user_id: Option<i64>,
    ) {
        if let Some(vehicle_id) = vehicle_id {
            qb.push(" AND r.vehicle_id = ").push_bind(vehicle_id);
        }
        if let Some(document_id) = document_id {
            qb.push(" AND r.document_id = ").push_bind(document_id);
        }
        if let Some(user_id) = user_id {
            qb.push(" AND r.user_id = ").push_bind(user_id);
        }
    }

    pub async fn list(
        &self,
        scope: &RowScope,
        vehicle_id: Option<i64>,
        document_id: Option<i64>,
        user_id: Option<i64>,
        size: i64,
        offset: i64,
    ) -> Result<(Vec<Refuel>, i64), AppError> {
        const BASE: &str = "FROM refuels r JOIN users u ON u.id = r.user_id WHERE 1=1";

        let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) {}", BASE));
        if !Self::push_scope(&mut count_qb, scope) {
            return Ok((Vec::new(), 0));
        }
        Self::push_filters(&mut count_qb, vehicle_id, document_id, user_id);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT r.* {}", BASE));
        Self::push_scope(&mut qb, scope);
        Self::push_filters(&mut qb, vehicle_id, document_id, user_id);
        qb.push(" ORDER BY r.id LIMIT ")
            .push_bind(size)
            .push(" OFFSET ")
            .push_bind(offset);

        let refuels = qb.build_query_as::<Refuel>().fetch_all(&self.pool).await?;

        Ok((refuels, total))
    }

    pub async fn find_scoped(&self, scope: &RowScope, id: i64) -> Result<Option<Refuel>, AppError> {
        let query = match scope {
            RowScope::All => {
                sqlx::query_as::<_, Refuel>("SELECT * FROM refuels WHERE id = $1").bind(id)
            }
            RowScope::Company(company_id) => sqlx::query_as::<_, Refuel>(
                r#"
                SELECT r.* FROM refuels r
                JOIN users u ON u.id = r.user_id
                WHERE r.id = $1 AND u.company_id = $2
                "#,
            )
            .bind(id)
            .bind(*company_id),
            RowScope::Owner(user_id) => {
                sqlx::query_as::<_, Refuel>("SELECT * FROM refuels WHERE id = $1 AND user_id = $2")
                    .bind(id)
                    .bind(*user_id)
            }
            _ => return Ok(None),
        };

        Ok(query.fetch_optional(&self.pool).await?)
    }

    /// Total de combustible por etiqueta MM/YY dentro de la ventana,
    /// restringido al scope del usuario
    pub async fn monthly_totals(
        &self,
        scope: &RowScope,
        window_start: DateTime<Utc>,
    ) -> Result<HashMap<String, f64>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT to_char(r.date, 'MM/YY') AS month_year, SUM(r.fuel_amount) AS total_fuel \
             FROM refuels r JOIN users u ON u.id = r.user_id WHERE 1=1",
        );
        if !Self::push_scope(&mut qb, scope) {
            return Ok(HashMap::new());
        }
        qb.push(" AND r.date >= ").push_bind(window_start);
        qb.push(" GROUP BY to_char(r.date, 'MM/YY')");

        let rows: Vec<(String, f64)> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().collect())
    }

    pub async fn insert(
        &self,
        refuel: &CreateRefuelRequest,
        date: DateTime<Utc>,
    ) -> Result<Refuel, AppError> {
        let created = sqlx::query_as::<_, Refuel>(
            r#"
            INSERT INTO refuels (date, fuel_amount, price, kilometrage_during_refuel, gas_station,
                                 vehicle_id, document_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(date)
        .bind(refuel.fuel_amount)
        .bind(refuel.price)
        .bind(refuel.kilometrage_during_refuel)
        .bind(&refuel.gas_station)
        .bind(refuel.vehicle_id)
        .bind(refuel.document_id)
        .bind(refuel.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        id: i64,
        refuel: &CreateRefuelRequest,
        date: DateTime<Utc>,
    ) -> Result<Refuel, AppError> {
        let updated = sqlx::query_as::<_, Refuel>(
            r#"
            UPDATE refuels
            SET date = $2, fuel_amount = $3, price = $4, kilometrage_during_refuel = $5,
                gas_station = $6, vehicle_id = $7, document_id = $8, user_id = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(date)
        .bind(refuel.fuel_amount)
        .bind(refuel.price)
        .bind(refuel.kilometrage_during_refuel)
        .bind(&refuel.gas_station)
        .bind(refuel.vehicle_id)
        .bind(refuel.document_id)
        .bind(refuel.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM refuels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
