//! Repositorio de Insurances
//!
//! El scope de empresa se resuelve por el vehículo asegurado.

use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::insurance::{CreateInsuranceRequest, Insurance};
use crate::services::scope_service::RowScope;
use crate::utils::errors::AppError;

/// Ventana de aviso para pólizas a punto de vencer
pub const FINISHING_WINDOW_DAYS: i64 = 31;

pub struct InsuranceRepository {
    pool: PgPool,
}

impl InsuranceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &RowScope) -> bool {
        match scope {
            RowScope::All => true,
            RowScope::Company(company_id) => {
                qb.push(" AND v.company_id = ").push_bind(*company_id);
                true
            }
            _ => false,
        }
    }

    fn push_filters(
        qb: &mut QueryBuilder<'_, Postgres>,
        vehicle_id: Option<i64>,
        document_id: Option<i64>,
        company_id: Option<i64>,
    ) {
        if let Some(vehicle_id) = vehicle_id {
            qb.push(" AND i.vehicle_id = ").push_bind(vehicle_id);
        }
        if let Some(document_id) = document_id {
            qb.push(" AND i.document_id = ").push_bind(document_id);
        }
        if let Some(company_id) = company_id {
            qb.push(" AND i.company_id = ").push_bind(company_id);
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
    ) -> Result<(Vec<Insurance>, i64), AppError> {
        const BASE: &str = "FROM insurances i JOIN vehicles v ON v.id = i.vehicle_id WHERE 1=1";

        let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) {}", BASE));
        if !Self::push_scope(&mut count_qb, scope) {
            return Ok((Vec::new(), 0));
        }
        Self::push_filters(&mut count_qb, vehicle_id, document_id, company_id);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT i.* {}", BASE));
        Self::push_scope(&mut qb, scope);
        Self::push_filters(&mut qb, vehicle_id, document_id, company_id);
        qb.push(" ORDER BY i.id LIMIT ")
            .push_bind(size)
            .push(" OFFSET ")
            .push_bind(offset);

        let insurances = qb
            .build_query_as::<Insurance>()
            .fetch_all(&self.pool)
            .await?;

        Ok((insurances, total))
    }

    /// Pólizas con date_to dentro de (now, now + 31 días], ascendente por
    /// vencimiento
    pub async fn list_finishing(
        &self,
        scope: &RowScope,
        now: DateTime<Utc>,
        size: i64,
        offset: i64,
    ) -> Result<(Vec<Insurance>, i64), AppError> {
        let end = now + Duration::days(FINISHING_WINDOW_DAYS);

        const BASE: &str = "FROM insurances i JOIN vehicles v ON v.id = i.vehicle_id WHERE 1=1";

        let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) {}", BASE));
        if !Self::push_scope(&mut count_qb, scope) {
            return Ok((Vec::new(), 0));
        }
        count_qb.push(" AND i.date_to > ").push_bind(now);
        count_qb.push(" AND i.date_to <= ").push_bind(end);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT i.* {}", BASE));
        Self::push_scope(&mut qb, scope);
        qb.push(" AND i.date_to > ").push_bind(now);
        qb.push(" AND i.date_to <= ").push_bind(end);
        qb.push(" ORDER BY i.date_to LIMIT ")
            .push_bind(size)
            .push(" OFFSET ")
            .push_bind(offset);

        let insurances = qb
            .build_query_as::<Insurance>()
            .fetch_all(&self.pool)
            .await?;

        Ok((insurances, total))
    }

    pub async fn find_scoped(
        &self,
        scope: &RowScope,
        id: i64,
    ) -> Result<Option<Insurance>, AppError> {
        let query = match scope {
            RowScope::All => {
                sqlx::query_as::<_, Insurance>("SELECT * FROM insurances WHERE id = $1").bind(id)
            }
            RowScope::Company(company_id) => sqlx::query_as::<_, Insurance>(
                r#"
                SELECT i.* FROM insurances i
                JOIN vehicles v ON v.id = i.vehicle_id
                WHERE i.id = $1 AND v.company_id = $2
                "#,
            )
            .bind(id)
            .bind(*company_id),
            _ => return Ok(None),
        };

        Ok(query.fetch_optional(&self.pool).await?)
    }

    pub async fn insert(&self, insurance: &CreateInsuranceRequest) -> Result<Insurance, AppError> {
        let created = sqlx::query_as::<_, Insurance>(
            r#"
            INSERT INTO insurances (insurer, policy_number, date_from, date_to, description, price,
                                    insurance_type, vehicle_id, document_id, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&insurance.insurer)
        .bind(&insurance.policy_number)
        .bind(insurance.date_from)
        .bind(insurance.date_to)
        .bind(&insurance.description)
        .bind(insurance.price)
        .bind(insurance.insurance_type)
        .bind(insurance.vehicle_id)
        .bind(insurance.document_id)
        .bind(insurance.company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        id: i64,
        insurance: &CreateInsuranceRequest,
    ) -> Result<Insurance, AppError> {
        let updated = sqlx::query_as::<_, Insurance>(
            r#"
            UPDATE insurances
            SET insurer = $2, policy_number = $3, date_from = $4, date_to = $5, description = $6,
                price = $7, insurance_type = $8, vehicle_id = $9, document_id = $10, company_id = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&insurance.insurer)
        .bind(&insurance.policy_number)
        .bind(insurance.date_from)
        .bind(insurance.date_to)
        .bind(&insurance.description)
        .bind(insurance.price)
        .bind(insurance.insurance_type)
        .bind(insurance.vehicle_id)
        .bind(insurance.document_id)
        .bind(insurance.company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM insurances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
