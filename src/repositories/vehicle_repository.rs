//! Repositorio de Vehicles

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::vehicle::{CreateVehicleRequest, Vehicle, VehicleAvailability};
use crate::services::scope_service::RowScope;
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &RowScope) -> bool {
        match scope {
            RowScope::All => true,
            RowScope::Company(company_id) => {
                qb.push(" AND company_id = ").push_bind(*company_id);
                true
            }
            _ => false,
        }
    }

    fn push_filters(
        qb: &mut QueryBuilder<'_, Postgres>,
        company_id: Option<i64>,
        search: Option<&str>,
        status: Option<VehicleAvailability>,
    ) {
        if let Some(company_id) = company_id {
            qb.push(" AND company_id = ").push_bind(company_id);
        }
        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (brand ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR model ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR registration_number ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(status) = status {
            qb.push(" AND availability = ").push_bind(status);
        }
    }

    pub async fn list(
        &self,
        scope: &RowScope,
        company_id: Option<i64>,
        search: Option<&str>,
        status: Option<VehicleAvailability>,
        size: i64,
        offset: i64,
    ) -> Result<(Vec<Vehicle>, i64), AppError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM vehicles WHERE 1=1");
        if !Self::push_scope(&mut count_qb, scope) {
            return Ok((Vec::new(), 0));
        }
        Self::push_filters(&mut count_qb, company_id, search, status);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM vehicles WHERE 1=1");
        Self::push_scope(&mut qb, scope);
        Self::push_filters(&mut qb, company_id, search, status);
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(size)
            .push(" OFFSET ")
            .push_bind(offset);

        let vehicles = qb.build_query_as::<Vehicle>().fetch_all(&self.pool).await?;

        Ok((vehicles, total))
    }

    pub async fn find_scoped(
        &self,
        scope: &RowScope,
        id: i64,
    ) -> Result<Option<Vehicle>, AppError> {
        let query = match scope {
            RowScope::All => {
                sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1").bind(id)
            }
            RowScope::Company(company_id) => sqlx::query_as::<_, Vehicle>(
                "SELECT * FROM vehicles WHERE id = $1 AND company_id = $2",
            )
            .bind(id)
            .bind(*company_id),
            _ => return Ok(None),
        };

        Ok(query.fetch_optional(&self.pool).await?)
    }

    pub async fn insert(&self, vehicle: &CreateVehicleRequest) -> Result<Vehicle, AppError> {
        let created = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id_number, vin, weight, registration_number, brand, model,
                                  production_year, kilometrage, gearbox_type, availability,
                                  tire_type, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&vehicle.id_number)
        .bind(&vehicle.vin)
        .bind(vehicle.weight)
        .bind(&vehicle.registration_number)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.production_year)
        .bind(vehicle.kilometrage)
        .bind(vehicle.gearbox_type)
        .bind(vehicle.availability)
        .bind(vehicle.tire_type)
        .bind(vehicle.company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, id: i64, vehicle: &CreateVehicleRequest) -> Result<Vehicle, AppError> {
        let updated = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET id_number = $2, vin = $3, weight = $4, registration_number = $5, brand = $6,
                model = $7, production_year = $8, kilometrage = $9, gearbox_type = $10,
                availability = $11, tire_type = $12, company_id = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&vehicle.id_number)
        .bind(&vehicle.vin)
        .bind(vehicle.weight)
        .bind(&vehicle.registration_number)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.production_year)
        .bind(vehicle.kilometrage)
        .bind(vehicle.gearbox_type)
        .bind(vehicle.availability)
        .bind(vehicle.tire_type)
        .bind(vehicle.company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
