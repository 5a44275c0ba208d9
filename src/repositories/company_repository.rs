//! Repositorio de Companies
//!
//! Traduce el RowScope resuelto a SQL; toda lectura, update o delete
//! pasa por la query filtrada.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::company::{Company, CreateCompanyRequest};
use crate::services::scope_service::RowScope;
use crate::utils::errors::AppError;

pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Aplica el scope sobre la query; devuelve false si el scope es vacío
    fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &RowScope) -> bool {
        match scope {
            RowScope::All => true,
            RowScope::Company(company_id) => {
                qb.push(" AND id = ").push_bind(*company_id);
                true
            }
            _ => false,
        }
    }

    fn push_search(qb: &mut QueryBuilder<'_, Postgres>, search: &str) {
        let pattern = format!("%{}%", search);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR nip ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    pub async fn list(
        &self,
        scope: &RowScope,
        search: Option<&str>,
        size: i64,
        offset: i64,
    ) -> Result<(Vec<Company>, i64), AppError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM companies WHERE 1=1");
        if !Self::push_scope(&mut count_qb, scope) {
            return Ok((Vec::new(), 0));
        }
        if let Some(search) = search {
            Self::push_search(&mut count_qb, search);
        }
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM companies WHERE 1=1");
        Self::push_scope(&mut qb, scope);
        if let Some(search) = search {
            Self::push_search(&mut qb, search);
        }
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(size)
            .push(" OFFSET ")
            .push_bind(offset);

        let companies = qb
            .build_query_as::<Company>()
            .fetch_all(&self.pool)
            .await?;

        Ok((companies, total))
    }

    pub async fn find_scoped(
        &self,
        scope: &RowScope,
        id: i64,
    ) -> Result<Option<Company>, AppError> {
        let query = match scope {
            RowScope::All => sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
                .bind(id),
            RowScope::Company(company_id) => {
                sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1 AND id = $2")
                    .bind(id)
                    .bind(*company_id)
            }
            _ => return Ok(None),
        };

        Ok(query.fetch_optional(&self.pool).await?)
    }

    pub async fn insert(&self, company: &CreateCompanyRequest) -> Result<Company, AppError> {
        let created = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, description, phone, post_code, address1, address2, city, country, nip, is_internal)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&company.name)
        .bind(&company.description)
        .bind(&company.phone)
        .bind(&company.post_code)
        .bind(&company.address1)
        .bind(&company.address2)
        .bind(&company.city)
        .bind(&company.country)
        .bind(&company.nip)
        .bind(company.is_internal)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, id: i64, company: &CreateCompanyRequest) -> Result<Company, AppError> {
        let updated = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $2, description = $3, phone = $4, post_code = $5, address1 = $6,
                address2 = $7, city = $8, country = $9, nip = $10, is_internal = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&company.name)
        .bind(&company.description)
        .bind(&company.phone)
        .bind(&company.post_code)
        .bind(&company.address1)
        .bind(&company.address2)
        .bind(&company.city)
        .bind(&company.country)
        .bind(&company.nip)
        .bind(company.is_internal)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
