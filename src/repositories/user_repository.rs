//! Repositorio de Users
//!
//! El scope de empresa excluye siempre las cuentas admin: un manager o
//! worker nunca ve administradores.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::user::{User, UserRole};
use crate::services::scope_service::RowScope;
use crate::utils::errors::AppError;

/// Campos persistidos de un usuario nuevo o reemplazado
pub struct UserRecord {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub company_id: Option<i64>,
    pub password: String,
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &RowScope) -> bool {
        match scope {
            RowScope::All => true,
            RowScope::Company(company_id) => {
                qb.push(" AND company_id = ")
                    .push_bind(*company_id)
                    .push(" AND role <> 'admin'");
                true
            }
            _ => false,
        }
    }

    pub async fn list(
        &self,
        scope: &RowScope,
        company_id: Option<i64>,
        size: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64), AppError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1=1");
        if !Self::push_scope(&mut count_qb, scope) {
            return Ok((Vec::new(), 0));
        }
        if let Some(company_id) = company_id {
            count_qb.push(" AND company_id = ").push_bind(company_id);
        }
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM users WHERE 1=1");
        Self::push_scope(&mut qb, scope);
        if let Some(company_id) = company_id {
            qb.push(" AND company_id = ").push_bind(company_id);
        }
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(size)
            .push(" OFFSET ")
            .push_bind(offset);

        let users = qb.build_query_as::<User>().fetch_all(&self.pool).await?;

        Ok((users, total))
    }

    pub async fn find_scoped(&self, scope: &RowScope, id: i64) -> Result<Option<User>, AppError> {
        let query = match scope {
            RowScope::All => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1").bind(id)
            }
            RowScope::Company(company_id) => sqlx::query_as::<_, User>(
                "SELECT * FROM users WHERE id = $1 AND company_id = $2 AND role <> 'admin'",
            )
            .bind(id)
            .bind(*company_id),
            _ => return Ok(None),
        };

        Ok(query.fetch_optional(&self.pool).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn insert(&self, user: &UserRecord) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, role, company_id, password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role)
        .bind(user.company_id)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, id: i64, user: &UserRecord) -> Result<User, AppError> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, name = $3, role = $4, company_id = $5, password = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role)
        .bind(user.company_id)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
