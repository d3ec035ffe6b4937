use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::models::client::{Client, ClientStatus};
use crate::models::role::Role;
use crate::models::user::{User, UserFilters, UserStatus};
use crate::utils::errors::AppError;

/// Datos para insertar una cuenta
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
}

pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn list(&self, filters: &UserFilters) -> Result<Vec<User>, AppError> {
        let mut query = QueryBuilder::<MySql>::new("SELECT * FROM users WHERE 1 = 1");

        if let Some(role) = filters.role {
            query.push(" AND role = ").push_bind(role.as_str());
        }
        if let Some(status) = filters.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        query.push(" ORDER BY created_at DESC");

        let users = query.build_query_as::<User>().fetch_all(&self.pool).await?;
        Ok(users)
    }

    pub async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role, phone, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.phone)
        .bind(UserStatus::Active.as_str())
        .execute(&self.pool)
        .await?;

        self.fetch(result.last_insert_id() as i64).await
    }

    /// Cuenta CLIENTE y su ficha de cliente, en una sola transacción
    pub async fn create_portal_account(
        &self,
        user: NewUser,
        company: Option<String>,
        country: Option<String>,
    ) -> Result<(User, Client), AppError> {
        let mut tx = self.pool.begin().await?;

        let user_id = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role, phone, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Role::Cliente.as_str())
        .bind(&user.phone)
        .bind(UserStatus::Active.as_str())
        .execute(&mut *tx)
        .await?
        .last_insert_id() as i64;

        let client_id = sqlx::query(
            r#"
            INSERT INTO clients (name, email, phone, company, country, status, created_by, user_id)
            VALUES (?, ?, ?, ?, ?, ?, NULL, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.phone.as_deref().unwrap_or_default())
        .bind(company)
        .bind(country)
        .bind(ClientStatus::Active.as_str())
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .last_insert_id() as i64;

        let created_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
            .bind(client_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((created_user, client))
    }

    /// Persistir todos los campos editables
    pub async fn save(&self, user: &User) -> Result<User, AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, password_hash = ?, role = ?, phone = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.phone)
        .bind(user.status.as_str())
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        self.fetch(user.id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch(&self, id: i64) -> Result<User, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Usuario {} desapareció tras escribirlo", id)))
    }
}
