use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::models::client::{Client, ClientFilters, ClientStatus};
use crate::utils::errors::AppError;

/// Datos para insertar un cliente
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub country: Option<String>,
    pub status: ClientStatus,
    pub created_by: Option<i64>,
}

pub struct ClientRepository {
    pool: MySqlPool,
}

impl ClientRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, client: NewClient) -> Result<Client, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO clients (name, email, phone, company, country, status, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.company)
        .bind(&client.country)
        .bind(client.status.as_str())
        .bind(client.created_by)
        .execute(&self.pool)
        .await?;

        self.fetch(result.last_insert_id() as i64).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    /// Ficha de cliente ligada a una cuenta del portal
    pub async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    pub async fn list(&self, filters: &ClientFilters) -> Result<Vec<Client>, AppError> {
        let mut query = QueryBuilder::<MySql>::new("SELECT * FROM clients WHERE 1 = 1");

        if let Some(status) = filters.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", search);
            query
                .push(" AND (name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR email LIKE ")
                .push_bind(pattern.clone())
                .push(" OR company LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        query.push(" ORDER BY created_at DESC");

        let clients = query.build_query_as::<Client>().fetch_all(&self.pool).await?;
        Ok(clients)
    }

    pub async fn save(&self, client: &Client) -> Result<Client, AppError> {
        sqlx::query(
            r#"
            UPDATE clients
            SET name = ?, email = ?, phone = ?, company = ?, country = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.company)
        .bind(&client.country)
        .bind(client.status.as_str())
        .bind(client.id)
        .execute(&self.pool)
        .await?;

        self.fetch(client.id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_reservations(&self, id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE client_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn fetch(&self, id: i64) -> Result<Client, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Cliente {} desapareció tras escribirlo", id)))
    }
}
