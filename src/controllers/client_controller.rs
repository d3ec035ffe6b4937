use sqlx::MySqlPool;
use tracing::info;
use validator::Validate;

use crate::dto::client_dto::{CreateClientRequest, UpdateClientRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::client::{Client, ClientFilters, ClientStatus};
use crate::models::role::{Action, Module};
use crate::repositories::client_repository::{ClientRepository, NewClient};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct ClientController {
    repository: ClientRepository,
}

impl ClientController {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repository: ClientRepository::new(pool),
        }
    }

    pub async fn list(&self, auth: &AuthenticatedUser, filters: ClientFilters) -> AppResult<Vec<Client>> {
        auth.require(Module::Clientes, Action::View)?;

        self.repository.list(&filters).await
    }

    pub async fn get(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<Client> {
        auth.require(Module::Clientes, Action::View)?;

        self.find(id).await
    }

    /// Alta desde el CRM. Lo que registra un operador queda pendiente de aprobación.
    pub async fn create(
        &self,
        auth: &AuthenticatedUser,
        request: CreateClientRequest,
    ) -> AppResult<ApiResponse<Client>> {
        auth.require(Module::Clientes, Action::Create)?;
        request.validate()?;

        let status = ClientStatus::initial_for(auth.role, request.status);
        let client = self
            .repository
            .create(NewClient {
                name: request.name.trim().to_string(),
                email: request.email.trim().to_lowercase(),
                phone: request.phone,
                company: request.company,
                country: request.country,
                status,
                created_by: Some(auth.user_id),
            })
            .await?;

        info!("🧾 Cliente {} creado por {} ({})", client.name, auth.email, client.status);
        let message = match client.status {
            ClientStatus::Pending => "Cliente registrado, pendiente de aprobación",
            _ => "Cliente creado exitosamente",
        };
        Ok(ApiResponse::success_with_message(client, message))
    }

    pub async fn update(
        &self,
        auth: &AuthenticatedUser,
        id: i64,
        request: UpdateClientRequest,
    ) -> AppResult<ApiResponse<Client>> {
        auth.require(Module::Clientes, Action::Edit)?;
        request.validate()?;

        let mut client = self.find(id).await?;

        // Cambiar el estado equivale a aprobar o bloquear
        if let Some(status) = request.status {
            if status != client.status {
                auth.require(Module::Clientes, Action::Approve)?;
                client.status = status;
            }
        }
        if let Some(name) = request.name {
            client.name = name.trim().to_string();
        }
        if let Some(email) = request.email {
            client.email = email.trim().to_lowercase();
        }
        if let Some(phone) = request.phone {
            client.phone = phone;
        }
        if request.company.is_some() {
            client.company = request.company;
        }
        if request.country.is_some() {
            client.country = request.country;
        }

        let client = self.repository.save(&client).await?;
        Ok(ApiResponse::success_with_message(client, "Cliente actualizado exitosamente"))
    }

    /// pending → active
    pub async fn approve(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<ApiResponse<Client>> {
        auth.require(Module::Clientes, Action::Approve)?;

        let mut client = self.find(id).await?;
        if client.status != ClientStatus::Pending {
            return Err(AppError::Conflict(format!(
                "El cliente {} no está pendiente (estado actual: {})",
                id, client.status
            )));
        }

        client.status = ClientStatus::Active;
        let client = self.repository.save(&client).await?;

        info!("✅ Cliente {} aprobado por {}", client.name, auth.email);
        Ok(ApiResponse::success_with_message(client, "Cliente aprobado exitosamente"))
    }

    pub async fn delete(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<()> {
        auth.require(Module::Clientes, Action::Delete)?;

        let client = self.find(id).await?;
        if self.repository.count_reservations(id).await? > 0 {
            return Err(AppError::Conflict(format!(
                "El cliente {} tiene reservas registradas",
                client.name
            )));
        }

        self.repository.delete(id).await?;
        info!("🗑️ Cliente {} eliminado por {}", client.name, auth.email);
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<Client> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Cliente", id))
    }
}
