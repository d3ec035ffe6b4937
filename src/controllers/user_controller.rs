use sqlx::MySqlPool;
use tracing::info;
use validator::Validate;

use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UpdateUserStatusRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::role::{Action, Module};
use crate::models::user::{User, UserFilters, UserResponse, UserStatus};
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::services::auth_service::hash_password;
use crate::utils::errors::{bad_request_error, conflict_error, not_found_error, AppError, AppResult};

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn list(&self, auth: &AuthenticatedUser, filters: UserFilters) -> AppResult<Vec<UserResponse>> {
        auth.require(Module::Usuarios, Action::View)?;

        let users = self.repository.list(&filters).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<UserResponse> {
        auth.require(Module::Usuarios, Action::View)?;

        Ok(self.find(id).await?.into())
    }

    pub async fn create(
        &self,
        auth: &AuthenticatedUser,
        request: CreateUserRequest,
    ) -> AppResult<ApiResponse<UserResponse>> {
        auth.require(Module::Usuarios, Action::Create)?;
        request.validate()?;

        if !auth.role.can_create_role(request.role) {
            return Err(AppError::Forbidden(format!(
                "El rol {} no puede crear usuarios {}",
                auth.role, request.role
            )));
        }

        let email = request.email.trim().to_lowercase();
        if self.repository.email_exists(&email).await? {
            return Err(conflict_error("Usuario", "email", &email));
        }

        let user = self
            .repository
            .create(NewUser {
                name: request.name.trim().to_string(),
                email,
                password_hash: hash_password(request.password).await?,
                role: request.role,
                phone: request.phone,
            })
            .await?;

        info!("👤 Usuario {} ({}) creado por {}", user.email, user.role, auth.email);
        Ok(ApiResponse::success_with_message(user.into(), "Usuario creado exitosamente"))
    }

    pub async fn update(
        &self,
        auth: &AuthenticatedUser,
        id: i64,
        request: UpdateUserRequest,
    ) -> AppResult<ApiResponse<UserResponse>> {
        auth.require(Module::Usuarios, Action::Edit)?;
        request.validate()?;

        let mut user = self.find(id).await?;
        self.ensure_manageable(auth, &user)?;

        if let Some(role) = request.role {
            if role != user.role && !auth.role.can_create_role(role) {
                return Err(AppError::Forbidden(format!(
                    "El rol {} no puede asignar el rol {}",
                    auth.role, role
                )));
            }
            user.role = role;
        }

        if let Some(email) = request.email {
            let email = email.trim().to_lowercase();
            if email != user.email && self.repository.email_exists(&email).await? {
                return Err(conflict_error("Usuario", "email", &email));
            }
            user.email = email;
        }
        if let Some(name) = request.name {
            user.name = name.trim().to_string();
        }
        if let Some(phone) = request.phone {
            user.phone = Some(phone);
        }
        if let Some(password) = request.password {
            user.password_hash = hash_password(password).await?;
        }

        let user = self.repository.save(&user).await?;
        Ok(ApiResponse::success_with_message(user.into(), "Usuario actualizado exitosamente"))
    }

    pub async fn update_status(
        &self,
        auth: &AuthenticatedUser,
        id: i64,
        request: UpdateUserStatusRequest,
    ) -> AppResult<ApiResponse<UserResponse>> {
        auth.require(Module::Usuarios, Action::Edit)?;

        if id == auth.user_id && request.status == UserStatus::Inactive {
            return Err(bad_request_error("No puedes desactivar tu propia cuenta"));
        }

        let mut user = self.find(id).await?;
        self.ensure_manageable(auth, &user)?;

        user.status = request.status;
        let user = self.repository.save(&user).await?;

        info!("👤 Usuario {} ahora está {}", user.email, user.status);
        Ok(ApiResponse::success_with_message(user.into(), "Estado actualizado exitosamente"))
    }

    pub async fn delete(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<()> {
        auth.require(Module::Usuarios, Action::Delete)?;

        if id == auth.user_id {
            return Err(bad_request_error("No puedes eliminar tu propia cuenta"));
        }

        let user = self.find(id).await?;
        self.ensure_manageable(auth, &user)?;

        self.repository.delete(id).await?;
        info!("🗑️ Usuario {} eliminado por {}", user.email, auth.email);
        Ok(())
    }

    fn ensure_manageable(&self, auth: &AuthenticatedUser, target: &User) -> AppResult<()> {
        if auth.role.can_manage_user(target.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "El rol {} no puede administrar usuarios {}",
                auth.role, target.role
            )))
        }
    }

    async fn find(&self, id: i64) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Usuario", id))
    }
}
