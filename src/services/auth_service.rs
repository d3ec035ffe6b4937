use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::MySqlPool;
use tracing::info;
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::role::{Action, Module, Role};
use crate::models::user::{User, UserResponse};
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::services::jwt_service::JwtService;
use crate::utils::errors::{AppError, AppResult};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Hash bcrypt fuera del runtime async
pub async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de hash abortada: {}", e)))?
        .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))
}

/// Verificación bcrypt fuera del runtime async
pub async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de verificación abortada: {}", e)))?
        .map_err(|e| AppError::Hash(format!("Error verificando password: {}", e)))
}

/// Servicio de autenticación
pub struct AuthService {
    users: UserRepository,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(pool: MySqlPool, jwt: JwtService) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Login con email y password
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email.trim().to_lowercase())
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(request.password, user.password_hash.clone()).await? {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active() {
            return Err(AppError::Forbidden("La cuenta está inactiva".to_string()));
        }

        info!("🔐 Login de {} ({})", user.email, user.role);
        self.issue_token(user)
    }

    /// Alta de una cuenta del portal de clientes
    pub async fn register(&self, request: RegisterRequest) -> AppResult<LoginResponse> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        if self.users.email_exists(&email).await? {
            return Err(AppError::Conflict(format!("El email '{}' ya está registrado", email)));
        }

        let new_user = NewUser {
            name: request.name.trim().to_string(),
            email,
            password_hash: hash_password(request.password).await?,
            role: Role::Cliente,
            phone: Some(request.phone),
        };

        let (user, client) = self
            .users
            .create_portal_account(new_user, request.company, request.country)
            .await?;

        info!("🆕 Cliente {} registrado desde el portal (cliente {})", user.email, client.id);
        self.issue_token(user)
    }

    pub async fn me(&self, auth: &AuthenticatedUser) -> AppResult<UserResponse> {
        let user = self.current_user(auth).await?;
        Ok(user.into())
    }

    /// Actualización del perfil propio
    pub async fn update_profile(
        &self,
        auth: &AuthenticatedUser,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        auth.require(Module::Perfil, Action::Edit)?;
        request.validate()?;

        let mut user = self.current_user(auth).await?;
        if let Some(name) = request.name {
            user.name = name.trim().to_string();
        }
        if let Some(phone) = request.phone {
            user.phone = Some(phone);
        }
        if let Some(password) = request.password {
            user.password_hash = hash_password(password).await?;
        }

        Ok(self.users.save(&user).await?.into())
    }

    async fn current_user(&self, auth: &AuthenticatedUser) -> AppResult<User> {
        self.users
            .find_by_id(auth.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))
    }

    fn issue_token(&self, user: User) -> AppResult<LoginResponse> {
        let (token, expires_at) = self.jwt.generate_token(user.id, &user.email, user.role)?;

        Ok(LoginResponse {
            token,
            expires_at,
            user: user.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify_password() {
        let hashed = hash_password("s3cret-pass".to_string()).await.unwrap();
        assert_ne!(hashed, "s3cret-pass");
        assert!(verify_password("s3cret-pass".to_string(), hashed.clone()).await.unwrap());
        assert!(!verify_password("wrong-pass".to_string(), hashed).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_hash() {
        let result = verify_password("x".to_string(), "not-a-bcrypt-hash".to_string()).await;
        assert!(matches!(result, Err(AppError::Hash(_))));
    }
}
