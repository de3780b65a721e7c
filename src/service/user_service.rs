use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::DateTime;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::config::AdminUserConfig;
use crate::dto::auth_dto::{RegisterRequest, UpdateDetailsRequest};
use crate::model::user::{AuthUser, Role, User};
use crate::repository::user_repo::UserRepository;
use crate::util::email::{EmailSender, PasswordResetEmail};
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use crate::util::password::PasswordUtils;
use crate::util::reset_token::{hash_token, ResetTokenGenerator};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[async_trait]
pub trait UserService: Send + Sync {
    /// Creates the account and returns a session token
    async fn register(&self, request: RegisterRequest) -> Result<String, ServiceError>;
    async fn login(&self, email: &str, password: &str) -> Result<String, ServiceError>;
    async fn me(&self, actor: &AuthUser) -> Result<User, ServiceError>;
    async fn update_details(&self, actor: &AuthUser, request: UpdateDetailsRequest) -> Result<User, ServiceError>;
    async fn update_password(&self, actor: &AuthUser, current_password: &str, new_password: &str) -> Result<String, ServiceError>;
    async fn forgot_password(&self, email: &str) -> Result<(), ServiceError>;
    async fn reset_password(&self, raw_token: &str, new_password: &str) -> Result<String, ServiceError>;
    /// Loads the user behind a verified session token
    async fn authenticate(&self, user_id: &str) -> Result<AuthUser, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub passwords: Arc<dyn PasswordUtils>,
    pub reset_tokens: ResetTokenGenerator,
    pub email: Arc<dyn EmailSender>,
}

impl UserServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        jwt_utils: Arc<JwtTokenUtilsImpl>,
        passwords: Arc<dyn PasswordUtils>,
        reset_tokens: ResetTokenGenerator,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self { user_repo, jwt_utils, passwords, reset_tokens, email }
    }

    fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        let id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("User has no id".to_string()))?;
        self.jwt_utils
            .generate_token(&id.to_hex())
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }

    fn hash(&self, password: &str) -> Result<String, ServiceError> {
        self.passwords
            .hash_password(password)
            .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))
    }

    async fn load(&self, id: &ObjectId) -> Result<User, ServiceError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No user with the id of {}", id.to_hex())))
    }

    /// Seeds the configured admin account unless that email is already taken
    #[instrument(skip(self, config), fields(email = %config.email))]
    pub async fn create_admin_if_missing(&self, config: &AdminUserConfig) -> Result<(), ServiceError> {
        if self.user_repo.find_by_email(&config.email).await?.is_some() {
            info!("Admin user already exists, skipping creation");
            return Ok(());
        }
        let hash = self.hash(&config.password)?;
        let admin = User::new(config.name.clone(), config.email.clone(), Role::Admin, hash);
        self.user_repo.insert(admin).await?;
        info!("First admin user created");
        Ok(())
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn register(&self, request: RegisterRequest) -> Result<String, ServiceError> {
        info!("Registering new user");
        let hash = self.hash(&request.password)?;
        let user = User::new(request.name, request.email, request.role.into(), hash);
        let inserted = self.user_repo.insert(user).await.map_err(|e| {
            error!("Failed to insert user: {}", e);
            ServiceError::from(e)
        })?;
        self.issue_token(&inserted)
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<String, ServiceError> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            self.passwords.verify_dummy(password);
            warn!("Login attempt for unknown email");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let valid = self.passwords.verify_password(password, &user.password).map_err(|e| {
            error!("Stored password hash unusable: {}", e);
            ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string())
        })?;
        if !valid {
            warn!("Wrong password for user");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        info!("User logged in successfully");
        self.issue_token(&user)
    }

    async fn me(&self, actor: &AuthUser) -> Result<User, ServiceError> {
        self.load(&actor.id).await
    }

    #[instrument(skip(self, request), fields(user = %actor.id))]
    async fn update_details(&self, actor: &AuthUser, request: UpdateDetailsRequest) -> Result<User, ServiceError> {
        let mut user = self.load(&actor.id).await?;
        if let Some(name) = request.name {
            user.name = name;
        }
        if let Some(email) = request.email {
            user.email = email.to_lowercase();
        }
        self.user_repo.update(&user).await?;
        info!("User details updated");
        Ok(user)
    }

    #[instrument(skip(self, current_password, new_password), fields(user = %actor.id))]
    async fn update_password(&self, actor: &AuthUser, current_password: &str, new_password: &str) -> Result<String, ServiceError> {
        let mut user = self.load(&actor.id).await?;
        let valid = self
            .passwords
            .verify_password(current_password, &user.password)
            .map_err(|e| ServiceError::InternalError(format!("Password verify error: {}", e)))?;
        if !valid {
            return Err(ServiceError::Unauthorized("Password is incorrect".to_string()));
        }

        user.password = self.hash(new_password)?;
        self.user_repo.update(&user).await?;
        info!("Password updated");
        self.issue_token(&user)
    }

    #[instrument(skip(self))]
    async fn forgot_password(&self, email: &str) -> Result<(), ServiceError> {
        let mut user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("There is no user with that email".to_string()))?;

        let token = self.reset_tokens.generate();
        user.reset_password_token = Some(token.hashed.clone());
        user.reset_password_expire = Some(DateTime::from_chrono(token.expires_at));
        // Persisted first so a delivered link always has a matching record
        self.user_repo.update(&user).await?;

        let message = PasswordResetEmail {
            to: user.email.clone(),
            user_name: user.name.clone(),
            reset_url: self.reset_tokens.reset_url(&token.raw),
            expires_in_minutes: self.reset_tokens.expiration_minutes(),
        };

        if let Err(e) = self.email.send_password_reset_email(message).await {
            error!("Reset email failed, clearing token: {}", e);
            user.clear_reset_token();
            if let Err(rollback) = self.user_repo.update(&user).await {
                error!("Failed to clear reset token after email failure: {}", rollback);
            }
            return Err(ServiceError::Upstream("Email could not be sent".to_string()));
        }

        info!("Password reset email sent");
        Ok(())
    }

    #[instrument(skip(self, raw_token, new_password))]
    async fn reset_password(&self, raw_token: &str, new_password: &str) -> Result<String, ServiceError> {
        let hashed = hash_token(raw_token);
        let mut user = self
            .user_repo
            .find_by_reset_token(&hashed, DateTime::now())
            .await?
            .ok_or_else(|| ServiceError::InvalidInput("Invalid token".to_string()))?;

        user.password = self.hash(new_password)?;
        user.clear_reset_token();
        self.user_repo.update(&user).await?;
        info!("Password reset successfully");
        self.issue_token(&user)
    }

    async fn authenticate(&self, user_id: &str) -> Result<AuthUser, ServiceError> {
        let unauthorized = || ServiceError::Unauthorized("Not authorized to access this route".to_string());
        let id = ObjectId::parse_str(user_id).map_err(|_| unauthorized())?;
        let user = self.user_repo.find_by_id(&id).await?.ok_or_else(unauthorized)?;
        user.to_auth_user().ok_or_else(unauthorized)
    }
}
