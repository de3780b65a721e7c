use axum::{Router, routing::get};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::config::{
    AdminUserConfig, AppConfig, ConfigError, EmailConfig, GeocoderConfig, JwtConfig, MongoConfig, PasswordConfig,
    PasswordResetConfig, UploadConfig,
};
use crate::handler::auth_handler::AuthHandlerState;
use crate::middlewares::auth_middleware::AuthState;
use crate::repository::bootcamp_repo::MongoBootcampRepository;
use crate::repository::course_repo::MongoCourseRepository;
use crate::repository::mongo_client::MongoDatabase;
use crate::repository::repository_error::RepositoryError;
use crate::repository::user_repo::UserRepositoryImpl;
use crate::router::{auth_router::auth_router, bootcamp_router::bootcamp_router, course_router::course_router};
use crate::service::bootcamp_service::{BootcampService, BootcampServiceImpl};
use crate::service::course_service::{CourseService, CourseServiceImpl};
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::email::{EmailError, SmtpEmailService};
use crate::util::geocoder::{GeocodeError, MapQuestGeocoder};
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::password::{PasswordError, PasswordUtilsImpl};
use crate::util::photo_store::{LocalPhotoStore, PhotoStoreError};
use crate::util::reset_token::ResetTokenGenerator;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Password hasher error: {0}")]
    Password(#[from] PasswordError),

    #[error("Email service error: {0}")]
    Email(#[from] EmailError),

    #[error("Geocoder error: {0}")]
    Geocoder(#[from] GeocodeError),

    #[error("Photo storage error: {0}")]
    PhotoStore(#[from] PhotoStoreError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the HTTP layer needs, already wired. Tests build one of these
/// around in-memory repositories.
#[derive(Clone)]
pub struct AppServices {
    pub user_service: Arc<dyn UserService>,
    pub bootcamp_service: Arc<dyn BootcampService>,
    pub course_service: Arc<dyn CourseService>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub cookie_days: i64,
    pub secure_cookie: bool,
    pub max_upload_bytes: usize,
    pub upload_dir: PathBuf,
}

/// `/api/v1` resources, `/health`, and the uploaded photos under `/uploads`
pub fn build_router(services: &AppServices) -> Router {
    let auth_state = Arc::new(AuthState {
        jwt_utils: services.jwt_utils.clone(),
        user_service: services.user_service.clone(),
    });
    let auth_handler_state = AuthHandlerState {
        user_service: services.user_service.clone(),
        cookie_days: services.cookie_days,
        secure_cookie: services.secure_cookie,
    };

    let api = Router::new()
        .merge(auth_router(auth_handler_state, auth_state.clone()))
        .merge(bootcamp_router(services.bootcamp_service.clone(), auth_state.clone(), services.max_upload_bytes))
        .merge(course_router(services.course_service.clone(), auth_state));

    Router::new()
        .nest("/api/v1", api)
        .route("/health", get(|| async { "OK" }))
        .nest_service("/uploads", ServeDir::new(&services.upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub struct App {
    config: AppConfig,
    router: Router,
    db: MongoDatabase,
}

impl App {
    pub async fn new() -> Result<Self, StartupError> {
        let config = AppConfig::from_env();
        let jwt_config = JwtConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;
        let password_config = PasswordConfig::from_env()?;
        let password_reset_config = PasswordResetConfig::from_env()?;
        let email_config = EmailConfig::from_env()?;
        let geocoder_config = GeocoderConfig::from_env()?;
        let upload_config = UploadConfig::from_env()?;

        let db = MongoDatabase::connect(&mongo_config).await?;
        db.ensure_indexes().await?;

        let user_repo = Arc::new(UserRepositoryImpl::new(&db));
        let bootcamp_repo = Arc::new(MongoBootcampRepository::new(&db));
        let course_repo = Arc::new(MongoCourseRepository::new(&db));

        let cookie_days = jwt_config.cookie_expiration_days;
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let passwords = Arc::new(PasswordUtilsImpl::new(&password_config)?);
        let email = Arc::new(SmtpEmailService::new(email_config)?);
        let geocoder = Arc::new(MapQuestGeocoder::new(geocoder_config)?);
        let photo_store = Arc::new(LocalPhotoStore::new(&upload_config).await?);

        let user_service = Arc::new(UserServiceImpl::new(
            user_repo,
            jwt_utils.clone(),
            passwords,
            ResetTokenGenerator::new(password_reset_config),
            email,
        ));
        Self::create_first_admin_user(&user_service).await;

        let bootcamp_service = Arc::new(BootcampServiceImpl {
            bootcamp_repo: bootcamp_repo.clone(),
            course_repo: course_repo.clone(),
            geocoder,
            photo_store,
            max_photo_bytes: upload_config.max_file_bytes,
        });
        let course_service = Arc::new(CourseServiceImpl { course_repo, bootcamp_repo });

        let services = AppServices {
            user_service,
            bootcamp_service,
            course_service,
            jwt_utils,
            cookie_days,
            secure_cookie: config.is_production(),
            max_upload_bytes: upload_config.max_file_bytes,
            upload_dir: upload_config.upload_dir.clone(),
        };
        let router = build_router(&services);

        Ok(App { config, router, db })
    }

    async fn create_first_admin_user(user_service: &UserServiceImpl) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return;
            }
        };
        if let Err(e) = user_service.create_admin_if_missing(&admin_conf).await {
            error!("Failed to create admin user: {e}");
        }
    }

    pub async fn start(self) -> Result<(), StartupError> {
        let host = self
            .config
            .host
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidValue(format!("Invalid APP_HOST: {}", self.config.host)))?;
        let addr = SocketAddr::new(host, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🚀 Server running in {} mode at http://{}", self.config.environment, addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.db.shutdown().await;
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");
}
