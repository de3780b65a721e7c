use bson::{doc, Document};
use mongodb::{
    options::{ClientOptions, Credential, IndexOptions, ResolverConfig},
    Client, Collection, Database, IndexModel,
};
use std::time::Duration;
use tracing::{info, instrument};

use crate::config::MongoConfig;
use crate::repository::repository_error::RepositoryResult;

pub const USERS: &str = "users";
pub const BOOTCAMPS: &str = "bootcamps";
pub const COURSES: &str = "courses";

/// Handle to the application database. Created once at startup, cloned into
/// each repository and shut down after the HTTP server stops.
#[derive(Clone, Debug)]
pub struct MongoDatabase {
    client: Client,
    db: Database,
}

impl MongoDatabase {
    #[instrument(skip(config), fields(database = %config.database))]
    pub async fn connect(config: &MongoConfig) -> RepositoryResult<Self> {
        let mut client_options = ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
        client_options.app_name = Some(config.app_name.clone());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout = Some(Duration::from_secs(config.connection_timeout_secs));
        client_options.server_selection_timeout = Some(Duration::from_secs(config.connection_timeout_secs));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            client_options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(password.clone())
                    .build(),
            );
        }

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database);
        db.run_command(doc! { "ping": 1 }, None).await?;
        info!("Connected to MongoDB");

        Ok(MongoDatabase { client, db })
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T> {
        self.db.collection::<T>(name)
    }

    /// Unique emails and bootcamp names, the geo index radius search needs,
    /// and the course → bootcamp lookup index
    #[instrument(skip(self))]
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.collection::<Document>(USERS)
            .create_index(IndexModel::builder().keys(doc! { "email": 1 }).options(unique()).build(), None)
            .await?;

        let bootcamps = self.collection::<Document>(BOOTCAMPS);
        bootcamps
            .create_index(IndexModel::builder().keys(doc! { "name": 1 }).options(unique()).build(), None)
            .await?;
        bootcamps
            .create_index(IndexModel::builder().keys(doc! { "location": "2dsphere" }).build(), None)
            .await?;

        self.collection::<Document>(COURSES)
            .create_index(IndexModel::builder().keys(doc! { "bootcamp": 1 }).build(), None)
            .await?;

        info!("MongoDB indexes ensured");
        Ok(())
    }

    pub async fn shutdown(self) {
        info!("Closing MongoDB connections");
        self.client.shutdown().await;
    }
}
