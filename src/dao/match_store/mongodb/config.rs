use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

/// Runtime configuration describing how to connect to MongoDB.
#[derive(Clone)]
pub struct MongoConfig {
    /// Parsed client options.
    pub options: ClientOptions,
    /// Database the collections live in.
    pub database_name: String,
}

impl MongoConfig {
    /// Parse a connection URI into a configuration.
    pub async fn from_uri(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
        let database_name = db_name.unwrap_or("scoreline").to_owned();
        let options =
            ClientOptions::parse(uri)
                .await
                .map_err(|source| MongoDaoError::InvalidUri {
                    uri: uri.to_owned(),
                    source,
                })?;

        Ok(Self {
            options,
            database_name,
        })
    }

    /// Build a configuration by reading the expected environment variables.
    pub async fn from_env() -> MongoResult<Self> {
        let uri = std::env::var("MONGO_URI")
            .map_err(|_| MongoDaoError::MissingEnvVar { var: "MONGO_URI" })?;
        let db = std::env::var("MONGO_DB")
            .map_err(|_| MongoDaoError::MissingEnvVar { var: "MONGO_DB" })?;
        Self::from_uri(&uri, Some(&db)).await
    }
}
