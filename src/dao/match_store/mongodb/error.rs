//! Error types shared by the MongoDB storage implementation.

use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

/// Convenient result alias returning [`MongoDaoError`] failures.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Failures that can occur while interacting with MongoDB.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// Required environment variable is missing.
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar {
        /// Variable name.
        var: &'static str,
    },
    /// Connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// Offending URI.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Client construction from options failed.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The initial connection ping never succeeded.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Attempts made before giving up.
        attempts: u32,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A health-check ping failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Index creation failed.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Target collection.
        collection: &'static str,
        /// Index description.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A match fixture write failed.
    #[error("failed to save match `{id}`")]
    SaveMatch {
        /// Match id.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A snapshot write failed.
    #[error("failed to save snapshot for match `{id}`")]
    SaveSnapshot {
        /// Match id.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A role-assignment write failed.
    #[error("failed to save role assignment for match `{id}`")]
    SaveRole {
        /// Match id.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A match fixture read failed.
    #[error("failed to load match `{id}`")]
    LoadMatch {
        /// Match id.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A snapshot read failed.
    #[error("failed to load snapshot for match `{id}`")]
    LoadSnapshot {
        /// Match id.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A role-assignment read failed.
    #[error("failed to load role assignment for match `{id}`")]
    LoadRole {
        /// Match id.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Listing match fixtures failed.
    #[error("failed to list matches")]
    ListMatches {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A stored document could not be decoded back into its entity.
    #[error("failed to decode stored document for match `{id}`")]
    Decode {
        /// Match id.
        id: Uuid,
        /// BSON deserialization error.
        #[source]
        source: mongodb::bson::error::Error,
    },
    /// An entity could not be encoded into BSON.
    #[error("failed to encode document for match `{id}`")]
    Encode {
        /// Match id.
        id: Uuid,
        /// BSON serialization error.
        #[source]
        source: mongodb::bson::error::Error,
    },
}
