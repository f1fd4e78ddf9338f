use mongodb::bson::{Binary, Bson, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{MongoDaoError, MongoResult};
use crate::dao::models::{
    MatchRecordEntity, MatchSnapshotEntity, RoleAssignmentEntity, TeamRecordEntity,
};
use crate::engine::{MatchState, ScorerRole, Sport};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMatchDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    sport: Sport,
    tournament_name: String,
    venue: String,
    start_time: DateTime,
    officials: Vec<String>,
    home_team: TeamRecordEntity,
    away_team: TeamRecordEntity,
}

impl From<MatchRecordEntity> for MongoMatchDocument {
    fn from(value: MatchRecordEntity) -> Self {
        Self {
            id: value.id,
            sport: value.sport,
            tournament_name: value.tournament_name,
            venue: value.venue,
            start_time: DateTime::from_system_time(value.start_time),
            officials: value.officials,
            home_team: value.home_team,
            away_team: value.away_team,
        }
    }
}

impl From<MongoMatchDocument> for MatchRecordEntity {
    fn from(value: MongoMatchDocument) -> Self {
        Self {
            id: value.id,
            sport: value.sport,
            tournament_name: value.tournament_name,
            venue: value.venue,
            start_time: value.start_time.to_system_time(),
            officials: value.officials,
            home_team: value.home_team,
            away_team: value.away_team,
        }
    }
}

/// The live state is stored as an opaque BSON subtree so the document schema
/// tracks the engine types without a parallel set of Mongo models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSnapshotDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    state: Bson,
    updated_at: DateTime,
}

impl MongoSnapshotDocument {
    pub fn from_entity(entity: MatchSnapshotEntity) -> MongoResult<Self> {
        let id = entity.match_id;
        let state = mongodb::bson::serialize_to_bson(&entity.state)
            .map_err(|source| MongoDaoError::Encode { id, source })?;
        Ok(Self {
            id,
            state,
            updated_at: DateTime::from_system_time(entity.updated_at),
        })
    }

    pub fn into_entity(self) -> MongoResult<MatchSnapshotEntity> {
        let id = self.id;
        let state: MatchState = mongodb::bson::deserialize_from_bson(self.state)
            .map_err(|source| MongoDaoError::Decode { id, source })?;
        Ok(MatchSnapshotEntity {
            match_id: id,
            state,
            updated_at: self.updated_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRoleDocument {
    pub match_id: Uuid,
    pub user_id: Uuid,
    pub role: ScorerRole,
}

impl From<RoleAssignmentEntity> for MongoRoleDocument {
    fn from(value: RoleAssignmentEntity) -> Self {
        Self {
            match_id: value.match_id,
            user_id: value.user_id,
            role: value.role,
        }
    }
}

impl From<MongoRoleDocument> for RoleAssignmentEntity {
    fn from(value: MongoRoleDocument) -> Self {
        Self {
            match_id: value.match_id,
            user_id: value.user_id,
            role: value.role,
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
