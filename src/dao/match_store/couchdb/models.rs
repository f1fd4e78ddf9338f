use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::CouchDaoError;
use crate::dao::models::{
    MatchRecordEntity, MatchSnapshotEntity, RoleAssignmentEntity, TeamRecordEntity,
};
use crate::engine::{MatchState, ScorerRole, Sport};

pub const MATCH_PREFIX: &str = "match::";
pub const SNAPSHOT_PREFIX: &str = "snapshot::";
pub const ROLE_PREFIX: &str = "role::";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    #[allow(dead_code)]
    pub id: String,
    #[serde(default)]
    pub doc: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchMatchDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub fixture: MatchBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchBody {
    pub sport: Sport,
    pub tournament_name: String,
    pub venue: String,
    pub start_time: SystemTime,
    pub officials: Vec<String>,
    pub home_team: TeamRecordEntity,
    pub away_team: TeamRecordEntity,
}

impl CouchMatchDocument {
    pub fn from_entity(entity: MatchRecordEntity) -> Self {
        Self {
            id: match_doc_id(entity.id),
            rev: None,
            fixture: MatchBody {
                sport: entity.sport,
                tournament_name: entity.tournament_name,
                venue: entity.venue,
                start_time: entity.start_time,
                officials: entity.officials,
                home_team: entity.home_team,
                away_team: entity.away_team,
            },
        }
    }

    pub fn try_into_entity(self) -> Result<MatchRecordEntity, CouchDaoError> {
        Ok(MatchRecordEntity {
            id: extract_uuid(&self.id)?,
            sport: self.fixture.sport,
            tournament_name: self.fixture.tournament_name,
            venue: self.fixture.venue,
            start_time: self.fixture.start_time,
            officials: self.fixture.officials,
            home_team: self.fixture.home_team,
            away_team: self.fixture.away_team,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchSnapshotDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub snapshot: SnapshotBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotBody {
    pub state: MatchState,
    pub updated_at: SystemTime,
}

impl CouchSnapshotDocument {
    pub fn from_entity(entity: MatchSnapshotEntity) -> Self {
        Self {
            id: snapshot_doc_id(entity.match_id),
            rev: None,
            snapshot: SnapshotBody {
                state: entity.state,
                updated_at: entity.updated_at,
            },
        }
    }

    pub fn try_into_entity(self) -> Result<MatchSnapshotEntity, CouchDaoError> {
        Ok(MatchSnapshotEntity {
            match_id: extract_uuid(&self.id)?,
            state: self.snapshot.state,
            updated_at: self.snapshot.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchRoleDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub assignment: RoleBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleBody {
    pub match_id: Uuid,
    pub user_id: Uuid,
    pub role: ScorerRole,
}

impl CouchRoleDocument {
    pub fn from_entity(entity: RoleAssignmentEntity) -> Self {
        Self {
            id: role_doc_id(entity.match_id, entity.user_id),
            rev: None,
            assignment: RoleBody {
                match_id: entity.match_id,
                user_id: entity.user_id,
                role: entity.role,
            },
        }
    }
}

impl From<CouchRoleDocument> for RoleAssignmentEntity {
    fn from(doc: CouchRoleDocument) -> Self {
        Self {
            match_id: doc.assignment.match_id,
            user_id: doc.assignment.user_id,
            role: doc.assignment.role,
        }
    }
}

pub fn match_doc_id(id: Uuid) -> String {
    format!("{MATCH_PREFIX}{id}")
}

pub fn snapshot_doc_id(id: Uuid) -> String {
    format!("{SNAPSHOT_PREFIX}{id}")
}

pub fn role_doc_id(match_id: Uuid, user_id: Uuid) -> String {
    format!("{ROLE_PREFIX}{match_id}:{user_id}")
}

pub fn extract_uuid(doc_id: &str) -> Result<Uuid, CouchDaoError> {
    let (_, id) = doc_id
        .split_once("::")
        .ok_or_else(|| CouchDaoError::InvalidDocId {
            doc_id: doc_id.to_string(),
            kind: "missing separator",
        })?;

    Uuid::parse_str(id).map_err(|_| CouchDaoError::InvalidDocId {
        doc_id: doc_id.to_string(),
        kind: "invalid UUID",
    })
}
