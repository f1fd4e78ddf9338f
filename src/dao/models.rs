//! Entities shared between the storage backends and the service layer.
//!
//! The match/team/role records are written by the external tournament
//! administration collaborator; the engine only reads them. The snapshot
//! entity is the one document this service writes back, overwritten whole on
//! every mutation.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::engine::{
    MatchMeta, MatchState, ScorerRole, Sport,
    seed::{PlayerSeed, TeamSeed},
};

/// Player entry inside a configured team roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRecordEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Position code, when the sport uses one (`"L"` marks a volleyball libero).
    pub position: Option<String>,
    /// Shirt number, when known.
    pub shirt_number: Option<u8>,
}

/// Configured team roster read from the administration store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamRecordEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Players in roster order.
    pub players: Vec<PlayerRecordEntity>,
}

/// Match fixture record read from the administration store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecordEntity {
    /// Primary key of the match.
    pub id: Uuid,
    /// Sport configured for the fixture.
    pub sport: Sport,
    /// Tournament the match belongs to.
    pub tournament_name: String,
    /// Venue display string.
    pub venue: String,
    /// Scheduled start.
    pub start_time: SystemTime,
    /// Officials announced for the fixture.
    pub officials: Vec<String>,
    /// Home roster.
    pub home_team: TeamRecordEntity,
    /// Away roster.
    pub away_team: TeamRecordEntity,
}

impl MatchRecordEntity {
    /// Envelope metadata derived from the fixture record.
    pub fn meta(&self) -> MatchMeta {
        MatchMeta {
            tournament_name: self.tournament_name.clone(),
            venue: self.venue.clone(),
            start_time: self.start_time,
            officials: self.officials.clone(),
        }
    }
}

impl From<&TeamRecordEntity> for TeamSeed {
    fn from(value: &TeamRecordEntity) -> Self {
        TeamSeed {
            name: value.name.clone(),
            players: value
                .players
                .iter()
                .map(|player| PlayerSeed {
                    player_id: player.id,
                    name: player.name.clone(),
                    position: player.position.clone(),
                    shirt_number: player.shirt_number,
                })
                .collect(),
        }
    }
}

/// Role granted to a user for one match, written by the administration store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleAssignmentEntity {
    /// Match the assignment applies to.
    pub match_id: Uuid,
    /// User holding the role.
    pub user_id: Uuid,
    /// Granted role.
    pub role: ScorerRole,
}

/// Last persisted live snapshot for a match. Overwritten, never versioned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSnapshotEntity {
    /// Match the snapshot belongs to.
    pub match_id: Uuid,
    /// Full match document as last broadcast.
    pub state: MatchState,
    /// Time of the write.
    pub updated_at: SystemTime,
}
