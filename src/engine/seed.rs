//! Default-state generators and roster injection used by hydration.
//!
//! A match that has never been scored carries a generic template; the first
//! time real team records are available the placeholders are overwritten with
//! the actual roster, each player remapped into the sport-specific stat shape
//! with zeroed counters.

use uuid::Uuid;

use crate::engine::{
    basketball::{BasketballLive, PlayerLine},
    cricket::{CricketLive, CricketTeam, SquadPlayer},
    football::{FootballLive, FootballPlayer},
    match_state::{LiveData, MatchMeta, MatchState, MatchStatus, ScoreSummary, Sport, TeamSide},
    volleyball::{ROTATION_SLOTS, VolleyballLive, VolleyballPlayer},
};

/// Basketball starters taken from the top of the roster.
pub const BASKETBALL_STARTERS: usize = 5;
/// Football starters taken from the top of the roster.
pub const FOOTBALL_STARTERS: usize = 11;

/// Roster input for one side, decoupled from the persistence entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSeed {
    /// Team display name.
    pub name: String,
    /// Players in roster order.
    pub players: Vec<PlayerSeed>,
}

/// One roster entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSeed {
    /// Stable player id from the administration store.
    pub player_id: Uuid,
    /// Display name.
    pub name: String,
    /// Position code, when the sport uses one.
    pub position: Option<String>,
    /// Shirt number, when known.
    pub shirt_number: Option<u8>,
}

/// Synthesize a fresh default state for the configured sport.
pub fn default_state(match_id: Uuid, sport: Sport, meta: MatchMeta) -> MatchState {
    let live = match sport {
        Sport::Cricket => LiveData::Cricket(CricketLive::default()),
        Sport::Basketball => LiveData::Basketball(BasketballLive::default()),
        Sport::Football => LiveData::Football(FootballLive::default()),
        Sport::Volleyball => LiveData::Volleyball(VolleyballLive::default()),
    };

    let mut state = MatchState {
        match_id,
        sport,
        status: MatchStatus::Scheduled,
        meta,
        score_summary: ScoreSummary::default(),
        live,
    };
    refresh_summary(&mut state);
    state
}

/// Recompute the display summary from the live payload.
pub fn refresh_summary(state: &mut MatchState) {
    match &state.live {
        LiveData::Cricket(live) => crate::engine::cricket::update_summary(live, &mut state.score_summary),
        LiveData::Basketball(live) => {
            crate::engine::basketball::update_summary(live, &mut state.score_summary)
        }
        LiveData::Football(live) => {
            crate::engine::football::update_summary(live, &mut state.score_summary)
        }
        LiveData::Volleyball(live) => {
            crate::engine::volleyball::update_summary(live, &mut state.score_summary)
        }
    }
}

/// Overwrite placeholder rosters with the real team records, remapping each
/// player into the sport-specific zeroed stat shape and reseeding the
/// starting lineup/rotation.
///
/// Must only be called on a state that has recorded no scoring events; the
/// caller checks [`LiveData::has_recorded_events`].
pub fn inject_rosters(state: &mut MatchState, home: &TeamSeed, away: &TeamSeed) {
    match &mut state.live {
        LiveData::Cricket(live) => {
            live.home_team = cricket_team(home);
            live.away_team = cricket_team(away);
            let batting = match live.batting {
                TeamSide::Home => home,
                TeamSide::Away => away,
            };
            let bowling = match live.batting {
                TeamSide::Home => away,
                TeamSide::Away => home,
            };
            if let [first, second, ..] = batting.players.as_slice() {
                live.set_batters(
                    (first.player_id, first.name.clone()),
                    (second.player_id, second.name.clone()),
                );
            }
            if let Some(opener) = bowling.players.first() {
                live.bowler.player_id = opener.player_id;
                live.bowler.name = opener.name.clone();
            }
        }
        LiveData::Basketball(live) => {
            for (team, seed) in [(&mut live.home, home), (&mut live.away, away)] {
                team.name = seed.name.clone();
                team.players.clear();
                team.lineup.clear();
                for (index, player) in seed.players.iter().enumerate() {
                    let on_floor = index < BASKETBALL_STARTERS;
                    team.players.insert(
                        player.player_id,
                        PlayerLine {
                            name: player.name.clone(),
                            on_floor,
                            ..PlayerLine::default()
                        },
                    );
                    if on_floor {
                        team.lineup.push(player.player_id);
                    }
                }
            }
        }
        LiveData::Football(live) => {
            for (team, seed) in [(&mut live.home, home), (&mut live.away, away)] {
                team.name = seed.name.clone();
                team.squad = seed
                    .players
                    .iter()
                    .map(|player| FootballPlayer {
                        player_id: player.player_id,
                        name: player.name.clone(),
                        shirt_number: player.shirt_number,
                    })
                    .collect();
                team.lineup = seed
                    .players
                    .iter()
                    .take(FOOTBALL_STARTERS)
                    .map(|player| player.player_id)
                    .collect();
            }
        }
        LiveData::Volleyball(live) => {
            for (team, seed) in [(&mut live.home, home), (&mut live.away, away)] {
                team.name = seed.name.clone();
                team.players.clear();
                for player in &seed.players {
                    team.players.insert(
                        player.player_id,
                        VolleyballPlayer {
                            name: player.name.clone(),
                            position: player.position.clone().unwrap_or_default(),
                            ..VolleyballPlayer::default()
                        },
                    );
                }
                // The rotation must stay exactly six entries; short rosters
                // keep placeholder slots at the tail.
                let mut rotation: Vec<Uuid> = seed
                    .players
                    .iter()
                    .take(ROTATION_SLOTS)
                    .map(|player| player.player_id)
                    .collect();
                while rotation.len() < ROTATION_SLOTS {
                    rotation.push(Uuid::new_v4());
                }
                team.rotation = rotation;
            }
        }
    }
    refresh_summary(state);
}

fn cricket_team(seed: &TeamSeed) -> CricketTeam {
    CricketTeam {
        name: seed.name.clone(),
        squad: seed
            .players
            .iter()
            .map(|player| SquadPlayer {
                player_id: player.player_id,
                name: player.name.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    fn meta() -> MatchMeta {
        MatchMeta {
            tournament_name: "Premier Cup".into(),
            venue: "Central Arena".into(),
            start_time: SystemTime::UNIX_EPOCH,
            officials: vec!["A. Umpire".into()],
        }
    }

    fn seed(name: &str, count: usize) -> TeamSeed {
        TeamSeed {
            name: name.into(),
            players: (0..count)
                .map(|index| PlayerSeed {
                    player_id: Uuid::new_v4(),
                    name: format!("{name} Player {index}"),
                    position: (index == 0).then(|| "L".to_string()),
                    shirt_number: Some(index as u8 + 1),
                })
                .collect(),
        }
    }

    #[test]
    fn default_states_match_their_sport() {
        for sport in [
            Sport::Cricket,
            Sport::Basketball,
            Sport::Football,
            Sport::Volleyball,
        ] {
            let state = default_state(Uuid::new_v4(), sport, meta());
            assert_eq!(state.sport, sport);
            assert!(state.live.matches_sport(sport));
            assert!(state.live.structurally_sound());
            assert!(!state.live.has_recorded_events());
            assert_eq!(state.status, MatchStatus::Scheduled);
        }
    }

    #[test]
    fn cricket_default_summary_is_zero_for_zero() {
        let state = default_state(Uuid::new_v4(), Sport::Cricket, meta());
        assert_eq!(state.score_summary.home, "0/0");
    }

    #[test]
    fn basketball_roster_injection_seeds_five_starters() {
        let mut state = default_state(Uuid::new_v4(), Sport::Basketball, meta());
        let home = seed("Hawks", 9);
        let away = seed("Kings", 8);

        inject_rosters(&mut state, &home, &away);

        let LiveData::Basketball(live) = &state.live else {
            panic!("sport changed during injection");
        };
        assert_eq!(live.home.name, "Hawks");
        assert_eq!(live.home.players.len(), 9);
        assert_eq!(live.home.lineup.len(), BASKETBALL_STARTERS);
        assert!(live.home.players[&live.home.lineup[0]].on_floor);
        assert_eq!(live.away.lineup.len(), BASKETBALL_STARTERS);
    }

    #[test]
    fn volleyball_roster_injection_seeds_six_rotation_slots() {
        let mut state = default_state(Uuid::new_v4(), Sport::Volleyball, meta());
        let home = seed("Spikers", 10);
        let away = seed("Blockers", 4);

        inject_rosters(&mut state, &home, &away);

        let LiveData::Volleyball(live) = &state.live else {
            panic!("sport changed during injection");
        };
        assert_eq!(live.home.rotation.len(), ROTATION_SLOTS);
        assert_eq!(
            live.home.rotation,
            home.players
                .iter()
                .take(6)
                .map(|p| p.player_id)
                .collect::<Vec<_>>()
        );
        // Short roster keeps the rotation at six with placeholder tails.
        assert_eq!(live.away.rotation.len(), ROTATION_SLOTS);
        assert_eq!(live.away.players.len(), 4);
        assert!(live.home.players[&home.players[0].player_id].is_libero());
    }

    #[test]
    fn cricket_roster_injection_puts_openers_at_the_crease() {
        let mut state = default_state(Uuid::new_v4(), Sport::Cricket, meta());
        let home = seed("Strikers", 11);
        let away = seed("Bowlers", 11);

        inject_rosters(&mut state, &home, &away);

        let LiveData::Cricket(live) = &state.live else {
            panic!("sport changed during injection");
        };
        assert_eq!(live.striker.player_id, home.players[0].player_id);
        assert_eq!(live.non_striker.player_id, home.players[1].player_id);
        assert_eq!(live.bowler.player_id, away.players[0].player_id);
        assert_eq!(live.home_team.squad.len(), 11);
    }
}
