//! Validation helpers for scoring-event payloads arriving over the wire.

use crate::engine::ScoringEvent;

/// Reject payload values a well-behaved scorer UI can never produce.
///
/// Reducers already degrade gracefully on nonsense values; this check exists
/// so REST/WS clients get a diagnostic instead of a silent partial no-op.
pub fn validate_event(event: &ScoringEvent) -> Result<(), String> {
    match event {
        ScoringEvent::Basket(payload) if !(1..=3).contains(&payload.points) => Err(format!(
            "basket points must be 1, 2 or 3 (got {})",
            payload.points
        )),
        ScoringEvent::Possession { home_pct } if *home_pct > 100 => Err(format!(
            "possession must be a percentage (got {home_pct})"
        )),
        ScoringEvent::Ball(payload) if payload.runs_scored > 7 => Err(format!(
            "implausible runs off a single delivery (got {})",
            payload.runs_scored
        )),
        ScoringEvent::Substitution(payload) if payload.player_in == payload.player_out => {
            Err("substitution must involve two different players".into())
        }
        ScoringEvent::RulesUpdate { rules } if !matches!(rules.best_of, 1 | 3 | 5) => {
            Err(format!("best_of must be 1, 3 or 5 (got {})", rules.best_of))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TeamSide;
    use crate::engine::event::{BasketPayload, SubstitutionPayload};
    use uuid::Uuid;

    #[test]
    fn valid_basket_passes() {
        let event = ScoringEvent::Basket(BasketPayload {
            team: TeamSide::Home,
            points: 3,
            is_make: false,
            player_id: None,
        });
        assert!(validate_event(&event).is_ok());
    }

    #[test]
    fn zero_point_basket_is_rejected() {
        let event = ScoringEvent::Basket(BasketPayload {
            team: TeamSide::Home,
            points: 0,
            is_make: true,
            player_id: None,
        });
        assert!(validate_event(&event).is_err());
    }

    #[test]
    fn self_substitution_is_rejected() {
        let id = Uuid::new_v4();
        let event = ScoringEvent::Substitution(SubstitutionPayload {
            team: TeamSide::Away,
            player_out: id,
            player_in: id,
        });
        assert!(validate_event(&event).is_err());
    }

    #[test]
    fn possession_over_one_hundred_is_rejected() {
        assert!(validate_event(&ScoringEvent::Possession { home_pct: 101 }).is_err());
        assert!(validate_event(&ScoringEvent::Possession { home_pct: 100 }).is_ok());
    }
}
