//! Bounded undo/redo snapshot stack wrapped around the reducer.
//!
//! Callers record a deep snapshot of the pre-mutation state before every
//! scoring mutation; undo restores the most recent snapshot and redo mirrors
//! it. Any new mutation invalidates the redo stack. History is in-memory
//! only and does not survive a session reload.

use std::collections::VecDeque;

use crate::engine::match_state::MatchState;

/// Default depth of the undo stack.
pub const DEFAULT_UNDO_DEPTH: usize = 50;

/// Linear undo/redo buffer for one match.
#[derive(Debug, Clone, Default)]
pub struct MatchHistory {
    undo: VecDeque<MatchState>,
    redo: Vec<MatchState>,
    depth: usize,
}

impl MatchHistory {
    /// Build a history keeping at most `depth` undo snapshots.
    pub fn new(depth: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(depth.min(64)),
            redo: Vec::new(),
            depth,
        }
    }

    /// Record the pre-mutation snapshot. Drops the oldest entry beyond the
    /// configured depth and invalidates any redo entries.
    pub fn record(&mut self, snapshot: MatchState) {
        if self.depth == 0 {
            return;
        }
        while self.undo.len() >= self.depth {
            self.undo.pop_front();
        }
        self.undo.push_back(snapshot);
        self.redo.clear();
    }

    /// Undo the last mutation: returns the state to restore, pushing the
    /// provided current state onto the redo stack.
    pub fn undo(&mut self, current: &MatchState) -> Option<MatchState> {
        let restored = self.undo.pop_back()?;
        self.redo.push(current.clone());
        Some(restored)
    }

    /// Redo a previously undone mutation.
    pub fn redo(&mut self, current: &MatchState) -> Option<MatchState> {
        let restored = self.redo.pop()?;
        self.undo.push_back(current.clone());
        Some(restored)
    }

    /// Number of undo snapshots currently held.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo snapshots currently held.
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use uuid::Uuid;

    use super::*;
    use crate::engine::{
        football::FootballLive,
        match_state::{LiveData, MatchMeta, MatchStatus, ScoreSummary, Sport},
    };

    fn state_scoring(home_goals: u32) -> MatchState {
        let mut live = FootballLive::default();
        live.home.score = home_goals;
        MatchState {
            match_id: Uuid::nil(),
            sport: Sport::Football,
            status: MatchStatus::Live,
            meta: MatchMeta {
                tournament_name: "Cup".into(),
                venue: "Park".into(),
                start_time: SystemTime::UNIX_EPOCH,
                officials: vec![],
            },
            score_summary: ScoreSummary {
                home: home_goals.to_string(),
                away: "0".into(),
            },
            live: LiveData::Football(live),
        }
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut history = MatchHistory::new(DEFAULT_UNDO_DEPTH);
        let before = state_scoring(0);
        let after = state_scoring(1);

        history.record(before.clone());
        let restored = history.undo(&after).unwrap();
        assert_eq!(restored, before);

        let redone = history.redo(&restored).unwrap();
        assert_eq!(redone, after);
    }

    #[test]
    fn undo_on_empty_history_is_none() {
        let mut history = MatchHistory::new(DEFAULT_UNDO_DEPTH);
        assert!(history.undo(&state_scoring(0)).is_none());
    }

    #[test]
    fn new_mutation_invalidates_redo() {
        let mut history = MatchHistory::new(DEFAULT_UNDO_DEPTH);
        history.record(state_scoring(0));
        history.undo(&state_scoring(1)).unwrap();
        assert_eq!(history.redo_depth(), 1);

        history.record(state_scoring(2));
        assert_eq!(history.redo_depth(), 0);
        assert!(history.redo(&state_scoring(2)).is_none());
    }

    #[test]
    fn depth_is_bounded_dropping_oldest() {
        let mut history = MatchHistory::new(3);
        for goals in 0..5 {
            history.record(state_scoring(goals));
        }
        assert_eq!(history.undo_depth(), 3);

        // The oldest surviving snapshot is the third one recorded.
        let mut last = None;
        let current = state_scoring(9);
        while let Some(state) = history.undo(last.as_ref().unwrap_or(&current)) {
            last = Some(state);
        }
        assert_eq!(last, Some(state_scoring(2)));
    }
}
