use serde::{Deserialize, Serialize};

use crate::participant::{Participant, ParticipantId};
use crate::seed::SpinSeed;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub winner_name: String,
    pub winner_participant_id: ParticipantId,
    pub timestamp_ms: i64,
    pub seed: SpinSeed,
}

impl HistoryRecord {
    pub fn new(winner: &Participant, timestamp_ms: i64, seed: SpinSeed) -> Self {
        Self {
            winner_name: winner.name.clone(),
            winner_participant_id: winner.id,
            timestamp_ms,
            seed,
        }
    }
}

/// Append-only spin log. Shrinks only through `undo` (one record) or `reset` (all).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<HistoryRecord>,
}

impl History {
    pub fn new(records: Vec<HistoryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }

    pub fn push(&mut self, record: HistoryRecord) {
        self.records.push(record);
    }

    pub fn undo(&mut self) -> Option<HistoryRecord> {
        self.records.pop()
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Most recent first, as history panels list them.
    pub fn recent(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str, seed: &str) -> HistoryRecord {
        HistoryRecord::new(
            &Participant::new(id, name),
            1_700_000_000_000 + id as i64,
            SpinSeed::parse(seed).unwrap(),
        )
    }

    #[test]
    fn push_then_undo_restores_prior_state() {
        let mut history = History::new(vec![record(1, "Andi", "AAAAAA")]);
        let before = history.clone();
        history.push(record(2, "Budi", "BBBBBB"));
        assert_eq!(history.len(), 2);
        let undone = history.undo().unwrap();
        assert_eq!(undone.winner_name, "Budi");
        assert_eq!(history, before);
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut history = History::default();
        assert!(history.undo().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn recent_lists_newest_first() {
        let mut history = History::default();
        history.push(record(1, "Andi", "AAAAAA"));
        history.push(record(2, "Budi", "BBBBBB"));
        let names: Vec<&str> = history.recent().map(|r| r.winner_name.as_str()).collect();
        assert_eq!(names, vec!["Budi", "Andi"]);
        history.reset();
        assert!(history.last().is_none());
    }
}
