use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::PhaseChange;

/// Phase-change notifications, oldest first, capped at `limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationHistory {
    items: VecDeque<PhaseChange>,
    limit: usize,
}

impl NotificationHistory {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            items: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Append and drop from the front until within the limit.
    pub fn push(&mut self, change: PhaseChange) {
        self.items.push_back(change);
        while self.items.len() > self.limit {
            self.items.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&PhaseChange> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhaseChange> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Phase;
    use chrono::Utc;

    fn change(round: u32) -> PhaseChange {
        PhaseChange {
            id: uuid::Uuid::new_v4(),
            at: Utc::now(),
            from: Phase::Working,
            to: Phase::Resting,
            exercise_name: None,
            next_exercise_name: None,
            current_round: round,
            total_rounds: 10,
        }
    }

    #[test]
    fn push_trims_oldest() {
        let mut history = NotificationHistory::new(3);
        for round in 1..=5 {
            history.push(change(round));
        }
        assert_eq!(history.len(), 3);
        let rounds: Vec<u32> = history.iter().map(|c| c.current_round).collect();
        assert_eq!(rounds, vec![3, 4, 5]);
        assert_eq!(history.latest().map(|c| c.current_round), Some(5));
    }

    #[test]
    fn zero_limit_keeps_one() {
        let mut history = NotificationHistory::new(0);
        history.push(change(1));
        history.push(change(2));
        assert_eq!(history.limit(), 1);
        assert_eq!(history.len(), 1);
    }
}
