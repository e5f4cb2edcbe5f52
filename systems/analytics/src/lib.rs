#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Analytics system that derives session statistics from the world's event stream.

mod metrics;

pub use metrics::{answer_accuracy, defence_rate};

use word_defence_core::{Event, SessionStats};

/// Pure analytics system that folds events into session counters.
#[derive(Debug, Default)]
pub struct Analytics {
    stats: SessionStats,
}

impl Analytics {
    /// Creates a new analytics system with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Consumes world events and updates the counters they affect.
    ///
    /// Returns `true` when at least one counter changed.
    pub fn handle(&mut self, events: &[Event]) -> bool {
        let before = self.stats;
        for event in events {
            let counter = match event {
                Event::MonsterSpawned { .. } => &mut self.stats.monsters_spawned,
                Event::MonsterDefeated { .. } => &mut self.stats.monsters_defeated,
                Event::MonsterEscaped { .. } => &mut self.stats.monsters_escaped,
                Event::TowerPlaced { .. } => &mut self.stats.towers_built,
                Event::BulletFired { .. } => &mut self.stats.bullets_fired,
                Event::AnswerAccepted { .. } => &mut self.stats.answers_correct,
                Event::AnswerRejected { .. } => &mut self.stats.answers_wrong,
                _ => continue,
            };
            *counter = counter.saturating_add(1);
        }
        before != self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::Analytics;
    use std::time::Duration;
    use word_defence_core::{Event, MonsterId};

    #[test]
    fn unrelated_events_leave_counters_untouched() {
        let mut analytics = Analytics::new();
        let changed = analytics.handle(&[
            Event::TimeAdvanced {
                dt: Duration::from_millis(16),
            },
            Event::QuestionPosed {
                word: "apple".to_owned(),
            },
        ]);

        assert!(!changed);
        assert_eq!(analytics.stats(), Default::default());
    }

    #[test]
    fn counters_saturate() {
        let mut analytics = Analytics::new();
        analytics.stats.monsters_escaped = u32::MAX;
        let _ = analytics.handle(&[Event::MonsterEscaped {
            monster: MonsterId::new(1),
        }]);
        assert_eq!(analytics.stats().monsters_escaped, u32::MAX);
    }
}
