use word_defence_core::SessionStats;

/// Share of answer attempts that were correct, or `None` before the first attempt.
#[must_use]
pub fn answer_accuracy(stats: &SessionStats) -> Option<f32> {
    ratio(stats.answers_correct, stats.answers_wrong)
}

/// Share of finished monsters that were defeated rather than escaping, or
/// `None` while no monster has finished.
#[must_use]
pub fn defence_rate(stats: &SessionStats) -> Option<f32> {
    ratio(stats.monsters_defeated, stats.monsters_escaped)
}

fn ratio(hits: u32, misses: u32) -> Option<f32> {
    let total = u64::from(hits) + u64::from(misses);
    if total == 0 {
        return None;
    }
    Some((f64::from(hits) / total as f64) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_are_undefined_without_samples() {
        let stats = SessionStats::default();
        assert_eq!(answer_accuracy(&stats), None);
        assert_eq!(defence_rate(&stats), None);
    }

    #[test]
    fn ratios_divide_hits_by_attempts() {
        let stats = SessionStats {
            answers_correct: 3,
            answers_wrong: 1,
            monsters_defeated: 1,
            monsters_escaped: 1,
            ..SessionStats::default()
        };
        assert_eq!(answer_accuracy(&stats), Some(0.75));
        assert_eq!(defence_rate(&stats), Some(0.5));
    }
}
