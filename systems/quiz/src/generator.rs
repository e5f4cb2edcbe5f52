//! Seeded question generation.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use word_defence_core::QuizQuestion;

use crate::bank::{WordBank, WordEntry};

/// Largest number of options shown for a question.
pub const OPTION_COUNT: usize = 4;

/// Builds questions from a word bank using a reproducible random stream.
#[derive(Debug, Clone)]
pub struct QuestionGenerator {
    rng: ChaCha8Rng,
}

impl QuestionGenerator {
    /// Creates a generator seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Picks a word and assembles its options.
    ///
    /// The word differs from `retired` whenever the bank holds another word.
    /// Distractors have pairwise distinct meanings that differ from the correct
    /// one, so banks with few distinct meanings yield fewer than four options.
    pub fn generate(&mut self, bank: &WordBank, retired: Option<&str>) -> QuizQuestion {
        let current = bank.pick(&mut self.rng, retired);

        let mut others: Vec<&WordEntry> = bank
            .entries()
            .iter()
            .filter(|entry| entry.meaning != current.meaning)
            .collect();
        others.shuffle(&mut self.rng);

        let mut options = vec![current.meaning.clone()];
        for entry in others {
            if options.len() == OPTION_COUNT {
                break;
            }
            if !options.contains(&entry.meaning) {
                options.push(entry.meaning.clone());
            }
        }
        options.shuffle(&mut self.rng);

        let correct = options
            .iter()
            .position(|meaning| *meaning == current.meaning)
            .unwrap_or(0);
        QuizQuestion::new(current.word.clone(), options, correct)
    }
}
