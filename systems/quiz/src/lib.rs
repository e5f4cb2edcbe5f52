#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Quiz system that poses vocabulary questions whenever the world is between questions.

mod bank;
mod generator;

pub use bank::{WordBank, WordBankError, WordEntry};
pub use generator::{QuestionGenerator, OPTION_COUNT};

use tracing::debug;
use word_defence_core::{Command, Event, QuizPhase};

/// Pure system that replies to an idle quiz with the next question.
#[derive(Debug)]
pub struct Quiz {
    bank: WordBank,
    generator: QuestionGenerator,
    retired: Option<String>,
}

impl Quiz {
    /// Creates a quiz drawing from `bank` with randomness seeded by `seed`.
    #[must_use]
    pub fn new(bank: WordBank, seed: u64) -> Self {
        Self {
            bank,
            generator: QuestionGenerator::new(seed),
            retired: None,
        }
    }

    /// Consumes world events and emits `Command::PoseQuestion` while the quiz is transitioning.
    ///
    /// Commands must be applied before the next call, otherwise a second
    /// question is generated for the same transition.
    pub fn handle(&mut self, events: &[Event], phase: QuizPhase, out: &mut Vec<Command>) {
        for event in events {
            if let Event::AnswerAccepted { word, .. } = event {
                self.retired = Some(word.clone());
            }
        }

        if phase != QuizPhase::Transitioning {
            return;
        }

        let question = self
            .generator
            .generate(&self.bank, self.retired.as_deref());
        debug!(
            word = question.word(),
            options = question.options().len(),
            "generated question"
        );
        out.push(Command::PoseQuestion { question });
    }
}
