use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{CorrectAnswerSet, Question, Quiz};

/// A question as presented in one session: options in session order and the
/// correct-answer set already decoded.
///
/// The correct set is keyed by option text, so shuffling options never changes
/// which options are correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuestion {
    source_index: usize,
    question_text: String,
    options: Vec<String>,
    correct: CorrectAnswerSet,
}

impl SessionQuestion {
    #[must_use]
    pub fn from_question(source_index: usize, question: &Question) -> Self {
        Self {
            source_index,
            question_text: question.question_text().to_owned(),
            options: question.options().to_vec(),
            correct: question.correct_answers(),
        }
    }

    /// Position of this question in the original quiz.
    #[must_use]
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answers(&self) -> &CorrectAnswerSet {
        &self.correct
    }

    #[must_use]
    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Session-local ordering: a uniform permutation of the questions, each with
/// its options independently permuted. The quiz itself is left untouched.
pub fn shuffle_quiz<R: Rng + ?Sized>(quiz: &Quiz, rng: &mut R) -> Vec<SessionQuestion> {
    let mut ordered: Vec<SessionQuestion> = quiz
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| SessionQuestion::from_question(index, question))
        .collect();

    ordered.as_mut_slice().shuffle(rng);
    for question in &mut ordered {
        question.options.as_mut_slice().shuffle(rng);
    }

    ordered
}
