mod answer;
mod ids;
mod quiz;

pub use answer::{
    CORRECT_ANSWER_DELIMITER, Classification, CorrectAnswerSet, FeedbackMessage, OptionStatus,
};
pub use ids::{ParseIdError, QuizId, SessionId};
pub use quiz::{Question, Quiz};
