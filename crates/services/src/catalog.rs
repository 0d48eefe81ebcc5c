use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use quiz_core::model::{Quiz, QuizId};

use crate::error::CatalogError;

/// Presentation-agnostic entry for a quiz picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizListItem {
    pub id: QuizId,
    pub title: String,
    pub question_count: usize,
}

/// A quiz file holds either one quiz document or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuizDocuments {
    Many(Vec<Quiz>),
    One(Quiz),
}

/// In-memory set of quizzes handed over by the data-fetching collaborator.
///
/// Every quiz in the catalog has an id: documents without `_id` receive their
/// 1-based position in load order.
#[derive(Debug, Clone, Default)]
pub struct QuizCatalog {
    quizzes: Vec<Quiz>,
}

impl QuizCatalog {
    /// Build a catalog, assigning positional ids where missing.
    ///
    /// A quiz without an id takes its 1-based position, or the next free
    /// position if an explicit id already claims it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two quizzes share an explicit id.
    pub fn new(quizzes: Vec<Quiz>) -> Result<Self, CatalogError> {
        let mut taken = HashSet::new();
        for id in quizzes.iter().filter_map(Quiz::id) {
            if !taken.insert(id.clone()) {
                return Err(CatalogError::DuplicateId(id.clone()));
            }
        }

        let quizzes: Vec<Quiz> = quizzes
            .into_iter()
            .enumerate()
            .map(|(position, quiz)| {
                if quiz.id().is_some() {
                    return quiz;
                }
                let id = (position..)
                    .map(QuizId::positional)
                    .find(|candidate| !taken.contains(candidate))
                    .unwrap_or_else(|| QuizId::positional(position));
                taken.insert(id.clone());
                quiz.with_id(id)
            })
            .collect();

        tracing::debug!(quizzes = quizzes.len(), "quiz catalog loaded");
        Ok(Self { quizzes })
    }

    /// Decode a JSON quiz document or array of documents.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Json` for malformed input and
    /// `CatalogError::DuplicateId` for clashing ids.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let quizzes = match serde_json::from_str::<QuizDocuments>(raw)? {
            QuizDocuments::Many(quizzes) => quizzes,
            QuizDocuments::One(quiz) => vec![quiz],
        };
        Self::new(quizzes)
    }

    /// Read and decode a JSON quiz file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise see
    /// [`QuizCatalog::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Quizzes available for selection, in load order.
    #[must_use]
    pub fn list(&self) -> Vec<QuizListItem> {
        self.quizzes
            .iter()
            .filter_map(|quiz| {
                quiz.id().map(|id| QuizListItem {
                    id: id.clone(),
                    title: quiz.title().to_owned(),
                    question_count: quiz.question_count(),
                })
            })
            .collect()
    }

    /// Look up a quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no quiz has this id.
    pub fn get(&self, id: &QuizId) -> Result<&Quiz, CatalogError> {
        self.quizzes
            .iter()
            .find(|quiz| quiz.id() == Some(id))
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}
