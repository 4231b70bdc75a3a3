use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::domain::{AcceptedTerm, Term, TermId, UserId};

/// Storage abstraction for terms and acceptances.
pub trait TermsRepository: Send + Sync {
    fn accept(&self, term_id: &TermId, user_id: &UserId) -> Result<AcceptedTerm, RepositoryError>;
    fn terms(&self) -> Result<Vec<Term>, RepositoryError>;
    fn accepted_by(&self, user_id: &UserId) -> Result<Vec<AcceptedTerm>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("term {0} does not exist")]
    UnknownTerm(TermId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
struct TermsStore {
    terms: Vec<Term>,
    accepted: Vec<AcceptedTerm>,
}

/// Process-local store; terms keep insertion order.
#[derive(Debug, Default)]
pub struct InMemoryTermsRepository {
    store: Mutex<TermsStore>,
}

impl InMemoryTermsRepository {
    pub fn with_terms(terms: Vec<Term>) -> Self {
        Self {
            store: Mutex::new(TermsStore {
                terms,
                accepted: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TermsStore>, RepositoryError> {
        self.store
            .lock()
            .map_err(|_| RepositoryError::Unavailable("terms store poisoned".to_string()))
    }
}

impl TermsRepository for InMemoryTermsRepository {
    fn accept(&self, term_id: &TermId, user_id: &UserId) -> Result<AcceptedTerm, RepositoryError> {
        let mut store = self.lock()?;

        if !store.terms.iter().any(|term| &term.term_id == term_id) {
            return Err(RepositoryError::UnknownTerm(term_id.clone()));
        }

        if let Some(existing) = store
            .accepted
            .iter()
            .find(|accepted| &accepted.term_id == term_id && &accepted.user_id == user_id)
        {
            return Ok(existing.clone());
        }

        let accepted = AcceptedTerm {
            term_id: term_id.clone(),
            user_id: user_id.clone(),
            accepted_at: Utc::now(),
        };
        store.accepted.push(accepted.clone());
        Ok(accepted)
    }

    fn terms(&self) -> Result<Vec<Term>, RepositoryError> {
        Ok(self.lock()?.terms.clone())
    }

    fn accepted_by(&self, user_id: &UserId) -> Result<Vec<AcceptedTerm>, RepositoryError> {
        Ok(self
            .lock()?
            .accepted
            .iter()
            .filter(|accepted| &accepted.user_id == user_id)
            .cloned()
            .collect())
    }
}
