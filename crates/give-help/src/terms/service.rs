use std::sync::Arc;

use super::domain::{AcceptedTerm, Term, TermId, UserId};
use super::repository::{RepositoryError, TermsRepository};

/// Domain entry point used by the HTTP handlers.
pub struct TermsService<R> {
    repository: Arc<R>,
}

impl<R> TermsService<R>
where
    R: TermsRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Records that `user_id` accepted `term_id`.
    pub fn accept(
        &self,
        term_id: &TermId,
        user_id: &UserId,
    ) -> Result<AcceptedTerm, TermsServiceError> {
        Ok(self.repository.accept(term_id, user_id)?)
    }

    pub fn list_terms(&self) -> Result<Vec<Term>, TermsServiceError> {
        Ok(self.repository.terms()?)
    }

    pub fn list_accepted(&self, user_id: &UserId) -> Result<Vec<AcceptedTerm>, TermsServiceError> {
        Ok(self.repository.accepted_by(user_id)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TermsServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
