//! Terms of use and per-user acceptance, exposed over HTTP.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{AcceptedTerm, Term, TermId, UserId};
pub use repository::{InMemoryTermsRepository, RepositoryError, TermsRepository};
pub use router::{terms_router, GENERIC_FAILURE_MESSAGE, USER_ID_HEADER};
pub use service::{TermsService, TermsServiceError};
