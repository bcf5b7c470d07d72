//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no Axum).
//! Only trait definitions, domain types, and the rules that need no I/O.

pub mod errors;
pub mod pagination;
pub mod repositories;
pub mod validation;

pub use errors::DomainError;
pub use pagination::{PageRequest, Paginated};
pub use repositories::*;
pub use validation::Validate;
