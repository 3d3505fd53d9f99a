//! EntityStore: the CRUD operations, plus request validation.

mod crud;
mod validation;
pub use crud::EntityStore;
pub use validation::{Body, RequestValidator};
