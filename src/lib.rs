//! Space missions: REST backend for scientists, the planets they visit, and the missions joining them.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod seed;
pub mod serializer;
pub mod service;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{app, common_routes, entity_routes};
pub use seed::seed_demo_data;
pub use service::EntityStore;
pub use state::AppState;
pub use store::{connect, connect_in_memory};
