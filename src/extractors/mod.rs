pub mod payload;

pub use payload::JsonObject;
