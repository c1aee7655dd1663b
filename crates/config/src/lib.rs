mod loader;
mod schema;
mod types;

pub use loader::{
    ConfigError, config_path, ensure_config_exists, load, load_from_path, load_from_str,
};
pub use schema::{SchemaViolation, schema, validate};
pub use types::{Config, Multiplexing, Profile};
