mod loader;
mod schema;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{
    Credentials, PaginationConfig, RunConfig, StatusEntry, WaitConfig, default_worklist,
};
