//! Configuration loaded from `config.toml`.
//!
//! ```toml
//! [paging]
//! footer_inset = { width = 0.0, height = 120.0 }
//! refresh_control = true
//! auto_load_more = true
//!
//! [list]
//! animate = true
//! ```

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, ListConfig, PagingConfig};
