//! Client configuration loading.
mod loader;
mod parse;
pub mod types;


pub use loader::{load_config, load_config_file};
pub use parse::parse_header;
pub use types::ClientConfig;
