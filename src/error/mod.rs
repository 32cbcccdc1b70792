mod client;
mod config;
mod http;
mod schema;
mod validation;

#[cfg(test)]
mod test_support;

pub use client::{ClientError, ClientResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use schema::{SchemaError, SchemaViolation};
pub use validation::ValidationError;
