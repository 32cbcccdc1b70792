//! Response body validation.
//!
//! A [`Schema`] inspects a decoded body and reports every violation it finds
//! rather than stopping at the first one. [`ObjectSchema`] covers the common
//! case of checking field presence and JSON types; anything else can plug in
//! through the trait or a plain closure.
mod object;


use async_trait::async_trait;
use serde_json::Value;

pub use crate::error::SchemaViolation;
pub use object::{FieldKind, FieldRule, ObjectSchema};

#[async_trait]
pub trait Schema: Send + Sync {
    /// Returns all violations; an empty vector means the value is valid.
    async fn validate(&self, value: &Value) -> Vec<SchemaViolation>;
}

#[async_trait]
impl<F> Schema for F
where
    F: Fn(&Value) -> Vec<SchemaViolation> + Send + Sync,
{
    async fn validate(&self, value: &Value) -> Vec<SchemaViolation> {
        (self)(value)
    }
}
