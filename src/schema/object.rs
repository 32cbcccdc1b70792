use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{Schema, SchemaViolation};

#[derive(Debug, Clone)]
pub enum FieldKind {
    Any,
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object(Option<Box<ObjectSchema>>),
    Null,
}

impl FieldKind {
    fn name(&self) -> &'static str {
        match self {
            FieldKind::Any => "any",
            FieldKind::String => "a string",
            FieldKind::Integer => "an integer",
            FieldKind::Number => "a number",
            FieldKind::Boolean => "a boolean",
            FieldKind::Array => "an array",
            FieldKind::Object(_) => "an object",
            FieldKind::Null => "null",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::Any => true,
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Array => value.is_array(),
            FieldKind::Object(_) => value.is_object(),
            FieldKind::Null => value.is_null(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    kind: FieldKind,
    required: bool,
}

impl FieldRule {
    #[must_use]
    pub const fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
        }
    }

    #[must_use]
    pub const fn any() -> Self {
        Self::new(FieldKind::Any)
    }

    #[must_use]
    pub const fn string() -> Self {
        Self::new(FieldKind::String)
    }

    #[must_use]
    pub const fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    #[must_use]
    pub const fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    #[must_use]
    pub const fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    #[must_use]
    pub const fn array() -> Self {
        Self::new(FieldKind::Array)
    }

    #[must_use]
    pub fn object(schema: ObjectSchema) -> Self {
        Self::new(FieldKind::Object(Some(Box::new(schema))))
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Field-by-field shape check for JSON objects.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: BTreeMap<String, FieldRule>,
    deny_unknown: bool,
}

impl ObjectSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    /// Reports keys that have no rule.
    #[must_use]
    pub const fn deny_unknown(mut self) -> Self {
        self.deny_unknown = true;
        self
    }

    /// Synchronous form of [`Schema::validate`].
    #[must_use]
    pub fn check(&self, value: &Value) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        self.check_at("", value, &mut violations);
        violations
    }

    fn check_at(&self, prefix: &str, value: &Value, violations: &mut Vec<SchemaViolation>) {
        let Some(object) = value.as_object() else {
            violations.push(SchemaViolation::new(prefix, "must be of type object"));
            return;
        };

        for (name, rule) in &self.fields {
            let path = join_path(prefix, name);
            match object.get(name) {
                None if rule.required => {
                    violations.push(SchemaViolation::new(path, "is required"));
                }
                None => {}
                Some(field) if !rule.kind.matches(field) => {
                    violations.push(SchemaViolation::new(
                        path,
                        format!("must be {}", rule.kind.name()),
                    ));
                }
                Some(field) => {
                    if let FieldKind::Object(Some(nested)) = &rule.kind {
                        nested.check_at(&path, field, violations);
                    }
                }
            }
        }

        if self.deny_unknown {
            self.check_unknown(prefix, object, violations);
        }
    }

    fn check_unknown(
        &self,
        prefix: &str,
        object: &Map<String, Value>,
        violations: &mut Vec<SchemaViolation>,
    ) {
        for key in object.keys() {
            if !self.fields.contains_key(key) {
                violations.push(SchemaViolation::new(
                    join_path(prefix, key),
                    "is not allowed",
                ));
            }
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{}.{}", prefix, name)
    }
}

#[async_trait]
impl Schema for ObjectSchema {
    async fn validate(&self, value: &Value) -> Vec<SchemaViolation> {
        self.check(value)
    }
}
