//! Field resolution and validation message generation.
//!
//! Validation never raises: a field missing its matcher or a constraint
//! firing is reported as a line of text, and all violations are collected
//! in one pass. Only strict resolution of an unknown name is an error.

use super::registry::Metamodel;
use super::types::render_value;
use crate::entity::Entity;
use crate::error::{ModelError, ModelResult};
use serde_json::Value;

impl Metamodel {
    /// The single field-resolution algorithm.
    ///
    /// Declared fields win over derived fields; derived fields are computed
    /// and cached on first access. An undeclared name fails under strict
    /// resolution and falls back to the raw store entry (or null) under
    /// lenient resolution.
    pub fn resolve(&self, entity: &Entity, name: &str, strict: bool) -> ModelResult<Value> {
        if let Some(field) = self.field(name) {
            return Ok(field.get_value(entity));
        }
        if let Some(derived) = self.derived_field(name) {
            return Ok(derived.get_value(entity));
        }
        if strict {
            return Err(ModelError::unknown_field(name, self.type_name()));
        }
        Ok(entity.raw_get(name).unwrap_or(Value::Null))
    }

    /// Collect every violation on `entity`, one line per violation.
    ///
    /// Field violations come first, in declaration order, then constraint
    /// violations in declaration order. No short-circuiting: the result is
    /// the complete set. Repeated calls are idempotent; derived fields
    /// touched by constraint predicates are memoized on the first pass.
    pub fn error_messages(&self, entity: &Entity) -> Vec<String> {
        let mut messages = Vec::new();
        for field in self.fields() {
            let value = field.get_value(entity);
            if !field.matcher.matches(&value) {
                messages.push(format!(
                    "{} expected field '{}' to be {}, got {}",
                    self.message_prefix(entity),
                    field.name,
                    field.matcher,
                    render_value(&value)
                ));
            }
        }
        for constraint in self.constraints() {
            if let Some(message) = constraint.evaluate(entity) {
                messages.push(format!("{} {}", self.message_prefix(entity), message));
            }
        }
        messages
    }

    /// `"<type> '<name>'"` when the type declares a field literally named
    /// `name`, else `"<type> at <store address>"`.
    fn message_prefix(&self, entity: &Entity) -> String {
        match self.field("name") {
            Some(field) => format!(
                "{} '{}'",
                self.type_name(),
                render_value(&field.get_value(entity))
            ),
            None => format!("{} at {}", self.type_name(), entity.identity()),
        }
    }
}
