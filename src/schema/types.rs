//! The entries owned by a metamodel: fields, derived fields and constraints.
//!
//! A
//! [`FieldSpec`] couples a name with a matcher and a default, a
//! [`DerivedFieldSpec`] couples a name with a memoized initializer, and a
//! [`ConstraintSpec`] couples a message template with a whole-entity
//! predicate.

use crate::entity::Entity;
use crate::matcher::Matcher;
use log::trace;
use serde_json::Value;
use std::fmt;

/// Initializer for a derived field. Receives the entity and produces the
/// value to cache in its data store.
pub type DerivedFn = Box<dyn Fn(&Entity) -> Value + Send + Sync>;

/// Predicate for a constraint. `None` means the constraint holds; returned
/// values are interpolated positionally into the message template.
pub type ConstraintFn = Box<dyn Fn(&Entity) -> Option<Vec<Value>> + Send + Sync>;

/// A declared field: a named matcher with a default value.
///
/// Field names are unique within one metamodel.
pub struct FieldSpec {
    /// Field name
    pub name: String,
    /// Shape the field's resolved value must have
    pub matcher: Matcher,
    /// Substituted when the stored value is absent or null
    pub default: Value,
}

impl FieldSpec {
    /// Resolve this field's value on `entity`.
    ///
    /// Default substitution applies uniformly whether the key is missing or
    /// present-but-null; any other stored value is returned unchanged.
    pub fn get_value(&self, entity: &Entity) -> Value {
        match entity.raw_get(&self.name) {
            None | Some(Value::Null) => self.default.clone(),
            Some(value) => value,
        }
    }

    /// Apply the matcher to the resolved value, after default substitution.
    ///
    /// A stored null whose default satisfies the matcher is valid.
    pub fn validate(&self, entity: &Entity) -> bool {
        self.matcher.matches(&self.get_value(entity))
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("matcher", &self.matcher.to_string())
            .field("default", &self.default)
            .finish()
    }
}

/// A derived field: a named, memoize-on-first-access computed value.
pub struct DerivedFieldSpec {
    /// Derived field name; also the memoization key in the entity store
    pub name: String,
    pub(crate) initializer: DerivedFn,
}

impl DerivedFieldSpec {
    pub fn new(name: impl Into<String>, initializer: DerivedFn) -> Self {
        Self {
            name: name.into(),
            initializer,
        }
    }

    /// Resolve this derived field's value on `entity`, computing and caching
    /// it on first access.
    ///
    /// The entity's data store doubles as the memoization cache: the
    /// "already computed" check is a presence test under this field's name.
    /// A payload key equal to the name therefore pre-memoizes and the
    /// initializer is never invoked for that entity.
    pub fn get_value(&self, entity: &Entity) -> Value {
        if let Some(value) = entity.raw_get(&self.name) {
            return value;
        }
        // No store borrow is held here; the initializer may resolve other
        // fields on the same entity.
        trace!("computing derived field '{}'", self.name);
        let computed = (self.initializer)(entity);
        entity.memoize(&self.name, computed)
    }
}

impl fmt::Debug for DerivedFieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedFieldSpec")
            .field("name", &self.name)
            .finish()
    }
}

/// A whole-entity invariant named by its violation message.
///
/// Evaluated in declaration order; order affects only the order of emitted
/// messages, never validity.
pub struct ConstraintSpec {
    /// Message template with `{}` positional placeholders
    pub message: String,
    pub(crate) predicate: ConstraintFn,
}

impl ConstraintSpec {
    pub fn new(message: impl Into<String>, predicate: ConstraintFn) -> Self {
        Self {
            message: message.into(),
            predicate,
        }
    }

    /// Evaluate the predicate against `entity`.
    ///
    /// `None` means the constraint holds. Returned values are substituted
    /// into the template's `{}` placeholders in order. A panic inside the
    /// predicate is a programming defect and propagates to the caller.
    pub fn evaluate(&self, entity: &Entity) -> Option<String> {
        let args = (self.predicate)(entity)?;
        Some(format_template(&self.message, &args))
    }
}

impl fmt::Debug for ConstraintSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSpec")
            .field("message", &self.message)
            .finish()
    }
}

/// Render a value for inclusion in a diagnostic: strings bare, everything
/// else as JSON text.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitute `{}` placeholders in `template` with the rendered arguments,
/// left to right. Surplus placeholders are left in place; surplus arguments
/// are ignored.
pub(crate) fn format_template(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut args = args.iter();
    while let Some(at) = rest.find("{}") {
        out.push_str(&rest[..at]);
        match args.next() {
            Some(arg) => out.push_str(&render_value(arg)),
            None => out.push_str("{}"),
        }
        rest = &rest[at + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!("covfefe")), "covfefe");
        assert_eq!(render_value(&json!(null)), "null");
        assert_eq!(render_value(&json!(false)), "false");
        assert_eq!(render_value(&json!(9000)), "9000");
        assert_eq!(render_value(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_format_template() {
        assert_eq!(
            format_template("expected {} to not exceed {}", &[json!(200), json!(100)]),
            "expected 200 to not exceed 100"
        );
        assert_eq!(format_template("no placeholders", &[json!(1)]), "no placeholders");
        assert_eq!(format_template("missing {}", &[]), "missing {}");
        assert_eq!(
            format_template("bare {} string", &[json!("foo")]),
            "bare foo string"
        );
    }
}
