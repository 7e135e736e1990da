//! The metamodel registry and its build-once lifecycle.
//!
//! A [`ModelSchema`] is declared once per record type, usually as a
//! `static`, holding the type name and a schema-building routine. The
//! routine is executed exactly once, on the first access from any thread,
//! producing an immutable [`Metamodel`] that every entity of the type
//! shares by reference for the rest of the process.
//!
//! The routine receives a [`SchemaBuilder`] handle and registers fields,
//! derived fields and constraints through it; there is no implicit
//! "current schema" state anywhere.

use super::types::{ConstraintSpec, DerivedFieldSpec, FieldSpec};
use crate::entity::Entity;
use crate::error::{ModelError, ModelResult, SchemaError, SchemaResult};
use crate::matcher::Matcher;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// A schema-building routine. Plain function pointer so record types can be
/// declared in `const` context; non-capturing closures coerce.
pub type SchemaFn = fn(&mut SchemaBuilder) -> SchemaResult<()>;

/// The built, immutable schema registry for one record type.
///
/// Owns the type's fields, derived fields and constraints in declaration
/// order. Lookup is linear by name; schemas are small.
#[derive(Debug)]
pub struct Metamodel {
    type_name: String,
    fields: Vec<FieldSpec>,
    derived_fields: Vec<DerivedFieldSpec>,
    constraints: Vec<ConstraintSpec>,
}

impl Metamodel {
    /// The record type's name, used as the prefix of validation messages.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// All derived fields, in declaration order.
    pub fn derived_fields(&self) -> &[DerivedFieldSpec] {
        &self.derived_fields
    }

    /// All constraints, in declaration order.
    pub fn constraints(&self) -> &[ConstraintSpec] {
        &self.constraints
    }

    /// Find a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Find a derived field by name.
    pub fn derived_field(&self, name: &str) -> Option<&DerivedFieldSpec> {
        self.derived_fields.iter().find(|field| field.name == name)
    }

    /// The allowed values of an options-matched field, in declared order.
    ///
    /// Only meaningful for fields matched by an options set; anything else
    /// is a [`ModelError`].
    pub fn options_for(&self, field_name: &str) -> ModelResult<&[String]> {
        let field = self
            .field(field_name)
            .ok_or_else(|| ModelError::unknown_field(field_name, &self.type_name))?;
        match &field.matcher {
            Matcher::Options(allowed) => Ok(allowed),
            _ => Err(ModelError::not_an_options_field(field_name, &self.type_name)),
        }
    }

    /// A serializable summary of this metamodel for embedding applications
    /// that expose schemas outward.
    pub fn descriptor(&self) -> SchemaDescriptor {
        SchemaDescriptor {
            type_name: self.type_name.clone(),
            fields: self
                .fields
                .iter()
                .map(|field| FieldDescriptor {
                    name: field.name.clone(),
                    shape: field.matcher.to_string(),
                    default: field.default.clone(),
                })
                .collect(),
            derived_fields: self
                .derived_fields
                .iter()
                .map(|field| field.name.clone())
                .collect(),
            constraints: self
                .constraints
                .iter()
                .map(|constraint| constraint.message.clone())
                .collect(),
        }
    }
}

/// Serializable summary of a metamodel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Record type name
    pub type_name: String,
    /// Declared fields with their shape descriptions
    pub fields: Vec<FieldDescriptor>,
    /// Names of derived fields
    #[serde(default)]
    pub derived_fields: Vec<String>,
    /// Message templates of the declared constraints
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// One field entry of a [`SchemaDescriptor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// The matcher's description, as embedded in validation messages
    pub shape: String,
    /// Default value, null when none was declared
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub default: Value,
}

/// Registration handle passed to a schema-building routine.
///
/// All declaration goes through this one handle: fields, derived fields and
/// constraints alike. Registration order is preserved and becomes the
/// evaluation and message order.
pub struct SchemaBuilder {
    type_name: String,
    fields: Vec<FieldSpec>,
    derived_fields: Vec<DerivedFieldSpec>,
    constraints: Vec<ConstraintSpec>,
}

impl SchemaBuilder {
    fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            fields: Vec::new(),
            derived_fields: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Declare a field with no default (absent resolves to null).
    pub fn field(&mut self, name: impl Into<String>, matcher: impl Into<Matcher>) -> SchemaResult<()> {
        self.field_with_default(name, matcher, Value::Null)
    }

    /// Declare a field whose absent or null entries resolve to `default`.
    pub fn field_with_default(
        &mut self,
        name: impl Into<String>,
        matcher: impl Into<Matcher>,
        default: Value,
    ) -> SchemaResult<()> {
        let name = name.into();
        if self.fields.iter().any(|field| field.name == name) {
            return Err(SchemaError::DuplicateField {
                field: name,
                type_name: self.type_name.clone(),
            });
        }
        if self.derived_fields.iter().any(|field| field.name == name) {
            return Err(SchemaError::FieldShadowsDerived {
                field: name,
                type_name: self.type_name.clone(),
            });
        }
        self.fields.push(FieldSpec {
            name,
            matcher: matcher.into(),
            default,
        });
        Ok(())
    }

    /// Declare a derived field computed by `initializer` on first access and
    /// cached in the entity's data store.
    pub fn derived(
        &mut self,
        name: impl Into<String>,
        initializer: impl Fn(&Entity) -> Value + Send + Sync + 'static,
    ) -> SchemaResult<()> {
        let name = name.into();
        if self.derived_fields.iter().any(|field| field.name == name) {
            return Err(SchemaError::DuplicateDerivedField {
                field: name,
                type_name: self.type_name.clone(),
            });
        }
        if self.fields.iter().any(|field| field.name == name) {
            return Err(SchemaError::DerivedShadowsField {
                field: name,
                type_name: self.type_name.clone(),
            });
        }
        self.derived_fields
            .push(DerivedFieldSpec::new(name, Box::new(initializer)));
        Ok(())
    }

    /// Declare a constraint: a predicate evaluated against the whole entity,
    /// named by its violation message template.
    ///
    /// `None` from the predicate means the constraint holds; returned values
    /// fill the template's `{}` placeholders in order.
    pub fn constraint(
        &mut self,
        message: impl Into<String>,
        predicate: impl Fn(&Entity) -> Option<Vec<Value>> + Send + Sync + 'static,
    ) {
        self.constraints
            .push(ConstraintSpec::new(message, Box::new(predicate)));
    }

    fn finish(self) -> Metamodel {
        Metamodel {
            type_name: self.type_name,
            fields: self.fields,
            derived_fields: self.derived_fields,
            constraints: self.constraints,
        }
    }
}

/// The per-type declaration of a record schema, with build-once semantics.
///
/// `const`-constructible so a record type is a `static`:
///
/// ```rust
/// use metamodel::{Kind, ModelSchema};
/// use serde_json::json;
///
/// static EXPERIMENT: ModelSchema = ModelSchema::new("Experiment", |m| {
///     m.field("name", Kind::String)?;
///     m.field_with_default("percent_exposed", Kind::Integer, json!(100))?;
///     Ok(())
/// });
///
/// let entity = EXPERIMENT.entity(json!({"name": "button_color"}));
/// assert!(entity.is_valid());
/// ```
///
/// The routine runs at most once per process, on the first call to
/// [`metamodel`](ModelSchema::metamodel) (or the first entity construction)
/// from any thread; concurrent first accesses block until the build is
/// complete and then observe the same fully built instance.
#[derive(Debug)]
pub struct ModelSchema {
    name: &'static str,
    define: SchemaFn,
    model: OnceLock<SchemaResult<Arc<Metamodel>>>,
}

impl ModelSchema {
    /// Declare a record type with the given name and schema-building routine.
    pub const fn new(name: &'static str, define: SchemaFn) -> Self {
        Self {
            name,
            define,
            model: OnceLock::new(),
        }
    }

    /// The record type's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The built metamodel, building it on first access.
    ///
    /// A failed build is cached as well: the same error is returned on
    /// every subsequent call without re-running the routine.
    pub fn try_metamodel(&self) -> SchemaResult<Arc<Metamodel>> {
        self.model
            .get_or_init(|| {
                let mut builder = SchemaBuilder::new(self.name);
                (self.define)(&mut builder)?;
                let model = builder.finish();
                debug!(
                    "built metamodel for type '{}': {} fields, {} derived, {} constraints",
                    model.type_name,
                    model.fields.len(),
                    model.derived_fields.len(),
                    model.constraints.len()
                );
                Ok(Arc::new(model))
            })
            .clone()
    }

    /// The built metamodel, building it on first access.
    ///
    /// # Panics
    ///
    /// Panics if the schema-building routine returned a [`SchemaError`];
    /// a malformed definition is fatal. Use
    /// [`try_metamodel`](ModelSchema::try_metamodel) to handle it instead.
    pub fn metamodel(&self) -> Arc<Metamodel> {
        match self.try_metamodel() {
            Ok(model) => model,
            Err(error) => panic!("schema definition for type '{}' failed: {error}", self.name),
        }
    }

    /// Construct an entity of this type from initial data.
    ///
    /// `data` should be a JSON object; unknown keys are retained, and any
    /// non-object value yields an entity with an empty store. Construction
    /// never fails on data shape; validity is a query, not a precondition.
    pub fn entity(&self, data: Value) -> Entity {
        Entity::from_json(self.metamodel(), data)
    }
}
