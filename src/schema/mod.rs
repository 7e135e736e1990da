//! Schema declaration and the per-type metamodel registry.
//!
//! A record type is declared once, as a [`ModelSchema`] holding a
//! schema-building routine. The routine runs exactly once, on first access,
//! and produces the type's immutable [`Metamodel`]: its fields, derived
//! fields and constraints, all registered through one [`SchemaBuilder`]
//! handle.
//!
//! # Key Types
//!
//! - [`ModelSchema`] - per-type declaration with build-once semantics
//! - [`Metamodel`] - the built, shared registry for one record type
//! - [`SchemaBuilder`] - registration handle passed to the building routine
//! - [`FieldSpec`] / [`DerivedFieldSpec`] / [`ConstraintSpec`] - the entries

pub mod registry;
pub mod types;
pub mod validation;


// Re-export the main types for convenience
pub use registry::{FieldDescriptor, Metamodel, ModelSchema, SchemaBuilder, SchemaDescriptor, SchemaFn};
pub use types::{ConstraintFn, ConstraintSpec, DerivedFieldSpec, DerivedFn, FieldSpec};
