//! Schema declaration and validation engine for semi-structured records.
//!
//! A record type declares, once, a set of named fields with type/shape
//! matchers and defaults, derived (computed, cached) fields, and named
//! constraints over the whole record. Entities are then constructed from
//! arbitrary key/value data, unknown or missing fields included, without
//! failing: validity is a query performed after construction, and every
//! violation of a record is collected rather than failing on the first.
//!
//! # Core Components
//!
//! - [`ModelSchema`] - a record type's declaration, built exactly once
//! - [`Matcher`] / [`Kind`] - value predicates with stable descriptions
//! - [`Entity`] - one record instance with strict/lenient reads and
//!   validation entry points
//!
//! # Quick Start
//!
//! ```rust
//! use metamodel::{Kind, Matcher, ModelSchema};
//! use serde_json::json;
//!
//! static TRACK: ModelSchema = ModelSchema::new("Track", |m| {
//!     m.field("name", Kind::String)?;
//!     m.field("codec", Matcher::options(["flac", "opus", "mp3"]))?;
//!     m.field_with_default("gain_db", Kind::Decimal, json!(0.0))?;
//!     m.constraint("expected gain_db to stay under {} dB, got {}", |e| {
//!         let gain = e.lookup("gain_db").as_f64().unwrap_or(0.0);
//!         (gain > 12.0).then(|| vec![json!(12.0), json!(gain)])
//!     });
//!     Ok(())
//! });
//!
//! let track = TRACK.entity(json!({"name": "intro", "codec": "tape"}));
//! assert!(!track.is_valid());
//! assert_eq!(track.error_messages().len(), 1);
//! assert_eq!(track.lookup("gain_db"), json!(0.0));
//! ```

pub mod entity;
pub mod error;
pub mod matcher;
pub mod schema;

// Re-export commonly used types for convenience
pub use entity::Entity;
pub use error::{ModelError, ModelResult, SchemaError, SchemaResult};
pub use matcher::{Kind, Matcher};
pub use schema::{
    ConstraintSpec, DerivedFieldSpec, FieldSpec, Metamodel, ModelSchema, SchemaBuilder,
    SchemaDescriptor,
};
