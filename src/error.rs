//! Error types for schema definition and entity access.
//!
//! Two failure domains are kept apart: [`SchemaError`] covers malformed
//! record-type definitions and is fatal at definition time, while
//! [`ModelError`] covers recoverable access failures on a built model.
//! A field failing its matcher or a constraint firing is *not* an error in
//! either domain; validation outcomes are reported as data through
//! `Entity::error_messages`.

/// Errors raised while defining a record type's schema.
///
/// These indicate a defect in the schema-building routine itself, not in
/// any entity's data, and are surfaced once when the metamodel is first
/// built.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    /// A field name was registered twice on the same type
    #[error("Field '{field}' is already declared on type '{type_name}'")]
    DuplicateField { field: String, type_name: String },

    /// A derived field name was registered twice on the same type
    #[error("Derived field '{field}' is already declared on type '{type_name}'")]
    DuplicateDerivedField { field: String, type_name: String },

    /// A field was registered under a name already taken by a derived field
    #[error("Field '{field}' on type '{type_name}' collides with a derived field of the same name")]
    FieldShadowsDerived { field: String, type_name: String },

    /// A derived field was registered under a name already taken by a field
    #[error("Derived field '{field}' on type '{type_name}' collides with a field of the same name")]
    DerivedShadowsField { field: String, type_name: String },

    /// A pattern matcher was given an expression that does not compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// General definition error with a custom message
    #[error("Schema definition failed: {message}")]
    Custom { message: String },
}

/// Errors raised while reading from an entity or its metamodel.
///
/// These are expected failure modes of the strict access path and of
/// introspection, recoverable by the caller. Lenient access never produces
/// them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// Strict resolution of a name that is neither a declared nor a derived field
    #[error("Unknown field '{field}' on type '{type_name}'")]
    UnknownField { field: String, type_name: String },

    /// `options_for` was asked about a field that is not matched by an options set
    #[error("Field '{field}' on type '{type_name}' is not an options field")]
    NotAnOptionsField { field: String, type_name: String },
}

// Convenience constructors for the common cases
impl SchemaError {
    /// Create a duplicate field error
    pub fn duplicate_field(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::DuplicateField {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a custom definition error
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}

impl ModelError {
    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a not-an-options-field error
    pub fn not_an_options_field(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::NotAnOptionsField {
            field: field.into(),
            type_name: type_name.into(),
        }
    }
}

// Result type aliases for convenience
pub type SchemaResult<T> = Result<T, SchemaError>;
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let error = SchemaError::duplicate_field("name", "Experiment");
        assert!(error.to_string().contains("name"));
        assert!(error.to_string().contains("Experiment"));
    }

    #[test]
    fn test_model_error_display() {
        let error = ModelError::unknown_field("covfefe", "Experiment");
        assert!(error.to_string().contains("covfefe"));
    }

    #[test]
    fn test_pattern_error_conversion() {
        let bad = regex::Regex::new("(").unwrap_err();
        let error = SchemaError::from(bad);
        assert!(matches!(error, SchemaError::InvalidPattern(_)));
    }
}
