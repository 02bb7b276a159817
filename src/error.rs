//! Error types for directive definition, application, assembly and rendering.

use std::path::PathBuf;
use thiserror::Error;

use crate::typesystem::CarrierKind;
use crate::types::DirectiveLocation;
use crate::value::{format_arguments, Arguments};

/// Errors raised while constructing a directive definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error(
        "directive @{directive} uses unsupported locations: {}; allowed locations: {}",
        join_locations(.rejected),
        join_locations(.allowed)
    )]
    UnsupportedLocations {
        directive: String,
        rejected: Vec<DirectiveLocation>,
        allowed: Vec<DirectiveLocation>,
    },

    #[error("\"{name}\" is not a valid GraphQL name")]
    InvalidName { name: String },

    #[error("directive @{directive} declares no locations")]
    NoLocations { directive: String },

    #[error("directive @{directive} declares argument \"{argument}\" more than once")]
    DuplicateArgument { directive: String, argument: String },

    #[error("directive @{directive} has an invalid default for \"{argument}\": {message}")]
    InvalidDefault {
        directive: String,
        argument: String,
        message: String,
    },
}

/// Errors raised while applying a directive to a carrier.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(
        "directive @{directive} cannot be used on {kind} \"{carrier}\"; valid locations: {}",
        join_locations(.allowed)
    )]
    LocationMismatch {
        directive: String,
        kind: CarrierKind,
        carrier: String,
        allowed: Vec<DirectiveLocation>,
    },

    #[error("argument \"{argument}\" of required type '{ty}' is required for @{directive}")]
    MissingArgument {
        directive: String,
        argument: String,
        ty: String,
    },

    #[error("invalid arguments for @{directive}: {}", .errors.join("; "))]
    ArgumentValueType {
        directive: String,
        errors: Vec<String>,
    },

    #[error("directive @{directive} is not repeatable but was applied more than once to \"{carrier}\"")]
    NotRepeatable { directive: String, carrier: String },

    #[error(
        "directive @{directive} was applied to \"{carrier}\" twice with the same arguments ({})",
        format_arguments(.arguments)
    )]
    DuplicateApplication {
        directive: String,
        carrier: String,
        arguments: Arguments,
    },

    #[error("directive @{directive} cannot be used as a schema directive: SCHEMA is not one of its locations")]
    NotSchemaLocation { directive: String },
}

/// Errors raised while assembling the annotated schema.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("directive @{directive} is not repeatable but is applied to the schema more than once")]
    DuplicateSchemaDirective { directive: String },

    #[error("directive @{directive} is registered more than once")]
    DuplicateDirective { directive: String },

    #[error("directive @{directive} collides with a directive reserved by the GraphQL specification")]
    ReservedDirective { directive: String },

    #[error("directive @{directive} is used on \"{carrier}\" but was never registered with the schema")]
    UnregisteredDirective { directive: String, carrier: String },

    #[error("type \"{name}\" is declared more than once")]
    DuplicateType { name: String },

    #[error("unknown type \"{name}\" referenced by \"{referenced_by}\"")]
    UnknownType { name: String, referenced_by: String },

    #[error("union \"{union}\" member \"{member}\" must be an object type")]
    InvalidUnionMember { union: String, member: String },

    #[error("invalid default value for \"{carrier}\": {message}")]
    InvalidDefault { carrier: String, message: String },

    #[error("{operation} root type \"{name}\" must be an object type")]
    InvalidRootType { operation: &'static str, name: String },
}

/// Errors raised while rendering annotated SDL.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(
        "custom validation failed for @{directive} on \"{carrier}\" with arguments ({})",
        format_arguments(.arguments)
    )]
    CustomValidation {
        directive: String,
        carrier: String,
        arguments: Arguments,
    },

    #[error("annotation `{annotation}` for \"{carrier}\" has no matching declaration in the printed schema")]
    UnplacedAnnotation { carrier: String, annotation: String },
}

/// Errors raised while loading a schema manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown directive @{name} referenced at {path}")]
    UnknownDirective { name: String, path: String },

    #[error("unknown type \"{name}\" referenced by the arguments of @{directive}")]
    UnknownArgumentType { name: String, directive: String },
}

/// A type reference that does not follow GraphQL type syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type reference \"{input}\"")]
pub struct InvalidTypeRef {
    pub input: String,
}

/// Any error produced while going from declarations to annotated SDL.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl ManifestError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

impl Error {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Manifest(e) => e.exit_code(),
            Error::Render(RenderError::CustomValidation { .. }) => 1,
            _ => 2,
        }
    }
}

fn join_locations(locations: &[DirectiveLocation]) -> String {
    locations
        .iter()
        .map(|location| location.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn exit_codes() {
        let err = Error::from(ManifestError::FileNotFound {
            path: PathBuf::from("schema.json"),
        });
        assert_eq!(err.exit_code(), 3);

        let err = Error::from(AssembleError::ReservedDirective {
            directive: "skip".into(),
        });
        assert_eq!(err.exit_code(), 2);

        let err = Error::from(RenderError::CustomValidation {
            directive: "cache".into(),
            carrier: "Position".into(),
            arguments: Arguments::new(),
        });
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn unsupported_locations_lists_both_sets() {
        let err = DefinitionError::UnsupportedLocations {
            directive: "cache".into(),
            rejected: vec![DirectiveLocation::Field],
            allowed: vec![DirectiveLocation::Object, DirectiveLocation::FieldDefinition],
        };
        assert_eq!(
            err.to_string(),
            "directive @cache uses unsupported locations: FIELD; allowed locations: OBJECT | FIELD_DEFINITION"
        );
    }

    #[test]
    fn custom_validation_carries_arguments() {
        let mut arguments = Arguments::new();
        arguments.insert("max_age".into(), Value::Int(3000));
        let err = RenderError::CustomValidation {
            directive: "cache".into(),
            carrier: "Position".into(),
            arguments,
        };
        assert_eq!(
            err.to_string(),
            "custom validation failed for @cache on \"Position\" with arguments (max_age: 3000)"
        );
    }
}
