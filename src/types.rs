//! Core types shared by definitions, the type system and the printer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidTypeRef;

/// Scalars every GraphQL schema provides; never printed.
pub const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// Directive names reserved by the GraphQL specification.
pub const RESERVED_DIRECTIVES: &[&str] = &["include", "skip", "deprecated", "specifiedBy"];

/// Reason printed as a bare `@deprecated` when used.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Returns true if `name` matches `/[_A-Za-z][_0-9A-Za-z]*/`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Where a directive may appear, per the GraphQL directive model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectiveLocation {
    // Executable locations
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    // Type system locations
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    /// Locations a directive can be attached to and rendered at.
    pub const SUPPORTED: &'static [DirectiveLocation] = &[
        DirectiveLocation::Schema,
        DirectiveLocation::Scalar,
        DirectiveLocation::Object,
        DirectiveLocation::FieldDefinition,
        DirectiveLocation::ArgumentDefinition,
        DirectiveLocation::Interface,
        DirectiveLocation::Union,
        DirectiveLocation::Enum,
        DirectiveLocation::EnumValue,
        DirectiveLocation::InputObject,
        DirectiveLocation::InputFieldDefinition,
    ];

    const ALL: &'static [DirectiveLocation] = &[
        DirectiveLocation::Query,
        DirectiveLocation::Mutation,
        DirectiveLocation::Subscription,
        DirectiveLocation::Field,
        DirectiveLocation::FragmentDefinition,
        DirectiveLocation::FragmentSpread,
        DirectiveLocation::InlineFragment,
        DirectiveLocation::VariableDefinition,
        DirectiveLocation::Schema,
        DirectiveLocation::Scalar,
        DirectiveLocation::Object,
        DirectiveLocation::FieldDefinition,
        DirectiveLocation::ArgumentDefinition,
        DirectiveLocation::Interface,
        DirectiveLocation::Union,
        DirectiveLocation::Enum,
        DirectiveLocation::EnumValue,
        DirectiveLocation::InputObject,
        DirectiveLocation::InputFieldDefinition,
    ];

    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }

    /// Locations that annotate a member of a type rather than the type itself.
    pub fn is_field_level(self) -> bool {
        matches!(
            self,
            DirectiveLocation::FieldDefinition
                | DirectiveLocation::InputFieldDefinition
                | DirectiveLocation::EnumValue
                | DirectiveLocation::ArgumentDefinition
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Subscription => "SUBSCRIPTION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
            DirectiveLocation::VariableDefinition => "VARIABLE_DEFINITION",
            DirectiveLocation::Schema => "SCHEMA",
            DirectiveLocation::Scalar => "SCALAR",
            DirectiveLocation::Object => "OBJECT",
            DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
            DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
            DirectiveLocation::Interface => "INTERFACE",
            DirectiveLocation::Union => "UNION",
            DirectiveLocation::Enum => "ENUM",
            DirectiveLocation::EnumValue => "ENUM_VALUE",
            DirectiveLocation::InputObject => "INPUT_OBJECT",
            DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }

    /// Parse a location from its SDL spelling (e.g. `FIELD_DEFINITION`).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|location| location.as_str() == s)
    }
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to an input or output type, with list and non-null wrappers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Shorthand for `Name!`.
    pub fn non_null(name: impl Into<String>) -> Self {
        TypeRef::named(name).required()
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Wrap in non-null. Already non-null references are returned unchanged.
    pub fn required(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Name of the innermost named type.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = InvalidTypeRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidTypeRef {
            input: s.to_string(),
        };
        let trimmed = s.trim();

        if let Some(inner) = trimmed.strip_suffix('!') {
            let inner: TypeRef = inner.parse().map_err(|_| invalid())?;
            if inner.is_non_null() {
                return Err(invalid());
            }
            return Ok(TypeRef::NonNull(Box::new(inner)));
        }

        if let Some(inner) = trimmed.strip_prefix('[') {
            let inner = inner.strip_suffix(']').ok_or_else(invalid)?;
            let inner: TypeRef = inner.parse().map_err(|_| invalid())?;
            return Ok(TypeRef::list(inner));
        }

        if is_valid_name(trimmed) {
            Ok(TypeRef::named(trimmed))
        } else {
            Err(invalid())
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = InvalidTypeRef;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(is_valid_name("cache"));
        assert!(is_valid_name("_private"));
        assert!(is_valid_name("max_age2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("2fast"));
        assert!(!is_valid_name("with-dash"));
    }

    #[test]
    fn location_parse_and_display() {
        assert_eq!(
            DirectiveLocation::parse("FIELD_DEFINITION"),
            Some(DirectiveLocation::FieldDefinition)
        );
        assert_eq!(DirectiveLocation::parse("field definition"), None);
        assert_eq!(DirectiveLocation::InputObject.to_string(), "INPUT_OBJECT");
    }

    #[test]
    fn executable_locations_are_unsupported() {
        assert!(!DirectiveLocation::Field.is_supported());
        assert!(!DirectiveLocation::Query.is_supported());
        assert!(DirectiveLocation::EnumValue.is_supported());
        assert!(DirectiveLocation::EnumValue.is_field_level());
        assert!(!DirectiveLocation::Schema.is_field_level());
    }

    #[test]
    fn type_ref_parses_wrappers() {
        let ty: TypeRef = "[Int!]!".parse().unwrap();
        assert_eq!(
            ty,
            TypeRef::list(TypeRef::non_null("Int")).required()
        );
        assert_eq!(ty.to_string(), "[Int!]!");
        assert_eq!(ty.named_type(), "Int");
    }

    #[test]
    fn type_ref_rejects_malformed_input() {
        assert!("Int!!".parse::<TypeRef>().is_err());
        assert!("[Int".parse::<TypeRef>().is_err());
        assert!("".parse::<TypeRef>().is_err());
        assert!("Not A Type".parse::<TypeRef>().is_err());
    }

    #[test]
    fn required_is_idempotent() {
        let ty = TypeRef::non_null("String").required();
        assert_eq!(ty.to_string(), "String!");
    }
}
