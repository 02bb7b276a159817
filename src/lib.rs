//! GraphQL Directives
//!
//! Declare custom schema directives, attach them to types and members with
//! validated arguments, and print the schema as SDL with every application in
//! place.
//!
//! # Example
//!
//! ```
//! use graphql_directives::{
//!     DirectiveDefinition, DirectiveLocation, DirectiveStore, Field, InputValue, ObjectType,
//!     SchemaAssembler, TypeRef,
//! };
//!
//! let cache = DirectiveDefinition::builder("cache")
//!     .locations([DirectiveLocation::Object, DirectiveLocation::FieldDefinition])
//!     .argument(InputValue::new("max_age", TypeRef::non_null("Int")))
//!     .build()
//!     .unwrap();
//!
//! let mut store = DirectiveStore::new();
//! let position = cache
//!     .apply()
//!     .arg("max_age", 60)
//!     .to(&mut store, ObjectType::new("Position").field(Field::new("x", TypeRef::non_null("Int"))))
//!     .unwrap();
//! let query = ObjectType::new("Query").field(Field::new("position", TypeRef::named("Position")));
//!
//! let schema = SchemaAssembler::new()
//!     .query(query)
//!     .type_(position)
//!     .directive(cache)
//!     .assemble(store)
//!     .unwrap();
//!
//! let sdl = schema.sdl().unwrap();
//! assert!(sdl.contains("type Position @cache(maxAge: 60) {"));
//! ```
//!
//! # Rendering Rules
//!
//! | Element | Annotation slot |
//! |---------|-----------------|
//! | object, interface | after the name and `implements` list |
//! | union | before `= A \| B` |
//! | scalar | after `@specifiedBy` |
//! | field | after the type and `@deprecated` |
//! | argument, input field | after the default value and `@deprecated` |
//! | enum value | after `@deprecated` |
//! | schema | `extend schema` block, one directive per line |

mod application;
mod assembler;
mod casing;
mod coerce;
mod definition;
mod error;
mod manifest;
mod render;
mod schema;
mod sdl;
mod store;
mod types;
mod typesystem;
mod value;

pub use application::{apply, Apply, DirectiveApplication, SchemaDirective};
pub use assembler::SchemaAssembler;
pub use casing::{to_camel_case, to_snake_case, CaseConvention};
pub use coerce::{coerce_argument, InputTypes};
pub use definition::{
    DirectiveDefinition, DirectiveDefinitionBuilder, FieldValidator, InputTransform, InputValue,
    TypeValidator,
};
pub use error::{
    ApplyError, AssembleError, DefinitionError, Error, InvalidTypeRef, ManifestError, RenderError,
};
pub use manifest::{
    load_manifest, load_manifest_str, ApplicationSpec, DirectiveArgumentSpec, DirectiveSpec,
    EnumSpec, EnumValueSpec, FieldSpec, InputSpec, InputValueSpec, Manifest, ObjectSpec,
    ScalarSpec, TypeSpec, UnionSpec,
};
pub use schema::{AnnotatedSchema, CarrierRef};
pub use store::DirectiveStore;
pub use types::{
    is_valid_name, DirectiveLocation, TypeRef, BUILTIN_SCALARS, DEFAULT_DEPRECATION_REASON,
    RESERVED_DIRECTIVES,
};
pub use typesystem::{
    Argument, Carrier, CarrierId, CarrierKind, EnumType, EnumValue, Field, FieldTarget, InputField,
    InputObjectType, InterfaceType, NamedType, ObjectType, ScalarType, UnionType,
};
pub use value::{format_arguments, Arguments, Value};
