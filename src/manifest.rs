//! Schema manifests: a JSON description of directives, types and applications.
//!
//! ```json
//! {
//!   "directives": [
//!     { "name": "cache", "locations": ["OBJECT", "FIELD_DEFINITION"],
//!       "arguments": [{ "name": "max_age", "type": "Int!" }] }
//!   ],
//!   "query": "Query",
//!   "types": [
//!     { "kind": "object", "name": "Query",
//!       "directives": [{ "name": "cache", "arguments": { "max_age": 60 } }],
//!       "fields": [{ "name": "ping", "type": "String" }] }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::application::{apply, SchemaDirective};
use crate::assembler::SchemaAssembler;
use crate::definition::{DirectiveDefinition, InputValue};
use crate::error::{AssembleError, Error, ManifestError};
use crate::schema::AnnotatedSchema;
use crate::store::DirectiveStore;
use crate::types::{DirectiveLocation, TypeRef, BUILTIN_SCALARS};
use crate::typesystem::{
    Argument, Carrier, EnumType, EnumValue, Field, InputField, InputObjectType, InterfaceType,
    NamedType, ObjectType, ScalarType, UnionType,
};
use crate::value::{Arguments, Value};

/// Load a manifest from a file path.
///
/// # Errors
///
/// Returns `ManifestError::FileNotFound` if the file doesn't exist,
/// or `ManifestError::InvalidJson` if it isn't a valid manifest.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_manifest_str(&content)
}

/// Load a manifest from a JSON string.
///
/// # Errors
///
/// Returns `ManifestError::InvalidJson` if the string isn't a valid manifest.
pub fn load_manifest_str(content: &str) -> Result<Manifest, ManifestError> {
    serde_json::from_str(content).map_err(|source| ManifestError::InvalidJson { source })
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub directives: Vec<DirectiveSpec>,
    #[serde(default)]
    pub schema_directives: Vec<ApplicationSpec>,
    pub query: Option<String>,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
    #[serde(default = "yes")]
    pub auto_camel_case: bool,
    #[serde(default = "yes")]
    pub include_builtin_directives: bool,
    #[serde(default)]
    pub types: Vec<TypeSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveSpec {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<DirectiveLocation>,
    #[serde(default)]
    pub arguments: Vec<DirectiveArgumentSpec>,
    #[serde(default)]
    pub repeatable: bool,
    #[serde(default = "yes")]
    pub include_definition: bool,
    #[serde(default)]
    pub allow_unknown_locations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectiveArgumentSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub description: Option<String>,
    pub default: Option<serde_json::Value>,
}

/// A directive use: `{ "name": "cache", "arguments": { "max_age": 60 } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSpec {
    pub name: String,
    #[serde(default)]
    pub arguments: IndexMap<String, serde_json::Value>,
}

impl ApplicationSpec {
    fn arguments(&self) -> Arguments {
        self.arguments
            .iter()
            .map(|(name, value)| (name.clone(), Value::from(value.clone())))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeSpec {
    Object(ObjectSpec),
    Interface(ObjectSpec),
    Union(UnionSpec),
    Enum(EnumSpec),
    Scalar(ScalarSpec),
    Input(InputSpec),
}

impl TypeSpec {
    fn name(&self) -> &str {
        match self {
            TypeSpec::Object(spec) | TypeSpec::Interface(spec) => &spec.name,
            TypeSpec::Union(spec) => &spec.name,
            TypeSpec::Enum(spec) => &spec.name,
            TypeSpec::Scalar(spec) => &spec.name,
            TypeSpec::Input(spec) => &spec.name,
        }
    }

    fn directives(&self) -> &[ApplicationSpec] {
        match self {
            TypeSpec::Object(spec) | TypeSpec::Interface(spec) => &spec.directives,
            TypeSpec::Union(spec) => &spec.directives,
            TypeSpec::Enum(spec) => &spec.directives,
            TypeSpec::Scalar(spec) => &spec.directives,
            TypeSpec::Input(spec) => &spec.directives,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSpec {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub directives: Vec<ApplicationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    #[serde(default)]
    pub arguments: Vec<InputValueSpec>,
    #[serde(default)]
    pub directives: Vec<ApplicationSpec>,
}

/// A field argument or an input object field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValueSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub description: Option<String>,
    pub default: Option<serde_json::Value>,
    pub deprecation_reason: Option<String>,
    #[serde(default)]
    pub directives: Vec<ApplicationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnionSpec {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub directives: Vec<ApplicationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumSpec {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub values: Vec<EnumValueSpec>,
    #[serde(default)]
    pub directives: Vec<ApplicationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValueSpec {
    pub name: String,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    #[serde(default)]
    pub directives: Vec<ApplicationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarSpec {
    pub name: String,
    pub description: Option<String>,
    pub specified_by: Option<String>,
    #[serde(default)]
    pub directives: Vec<ApplicationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputSpec {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<InputValueSpec>,
    #[serde(default)]
    pub directives: Vec<ApplicationSpec>,
}

impl Manifest {
    /// Build definitions and types, apply every directive and assemble.
    ///
    /// # Errors
    ///
    /// Returns the first definition, application, manifest or assembly
    /// error encountered.
    pub fn build(&self) -> Result<AnnotatedSchema, Error> {
        let types: Vec<NamedType> = self.types.iter().map(build_type).collect();

        let mut definitions: IndexMap<String, Arc<DirectiveDefinition>> = IndexMap::new();
        for spec in &self.directives {
            let definition = build_directive(spec, &types)?;
            definitions.insert(definition.name().to_string(), definition);
        }

        let mut store = DirectiveStore::new();
        for (spec, ty) in self.types.iter().zip(&types) {
            apply_all(&mut store, &definitions, spec.directives(), ty, spec.name())?;
            apply_members(&mut store, &definitions, spec, ty)?;
        }

        let mut schema_directives = Vec::with_capacity(self.schema_directives.len());
        for spec in &self.schema_directives {
            let definition = lookup(&definitions, &spec.name, "schema")?;
            schema_directives.push(SchemaDirective::new(Arc::clone(definition), spec.arguments())?);
        }

        let roots = [
            ("query", self.query.as_deref()),
            ("mutation", self.mutation.as_deref()),
            ("subscription", self.subscription.as_deref()),
        ];
        let root_names: HashSet<&str> = roots.iter().filter_map(|(_, name)| *name).collect();

        let mut assembler = SchemaAssembler::new()
            .auto_camel_case(self.auto_camel_case)
            .include_builtin_directives(self.include_builtin_directives)
            .directives(definitions.into_values())
            .schema_directives(schema_directives);

        for (operation, name) in roots {
            let Some(name) = name else { continue };
            let root = match types.iter().find(|ty| ty.name() == name) {
                Some(NamedType::Object(object)) => object.clone(),
                Some(_) => {
                    return Err(AssembleError::InvalidRootType {
                        operation,
                        name: name.to_string(),
                    }
                    .into())
                }
                None => {
                    return Err(AssembleError::UnknownType {
                        name: name.to_string(),
                        referenced_by: "schema".to_string(),
                    }
                    .into())
                }
            };
            assembler = match operation {
                "query" => assembler.query(root),
                "mutation" => assembler.mutation(root),
                _ => assembler.subscription(root),
            };
        }

        let others = types
            .into_iter()
            .filter(|ty| !root_names.contains(ty.name()));
        Ok(assembler.types(others).assemble(store)?)
    }
}

fn build_directive(spec: &DirectiveSpec, types: &[NamedType]) -> Result<Arc<DirectiveDefinition>, Error> {
    let mut builder = DirectiveDefinition::builder(&spec.name)
        .locations(spec.locations.iter().copied())
        .repeatable(spec.repeatable)
        .include_definition(spec.include_definition)
        .allow_unknown_locations(spec.allow_unknown_locations);

    if let Some(description) = &spec.description {
        builder = builder.description(description);
    }

    let mut pending: Vec<&str> = Vec::new();
    for argument in &spec.arguments {
        let mut input = InputValue::new(&argument.name, argument.ty.clone());
        if let Some(default) = &argument.default {
            input = input.default_value(Value::from(default.clone()));
        }
        if let Some(description) = &argument.description {
            input = input.description(description);
        }
        builder = builder.argument(input);
        pending.push(argument.ty.named_type());
    }

    // Input types reachable from the arguments, nested input objects included.
    let mut seen = HashSet::new();
    while let Some(name) = pending.pop() {
        if BUILTIN_SCALARS.contains(&name) || !seen.insert(name) {
            continue;
        }
        let ty = types
            .iter()
            .find(|ty| ty.name() == name && ty.is_input())
            .ok_or_else(|| ManifestError::UnknownArgumentType {
                name: name.to_string(),
                directive: spec.name.clone(),
            })?;
        if let NamedType::InputObject(input) = ty {
            pending.extend(input.fields.iter().map(|field| field.ty.named_type()));
        }
        builder = builder.input_type(ty.clone());
    }

    Ok(builder.build()?)
}

fn build_type(spec: &TypeSpec) -> NamedType {
    match spec {
        TypeSpec::Object(spec) => {
            let mut object = ObjectType::new(&spec.name);
            object.description = spec.description.clone();
            object.implements = spec.implements.clone();
            object.fields = spec.fields.iter().map(build_field).collect();
            object.into()
        }
        TypeSpec::Interface(spec) => {
            let mut interface = InterfaceType::new(&spec.name);
            interface.description = spec.description.clone();
            interface.implements = spec.implements.clone();
            interface.fields = spec.fields.iter().map(build_field).collect();
            interface.into()
        }
        TypeSpec::Union(spec) => {
            let mut union = UnionType::new(&spec.name);
            union.description = spec.description.clone();
            union.members = spec.members.clone();
            union.into()
        }
        TypeSpec::Enum(spec) => {
            let mut enum_type = EnumType::new(&spec.name);
            enum_type.description = spec.description.clone();
            enum_type.values = spec
                .values
                .iter()
                .map(|value| {
                    let mut built = EnumValue::new(&value.name);
                    built.description = value.description.clone();
                    built.deprecation_reason = value.deprecation_reason.clone();
                    built
                })
                .collect();
            enum_type.into()
        }
        TypeSpec::Scalar(spec) => {
            let mut scalar = ScalarType::new(&spec.name);
            scalar.description = spec.description.clone();
            scalar.specified_by_url = spec.specified_by.clone();
            scalar.into()
        }
        TypeSpec::Input(spec) => {
            let mut input = InputObjectType::new(&spec.name);
            input.description = spec.description.clone();
            input.fields = spec
                .fields
                .iter()
                .map(|field| {
                    let mut built = InputField::new(&field.name, field.ty.clone());
                    built.description = field.description.clone();
                    built.default = field.default.clone().map(Value::from);
                    built.deprecation_reason = field.deprecation_reason.clone();
                    built
                })
                .collect();
            input.into()
        }
    }
}

fn build_field(spec: &FieldSpec) -> Field {
    let mut field = Field::new(&spec.name, spec.ty.clone());
    field.description = spec.description.clone();
    field.deprecation_reason = spec.deprecation_reason.clone();
    field.arguments = spec
        .arguments
        .iter()
        .map(|argument| {
            let mut built = Argument::new(&argument.name, argument.ty.clone());
            built.description = argument.description.clone();
            built.default = argument.default.clone().map(Value::from);
            built.deprecation_reason = argument.deprecation_reason.clone();
            built
        })
        .collect();
    field
}

/// Apply member-level directives; `ty` was built from `spec`, so members line up by index.
fn apply_members(
    store: &mut DirectiveStore,
    definitions: &IndexMap<String, Arc<DirectiveDefinition>>,
    spec: &TypeSpec,
    ty: &NamedType,
) -> Result<(), Error> {
    match (spec, ty) {
        (TypeSpec::Object(spec), NamedType::Object(ObjectType { fields, .. }))
        | (TypeSpec::Interface(spec), NamedType::Interface(InterfaceType { fields, .. })) => {
            for (field_spec, field) in spec.fields.iter().zip(fields) {
                let path = format!("{}.{}", spec.name, field.name);
                apply_all(store, definitions, &field_spec.directives, field, &path)?;
                for (argument_spec, argument) in field_spec.arguments.iter().zip(&field.arguments) {
                    let path = format!("{path}({}:)", argument.name);
                    apply_all(store, definitions, &argument_spec.directives, argument, &path)?;
                }
            }
        }
        (TypeSpec::Enum(spec), NamedType::Enum(enum_type)) => {
            for (value_spec, value) in spec.values.iter().zip(&enum_type.values) {
                let path = format!("{}.{}", spec.name, value.name);
                apply_all(store, definitions, &value_spec.directives, value, &path)?;
            }
        }
        (TypeSpec::Input(spec), NamedType::InputObject(input)) => {
            for (field_spec, field) in spec.fields.iter().zip(&input.fields) {
                let path = format!("{}.{}", spec.name, field.name);
                apply_all(store, definitions, &field_spec.directives, field, &path)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn apply_all<C: Carrier + ?Sized>(
    store: &mut DirectiveStore,
    definitions: &IndexMap<String, Arc<DirectiveDefinition>>,
    applications: &[ApplicationSpec],
    carrier: &C,
    path: &str,
) -> Result<(), Error> {
    for application in applications {
        let definition = lookup(definitions, &application.name, path)?;
        apply(store, definition, carrier, &application.arguments())?;
    }
    Ok(())
}

fn lookup<'a>(
    definitions: &'a IndexMap<String, Arc<DirectiveDefinition>>,
    name: &str,
    path: &str,
) -> Result<&'a Arc<DirectiveDefinition>, ManifestError> {
    definitions.get(name).ok_or_else(|| ManifestError::UnknownDirective {
        name: name.to_string(),
        path: path.to_string(),
    })
}
