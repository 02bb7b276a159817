//! Directive definitions: name, locations, argument schema and hooks.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::coerce::{coerce_argument, coerce_defaults, InputTypes};
use crate::error::DefinitionError;
use crate::schema::AnnotatedSchema;
use crate::types::{is_valid_name, DirectiveLocation, TypeRef};
use crate::typesystem::{FieldTarget, NamedType};
use crate::value::{Arguments, Value};

/// Validates a type-level application: `(type, arguments, schema) -> valid`.
pub type TypeValidator = Arc<dyn Fn(&NamedType, &Arguments, &AnnotatedSchema) -> bool + Send + Sync>;

/// Validates a field-level application: `(parent, target, arguments, schema) -> valid`.
pub type FieldValidator =
    Arc<dyn Fn(&NamedType, FieldTarget<'_>, &Arguments, &AnnotatedSchema) -> bool + Send + Sync>;

/// Rewrites application arguments before they are printed.
pub type InputTransform = Arc<dyn Fn(Arguments, &AnnotatedSchema) -> Arguments + Send + Sync>;

/// A declared argument of a directive.
#[derive(Debug, Clone)]
pub struct InputValue {
    pub name: String,
    pub ty: TypeRef,
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl InputValue {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            description: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Non-null without a default: must be supplied on every application.
    pub fn is_required(&self) -> bool {
        self.ty.is_non_null() && self.default.is_none()
    }
}

/// Immutable description of a custom directive.
pub struct DirectiveDefinition {
    name: String,
    description: Option<String>,
    locations: Vec<DirectiveLocation>,
    arguments: IndexMap<String, InputValue>,
    input_types: InputTypes,
    repeatable: bool,
    include_definition: bool,
    allow_unknown_locations: bool,
    type_validator: Option<TypeValidator>,
    field_validator: Option<FieldValidator>,
    input_transform: Option<InputTransform>,
}

impl DirectiveDefinition {
    pub fn builder(name: impl Into<String>) -> DirectiveDefinitionBuilder {
        DirectiveDefinitionBuilder {
            name: name.into(),
            description: None,
            locations: Vec::new(),
            arguments: Vec::new(),
            input_types: Vec::new(),
            repeatable: false,
            include_definition: true,
            allow_unknown_locations: false,
            type_validator: None,
            field_validator: None,
            input_transform: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Declared locations, in declaration order.
    pub fn locations(&self) -> &[DirectiveLocation] {
        &self.locations
    }

    pub fn arguments(&self) -> impl Iterator<Item = &InputValue> {
        self.arguments.values()
    }

    pub fn argument(&self, name: &str) -> Option<&InputValue> {
        self.arguments.get(name)
    }

    /// Enum, input object and scalar types referenced by the arguments.
    pub fn input_types(&self) -> &InputTypes {
        &self.input_types
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// Whether `directive @name ... on ...` is printed in the SDL.
    pub fn include_definition(&self) -> bool {
        self.include_definition
    }

    pub fn allows_unknown_locations(&self) -> bool {
        self.allow_unknown_locations
    }

    pub fn type_validator(&self) -> Option<&TypeValidator> {
        self.type_validator.as_ref()
    }

    pub fn field_validator(&self) -> Option<&FieldValidator> {
        self.field_validator.as_ref()
    }

    pub fn input_transform(&self) -> Option<&InputTransform> {
        self.input_transform.as_ref()
    }

    pub fn has_location(&self, location: DirectiveLocation) -> bool {
        self.locations.contains(&location)
    }

    /// Supported locations on fields, input fields, enum values and arguments.
    pub fn field_locations(&self) -> Vec<DirectiveLocation> {
        self.locations
            .iter()
            .copied()
            .filter(|location| location.is_supported() && location.is_field_level())
            .collect()
    }

    /// Supported locations on whole types and on the schema.
    pub fn non_field_locations(&self) -> Vec<DirectiveLocation> {
        self.locations
            .iter()
            .copied()
            .filter(|location| location.is_supported() && !location.is_field_level())
            .collect()
    }

    pub fn supports_field_level(&self) -> bool {
        !self.field_locations().is_empty()
    }

    /// True when the directive can decorate at least one kind of named type.
    pub fn supports_non_field_level(&self) -> bool {
        self.non_field_locations()
            .iter()
            .any(|location| *location != DirectiveLocation::Schema)
    }

    pub fn has_no_arguments(&self) -> bool {
        self.arguments.is_empty()
    }
}

impl fmt::Debug for DirectiveDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveDefinition")
            .field("name", &self.name)
            .field("locations", &self.locations)
            .field("arguments", &self.arguments)
            .field("repeatable", &self.repeatable)
            .field("include_definition", &self.include_definition)
            .field("type_validator", &self.type_validator.is_some())
            .field("field_validator", &self.field_validator.is_some())
            .field("input_transform", &self.input_transform.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`DirectiveDefinition`].
pub struct DirectiveDefinitionBuilder {
    name: String,
    description: Option<String>,
    locations: Vec<DirectiveLocation>,
    arguments: Vec<InputValue>,
    input_types: Vec<NamedType>,
    repeatable: bool,
    include_definition: bool,
    allow_unknown_locations: bool,
    type_validator: Option<TypeValidator>,
    field_validator: Option<FieldValidator>,
    input_transform: Option<InputTransform>,
}

impl DirectiveDefinitionBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: DirectiveLocation) -> Self {
        self.locations.push(location);
        self
    }

    pub fn locations(mut self, locations: impl IntoIterator<Item = DirectiveLocation>) -> Self {
        self.locations.extend(locations);
        self
    }

    pub fn argument(mut self, argument: InputValue) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Register an enum, input object or custom scalar used by an argument.
    pub fn input_type(mut self, ty: impl Into<NamedType>) -> Self {
        self.input_types.push(ty.into());
        self
    }

    pub fn repeatable(mut self, repeatable: bool) -> Self {
        self.repeatable = repeatable;
        self
    }

    /// When false, applications still render but the definition is not printed.
    pub fn include_definition(mut self, include: bool) -> Self {
        self.include_definition = include;
        self
    }

    /// Accept locations outside [`DirectiveLocation::SUPPORTED`].
    pub fn allow_unknown_locations(mut self, allow: bool) -> Self {
        self.allow_unknown_locations = allow;
        self
    }

    pub fn type_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&NamedType, &Arguments, &AnnotatedSchema) -> bool + Send + Sync + 'static,
    {
        self.type_validator = Some(Arc::new(validator));
        self
    }

    pub fn field_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&NamedType, FieldTarget<'_>, &Arguments, &AnnotatedSchema) -> bool + Send + Sync + 'static,
    {
        self.field_validator = Some(Arc::new(validator));
        self
    }

    pub fn input_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Arguments, &AnnotatedSchema) -> Arguments + Send + Sync + 'static,
    {
        self.input_transform = Some(Arc::new(transform));
        self
    }

    /// Validate and freeze the definition.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::UnsupportedLocations` if a location is not
    /// supported and unknown locations are not allowed, and the other
    /// `DefinitionError` variants for malformed names, arguments or defaults.
    pub fn build(self) -> Result<Arc<DirectiveDefinition>, DefinitionError> {
        if !is_valid_name(&self.name) {
            return Err(DefinitionError::InvalidName { name: self.name });
        }

        if self.locations.is_empty() {
            return Err(DefinitionError::NoLocations {
                directive: self.name,
            });
        }

        let mut locations = Vec::with_capacity(self.locations.len());
        for location in self.locations {
            if !locations.contains(&location) {
                locations.push(location);
            }
        }

        let rejected: Vec<_> = locations
            .iter()
            .copied()
            .filter(|location| !location.is_supported())
            .collect();
        if !rejected.is_empty() && !self.allow_unknown_locations {
            return Err(DefinitionError::UnsupportedLocations {
                directive: self.name,
                rejected,
                allowed: DirectiveLocation::SUPPORTED.to_vec(),
            });
        }

        let mut input_types: InputTypes = self
            .input_types
            .into_iter()
            .map(|ty| (ty.name().to_string(), ty))
            .collect();
        if let Err(invalid) = coerce_defaults(&mut input_types) {
            return Err(DefinitionError::InvalidDefault {
                directive: self.name,
                argument: invalid.path,
                message: invalid.errors.join("; "),
            });
        }

        let mut arguments = IndexMap::with_capacity(self.arguments.len());
        for mut argument in self.arguments {
            if !is_valid_name(&argument.name) {
                return Err(DefinitionError::InvalidName {
                    name: argument.name,
                });
            }
            if arguments.contains_key(&argument.name) {
                return Err(DefinitionError::DuplicateArgument {
                    directive: self.name,
                    argument: argument.name,
                });
            }
            if let Some(default) = &argument.default {
                match coerce_argument(&argument.name, default, &argument.ty, &input_types) {
                    Ok(coerced) => argument.default = Some(coerced),
                    Err(errors) => {
                        return Err(DefinitionError::InvalidDefault {
                            directive: self.name,
                            argument: argument.name,
                            message: errors.join("; "),
                        });
                    }
                }
            }
            arguments.insert(argument.name.clone(), argument);
        }

        tracing::debug!(
            directive = %self.name,
            locations = locations.len(),
            arguments = arguments.len(),
            repeatable = self.repeatable,
            "defined directive"
        );

        Ok(Arc::new(DirectiveDefinition {
            name: self.name,
            description: self.description,
            locations,
            arguments,
            input_types,
            repeatable: self.repeatable,
            include_definition: self.include_definition,
            allow_unknown_locations: self.allow_unknown_locations,
            type_validator: self.type_validator,
            field_validator: self.field_validator,
            input_transform: self.input_transform,
        }))
    }
}
