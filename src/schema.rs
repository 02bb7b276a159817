//! The assembled schema: types, registered directives and their applications.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::application::SchemaDirective;
use crate::casing::CaseConvention;
use crate::definition::DirectiveDefinition;
use crate::error::RenderError;
use crate::store::DirectiveStore;
use crate::types::RESERVED_DIRECTIVES;
use crate::typesystem::{Carrier, CarrierId, FieldTarget, NamedType, ObjectType};

/// A schema built by [`SchemaAssembler`](crate::SchemaAssembler), ready to be rendered.
///
/// Rendering never mutates the schema; [`AnnotatedSchema::sdl`] walks the
/// types afresh on each call and yields identical text for identical input.
#[derive(Debug)]
pub struct AnnotatedSchema {
    pub(crate) types: IndexMap<String, NamedType>,
    pub(crate) query: Option<String>,
    pub(crate) mutation: Option<String>,
    pub(crate) subscription: Option<String>,
    pub(crate) directives: Vec<Arc<DirectiveDefinition>>,
    pub(crate) schema_directives: Vec<SchemaDirective>,
    pub(crate) include_builtin_directives: bool,
    pub(crate) case: CaseConvention,
    pub(crate) store: DirectiveStore,
}

impl AnnotatedSchema {
    pub fn query_type(&self) -> Option<&ObjectType> {
        self.root(self.query.as_deref())
    }

    pub fn mutation_type(&self) -> Option<&ObjectType> {
        self.root(self.mutation.as_deref())
    }

    pub fn subscription_type(&self) -> Option<&ObjectType> {
        self.root(self.subscription.as_deref())
    }

    fn root(&self, name: Option<&str>) -> Option<&ObjectType> {
        match self.types.get(name?) {
            Some(NamedType::Object(object)) => Some(object),
            _ => None,
        }
    }

    pub fn get_type(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    /// All named types, root types first.
    pub fn types(&self) -> impl Iterator<Item = &NamedType> {
        self.types.values()
    }

    /// Custom directive definitions, in registration order.
    pub fn directives(&self) -> &[Arc<DirectiveDefinition>] {
        &self.directives
    }

    pub fn directive(&self, name: &str) -> Option<&Arc<DirectiveDefinition>> {
        self.directives.iter().find(|definition| definition.name() == name)
    }

    /// Names of the specification directives registered alongside the custom ones.
    pub fn builtin_directives(&self) -> &'static [&'static str] {
        if self.include_builtin_directives {
            RESERVED_DIRECTIVES
        } else {
            &[]
        }
    }

    pub fn schema_directives(&self) -> &[SchemaDirective] {
        &self.schema_directives
    }

    pub fn store(&self) -> &DirectiveStore {
        &self.store
    }

    pub fn case_convention(&self) -> CaseConvention {
        self.case
    }

    /// Wire name of a field, input field or argument.
    pub fn field_name(&self, name: &str) -> String {
        self.case.encode(name)
    }

    /// Every carrier of the schema: each type followed by its members.
    pub fn carriers(&self) -> Vec<CarrierRef<'_>> {
        let mut carriers = Vec::new();

        for ty in self.types.values() {
            carriers.push(CarrierRef::Type(ty));

            match ty {
                NamedType::Object(ObjectType { fields, .. })
                | NamedType::Interface(crate::typesystem::InterfaceType { fields, .. }) => {
                    for field in fields {
                        carriers.push(CarrierRef::Member {
                            parent: ty,
                            target: FieldTarget::Field(field),
                        });
                        for argument in &field.arguments {
                            carriers.push(CarrierRef::Member {
                                parent: ty,
                                target: FieldTarget::Argument { field, argument },
                            });
                        }
                    }
                }
                NamedType::Enum(enum_type) => {
                    for value in &enum_type.values {
                        carriers.push(CarrierRef::Member {
                            parent: ty,
                            target: FieldTarget::EnumValue(value),
                        });
                    }
                }
                NamedType::InputObject(input) => {
                    for field in &input.fields {
                        carriers.push(CarrierRef::Member {
                            parent: ty,
                            target: FieldTarget::InputField(field),
                        });
                    }
                }
                NamedType::Scalar(_) | NamedType::Union(_) => {}
            }
        }

        carriers
    }

    /// Definitions applied at least once, to a carrier or to the schema.
    ///
    /// A directive used only in `extend schema` counts as used. Recomputed on
    /// every call, in registration order.
    pub fn directives_used(&self) -> Vec<&Arc<DirectiveDefinition>> {
        let mut used: HashSet<&str> = self
            .schema_directives
            .iter()
            .map(|directive| directive.name())
            .collect();

        for carrier in self.carriers() {
            used.extend(self.store.directives_on(carrier.id()));
        }

        self.directives
            .iter()
            .filter(|definition| used.contains(definition.name()))
            .collect()
    }

    /// The SDL without any custom directive applications.
    pub fn print_baseline(&self) -> String {
        crate::sdl::print_schema(self)
    }

    /// The SDL with every directive application in place.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::CustomValidation` if a validator rejects an
    /// application.
    pub fn sdl(&self) -> Result<String, RenderError> {
        crate::render::render(self)
    }
}

/// A carrier found while walking the assembled schema.
#[derive(Debug, Clone, Copy)]
pub enum CarrierRef<'a> {
    Type(&'a NamedType),
    Member {
        parent: &'a NamedType,
        target: FieldTarget<'a>,
    },
}

impl CarrierRef<'_> {
    pub fn id(&self) -> CarrierId {
        match self {
            CarrierRef::Type(ty) => ty.carrier_id(),
            CarrierRef::Member { target, .. } => target.carrier().carrier_id(),
        }
    }

    /// Human-readable path, e.g. `Query.position(id:)`.
    pub fn path(&self) -> String {
        match self {
            CarrierRef::Type(ty) => ty.name().to_string(),
            CarrierRef::Member { parent, target } => match target {
                FieldTarget::Argument { field, argument } => {
                    format!("{}.{}({}:)", parent.name(), field.name, argument.name)
                }
                other => format!("{}.{}", parent.name(), other.name()),
            },
        }
    }
}
