//! Applying a directive definition to a carrier or to the schema.

use std::sync::Arc;

use crate::coerce::coerce_arguments;
use crate::definition::DirectiveDefinition;
use crate::error::ApplyError;
use crate::store::DirectiveStore;
use crate::types::DirectiveLocation;
use crate::typesystem::Carrier;
use crate::value::{Arguments, Value};

/// One use of a directive, with coerced arguments.
#[derive(Debug, Clone)]
pub struct DirectiveApplication {
    definition: Arc<DirectiveDefinition>,
    arguments: Arguments,
    index: usize,
}

impl DirectiveApplication {
    pub(crate) fn new(definition: Arc<DirectiveDefinition>, arguments: Arguments) -> Self {
        Self {
            definition,
            arguments,
            index: 0,
        }
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn definition(&self) -> &Arc<DirectiveDefinition> {
        &self.definition
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// Arguments keyed by their declared names. Only supplied arguments are present.
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Position of this application in the order directives were applied.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A directive applied to the schema itself (`extend schema @name(...)`).
#[derive(Debug, Clone)]
pub struct SchemaDirective {
    application: DirectiveApplication,
}

impl SchemaDirective {
    /// Validate and coerce a schema-level application.
    ///
    /// # Errors
    ///
    /// Returns `ApplyError::NotSchemaLocation` if the definition does not
    /// declare `SCHEMA`, or an argument error if coercion fails.
    pub fn new(definition: Arc<DirectiveDefinition>, arguments: Arguments) -> Result<Self, ApplyError> {
        if !definition.has_location(DirectiveLocation::Schema) {
            return Err(ApplyError::NotSchemaLocation {
                directive: definition.name().to_string(),
            });
        }
        let arguments = coerce_arguments(&definition, &arguments)?;
        Ok(Self {
            application: DirectiveApplication::new(definition, arguments),
        })
    }

    pub fn definition(&self) -> &Arc<DirectiveDefinition> {
        self.application.definition()
    }

    pub fn name(&self) -> &str {
        self.application.name()
    }

    pub fn arguments(&self) -> &Arguments {
        self.application.arguments()
    }
}

/// Pending application of a directive, collecting raw arguments.
///
/// ```
/// use graphql_directives::{
///     DirectiveDefinition, DirectiveLocation, DirectiveStore, Field, InputValue, ObjectType, TypeRef,
/// };
///
/// let cache = DirectiveDefinition::builder("cache")
///     .locations([DirectiveLocation::Object, DirectiveLocation::FieldDefinition])
///     .argument(InputValue::new("max_age", TypeRef::non_null("Int")))
///     .build()
///     .unwrap();
///
/// let mut store = DirectiveStore::new();
/// let y = cache
///     .apply()
///     .arg("max_age", 60)
///     .to(&mut store, Field::new("y", TypeRef::non_null("Int")))
///     .unwrap();
///
/// let decorate = cache.apply().arg("max_age", 100).decorator(&mut store);
/// let position = decorate(ObjectType::new("Position").field(y)).unwrap();
/// assert_eq!(store.applications(&position).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Apply {
    definition: Arc<DirectiveDefinition>,
    arguments: Arguments,
}

impl DirectiveDefinition {
    /// Start an application of this directive.
    pub fn apply(self: &Arc<Self>) -> Apply {
        Apply {
            definition: Arc::clone(self),
            arguments: Arguments::new(),
        }
    }
}

impl Apply {
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    pub fn args<K, V>(mut self, arguments: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.arguments
            .extend(arguments.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Attach to an explicit carrier and hand it back.
    ///
    /// # Errors
    ///
    /// See [`apply`].
    pub fn to<C: Carrier>(self, store: &mut DirectiveStore, carrier: C) -> Result<C, ApplyError> {
        apply(store, &self.definition, &carrier, &self.arguments)?;
        Ok(carrier)
    }

    /// Turn the application into an attach function for a type.
    pub fn decorator<C: Carrier>(
        self,
        store: &mut DirectiveStore,
    ) -> impl FnOnce(C) -> Result<C, ApplyError> + '_ {
        move |carrier| self.to(store, carrier)
    }

    /// Use the application at schema level.
    ///
    /// # Errors
    ///
    /// See [`SchemaDirective::new`].
    pub fn to_schema(self) -> Result<SchemaDirective, ApplyError> {
        SchemaDirective::new(self.definition, self.arguments)
    }
}

/// Validate `raw` against `definition` and attach the result to `carrier`.
///
/// Arguments are coerced first, then the carrier's location is checked, then
/// the store enforces repeatability.
///
/// # Errors
///
/// Returns `ApplyError::MissingArgument` or `ApplyError::ArgumentValueType`
/// for bad arguments, `ApplyError::LocationMismatch` if the carrier's
/// location is not allowed, and `ApplyError::NotRepeatable` or
/// `ApplyError::DuplicateApplication` if the store rejects the attach.
pub fn apply<C: Carrier + ?Sized>(
    store: &mut DirectiveStore,
    definition: &Arc<DirectiveDefinition>,
    carrier: &C,
    raw: &Arguments,
) -> Result<(), ApplyError> {
    let arguments = coerce_arguments(definition, raw)?;

    let kind = carrier.carrier_kind();
    let allowed = if kind.is_field_level() {
        definition.supports_field_level() && definition.has_location(kind.location())
    } else {
        definition.supports_non_field_level()
            && definition.non_field_locations().contains(&kind.location())
    };

    if !allowed {
        return Err(ApplyError::LocationMismatch {
            directive: definition.name().to_string(),
            kind,
            carrier: carrier.carrier_name().to_string(),
            allowed: definition.locations().to_vec(),
        });
    }

    store.attach(
        carrier,
        DirectiveApplication::new(Arc::clone(definition), arguments),
    )
}
