//! Assembling types, directive definitions and applications into a schema.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::application::SchemaDirective;
use crate::casing::CaseConvention;
use crate::coerce::coerce_defaults;
use crate::definition::DirectiveDefinition;
use crate::error::AssembleError;
use crate::schema::AnnotatedSchema;
use crate::store::DirectiveStore;
use crate::types::{TypeRef, BUILTIN_SCALARS, RESERVED_DIRECTIVES};
use crate::typesystem::{Carrier, NamedType, ObjectType};

/// Collects the pieces of a schema before validation.
///
/// ```
/// use graphql_directives::{DirectiveStore, Field, ObjectType, SchemaAssembler, TypeRef};
///
/// let query = ObjectType::new("Query").field(Field::new("ping", TypeRef::named("String")));
/// let schema = SchemaAssembler::new()
///     .query(query)
///     .assemble(DirectiveStore::new())
///     .unwrap();
/// assert_eq!(schema.sdl().unwrap(), "type Query {\n  ping: String\n}");
/// ```
#[derive(Debug, Clone)]
pub struct SchemaAssembler {
    query: Option<ObjectType>,
    mutation: Option<ObjectType>,
    subscription: Option<ObjectType>,
    types: Vec<NamedType>,
    directives: Vec<Arc<DirectiveDefinition>>,
    schema_directives: Vec<SchemaDirective>,
    include_builtin_directives: bool,
    auto_camel_case: bool,
}

impl Default for SchemaAssembler {
    fn default() -> Self {
        Self {
            query: None,
            mutation: None,
            subscription: None,
            types: Vec::new(),
            directives: Vec::new(),
            schema_directives: Vec::new(),
            include_builtin_directives: true,
            auto_camel_case: true,
        }
    }
}

impl SchemaAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: ObjectType) -> Self {
        self.query = Some(query);
        self
    }

    pub fn mutation(mut self, mutation: ObjectType) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn subscription(mut self, subscription: ObjectType) -> Self {
        self.subscription = Some(subscription);
        self
    }

    /// Register an additional named type.
    pub fn type_(mut self, ty: impl Into<NamedType>) -> Self {
        self.types.push(ty.into());
        self
    }

    pub fn types<T: Into<NamedType>>(mut self, types: impl IntoIterator<Item = T>) -> Self {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn directive(mut self, directive: Arc<DirectiveDefinition>) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn directives(mut self, directives: impl IntoIterator<Item = Arc<DirectiveDefinition>>) -> Self {
        self.directives.extend(directives);
        self
    }

    pub fn schema_directive(mut self, directive: SchemaDirective) -> Self {
        self.schema_directives.push(directive);
        self
    }

    pub fn schema_directives(mut self, directives: impl IntoIterator<Item = SchemaDirective>) -> Self {
        self.schema_directives.extend(directives);
        self
    }

    /// Whether `@include`, `@skip`, `@deprecated` and `@specifiedBy` are registered too.
    pub fn include_builtin_directives(mut self, include: bool) -> Self {
        self.include_builtin_directives = include;
        self
    }

    /// Print `snake_case` field and argument names as `camelCase`.
    pub fn auto_camel_case(mut self, auto_camel_case: bool) -> Self {
        self.auto_camel_case = auto_camel_case;
        self
    }

    /// Validate everything and produce the schema.
    ///
    /// # Errors
    ///
    /// Returns an `AssembleError` for duplicate or reserved directive names,
    /// repeated non-repeatable schema directives, duplicate or unknown types,
    /// union members that are not objects, defaults that do not fit their
    /// type, and applications of directives that were never registered.
    pub fn assemble(self, store: DirectiveStore) -> Result<AnnotatedSchema, AssembleError> {
        check_directives(&self.directives)?;
        check_schema_directives(&self.directives, &self.schema_directives)?;

        let query = self.query.as_ref().map(|ty| ty.name.clone());
        let mutation = self.mutation.as_ref().map(|ty| ty.name.clone());
        let subscription = self.subscription.as_ref().map(|ty| ty.name.clone());

        let mut types = IndexMap::new();
        let roots = [self.query, self.mutation, self.subscription];
        for ty in roots.into_iter().flatten().map(NamedType::from).chain(self.types) {
            insert_type(&mut types, ty)?;
        }
        for definition in &self.directives {
            for ty in definition.input_types().values() {
                insert_type(&mut types, ty.clone())?;
            }
        }

        check_references(&types)?;
        coerce_defaults(&mut types).map_err(|invalid| AssembleError::InvalidDefault {
            carrier: invalid.path,
            message: invalid.errors.join("; "),
        })?;

        let schema = AnnotatedSchema {
            types,
            query,
            mutation,
            subscription,
            directives: self.directives,
            schema_directives: self.schema_directives,
            include_builtin_directives: self.include_builtin_directives,
            case: CaseConvention::from_auto_camel_case(self.auto_camel_case),
            store,
        };

        check_registered(&schema)?;

        tracing::debug!(
            types = schema.types.len(),
            directives = schema.directives.len(),
            applications = schema.store.len(),
            "assembled schema"
        );

        Ok(schema)
    }
}

fn check_directives(directives: &[Arc<DirectiveDefinition>]) -> Result<(), AssembleError> {
    let mut seen = HashSet::new();
    for definition in directives {
        let name = definition.name();
        if RESERVED_DIRECTIVES.contains(&name) {
            return Err(AssembleError::ReservedDirective {
                directive: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(AssembleError::DuplicateDirective {
                directive: name.to_string(),
            });
        }
    }
    Ok(())
}

fn check_schema_directives(
    directives: &[Arc<DirectiveDefinition>],
    schema_directives: &[SchemaDirective],
) -> Result<(), AssembleError> {
    let mut seen = HashSet::new();
    for directive in schema_directives {
        let name = directive.name();
        if !directives.iter().any(|definition| definition.name() == name) {
            return Err(AssembleError::UnregisteredDirective {
                directive: name.to_string(),
                carrier: "schema".to_string(),
            });
        }
        if !seen.insert(name) && !directive.definition().is_repeatable() {
            return Err(AssembleError::DuplicateSchemaDirective {
                directive: name.to_string(),
            });
        }
    }
    Ok(())
}

/// The same carrier registered twice (e.g. an enum used by two directives) is kept once.
fn insert_type(types: &mut IndexMap<String, NamedType>, ty: NamedType) -> Result<(), AssembleError> {
    let name = ty.name().to_string();
    if BUILTIN_SCALARS.contains(&name.as_str()) {
        return Err(AssembleError::DuplicateType { name });
    }
    match types.get(&name) {
        Some(existing) if existing.carrier_id() == ty.carrier_id() => Ok(()),
        Some(_) => Err(AssembleError::DuplicateType { name }),
        None => {
            types.insert(name, ty);
            Ok(())
        }
    }
}

fn check_references(types: &IndexMap<String, NamedType>) -> Result<(), AssembleError> {
    let known = |ty: &TypeRef, referenced_by: String| {
        let name = ty.named_type();
        if BUILTIN_SCALARS.contains(&name) || types.contains_key(name) {
            Ok(())
        } else {
            Err(AssembleError::UnknownType {
                name: name.to_string(),
                referenced_by,
            })
        }
    };

    for ty in types.values() {
        match ty {
            NamedType::Object(ObjectType {
                name,
                implements,
                fields,
                ..
            })
            | NamedType::Interface(crate::typesystem::InterfaceType {
                name,
                implements,
                fields,
                ..
            }) => {
                for interface in implements {
                    if !matches!(types.get(interface), Some(NamedType::Interface(_))) {
                        return Err(AssembleError::UnknownType {
                            name: interface.clone(),
                            referenced_by: name.clone(),
                        });
                    }
                }
                for field in fields {
                    known(&field.ty, format!("{name}.{}", field.name))?;
                    for argument in &field.arguments {
                        known(
                            &argument.ty,
                            format!("{name}.{}({}:)", field.name, argument.name),
                        )?;
                    }
                }
            }
            NamedType::Union(union) => {
                for member in &union.members {
                    match types.get(member) {
                        Some(NamedType::Object(_)) => {}
                        Some(_) => {
                            return Err(AssembleError::InvalidUnionMember {
                                union: union.name.clone(),
                                member: member.clone(),
                            })
                        }
                        None => {
                            return Err(AssembleError::UnknownType {
                                name: member.clone(),
                                referenced_by: union.name.clone(),
                            })
                        }
                    }
                }
            }
            NamedType::InputObject(input) => {
                for field in &input.fields {
                    known(&field.ty, format!("{}.{}", input.name, field.name))?;
                }
            }
            NamedType::Scalar(_) | NamedType::Enum(_) => {}
        }
    }
    Ok(())
}

fn check_registered(schema: &AnnotatedSchema) -> Result<(), AssembleError> {
    for carrier in schema.carriers() {
        for directive in schema.store.directives_on(carrier.id()) {
            if schema.directive(directive).is_none() {
                return Err(AssembleError::UnregisteredDirective {
                    directive: directive.to_string(),
                    carrier: carrier.path(),
                });
            }
        }
    }
    Ok(())
}
