//! Input coercion of directive arguments against their declared types.
//!
//! Follows the GraphQL input-coercion rules and produces diagnostics in the
//! graphql-js message format, prefixed with the argument path.

use indexmap::IndexMap;

use crate::casing::same_name;
use crate::definition::DirectiveDefinition;
use crate::error::ApplyError;
use crate::typesystem::{EnumType, InputObjectType, InterfaceType, NamedType, ObjectType};
use crate::types::TypeRef;
use crate::value::{Arguments, Value};

/// Named input types available while coercing, keyed by type name.
pub type InputTypes = IndexMap<String, NamedType>;

/// Coerce a single argument value.
///
/// # Errors
///
/// Returns every diagnostic found; coercion does not stop at the first one.
pub fn coerce_argument(
    argument: &str,
    value: &Value,
    ty: &TypeRef,
    types: &InputTypes,
) -> Result<Value, Vec<String>> {
    let mut coercer = Coercer {
        argument,
        types,
        errors: Vec::new(),
    };
    let coerced = coercer.coerce(value, ty, "");

    if coercer.errors.is_empty() {
        Ok(coerced)
    } else {
        Err(coercer.errors)
    }
}

/// Coerce raw application arguments against a definition.
///
/// Keys are matched against declared arguments by name or by their
/// camel-cased spelling; unknown keys are dropped. The result is keyed by
/// the declared names, in declaration order, and holds only arguments that
/// were supplied.
pub(crate) fn coerce_arguments(
    definition: &DirectiveDefinition,
    raw: &Arguments,
) -> Result<Arguments, ApplyError> {
    for key in raw.keys() {
        if !definition.arguments().any(|arg| same_name(key, &arg.name)) {
            tracing::trace!(directive = definition.name(), argument = %key, "dropping unknown argument");
        }
    }

    let mut coerced = Arguments::new();
    let mut errors = Vec::new();

    for declared in definition.arguments() {
        let supplied = raw
            .iter()
            .find(|(key, _)| same_name(key, &declared.name))
            .map(|(_, value)| value);

        match supplied {
            None | Some(Value::Null) if declared.is_required() => {
                return Err(ApplyError::MissingArgument {
                    directive: definition.name().to_string(),
                    argument: declared.name.clone(),
                    ty: declared.ty.to_string(),
                });
            }
            None => {}
            Some(value) => {
                match coerce_argument(&declared.name, value, &declared.ty, definition.input_types()) {
                    Ok(value) => {
                        coerced.insert(declared.name.clone(), value);
                    }
                    Err(mut diagnostics) => errors.append(&mut diagnostics),
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(coerced)
    } else {
        Err(ApplyError::ArgumentValueType {
            directive: definition.name().to_string(),
            errors,
        })
    }
}

/// A member default that does not coerce to the member's type.
#[derive(Debug)]
pub(crate) struct InvalidDefault {
    pub path: String,
    pub errors: Vec<String>,
}

/// Replace field-argument and input-field defaults with their coerced form.
///
/// Enum defaults given as strings become enum literals, so the printed
/// `= VALUE` is valid SDL.
pub(crate) fn coerce_defaults(types: &mut InputTypes) -> Result<(), InvalidDefault> {
    let lookup = types.clone();

    for ty in types.values_mut() {
        match ty {
            NamedType::Object(ObjectType { name, fields, .. })
            | NamedType::Interface(InterfaceType { name, fields, .. }) => {
                for field in fields.iter_mut() {
                    for argument in field.arguments.iter_mut() {
                        let path = format!("{name}.{}({}:)", field.name, argument.name);
                        coerce_default(&mut argument.default, &argument.name, &argument.ty, &lookup, path)?;
                    }
                }
            }
            NamedType::InputObject(input) => {
                for field in input.fields.iter_mut() {
                    let path = format!("{}.{}", input.name, field.name);
                    coerce_default(&mut field.default, &field.name, &field.ty, &lookup, path)?;
                }
            }
            NamedType::Union(_) | NamedType::Enum(_) | NamedType::Scalar(_) => {}
        }
    }
    Ok(())
}

fn coerce_default(
    default: &mut Option<Value>,
    name: &str,
    ty: &TypeRef,
    types: &InputTypes,
    path: String,
) -> Result<(), InvalidDefault> {
    if let Some(value) = default.as_ref() {
        let coerced = coerce_argument(name, value, ty, types).map_err(|errors| InvalidDefault { path, errors })?;
        *default = Some(coerced);
    }
    Ok(())
}

struct Coercer<'a> {
    argument: &'a str,
    types: &'a InputTypes,
    errors: Vec<String>,
}

impl Coercer<'_> {
    fn coerce(&mut self, value: &Value, ty: &TypeRef, path: &str) -> Value {
        match ty {
            TypeRef::NonNull(inner) => {
                if value.is_null() {
                    self.report(value, path, format!("Expected non-nullable type '{ty}' not to be null."));
                    return Value::Null;
                }
                self.coerce(value, inner, path)
            }
            _ if value.is_null() => Value::Null,
            TypeRef::List(inner) => match value {
                Value::List(items) => Value::List(
                    items
                        .iter()
                        .enumerate()
                        .map(|(idx, item)| self.coerce(item, inner, &format!("{path}[{idx}]")))
                        .collect(),
                ),
                single => Value::List(vec![self.coerce(single, inner, path)]),
            },
            TypeRef::Named(name) => self.coerce_named(value, name, path),
        }
    }

    fn coerce_named(&mut self, value: &Value, name: &str, path: &str) -> Value {
        match name {
            "Int" => self.coerce_int(value, path),
            "Float" => match value {
                Value::Int(i) => Value::Float(*i as f64),
                Value::Float(f) if f.is_finite() => Value::Float(*f),
                other => self.fail(other, path, format!("Float cannot represent non numeric value: {other}")),
            },
            "String" => match value {
                Value::String(s) => Value::String(s.clone()),
                other => self.fail(other, path, format!("String cannot represent a non string value: {other}")),
            },
            "Boolean" => match value {
                Value::Boolean(b) => Value::Boolean(*b),
                other => self.fail(other, path, format!("Boolean cannot represent a non boolean value: {other}")),
            },
            "ID" => match value {
                Value::String(s) => Value::String(s.clone()),
                Value::Int(i) => Value::String(i.to_string()),
                other => self.fail(other, path, format!("ID cannot represent value: {other}")),
            },
            _ => match self.types.get(name) {
                Some(NamedType::Enum(enum_type)) => self.coerce_enum(value, enum_type, path),
                Some(NamedType::InputObject(input)) => self.coerce_input_object(value, input, path),
                Some(NamedType::Scalar(_)) => value.clone(),
                Some(other) => self.fail(
                    value,
                    path,
                    format!("Type '{}' is not an input type.", other.name()),
                ),
                None => self.fail(value, path, format!("Unknown type '{name}'.")),
            },
        }
    }

    fn coerce_int(&mut self, value: &Value, path: &str) -> Value {
        let int = match value {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        };

        match int {
            Some(i) if i32::try_from(i).is_ok() => Value::Int(i),
            Some(_) => self.fail(
                value,
                path,
                format!("Int cannot represent non 32-bit signed integer value: {value}"),
            ),
            None => self.fail(value, path, format!("Int cannot represent non-integer value: {value}")),
        }
    }

    fn coerce_enum(&mut self, value: &Value, enum_type: &EnumType, path: &str) -> Value {
        match value.as_str() {
            Some(name) if enum_type.has_value(name) => Value::Enum(name.to_string()),
            _ => self.fail(
                value,
                path,
                format!("Value {value} does not exist in '{}' enum.", enum_type.name),
            ),
        }
    }

    fn coerce_input_object(&mut self, value: &Value, input: &InputObjectType, path: &str) -> Value {
        let Value::Object(fields) = value else {
            return self.fail(value, path, format!("Expected type '{}' to be an object.", input.name));
        };

        let mut coerced = IndexMap::new();

        for field in &input.fields {
            let field_path = format!("{path}.{}", field.name);
            let supplied = fields
                .iter()
                .find(|(key, _)| same_name(key, &field.name))
                .map(|(_, value)| value);
            match supplied {
                Some(field_value) => {
                    let field_value = self.coerce(field_value, &field.ty, &field_path);
                    coerced.insert(field.name.clone(), field_value);
                }
                None => match &field.default {
                    Some(default) => {
                        let default = self.coerce(default, &field.ty, &field_path);
                        coerced.insert(field.name.clone(), default);
                    }
                    None if field.ty.is_non_null() => {
                        self.report(
                            value,
                            path,
                            format!(
                                "Field '{}' of required type '{}' was not provided.",
                                field.name, field.ty
                            ),
                        );
                    }
                    None => {}
                },
            }
        }

        for key in fields.keys() {
            if !input.fields.iter().any(|field| same_name(key, &field.name)) {
                self.report(
                    value,
                    path,
                    format!("Field '{key}' is not defined by type '{}'.", input.name),
                );
            }
        }

        Value::Object(coerced)
    }

    fn fail(&mut self, value: &Value, path: &str, message: String) -> Value {
        self.report(value, path, message);
        Value::Null
    }

    fn report(&mut self, value: &Value, path: &str, message: String) {
        let mut prefix = format!("Argument '{}' got invalid value {value}", self.argument);
        if !path.is_empty() {
            prefix.push_str(&format!(" at '{}{path}'", self.argument));
        }
        self.errors.push(format!("{prefix}; {message}"));
    }
}
