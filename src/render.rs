//! Annotated SDL: directive applications placed onto the printed schema.

use std::collections::HashMap;

use crate::casing::{same_name, to_snake_case, CaseConvention};
use crate::definition::DirectiveDefinition;
use crate::error::RenderError;
use crate::schema::{AnnotatedSchema, CarrierRef};
use crate::sdl::{Annotations, Printer};
use crate::typesystem::CarrierId;
use crate::value::Arguments;

pub(crate) fn render(schema: &AnnotatedSchema) -> Result<String, RenderError> {
    let header = schema_header(schema);

    let mut annotations = Annotations::new();
    let mut paths = HashMap::new();
    for carrier in schema.carriers() {
        let annotation = annotate(schema, &carrier)?;
        if !annotation.is_empty() {
            annotations.insert(carrier.id(), annotation);
            paths.insert(carrier.id(), carrier.path());
        }
    }

    let sdl = print_annotated(schema, header.as_deref(), &annotations, &paths)?;

    tracing::debug!(
        carriers = annotations.len(),
        schema_directives = schema.schema_directives().len(),
        "rendered annotated schema"
    );

    Ok(sdl)
}

/// One print pass; every annotation must land on its declaration.
fn print_annotated(
    schema: &AnnotatedSchema,
    header: Option<&str>,
    annotations: &Annotations,
    paths: &HashMap<CarrierId, String>,
) -> Result<String, RenderError> {
    let mut printer = Printer::new(schema, annotations);
    if let Some(header) = header {
        printer = printer.header(header);
    }
    let sdl = printer.to_string();

    if let Some((id, annotation)) = printer.unplaced().into_iter().next() {
        return Err(RenderError::UnplacedAnnotation {
            carrier: paths.get(&id).cloned().unwrap_or_default(),
            annotation: annotation.to_string(),
        });
    }

    Ok(sdl)
}

/// `extend schema` followed by one schema directive per line.
fn schema_header(schema: &AnnotatedSchema) -> Option<String> {
    if schema.schema_directives().is_empty() {
        return None;
    }

    let mut header = String::from("extend schema");
    for directive in schema.schema_directives() {
        header.push_str("\n  ");
        header.push_str(&directive_string(
            directive.definition(),
            directive.arguments(),
            schema.case_convention(),
        ));
    }
    Some(header)
}

/// Directive text for one carrier, in registration order then application order.
fn annotate(schema: &AnnotatedSchema, carrier: &CarrierRef<'_>) -> Result<String, RenderError> {
    let case = schema.case_convention();
    let mut rendered = Vec::new();

    for definition in schema.directives() {
        for application in schema.store().applications_of(carrier.id(), definition.name()) {
            let arguments = case.decode_arguments(application.arguments().clone());

            let valid = match *carrier {
                CarrierRef::Type(ty) => definition
                    .type_validator()
                    .map_or(true, |validate| validate(ty, &arguments, schema)),
                CarrierRef::Member { parent, target } => definition
                    .field_validator()
                    .map_or(true, |validate| validate(parent, target, &arguments, schema)),
            };

            if !valid {
                return Err(RenderError::CustomValidation {
                    directive: definition.name().to_string(),
                    carrier: carrier.path(),
                    arguments,
                });
            }

            let arguments = match definition.input_transform() {
                Some(transform) => transform(arguments, schema),
                None => arguments,
            };

            tracing::trace!(directive = definition.name(), carrier = %carrier.path(), "annotating");
            rendered.push(directive_string(definition, &arguments, case));
        }
    }

    Ok(rendered.join(" "))
}

/// `@name(arg: value, ...)`.
///
/// Keys are matched to declared arguments in any casing and printed in wire
/// form, down into input-object values; unknown keys and null values are left
/// out. Parentheses are omitted
/// when nothing remains.
fn directive_string(definition: &DirectiveDefinition, arguments: &Arguments, case: CaseConvention) -> String {
    let rendered: Vec<String> = arguments
        .iter()
        .filter(|(_, value)| !value.is_null())
        .filter_map(|(key, value)| {
            let declared = definition.arguments().find(|argument| {
                same_name(key, &argument.name) || to_snake_case(key) == to_snake_case(&argument.name)
            })?;
            let value = case.encode_value(value, &declared.ty, definition.input_types());
            Some(format!("{}: {value}", case.encode(&declared.name)))
        })
        .collect();

    if rendered.is_empty() {
        format!("@{}", definition.name())
    } else {
        format!("@{}({})", definition.name(), rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::InputValue;
    use crate::types::{DirectiveLocation, TypeRef};
    use crate::value::Value;

    fn cache() -> std::sync::Arc<DirectiveDefinition> {
        DirectiveDefinition::builder("cache")
            .location(DirectiveLocation::Object)
            .argument(InputValue::new("max_age", TypeRef::named("Int")))
            .argument(InputValue::new("swr", TypeRef::named("Int")))
            .build()
            .unwrap()
    }

    #[test]
    fn null_and_unknown_arguments_are_left_out() {
        let mut arguments = Arguments::new();
        arguments.insert("max_age".into(), Value::Int(60));
        arguments.insert("swr".into(), Value::Null);
        arguments.insert("extra".into(), Value::Boolean(true));

        assert_eq!(
            directive_string(&cache(), &arguments, CaseConvention::CamelCase),
            "@cache(maxAge: 60)"
        );
        assert_eq!(
            directive_string(&cache(), &arguments, CaseConvention::Preserve),
            "@cache(max_age: 60)"
        );
    }

    #[test]
    fn no_arguments_means_no_parentheses() {
        assert_eq!(
            directive_string(&cache(), &Arguments::new(), CaseConvention::CamelCase),
            "@cache"
        );
    }

    #[test]
    fn annotation_without_a_declaration_fails() {
        use crate::store::DirectiveStore;
        use crate::typesystem::{Carrier, Field, ObjectType};
        use crate::SchemaAssembler;

        let schema = SchemaAssembler::new()
            .query(ObjectType::new("Query").field(Field::new("ping", TypeRef::named("String"))))
            .directive(cache())
            .assemble(DirectiveStore::new())
            .unwrap();
        let stray = ObjectType::new("Stray");

        let mut annotations = Annotations::new();
        annotations.insert(stray.carrier_id(), "@cache(maxAge: 1)".to_string());
        let mut paths = HashMap::new();
        paths.insert(stray.carrier_id(), "Stray".to_string());

        match print_annotated(&schema, None, &annotations, &paths) {
            Err(RenderError::UnplacedAnnotation { carrier, annotation }) => {
                assert_eq!(carrier, "Stray");
                assert_eq!(annotation, "@cache(maxAge: 1)");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn input_object_values_use_wire_field_names() {
        use crate::typesystem::{InputField, InputObjectType};

        let window = DirectiveDefinition::builder("window")
            .location(DirectiveLocation::Object)
            .argument(InputValue::new("span", TypeRef::named("Window")))
            .input_type(
                InputObjectType::new("Window").field(InputField::new("start_time", TypeRef::named("Int"))),
            )
            .build()
            .unwrap();
        let mut arguments = Arguments::new();
        arguments.insert(
            "span".into(),
            Value::from(serde_json::json!({ "start_time": 5 })),
        );

        assert_eq!(
            directive_string(&window, &arguments, CaseConvention::CamelCase),
            "@window(span: {startTime: 5})"
        );
        assert_eq!(
            directive_string(&window, &arguments, CaseConvention::Preserve),
            "@window(span: {start_time: 5})"
        );
    }

    #[test]
    fn wire_keys_map_back_to_declared_arguments() {
        let mut arguments = Arguments::new();
        arguments.insert("maxAge".into(), Value::Int(5));
        assert_eq!(
            directive_string(&cache(), &arguments, CaseConvention::Preserve),
            "@cache(max_age: 5)"
        );
    }
}
