//! Integration tests for directive application and annotated SDL.

use std::sync::Arc;

use graphql_directives::{
    Argument, AssembleError, DirectiveDefinition, DirectiveLocation, DirectiveStore, EnumType,
    EnumValue, Field, FieldTarget, InputField, InputObjectType, InputValue, NamedType, ObjectType,
    RenderError, SchemaAssembler, TypeRef, Value,
};
use indoc::indoc;

fn cache() -> Arc<DirectiveDefinition> {
    DirectiveDefinition::builder("cache")
        .description("Caching directive to control cache behavior of fields or fragments.")
        .locations([DirectiveLocation::Object, DirectiveLocation::FieldDefinition])
        .argument(InputValue::new("max_age", TypeRef::non_null("Int")))
        .argument(InputValue::new("swr", TypeRef::named("Int")))
        .argument(InputValue::new("scope", TypeRef::named("String")))
        .build()
        .unwrap()
}

fn query(target: &str) -> ObjectType {
    ObjectType::new("Query").field(Field::new(target.to_lowercase(), TypeRef::named(target)))
}

mod placement {
    use super::*;

    #[test]
    fn type_and_field_applications() {
        let cache = cache();
        let mut store = DirectiveStore::new();

        let y = cache
            .apply()
            .arg("max_age", 60)
            .to(&mut store, Field::new("y", TypeRef::non_null("Int")))
            .unwrap();
        let position = cache
            .apply()
            .arg("max_age", 100)
            .to(
                &mut store,
                ObjectType::new("Position")
                    .field(Field::new("x", TypeRef::non_null("Int")))
                    .field(y),
            )
            .unwrap();

        let schema = SchemaAssembler::new()
            .query(query("Position"))
            .type_(position)
            .directive(cache)
            .assemble(store)
            .unwrap();

        let expected = indoc! {r#"
            """Caching directive to control cache behavior of fields or fragments."""
            directive @cache(maxAge: Int!, swr: Int, scope: String) on OBJECT | FIELD_DEFINITION

            type Query {
              position: Position
            }

            type Position @cache(maxAge: 100) {
              x: Int!
              y: Int! @cache(maxAge: 60)
            }"#};
        assert_eq!(schema.sdl().unwrap(), expected);
        assert_eq!(schema.sdl().unwrap(), expected);
    }

    #[test]
    fn repeatable_schema_directives_open_the_output() {
        let compose = DirectiveDefinition::builder("compose")
            .location(DirectiveLocation::Schema)
            .argument(InputValue::new("directive_name", TypeRef::non_null("String")))
            .repeatable(true)
            .build()
            .unwrap();

        let schema_directives = ["@lowercase", "@uppercase", "@trim"]
            .into_iter()
            .map(|name| compose.apply().arg("directive_name", name).to_schema().unwrap());

        let schema = SchemaAssembler::new()
            .query(ObjectType::new("Query").field(Field::new("ping", TypeRef::named("String"))))
            .directive(Arc::clone(&compose))
            .schema_directives(schema_directives)
            .assemble(DirectiveStore::new())
            .unwrap();

        let sdl = schema.sdl().unwrap();
        assert!(sdl.starts_with(indoc! {r#"
            extend schema
              @compose(directiveName: "@lowercase")
              @compose(directiveName: "@uppercase")
              @compose(directiveName: "@trim")

            directive @compose(directiveName: String!) repeatable on SCHEMA
        "#}));
        assert_eq!(schema.directives_used().len(), 1);
    }

    #[test]
    fn field_annotations_follow_deprecation() {
        let tag = DirectiveDefinition::builder("tag")
            .locations([
                DirectiveLocation::FieldDefinition,
                DirectiveLocation::ArgumentDefinition,
                DirectiveLocation::EnumValue,
                DirectiveLocation::InputFieldDefinition,
            ])
            .argument(InputValue::new("name", TypeRef::non_null("String")))
            .repeatable(true)
            .build()
            .unwrap();
        let mut store = DirectiveStore::new();

        let first = tag
            .apply()
            .arg("name", "paging")
            .to(&mut store, Argument::new("first", TypeRef::named("Int")).default_value(10))
            .unwrap();
        let name = tag
            .apply()
            .arg("name", "a")
            .to(&mut store, Field::new("name", TypeRef::named("String")).deprecated("Use full_name."))
            .unwrap();
        let name = tag.apply().arg("name", "b").to(&mut store, name).unwrap();
        let friends = Field::new("friends", TypeRef::list(TypeRef::non_null("String"))).argument(first);
        let red = tag
            .apply()
            .arg("name", "warm")
            .to(&mut store, EnumValue::new("RED").deprecated("No longer supported"))
            .unwrap();
        let limit = tag
            .apply()
            .arg("name", "bounds")
            .to(&mut store, InputField::new("limit", TypeRef::named("Int")))
            .unwrap();

        let schema = SchemaAssembler::new()
            .query(ObjectType::new("Query").field(name).field(friends))
            .type_(EnumType::new("Color").value(red).value("BLUE"))
            .type_(InputObjectType::new("Filter").field(limit))
            .directive(tag)
            .assemble(store)
            .unwrap();

        let expected = indoc! {r#"
            directive @tag(name: String!) repeatable on FIELD_DEFINITION | ARGUMENT_DEFINITION | ENUM_VALUE | INPUT_FIELD_DEFINITION

            type Query {
              name: String @deprecated(reason: "Use full_name.") @tag(name: "a") @tag(name: "b")
              friends(first: Int = 10 @tag(name: "paging")): [String!]
            }

            enum Color {
              RED @deprecated @tag(name: "warm")
              BLUE
            }

            input Filter {
              limit: Int @tag(name: "bounds")
            }"#};
        assert_eq!(schema.sdl().unwrap(), expected);
    }

    #[test]
    fn field_and_argument_directives_on_the_same_field() {
        let cache = cache();
        let tag = DirectiveDefinition::builder("tag")
            .location(DirectiveLocation::ArgumentDefinition)
            .argument(InputValue::new("name", TypeRef::non_null("String")))
            .build()
            .unwrap();
        let mut store = DirectiveStore::new();

        let id = tag
            .apply()
            .arg("name", "lookup")
            .to(&mut store, Argument::new("id", TypeRef::non_null("ID")))
            .unwrap();
        let position = cache
            .apply()
            .arg("max_age", 30)
            .to(
                &mut store,
                Field::new("position", TypeRef::named("Int")).argument(id),
            )
            .unwrap();

        let schema = SchemaAssembler::new()
            .query(ObjectType::new("Query").field(position))
            .directives([cache, tag])
            .assemble(store)
            .unwrap();

        assert!(schema
            .sdl()
            .unwrap()
            .contains(r#"  position(id: ID! @tag(name: "lookup")): Int @cache(maxAge: 30)"#));
        assert_eq!(schema.directives_used().len(), 2);
    }

    #[test]
    fn hidden_definitions_still_annotate() {
        let internal = DirectiveDefinition::builder("internal")
            .location(DirectiveLocation::Object)
            .include_definition(false)
            .build()
            .unwrap();
        let mut store = DirectiveStore::new();
        let audit = internal
            .apply()
            .to(
                &mut store,
                ObjectType::new("Audit").field(Field::new("id", TypeRef::non_null("ID"))),
            )
            .unwrap();

        let schema = SchemaAssembler::new()
            .query(query("Audit"))
            .type_(audit)
            .directive(internal)
            .assemble(store)
            .unwrap();

        let sdl = schema.sdl().unwrap();
        assert!(!sdl.contains("directive @internal"));
        assert!(sdl.contains("type Audit @internal {"));
    }

    #[test]
    fn registration_order_then_application_order() {
        let first = DirectiveDefinition::builder("first")
            .location(DirectiveLocation::Object)
            .build()
            .unwrap();
        let second = DirectiveDefinition::builder("second")
            .location(DirectiveLocation::Object)
            .argument(InputValue::new("n", TypeRef::named("Int")))
            .repeatable(true)
            .build()
            .unwrap();
        let mut store = DirectiveStore::new();

        let mut object = ObjectType::new("Thing").field(Field::new("id", TypeRef::named("ID")));
        object = second.apply().arg("n", 1).to(&mut store, object).unwrap();
        object = first.apply().to(&mut store, object).unwrap();
        object = second.apply().arg("n", 2).to(&mut store, object).unwrap();

        let schema = SchemaAssembler::new()
            .query(query("Thing"))
            .type_(object)
            .directives([first, second])
            .assemble(store)
            .unwrap();

        assert!(schema
            .sdl()
            .unwrap()
            .contains("type Thing @first @second(n: 1) @second(n: 2) {"));
    }
}

mod naming {
    use super::*;

    fn schema(auto_camel_case: bool) -> graphql_directives::AnnotatedSchema {
        let cache = cache();
        let mut store = DirectiveStore::new();
        let born_in = cache
            .apply()
            .arg("maxAge", 5)
            .to(
                &mut store,
                Field::new("born_in", TypeRef::named("String"))
                    .argument(Argument::new("date_format", TypeRef::named("String"))),
            )
            .unwrap();
        let person = ObjectType::new("Person").field(born_in);

        SchemaAssembler::new()
            .query(query("Person"))
            .type_(person)
            .directive(cache)
            .auto_camel_case(auto_camel_case)
            .assemble(store)
            .unwrap()
    }

    #[test]
    fn camel_case_by_default() {
        let sdl = schema(true).sdl().unwrap();
        assert!(sdl.contains("directive @cache(maxAge: Int!, swr: Int, scope: String)"));
        assert!(sdl.contains("  bornIn(dateFormat: String): String @cache(maxAge: 5)"));
    }

    #[test]
    fn preserve_prints_declared_names() {
        let sdl = schema(false).sdl().unwrap();
        assert!(sdl.contains("directive @cache(max_age: Int!, swr: Int, scope: String)"));
        assert!(sdl.contains("  born_in(date_format: String): String @cache(max_age: 5)"));
    }
}

mod typed_arguments {
    use super::*;

    fn scope() -> EnumType {
        EnumType::new("CacheScope").value("PUBLIC").value("PRIVATE")
    }

    fn window() -> InputObjectType {
        InputObjectType::new("Window")
            .field(InputField::new("start_time", TypeRef::non_null("Int")))
            .field(InputField::new("scope", TypeRef::named("CacheScope")).default_value("PUBLIC"))
    }

    fn schema(auto_camel_case: bool, span: Value) -> Result<String, graphql_directives::Error> {
        let cached = DirectiveDefinition::builder("cached")
            .locations([DirectiveLocation::Object])
            .argument(InputValue::new("scope", TypeRef::named("CacheScope")).default_value("PUBLIC"))
            .argument(InputValue::new("span", TypeRef::named("Window")))
            .input_type(scope())
            .input_type(window())
            .build()?;
        let mut store = DirectiveStore::new();
        let pos = cached
            .apply()
            .arg("scope", "PRIVATE")
            .arg("span", span)
            .to(
                &mut store,
                ObjectType::new("Pos").field(Field::new("x", TypeRef::named("Int"))),
            )?;

        let schema = SchemaAssembler::new()
            .query(query("Pos"))
            .type_(pos)
            .directive(cached)
            .auto_camel_case(auto_camel_case)
            .assemble(store)?;
        Ok(schema.sdl()?)
    }

    #[test]
    fn enum_values_print_as_enum_literals() {
        let sdl = schema(true, Value::from(serde_json::json!({ "start_time": 5 }))).unwrap();

        assert!(sdl.contains("directive @cached(scope: CacheScope = PUBLIC, span: Window) on OBJECT"));
        assert!(sdl.contains("  scope: CacheScope = PUBLIC\n"));
        assert!(sdl.contains("type Pos @cached(scope: PRIVATE, span: {startTime: 5, scope: PUBLIC}) {"));
    }

    #[test]
    fn input_object_fields_follow_the_case_convention() {
        let sdl = schema(true, Value::from(serde_json::json!({ "start_time": 5 }))).unwrap();
        assert!(sdl.contains(indoc! {"
            input Window {
              startTime: Int!
              scope: CacheScope = PUBLIC
            }"}));
        assert!(sdl.contains("span: {startTime: 5, scope: PUBLIC}"));

        let sdl = schema(false, Value::from(serde_json::json!({ "start_time": 5 }))).unwrap();
        assert!(sdl.contains("  start_time: Int!\n"));
        assert!(sdl.contains("span: {start_time: 5, scope: PUBLIC}"));
    }

    #[test]
    fn wire_spelling_is_accepted_inside_input_objects() {
        let declared = schema(true, Value::from(serde_json::json!({ "start_time": 5 }))).unwrap();
        let wire = schema(true, Value::from(serde_json::json!({ "startTime": 5 }))).unwrap();
        assert_eq!(declared, wire);
    }

    #[test]
    fn unknown_input_object_field_is_rejected() {
        let err = schema(true, Value::from(serde_json::json!({ "start_time": 5, "end": 9 }))).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Field 'end' is not defined by type 'Window'."));
    }
}

mod hooks {
    use super::*;

    fn build(directive: Arc<DirectiveDefinition>, type_name: &str) -> Result<String, RenderError> {
        let mut store = DirectiveStore::new();
        let field = directive
            .apply()
            .arg("max_age", 10)
            .to(&mut store, Field::new("value", TypeRef::named("Int")))
            .unwrap();
        let object = directive
            .apply()
            .arg("max_age", 20)
            .to(&mut store, ObjectType::new(type_name).field(field))
            .unwrap();

        SchemaAssembler::new()
            .query(query(type_name))
            .type_(object)
            .directive(directive)
            .assemble(store)
            .unwrap()
            .sdl()
    }

    #[test]
    fn type_validator_rejects() {
        let directive = DirectiveDefinition::builder("cache")
            .locations([DirectiveLocation::Object, DirectiveLocation::FieldDefinition])
            .argument(InputValue::new("max_age", TypeRef::non_null("Int")))
            .type_validator(|ty, arguments, _schema| {
                ty.name() != "Secret" && arguments.get("max_age") == Some(&Value::Int(20))
            })
            .build()
            .unwrap();

        assert!(build(Arc::clone(&directive), "Public").is_ok());

        let err = build(directive, "Secret").unwrap_err();
        assert_eq!(
            err.to_string(),
            "custom validation failed for @cache on \"Secret\" with arguments (max_age: 20)"
        );
    }

    #[test]
    fn field_validator_sees_parent_and_target() {
        let directive = DirectiveDefinition::builder("cache")
            .locations([DirectiveLocation::Object, DirectiveLocation::FieldDefinition])
            .argument(InputValue::new("max_age", TypeRef::non_null("Int")))
            .field_validator(|parent, target, _arguments, _schema| {
                matches!(parent, NamedType::Object(_))
                    && matches!(target, FieldTarget::Field(field) if field.ty.is_non_null())
            })
            .build()
            .unwrap();

        let err = build(directive, "Reading").unwrap_err();
        assert!(matches!(err, RenderError::CustomValidation { ref carrier, .. } if carrier == "Reading.value"));
    }

    #[test]
    fn transform_rewrites_printed_arguments() {
        let directive = DirectiveDefinition::builder("cache")
            .locations([DirectiveLocation::Object, DirectiveLocation::FieldDefinition])
            .argument(InputValue::new("max_age", TypeRef::non_null("Int")))
            .argument(InputValue::new("scope", TypeRef::named("String")))
            .input_transform(|mut arguments, schema| {
                let scope = if schema.mutation_type().is_some() { "PRIVATE" } else { "PUBLIC" };
                arguments.insert("scope".into(), Value::from(scope));
                arguments.insert("ignored".into(), Value::Boolean(true));
                arguments
            })
            .build()
            .unwrap();

        let sdl = build(directive, "Reading").unwrap();
        assert!(sdl.contains("type Reading @cache(maxAge: 20, scope: \"PUBLIC\") {"));
        assert!(sdl.contains("  value: Int @cache(maxAge: 10, scope: \"PUBLIC\")"));
    }

    #[test]
    fn identical_input_renders_identically() {
        let first = build(cache(), "Reading").unwrap();
        let second = build(cache(), "Reading").unwrap();
        assert_eq!(first, second);
    }
}

mod assembly {
    use super::*;
    use graphql_directives::ApplyError;

    #[test]
    fn non_repeatable_twice_on_a_field_fails_before_rendering() {
        let cache = cache();
        let mut store = DirectiveStore::new();
        let field = cache
            .apply()
            .arg("max_age", 1)
            .to(&mut store, Field::new("y", TypeRef::named("Int")))
            .unwrap();

        let err = cache.apply().arg("max_age", 2).to(&mut store, field).unwrap_err();
        assert!(matches!(err, ApplyError::NotRepeatable { ref carrier, .. } if carrier == "y"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_required_argument_fails_at_application() {
        let mut store = DirectiveStore::new();
        let err = cache()
            .apply()
            .arg("swr", 10)
            .to(&mut store, ObjectType::new("Position"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "argument \"max_age\" of required type 'Int!' is required for @cache"
        );
        assert!(store.is_empty());
    }

    #[test]
    fn reserved_names_are_rejected() {
        for name in ["include", "skip", "deprecated", "specifiedBy"] {
            let directive = DirectiveDefinition::builder(name)
                .location(DirectiveLocation::Object)
                .build()
                .unwrap();
            let err = SchemaAssembler::new()
                .query(query("Query"))
                .directive(directive)
                .assemble(DirectiveStore::new())
                .unwrap_err();
            assert!(matches!(err, AssembleError::ReservedDirective { .. }), "{name}");
        }
    }

    #[test]
    fn baseline_has_no_applications() {
        let cache = cache();
        let mut store = DirectiveStore::new();
        let position = cache
            .apply()
            .arg("max_age", 100)
            .to(
                &mut store,
                ObjectType::new("Position").field(Field::new("x", TypeRef::non_null("Int"))),
            )
            .unwrap();
        let schema = SchemaAssembler::new()
            .query(query("Position"))
            .type_(position)
            .directive(cache)
            .assemble(store)
            .unwrap();

        let baseline = schema.print_baseline();
        assert!(baseline.contains("type Position {"));
        assert!(baseline.contains("directive @cache"));
        assert!(schema.sdl().unwrap().contains("type Position @cache(maxAge: 100) {"));
    }

    #[test]
    fn unused_directives_are_not_reported_as_used() {
        let tag = DirectiveDefinition::builder("tag")
            .location(DirectiveLocation::FieldDefinition)
            .build()
            .unwrap();
        let schema = SchemaAssembler::new()
            .query(ObjectType::new("Query").field(Field::new("ping", TypeRef::named("String"))))
            .directives([cache(), tag])
            .assemble(DirectiveStore::new())
            .unwrap();
        assert!(schema.directives_used().is_empty());
    }
}
