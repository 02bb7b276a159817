//! Naming convention between attachment-time names and wire (SDL) names.

use heck::{ToLowerCamelCase, ToSnakeCase};

use crate::coerce::InputTypes;
use crate::types::TypeRef;
use crate::typesystem::NamedType;
use crate::value::{Arguments, Value};

/// How field, argument and directive-argument names appear in the SDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseConvention {
    /// `born_in` is printed as `bornIn`.
    #[default]
    CamelCase,
    /// Names are printed exactly as declared.
    Preserve,
}

impl CaseConvention {
    pub fn from_auto_camel_case(auto_camel_case: bool) -> Self {
        if auto_camel_case {
            CaseConvention::CamelCase
        } else {
            CaseConvention::Preserve
        }
    }

    /// Convert a declared name to its wire form.
    pub fn encode(self, name: &str) -> String {
        match self {
            CaseConvention::CamelCase => to_camel_case(name),
            CaseConvention::Preserve => name.to_string(),
        }
    }

    /// Convert a wire name back to the form validators and transforms see.
    pub fn decode(self, name: &str) -> String {
        match self {
            CaseConvention::CamelCase => to_snake_case(name),
            CaseConvention::Preserve => name.to_string(),
        }
    }

    pub fn encode_arguments(self, arguments: Arguments) -> Arguments {
        arguments
            .into_iter()
            .map(|(name, value)| (self.encode(&name), value))
            .collect()
    }

    pub fn decode_arguments(self, arguments: Arguments) -> Arguments {
        arguments
            .into_iter()
            .map(|(name, value)| (self.decode(&name), value))
            .collect()
    }

    /// `value` with input-object field names in wire form, following `ty`.
    ///
    /// Keys that match no field of the input type are kept as they are.
    pub(crate) fn encode_value(self, value: &Value, ty: &TypeRef, types: &InputTypes) -> Value {
        if self == CaseConvention::Preserve {
            return value.clone();
        }

        match (value, types.get(ty.named_type())) {
            (Value::List(items), _) => Value::List(
                items
                    .iter()
                    .map(|item| self.encode_value(item, ty, types))
                    .collect(),
            ),
            (Value::Object(fields), Some(NamedType::InputObject(input))) => Value::Object(
                fields
                    .iter()
                    .map(|(key, field_value)| {
                        match input.fields.iter().find(|field| same_name(key, &field.name)) {
                            Some(field) => (
                                self.encode(&field.name),
                                self.encode_value(field_value, &field.ty, types),
                            ),
                            None => (key.clone(), field_value.clone()),
                        }
                    })
                    .collect(),
            ),
            _ => value.clone(),
        }
    }
}

/// `snake_case` to `lowerCamelCase`, keeping leading underscores.
///
/// Names without an inner underscore are already in wire form and are
/// returned unchanged, so `userID` stays `userID`.
pub fn to_camel_case(name: &str) -> String {
    let trimmed = name.trim_start_matches('_');
    if !trimmed.contains('_') {
        return name.to_string();
    }
    let prefix = &name[..name.len() - trimmed.len()];
    format!("{prefix}{}", trimmed.to_lower_camel_case())
}

/// `lowerCamelCase` to `snake_case`, keeping leading underscores.
pub fn to_snake_case(name: &str) -> String {
    let trimmed = name.trim_start_matches('_');
    let prefix = &name[..name.len() - trimmed.len()];
    format!("{prefix}{}", trimmed.to_snake_case())
}

/// True when two spellings denote the same argument.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a == b || to_camel_case(a) == to_camel_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn camel_case_conversion() {
        assert_eq!(to_camel_case("max_age"), "maxAge");
        assert_eq!(to_camel_case("born_in"), "bornIn");
        assert_eq!(to_camel_case("maxAge"), "maxAge");
        assert_eq!(to_camel_case("userID"), "userID");
        assert_eq!(to_camel_case("_private_field"), "_privateField");
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("maxAge"), "max_age");
        assert_eq!(to_snake_case("max_age"), "max_age");
        assert_eq!(to_snake_case("directiveName"), "directive_name");
    }

    #[test]
    fn preserve_is_identity() {
        let convention = CaseConvention::from_auto_camel_case(false);
        assert_eq!(convention.encode("max_age"), "max_age");
        assert_eq!(convention.decode("maxAge"), "maxAge");
    }

    #[test]
    fn argument_round_trip_through_camel_case() {
        let convention = CaseConvention::default();
        let mut arguments = Arguments::new();
        arguments.insert("max_age".into(), Value::Int(1));

        let encoded = convention.encode_arguments(arguments);
        assert!(encoded.contains_key("maxAge"));

        let decoded = convention.decode_arguments(encoded);
        assert!(decoded.contains_key("max_age"));
    }

    #[test]
    fn nested_input_object_keys_follow_the_convention() {
        use crate::typesystem::{InputField, InputObjectType};

        let mut types = InputTypes::new();
        types.insert(
            "Window".into(),
            InputObjectType::new("Window")
                .field(InputField::new("start_time", TypeRef::named("Int")))
                .field(InputField::new("next_window", TypeRef::named("Window")))
                .into(),
        );
        let value = Value::from(serde_json::json!([{ "start_time": 1, "next_window": { "start_time": 2 } }]));
        let ty = TypeRef::list(TypeRef::named("Window"));

        assert_eq!(
            CaseConvention::CamelCase.encode_value(&value, &ty, &types).to_string(),
            "[{startTime: 1, nextWindow: {startTime: 2}}]"
        );
        assert_eq!(CaseConvention::Preserve.encode_value(&value, &ty, &types), value);
    }

    #[test]
    fn equivalent_spellings() {
        assert!(same_name("max_age", "maxAge"));
        assert!(same_name("scope", "scope"));
        assert!(!same_name("max_age", "swr"));
    }
}
