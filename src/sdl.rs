//! SDL printer with annotation slots.
//!
//! Layout: two-space indentation, block-string descriptions, a blank line
//! before every described member except the first, and declarations
//! separated by one empty line. Each declaration with a carrier has a slot
//! right after its name or signature where precomputed directive text goes.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Write};

use crate::definition::DirectiveDefinition;
use crate::schema::AnnotatedSchema;
use crate::types::{TypeRef, BUILTIN_SCALARS, DEFAULT_DEPRECATION_REASON};
use crate::typesystem::{
    Carrier, CarrierId, EnumType, Field, InputObjectType, NamedType, ScalarType, UnionType,
};
use crate::value::{write_quoted, Value};

const INDENT: &str = "  ";

/// Directive text per carrier, e.g. `@cache(maxAge: 60) @auth`.
pub(crate) type Annotations = HashMap<CarrierId, String>;

/// Print the schema without any custom directive application.
pub(crate) fn print_schema(schema: &AnnotatedSchema) -> String {
    let annotations = Annotations::new();
    Printer::new(schema, &annotations).to_string()
}

pub(crate) struct Printer<'a> {
    schema: &'a AnnotatedSchema,
    header: Option<&'a str>,
    annotations: &'a Annotations,
    placed: RefCell<HashSet<CarrierId>>,
}

impl<'a> Printer<'a> {
    pub(crate) fn new(schema: &'a AnnotatedSchema, annotations: &'a Annotations) -> Self {
        Self {
            schema,
            header: None,
            annotations,
            placed: RefCell::default(),
        }
    }

    /// Text printed before everything else, such as `extend schema` applications.
    pub(crate) fn header(mut self, header: &'a str) -> Self {
        self.header = Some(header);
        self
    }

    /// Annotations no declaration picked up during the last print.
    pub(crate) fn unplaced(&self) -> Vec<(CarrierId, &'a str)> {
        let placed = self.placed.borrow();
        self.annotations
            .iter()
            .filter(|(id, _)| !placed.contains(id))
            .map(|(id, annotation)| (*id, annotation.as_str()))
            .collect()
    }

    fn blocks(&self) -> Result<Vec<String>, fmt::Error> {
        let mut blocks = Vec::new();

        if let Some(header) = self.header {
            blocks.push(header.to_string());
        }

        if let Some(definition) = self.schema_definition() {
            blocks.push(definition);
        }

        for directive in self.schema.directives() {
            if directive.include_definition() {
                let mut out = String::new();
                self.write_directive_definition(&mut out, directive)?;
                blocks.push(out);
            }
        }

        for ty in self.schema.types() {
            if BUILTIN_SCALARS.contains(&ty.name()) {
                continue;
            }
            let mut out = String::new();
            self.write_type(&mut out, ty)?;
            blocks.push(out);
        }

        Ok(blocks)
    }

    /// `schema { ... }`, only when a root type has a non-default name.
    fn schema_definition(&self) -> Option<String> {
        let roots = [
            ("query", self.schema.query.as_deref(), "Query"),
            ("mutation", self.schema.mutation.as_deref(), "Mutation"),
            ("subscription", self.schema.subscription.as_deref(), "Subscription"),
        ];

        if roots
            .iter()
            .all(|(_, name, default)| name.map_or(true, |name| name == *default))
        {
            return None;
        }

        let operations: Vec<String> = roots
            .iter()
            .filter_map(|(operation, name, _)| name.map(|name| format!("{INDENT}{operation}: {name}")))
            .collect();

        Some(format!("schema {{\n{}\n}}", operations.join("\n")))
    }

    fn write_annotation(&self, out: &mut String, carrier: &dyn Carrier) -> fmt::Result {
        let id = carrier.carrier_id();
        if let Some(annotation) = self.annotations.get(&id) {
            self.placed.borrow_mut().insert(id);
            write!(out, " {annotation}")?;
        }
        Ok(())
    }

    fn write_directive_definition(&self, out: &mut String, directive: &DirectiveDefinition) -> fmt::Result {
        write_description(out, directive.description(), "", true)?;
        write!(out, "directive @{}", directive.name())?;

        let arguments: Vec<InputValueView<'_>> = directive
            .arguments()
            .map(|argument| InputValueView {
                name: &argument.name,
                ty: &argument.ty,
                default: argument.default.as_ref(),
                description: argument.description.as_deref(),
                deprecation_reason: None,
                carrier: None,
            })
            .collect();
        self.write_arguments(out, &arguments, "")?;

        if directive.is_repeatable() {
            out.push_str(" repeatable");
        }

        let locations: Vec<&str> = directive.locations().iter().map(|l| l.as_str()).collect();
        write!(out, " on {}", locations.join(" | "))
    }

    fn write_type(&self, out: &mut String, ty: &NamedType) -> fmt::Result {
        write_description(out, ty.description(), "", true)?;

        match ty {
            NamedType::Scalar(scalar) => self.write_scalar(out, scalar),
            NamedType::Object(object) => {
                write!(out, "type {}", object.name)?;
                write_implements(out, &object.implements)?;
                self.write_annotation(out, ty)?;
                self.write_fields(out, &object.fields)
            }
            NamedType::Interface(interface) => {
                write!(out, "interface {}", interface.name)?;
                write_implements(out, &interface.implements)?;
                self.write_annotation(out, ty)?;
                self.write_fields(out, &interface.fields)
            }
            NamedType::Union(union) => self.write_union(out, union),
            NamedType::Enum(enum_type) => self.write_enum(out, enum_type),
            NamedType::InputObject(input) => self.write_input_object(out, input),
        }
    }

    fn write_scalar(&self, out: &mut String, scalar: &ScalarType) -> fmt::Result {
        write!(out, "scalar {}", scalar.name)?;
        if let Some(url) = &scalar.specified_by_url {
            out.push_str(" @specifiedBy(url: ");
            write_quoted(out, url)?;
            out.push(')');
        }
        self.write_annotation(out, scalar)
    }

    fn write_union(&self, out: &mut String, union: &UnionType) -> fmt::Result {
        write!(out, "union {}", union.name)?;
        self.write_annotation(out, union)?;
        if !union.members.is_empty() {
            write!(out, " = {}", union.members.join(" | "))?;
        }
        Ok(())
    }

    fn write_enum(&self, out: &mut String, enum_type: &EnumType) -> fmt::Result {
        write!(out, "enum {}", enum_type.name)?;
        self.write_annotation(out, enum_type)?;

        let mut lines = Vec::with_capacity(enum_type.values.len());
        for (idx, value) in enum_type.values.iter().enumerate() {
            let mut line = String::new();
            write_description(&mut line, value.description.as_deref(), INDENT, idx == 0)?;
            write!(line, "{INDENT}{}", value.name)?;
            write_deprecated(&mut line, value.deprecation_reason.as_deref())?;
            self.write_annotation(&mut line, value)?;
            lines.push(line);
        }
        write_block(out, &lines)
    }

    fn write_input_object(&self, out: &mut String, input: &InputObjectType) -> fmt::Result {
        write!(out, "input {}", input.name)?;
        self.write_annotation(out, input)?;

        let mut lines = Vec::with_capacity(input.fields.len());
        for (idx, field) in input.fields.iter().enumerate() {
            let mut line = String::new();
            write_description(&mut line, field.description.as_deref(), INDENT, idx == 0)?;
            line.push_str(INDENT);
            self.write_input_value(
                &mut line,
                &InputValueView {
                    name: &field.name,
                    ty: &field.ty,
                    default: field.default.as_ref(),
                    description: None,
                    deprecation_reason: field.deprecation_reason.as_deref(),
                    carrier: Some(field),
                },
            )?;
            lines.push(line);
        }
        write_block(out, &lines)
    }

    fn write_fields(&self, out: &mut String, fields: &[Field]) -> fmt::Result {
        let mut lines = Vec::with_capacity(fields.len());

        for (idx, field) in fields.iter().enumerate() {
            let mut line = String::new();
            write_description(&mut line, field.description.as_deref(), INDENT, idx == 0)?;
            write!(line, "{INDENT}{}", self.schema.field_name(&field.name))?;

            let arguments: Vec<InputValueView<'_>> = field
                .arguments
                .iter()
                .map(|argument| InputValueView {
                    name: &argument.name,
                    ty: &argument.ty,
                    default: argument.default.as_ref(),
                    description: argument.description.as_deref(),
                    deprecation_reason: argument.deprecation_reason.as_deref(),
                    carrier: Some(argument),
                })
                .collect();
            self.write_arguments(&mut line, &arguments, INDENT)?;

            write!(line, ": {}", field.ty)?;
            write_deprecated(&mut line, field.deprecation_reason.as_deref())?;
            self.write_annotation(&mut line, field)?;
            lines.push(line);
        }

        write_block(out, &lines)
    }

    /// Inline when no argument has a description, one per line otherwise.
    fn write_arguments(&self, out: &mut String, arguments: &[InputValueView<'_>], indentation: &str) -> fmt::Result {
        if arguments.is_empty() {
            return Ok(());
        }

        if arguments.iter().all(|argument| argument.description.is_none()) {
            out.push('(');
            for (idx, argument) in arguments.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                self.write_input_value(out, argument)?;
            }
            out.push(')');
            return Ok(());
        }

        let inner = format!("{INDENT}{indentation}");
        out.push_str("(\n");
        for (idx, argument) in arguments.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            write_description(out, argument.description, &inner, idx == 0)?;
            out.push_str(&inner);
            self.write_input_value(out, argument)?;
        }
        write!(out, "\n{indentation})")
    }

    fn write_input_value(&self, out: &mut String, value: &InputValueView<'_>) -> fmt::Result {
        write!(out, "{}: {}", self.schema.field_name(value.name), value.ty)?;
        if let Some(default) = value.default {
            let default = self
                .schema
                .case_convention()
                .encode_value(default, value.ty, &self.schema.types);
            write!(out, " = {default}")?;
        }
        write_deprecated(out, value.deprecation_reason)?;
        if let Some(carrier) = value.carrier {
            self.write_annotation(out, carrier)?;
        }
        Ok(())
    }
}

impl Display for Printer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.placed.borrow_mut().clear();
        f.write_str(&self.blocks()?.join("\n\n"))
    }
}

/// Argument or input field as the printer sees it.
struct InputValueView<'a> {
    name: &'a str,
    ty: &'a TypeRef,
    default: Option<&'a Value>,
    description: Option<&'a str>,
    deprecation_reason: Option<&'a str>,
    carrier: Option<&'a dyn Carrier>,
}

fn write_block(out: &mut String, lines: &[String]) -> fmt::Result {
    if lines.is_empty() {
        return Ok(());
    }
    write!(out, " {{\n{}\n}}", lines.join("\n"))
}

fn write_implements(out: &mut String, interfaces: &[String]) -> fmt::Result {
    if interfaces.is_empty() {
        return Ok(());
    }
    write!(out, " implements {}", interfaces.join(" & "))
}

fn write_deprecated(out: &mut String, reason: Option<&str>) -> fmt::Result {
    match reason {
        None => Ok(()),
        Some(DEFAULT_DEPRECATION_REASON) => out.write_str(" @deprecated"),
        Some(reason) => {
            out.push_str(" @deprecated(reason: ");
            write_quoted(out, reason)?;
            out.write_char(')')
        }
    }
}

/// Members after the first get a blank line above their description.
fn write_description(
    out: &mut String,
    description: Option<&str>,
    indentation: &str,
    first_in_block: bool,
) -> fmt::Result {
    let Some(description) = description else {
        return Ok(());
    };

    if !indentation.is_empty() && !first_in_block {
        out.push('\n');
    }
    out.push_str(indentation);

    let block = block_string(description);
    out.push_str(&block.replace('\n', &format!("\n{indentation}")));
    out.write_char('\n')
}

fn block_string(value: &str) -> String {
    let escaped = value.replace("\"\"\"", "\\\"\"\"");
    let multiline = value.contains('\n')
        || value.chars().count() > 70
        || value.ends_with('"')
        || value.ends_with('\\');

    if multiline {
        format!("\"\"\"\n{escaped}\n\"\"\"")
    } else {
        format!("\"\"\"{escaped}\"\"\"")
    }
}
