//! Schema elements that can carry directives.
//!
//! Every element gets a [`CarrierId`] when it is created. Directive
//! applications are stored against that id in a
//! [`DirectiveStore`](crate::DirectiveStore), never on the element itself, so
//! elements stay plain values that can be moved into their parent type.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::{DirectiveLocation, TypeRef};
use crate::value::Value;

/// Stable identity of a schema element, assigned at creation.
///
/// Cloning an element keeps its id, so a clone shares the directives applied
/// to the original. The assembler relies on this to accept the same input
/// type registered by several directives. Use a fresh `new` element for a
/// separately annotated copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarrierId(u64);

impl CarrierId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        CarrierId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Category of a carrier, mirroring its directive location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarrierKind {
    Object,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    Scalar,
    Field,
    InputField,
    Argument,
}

impl CarrierKind {
    pub fn location(self) -> DirectiveLocation {
        match self {
            CarrierKind::Object => DirectiveLocation::Object,
            CarrierKind::Interface => DirectiveLocation::Interface,
            CarrierKind::Union => DirectiveLocation::Union,
            CarrierKind::Enum => DirectiveLocation::Enum,
            CarrierKind::EnumValue => DirectiveLocation::EnumValue,
            CarrierKind::InputObject => DirectiveLocation::InputObject,
            CarrierKind::Scalar => DirectiveLocation::Scalar,
            CarrierKind::Field => DirectiveLocation::FieldDefinition,
            CarrierKind::InputField => DirectiveLocation::InputFieldDefinition,
            CarrierKind::Argument => DirectiveLocation::ArgumentDefinition,
        }
    }

    pub fn is_field_level(self) -> bool {
        self.location().is_field_level()
    }
}

impl fmt::Display for CarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CarrierKind::Object => "object",
            CarrierKind::Interface => "interface",
            CarrierKind::Union => "union",
            CarrierKind::Enum => "enum",
            CarrierKind::EnumValue => "enum value",
            CarrierKind::InputObject => "input object",
            CarrierKind::Scalar => "scalar",
            CarrierKind::Field => "field",
            CarrierKind::InputField => "input field",
            CarrierKind::Argument => "argument",
        };
        f.write_str(name)
    }
}

/// A schema element that directives can be attached to.
pub trait Carrier {
    fn carrier_id(&self) -> CarrierId;
    fn carrier_kind(&self) -> CarrierKind;
    fn carrier_name(&self) -> &str;
}

macro_rules! impl_carrier {
    ($ty:ty, $kind:expr) => {
        impl Carrier for $ty {
            fn carrier_id(&self) -> CarrierId {
                self.id
            }

            fn carrier_kind(&self) -> CarrierKind {
                $kind
            }

            fn carrier_name(&self) -> &str {
                &self.name
            }
        }
    };
}

/// Argument of an output field.
#[derive(Debug, Clone)]
pub struct Argument {
    id: CarrierId,
    pub name: String,
    pub ty: TypeRef,
    pub default: Option<Value>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            id: CarrierId::next(),
            name: name.into(),
            ty,
            default: None,
            description: None,
            deprecation_reason: None,
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

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

/// Field of an object or interface type.
#[derive(Debug, Clone)]
pub struct Field {
    id: CarrierId,
    pub name: String,
    pub ty: TypeRef,
    pub arguments: Vec<Argument>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            id: CarrierId::next(),
            name: name.into(),
            ty,
            arguments: Vec::new(),
            description: None,
            deprecation_reason: None,
        }
    }

    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

/// Field of an input object type.
#[derive(Debug, Clone)]
pub struct InputField {
    id: CarrierId,
    pub name: String,
    pub ty: TypeRef,
    pub default: Option<Value>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

impl InputField {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            id: CarrierId::next(),
            name: name.into(),
            ty,
            default: None,
            description: None,
            deprecation_reason: None,
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

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    id: CarrierId,
    pub name: String,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CarrierId::next(),
            name: name.into(),
            description: None,
            deprecation_reason: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

impl From<&str> for EnumValue {
    fn from(name: &str) -> Self {
        EnumValue::new(name)
    }
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    id: CarrierId,
    pub name: String,
    pub description: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<Field>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CarrierId::next(),
            name: name.into(),
            description: None,
            implements: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    id: CarrierId,
    pub name: String,
    pub description: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<Field>,
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CarrierId::next(),
            name: name.into(),
            description: None,
            implements: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone)]
pub struct UnionType {
    id: CarrierId,
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

impl UnionType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CarrierId::next(),
            name: name.into(),
            description: None,
            members: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn member(mut self, object: impl Into<String>) -> Self {
        self.members.push(object.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct EnumType {
    id: CarrierId,
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CarrierId::next(),
            name: name.into(),
            description: None,
            values: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn value(mut self, value: impl Into<EnumValue>) -> Self {
        self.values.push(value.into());
        self
    }

    pub fn has_value(&self, name: &str) -> bool {
        self.values.iter().any(|value| value.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct InputObjectType {
    id: CarrierId,
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputField>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CarrierId::next(),
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: InputField) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ScalarType {
    id: CarrierId,
    pub name: String,
    pub description: Option<String>,
    pub specified_by_url: Option<String>,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CarrierId::next(),
            name: name.into(),
            description: None,
            specified_by_url: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn specified_by(mut self, url: impl Into<String>) -> Self {
        self.specified_by_url = Some(url.into());
        self
    }
}

impl_carrier!(Argument, CarrierKind::Argument);
impl_carrier!(Field, CarrierKind::Field);
impl_carrier!(InputField, CarrierKind::InputField);
impl_carrier!(EnumValue, CarrierKind::EnumValue);
impl_carrier!(ObjectType, CarrierKind::Object);
impl_carrier!(InterfaceType, CarrierKind::Interface);
impl_carrier!(UnionType, CarrierKind::Union);
impl_carrier!(EnumType, CarrierKind::Enum);
impl_carrier!(InputObjectType, CarrierKind::InputObject);
impl_carrier!(ScalarType, CarrierKind::Scalar);

/// Any named type of the schema.
#[derive(Debug, Clone)]
pub enum NamedType {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl NamedType {
    pub fn name(&self) -> &str {
        self.carrier_name()
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            NamedType::Scalar(t) => t.description.as_deref(),
            NamedType::Object(t) => t.description.as_deref(),
            NamedType::Interface(t) => t.description.as_deref(),
            NamedType::Union(t) => t.description.as_deref(),
            NamedType::Enum(t) => t.description.as_deref(),
            NamedType::InputObject(t) => t.description.as_deref(),
        }
    }

    /// SDL keyword introducing the declaration.
    pub fn keyword(&self) -> &'static str {
        match self {
            NamedType::Scalar(_) => "scalar",
            NamedType::Object(_) => "type",
            NamedType::Interface(_) => "interface",
            NamedType::Union(_) => "union",
            NamedType::Enum(_) => "enum",
            NamedType::InputObject(_) => "input",
        }
    }

    /// True for types valid in input position.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            NamedType::Scalar(_) | NamedType::Enum(_) | NamedType::InputObject(_)
        )
    }

    fn as_carrier(&self) -> &dyn Carrier {
        match self {
            NamedType::Scalar(t) => t,
            NamedType::Object(t) => t,
            NamedType::Interface(t) => t,
            NamedType::Union(t) => t,
            NamedType::Enum(t) => t,
            NamedType::InputObject(t) => t,
        }
    }
}

impl Carrier for NamedType {
    fn carrier_id(&self) -> CarrierId {
        self.as_carrier().carrier_id()
    }

    fn carrier_kind(&self) -> CarrierKind {
        self.as_carrier().carrier_kind()
    }

    fn carrier_name(&self) -> &str {
        self.as_carrier().carrier_name()
    }
}

macro_rules! impl_from_named {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for NamedType {
            fn from(value: $ty) -> Self {
                NamedType::$variant(value)
            }
        }
    };
}

impl_from_named!(Scalar, ScalarType);
impl_from_named!(Object, ObjectType);
impl_from_named!(Interface, InterfaceType);
impl_from_named!(Union, UnionType);
impl_from_named!(Enum, EnumType);
impl_from_named!(InputObject, InputObjectType);

/// The member of a named type a field-level directive is attached to.
#[derive(Debug, Clone, Copy)]
pub enum FieldTarget<'a> {
    Field(&'a Field),
    InputField(&'a InputField),
    EnumValue(&'a EnumValue),
    Argument {
        field: &'a Field,
        argument: &'a Argument,
    },
}

impl<'a> FieldTarget<'a> {
    pub fn carrier(&self) -> &'a dyn Carrier {
        match *self {
            FieldTarget::Field(field) => field,
            FieldTarget::InputField(field) => field,
            FieldTarget::EnumValue(value) => value,
            FieldTarget::Argument { argument, .. } => argument,
        }
    }

    /// Name of the element, as declared.
    pub fn name(&self) -> &'a str {
        self.carrier().carrier_name()
    }
}
