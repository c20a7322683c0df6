//! Static type descriptors for record types.
//!
//! A record type describes itself once, at compile time, as a [`Schema`]: an
//! ordered list of [`Field`]s, each pointing at a [`TypeRef`]. Everything else
//! in the crate (spec generation, validation, lifting) walks these descriptors
//! instead of inspecting types at runtime.
//!
//! ```ignore
//! #[derive(Deserialize)]
//! struct Single {
//!     other: String,
//! }
//!
//! sectionfig::record!(Single, "Single" { "other": String });
//! ```

use std::fmt;

use serde::de::DeserializeOwned;

/// Field name holding the repeated collection of a record.
pub const MANY: &str = "_many";

/// Field name of an element record that receives its own section name.
pub const NAME: &str = "_name";

/// Primitive leaf types understood by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Integer,
    Boolean,
    Float,
}

impl Primitive {
    /// The name used for this primitive in spec declarations.
    pub fn spec_name(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Integer => "integer",
            Primitive::Boolean => "boolean",
            Primitive::Float => "float",
        }
    }

    pub fn from_spec_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Primitive::String),
            "integer" => Some(Primitive::Integer),
            "boolean" => Some(Primitive::Boolean),
            "float" => Some(Primitive::Float),
            _ => None,
        }
    }
}

/// The declared type of a field.
pub enum TypeRef {
    Primitive(Primitive),
    Optional(&'static TypeRef),
    List(&'static TypeRef),
    Record(&'static Schema),
    /// A type with no section mapping, named for error messages.
    Opaque(&'static str),
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{}", p.spec_name()),
            TypeRef::Optional(inner) => write!(f, "Option<{inner}>"),
            TypeRef::List(inner) => write!(f, "Vec<{inner}>"),
            TypeRef::Record(schema) => write!(f, "{}", schema.name),
            TypeRef::Opaque(name) => write!(f, "{name}"),
        }
    }
}

// A hand-written `static` schema can refer to itself, so never recurse into a
// schema here.
impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({self})")
    }
}

/// One declared field of a record.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub ty: &'static TypeRef,
    /// Literal representation of the default value, if any.
    pub default: Option<&'static str>,
}

impl Field {
    pub const fn new(name: &'static str, ty: &'static TypeRef) -> Self {
        Self {
            name,
            ty,
            default: None,
        }
    }

    pub const fn with_default(self, default: &'static str) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    pub fn is_many(&self) -> bool {
        self.name == MANY
    }

    pub fn is_name(&self) -> bool {
        self.name == NAME
    }
}

/// A record type definition: its name and fields in declaration order.
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    /// Fields that map to configuration entries, i.e. everything except `_name`.
    pub fn declared(&self) -> impl Iterator<Item = &'static Field> + use<> {
        let fields: &'static [Field] = self.fields;
        fields.iter().filter(|f| !f.is_name())
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        let fields: &'static [Field] = self.fields;
        fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field(
                "fields",
                &self.fields.iter().map(|f| f.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A type with a static descriptor.
pub trait Reflect {
    const TYPE: &'static TypeRef;
}

/// A record type that can be described as a spec and lifted from sections.
///
/// Construction goes through serde: lifting produces a table shaped like the
/// record and deserializes it. Rust fields standing in for `_many` and `_name`
/// carry `#[serde(rename = "...")]`, and a `_many` field should accept a
/// missing key (`#[serde(default)]`), since an empty collection is omitted.
pub trait Record: Reflect + DeserializeOwned {
    const SCHEMA: &'static Schema;
}

macro_rules! impl_primitive {
    ($prim:ident: $($ty:ty),+) => {
        $(
            impl Reflect for $ty {
                const TYPE: &'static TypeRef = &TypeRef::Primitive(Primitive::$prim);
            }
        )+
    };
}

impl_primitive!(String: String, &'static str);
impl_primitive!(Integer: i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_primitive!(Boolean: bool);
impl_primitive!(Float: f32, f64);

impl<T: Reflect> Reflect for Option<T> {
    const TYPE: &'static TypeRef = &const { TypeRef::Optional(T::TYPE) };
}

impl<T: Reflect> Reflect for Vec<T> {
    const TYPE: &'static TypeRef = &const { TypeRef::List(T::TYPE) };
}

/// Implement [`Reflect`] and [`Record`] for a struct.
///
/// Each entry names the configuration key, the field's Rust type, and an
/// optional default literal:
///
/// ```ignore
/// sectionfig::record!(Server, "Server" {
///     "host": String,
///     "port": u16 = "8080",
///     "_many": Vec<Route>,
/// });
/// ```
///
/// The generated descriptors are constants, so a record cannot contain itself,
/// directly or through other records. Such a type fails to compile.
#[macro_export]
macro_rules! record {
    ($ty:ty, $name:literal { $($key:literal : $fty:ty $(= $default:literal)?),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            const TYPE: &'static $crate::TypeRef =
                &$crate::TypeRef::Record(<$ty as $crate::Record>::SCHEMA);
        }

        impl $crate::Record for $ty {
            const SCHEMA: &'static $crate::Schema = &$crate::Schema {
                name: $name,
                fields: &[
                    $(
                        $crate::Field::new($key, <$fty as $crate::Reflect>::TYPE)
                            $(.with_default($default))?
                    ),*
                ],
            };
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{Config, Item, Single};

    #[test]
    fn primitive_names_round_trip() {
        for p in [
            Primitive::String,
            Primitive::Integer,
            Primitive::Boolean,
            Primitive::Float,
        ] {
            assert_eq!(Primitive::from_spec_name(p.spec_name()), Some(p));
        }
        assert_eq!(Primitive::from_spec_name("tuple"), None);
    }

    #[test]
    fn std_types_reflect_as_primitives() {
        assert!(matches!(
            <u16 as Reflect>::TYPE,
            TypeRef::Primitive(Primitive::Integer)
        ));
        assert!(matches!(
            <String as Reflect>::TYPE,
            TypeRef::Primitive(Primitive::String)
        ));
        assert!(matches!(
            <Option<bool> as Reflect>::TYPE,
            TypeRef::Optional(TypeRef::Primitive(Primitive::Boolean))
        ));
    }

    #[test]
    fn record_macro_keeps_declaration_order() {
        let names: Vec<&str> = Config::SCHEMA.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["single", "_many"]);
    }

    #[test]
    fn declared_skips_name_field() {
        let names: Vec<&str> = Item::SCHEMA.declared().map(|f| f.name).collect();
        assert_eq!(names, vec!["val"]);
    }

    #[test]
    fn display_describes_nested_types() {
        let many = Config::SCHEMA.field(MANY).unwrap();
        assert_eq!(many.ty.to_string(), "Vec<Item>");
        assert_eq!(<Option<Single> as Reflect>::TYPE.to_string(), "Option<Single>");
    }
}
