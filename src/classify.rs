//! Field classification shared by spec generation and lifting.
//!
//! Classification looks at declared types only, never at configuration data.
//! The order of checks is:
//!
//! 1. unwrap `Option<X>`, remembering optionality
//! 2. `X` primitive → [`FieldClass::Scalar`] / [`FieldClass::OptionalScalar`]
//! 3. `X` record whose fields are all scalars → [`FieldClass::FlatRecord`]
//! 4. `X` any other record → [`FieldClass::NestedRecord`]
//! 5. a field named `_many` declaring `Vec<Record>` → [`FieldClass::Repeated`]

use crate::error::SectionfigError;
use crate::schema::{Field, Primitive, Schema, TypeRef};

#[derive(Debug, Clone, Copy)]
pub enum FieldClass {
    Scalar(Primitive),
    OptionalScalar(Primitive),
    FlatRecord {
        schema: &'static Schema,
        optional: bool,
    },
    NestedRecord {
        schema: &'static Schema,
        optional: bool,
    },
    Repeated(&'static Schema),
}

impl FieldClass {
    /// Whether the field may be absent without a default.
    pub fn is_optional(&self) -> bool {
        match self {
            FieldClass::OptionalScalar(_) => true,
            FieldClass::FlatRecord { optional, .. } | FieldClass::NestedRecord { optional, .. } => {
                *optional
            }
            FieldClass::Scalar(_) | FieldClass::Repeated(_) => false,
        }
    }
}

/// Classify one declared field.
pub fn classify(field: &Field) -> Result<FieldClass, SectionfigError> {
    if field.is_many() {
        return match field.ty {
            &TypeRef::List(&TypeRef::Record(schema)) => Ok(FieldClass::Repeated(schema)),
            _ => Err(unsupported(field)),
        };
    }

    let (ty, optional) = match field.ty {
        &TypeRef::Optional(inner) => (inner, true),
        other => (other, false),
    };

    match *ty {
        TypeRef::Primitive(p) if optional => Ok(FieldClass::OptionalScalar(p)),
        TypeRef::Primitive(p) => Ok(FieldClass::Scalar(p)),
        TypeRef::Record(schema) if is_flat(schema) => Ok(FieldClass::FlatRecord { schema, optional }),
        TypeRef::Record(schema) => Ok(FieldClass::NestedRecord { schema, optional }),
        TypeRef::Optional(_) | TypeRef::List(_) | TypeRef::Opaque(_) => Err(unsupported(field)),
    }
}

/// A record is flat when every field it maps to configuration is a primitive,
/// optional or not.
pub fn is_flat(schema: &Schema) -> bool {
    schema.declared().all(|f| {
        !f.is_many()
            && matches!(
                f.ty,
                TypeRef::Primitive(_) | TypeRef::Optional(TypeRef::Primitive(_))
            )
    })
}

/// Fail if `schema` declares more than one `_many` field.
pub fn ensure_single_many(schema: &Schema) -> Result<(), SectionfigError> {
    if schema.declared().filter(|f| f.is_many()).count() > 1 {
        return Err(SectionfigError::MultipleMany {
            record: schema.name.to_string(),
        });
    }
    Ok(())
}

fn unsupported(field: &Field) -> SectionfigError {
    SectionfigError::UnsupportedType {
        field: field.name.to_string(),
        ty: field.ty.to_string(),
    }
}

/// A record's fields partitioned by classification, in declaration order.
#[derive(Debug)]
pub struct RecordPlan {
    pub schema: &'static Schema,
    pub fields: Vec<(&'static Field, FieldClass)>,
    /// Element type of the `_many` collection, if declared.
    pub many: Option<&'static Schema>,
}

impl RecordPlan {
    /// Classify every field of `schema`, rejecting a second collection before
    /// anything else is looked at.
    pub fn of(schema: &'static Schema) -> Result<Self, SectionfigError> {
        ensure_single_many(schema)?;

        let mut fields = Vec::new();
        let mut many = None;
        for field in schema.declared() {
            match classify(field)? {
                FieldClass::Repeated(element) => many = Some(element),
                class => fields.push((field, class)),
            }
        }

        Ok(Self {
            schema,
            fields,
            many,
        })
    }

    /// The classified field declared under `key`, excluding `_many`.
    pub fn get(&self, key: &str) -> Option<&(&'static Field, FieldClass)> {
        self.fields.iter().find(|(f, _)| f.name == key)
    }
}
