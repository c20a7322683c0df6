//! Lifting: rebuild typed records from validated configuration sections.
//!
//! Each section level is walked in lock-step with the record's classified
//! fields. Keys naming a declared field are dispatched by classification;
//! every other key is a member of the record's `_many` collection, which
//! becomes one element record whose `_name` is the key itself. The result is
//! a table shaped like the record, which serde turns into the typed value.
//!
//! Lifting trusts its input: values are not coerced or range-checked, and no
//! defaults are filled in. A missing required section or value is reported,
//! an undeclared key with no collection to absorb it is an error.

use serde::de::DeserializeOwned;
use toml::{Table, Value};

use crate::classify::{FieldClass, RecordPlan};
use crate::error::SectionfigError;
use crate::schema::{MANY, NAME, Record, Schema, TypeRef};

/// Lift a validated data tree into an instance of `R`.
pub fn lift<R: Record>(data: &Table) -> Result<R, SectionfigError> {
    let table = lift_table(R::SCHEMA, data)?;
    construct(R::SCHEMA.name, table)
}

/// Lift a data tree into a table shaped like `schema`.
///
/// Keys appear in data order, followed by `_many` when the collection is
/// non-empty. An empty collection is omitted rather than written as `[]`.
pub fn lift_table(schema: &'static Schema, data: &Table) -> Result<Table, SectionfigError> {
    tracing::debug!(record = schema.name, "lifting section");
    lift_section(schema, data, "")
}

fn lift_section(
    schema: &'static Schema,
    data: &Table,
    path: &str,
) -> Result<Table, SectionfigError> {
    let plan = RecordPlan::of(schema)?;

    let mut out = Table::new();
    let mut many = Vec::new();

    for (key, value) in data {
        let key_path = dotted(path, key);
        match plan.get(key) {
            Some((_, class)) => {
                let lifted = lift_field(class, value, &key_path)?;
                out.insert(key.clone(), lifted);
            }
            None => {
                let Some(element) = plan.many else {
                    return Err(SectionfigError::UnmatchedKey { key: key_path });
                };
                tracing::trace!(key = %key_path, element = element.name, "routing to collection");
                let section = expect_section(value, &key_path)?;
                many.push(Value::Table(lift_element(element, key, section, &key_path)?));
            }
        }
    }

    for (field, class) in &plan.fields {
        if !data.contains_key(field.name) && !class.is_optional() && field.default.is_none() {
            return Err(SectionfigError::MissingValue {
                key: dotted(path, field.name),
            });
        }
    }

    if !many.is_empty() {
        out.insert(MANY.to_string(), Value::Array(many));
    }
    Ok(out)
}

fn lift_field(class: &FieldClass, value: &Value, path: &str) -> Result<Value, SectionfigError> {
    match *class {
        FieldClass::Scalar(_) | FieldClass::OptionalScalar(_) => {
            if value.is_table() {
                return Err(SectionfigError::ShapeMismatch {
                    key: path.to_string(),
                    expected: "a value",
                });
            }
            Ok(value.clone())
        }
        FieldClass::FlatRecord { schema, .. } => {
            let section = expect_section(value, path)?;
            lift_flat(schema, section, path).map(Value::Table)
        }
        FieldClass::NestedRecord { schema, .. } => {
            let section = expect_section(value, path)?;
            lift_section(schema, section, path).map(Value::Table)
        }
        // RecordPlan keeps the collection out of its field list.
        FieldClass::Repeated(_) => Err(SectionfigError::ShapeMismatch {
            key: path.to_string(),
            expected: "a declared field",
        }),
    }
}

/// Copy a flat record's section: every entry must be one of its scalar fields.
fn lift_flat(schema: &'static Schema, data: &Table, path: &str) -> Result<Table, SectionfigError> {
    let mut out = Table::new();
    for (key, value) in data {
        let key_path = dotted(path, key);
        if schema.field(key).is_none_or(|f| f.is_name()) {
            return Err(SectionfigError::UnmatchedKey { key: key_path });
        }
        if value.is_table() {
            return Err(SectionfigError::ShapeMismatch {
                key: key_path,
                expected: "a value",
            });
        }
        out.insert(key.clone(), value.clone());
    }

    for field in schema.declared() {
        let optional = matches!(field.ty, TypeRef::Optional(_));
        if !data.contains_key(field.name) && !optional && field.default.is_none() {
            return Err(SectionfigError::MissingValue {
                key: dotted(path, field.name),
            });
        }
    }
    Ok(out)
}

/// Lift one member of a collection and stamp it with its section name.
fn lift_element(
    element: &'static Schema,
    name: &str,
    data: &Table,
    path: &str,
) -> Result<Table, SectionfigError> {
    let mut out = Table::new();
    out.insert(NAME.to_string(), Value::String(name.to_string()));
    for (key, value) in lift_section(element, data, path)? {
        out.insert(key, value);
    }
    Ok(out)
}

fn expect_section<'a>(value: &'a Value, path: &str) -> Result<&'a Table, SectionfigError> {
    value.as_table().ok_or_else(|| SectionfigError::ShapeMismatch {
        key: path.to_string(),
        expected: "a section",
    })
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Deserialize a lifted table into its record type.
///
/// Every key of the table must be consumed. A key the type ignores means its
/// descriptor and its serde field names disagree.
fn construct<T: DeserializeOwned>(record: &str, table: Table) -> Result<T, SectionfigError> {
    let mut unconsumed = Vec::new();
    let value: T = serde_ignored::deserialize(Value::Table(table), |path| {
        unconsumed.push(path.to_string());
    })
    .map_err(|source| SectionfigError::Construct {
        record: record.to_string(),
        source,
    })?;

    match unconsumed.into_iter().next() {
        Some(key) => Err(SectionfigError::UnconsumedKey {
            record: record.to_string(),
            key,
        }),
        None => Ok(value),
    }
}

/// One lifted root of a multi-root document.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifted {
    /// A record root, lifted from the section named after the record.
    Record(Table),
    /// The collection root, one table per dynamically named section.
    Many(Vec<Table>),
}

impl Lifted {
    pub fn into_record<R: Record>(self) -> Result<R, SectionfigError> {
        match self {
            Lifted::Record(table) => construct(R::SCHEMA.name, table),
            Lifted::Many(_) => Err(SectionfigError::NotARecord(format!(
                "Vec<{}>",
                R::SCHEMA.name
            ))),
        }
    }

    pub fn into_many<R: Record>(self) -> Result<Vec<R>, SectionfigError> {
        match self {
            Lifted::Many(tables) => tables
                .into_iter()
                .map(|table| construct(R::SCHEMA.name, table))
                .collect(),
            Lifted::Record(_) => Err(SectionfigError::ShapeMismatch {
                key: R::SCHEMA.name.to_string(),
                expected: "a collection",
            }),
        }
    }
}

/// Lift a document described by several independent roots.
///
/// Returns one [`Lifted`] per root, in root order. Record roots read the
/// section named after the record; the single `Vec<Record>` root collects
/// every other top-level section, in data order.
pub fn lift_roots(
    roots: &[&'static TypeRef],
    data: &Table,
) -> Result<Vec<Lifted>, SectionfigError> {
    tracing::debug!(roots = roots.len(), "lifting multi-root document");

    let mut records = Vec::new();
    let mut element = None;
    for ty in roots {
        match *ty {
            &TypeRef::Record(schema) => records.push(schema),
            &TypeRef::List(&TypeRef::Record(schema)) => {
                if element.replace(schema).is_some() {
                    return Err(SectionfigError::MultipleMany {
                        record: "<roots>".into(),
                    });
                }
            }
            other => return Err(SectionfigError::NotARecord(other.to_string())),
        }
    }

    let mut many = Vec::new();
    for (key, value) in data {
        if records.iter().any(|s| s.name == key.as_str()) {
            continue;
        }
        let Some(element) = element else {
            return Err(SectionfigError::UnmatchedKey { key: key.clone() });
        };
        let section = expect_section(value, key)?;
        many.push(lift_element(element, key, section, key)?);
    }

    roots
        .iter()
        .map(|ty| -> Result<Lifted, SectionfigError> {
            match *ty {
                &TypeRef::Record(schema) => {
                    let section = data.get(schema.name).ok_or_else(|| {
                        SectionfigError::MissingValue {
                            key: schema.name.to_string(),
                        }
                    })?;
                    let section = expect_section(section, schema.name)?;
                    lift_section(schema, section, schema.name).map(Lifted::Record)
                }
                _ => Ok(Lifted::Many(many.clone())),
            }
        })
        .collect()
}
