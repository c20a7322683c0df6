//! Check configuration data against a spec tree and fill in defaults.
//!
//! The validator walks the data and the spec together:
//!
//! - Leaves are type-checked against their declaration. `float` also accepts
//!   integers, widened to floats.
//! - Missing leaves take their declared default. `default=None` leaves stay
//!   absent, and leaves with no default are reported as missing.
//! - `__optional__name` sections may be absent. A missing required section is
//!   validated as if it were empty, so all-default sections are filled in.
//! - Undeclared entries are checked against the `__many__` section of their
//!   level, or reported as unmatched when there is none.
//!
//! Every problem is collected and reported together in
//! [`SectionfigError::ValidationFailed`].

use toml::{Table, Value};

use crate::error::SectionfigError;
use crate::schema::Primitive;
use crate::spec::{MANY_SECTION, OPTIONAL_PREFIX};

/// Default part of a leaf declaration.
#[derive(Debug, Clone, PartialEq)]
enum LeafDefault {
    Required,
    /// `default=None`: the value may be absent.
    Absent,
    Literal(String),
}

#[derive(Debug, Clone, PartialEq)]
struct LeafSpec {
    primitive: Primitive,
    default: LeafDefault,
}

/// Validate `data` against `spec`, returning the data with defaults applied.
pub fn validate(spec: &Table, data: &Table) -> Result<Table, SectionfigError> {
    let mut errors = Vec::new();
    let validated = validate_section(spec, data, "", &mut errors);
    if errors.is_empty() {
        Ok(validated)
    } else {
        tracing::debug!(errors = errors.len(), "configuration rejected");
        Err(SectionfigError::ValidationFailed(errors))
    }
}

fn validate_section(
    spec: &Table,
    data: &Table,
    path: &str,
    errors: &mut Vec<SectionfigError>,
) -> Table {
    let mut out = Table::new();

    for (key, value) in data {
        let key_path = dotted(path, key);
        if key.starts_with(OPTIONAL_PREFIX) || key == MANY_SECTION {
            errors.push(SectionfigError::UnmatchedKey { key: key_path });
            continue;
        }
        let entry = spec
            .get(key.as_str())
            .or_else(|| spec.get(&format!("{OPTIONAL_PREFIX}{key}")))
            .or_else(|| spec.get(MANY_SECTION));

        let Some(entry) = entry else {
            errors.push(SectionfigError::UnmatchedKey { key: key_path });
            continue;
        };

        match entry {
            Value::Table(sub_spec) => match value.as_table() {
                Some(sub) => {
                    let validated = validate_section(sub_spec, sub, &key_path, errors);
                    out.insert(key.clone(), Value::Table(validated));
                }
                None => errors.push(SectionfigError::ShapeMismatch {
                    key: key_path,
                    expected: "a section",
                }),
            },
            declaration => match parse_leaf(declaration, &key_path) {
                Ok(leaf) => match check_value(leaf.primitive, value, &key_path) {
                    Ok(checked) => {
                        out.insert(key.clone(), checked);
                    }
                    Err(e) => errors.push(e),
                },
                Err(e) => errors.push(e),
            },
        }
    }

    for (spec_key, entry) in spec {
        if spec_key == MANY_SECTION {
            continue;
        }
        let (name, optional) = match spec_key.strip_prefix(OPTIONAL_PREFIX) {
            Some(name) => (name, true),
            None => (spec_key.as_str(), false),
        };
        if data.contains_key(name) {
            continue;
        }

        let key_path = dotted(path, name);
        match entry {
            Value::Table(_) if optional => {}
            Value::Table(sub_spec) => {
                tracing::trace!(key = %key_path, "filling absent section");
                let filled = validate_section(sub_spec, &Table::new(), &key_path, errors);
                out.insert(name.to_string(), Value::Table(filled));
            }
            declaration => match parse_leaf(declaration, &key_path) {
                Ok(LeafSpec {
                    default: LeafDefault::Required,
                    ..
                }) => errors.push(SectionfigError::MissingValue { key: key_path }),
                Ok(LeafSpec {
                    default: LeafDefault::Absent,
                    ..
                }) => {}
                Ok(LeafSpec {
                    primitive,
                    default: LeafDefault::Literal(literal),
                }) => match coerce_default(primitive, &literal, &key_path) {
                    Ok(value) => {
                        out.insert(name.to_string(), value);
                    }
                    Err(e) => errors.push(e),
                },
                Err(e) => errors.push(e),
            },
        }
    }

    out
}

/// Parse a leaf declaration such as `integer` or `string(default='x')`.
fn parse_leaf(declaration: &Value, key: &str) -> Result<LeafSpec, SectionfigError> {
    let invalid = || SectionfigError::InvalidDeclaration {
        key: key.to_string(),
        declaration: declaration.to_string(),
    };

    let text = declaration.as_str().ok_or_else(invalid)?.trim();
    let (name, default) = match text.split_once('(') {
        None => (text, LeafDefault::Required),
        Some((name, args)) => {
            let literal = args
                .strip_suffix(')')
                .and_then(|a| a.trim().strip_prefix("default="))
                .ok_or_else(invalid)?
                .trim();
            (name.trim(), parse_default(literal))
        }
    };

    let primitive = Primitive::from_spec_name(name).ok_or_else(invalid)?;
    Ok(LeafSpec { primitive, default })
}

fn parse_default(literal: &str) -> LeafDefault {
    if literal == "None" {
        return LeafDefault::Absent;
    }
    let unquoted = ['\'', '"']
        .iter()
        .find_map(|q| literal.strip_prefix(*q)?.strip_suffix(*q))
        .unwrap_or(literal);
    LeafDefault::Literal(unquoted.to_string())
}

fn check_value(primitive: Primitive, value: &Value, key: &str) -> Result<Value, SectionfigError> {
    match (primitive, value) {
        (Primitive::String, Value::String(_))
        | (Primitive::Integer, Value::Integer(_))
        | (Primitive::Boolean, Value::Boolean(_))
        | (Primitive::Float, Value::Float(_)) => Ok(value.clone()),
        (Primitive::Float, Value::Integer(i)) => Ok(Value::Float(*i as f64)),
        (_, other) => Err(SectionfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected {}, found {}", primitive.spec_name(), other.type_str()),
        }),
    }
}

/// Turn a default literal into a value of the declared primitive.
fn coerce_default(primitive: Primitive, literal: &str, key: &str) -> Result<Value, SectionfigError> {
    let invalid = || SectionfigError::InvalidValue {
        key: key.to_string(),
        reason: format!("default '{literal}' is not a valid {}", primitive.spec_name()),
    };

    match primitive {
        Primitive::String => Ok(Value::String(literal.to_string())),
        Primitive::Integer => literal
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| invalid()),
        Primitive::Float => literal
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid()),
        Primitive::Boolean => match literal.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Boolean(true)),
            "false" | "no" | "off" | "0" => Ok(Value::Boolean(false)),
            _ => Err(invalid()),
        },
    }
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
