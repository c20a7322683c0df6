//! Spec generation: turn record descriptors into a configspec tree.
//!
//! The tree is a `toml::Table` whose leaves are type declarations
//! (`string`, `integer(default=None)`, `integer(default='8080')`) and whose
//! subtables are sections. Record fields become sections named after the field,
//! `Option<Record>` fields get an `__optional__` prefix, and a `_many`
//! collection becomes the wildcard section `__many__`.

use toml::{Table, Value};

use crate::classify::{self, FieldClass};
use crate::error::SectionfigError;
use crate::schema::{Field, Primitive, Record, Schema, TypeRef};

/// Wildcard section matching any number of dynamically named sections.
pub const MANY_SECTION: &str = "__many__";

/// Prefix marking a section that may be absent from the input.
pub const OPTIONAL_PREFIX: &str = "__optional__";

/// Generate the spec tree for a record type.
pub fn to_spec<R: Record>() -> Result<Table, SectionfigError> {
    schema_to_spec(R::SCHEMA)
}

/// Generate the spec tree for a record descriptor.
pub fn schema_to_spec(schema: &'static Schema) -> Result<Table, SectionfigError> {
    tracing::debug!(record = schema.name, "generating spec");
    let mut builder = SpecBuilder::default();
    builder.stack.push(schema);
    let mut root = Table::new();
    builder.emit_fields(schema, &mut root)?;
    Ok(root)
}

/// Generate a spec tree from several independent roots.
///
/// Each root is either a record type, which becomes a top-level section named
/// after the record, or a `Vec<Record>`, which becomes the top-level
/// `__many__` section. At most one `Vec` root is allowed.
pub fn roots_to_spec(roots: &[&'static TypeRef]) -> Result<Table, SectionfigError> {
    tracing::debug!(roots = roots.len(), "generating multi-root spec");
    if roots.iter().filter(|r| matches!(r, TypeRef::List(_))).count() > 1 {
        return Err(SectionfigError::MultipleMany {
            record: "<roots>".into(),
        });
    }

    let mut builder = SpecBuilder::default();
    let mut root = Table::new();
    for ty in roots {
        match *ty {
            &TypeRef::Record(schema) => {
                let section = builder.record_section(schema, schema.name)?;
                root.insert(schema.name.to_string(), Value::Table(section));
            }
            &TypeRef::List(&TypeRef::Record(schema)) => {
                let section = builder.record_section(schema, MANY_SECTION)?;
                root.insert(MANY_SECTION.to_string(), Value::Table(section));
            }
            other => return Err(SectionfigError::NotARecord(other.to_string())),
        }
    }
    Ok(root)
}

#[derive(Default)]
struct SpecBuilder {
    /// Records currently being expanded, outermost first.
    stack: Vec<&'static Schema>,
}

impl SpecBuilder {
    fn emit_fields(
        &mut self,
        schema: &'static Schema,
        section: &mut Table,
    ) -> Result<(), SectionfigError> {
        classify::ensure_single_many(schema)?;

        for field in schema.declared() {
            match classify::classify(field)? {
                FieldClass::Scalar(p) => {
                    section.insert(field.name.to_string(), leaf(p, field, false));
                }
                FieldClass::OptionalScalar(p) => {
                    section.insert(field.name.to_string(), leaf(p, field, true));
                }
                FieldClass::FlatRecord {
                    schema: inner,
                    optional,
                }
                | FieldClass::NestedRecord {
                    schema: inner,
                    optional,
                } => {
                    let key = if optional {
                        format!("{OPTIONAL_PREFIX}{}", field.name)
                    } else {
                        field.name.to_string()
                    };
                    let sub = self.record_section(inner, field.name)?;
                    section.insert(key, Value::Table(sub));
                }
                FieldClass::Repeated(element) => {
                    let sub = self.record_section(element, field.name)?;
                    section.insert(MANY_SECTION.to_string(), Value::Table(sub));
                }
            }
        }
        Ok(())
    }

    fn record_section(
        &mut self,
        schema: &'static Schema,
        field: &str,
    ) -> Result<Table, SectionfigError> {
        if self.stack.iter().any(|s| std::ptr::eq(*s, schema)) {
            return Err(SectionfigError::RecursiveRecord {
                record: schema.name.to_string(),
                field: field.to_string(),
            });
        }

        self.stack.push(schema);
        let mut section = Table::new();
        let result = self.emit_fields(schema, &mut section);
        self.stack.pop();
        result.map(|()| section)
    }
}

/// Build a leaf declaration. An explicit default wins over the optional form.
fn leaf(primitive: Primitive, field: &Field, optional: bool) -> Value {
    let name = primitive.spec_name();
    let decl = match field.default {
        Some(default) if default.contains('\'') => format!("{name}(default=\"{default}\")"),
        Some(default) => format!("{name}(default='{default}')"),
        None if optional => format!("{name}(default=None)"),
        None => name.to_string(),
    };
    Value::String(decl)
}

/// Render a spec tree as configobj-style lines.
///
/// Within each section scalars come before subsections, and subsection headers
/// use one bracket pair per nesting level (`[a]`, `[[b]]`, ...).
pub fn write_spec(spec: &Table) -> Vec<String> {
    let mut lines = Vec::new();
    write_section(spec, 0, &mut lines);
    lines
}

fn write_section(section: &Table, depth: usize, out: &mut Vec<String>) {
    for (key, value) in section {
        match value {
            Value::Table(_) => {}
            Value::String(s) => out.push(format!("{key} = {s}")),
            other => out.push(format!("{key} = {other}")),
        }
    }
    for (key, value) in section {
        if let Value::Table(sub) = value {
            let open = "[".repeat(depth + 1);
            let close = "]".repeat(depth + 1);
            out.push(format!("{open}{key}{close}"));
            write_section(sub, depth + 1, out);
        }
    }
}

/// Generate the spec for `R` rendered as text.
pub fn template<R: Record>() -> Result<String, SectionfigError> {
    Ok(write_spec(&to_spec::<R>()?).join("\n"))
}
