//! Map nested record types to sectioned configuration, and back.
//!
//! Sectionfig works in two directions from one description of a record type:
//!
//! - **Spec generation** ([`to_spec`]) walks a record's declared fields and
//!   produces a configspec tree: one leaf per scalar field (`string`,
//!   `integer(default=None)`, ...), one section per record field, and a
//!   `__many__` wildcard section for a repeated collection.
//! - **Lifting** ([`lift`]) takes configuration data that has been validated
//!   against that spec and rebuilds the typed record, recursing into
//!   sections and collecting dynamically named sections into the record's
//!   collection.
//!
//! ```ignore
//! #[derive(Deserialize)]
//! struct Config {
//!     single: Single,
//!     #[serde(rename = "_many", default)]
//!     items: Vec<Item>,
//! }
//!
//! sectionfig::record!(Config, "Config" { "single": Single, "_many": Vec<Item> });
//!
//! let config: Config = Sectionfig::builder().file("app.toml").load()?;
//! ```
//!
//! # Describing records
//!
//! Record types implement [`Record`], usually through the [`record!`] macro,
//! which lists each configuration key with its Rust type and an optional
//! default literal. Descriptors are `'static` constants built at compile time.
//!
//! Field types are classified once, from the declaration alone:
//!
//! | Declared type | Classification | Spec |
//! |---------------|----------------|------|
//! | `String`, integers, `bool`, floats | scalar | `key = string` |
//! | `Option<scalar>` | optional scalar | `key = string(default=None)` |
//! | record of scalars | flat record | `[key]` |
//! | record containing records | nested record | `[key]` with subsections |
//! | `Option<record>` | optional section | `[__optional__key]` |
//! | `_many: Vec<record>` | repeated collection | `[__many__]` |
//!
//! # Collections
//!
//! A record may declare one field named `_many`. Every section of the data at
//! that record's level that is not a declared field becomes one element of the
//! collection, in data order. The element's `_name` field receives the
//! section's own name:
//!
//! ```toml
//! [single]
//! other = "hello"
//! [one]
//! val = "apple"
//! [two]
//! val = "banana"
//! ```
//!
//! lifts to `Config { single: Single { other: "hello" }, items: [Item { name:
//! "one", val: "apple" }, Item { name: "two", val: "banana" }] }`. When the
//! collection is empty the `_many` key is left out entirely, so the Rust field
//! should carry `#[serde(default)]`.
//!
//! # Multiple roots
//!
//! [`roots_to_spec`] and [`lift_roots`] describe a document as a list of
//! independent roots: a record type maps to a top-level section named after
//! the record, and one `Vec<Record>` maps to the top-level `__many__` section.
//!
//! # Validation
//!
//! Lifting performs no type coercion and fills in no defaults. The bundled
//! [`validate`] function does that job: it type-checks leaves, applies
//! declared defaults, checks `__many__` members, and rejects undeclared keys.
//! The [`Sectionfig`] builder runs the whole pipeline over TOML sources:
//! parse, merge, validate, lift.
//!
//! # Error handling
//!
//! All fallible operations return [`SectionfigError`]. Errors are raised at the
//! point of detection and never recovered from internally; they indicate a
//! mismatch between the record types and the configuration data.

pub mod classify;
pub mod error;
pub mod schema;

mod builder;
mod file;
mod lift;
mod merge;
mod resolve;
mod spec;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::{Sectionfig, SectionfigBuilder};
pub use error::SectionfigError;
pub use lift::{Lifted, lift, lift_roots, lift_table};
pub use schema::{Field, Primitive, Record, Reflect, Schema, TypeRef};
pub use spec::{
    MANY_SECTION, OPTIONAL_PREFIX, roots_to_spec, schema_to_spec, template, to_spec, write_spec,
};
pub use validate::validate;
