use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::error::SectionfigError;
use crate::file::{self, SourceFile};
use crate::resolve::{self, ResolveInput};
use crate::schema::Record;
use crate::spec;

/// Entry point for loading a record from configuration sources.
pub struct Sectionfig;

impl Sectionfig {
    pub fn builder<R: Record>() -> SectionfigBuilder<R> {
        SectionfigBuilder::new()
    }
}

#[derive(Debug, Clone)]
enum Source {
    File(SourceFile),
    Text { name: PathBuf, content: String },
}

/// Builder collecting the sources a record is loaded from.
///
/// Sources are layered in the order they are added: later sources override
/// earlier ones value by value, and their `_many` members are appended.
pub struct SectionfigBuilder<R: Record> {
    sources: Vec<Source>,
    validate: bool,
    _phantom: PhantomData<R>,
}

impl<R: Record> SectionfigBuilder<R> {
    fn new() -> Self {
        Self {
            sources: Vec::new(),
            validate: true,
            _phantom: PhantomData,
        }
    }

    /// Add a file that must exist.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.sources.push(Source::File(SourceFile {
            path: path.as_ref().to_path_buf(),
            required: true,
        }));
        self
    }

    /// Add a file that is skipped when it does not exist.
    pub fn optional_file(mut self, path: impl AsRef<Path>) -> Self {
        self.sources.push(Source::File(SourceFile {
            path: path.as_ref().to_path_buf(),
            required: false,
        }));
        self
    }

    /// Add in-memory TOML text. `name` is only used in error messages.
    pub fn source(mut self, name: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.sources.push(Source::Text {
            name: name.as_ref().to_path_buf(),
            content: content.into(),
        });
        self
    }

    /// Enable or disable spec validation (default: `true`).
    ///
    /// With validation off, the merged data is lifted as-is: declared
    /// defaults are not applied and values are not type-checked.
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Read every source, in registration order.
    fn build_input(&self) -> Result<ResolveInput, SectionfigError> {
        let mut sources = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match source {
                Source::File(f) => {
                    if let Some(content) = file::read_source(f)? {
                        sources.push((f.path.clone(), content));
                    }
                }
                Source::Text { name, content } => sources.push((name.clone(), content.clone())),
            }
        }

        Ok(ResolveInput {
            sources,
            validate: self.validate,
        })
    }

    /// Load, merge, validate and lift the configuration.
    pub fn load(self) -> Result<R, SectionfigError> {
        let input = self.build_input()?;
        tracing::debug!(
            record = R::SCHEMA.name,
            sources = input.sources.len(),
            "loading configuration"
        );
        resolve::resolve(input)
    }

    /// The record's spec rendered as configobj-style text.
    pub fn template(&self) -> Result<String, SectionfigError> {
        spec::template::<R>()
    }
}
