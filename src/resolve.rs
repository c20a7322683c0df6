//! Resolution pipeline: parse sources, merge, validate, lift.
//!
//! Operates on pre-loaded text (`ResolveInput`) with no I/O, so the whole
//! pipeline is testable with synthetic inputs. Steps:
//!
//! 1. Parse each source as TOML
//! 2. Merge sources in order (later overrides earlier)
//! 3. Validate the merged tree against the record's spec (unless disabled)
//! 4. Lift the validated tree into the record type

use std::path::PathBuf;

use toml::Table;

use crate::error::SectionfigError;
use crate::lift::lift;
use crate::merge::merge_sections;
use crate::schema::Record;
use crate::spec::to_spec;
use crate::validate::validate;

/// All pre-loaded data needed to resolve a config. No I/O happens here.
pub struct ResolveInput {
    /// Source name and contents in precedence order: first = lowest priority.
    pub sources: Vec<(PathBuf, String)>,
    /// Whether to check the merged data against the record's spec and fill
    /// in declared defaults before lifting.
    pub validate: bool,
}

/// Resolve a record from pre-loaded sources.
pub fn resolve<R: Record>(input: ResolveInput) -> Result<R, SectionfigError> {
    // The spec is built first so a broken record type fails before any data.
    let spec = if input.validate {
        Some(to_spec::<R>()?)
    } else {
        None
    };

    let mut merged = Table::new();
    for (path, content) in &input.sources {
        let table: Table = toml::from_str(content).map_err(|e| SectionfigError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        merged = merge_sections(merged, table);
    }

    if let Some(spec) = spec {
        merged = validate(&spec, &merged)?;
    }

    lift::<R>(&merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{App, Config, Item, MixedConfig, TwoMany};

    fn input(sources: &[(&str, &str)]) -> ResolveInput {
        ResolveInput {
            sources: sources
                .iter()
                .map(|(p, c)| (PathBuf::from(p), c.to_string()))
                .collect(),
            validate: true,
        }
    }

    #[test]
    fn single_source_round_trip() {
        let config: MixedConfig = resolve(input(&[(
            "app.toml",
            r#"
            [wrapper]
            test = "yes"
            [wrapper.foo]
            bar = "testing"
            pip = 123
            [wrapper.one]
            val = "apple"
            [wrapper.two]
            val = "banana"
            "#,
        )]))
        .unwrap();
        assert_eq!(config.wrapper.foo.pip, 123);
        let names: Vec<&str> = config.wrapper.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[test]
    fn validator_defaults_reach_the_record() {
        let app: App = resolve(input(&[("app.toml", "name = \"a\"\n[server]\nhost = \"h\"\n")]))
            .unwrap();
        assert_eq!(app.server.port, 8080);
        assert_eq!(app.server.motd, None);
    }

    #[test]
    fn later_source_overrides_and_extends() {
        let config: Config = resolve(input(&[
            (
                "base.toml",
                "[single]\nother = \"base\"\n[one]\nval = \"apple\"\n",
            ),
            (
                "local.toml",
                "[single]\nother = \"local\"\n[two]\nval = \"banana\"\n",
            ),
        ]))
        .unwrap();
        assert_eq!(config.single.other, "local");
        assert_eq!(
            config.items,
            vec![
                Item {
                    name: "one".into(),
                    val: "apple".into()
                },
                Item {
                    name: "two".into(),
                    val: "banana".into()
                },
            ]
        );
    }

    #[test]
    fn invalid_data_is_rejected_before_lifting() {
        let result: Result<Config, _> =
            resolve(input(&[("bad.toml", "[single]\nother = 1\n")]));
        assert!(matches!(result, Err(SectionfigError::ValidationFailed(_))));
    }

    #[test]
    fn without_validation_lift_reports_missing_values() {
        let mut unchecked = input(&[("app.toml", "name = \"a\"\n[server]\nport = 1\n")]);
        unchecked.validate = false;
        let result: Result<App, _> = resolve(unchecked);
        assert!(matches!(
            result,
            Err(SectionfigError::MissingValue { key }) if key == "server.host"
        ));
    }

    #[test]
    fn parse_error_names_source() {
        let result: Result<Config, _> = resolve(input(&[("broken.toml", "[single\n")]));
        match result {
            Err(SectionfigError::ParseError { path, .. }) => {
                assert_eq!(path, PathBuf::from("broken.toml"))
            }
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn broken_record_type_fails_before_parsing() {
        let result: Result<TwoMany, _> = resolve(input(&[("broken.toml", "[single\n")]));
        assert!(matches!(result, Err(SectionfigError::MultipleMany { .. })));
    }
}
