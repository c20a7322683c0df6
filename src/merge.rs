use toml::Table;

/// Layer `overlay` on top of `base`.
///
/// Sections present on both sides are merged key by key, so a later source can
/// change one value of a section, or add members to a collection, without
/// restating the rest. Anything else in `overlay` replaces what `base` had.
/// Keys keep the position they first appeared at.
pub fn merge_sections(mut base: Table, overlay: Table) -> Table {
    for (key, overlay_val) in overlay {
        let merged = match (base.get_mut(&key), overlay_val) {
            (Some(toml::Value::Table(base_tbl)), toml::Value::Table(overlay_tbl)) => {
                let taken = std::mem::take(base_tbl);
                toml::Value::Table(merge_sections(taken, overlay_tbl))
            }
            (_, overlay_val) => overlay_val,
        };
        base.insert(key, merged);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(toml_str: &str) -> Table {
        toml_str.parse::<Table>().unwrap()
    }

    fn keys(table: &Table) -> Vec<&str> {
        table.keys().map(String::as_str).collect()
    }

    #[test]
    fn overlay_value_wins_inside_section() {
        let base = table("[server]\nhost = \"a\"\nport = 1\n");
        let overlay = table("[server]\nport = 2\n");
        let merged = merge_sections(base, overlay);
        assert_eq!(merged["server"]["host"].as_str(), Some("a"));
        assert_eq!(merged["server"]["port"].as_integer(), Some(2));
    }

    #[test]
    fn overlay_adds_collection_members_after_existing_ones() {
        let base = table("[single]\nother = \"x\"\n[one]\nval = \"apple\"\n");
        let overlay = table("[two]\nval = \"banana\"\n[one]\nval = \"cherry\"\n");
        let merged = merge_sections(base, overlay);
        assert_eq!(keys(&merged), vec!["single", "one", "two"]);
        assert_eq!(merged["one"]["val"].as_str(), Some("cherry"));
    }

    #[test]
    fn overlay_value_replaces_section() {
        let base = table("[wrapper]\ntest = \"x\"\n");
        let overlay = table("wrapper = \"flat\"\n");
        let merged = merge_sections(base, overlay);
        assert_eq!(merged["wrapper"].as_str(), Some("flat"));
    }

    #[test]
    fn empty_overlay_returns_base() {
        let base = table("name = \"app\"\n");
        assert_eq!(merge_sections(base.clone(), Table::new()), base);
    }

    #[test]
    fn deep_sections_merge_recursively() {
        let base = table("[a.b.c]\nval = 1\nother = \"keep\"\n");
        let overlay = table("[a.b.c]\nval = 99\n");
        let merged = merge_sections(base, overlay);
        let c = merged["a"]["b"]["c"].as_table().unwrap();
        assert_eq!(c["val"].as_integer(), Some(99));
        assert_eq!(c["other"].as_str(), Some("keep"));
    }
}
