//! Top-level wiring: load a config tree (C3/C4), resolve and parse every
//! zone it references at most once per `(file, origin)` (C1/C2/C5–C8), and
//! build the read-only [`Database`] the validation-suite contract (§6)
//! exposes to out-of-tree suites. This is the one place the whole pipeline
//! described in §2's data-flow paragraph is actually assembled; every
//! piece it calls is independently usable (e.g. a caller who already has a
//! `Config` tree can skip straight to [`crate::query::Database::new`]).

use crate::cache::{AstCache, NullAstCache};
use crate::config::{self, Config};
use crate::error::Result;
use crate::label::Label;
use crate::query::{Database, ZoneEntry};
use crate::zones;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Load `root_path` (a named.conf-style top-level config) and every zone
/// it or its views reference, with no persistent AST cache consulted.
/// Equivalent to [`load_database_with_cache`] with a [`NullAstCache`].
pub fn load_database(root_path: &Path, fake_root: &Path) -> Result<Database> {
    load_database_with_cache(root_path, fake_root, &NullAstCache)
}

/// As [`load_database`], consulting `cache` for each distinct zone file
/// before parsing it from disk (§6/C12).
pub fn load_database_with_cache(
    root_path: &Path,
    fake_root: &Path,
    cache: &dyn AstCache,
) -> Result<Database> {
    let root = config::load(root_path, fake_root)?;
    let root_dir = root_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    // Invariant 4 (§3): the set of zone database entries is keyed by
    // `(file, origin)`; a zone referenced by several views is still
    // parsed only once, with every referencing `Config` accumulated
    // against that one entry.
    let mut order: Vec<(PathBuf, String)> = Vec::new();
    let mut configs_by_key: HashMap<(PathBuf, String), Vec<Config>> = HashMap::new();

    for (cfg, zone) in root.zone_pairs() {
        let key = (zone.file.clone(), zone.origin.clone());
        if !configs_by_key.contains_key(&key) {
            order.push(key.clone());
        }
        configs_by_key.entry(key).or_default().push(cfg.clone());
    }

    let mut zones = Vec::with_capacity(order.len());
    for key in order {
        let (file, origin_str) = &key;
        let origin = Label::new(origin_str.as_str());

        let (records, _machine) =
            zones::parse_zone_file_with_cache(file, &origin, &root_dir, fake_root, cache)?;

        zones.push(ZoneEntry {
            records,
            configs: configs_by_key.remove(&key).unwrap_or_default(),
        });
    }

    Ok(Database::new(zones))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{RecordFilter, ViewFilter};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_database_single_zone() {
        let dir = tempdir().unwrap();
        write(dir.path(), "db.example", "$ORIGIN example.com.\nwww A 1.1.1.1\n");
        let conf = write(
            dir.path(),
            "named.conf",
            r#"zone "example.com" { file "db.example"; };"#,
        );

        let db = load_database(&conf, Path::new("/etc/bind")).unwrap();
        let got = db.query(
            &Label::new("www.example.com."),
            &RecordFilter::Any,
            &ViewFilter::Any,
            false,
        );
        assert_eq!(got.len(), 1);
    }

    /// S6 — two views declaring the same origin with different files: the
    /// shared zone file is parsed exactly once per `(file, origin)`, but
    /// since the two views use *different* files here, each gets its own
    /// entry and `query(view=...)` scopes correctly.
    #[test]
    fn test_load_database_view_scoping_s6() {
        let dir = tempdir().unwrap();
        write(dir.path(), "db.corp.internal", "$ORIGIN corp.\nx A 10.0.0.1\n");
        write(dir.path(), "db.corp.external", "$ORIGIN corp.\nx A 10.0.0.2\n");
        let conf = write(
            dir.path(),
            "named.conf",
            r#"
            view "internal" { zone "corp" { file "db.corp.internal"; }; };
            view "external" { zone "corp" { file "db.corp.external"; }; };
            "#,
        );

        let db = load_database(&conf, Path::new("/etc/bind")).unwrap();
        let got = db.query(
            &Label::new("x.corp."),
            &RecordFilter::Any,
            &ViewFilter::from("internal"),
            false,
        );
        assert_eq!(got.len(), 1);
    }

    /// The same zone file, referenced by two views, is only parsed once —
    /// its `ZoneEntry` accumulates both configs.
    #[test]
    fn test_load_database_shared_zone_file_parsed_once() {
        let dir = tempdir().unwrap();
        write(dir.path(), "db.corp", "$ORIGIN corp.\nx A 10.0.0.1\n");
        let conf = write(
            dir.path(),
            "named.conf",
            r#"
            view "internal" { zone "corp" { file "db.corp"; }; };
            view "external" { zone "corp" { file "db.corp"; }; };
            "#,
        );

        let db = load_database(&conf, Path::new("/etc/bind")).unwrap();
        assert_eq!(db.zones().len(), 1);
        assert_eq!(db.zones()[0].configs.len(), 2);

        let got = db.query(
            &Label::new("x.corp."),
            &RecordFilter::Any,
            &ViewFilter::from("external"),
            false,
        );
        assert_eq!(got.len(), 1);
    }

    /// S3 — an absolute include path is remapped through `--fake-root`.
    #[test]
    fn test_load_database_s3_fake_root_include() {
        let dir = tempdir().unwrap();
        write(dir.path(), "db.example", "$ORIGIN example.com.\nwww A 1.1.1.1\n");
        write(
            dir.path(),
            "zones.conf",
            r#"zone "example.com" { file "db.example"; };"#,
        );
        let conf = write(dir.path(), "named.conf", r#"include "/etc/bind/zones.conf";"#);

        let db = load_database(&conf, Path::new("/etc/bind")).unwrap();
        let got = db.query(
            &Label::new("www.example.com."),
            &RecordFilter::Any,
            &ViewFilter::Any,
            false,
        );
        assert_eq!(got.len(), 1);
    }
}
