//! Query engine (C9): indexes records by labelized key and answers
//! record-type/view/wildcard-filtered lookups with at-most-once delivery.
//! Also the `Database` read handle the validation-suite contract (§6/C11)
//! describes — splitting the index from the handle buys nothing here, so
//! the two are one type.

use crate::config::Config;
use crate::label::{Component, Label};
use crate::zones::{Record, RecordType};
use std::collections::{HashMap, HashSet};

/// One item of a record/view filter list: either a bare name (`"A"`,
/// `"internal"`) or, for record filters, a variant tag. Both spellings are
/// tolerated in a list (§4.7 design note 9.1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterItem {
    Name(String),
    Type(RecordType),
}

impl From<&str> for FilterItem {
    fn from(s: &str) -> Self {
        FilterItem::Name(s.to_string())
    }
}

impl From<RecordType> for FilterItem {
    fn from(t: RecordType) -> Self {
        FilterItem::Type(t)
    }
}

/// `record=` argument to [`Database::query`]: `None`/all, a single name or
/// variant, or a list tolerating either spelling per item.
#[derive(Clone, Debug, Default)]
pub enum RecordFilter {
    #[default]
    Any,
    Single(FilterItem),
    List(Vec<FilterItem>),
}

impl RecordFilter {
    fn matches(&self, record: &Record) -> bool {
        match self {
            RecordFilter::Any => true,
            RecordFilter::Single(item) => item_matches(item, record),
            RecordFilter::List(items) => items.iter().any(|item| item_matches(item, record)),
        }
    }
}

fn item_matches(item: &FilterItem, record: &Record) -> bool {
    match item {
        FilterItem::Name(name) => name.eq_ignore_ascii_case(record.type_name()),
        FilterItem::Type(t) => t.to_string().eq_ignore_ascii_case(record.type_name()),
    }
}

impl From<&str> for RecordFilter {
    fn from(s: &str) -> Self {
        RecordFilter::Single(FilterItem::from(s))
    }
}

impl From<RecordType> for RecordFilter {
    fn from(t: RecordType) -> Self {
        RecordFilter::Single(FilterItem::from(t))
    }
}

impl<T: Into<FilterItem>> From<Vec<T>> for RecordFilter {
    fn from(items: Vec<T>) -> Self {
        RecordFilter::List(items.into_iter().map(Into::into).collect())
    }
}

/// `view=` argument to [`Database::query`]. The root config always passes
/// (§4.7: "it represents 'no view'").
#[derive(Clone, Debug, Default)]
pub enum ViewFilter {
    #[default]
    Any,
    Single(String),
    List(Vec<String>),
}

impl ViewFilter {
    fn matches(&self, config: &Config) -> bool {
        if config.is_root() {
            return true;
        }
        let name = config.name.as_deref().unwrap_or("");
        match self {
            ViewFilter::Any => true,
            ViewFilter::Single(n) => n == name,
            ViewFilter::List(names) => names.iter().any(|n| n == name),
        }
    }
}

impl From<&str> for ViewFilter {
    fn from(s: &str) -> Self {
        ViewFilter::Single(s.to_string())
    }
}

impl From<Vec<String>> for ViewFilter {
    fn from(v: Vec<String>) -> Self {
        ViewFilter::List(v)
    }
}

/// Records parsed from one zone file, plus every config node (root or
/// view) that declares this zone (§3, "a single zone file parsed once may
/// be referenced by multiple views").
#[derive(Clone, Debug)]
pub struct ZoneEntry {
    pub records: Vec<Record>,
    pub configs: Vec<Config>,
}

/// Built once from a sequence of zone entries; thereafter read-only (§5).
pub struct Database {
    zones: Vec<ZoneEntry>,
    index: HashMap<Vec<Component>, Vec<(usize, usize)>>,
}

impl Database {
    pub fn new(zones: Vec<ZoneEntry>) -> Self {
        let mut index: HashMap<Vec<Component>, Vec<(usize, usize)>> = HashMap::new();
        for (zi, zone) in zones.iter().enumerate() {
            for (ri, record) in zone.records.iter().enumerate() {
                index
                    .entry(record.resolved_label().key())
                    .or_default()
                    .push((zi, ri));
            }
        }
        Database { zones, index }
    }

    pub fn zones(&self) -> &[ZoneEntry] {
        &self.zones
    }

    /// Lazily-filtered lookup as an owned vector, materializing `iquery`'s
    /// iterator (§4.7: "`query(…)` materializes the iterator into a
    /// list").
    pub fn query(&self, label: &Label, record: &RecordFilter, view: &ViewFilter, unique: bool) -> Vec<Record> {
        self.iquery(label, record, view, unique)
    }

    pub fn iquery(&self, label: &Label, record: &RecordFilter, view: &ViewFilter, unique: bool) -> Vec<Record> {
        let candidates = if label.is_wildcard_query() {
            self.wildcard_candidates(label)
        } else {
            self.index_probe(label)
        };

        let mut seen: HashSet<Record> = HashSet::new();
        let mut out = Vec::new();

        for (zi, ri) in candidates {
            let zone = &self.zones[zi];
            let rec = &zone.records[ri];

            if !record.matches(rec) {
                continue;
            }
            if !zone.configs.iter().any(|c| view.matches(c)) {
                continue;
            }
            if unique {
                if seen.contains(rec) {
                    continue;
                }
                seen.insert(rec.clone());
            }
            out.push(rec.clone());
        }

        out
    }

    /// Direct match first, then the wildcarded-first-component form; stop
    /// after the first bucket that yields a hit (§4.7 step 4).
    fn index_probe(&self, label: &Label) -> Vec<(usize, usize)> {
        let key = label.key();
        if let Some(hits) = self.index.get(&key) {
            if !hits.is_empty() {
                return hits.clone();
            }
        }

        if key.is_empty() {
            return Vec::new();
        }

        let mut wildcard_key = key;
        wildcard_key[0] = Component::Any;
        self.index.get(&wildcard_key).cloned().unwrap_or_default()
    }

    /// Iterate every record in every zone, matching `label` against each
    /// candidate's resolved label as a shell-style glob (§4.7 step 3: "under
    /// shell-style glob", matching the original's `fnmatch.fnmatch`) — `*`
    /// crosses dots, so `*` alone matches every record and `*.example.com.`
    /// matches `a.b.example.com.` as well as `www.example.com.`. This is
    /// deliberately a plain string match, not the component/`ANY` scheme
    /// `index_probe` uses for the single-level wildcard fallback of step 4.
    fn wildcard_candidates(&self, label: &Label) -> Vec<(usize, usize)> {
        let pattern = label.as_str();
        let mut out = Vec::new();
        for (zi, zone) in self.zones.iter().enumerate() {
            for (ri, record) in zone.records.iter().enumerate() {
                if glob_match(pattern, record.resolved_label().as_str()) {
                    out.push((zi, ri));
                }
            }
        }
        out
    }
}

/// Shell-style glob match (`*` matches any run of characters including
/// none, crossing `.` boundaries; `?` matches exactly one character),
/// equivalent to Python's `fnmatch.fnmatch` for the patterns this crate
/// produces. Classic two-pointer backtracking match, case-sensitive (as
/// `fnmatch.fnmatch` is on POSIX, which is what the original runs on).
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<usize> = None;
    let mut star_t = 0;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            star_t = t;
            p += 1;
        } else if let Some(sp) = star {
            p = sp + 1;
            star_t += 1;
            t = star_t;
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::{ClassType, RecordData};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_glob_match_star_crosses_dots() {
        assert!(glob_match("*", "www.example.com."));
        assert!(glob_match("*.example.com.", "a.b.example.com."));
        assert!(glob_match("*.example.com.", "www.example.com."));
        assert!(!glob_match("*.example.com.", "www.other.com."));
        assert!(glob_match("www.*", "www.example.com."));
    }

    fn a_record(label: &str, origin: &str, address: &str) -> Record {
        Record {
            label: label.to_string(),
            ttl: 3600,
            class_type: ClassType::Internet,
            origin: origin.to_string(),
            path: PathBuf::from("db.example"),
            data: RecordData::A {
                address: address.parse().unwrap(),
            },
        }
    }

    fn single_zone_db(records: Vec<Record>) -> Database {
        Database::new(vec![ZoneEntry {
            records,
            configs: vec![Config::root()],
        }])
    }

    #[test]
    fn test_direct_lookup() {
        let db = single_zone_db(vec![a_record("www", "example.com.", "1.1.1.1")]);
        let got = db.query(
            &Label::new("www.example.com."),
            &RecordFilter::Any,
            &ViewFilter::Any,
            false,
        );
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn test_wildcard_record_matches_unindexed_direct_query() {
        let db = single_zone_db(vec![a_record("*", "example.com.", "2.2.2.2")]);
        let got = db.query(
            &Label::new("anything.example.com."),
            &RecordFilter::Any,
            &ViewFilter::Any,
            false,
        );
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn test_exact_match_preferred_over_wildcard() {
        let db = single_zone_db(vec![
            a_record("*", "example.com.", "2.2.2.2"),
            a_record("www", "example.com.", "1.1.1.1"),
        ]);
        let got = db.query(
            &Label::new("www.example.com."),
            &RecordFilter::Any,
            &ViewFilter::Any,
            false,
        );
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data, RecordData::A { address: "1.1.1.1".parse().unwrap() });
    }

    #[test]
    fn test_wildcard_query_iterates_all_zones() {
        let db = single_zone_db(vec![
            a_record("www", "example.com.", "1.1.1.1"),
            a_record("ns", "example.com.", "9.9.9.9"),
        ]);
        let got = db.query(
            &Label::new("*.example.com."),
            &RecordFilter::Any,
            &ViewFilter::Any,
            false,
        );
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn test_bare_star_query_matches_every_record() {
        let db = single_zone_db(vec![
            a_record("www", "example.com.", "1.1.1.1"),
            a_record("ns", "example.com.", "9.9.9.9"),
        ]);
        let got = db.query(&Label::new("*"), &RecordFilter::Any, &ViewFilter::Any, false);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn test_wildcard_query_crosses_dots_like_fnmatch() {
        let db = single_zone_db(vec![
            a_record("a.b", "example.com.", "1.1.1.1"),
            a_record("www", "example.com.", "2.2.2.2"),
            a_record("www", "other.com.", "3.3.3.3"),
        ]);
        let got = db.query(
            &Label::new("*.example.com."),
            &RecordFilter::Any,
            &ViewFilter::Any,
            false,
        );
        assert_eq!(got.len(), 2);
        assert!(got.iter().any(|r| r.resolved_label().as_str() == "a.b.example.com."));
        assert!(got.iter().any(|r| r.resolved_label().as_str() == "www.example.com."));
    }

    #[test]
    fn test_unique_dedups_by_full_equality() {
        let rec = a_record("www", "example.com.", "1.1.1.1");
        let db = single_zone_db(vec![rec.clone(), rec]);
        let got = db.query(
            &Label::new("www.example.com."),
            &RecordFilter::Any,
            &ViewFilter::Any,
            true,
        );
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn test_record_filter_by_type_name_and_variant() {
        let db = single_zone_db(vec![a_record("www", "example.com.", "1.1.1.1")]);
        let by_name = db.query(
            &Label::new("www.example.com."),
            &RecordFilter::from("A"),
            &ViewFilter::Any,
            false,
        );
        assert_eq!(by_name.len(), 1);

        let by_variant = db.query(
            &Label::new("www.example.com."),
            &RecordFilter::from(RecordType::A),
            &ViewFilter::Any,
            false,
        );
        assert_eq!(by_variant.len(), 1);

        let no_match = db.query(
            &Label::new("www.example.com."),
            &RecordFilter::from("MX"),
            &ViewFilter::Any,
            false,
        );
        assert!(no_match.is_empty());
    }

    #[test]
    fn test_view_filter_scopes_to_owning_config() {
        let internal = Config {
            name: Some("internal".to_string()),
            ..Config::default()
        };
        let external = Config {
            name: Some("external".to_string()),
            ..Config::default()
        };

        let db = Database::new(vec![
            ZoneEntry {
                records: vec![a_record("x", "corp.", "10.0.0.1")],
                configs: vec![internal],
            },
            ZoneEntry {
                records: vec![a_record("x", "corp.", "10.0.0.2")],
                configs: vec![external],
            },
        ]);

        let got = db.query(
            &Label::new("x.corp."),
            &RecordFilter::Any,
            &ViewFilter::from("internal"),
            false,
        );
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data, RecordData::A { address: "10.0.0.1".parse().unwrap() });
    }

    #[test]
    fn test_root_config_always_passes_view_filter() {
        let db = single_zone_db(vec![a_record("www", "example.com.", "1.1.1.1")]);
        let got = db.query(
            &Label::new("www.example.com."),
            &RecordFilter::Any,
            &ViewFilter::from("some-view"),
            false,
        );
        assert_eq!(got.len(), 1);
    }
}
