//! Persistent AST cache contract (C12): an optional plug-in that lets a
//! caller skip re-parsing a zone file across runs. Keyed by
//! `md5(zone.file || zone.origin)` (§6); an entry is valid iff the cache
//! file exists and is newer than the zone file it caches.
//!
//! This crate defines the [`AstCache`] trait and ships two
//! implementations: [`NullAstCache`] (always a miss, used when no
//! `--parser-cache` directory is configured) and [`DirCacheStore`], a
//! minimal disk-backed store. Both are consulted by
//! [`crate::zones::parse_zone_file_with_cache`] before falling back to
//! parsing from disk.

use crate::zones::entry::{Entry, RawRecord};
use crate::zones::records::ClassType;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// `md5(zone.file || zone.origin)`, exactly as §6 specifies.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(zone_file: &Path, origin: &str) -> CacheKey {
        let joined = format!("{}{}", zone_file.display(), origin);
        CacheKey(format!("{:x}", md5::compute(joined.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The pluggable persistent-cache contract (§6). Implementations need not
/// be reentrant; this crate only ever calls them from a single thread
/// (§5).
pub trait AstCache {
    /// Return the cached entries for `key`, provided the cache considers
    /// them still fresh relative to `zone_file`. A `None` return (for any
    /// reason — miss, staleness, corruption) means "re-parse `zone_file`".
    fn get(&self, key: &CacheKey, zone_file: &Path) -> Option<Vec<Entry>>;

    /// Record `entries` as the parse result for `key`. Best-effort: a
    /// failure to persist is not fatal to the caller, only to future runs'
    /// cache hit rate.
    fn put(&self, key: &CacheKey, entries: &[Entry]);
}

/// No-op cache: always a miss, never stores anything. Used when no
/// `--parser-cache` directory is configured (§6).
pub struct NullAstCache;

impl AstCache for NullAstCache {
    fn get(&self, _key: &CacheKey, _zone_file: &Path) -> Option<Vec<Entry>> {
        None
    }

    fn put(&self, _key: &CacheKey, _entries: &[Entry]) {}
}

/// A minimal disk-backed [`AstCache`]: one file per key under `dir`,
/// holding a line-oriented plain-text serialization of the zone grammar's
/// pragma/record AST (`Vec<Entry>`, pre-[`crate::zones::builder`]
/// resolution). No `bincode`/`serde` dependency — the format is simple
/// enough that a hand-rolled encode/decode pair is less machinery than
/// pulling in a serialization framework for one cache file shape.
pub struct DirCacheStore {
    dir: PathBuf,
}

impl DirCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirCacheStore { dir: dir.into() }
    }

    fn cache_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.astcache", key.as_str()))
    }
}

impl AstCache for DirCacheStore {
    fn get(&self, key: &CacheKey, zone_file: &Path) -> Option<Vec<Entry>> {
        let cache_path = self.cache_path(key);

        let cache_mtime = fs::metadata(&cache_path).and_then(|m| m.modified()).ok()?;
        let zone_mtime = fs::metadata(zone_file).and_then(|m| m.modified()).ok()?;
        if cache_mtime <= zone_mtime {
            return None;
        }

        let text = match fs::read_to_string(&cache_path) {
            Ok(t) => t,
            Err(e) => {
                warn!("parser cache entry {:?} unreadable ({}); re-parsing", cache_path, e);
                return None;
            }
        };

        match decode(&text) {
            Ok(entries) => Some(entries),
            Err(message) => {
                warn!("parser cache entry {:?} is broken ({}); re-parsing", cache_path, message);
                None
            }
        }
    }

    fn put(&self, key: &CacheKey, entries: &[Entry]) {
        let cache_path = self.cache_path(key);
        let text = encode(entries);
        if let Err(e) = fs::create_dir_all(&self.dir).and_then(|_| fs::write(&cache_path, text)) {
            warn!("failed to write parser cache entry {:?}: {}", cache_path, e);
        }
    }
}

// --- encoding -----------------------------------------------------------
//
// One line per `Entry`. Fields are tab-separated; a record's rdata tokens
// are further joined by `\x1f` (unit separator), which zone-file text is
// vanishingly unlikely to contain. `escape`/`unescape` protect against a
// token that does contain a tab, unit separator, or newline (e.g. a quoted
// TXT string).

const FIELD_SEP: char = '\t';
const RDATA_SEP: char = '\x1f';

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(FIELD_SEP, "\\t")
        .replace(RDATA_SEP, "\\u")
        .replace('\n', "\\n")
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push(FIELD_SEP),
            Some('u') => out.push(RDATA_SEP),
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn opt_field(s: &Option<String>) -> String {
    match s {
        Some(v) => escape(v),
        None => "-".to_string(),
    }
}

fn parse_opt_field(s: &str) -> Option<String> {
    if s == "-" {
        None
    } else {
        Some(unescape(s))
    }
}

fn encode(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry {
            Entry::Origin { name, line } => {
                out.push_str(&format!("ORIGIN\t{}\t{}\n", line, escape(name)));
            }
            Entry::Ttl { seconds, line } => {
                out.push_str(&format!("TTL\t{}\t{}\n", line, seconds));
            }
            Entry::Include { path, origin, line } => {
                out.push_str(&format!(
                    "INCLUDE\t{}\t{}\t{}\n",
                    line,
                    escape(path),
                    opt_field(origin)
                ));
            }
            Entry::Record(raw) => {
                let rdata = raw
                    .rdata
                    .iter()
                    .map(|s| escape(s))
                    .collect::<Vec<_>>()
                    .join(&RDATA_SEP.to_string());
                let class = raw.class.map(|c| c.to_string());
                out.push_str(&format!(
                    "RECORD\t{}\t{}\t{}\t{}\t{}\t{}\n",
                    raw.line,
                    opt_field(&raw.owner),
                    raw.ttl.map(|t| t.to_string()).as_deref().unwrap_or("-"),
                    opt_field(&class),
                    escape(&raw.type_name),
                    rdata
                ));
            }
        }
    }
    out
}

fn decode(text: &str) -> Result<Vec<Entry>, String> {
    text.lines()
        .filter(|l| !l.is_empty())
        .map(decode_line)
        .collect()
}

fn decode_line(line: &str) -> Result<Entry, String> {
    let fields: Vec<&str> = line.split(FIELD_SEP).collect();
    let tag = *fields.first().ok_or("empty cache line")?;
    let parse_line_no = |s: &str| s.parse::<usize>().map_err(|e| e.to_string());

    match tag {
        "ORIGIN" => {
            let line = parse_line_no(fields.get(1).ok_or("missing line number")?)?;
            let name = unescape(fields.get(2).ok_or("missing origin name")?);
            Ok(Entry::Origin { name, line })
        }
        "TTL" => {
            let line = parse_line_no(fields.get(1).ok_or("missing line number")?)?;
            let seconds = fields
                .get(2)
                .ok_or("missing ttl value")?
                .parse::<u32>()
                .map_err(|e| e.to_string())?;
            Ok(Entry::Ttl { seconds, line })
        }
        "INCLUDE" => {
            let line = parse_line_no(fields.get(1).ok_or("missing line number")?)?;
            let path = unescape(fields.get(2).ok_or("missing include path")?);
            let origin = parse_opt_field(fields.get(3).ok_or("missing include origin")?);
            Ok(Entry::Include { path, origin, line })
        }
        "RECORD" => {
            let line = parse_line_no(fields.get(1).ok_or("missing line number")?)?;
            let owner = parse_opt_field(fields.get(2).ok_or("missing owner field")?);
            let ttl = match *fields.get(3).ok_or("missing ttl field")? {
                "-" => None,
                s => Some(s.parse::<u32>().map_err(|e| e.to_string())?),
            };
            let class = match parse_opt_field(fields.get(4).ok_or("missing class field")?) {
                Some(s) => Some(ClassType::from_str(&s).map_err(|_| format!("invalid class {:?}", s))?),
                None => None,
            };
            let type_name = unescape(fields.get(5).ok_or("missing type name")?);
            let rdata = match fields.get(6) {
                Some(s) if !s.is_empty() => s.split(RDATA_SEP).map(unescape).collect(),
                _ => Vec::new(),
            };
            Ok(Entry::Record(RawRecord {
                owner,
                ttl,
                class,
                type_name,
                rdata,
                line,
            }))
        }
        other => Err(format!("unknown cache entry tag {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::tokenizer::tokenize;
    use crate::zones::parser::parse_lines;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::tempdir;

    fn sample_entries() -> Vec<Entry> {
        let lines = tokenize("$ORIGIN example.com.\n$TTL 300\nwww IN A 1.1.1.1\n@ IN TXT \"a b\\tc\"\n$INCLUDE sub.zone other.com.\n");
        parse_lines(&lines, Path::new("db.example")).unwrap()
    }

    #[test]
    fn test_encode_decode_round_trips() {
        let entries = sample_entries();
        let text = encode(&entries);
        let decoded = decode(&text).unwrap();
        assert_eq!(decoded, entries);
    }

    #[test]
    fn test_null_cache_is_always_a_miss() {
        let dir = tempdir().unwrap();
        let zone_file = dir.path().join("db.example");
        fs::write(&zone_file, "").unwrap();

        let cache = NullAstCache;
        let key = CacheKey::new(&zone_file, "example.com.");
        assert!(cache.get(&key, &zone_file).is_none());
    }

    #[test]
    fn test_dir_cache_store_hit_after_put() {
        let dir = tempdir().unwrap();
        let zone_file = dir.path().join("db.example");
        fs::write(&zone_file, "$ORIGIN example.com.\n").unwrap();

        let cache_dir = dir.path().join("cache");
        let store = DirCacheStore::new(&cache_dir);
        let key = CacheKey::new(&zone_file, "example.com.");

        let entries = sample_entries();
        store.put(&key, &entries);

        // Cache file must be newer than the zone file to count as fresh.
        sleep(Duration::from_millis(10));
        fs::write(
            cache_dir.join(format!("{}.astcache", key.as_str())),
            encode(&entries),
        )
        .unwrap();

        assert_eq!(store.get(&key, &zone_file), Some(entries));
    }

    #[test]
    fn test_dir_cache_store_stale_entry_is_ignored() {
        let dir = tempdir().unwrap();
        let zone_file = dir.path().join("db.example");
        fs::write(&zone_file, "$ORIGIN example.com.\n").unwrap();

        let cache_dir = dir.path().join("cache");
        let store = DirCacheStore::new(&cache_dir);
        let key = CacheKey::new(&zone_file, "example.com.");
        store.put(&key, &sample_entries());

        // Touch the zone file so it is newer than the cache entry.
        sleep(Duration::from_millis(10));
        fs::write(&zone_file, "$ORIGIN example.com.\nwww A 2.2.2.2\n").unwrap();

        assert!(store.get(&key, &zone_file).is_none());
    }

    #[test]
    fn test_dir_cache_store_missing_entry_is_a_miss() {
        let dir = tempdir().unwrap();
        let zone_file = dir.path().join("db.example");
        fs::write(&zone_file, "").unwrap();

        let store = DirCacheStore::new(dir.path().join("cache"));
        let key = CacheKey::new(&zone_file, "example.com.");
        assert!(store.get(&key, &zone_file).is_none());
    }

    #[test]
    fn test_cache_key_differs_by_origin() {
        let a = CacheKey::new(Path::new("/z/db.example"), "example.com.");
        let b = CacheKey::new(Path::new("/z/db.example"), "other.com.");
        assert_ne!(a, b);
    }
}
