//! Record builder (C8): walks a zone file's [`Entry`] stream, threading
//! `(previous_label, default_ttl, current_origin)` state across lines and
//! recursing through `$INCLUDE` via the same [`IncludeMachine`] shape C2
//! uses for the config grammar, parameterized with `Label` as the
//! per-frame "extra" state (the origin in effect at that frame).

use crate::cache::{AstCache, CacheKey, NullAstCache};
use crate::error::{Error, Result};
use crate::include::IncludeMachine;
use crate::label::Label;
use crate::zones::entry::{Entry, RawRecord};
use crate::zones::parser;
use crate::zones::records::{ClassType, RecordData, RecordType, Record, DEFAULT_TTL};
use crate::zones::tokenizer;
use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub type ZoneMachine = IncludeMachine<Label, Vec<Entry>>;

/// Parse a whole zone file (and everything it `$INCLUDE`s) into fully
/// resolved [`Record`]s, starting from `origin` (the origin declared for
/// this zone in its `zone "origin" { ... }` config block). Equivalent to
/// [`parse_zone_file_with_cache`] with a [`NullAstCache`] — no persistent
/// AST cache is consulted.
pub fn parse_zone_file(
    path: &Path,
    origin: &Label,
    root: &Path,
    fake_root: &Path,
) -> Result<(Vec<Record>, ZoneMachine)> {
    parse_zone_file_with_cache(path, origin, root, fake_root, &NullAstCache)
}

/// As [`parse_zone_file`], but consulting `cache` (§6/C12) for each file
/// read — top-level zone file and every `$INCLUDE`d file — before parsing
/// it from disk, and populating the cache after a fresh parse.
pub fn parse_zone_file_with_cache(
    path: &Path,
    origin: &Label,
    root: &Path,
    fake_root: &Path,
    cache: &dyn AstCache,
) -> Result<(Vec<Record>, ZoneMachine)> {
    let mut machine: ZoneMachine = IncludeMachine::new(
        root.to_path_buf(),
        fake_root.to_path_buf(),
        path.to_path_buf(),
        origin.clone(),
    );
    let records = build(&mut machine, path, origin.clone(), DEFAULT_TTL, cache)?;
    Ok((records, machine))
}

fn load_entries(machine: &mut ZoneMachine, path: &Path, origin: &Label, cache: &dyn AstCache) -> Result<Vec<Entry>> {
    if let Some(cached) = machine.cached(path) {
        return Ok(cached);
    }

    let key = CacheKey::new(path, origin.as_str());
    if let Some(entries) = cache.get(&key, path) {
        machine.store(path.to_path_buf(), entries.clone());
        return Ok(entries);
    }

    let text = fs::read_to_string(path).map_err(|source| Error::IncludeNotFound {
        path: path.display().to_string(),
        including: machine.peek().path.clone(),
        source,
    })?;

    let lines = tokenizer::tokenize(&text);
    let entries = parser::parse_lines(&lines, path)?;
    machine.store(path.to_path_buf(), entries.clone());
    cache.put(&key, &entries);
    Ok(entries)
}

/// Build the records for one file. `previous_label` always starts `None`
/// here — whether this is the top-level zone file or a freshly recursed
/// `$INCLUDE`, a blank owner on its first record line is
/// `InheritedOwnerMissing` (§4.5's implementation note, §9 decision).
fn build(
    machine: &mut ZoneMachine,
    path: &Path,
    mut origin: Label,
    mut default_ttl: u32,
    cache: &dyn AstCache,
) -> Result<Vec<Record>> {
    let entries = load_entries(machine, path, &origin, cache)?;
    let mut previous_label: Option<String> = None;
    let mut out = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry {
            Entry::Origin { name, .. } => {
                origin = Label::new(&name).resolve(&origin);
            }
            Entry::Ttl { seconds, .. } => {
                default_ttl = seconds;
            }
            Entry::Include {
                path: inc_path,
                origin: origin_override,
                ..
            } => {
                let resolved = machine.resolve(&inc_path);
                let child_origin = match origin_override {
                    Some(o) => Label::new(&o).resolve(&origin),
                    None => origin.clone(),
                };
                machine.push(resolved.clone(), child_origin.clone());
                let included = build(machine, &resolved, child_origin, default_ttl, cache);
                machine.pop();
                out.extend(included?);
            }
            Entry::Record(raw) => {
                let owner = match raw.owner.clone() {
                    Some(o) => o,
                    None => previous_label.clone().ok_or(Error::InheritedOwnerMissing {
                        path: path.to_path_buf(),
                        line: raw.line,
                    })?,
                };
                previous_label = Some(owner.clone());

                let ttl = raw.ttl.unwrap_or(default_ttl);
                let class_type = raw.class.unwrap_or_default();
                let data = build_rdata(&raw, path)?;

                out.push(Record {
                    label: owner,
                    ttl,
                    class_type,
                    origin: origin.as_str().to_string(),
                    path: path.to_path_buf(),
                    data,
                });
            }
        }
    }

    Ok(out)
}

fn field<'a>(raw: &'a RawRecord, path: &Path, idx: usize, what: &str) -> Result<&'a str> {
    raw.rdata.get(idx).map(String::as_str).ok_or_else(|| Error::InvalidRdata {
        path: path.to_path_buf(),
        line: raw.line,
        type_name: raw.type_name.clone(),
        message: format!("missing {}", what),
    })
}

fn field_u32(raw: &RawRecord, path: &Path, idx: usize, what: &str) -> Result<u32> {
    field(raw, path, idx, what)?.parse().map_err(|e| Error::InvalidRdata {
        path: path.to_path_buf(),
        line: raw.line,
        type_name: raw.type_name.clone(),
        message: format!("invalid {}: {}", what, e),
    })
}

fn field_u16(raw: &RawRecord, path: &Path, idx: usize, what: &str) -> Result<u16> {
    field(raw, path, idx, what)?.parse().map_err(|e| Error::InvalidRdata {
        path: path.to_path_buf(),
        line: raw.line,
        type_name: raw.type_name.clone(),
        message: format!("invalid {}: {}", what, e),
    })
}

fn build_rdata(raw: &RawRecord, path: &Path) -> Result<RecordData> {
    let rtype = RecordType::parse(&raw.type_name).ok_or_else(|| Error::UnknownRecordType {
        path: path.to_path_buf(),
        line: raw.line,
        type_name: raw.type_name.clone(),
    })?;

    Ok(match rtype {
        RecordType::A => {
            let text = field(raw, path, 0, "address")?;
            let address = Ipv4Addr::from_str(text).map_err(|e| Error::InvalidAddress {
                path: path.to_path_buf(),
                line: raw.line,
                text: text.to_string(),
                message: e.to_string(),
            })?;
            RecordData::A { address }
        }
        RecordType::NS => RecordData::Ns {
            target: field(raw, path, 0, "target")?.to_string(),
        },
        RecordType::CNAME => RecordData::Cname {
            target: field(raw, path, 0, "target")?.to_string(),
        },
        RecordType::PTR => RecordData::Ptr {
            target: field(raw, path, 0, "target")?.to_string(),
        },
        RecordType::MX => RecordData::Mx {
            priority: field_u16(raw, path, 0, "priority")?,
            target: field(raw, path, 1, "target")?.to_string(),
        },
        RecordType::AFSDB => RecordData::Afsdb {
            priority: field_u16(raw, path, 0, "priority")?,
            target: field(raw, path, 1, "target")?.to_string(),
        },
        RecordType::SRV => RecordData::Srv {
            priority: field_u16(raw, path, 0, "priority")?,
            weight: field_u16(raw, path, 1, "weight")?,
            port: field_u16(raw, path, 2, "port")?,
            target: field(raw, path, 3, "target")?.to_string(),
        },
        RecordType::TXT => RecordData::Txt {
            labels: raw.rdata.clone(),
        },
        RecordType::SOA => RecordData::Soa {
            primary: field(raw, path, 0, "mname")?.to_string(),
            mail: field(raw, path, 1, "rname")?.to_string(),
            serial: field_u32(raw, path, 2, "serial")?,
            refresh: field_u32(raw, path, 3, "refresh")?,
            retry: field_u32(raw, path, 4, "retry")?,
            expire: field_u32(raw, path, 5, "expire")?,
            minimum: field_u32(raw, path, 6, "minimum")?,
        },
    })
}
