//! Zone parser (C6): turns tokenized lines into [`Entry`] values —
//! pragmas recognized, record lines positionally disambiguated into
//! owner/TTL/class/type/rdata — without yet resolving owner names or
//! inheriting state across lines (that is the record builder's job, C8).

use crate::error::{Error, Result};
use crate::zones::entry::{Entry, RawRecord};
use crate::zones::records::{ClassType, RecordType};
use crate::zones::tokenizer::Line;
use std::path::Path;
use std::str::FromStr;

pub fn parse_lines(lines: &[Line], path: &Path) -> Result<Vec<Entry>> {
    lines.iter().map(|line| parse_line(line, path)).collect()
}

fn parse_line(line: &Line, path: &Path) -> Result<Entry> {
    let tokens = &line.tokens;

    if tokens[0].is_empty() {
        return parse_record(None, &tokens[1..], line.line, path);
    }

    if let Some(pragma) = tokens[0].strip_prefix('$') {
        return parse_pragma(pragma, &tokens[1..], line.line, path);
    }

    parse_record(Some(tokens[0].clone()), &tokens[1..], line.line, path)
}

fn parse_pragma(name: &str, args: &[String], line: usize, path: &Path) -> Result<Entry> {
    match name.to_ascii_uppercase().as_str() {
        "ORIGIN" => {
            let name = args.first().ok_or_else(|| Error::Parse {
                path: path.to_path_buf(),
                message: format!("line {}: $ORIGIN requires a name", line),
            })?;
            Ok(Entry::Origin {
                name: name.clone(),
                line,
            })
        }
        "TTL" => {
            let seconds = args
                .first()
                .ok_or_else(|| Error::Parse {
                    path: path.to_path_buf(),
                    message: format!("line {}: $TTL requires a value", line),
                })?
                .parse::<u32>()
                .map_err(|e| Error::Parse {
                    path: path.to_path_buf(),
                    message: format!("line {}: invalid $TTL value: {}", line, e),
                })?;
            Ok(Entry::Ttl { seconds, line })
        }
        "INCLUDE" => {
            let path_arg = args.first().ok_or_else(|| Error::Parse {
                path: path.to_path_buf(),
                message: format!("line {}: $INCLUDE requires a path", line),
            })?;
            Ok(Entry::Include {
                path: path_arg.clone(),
                origin: args.get(1).cloned(),
                line,
            })
        }
        other => Err(Error::Parse {
            path: path.to_path_buf(),
            message: format!("line {}: unknown pragma ${}", line, other),
        }),
    }
}

fn parse_record(owner: Option<String>, rest: &[String], line: usize, path: &Path) -> Result<Entry> {
    let mut idx = 0;
    let mut ttl = None;
    let mut class = None;

    while idx < rest.len() && idx < 2 {
        let tok = &rest[idx];

        if ttl.is_none() && !tok.is_empty() && tok.chars().all(|c| c.is_ascii_digit()) {
            ttl = Some(tok.parse::<u32>().map_err(|e| Error::Parse {
                path: path.to_path_buf(),
                message: format!("line {}: invalid ttl {:?}: {}", line, tok, e),
            })?);
            idx += 1;
            continue;
        }

        if class.is_none() {
            if let Ok(c) = ClassType::from_str(&tok.to_ascii_uppercase()) {
                class = Some(c);
                idx += 1;
                continue;
            }
        }

        break;
    }

    let type_name = rest.get(idx).ok_or_else(|| Error::Parse {
        path: path.to_path_buf(),
        message: format!("line {}: missing record type", line),
    })?;

    if RecordType::parse(type_name).is_none() {
        return Err(Error::UnknownRecordType {
            path: path.to_path_buf(),
            line,
            type_name: type_name.clone(),
        });
    }

    Ok(Entry::Record(RawRecord {
        owner,
        ttl,
        class,
        type_name: type_name.clone(),
        rdata: rest[idx + 1..].to_vec(),
        line,
    }))
}
