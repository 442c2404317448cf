//! Zone-file parsing: tokenizer (C5), line parser (C6), record model (C7)
//! and record builder (C8).

pub mod builder;
pub mod entry;
pub mod parser;
pub mod records;
pub mod tokenizer;

pub use builder::{parse_zone_file, parse_zone_file_with_cache, ZoneMachine};
pub use entry::{Entry, RawRecord};
pub use records::{ClassType, Record, RecordData, RecordType, DEFAULT_TTL};
