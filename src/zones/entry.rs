//! The zone grammar's raw, pre-resolution AST: one [`Entry`] per logical
//! line, produced by the zone parser (C6) straight off the tokenizer (C5).
//! This is the shape persisted by the AST cache contract (§6) — origin and
//! TTL bookkeeping happens later, in the record builder (C8).

use crate::zones::records::ClassType;

#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Origin { name: String, line: usize },
    Ttl { seconds: u32, line: usize },
    Include {
        path: String,
        origin: Option<String>,
        line: usize,
    },
    Record(RawRecord),
}

/// A record line before the owner/TTL/class have been resolved against
/// builder state: each of `owner`, `ttl`, `class` may be absent, meaning
/// "inherit" (§4.5).
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    pub owner: Option<String>,
    pub ttl: Option<u32>,
    pub class: Option<ClassType>,
    pub type_name: String,
    pub rdata: Vec<String>,
    pub line: usize,
}
