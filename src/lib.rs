//! zonedb is an offline parser and query engine for a BIND-style
//! authoritative DNS server's static configuration: a named.conf-style
//! config file (including its `include` directives and `view` scoping)
//! and the zone files it references (RFC 1035 §5 master-file format).
//!
//! It performs no network I/O and is not a resolver: given files on disk,
//! it builds an in-memory, indexed database of fully-qualified resource
//! records that a caller can query, and that out-of-tree validation
//! suites (CNAME-target-exists, every-A-has-a-PTR, and so on) can be built
//! against.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use zonedb::label::Label;
//! use zonedb::query::{RecordFilter, ViewFilter};
//!
//! let db = zonedb::load_database(
//!     Path::new("/cfg/named.conf"),
//!     Path::new("/etc/bind"),
//! ).expect("failed to assemble database");
//!
//! let answers = db.query(
//!     &Label::new("www.example.com."),
//!     &RecordFilter::Any,
//!     &ViewFilter::Any,
//!     false,
//! );
//! for record in answers {
//!     println!("{}", record);
//! }
//! ```
//!
//! # Pipeline
//!
//! | Stage | Module | Responsibility |
//! | --- | --- | --- |
//! | C1 | [`path`] | Resolve an `include`/`file`/`$INCLUDE` path against a real root and a "fake root". |
//! | C2 | [`include`] | Stack of include frames and an in-memory parsed-AST cache, shared by both grammars. |
//! | C3/C4 | [`config`] | named.conf grammar, include splicing, and interpretation into a [`config::Config`] tree. |
//! | C5/C6 | [`zones::tokenizer`], [`zones::parser`] | Zone-file tokenizing and pragma/record recognition. |
//! | C7/C8 | [`zones::records`], [`zones::builder`] | The typed record model and the origin/TTL/owner-inheritance builder. |
//! | C9 | [`query`] | The indexed, filterable, deduplicating query engine ([`query::Database`]). |
//!
//! [`assemble`] wires C1–C9 together end to end; [`cache`] and [`report`]
//! are the ambient contracts (§6) that out-of-tree callers (a CLI, a
//! suite runner) are expected to use but which this crate does not itself
//! ship a binary for.
//!
//! # Out of scope
//!
//! This crate is a library. The command-line front end, the interactive
//! REPL, and the validation suites themselves (CNAME/PTR/SRV checks and
//! so on) are consumers of this crate, not part of it — see [`query`] for
//! the interface they are built against and [`report`] for how they
//! surface findings.
//!
//! # Testing
//!
//! Unit tests live beside the code they test (`#[cfg(test)] mod tests`).
//! Integration tests that need real files on disk live under `tests/` and
//! build throwaway include trees with `tempfile`.

mod assemble;
pub mod cache;
pub mod config;
pub mod error;
pub mod include;
pub mod label;
pub mod path;
pub mod query;
pub mod report;
pub mod zones;

#[macro_use]
extern crate pest_derive;

pub use crate::assemble::{load_database, load_database_with_cache};
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::label::Label;
pub use crate::query::Database;
pub use crate::report::{Reporter, Severity, VecReporter};
pub use crate::zones::{ClassType, Record, RecordType};
