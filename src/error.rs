//! A single error type for the whole crate: one `thiserror`-derived enum
//! carrying enough context to print an actionable message, rather than a
//! bundle of ad-hoc `io::Error`/`String` return types.
//!
//! `UnknownDirective`, `CacheBroken` and `SuiteFailure` are never
//! constructed as a returned `Err` — the situations they name are handled
//! by logging a warning and continuing (`log::warn!` at the discovery
//! site) or, for `SuiteFailure`, by a validation suite reporting through
//! [`crate::report::Reporter`] and returning a bare `bool`. They keep
//! named variants here anyway so a caller matching on `Error` has a
//! stable discriminant for each diagnostic kind, not just a string.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not resolve include {path} (from {including})")]
    IncludeNotFound {
        path: String,
        including: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("{path}:{line}: unknown record type {type_name}")]
    UnknownRecordType {
        path: PathBuf,
        line: usize,
        type_name: String,
    },

    #[error("{path}:{line}: invalid rdata for {type_name}: {message}")]
    InvalidRdata {
        path: PathBuf,
        line: usize,
        type_name: String,
        message: String,
    },

    #[error("{path}:{line}: invalid address {text:?}: {message}")]
    InvalidAddress {
        path: PathBuf,
        line: usize,
        text: String,
        message: String,
    },

    #[error("{path}:{line}: record has no owner and no previous owner to inherit")]
    InheritedOwnerMissing { path: PathBuf, line: usize },

    #[error("{path}:{line}: unknown directive {directive:?}, ignoring")]
    UnknownDirective {
        path: PathBuf,
        line: usize,
        directive: String,
    },

    #[error("parser cache entry for {path} is unreadable or corrupt: {message}")]
    CacheBroken { path: PathBuf, message: String },

    #[error("suite {name:?} failed")]
    SuiteFailure { name: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ConfigGrammar(#[from] pest_consume::Error<crate::config::parser::Rule>),
}

pub type Result<T> = std::result::Result<T, Error>;
