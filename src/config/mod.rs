//! named.conf-style configuration: grammar (C3), include expansion (C2),
//! and interpretation into a [`model::Config`] tree (C4).

pub mod ast;
pub mod interpreter;
pub mod model;
pub mod parser;

pub use interpreter::interpret;
pub use model::{Config, Options, ZoneDescriptor};

use crate::error::Result;
use std::path::Path;

/// Parse and interpret a top-level config file in one call: expands every
/// `include` inline, then walks the result into a [`Config`] tree.
pub fn load(root_path: &Path, fake_root: &Path) -> Result<Config> {
    let (statements, machine) = parser::parse(root_path, fake_root)?;
    let root_dir = machine.root().to_path_buf();
    Ok(interpret(&statements, &root_dir, fake_root))
}
