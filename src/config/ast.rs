//! The generic statement AST produced by the config grammar (C3), before
//! interpretation (C4) turns it into a tree of [`crate::config::model::Config`]
//! nodes.

use std::path::PathBuf;

/// One parsed `identifier arguments* ("{" ... "}")? ";"` statement.
///
/// `frame_path` is the file this statement was literally written in —
/// captured at parse time so that a `file "p";` directive deep inside a
/// spliced-in `include`d file still resolves `p` relative to the file that
/// actually contains it, not the top-level config.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub ident: String,
    pub args: Vec<String>,
    pub body: Vec<Statement>,
    pub frame_path: PathBuf,
}

impl Statement {
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }
}
