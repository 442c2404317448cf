//! Include machine (C2): a stack of `(path, extra)` frames shared between
//! the config grammar (`Extra = ()`) and the zone grammar
//! (`Extra = Option<Label>`, the origin in effect at the point of the
//! `$INCLUDE`), plus an in-memory cache of already-parsed ASTs keyed by
//! resolved path so that a file referenced twice is only parsed once.
//!
//! Recursive descent into an included file is the caller's job: this type
//! only owns the stack/cache/path-resolution bookkeeping. Threading a
//! closure that recurses through `&mut IncludeMachine` borrow-checks badly
//! in Rust, so each grammar's own parser module calls
//! `resolve`/`cached`/`push`/`pop`/`store` itself around its own recursive
//! parse call.

use crate::path;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct Frame<Extra> {
    pub path: PathBuf,
    pub extra: Extra,
}

pub struct IncludeMachine<Extra, Ast> {
    root: PathBuf,
    fake_root: PathBuf,
    stack: Vec<Frame<Extra>>,
    cache: HashMap<PathBuf, Ast>,
}

impl<Extra: Clone, Ast: Clone> IncludeMachine<Extra, Ast> {
    pub fn new(root: PathBuf, fake_root: PathBuf, base_path: PathBuf, base_extra: Extra) -> Self {
        IncludeMachine {
            root,
            fake_root,
            stack: vec![Frame {
                path: base_path,
                extra: base_extra,
            }],
            cache: HashMap::new(),
        }
    }

    pub fn peek(&self) -> &Frame<Extra> {
        self.stack.last().expect("include stack is never empty")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fake_root(&self) -> &Path {
        &self.fake_root
    }

    /// Resolve `p` (as written in the file at the current frame) to a real path.
    pub fn resolve(&self, p: &str) -> PathBuf {
        path::resolve(p, &self.peek().path, &self.root, &self.fake_root)
    }

    /// Returns the cached AST for `resolved`, if this exact file has already
    /// been parsed in this run (by absolute, resolved path).
    pub fn cached(&self, resolved: &Path) -> Option<Ast> {
        self.cache.get(resolved).cloned()
    }

    pub fn push(&mut self, path: PathBuf, extra: Extra) {
        self.stack.push(Frame { path, extra });
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn store(&mut self, resolved: PathBuf, ast: Ast) {
        self.cache.insert(resolved, ast);
    }

    /// Number of distinct files parsed so far. Exposed for tests asserting
    /// that a file included twice is only parsed once (§8, invariant 6).
    pub fn parsed_count(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cache_hit_avoids_reparse() {
        let mut m: IncludeMachine<(), Vec<String>> = IncludeMachine::new(
            PathBuf::from("/cfg"),
            PathBuf::from("/etc/bind"),
            PathBuf::from("/cfg/named.conf"),
            (),
        );

        let resolved = m.resolve("zones.conf");
        assert!(m.cached(&resolved).is_none());

        m.push(resolved.clone(), ());
        m.store(resolved.clone(), vec!["parsed".to_string()]);
        m.pop();

        assert_eq!(m.cached(&resolved), Some(vec!["parsed".to_string()]));
        assert_eq!(m.parsed_count(), 1);
    }

    #[test]
    fn test_push_pop_restores_frame() {
        let mut m: IncludeMachine<&'static str, ()> = IncludeMachine::new(
            PathBuf::from("/cfg"),
            PathBuf::from("/etc/bind"),
            PathBuf::from("/cfg/db.zone"),
            "example.com.",
        );

        assert_eq!(m.peek().extra, "example.com.");
        m.push(PathBuf::from("/cfg/sub.zone"), "sub.example.com.");
        assert_eq!(m.peek().extra, "sub.example.com.");
        m.pop();
        assert_eq!(m.peek().extra, "example.com.");
    }
}
