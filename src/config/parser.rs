//! Config grammar (C3) and include expansion.
//!
//! Parsing itself is handled by `pest`/`pest_consume` against
//! `grammar.pest`, following the same `#[pest_consume::parser]` /
//! `match_nodes!` style as the zone grammar. `include "path";` splicing is
//! layered on top in [`parse`], since it needs to recurse through the
//! [`IncludeMachine`] and the filesystem, which the grammar itself
//! shouldn't know about.

use crate::config::ast::Statement;
use crate::error::{Error, Result};
use crate::include::IncludeMachine;
use pest_consume::match_nodes;
use pest_consume::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[grammar = "config/grammar.pest"]
pub struct ConfigParser;

type Node<'i> = pest_consume::Node<'i, Rule, PathBuf>;
type PResult<T> = std::result::Result<T, pest_consume::Error<Rule>>;

#[pest_consume::parser]
impl ConfigParser {
    fn EOI(_input: Node) -> PResult<()> {
        Ok(())
    }

    fn ident(input: Node) -> PResult<String> {
        Ok(input.as_str().to_string())
    }

    fn inner_string(input: Node) -> PResult<String> {
        Ok(unescape(input.as_str()))
    }

    fn string(input: Node) -> PResult<String> {
        match_nodes!(input.into_children();
            [inner_string(s)] => Ok(s),
        )
    }

    fn block(input: Node) -> PResult<Vec<Statement>> {
        match_nodes!(input.into_children();
            [statement(stmts)..] => Ok(stmts.collect()),
        )
    }

    fn statement(input: Node) -> PResult<Statement> {
        let path = input.user_data().clone();
        let mut ident = None;
        let mut args = Vec::new();
        let mut body = Vec::new();

        for child in input.into_children() {
            match child.as_rule() {
                Rule::ident if ident.is_none() => ident = Some(Self::ident(child)?),
                Rule::ident => args.push(Self::ident(child)?),
                Rule::string => args.push(Self::string(child)?),
                Rule::block => body = Self::block(child)?,
                Rule::EOI => {}
                r => unreachable!("unexpected statement child: {:?}", r),
            }
        }

        Ok(Statement {
            ident: ident.expect("statement always has a leading identifier"),
            args,
            body,
            frame_path: path,
        })
    }

    fn file(input: Node) -> PResult<Vec<Statement>> {
        match_nodes!(input.into_children();
            [statement(stmts).., EOI(_)] => Ok(stmts.collect()),
        )
    }
}

/// Reverses the effect of pest's `@` atomic string capture: turns `\x`
/// into a literal `x`.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

type Ast = Vec<Statement>;
type Machine = IncludeMachine<(), Ast>;

/// Parse the top-level config file at `root_path`, fully expanding every
/// `include` directive (at any nesting depth) inline, and return the
/// flattened statement list plus the include machine (callers need the
/// machine's `root`/`fake_root` semantics again when resolving `zone` file
/// directives in C4).
pub fn parse(root_path: &Path, fake_root: &Path) -> Result<(Ast, Machine)> {
    let root_dir = root_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut machine: Machine = IncludeMachine::new(
        root_dir,
        fake_root.to_path_buf(),
        root_path.to_path_buf(),
        (),
    );

    let statements = parse_and_expand(&mut machine, root_path)?;
    Ok((statements, machine))
}

fn parse_and_expand(machine: &mut Machine, path: &Path) -> Result<Ast> {
    let text = fs::read_to_string(path).map_err(|source| Error::IncludeNotFound {
        path: path.display().to_string(),
        including: machine.peek().path.clone(),
        source,
    })?;

    let raw = parse_text(&text, path)?;
    expand_includes(raw, machine)
}

fn parse_text(text: &str, path: &Path) -> Result<Ast> {
    let mut nodes = ConfigParser::parse_with_userdata(Rule::file, text, path.to_path_buf())
        .map_err(Error::ConfigGrammar)?;
    let file = nodes
        .next()
        .expect("the file rule always produces exactly one top-level node");
    ConfigParser::file(file).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn expand_includes(statements: Ast, machine: &mut Machine) -> Result<Ast> {
    let mut out = Vec::with_capacity(statements.len());

    for mut stmt in statements {
        stmt.body = expand_includes(stmt.body, machine)?;

        if stmt.ident.eq_ignore_ascii_case("include") {
            let arg = stmt.args.first().cloned().ok_or_else(|| Error::Parse {
                path: stmt.frame_path.clone(),
                message: "include directive requires one path argument".to_string(),
            })?;

            let resolved = machine.resolve(&arg);
            let included = match machine.cached(&resolved) {
                Some(cached) => cached,
                None => {
                    machine.push(resolved.clone(), ());
                    let parsed = parse_and_expand(machine, &resolved);
                    machine.pop();
                    let parsed = parsed?;
                    machine.store(resolved.clone(), parsed.clone());
                    parsed
                }
            };

            out.extend(included);
        } else {
            out.push(stmt);
        }
    }

    Ok(out)
}
