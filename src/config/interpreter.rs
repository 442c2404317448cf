//! Config interpreter (C4): walks the (include-expanded) statement AST and
//! builds the [`Config`] tree described in §3/§4.3.

use crate::config::ast::Statement;
use crate::config::model::{Config, ZoneDescriptor};
use crate::path;
use log::warn;
use std::path::Path;

/// Interpret a flat, include-expanded statement list into a root [`Config`]
/// (with any `view` statements becoming children). Unknown top-level keys
/// and unknown option keys are logged and dropped; this function never
/// fails — the config grammar (C3) is where fatal errors live.
pub fn interpret(statements: &[Statement], root_dir: &Path, fake_root: &Path) -> Config {
    let mut root = Config::root();
    populate(&mut root, statements, root_dir, fake_root);
    root
}

fn populate(node: &mut Config, statements: &[Statement], root_dir: &Path, fake_root: &Path) {
    for stmt in statements {
        match stmt.ident.to_ascii_lowercase().as_str() {
            "options" => apply_options(node, &stmt.body),
            "acl" => apply_acl(node, stmt),
            "zone" => apply_zone(node, stmt, root_dir, fake_root),
            "view" => apply_view(node, stmt, root_dir, fake_root),
            "logging" => { /* recognized, intentionally ignored */ }
            other => warn!("unknown top-level directive {:?}, ignoring", other),
        }
    }
}

fn list_value(stmt: &Statement) -> Vec<String> {
    if !stmt.body.is_empty() {
        stmt.body.iter().map(|s| s.ident.clone()).collect()
    } else {
        stmt.args.clone()
    }
}

fn apply_options(node: &mut Config, body: &[Statement]) {
    for stmt in body {
        match stmt.ident.to_ascii_lowercase().as_str() {
            "directory" => node.options.directory = stmt.arg(0).map(str::to_string),
            "statistics-file" => node.options.statistics_file = stmt.arg(0).map(str::to_string),
            "auth-nxdomain" => {
                node.options.auth_nxdomain = match stmt.arg(0).map(str::to_ascii_lowercase) {
                    Some(v) if v == "yes" || v == "true" => Some(true),
                    Some(v) if v == "no" || v == "false" => Some(false),
                    other => {
                        warn!("unrecognized auth-nxdomain value {:?}, ignoring", other);
                        None
                    }
                }
            }
            "also-notify" => node.options.also_notify = list_value(stmt),
            "listen-on-v6" => node.options.listen_on_v6 = list_value(stmt),
            "allow-recursion" => node.options.allow_recursion = list_value(stmt),
            "allow-transfer" => node.options.allow_transfer = list_value(stmt),
            other => warn!("unknown option key {:?}, ignoring", other),
        }
    }
}

fn apply_acl(node: &mut Config, stmt: &Statement) {
    let name = match stmt.arg(0) {
        Some(n) => n.to_string(),
        None => {
            warn!("acl statement without a name, ignoring");
            return;
        }
    };
    node.acl.insert(name, list_value(stmt));
}

fn apply_zone(node: &mut Config, stmt: &Statement, root_dir: &Path, fake_root: &Path) {
    let origin = match stmt.arg(0) {
        Some(o) => o.to_string(),
        None => {
            warn!("zone statement without an origin, ignoring");
            return;
        }
    };

    let mut file = None;
    let mut allow_update = Vec::new();

    for inner in &stmt.body {
        match inner.ident.to_ascii_lowercase().as_str() {
            "file" => {
                if let Some(p) = inner.arg(0) {
                    file = Some(path::resolve(p, &inner.frame_path, root_dir, fake_root));
                }
            }
            "allow-update" => allow_update = list_value(inner),
            _ => { /* other zone sub-directives are parsed but not modeled */ }
        }
    }

    let file = match file {
        Some(f) => f,
        None => {
            warn!("zone {:?} has no file directive, ignoring", origin);
            return;
        }
    };

    node.zones.insert(
        origin.clone(),
        ZoneDescriptor {
            origin,
            file,
            allow_update,
        },
    );
}

fn apply_view(node: &mut Config, stmt: &Statement, root_dir: &Path, fake_root: &Path) {
    let name = match stmt.arg(0) {
        Some(n) => n.to_string(),
        None => {
            warn!("view statement without a name, ignoring");
            return;
        }
    };

    let mut view = Config {
        name: Some(name.clone()),
        ..Config::default()
    };

    for inner in &stmt.body {
        if inner.ident.eq_ignore_ascii_case("match-clients") {
            view.match_clients = list_value(inner);
        }
    }

    populate(&mut view, &stmt.body, root_dir, fake_root);
    node.views.insert(name, view);
}
