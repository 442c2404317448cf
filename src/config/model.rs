//! The tree of [`Config`] nodes produced by interpreting the statement AST
//! (C4): one root node plus zero or more `view` children, each carrying
//! its own options/ACLs/zones.

use std::collections::HashMap;
use std::path::PathBuf;

/// The fixed set of options this crate recognizes. Every other `options { }`
/// key is logged as `UnknownDirective` and dropped (§4.3).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options {
    pub directory: Option<String>,
    pub also_notify: Vec<String>,
    pub auth_nxdomain: Option<bool>,
    pub listen_on_v6: Vec<String>,
    pub allow_recursion: Vec<String>,
    pub allow_transfer: Vec<String>,
    pub statistics_file: Option<String>,
}

/// A zone descriptor: `zone "origin" { file "p"; allow-update { ...; }; };`.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneDescriptor {
    pub origin: String,
    /// Resolved (via C1) at the moment the `file` directive was encountered.
    pub file: PathBuf,
    pub allow_update: Vec<String>,
}

/// A node in the config tree: either the root, or a `view`. Views are owned
/// by their parent; this is modeled as a plain tree (`Config` holds its
/// `views` by value) rather than back-references, since nothing needs to
/// walk upward.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// `None` for the root config; `Some(name)` for a view.
    pub name: Option<String>,
    pub match_clients: Vec<String>,

    pub options: Options,
    pub acl: HashMap<String, Vec<String>>,
    pub zones: HashMap<String, ZoneDescriptor>,
    pub views: HashMap<String, Config>,
}

impl Config {
    pub fn root() -> Self {
        Config::default()
    }

    /// The root config is the one with no view name; it always passes a
    /// view filter (§4.7, rule 2: "the root config always passes the view
    /// filter (it represents 'no view')").
    pub fn is_root(&self) -> bool {
        self.name.is_none()
    }

    /// Every zone in this tree, paired with the config node that owns it
    /// (itself, or one of its views, recursively). This is the
    /// "(Config, Zone) pairs" the interpreter is said to emit.
    pub fn zone_pairs(&self) -> Vec<(&Config, &ZoneDescriptor)> {
        let mut out: Vec<(&Config, &ZoneDescriptor)> =
            self.zones.values().map(|z| (self, z)).collect();
        for view in self.views.values() {
            out.extend(view.zone_pairs());
        }
        out
    }
}
