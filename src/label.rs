//! DNS owner names ("labels") and the handful of operations the rest of
//! the crate needs on them: normalisation to absolute form, origin
//! joining, and the index key used by the query engine.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A single component of a labelized key. `*` is mapped to [`Component::Any`]
/// so that it is a distinguishable sentinel rather than the literal string
/// `"*"`, which could otherwise collide with an oddly-named real label.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Component {
    Any,
    Literal(String),
}

/// A DNS owner name. Stored exactly as written; use [`Label::resolve`] to
/// get the absolute, fully-qualified form.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(s: impl Into<String>) -> Self {
        Label(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this label is already absolute (ends with a trailing dot).
    pub fn is_absolute(&self) -> bool {
        self.0.ends_with('.')
    }

    /// Resolve a (possibly relative) label against `origin`, per the
    /// `join_origin` operation: every occurrence of the literal `@`
    /// *anywhere* in the label is substituted with `origin` (§3: "The
    /// literal `@` inside `label` is replaced by `origin`", matching the
    /// original's `label.replace("@", origin)`); the result is then left
    /// alone if it is already absolute, otherwise `origin` is appended. A
    /// bare `.` is a separate shorthand, resolved to the zone apex up
    /// front — zone files use it as the owner when there is no previous
    /// owner to inherit from (it is never a real absolute name on its own;
    /// a real absolute name is always longer than the single root dot in
    /// any zone this crate parses), so it never reaches the `@`-substitution
    /// logic below.
    pub fn resolve(&self, origin: &Label) -> Label {
        if self.0 == "." {
            return origin.absolute();
        }

        let origin = origin.absolute();
        let label = if self.0.contains('@') {
            self.0.replace('@', origin.as_str())
        } else {
            self.0.clone()
        };

        if label.ends_with('.') {
            return Label(label);
        }

        if origin.as_str() == "." {
            Label(format!("{}.", label))
        } else {
            Label(format!("{}.{}", label, origin.0))
        }
    }

    /// Normalize to absolute form by appending a trailing `.` if missing.
    pub fn absolute(&self) -> Label {
        if self.is_absolute() {
            self.clone()
        } else {
            Label(format!("{}.", self.0))
        }
    }

    /// Split into labelized key components, lowercased, with the trailing
    /// dot stripped and `*` mapped to [`Component::Any`].
    ///
    /// Label comparisons in DNS are case-insensitive (RFC 1035 §2.3.3), so
    /// the index key always lowercases; the original case is preserved in
    /// `resolved_label` for display and for `Record` equality.
    pub fn key(&self) -> Vec<Component> {
        let trimmed = self.0.strip_suffix('.').unwrap_or(&self.0);
        if trimmed.is_empty() {
            return Vec::new();
        }
        trimmed
            .split('.')
            .map(|c| {
                if c == "*" {
                    Component::Any
                } else {
                    Component::Literal(c.to_ascii_lowercase())
                }
            })
            .collect()
    }

    /// True if this label contains a `*` component anywhere, i.e. it should
    /// be treated as a wildcard *query* rather than an index probe.
    pub fn is_wildcard_query(&self) -> bool {
        self.0.split('.').any(|c| c == "*")
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::new(s)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::new(s)
    }
}

/// Derive the `in-addr.arpa` reverse-lookup owner name for an IPv4 address.
pub fn reverse_ipv4(addr: &Ipv4Addr) -> Label {
    let o = addr.octets();
    Label::new(format!(
        "{}.{}.{}.{}.in-addr.arpa.",
        o[3], o[2], o[1], o[0]
    ))
}

/// Derive the `ip6.arpa` reverse-lookup owner name for an IPv6 address,
/// using RFC 3596 nibble form (one hex digit per label component, reversed).
pub fn reverse_ipv6(addr: &Ipv6Addr) -> Label {
    let mut nibbles = String::new();
    for byte in addr.octets().iter().rev() {
        nibbles.push_str(&format!("{:x}.{:x}.", byte & 0x0f, byte >> 4));
    }
    Label::new(format!("{}ip6.arpa.", nibbles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_absolute() {
        let origin = Label::new("example.com.");
        assert_eq!(
            Label::new("www.example.com.").resolve(&origin),
            Label::new("www.example.com.")
        );
    }

    #[test]
    fn test_resolve_relative() {
        let origin = Label::new("example.com");
        assert_eq!(
            Label::new("www").resolve(&origin),
            Label::new("www.example.com.")
        );
    }

    #[test]
    fn test_resolve_at() {
        let origin = Label::new("example.com");
        assert_eq!(Label::new("@").resolve(&origin), Label::new("example.com."));
    }

    #[test]
    fn test_resolve_bare_dot_is_the_origin() {
        let origin = Label::new("example.com.");
        assert_eq!(Label::new(".").resolve(&origin), Label::new("example.com."));
    }

    #[test]
    fn test_resolve_at_as_a_substring_not_just_the_whole_label() {
        let origin = Label::new("example.com.");
        assert_eq!(
            Label::new("ns.@").resolve(&origin),
            Label::new("ns.example.com.")
        );
    }

    #[test]
    fn test_resolve_replaces_every_at_occurrence() {
        // Mirrors the original's plain `label.replace("@", origin)`: `@` is
        // substituted wherever it appears, even mid-label, not just when
        // the whole label is exactly "@".
        let origin = Label::new("example.com.");
        assert_eq!(
            Label::new("mail@host").resolve(&origin),
            Label::new("mailexample.com.host.example.com.")
        );
    }

    #[test]
    fn test_key_lowercases_and_strips_dot() {
        assert_eq!(
            Label::new("WWW.Example.COM.").key(),
            vec![
                Component::Literal("www".into()),
                Component::Literal("example".into()),
                Component::Literal("com".into()),
            ]
        );
    }

    #[test]
    fn test_key_wildcard_component() {
        assert_eq!(
            Label::new("*.example.com.").key(),
            vec![
                Component::Any,
                Component::Literal("example".into()),
                Component::Literal("com".into()),
            ]
        );
    }

    #[test]
    fn test_reverse_ipv4() {
        let addr: Ipv4Addr = "10.0.0.1".parse().unwrap();
        assert_eq!(reverse_ipv4(&addr), Label::new("1.0.0.10.in-addr.arpa."));
    }

    #[test]
    fn test_reverse_ipv6() {
        let addr: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let got = reverse_ipv6(&addr);
        assert!(got.as_str().ends_with("ip6.arpa."));
        assert!(got.as_str().starts_with("1.0.0.0."));
    }
}
