//! Path resolver (C1): translates an include path as written in a config
//! or zone file into a real filesystem path, given the directory the
//! top-level file lives in (`root`) and the directory operator configs
//! treat as their own filesystem root (`fake_root`).

use log::debug;
use std::path::{Path, PathBuf};

/// Resolve `p`, referenced from the file at `last`, to a real path.
///
/// 1. If `p` is absolute, it is rewritten as if `fake_root` were the real
///    root: `root.join(p.strip_prefix(fake_root))`.
/// 2. Else if `root.join(p)` exists as a regular file, that wins (operators
///    often write paths relative to the server's configured `directory`,
///    which commonly coincides with `root`).
/// 3. Else, `p` is resolved relative to the directory containing `last`.
pub fn resolve(p: &str, last: &Path, root: &Path, fake_root: &Path) -> PathBuf {
    let candidate = Path::new(p);

    if candidate.is_absolute() {
        let relative = candidate.strip_prefix(fake_root).unwrap_or_else(|_| {
            debug!(
                "absolute path {:?} is not under fake_root {:?}; stripping leading separator instead",
                candidate, fake_root
            );
            candidate.strip_prefix("/").unwrap_or(candidate)
        });
        return root.join(relative);
    }

    let under_root = root.join(candidate);
    if under_root.is_file() {
        return under_root;
    }

    let dir = last.parent().unwrap_or_else(|| Path::new(""));
    dir.join(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_absolute_remapped_via_fake_root() {
        let root = Path::new("/cfg");
        let fake_root = Path::new("/etc/bind");
        let last = Path::new("/cfg/named.conf");

        let got = resolve("/etc/bind/zones.conf", last, root, fake_root);
        assert_eq!(got, PathBuf::from("/cfg/zones.conf"));
    }

    #[test]
    fn test_relative_under_root_wins_when_file_exists() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("db.example"), "").unwrap();

        let last = root.join("subdir/named.conf");
        let got = resolve("db.example", &last, root, Path::new("/etc/bind"));
        assert_eq!(got, root.join("db.example"));
    }

    #[test]
    fn test_relative_falls_back_to_including_file_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let last = root.join("zones/sub.conf");

        // db.example does not exist under root, so resolution falls back
        // to the directory containing the including file.
        let got = resolve("db.example", &last, root, Path::new("/etc/bind"));
        assert_eq!(got, root.join("zones/db.example"));
    }

    #[test]
    fn test_absolute_not_under_fake_root_strips_leading_slash() {
        let root = Path::new("/cfg");
        let fake_root = Path::new("/etc/bind");
        let last = Path::new("/cfg/named.conf");

        let got = resolve("/var/named/db.example", last, root, fake_root);
        assert_eq!(got, PathBuf::from("/cfg/var/named/db.example"));
    }
}
