//! Validation-suite contract, diagnostic half (C11): the `Reporter` sink a
//! suite writes its findings to, and a reference `VecReporter`
//! implementation. Suites themselves are out of scope (§1) — this crate
//! only defines what they report through.

use std::fmt;

/// Diagnostic severity levels a suite reports at (§6).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// One recorded diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

/// What a validation suite (out of scope, §1) receives to surface its
/// findings: `error`/`warning`/`info` plus a terminal `print_all` (§6).
/// The severity-specific methods are conveniences over [`Reporter::report`]
/// so a suite author never has to spell out `Severity::Error` by hand.
pub trait Reporter {
    fn report(&mut self, severity: Severity, message: String);
    fn print_all(&self);

    fn error(&mut self, message: impl Into<String>) {
        self.report(Severity::Error, message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.report(Severity::Warning, message.into());
    }

    fn info(&mut self, message: impl Into<String>) {
        self.report(Severity::Info, message.into());
    }
}

/// Reference [`Reporter`]: accumulates every message in report order.
/// `ok()` is the truthy/falsy outcome a suite runner (out of scope, §1)
/// would fold across suites — "no `error`-severity message was recorded".
#[derive(Default, Debug)]
pub struct VecReporter {
    messages: Vec<Message>,
}

impl VecReporter {
    pub fn new() -> Self {
        VecReporter::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn ok(&self) -> bool {
        !self.messages.iter().any(|m| m.severity == Severity::Error)
    }
}

impl Reporter for VecReporter {
    fn report(&mut self, severity: Severity, text: String) {
        self.messages.push(Message { severity, text });
    }

    fn print_all(&self) {
        for m in &self.messages {
            println!("{}: {}", m.severity, m.text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ok_when_no_errors() {
        let mut r = VecReporter::new();
        r.warning("harmless");
        r.info("fyi");
        assert!(r.ok());
    }

    #[test]
    fn test_not_ok_after_an_error() {
        let mut r = VecReporter::new();
        r.error("bar.example.com. has no A record");
        assert!(!r.ok());
    }

    #[test]
    fn test_messages_preserve_report_order() {
        let mut r = VecReporter::new();
        r.info("first");
        r.error("second");
        r.warning("third");

        let texts: Vec<&str> = r.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }
}
