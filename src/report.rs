//! Diagnostics for traversal-time failures.
//!
//! Every non-fatal error becomes a single line on stderr prefixed with the
//! program name. The prefix is an explicit value owned by the reporter and
//! threaded by reference; there is no process-global name.

use std::fmt::Display;
use std::path::Path;

/// Writes one-line diagnostics to stderr.
#[derive(Debug, Clone)]
pub struct Reporter {
    prog: String,
}

impl Reporter {
    pub fn new(prog: impl Into<String>) -> Self {
        Self { prog: prog.into() }
    }

    pub fn prog(&self) -> &str {
        &self.prog
    }

    /// Report a failure tied to a specific path.
    pub fn path_error(&self, what: &str, path: &Path, cause: impl Display) {
        eprintln!("{}: {} '{}': {}", self.prog, what, path.display(), cause);
    }

    /// Report a failure not tied to a path, such as an output-write error.
    pub fn error(&self, message: impl Display) {
        eprintln!("{}: {}", self.prog, message);
    }
}
