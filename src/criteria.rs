//! Criteria parsing: the ordered list of tests and actions for a run.
//!
//! The command line hands over a raw token list; this module turns it into a
//! validated `Vec<Criterion>` before any traversal starts. Everything that can
//! be rejected up front (unknown words, missing values, bad type codes,
//! malformed globs, unresolvable user names) is rejected here.

use glob::Pattern;
use thiserror::Error;

use crate::entry::FileKind;
use crate::principal::PrincipalResolver;

/// One configured test or action.
///
/// The parsed list is immutable for the whole run and evaluated per entry as
/// a single left-to-right scan (see [`crate::eval`]).
#[derive(Debug, Clone)]
pub enum Criterion {
    /// `-user`: entry owner equals this uid. Resolved before traversal.
    User(u32),
    /// `-name`: glob over the final path component.
    Name(Pattern),
    /// `-path`: glob over the full path, wildcards stopping at `/`.
    Path(Pattern),
    /// `-type`: classification equals this kind.
    Type(FileKind),
    /// `-nouser`: entry owner has no resolvable name.
    NoUser,
    /// `-print`: write the path to stdout.
    Print,
    /// `-ls`: write a detailed listing record to stdout.
    Ls,
}

/// Errors detected before traversal begins. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown criterion: {0}")]
    UnknownCriterion(String),

    #[error("option {0} needs an argument")]
    MissingValue(&'static str),

    #[error("option -type needs an argument of [bcdpfls], got '{0}'")]
    BadTypeCode(String),

    #[error("invalid pattern '{pattern}': {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("user not found: {0}")]
    UnknownUser(String),
}

/// Parse the raw criteria tokens into an ordered criteria list.
pub fn parse_criteria(
    args: &[String],
    resolver: &dyn PrincipalResolver,
) -> Result<Vec<Criterion>, ConfigError> {
    let mut criteria = Vec::with_capacity(args.len());
    let mut tokens = args.iter();

    while let Some(token) = tokens.next() {
        let criterion = match token.as_str() {
            "-user" => {
                let value = tokens.next().ok_or(ConfigError::MissingValue("-user"))?;
                Criterion::User(resolve_user(value, resolver)?)
            }
            "-name" => {
                let value = tokens.next().ok_or(ConfigError::MissingValue("-name"))?;
                Criterion::Name(compile_pattern(value)?)
            }
            "-path" => {
                let value = tokens.next().ok_or(ConfigError::MissingValue("-path"))?;
                Criterion::Path(compile_pattern(value)?)
            }
            "-type" => {
                let value = tokens.next().ok_or(ConfigError::MissingValue("-type"))?;
                Criterion::Type(parse_type_code(value)?)
            }
            "-nouser" => Criterion::NoUser,
            "-print" => Criterion::Print,
            "-ls" => Criterion::Ls,
            other => return Err(ConfigError::UnknownCriterion(other.to_string())),
        };
        criteria.push(criterion);
    }

    Ok(criteria)
}

/// Resolve a `-user` value to a uid.
///
/// Purely numeric values always compare as numeric uids, so `-user 0` means
/// uid 0 even on a system with a principal literally named "0". Anything else
/// must resolve through the principal database or the run is rejected.
fn resolve_user(value: &str, resolver: &dyn PrincipalResolver) -> Result<u32, ConfigError> {
    if is_numeric(value) {
        return value
            .parse()
            .map_err(|_| ConfigError::UnknownUser(value.to_string()));
    }
    resolver
        .uid_for_name(value)
        .ok_or_else(|| ConfigError::UnknownUser(value.to_string()))
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn compile_pattern(value: &str) -> Result<Pattern, ConfigError> {
    Pattern::new(value).map_err(|source| ConfigError::BadPattern {
        pattern: value.to_string(),
        source,
    })
}

fn parse_type_code(value: &str) -> Result<FileKind, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => {
            FileKind::from_code(code).ok_or_else(|| ConfigError::BadTypeCode(value.to_string()))
        }
        _ => Err(ConfigError::BadTypeCode(value.to_string())),
    }
}
