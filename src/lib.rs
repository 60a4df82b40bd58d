//! ferret - walk a directory tree and act on entries matching ordered criteria

pub mod criteria;
pub mod entry;
pub mod eval;
pub mod listing;
pub mod principal;
pub mod report;
#[cfg(feature = "test-utils")]
pub mod test_utils;
pub mod walk;

pub use criteria::{ConfigError, Criterion, parse_criteria};
pub use entry::{Entry, FileKind};
pub use principal::{PrincipalResolver, SystemResolver};
pub use report::Reporter;
pub use walk::{WalkError, Walker};
