//! Traversal engine: pre-order, depth-first descent from a single root.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::criteria::Criterion;
use crate::entry::Entry;
use crate::eval::{self, Action};
use crate::listing;
use crate::principal::PrincipalResolver;
use crate::report::Reporter;

/// Fatal traversal failures. Everything below the root is reported to stderr
/// and skipped instead.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("cannot stat '{}': {source}", .path.display())]
    RootStat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The read-only context for one run: the criteria list plus collaborators.
///
/// Owned here, borrowed down the recursion. No state is shared between
/// sibling or parent/child frames beyond these borrows; each frame owns its
/// own child path buffer.
pub struct Walker<'a> {
    criteria: &'a [Criterion],
    resolver: &'a dyn PrincipalResolver,
    reporter: &'a Reporter,
}

impl<'a> Walker<'a> {
    pub fn new(
        criteria: &'a [Criterion],
        resolver: &'a dyn PrincipalResolver,
        reporter: &'a Reporter,
    ) -> Self {
        Self {
            criteria,
            resolver,
            reporter,
        }
    }

    /// Walk the tree rooted at `root`, writing action output to `out`.
    ///
    /// The root is statted once and pipelined first, its own entry included,
    /// not just its children. Only a failed stat of the root itself is fatal; every
    /// failure underneath is reported and the affected branch skipped.
    pub fn run<W: Write>(&self, root: &Path, out: &mut W) -> Result<(), WalkError> {
        let entry = Entry::from_path(root).map_err(|source| WalkError::RootStat {
            path: root.to_path_buf(),
            source,
        })?;

        let descend = entry.is_dir();
        self.process(&entry, out);
        if descend {
            self.walk_dir(root, out);
        }
        Ok(())
    }

    /// List `dir` and run the pipeline on every child, recursing into child
    /// directories. Siblings come in whatever order the directory stream
    /// yields them; that order is platform dependent and deliberately left
    /// unsorted.
    fn walk_dir<W: Write>(&self, dir: &Path, out: &mut W) {
        // The stream closes when `entries` drops, on every path out of here.
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                self.reporter.path_error("cannot open directory", dir, &err);
                return;
            }
        };

        for dirent in entries {
            // `read_dir` never yields `.` or `..`.
            let dirent = match dirent {
                Ok(dirent) => dirent,
                Err(err) => {
                    self.reporter.path_error("error reading directory", dir, &err);
                    continue;
                }
            };

            // The child may have vanished between listing and stat; that
            // costs one diagnostic, not the traversal.
            let child = dir.join(dirent.file_name());
            let entry = match Entry::from_path(&child) {
                Ok(entry) => entry,
                Err(err) => {
                    self.reporter.path_error("cannot stat", &child, &err);
                    continue;
                }
            };

            self.process(&entry, out);
            if entry.is_dir() {
                self.walk_dir(&entry.path, out);
            }
        }
    }

    /// Run the criteria scan for one entry and execute whatever actions
    /// fired. Output failures are reported, never fatal.
    fn process<W: Write>(&self, entry: &Entry, out: &mut W) {
        for action in eval::scan(entry, self.criteria, self.resolver) {
            let result = match action {
                Action::Print => writeln!(out, "{}", entry.path.display()),
                Action::Ls => listing::write_record(out, entry, self.resolver, self.reporter),
            };
            if let Err(err) = result {
                self.reporter
                    .error(format_args!("error writing output: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::parse_criteria;
    use crate::principal::testing::FakeResolver;
    use std::fs::File;
    use tempfile::TempDir;

    fn walk_lines(root: &Path, tokens: &[&str], resolver: &FakeResolver) -> Vec<String> {
        let args: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        let criteria = parse_criteria(&args, resolver).unwrap();
        let reporter = Reporter::new("ferret");
        let walker = Walker::new(&criteria, resolver, &reporter);

        let mut out = Vec::new();
        walker.run(root, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("b.txt")).unwrap();
        dir
    }

    #[test]
    fn test_empty_criteria_visit_every_entry_once_in_pre_order() {
        let dir = sample_tree();
        let root = dir.path().to_string_lossy().into_owned();
        let resolver = FakeResolver::new();

        let lines = walk_lines(dir.path(), &[], &resolver);

        let mut expected: Vec<String> = vec![
            root.clone(),
            format!("{root}/a.txt"),
            format!("{root}/sub"),
            format!("{root}/sub/b.txt"),
        ];
        let mut got = lines.clone();
        expected.sort();
        got.sort();
        assert_eq!(got, expected, "all four paths, each exactly once");

        // Pre-order: the root leads, and every directory precedes its
        // children. Sibling order is platform defined.
        assert_eq!(lines[0], root);
        let sub = lines.iter().position(|l| *l == format!("{root}/sub"));
        let b = lines.iter().position(|l| *l == format!("{root}/sub/b.txt"));
        assert!(sub.unwrap() < b.unwrap());
    }

    #[test]
    fn test_type_d_prints_only_directories() {
        let dir = sample_tree();
        let root = dir.path().to_string_lossy().into_owned();
        let resolver = FakeResolver::new();

        let mut lines = walk_lines(dir.path(), &["-type", "d"], &resolver);
        lines.sort();
        assert_eq!(lines, vec![root.clone(), format!("{root}/sub")]);
    }

    #[test]
    fn test_name_glob_selects_matching_leaves() {
        let dir = sample_tree();
        let root = dir.path().to_string_lossy().into_owned();
        let resolver = FakeResolver::new();

        let mut lines = walk_lines(dir.path(), &["-name", "*.txt"], &resolver);
        lines.sort();
        assert_eq!(
            lines,
            vec![format!("{root}/a.txt"), format!("{root}/sub/b.txt")]
        );
    }

    #[test]
    fn test_path_glob_anchored_at_root() {
        let dir = sample_tree();
        let root = dir.path().to_string_lossy().into_owned();
        let resolver = FakeResolver::new();

        let pattern = format!("{root}/*/b.txt");
        let lines = walk_lines(dir.path(), &["-path", &pattern], &resolver);
        assert_eq!(lines, vec![format!("{root}/sub/b.txt")]);
    }

    #[test]
    fn test_file_root_is_pipelined_without_recursion() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("only.txt");
        File::create(&file).unwrap();
        let resolver = FakeResolver::new();

        let lines = walk_lines(&file, &[], &resolver);
        assert_eq!(lines, vec![file.to_string_lossy().into_owned()]);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let resolver = FakeResolver::new();
        let reporter = Reporter::new("ferret");
        let walker = Walker::new(&[], &resolver, &reporter);

        let mut out = Vec::new();
        let err = walker.run(&dir.path().join("gone"), &mut out).unwrap_err();
        assert!(matches!(err, WalkError::RootStat { .. }));
        assert!(out.is_empty(), "no output before the fatal root error");
    }

    #[test]
    fn test_print_before_failing_test_fires_for_every_entry() {
        let dir = sample_tree();
        let resolver = FakeResolver::new();

        // -print runs before -type d can fail, so all four entries print
        // exactly once; files get no second line from the implicit default.
        let lines = walk_lines(dir.path(), &["-print", "-type", "d"], &resolver);
        assert_eq!(lines.len(), 4);

        let filtered = walk_lines(dir.path(), &["-type", "d", "-print"], &resolver);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_deep_nesting_visits_all_levels() {
        let dir = TempDir::new().unwrap();
        let mut path = dir.path().to_path_buf();
        for depth in 0..10 {
            path.push(format!("d{depth}"));
        }
        fs::create_dir_all(&path).unwrap();
        File::create(path.join("leaf.txt")).unwrap();
        let resolver = FakeResolver::new();

        let lines = walk_lines(dir.path(), &["-name", "leaf.txt"], &resolver);
        assert_eq!(lines, vec![path.join("leaf.txt").to_string_lossy().into_owned()]);
    }
}
