//! Detailed listing records for the `-ls` action.
//!
//! One fixed-column record per entry, following the classic `find -ls`
//! convention: inode, block count in 1024-byte units, type and permissions,
//! link count, owner, group, size, modification time, path, and the link
//! target for symbolic links.

use std::fs;
use std::io::{self, Write};

use chrono::{Local, TimeZone};

use crate::entry::{Entry, FileKind};
use crate::principal::PrincipalResolver;
use crate::report::Reporter;

/// Marker appended in place of a link target that could not be read.
const UNREADABLE_LINK: &str = "ERROR READING LINK";

/// Write one listing record for `entry`, newline included.
///
/// The symlink target is read here, lazily; only the listing action ever
/// needs it. An unreadable target gets an inline marker plus a diagnostic;
/// it does not fail the record.
pub fn write_record<W: Write>(
    out: &mut W,
    entry: &Entry,
    resolver: &dyn PrincipalResolver,
    reporter: &Reporter,
) -> io::Result<()> {
    let owner = resolver
        .user_name(entry.uid)
        .unwrap_or_else(|| entry.uid.to_string());
    let group = resolver
        .group_name(entry.gid)
        .unwrap_or_else(|| entry.gid.to_string());

    write!(
        out,
        "{:>6} {:>4} {}{} {:>3} {:<8} {:<8} {:>8} {} {}",
        entry.ino,
        entry.blocks / 2,
        entry.kind.ls_letter(),
        permission_string(entry.mode),
        entry.nlink,
        owner,
        group,
        entry.size,
        format_mtime(entry.mtime),
        entry.path.display(),
    )?;

    if entry.kind == FileKind::Symlink {
        match fs::read_link(&entry.path) {
            Ok(target) => write!(out, " -> {}", target.display())?,
            Err(err) => {
                write!(out, " -> {UNREADABLE_LINK}")?;
                reporter.path_error("cannot read link", &entry.path, &err);
            }
        }
    }

    writeln!(out)
}

/// Render the nine permission characters for `mode`.
///
/// Setuid, setgid, and sticky overlay the execute position of their triplet:
/// lowercase when the execute bit is also set, uppercase when it is not.
fn permission_string(mode: u32) -> String {
    let mut perms = String::with_capacity(9);

    perms.push(if mode & 0o400 != 0 { 'r' } else { '-' });
    perms.push(if mode & 0o200 != 0 { 'w' } else { '-' });
    perms.push(execute_char(mode & 0o100 != 0, mode & 0o4000 != 0, 's', 'S'));

    perms.push(if mode & 0o040 != 0 { 'r' } else { '-' });
    perms.push(if mode & 0o020 != 0 { 'w' } else { '-' });
    perms.push(execute_char(mode & 0o010 != 0, mode & 0o2000 != 0, 's', 'S'));

    perms.push(if mode & 0o004 != 0 { 'r' } else { '-' });
    perms.push(if mode & 0o002 != 0 { 'w' } else { '-' });
    perms.push(execute_char(mode & 0o001 != 0, mode & 0o1000 != 0, 't', 'T'));

    perms
}

fn execute_char(execute: bool, overlay: bool, set: char, unset: char) -> char {
    match (overlay, execute) {
        (true, true) => set,
        (true, false) => unset,
        (false, true) => 'x',
        (false, false) => '-',
    }
}

/// Fixed-width modification timestamp: abbreviated month, space-padded day,
/// hour and minute in local time.
fn format_mtime(secs: i64) -> String {
    Local
        .timestamp_opt(secs, 0)
        .earliest()
        .map(|t| t.format("%b %e %H:%M").to_string())
        .unwrap_or_else(|| String::from("??? ?? ??:??"))
}
