//! Entry metadata snapshots and file-type classification.

use std::fs;
use std::io;
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::{Path, PathBuf};

/// Classification of a filesystem entry, taken from a non-following stat.
///
/// A symbolic link classifies as `Symlink`: the link itself, not its target,
/// is the subject of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    BlockDevice,
    CharDevice,
    Directory,
    Fifo,
    Regular,
    Symlink,
    Socket,
    Unknown,
}

impl FileKind {
    /// Classify a stat-derived file type.
    pub fn from_file_type(ft: fs::FileType) -> Self {
        if ft.is_dir() {
            FileKind::Directory
        } else if ft.is_symlink() {
            FileKind::Symlink
        } else if ft.is_file() {
            FileKind::Regular
        } else if ft.is_block_device() {
            FileKind::BlockDevice
        } else if ft.is_char_device() {
            FileKind::CharDevice
        } else if ft.is_fifo() {
            FileKind::Fifo
        } else if ft.is_socket() {
            FileKind::Socket
        } else {
            FileKind::Unknown
        }
    }

    /// Parse a `-type` code letter. `Unknown` has no code.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'b' => Some(FileKind::BlockDevice),
            'c' => Some(FileKind::CharDevice),
            'd' => Some(FileKind::Directory),
            'p' => Some(FileKind::Fifo),
            'f' => Some(FileKind::Regular),
            'l' => Some(FileKind::Symlink),
            's' => Some(FileKind::Socket),
            _ => None,
        }
    }

    /// Letter used by type tests: regular files are `f`.
    pub fn type_letter(self) -> char {
        match self {
            FileKind::BlockDevice => 'b',
            FileKind::CharDevice => 'c',
            FileKind::Directory => 'd',
            FileKind::Fifo => 'p',
            FileKind::Regular => 'f',
            FileKind::Symlink => 'l',
            FileKind::Socket => 's',
            FileKind::Unknown => 'u',
        }
    }

    /// Letter used in listing records: regular files render as `-`.
    pub fn ls_letter(self) -> char {
        match self {
            FileKind::Regular => '-',
            other => other.type_letter(),
        }
    }
}

/// One visited filesystem object: its path plus a metadata snapshot.
///
/// The snapshot is taken with a single non-following stat when the entry is
/// discovered. Entries are built fresh per visited path and dropped when the
/// pipeline finishes with them; nothing is cached across visits.
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: FileKind,
    pub ino: u64,
    pub size: u64,
    /// Allocated block count in native 512-byte units.
    pub blocks: u64,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub nlink: u64,
    /// Modification time, seconds since the epoch.
    pub mtime: i64,
}

impl Entry {
    /// Stat `path` without following a final symlink and snapshot the result.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let md = fs::symlink_metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            kind: FileKind::from_file_type(md.file_type()),
            ino: md.ino(),
            size: md.size(),
            blocks: md.blocks(),
            mode: md.mode(),
            uid: md.uid(),
            gid: md.gid(),
            nlink: md.nlink(),
            mtime: md.mtime(),
        })
    }

    /// Final path component, falling back to the whole path when there is
    /// none (the root directory `/`).
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    #[test]
    fn test_type_codes_round_trip() {
        for code in ['b', 'c', 'd', 'p', 'f', 'l', 's'] {
            let kind = FileKind::from_code(code).expect("valid code");
            assert_eq!(kind.type_letter(), code);
        }
        assert!(FileKind::from_code('x').is_none());
        assert!(FileKind::from_code('u').is_none());
    }

    #[test]
    fn test_ls_letter_for_regular_files() {
        assert_eq!(FileKind::Regular.ls_letter(), '-');
        assert_eq!(FileKind::Regular.type_letter(), 'f');
        assert_eq!(FileKind::Directory.ls_letter(), 'd');
        assert_eq!(FileKind::Symlink.ls_letter(), 'l');
    }

    #[test]
    fn test_snapshot_of_regular_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"hello").unwrap();

        let entry = Entry::from_path(&path).unwrap();
        assert_eq!(entry.kind, FileKind::Regular);
        assert_eq!(entry.size, 5);
        assert_eq!(entry.file_name(), "a.txt");
        assert!(!entry.is_dir());
    }

    #[test]
    fn test_snapshot_of_directory() {
        let dir = TempDir::new().unwrap();
        let entry = Entry::from_path(dir.path()).unwrap();
        assert_eq!(entry.kind, FileKind::Directory);
        assert!(entry.is_dir());
    }

    #[test]
    fn test_symlink_is_not_followed() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target.txt");
        std::fs::write(&target, b"x").unwrap();
        let link = dir.path().join("link");
        symlink(&target, &link).unwrap();

        let entry = Entry::from_path(&link).unwrap();
        assert_eq!(entry.kind, FileKind::Symlink);
    }

    #[test]
    fn test_stat_of_missing_path_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Entry::from_path(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_file_name_of_root_is_whole_path() {
        let entry = Entry::from_path(Path::new("/")).unwrap();
        assert_eq!(entry.file_name(), "/");
    }
}
