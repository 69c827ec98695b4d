//! Command classification: builtin lookup, then an ordered search-path walk
//! with an executability check.

use log::debug;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Commands implemented inside the interpreter itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Echo,
    Type,
}

impl Builtin {
    /// The fixed builtin vocabulary, in declaration order.
    pub const ALL: [Builtin; 3] = [Builtin::Exit, Builtin::Echo, Builtin::Type];

    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.iter().copied().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Echo => "echo",
            Builtin::Type => "type",
        }
    }
}

/// What a command name resolved to. Computed once per execution and never
/// cached across lines; the search path and filesystem may change between
/// invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Builtin(Builtin),
    External(PathBuf),
    NotFound,
}

/// Classify a command name against the builtin set and the given search-path
/// list (the value of `PATH`, split on the platform path-list separator).
///
/// Directories that cannot be listed are skipped silently; the first entry
/// whose file name matches and which passes the executability check wins.
/// For a fixed search path and filesystem snapshot this is a pure function.
pub fn classify(name: &str, search_paths: &OsStr) -> CommandKind {
    if let Some(builtin) = Builtin::from_name(name) {
        return CommandKind::Builtin(builtin);
    }

    for dir in std::env::split_paths(search_paths) {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("skipping unlistable search-path entry {}: {}", dir.display(), err);
                continue;
            }
        };
        for entry in entries.flatten() {
            if entry.file_name() == OsStr::new(name) && is_executable(&entry.path()) {
                return CommandKind::External(entry.path());
            }
        }
    }
    CommandKind::NotFound
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
