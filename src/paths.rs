//! # Install Directory Resolution
//!
//! Caller paths are printed relative to the directory the program was
//! installed in. That directory is normally the one holding the running
//! executable, but a binary launched transiently from a build under the
//! system temp directory has no meaningful install location; the crate's
//! source directory stands in for it in that case.
//!
//! The directory is resolved once, when the formatter is built.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors raised while resolving the install directory.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("failed to determine the current executable path: {0}")]
    CurrentExe(#[source] io::Error),

    #[error("executable path {} has no parent directory", .0.display())]
    NoParent(PathBuf),
}

/// Strategy used to find the install directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InstallDir {
    /// Use the executable's directory unless it lies inside the system temp
    /// directory, then use the source location.
    #[default]
    Auto,
    /// Directory of the running executable, symlinks resolved.
    Executable,
    /// Crate source directory captured at compile time.
    SourceLocation,
    /// An explicit directory.
    Fixed(PathBuf),
}

impl InstallDir {
    /// Resolve the strategy to a concrete directory.
    pub fn resolve(&self) -> Result<PathBuf, PathError> {
        match self {
            InstallDir::Auto => {
                let exe_dir = executable_dir()?;
                let temp = resolve_symlinks(&std::env::temp_dir());
                let dir = choose_install_dir(exe_dir, &temp, source_dir());
                debug!("resolved install directory to {}", dir.display());
                Ok(dir)
            }
            InstallDir::Executable => executable_dir(),
            InstallDir::SourceLocation => Ok(source_dir()),
            InstallDir::Fixed(dir) => Ok(dir.clone()),
        }
    }
}

/// Directory of the running executable with symlinks resolved.
pub fn executable_dir() -> Result<PathBuf, PathError> {
    let exe = std::env::current_exe().map_err(PathError::CurrentExe)?;
    dir_of_executable(&exe)
}

fn dir_of_executable(exe: &Path) -> Result<PathBuf, PathError> {
    // Resolve the executable itself first so a symlinked binary maps to the
    // directory of its target.
    let exe = resolve_symlinks(exe);
    let dir = exe
        .parent()
        .ok_or_else(|| PathError::NoParent(exe.clone()))?;
    Ok(resolve_symlinks(dir))
}

/// Source directory of this crate, fixed at compile time.
pub fn source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn resolve_symlinks(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Pick the install directory: `exe_dir`, or `source_dir` when `exe_dir`
/// lies inside `temp_dir`.
pub fn choose_install_dir(exe_dir: PathBuf, temp_dir: &Path, source_dir: PathBuf) -> PathBuf {
    if exe_dir.starts_with(temp_dir) {
        source_dir
    } else {
        exe_dir
    }
}

/// Render `caller_file` relative to `install_dir`.
///
/// The caller's directory has `install_dir` stripped off and the file name
/// joined back on, giving a path with no leading separator. A caller outside
/// `install_dir`, including a relative one, is returned unchanged.
pub fn relative_caller_path(install_dir: &Path, caller_file: &Path) -> PathBuf {
    let (Some(dir), Some(name)) = (caller_file.parent(), caller_file.file_name()) else {
        return caller_file.to_path_buf();
    };
    match dir.strip_prefix(install_dir) {
        Ok(rest) => rest.join(name),
        Err(_) => caller_file.to_path_buf(),
    }
}
