//! The fm processes module.
//!
//! This module implements the [Launch] struct: the argument vector and working directory
//! of an external program started from an action. The builders produce the exact
//! invocations fm uses:
//! - `mkdir <name>` / `touch <name>` for the create actions
//! - `rm -rf <name>` for delete
//! - `<shell> -c '<opener> "$1"' <shell> <name>` for opening a file
//!
//! [run_foreground] starts the program with inherited standard streams and waits for it.
//! Suspending and restoring the terminal around it is the job of the console, see
//! [crate::core::terminal::Console::run].

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// An external program invocation: `argv[0]` is the program, the rest its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    argv: Vec<OsString>,
    cwd: PathBuf,
}

impl Launch {
    pub fn new(argv: Vec<OsString>, cwd: &Path) -> Self {
        Self {
            argv,
            cwd: cwd.to_path_buf(),
        }
    }

    /// `mkdir <name>` or `touch <name>`
    pub fn create(name: &str, is_dir: bool, cwd: &Path) -> Self {
        let program = if is_dir { "mkdir" } else { "touch" };
        Self::new(vec![program.into(), name.into()], cwd)
    }

    /// `rm -rf <name>`
    pub fn remove(name: &OsStr, cwd: &Path) -> Self {
        Self::new(vec!["rm".into(), "-rf".into(), name.to_os_string()], cwd)
    }

    /// `<shell> -c '<opener> "$1"' <shell> <name>`
    ///
    /// The name travels as a positional parameter, so quotes or other shell
    /// metacharacters in it are never interpreted.
    pub fn open_with(shell: &str, opener: &str, name: &OsStr, cwd: &Path) -> Self {
        Self::new(
            vec![
                shell.into(),
                "-c".into(),
                format!("{opener} \"$1\"").into(),
                shell.into(),
                name.to_os_string(),
            ],
            cwd,
        )
    }

    // Getters / accessors

    #[inline]
    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }

    #[inline]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Builds the [Command] with inherited standard streams.
    pub fn command(&self) -> io::Result<Command> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty argument vector"))?;
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&self.cwd);
        Ok(cmd)
    }
}

/// Runs the launch to completion in the foreground.
///
/// The exit status is returned for logging only, callers do not act on it.
pub fn run_foreground(launch: &Launch) -> io::Result<ExitStatus> {
    launch.command()?.status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_launch_shapes() {
        let cwd = Path::new("/tmp");
        assert_eq!(
            Launch::create("notes", false, cwd).argv(),
            &[OsString::from("touch"), OsString::from("notes")]
        );
        assert_eq!(
            Launch::create("src", true, cwd).argv(),
            &[OsString::from("mkdir"), OsString::from("src")]
        );
        assert_eq!(
            Launch::remove(OsStr::new("old dir"), cwd).argv(),
            &[
                OsString::from("rm"),
                OsString::from("-rf"),
                OsString::from("old dir")
            ]
        );
    }

    #[test]
    fn test_open_with_passes_name_as_argument() {
        let launch = Launch::open_with("sh", "less", OsStr::new("say \"hi\".txt"), Path::new("/"));
        let argv: Vec<_> = launch.argv().iter().map(|a| a.to_string_lossy()).collect();
        assert_eq!(argv, vec!["sh", "-c", "less \"$1\"", "sh", "say \"hi\".txt"]);
    }

    #[test]
    fn test_run_foreground_in_cwd() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let status = run_foreground(&Launch::create("made", true, dir.path()))?;
        assert!(status.success());
        assert!(dir.path().join("made").is_dir());

        let quoted = "it's \"quoted\"";
        let launch = Launch::open_with("sh", "touch", OsStr::new(quoted), dir.path());
        assert!(run_foreground(&launch)?.success());
        assert!(dir.path().join(quoted).exists());
        Ok(())
    }

    #[test]
    fn test_empty_argv_is_an_error() {
        let launch = Launch::new(Vec::new(), Path::new("/"));
        assert!(launch.command().is_err());
    }
}
