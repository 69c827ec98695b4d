//! The execution engine: parse a submitted line, classify the command and
//! dispatch to a builtin handler or an external process.

use crate::lexer;
use crate::output::OutputConfig;
use crate::resolver::{self, Builtin, CommandKind};
use anyhow::Result;
use log::{debug, warn};
use std::env;
use std::ffi::OsString;
use std::io::Write;
use std::process::Command;

/// What the REPL loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    Continue,
    Exit,
}

/// Executes one submitted line at a time: `Parse -> Classify -> dispatch`.
///
/// The interpreter holds no state across lines; the search path is read
/// fresh for every resolution so mid-session changes take effect
/// immediately. Terminal output goes through the provided writers, which
/// keeps the engine testable against in-memory sinks.
#[derive(Debug, Default)]
pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Interpreter
    }

    /// Execute a single input line.
    pub fn execute(
        &mut self,
        line: &str,
        term_out: &mut dyn Write,
        term_err: &mut dyn Write,
    ) -> Result<LineStatus> {
        let parsed = lexer::parse_line(line);
        let Some((name, args)) = parsed.tokens.split_first() else {
            return Ok(LineStatus::Continue);
        };
        let config = OutputConfig::from_redirect(parsed.redirect.clone());

        let kind = resolver::classify(name, &search_paths());
        debug!("classified {:?} as {:?}", name, kind);
        match kind {
            CommandKind::Builtin(Builtin::Exit) => Ok(LineStatus::Exit),
            CommandKind::Builtin(Builtin::Echo) => {
                config.emit(&args.join(" "), "", term_out, term_err)?;
                Ok(LineStatus::Continue)
            }
            CommandKind::Builtin(Builtin::Type) => {
                let report = args.first().map(|arg| describe(arg)).unwrap_or_default();
                config.emit(&report, "", term_out, term_err)?;
                Ok(LineStatus::Continue)
            }
            CommandKind::External(path) => {
                match Command::new(&path).args(args).output() {
                    Ok(output) => {
                        config.emit(
                            &String::from_utf8_lossy(&output.stdout),
                            &String::from_utf8_lossy(&output.stderr),
                            term_out,
                            term_err,
                        )?;
                    }
                    Err(err) => {
                        // The executable passed the resolution check but could
                        // not be spawned (removed or changed since). The
                        // user-visible message mirrors resolver-time
                        // information.
                        warn!("failed to spawn {}: {}", path.display(), err);
                        writeln!(term_out, "{}: command not found", name)?;
                        term_out.flush()?;
                    }
                }
                Ok(LineStatus::Continue)
            }
            CommandKind::NotFound => {
                // Reported directly to the terminal, bypassing the
                // redirection-aware path used for builtins.
                writeln!(term_out, "{}: command not found", name)?;
                term_out.flush()?;
                Ok(LineStatus::Continue)
            }
        }
    }
}

/// The `type` builtin's report for one name.
fn describe(name: &str) -> String {
    match resolver::classify(name, &search_paths()) {
        CommandKind::Builtin(b) => format!("{} is a shell builtin", b.name()),
        CommandKind::External(path) => format!("{} is {}", name, path.display()),
        CommandKind::NotFound => format!("{}: not found", name),
    }
}

fn search_paths() -> OsString {
    env::var_os("PATH").unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn run(line: &str) -> (LineStatus, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = Interpreter::new()
            .execute(line, &mut out, &mut err)
            .expect("execute");
        (
            status,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_echo_joins_arguments_with_single_spaces() {
        let (status, out, err) = run("echo hello   world");
        assert_eq!(status, LineStatus::Continue);
        assert_eq!(out, "hello world\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_echo_preserves_quoted_spacing() {
        let (_, out, _) = run("echo 'a  b'");
        assert_eq!(out, "a  b\n");
    }

    #[test]
    fn test_type_reports_builtins() {
        let (_, out, _) = run("type echo");
        assert_eq!(out, "echo is a shell builtin\n");
    }

    #[test]
    fn test_type_reports_missing_commands() {
        let (_, out, _) = run("type nonexistent_cmd_xyz");
        assert_eq!(out, "nonexistent_cmd_xyz: not found\n");
    }

    #[test]
    fn test_unknown_command_is_reported_on_the_terminal() {
        let (status, out, _) = run("nonexistent_cmd_xyz");
        assert_eq!(status, LineStatus::Continue);
        assert_eq!(out, "nonexistent_cmd_xyz: command not found\n");
    }

    #[test]
    fn test_exit_terminates_the_loop() {
        let (status, out, err) = run("exit");
        assert_eq!(status, LineStatus::Exit);
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn test_empty_line_is_a_no_op() {
        let (status, out, err) = run("   ");
        assert_eq!(status, LineStatus::Continue);
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    fn make_unique_temp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "minish_interp_{}_{}_{}",
            tag,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn test_echo_redirects_stdout_to_a_file() {
        let dir = make_unique_temp_dir("redir");
        let path = dir.join("out.txt");
        let line = format!("echo hello > {}", path.display());

        let (_, out, _) = run(&line);
        assert!(out.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn test_external_command_output_is_captured() {
        // Relies on `sh` being resolvable through PATH.
        let (status, out, err) = run("sh -c 'printf hi'");
        assert_eq!(status, LineStatus::Continue);
        assert_eq!(out, "hi\n");
        assert!(err.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_external_stderr_reaches_the_terminal() {
        let (_, out, err) = run("sh -c 'printf oops >&2'");
        assert!(out.is_empty());
        assert_eq!(err, "oops\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_external_stderr_redirection() {
        let dir = make_unique_temp_dir("ext_err");
        let path = dir.join("err.log");
        let line = format!("sh -c 'printf oops >&2' 2> {}", path.display());

        let (_, out, err) = run(&line);
        assert!(out.is_empty());
        assert!(err.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "oops\n");

        let _ = fs::remove_dir_all(dir);
    }
}
