//! Routing of captured command output to the terminal and/or a redirection
//! target file.

use crate::lexer::{Redirect, RedirectMode, RedirectStream};
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Where a line's output goes. Constructed per parsed line from its
/// redirection, or the absence of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputConfig {
    /// No redirection: both streams go to the terminal.
    Terminal,
    /// One stream goes to a file; the other stays on the terminal.
    File {
        stream: RedirectStream,
        mode: RedirectMode,
        path: String,
    },
}

impl OutputConfig {
    pub fn from_redirect(redirect: Option<Redirect>) -> Self {
        match redirect {
            None => OutputConfig::Terminal,
            Some(r) => OutputConfig::File {
                stream: r.stream,
                mode: r.mode,
                path: r.path,
            },
        }
    }

    /// Emit a command's captured stdout and stderr text.
    ///
    /// Non-empty streams are normalized to end with exactly one trailing
    /// newline; empty streams emit nothing to the terminal. A redirection
    /// target is opened (and its parent directories created) even when the
    /// redirected stream is empty, matching truncate/append file semantics.
    /// Failure to open or write the target propagates and aborts the line.
    pub fn emit(
        &self,
        stdout_text: &str,
        stderr_text: &str,
        term_out: &mut dyn Write,
        term_err: &mut dyn Write,
    ) -> Result<()> {
        let out = normalize(stdout_text);
        let err = normalize(stderr_text);

        match self {
            OutputConfig::Terminal => {
                term_out.write_all(out.as_bytes())?;
                term_err.write_all(err.as_bytes())?;
            }
            OutputConfig::File {
                stream: RedirectStream::Stdout,
                mode,
                path,
            } => {
                write_target(path, *mode, &out)?;
                term_err.write_all(err.as_bytes())?;
            }
            OutputConfig::File {
                stream: RedirectStream::Stderr,
                mode,
                path,
            } => {
                write_target(path, *mode, &err)?;
                term_out.write_all(out.as_bytes())?;
            }
        }
        term_out.flush()?;
        term_err.flush()?;
        Ok(())
    }
}

/// Non-empty text ends with exactly one newline; empty text stays empty.
fn normalize(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("{}\n", text.trim_end_matches('\n'))
    }
}

fn write_target(path: &str, mode: RedirectMode, text: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating parent directories of '{}'", path))?;
        }
    }
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(mode == RedirectMode::Truncate)
        .append(mode == RedirectMode::Append)
        .open(path)
        .with_context(|| format!("opening redirection target '{}'", path))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("writing redirection target '{}'", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_unique_temp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "minish_output_{}_{}_{}",
            tag,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn emit_to_file(config: &OutputConfig, stdout_text: &str, stderr_text: &str) -> (Vec<u8>, Vec<u8>) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        config
            .emit(stdout_text, stderr_text, &mut out, &mut err)
            .expect("emit");
        (out, err)
    }

    #[test]
    fn test_terminal_routing_keeps_both_streams_visible() {
        let (out, err) = emit_to_file(&OutputConfig::Terminal, "hello", "oops");
        assert_eq!(out, b"hello\n");
        assert_eq!(err, b"oops\n");
    }

    #[test]
    fn test_empty_streams_emit_nothing() {
        let (out, err) = emit_to_file(&OutputConfig::Terminal, "", "");
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn test_trailing_newlines_collapse_to_one() {
        let (out, _) = emit_to_file(&OutputConfig::Terminal, "hello\n\n", "");
        assert_eq!(out, b"hello\n");
    }

    #[test]
    fn test_stdout_redirection_leaves_stderr_on_terminal() {
        let dir = make_unique_temp_dir("route");
        let path = dir.join("out.txt").to_string_lossy().to_string();
        let config = OutputConfig::File {
            stream: RedirectStream::Stdout,
            mode: RedirectMode::Truncate,
            path: path.clone(),
        };

        let (out, err) = emit_to_file(&config, "captured", "visible");
        assert!(out.is_empty());
        assert_eq!(err, b"visible\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "captured\n");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_stderr_redirection_leaves_stdout_on_terminal() {
        let dir = make_unique_temp_dir("route_err");
        let path = dir.join("err.txt").to_string_lossy().to_string();
        let config = OutputConfig::File {
            stream: RedirectStream::Stderr,
            mode: RedirectMode::Truncate,
            path: path.clone(),
        };

        let (out, err) = emit_to_file(&config, "visible", "captured");
        assert_eq!(out, b"visible\n");
        assert!(err.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "captured\n");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_truncate_keeps_only_the_last_write() {
        let dir = make_unique_temp_dir("truncate");
        let path = dir.join("f").to_string_lossy().to_string();
        let config = OutputConfig::File {
            stream: RedirectStream::Stdout,
            mode: RedirectMode::Truncate,
            path: path.clone(),
        };

        emit_to_file(&config, "first", "");
        emit_to_file(&config, "second", "");
        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_append_concatenates_writes_in_order() {
        let dir = make_unique_temp_dir("append");
        let path = dir.join("f").to_string_lossy().to_string();
        let config = OutputConfig::File {
            stream: RedirectStream::Stdout,
            mode: RedirectMode::Append,
            path: path.clone(),
        };

        emit_to_file(&config, "first", "");
        emit_to_file(&config, "second", "");
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_parent_directories_are_created() {
        let dir = make_unique_temp_dir("parents");
        let path = dir
            .join("a/b/c/out.txt")
            .to_string_lossy()
            .to_string();
        let config = OutputConfig::File {
            stream: RedirectStream::Stdout,
            mode: RedirectMode::Truncate,
            path: path.clone(),
        };

        emit_to_file(&config, "deep", "");
        assert_eq!(fs::read_to_string(&path).unwrap(), "deep\n");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_redirected_empty_stream_still_creates_the_file() {
        let dir = make_unique_temp_dir("touch");
        let path = dir.join("empty").to_string_lossy().to_string();
        let config = OutputConfig::File {
            stream: RedirectStream::Stderr,
            mode: RedirectMode::Truncate,
            path: path.clone(),
        };

        emit_to_file(&config, "hello", "");
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        let _ = fs::remove_dir_all(dir);
    }
}
