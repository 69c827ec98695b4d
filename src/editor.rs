//! The line editor: consumes discrete key events, maintains the in-progress
//! edit buffer and drives trie-based tab completion over the builtin
//! vocabulary.

use crate::resolver::Builtin;
use crate::trie::Trie;
use anyhow::Result;
use std::io::{Read, Write};

const PROMPT: &str = "$ ";

/// A decoded keystroke event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Tab,
    Enter,
}

/// Blocking source of keystroke events. `Ok(None)` means end of input.
pub trait KeySource {
    fn next_key(&mut self) -> Result<Option<Key>>;
}

/// Accumulates keystrokes into a line, echoing edits to the terminal.
///
/// Owns the completion trie for the whole session; the edit buffer is
/// cleared on submit.
pub struct LineEditor<K, W> {
    keys: K,
    term: W,
    buffer: String,
    completions: Trie,
}

impl<K: KeySource, W: Write> LineEditor<K, W> {
    pub fn new(keys: K, term: W) -> Self {
        Self {
            keys,
            term,
            buffer: String::new(),
            completions: Trie::from_words(Builtin::ALL.iter().map(|b| b.name())),
        }
    }

    /// Read one line, prompting first. Returns `None` on end of input.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        write!(self.term, "{}", PROMPT)?;
        self.term.flush()?;

        loop {
            let Some(key) = self.keys.next_key()? else {
                return Ok(None);
            };
            match key {
                Key::Enter => {
                    write!(self.term, "\r\n")?;
                    self.term.flush()?;
                    return Ok(Some(std::mem::take(&mut self.buffer)));
                }
                Key::Tab => self.complete()?,
                Key::Backspace => {
                    if self.buffer.pop().is_some() {
                        // Erase one cell: step back, blank it, step back.
                        write!(self.term, "\x08 \x08")?;
                        self.term.flush()?;
                    }
                }
                Key::Char(c) => {
                    self.buffer.push(c);
                    write!(self.term, "{}", c)?;
                    self.term.flush()?;
                }
            }
        }
    }

    /// Only the portion after the last space is the word being completed.
    /// An ambiguous or absent prefix is a silent no-op; listing the
    /// alternatives is possible through [`Trie::completions`] but is not
    /// wired to a key.
    fn complete(&mut self) -> Result<()> {
        let word = self.buffer.rsplit(' ').next().unwrap_or("");
        if let Some(suffix) = self.completions.unique_completion(word) {
            self.buffer.push_str(&suffix);
            write!(self.term, "{}", suffix)?;
            self.term.flush()?;
        }
        Ok(())
    }
}

/// Decodes raw bytes from stdin into [`Key`] events. Expects the terminal to
/// be in raw mode (see [`RawModeGuard`]).
pub struct StdinKeys {
    stdin: std::io::Stdin,
}

impl StdinKeys {
    pub fn new() -> Self {
        Self {
            stdin: std::io::stdin(),
        }
    }
}

impl Default for StdinKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for StdinKeys {
    fn next_key(&mut self) -> Result<Option<Key>> {
        let mut byte = [0u8; 1];
        loop {
            if self.stdin.read(&mut byte)? == 0 {
                return Ok(None);
            }
            return Ok(match byte[0] {
                b'\r' | b'\n' => Some(Key::Enter),
                b'\t' => Some(Key::Tab),
                // DEL is what most terminals send for the backspace key.
                0x7f | 0x08 => Some(Key::Backspace),
                // Ctrl-D: end of input.
                0x04 => None,
                b if (0x20..0x7f).contains(&b) => Some(Key::Char(b as char)),
                _ => continue,
            });
        }
    }
}

/// Puts the controlling terminal into raw (non-canonical, no-echo) mode and
/// restores the saved attributes on drop.
#[cfg(unix)]
pub struct RawModeGuard {
    saved: nix::sys::termios::Termios,
}

#[cfg(unix)]
impl RawModeGuard {
    pub fn new() -> Result<Self> {
        use nix::sys::termios::{self, LocalFlags, SetArg};

        let stdin = std::io::stdin();
        let saved = termios::tcgetattr(&stdin)?;
        let mut raw = saved.clone();
        raw.local_flags
            .remove(LocalFlags::ICANON | LocalFlags::ECHO);
        termios::tcsetattr(&stdin, SetArg::TCSANOW, &raw)?;
        Ok(Self { saved })
    }
}

#[cfg(unix)]
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        use nix::sys::termios::{self, SetArg};
        let _ = termios::tcsetattr(&std::io::stdin(), SetArg::TCSANOW, &self.saved);
    }
}
