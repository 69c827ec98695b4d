//! Tokenization of a raw input line into an argument list plus an optional
//! redirection, via a single left-to-right scan.
//!
//! Tokenization never fails: malformed quoting produces a best-effort token
//! stream rather than an error, and a redirection operator with no following
//! path yields an empty path.

use std::iter::Peekable;
use std::str::Chars;

/// Which standard stream a redirection diverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectStream {
    Stdout,
    Stderr,
}

/// Whether the redirection target is overwritten or appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Truncate,
    Append,
}

/// A single redirection target. At most one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub stream: RedirectStream,
    pub mode: RedirectMode,
    pub path: String,
}

/// The result of parsing one input line. Constructed fresh per line and
/// immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Ordered tokens; the first is the command name.
    pub tokens: Vec<String>,
    pub redirect: Option<Redirect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    None,
    Single,
    Double,
}

/// Where completed tokens are currently flushed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteTarget {
    Args,
    RedirectPath,
}

struct LexerFsm<'a> {
    input: Peekable<Chars<'a>>,
    quote: QuoteState,
    acc: String,
    target: WriteTarget,
    tokens: Vec<String>,
    path_chunks: Vec<String>,
    redirect: Option<(RedirectStream, RedirectMode)>,
}

impl<'a> LexerFsm<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            input: line.chars().peekable(),
            quote: QuoteState::None,
            acc: String::new(),
            target: WriteTarget::Args,
            tokens: Vec::new(),
            path_chunks: Vec::new(),
            redirect: None,
        }
    }

    fn run(mut self) -> ParsedLine {
        while let Some(ch) = self.input.next() {
            match ch {
                '\\' if self.quote != QuoteState::Single => self.handle_escape(),
                '\'' if self.quote == QuoteState::Single => self.quote = QuoteState::None,
                '"' if self.quote == QuoteState::Double => self.quote = QuoteState::None,
                '\'' if self.quote == QuoteState::None => self.quote = QuoteState::Single,
                '"' if self.quote == QuoteState::None => self.quote = QuoteState::Double,
                ' ' if self.quote == QuoteState::None => self.flush(),
                '>' if self.quote == QuoteState::None => self.begin_redirect(),
                _ => self.acc.push(ch),
            }
        }
        self.flush();

        let redirect = self.redirect.map(|(stream, mode)| Redirect {
            stream,
            mode,
            // Space-separated chunks after the operator concatenate without
            // separators; an operator with no path yields "".
            path: self.path_chunks.concat(),
        });
        ParsedLine {
            tokens: self.tokens,
            redirect,
        }
    }

    /// A backslash outside single quotes makes the next character literal.
    /// Inside double quotes the backslash itself is kept unless it escapes
    /// one of `"`, `\`, `$` or a backtick.
    fn handle_escape(&mut self) {
        let Some(next) = self.input.next() else {
            // Trailing backslash with nothing to escape.
            return;
        };
        if self.quote == QuoteState::Double && !matches!(next, '"' | '\\' | '$' | '`') {
            self.acc.push('\\');
        }
        self.acc.push(next);
    }

    /// Token boundary: move the accumulator into whichever list is being
    /// written. Empty accumulators flush nothing.
    fn flush(&mut self) {
        if self.acc.is_empty() {
            return;
        }
        let token = std::mem::take(&mut self.acc);
        match self.target {
            WriteTarget::Args => self.tokens.push(token),
            WriteTarget::RedirectPath => self.path_chunks.push(token),
        }
    }

    /// An unquoted `>`: the accumulator so far acts as an optional file
    /// descriptor selector (`1` = stdout, `2` = stderr, empty = stdout); any
    /// other accumulator is an ordinary token and flushes first. A doubled
    /// `>` selects append mode. Previously completed path chunks survive a
    /// later operator; only the selection is replaced.
    fn begin_redirect(&mut self) {
        let stream = match self.acc.as_str() {
            "" | "1" => RedirectStream::Stdout,
            "2" => RedirectStream::Stderr,
            _ => {
                self.flush();
                RedirectStream::Stdout
            }
        };
        self.acc.clear();

        let mode = if self.input.peek() == Some(&'>') {
            self.input.next();
            RedirectMode::Append
        } else {
            RedirectMode::Truncate
        };

        self.redirect = Some((stream, mode));
        self.target = WriteTarget::RedirectPath;
    }
}

/// Tokenize one input line.
pub fn parse_line(line: &str) -> ParsedLine {
    LexerFsm::new(line).run()
}
