//! A small interactive shell interpreter.
//!
//! This crate reads a line of input, tokenizes it respecting quoting and
//! escaping rules, resolves the command to a builtin or an external
//! executable, runs it with captured stdout/stderr and optional file
//! redirection, and offers incremental tab-completion of builtin command
//! names while typing.
//!
//! The main entry point is [`Interpreter`], which executes one parsed line
//! at a time. The [`editor`] module provides the raw-mode line editor used
//! by the interactive binary; [`lexer`], [`resolver`], [`output`] and
//! [`trie`] are the individual stages it is built from.

pub mod editor;
pub mod interpreter;
pub mod lexer;
pub mod output;
pub mod resolver;
pub mod trie;

pub use interpreter::{Interpreter, LineStatus};
