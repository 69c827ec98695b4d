use anyhow::Result;
use log::debug;
use minish::editor::{LineEditor, StdinKeys};
use minish::{Interpreter, LineStatus};
use std::io::{self, BufRead, IsTerminal, Write};

#[derive(argh::FromArgs)]
/// A small interactive shell: builtins, PATH lookup, output redirection and
/// tab completion of builtin names.
struct Args {
    /// execute a single command line and exit
    #[argh(option, short = 'c')]
    command: Option<String>,

    /// read whole lines from stdin instead of raw keystrokes
    #[argh(switch)]
    no_raw: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();
    let mut interpreter = Interpreter::new();

    if let Some(line) = args.command {
        interpreter.execute(&line, &mut io::stdout(), &mut io::stderr())?;
        return Ok(());
    }

    if !args.no_raw && io::stdin().is_terminal() {
        debug!("starting raw-mode session");
        run_interactive(&mut interpreter)
    } else {
        debug!("starting line-mode session");
        run_line_mode(&mut interpreter)
    }
}

/// Keystroke-driven REPL. The terminal is in raw mode only while a line is
/// being edited, so spawned commands see normal terminal semantics.
#[cfg(unix)]
fn run_interactive(interpreter: &mut Interpreter) -> Result<()> {
    use minish::editor::RawModeGuard;

    let mut editor = LineEditor::new(StdinKeys::new(), io::stdout());
    loop {
        let line = {
            let _raw = RawModeGuard::new()?;
            editor.read_line()?
        };
        let Some(line) = line else {
            break;
        };
        if execute(interpreter, &line)? == LineStatus::Exit {
            break;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn run_interactive(interpreter: &mut Interpreter) -> Result<()> {
    run_line_mode(interpreter)
}

/// Whole-line REPL for piped input or `--no-raw`.
fn run_line_mode(interpreter: &mut Interpreter) -> Result<()> {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        write!(io::stdout(), "$ ")?;
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if execute(interpreter, line.trim_end_matches(['\r', '\n']))? == LineStatus::Exit {
            break;
        }
    }
    Ok(())
}

fn execute(interpreter: &mut Interpreter, line: &str) -> Result<LineStatus> {
    interpreter.execute(line, &mut io::stdout(), &mut io::stderr())
}
