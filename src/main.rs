use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use flint::compiler;
use flint::scanner;

// sysexits-style codes, shared with the test suite.
const EX_DATAERR: i32 = 65; // compile (scan) error
const EX_IOERR: i32 = 74; // could not read the source

#[derive(Parser)]
#[command(name = "flint", version, about = "A bytecode VM for a small scripting language")]
struct Cli {
    /// Source file to run; omit to start a REPL
    path: Option<PathBuf>,

    /// Print the token stream as JSON instead of the token table
    #[arg(long)]
    tokens_json: bool,
}

fn main() {
    let cli = Cli::parse();
    let code = match &cli.path {
        Some(path) => run_file(path, cli.tokens_json),
        None => repl(cli.tokens_json),
    };
    exit(code);
}

fn run_file(path: &PathBuf, tokens_json: bool) -> i32 {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            return EX_IOERR;
        }
    };
    run_source(&source, tokens_json)
}

fn repl(tokens_json: bool) -> i32 {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return EX_IOERR;
        }
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                println!();
                return 0;
            }
            Ok(_) => {
                // Errors are reported and the prompt comes back; exit codes
                // only matter in file mode.
                run_source(line.trim_end(), tokens_json);
            }
            Err(e) => {
                eprintln!("Error reading stdin: {e}");
                return EX_IOERR;
            }
        }
    }
}

fn run_source(source: &str, tokens_json: bool) -> i32 {
    if tokens_json {
        return match scanner::scan(source) {
            Ok(tokens) => match serde_json::to_string_pretty(&tokens) {
                Ok(json) => {
                    println!("{json}");
                    0
                }
                Err(e) => {
                    eprintln!("Serialization error: {e}");
                    EX_IOERR
                }
            },
            Err(e) => {
                eprintln!("{e}");
                EX_DATAERR
            }
        };
    }

    match compiler::compile(source) {
        Ok(listing) => {
            print!("{listing}");
            0
        }
        Err(e) => {
            eprintln!("{e}");
            EX_DATAERR
        }
    }
}
