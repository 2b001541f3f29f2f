//! The compiler stage. It does not emit bytecode yet: it scans the source
//! and renders the token stream as a table, one token per row, with the
//! line column collapsing to `|` when a line repeats. Chunks are still
//! produced by hand (see the VM tests) until this stage grows a parser
//! and code emitter.

use crate::scanner::{self, ScanError};

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Scan `source` and return the token-table rendering, or the first scan
/// error. This stage's failure is the compile-error leg of the interpret
/// result; runtime errors can only come from the VM.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = scanner::scan(source)?;

    let mut out = String::new();
    let mut line = 0;
    for token in &tokens {
        if token.line == line {
            out.push_str("   | ");
        } else {
            out.push_str(&format!("{:4} ", token.line));
            line = token.line;
        }
        out.push_str(&format!("{:<13} '{}'\n", format!("{:?}", token.kind), token.lexeme));
    }

    // End-of-input marker row, sharing the last token's line.
    if tokens.is_empty() {
        out.push_str("   1 Eof           ''\n");
    } else {
        out.push_str("   | Eof           ''\n");
    }
    Ok(out)
}
