//! flint — a stack-based bytecode VM for a small scripting language.
//!
//! The pipeline is the classic one: the scanner turns source text into
//! tokens, the compiler stage will eventually turn tokens into a [`Chunk`]
//! of bytecode (today it only echoes the token stream), and the [`Vm`]
//! executes a chunk. The disassembler in [`debug`] renders chunks as text
//! for diagnostics and tracing.

pub mod chunk;
pub mod compiler;
pub mod debug;
pub mod scanner;
pub mod value;
pub mod vm;

pub use chunk::Chunk;
pub use value::Value;
pub use vm::Vm;
