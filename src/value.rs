/// Runtime values are plain IEEE-754 doubles. Richer types (text, bools,
/// heap objects) wait on a real object model and a garbage collector.
pub type Value = f64;

/// Render a value for the REPL, the disassembler, and execution traces.
pub fn format_value(value: Value) -> String {
    format!("{value}")
}
