//! Pure bytecode decoders. Nothing here mutates a chunk or performs I/O;
//! both functions render text and leave printing to the caller, so the
//! same decoders back the static `--disasm` dump and the per-step
//! execution trace.

use crate::chunk::{
    Chunk, OP_ADD, OP_CONSTANT, OP_DIVIDE, OP_MULTIPLY, OP_NEGATE, OP_RETURN, OP_SUBTRACT,
};
use crate::value::format_value;

/// Decode every instruction in `chunk` under a `== name ==` header.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = format!("== {name} ==\n");
    let mut offset = 0;
    while offset < chunk.code.count() {
        let (text, next) = disassemble_instruction(chunk, offset);
        out.push_str(&text);
        out.push('\n');
        offset = next;
    }
    out
}

/// Decode the single instruction at `offset`, returning its rendering and
/// the offset of the next instruction. Malformed input (an undefined
/// opcode, a missing operand, a bad constant index) decodes to a
/// placeholder rather than a fault; judging malformed chunks is the VM's
/// job, not the disassembler's.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> (String, usize) {
    let mut text = format!("{offset:04} ");
    if offset > 0 && chunk.lines[offset] == chunk.lines[offset - 1] {
        text.push_str("   | ");
    } else {
        text.push_str(&format!("{:4} ", chunk.lines[offset]));
    }

    match chunk.code[offset] {
        OP_CONSTANT => constant_instruction("OP_CONSTANT", chunk, offset, text),
        OP_ADD => simple_instruction("OP_ADD", offset, text),
        OP_SUBTRACT => simple_instruction("OP_SUBTRACT", offset, text),
        OP_MULTIPLY => simple_instruction("OP_MULTIPLY", offset, text),
        OP_DIVIDE => simple_instruction("OP_DIVIDE", offset, text),
        OP_NEGATE => simple_instruction("OP_NEGATE", offset, text),
        OP_RETURN => simple_instruction("OP_RETURN", offset, text),
        op => {
            text.push_str(&format!("unknown opcode {op}"));
            (text, offset + 1)
        }
    }
}

fn simple_instruction(name: &str, offset: usize, mut text: String) -> (String, usize) {
    text.push_str(name);
    (text, offset + 1)
}

fn constant_instruction(
    name: &str,
    chunk: &Chunk,
    offset: usize,
    mut text: String,
) -> (String, usize) {
    let Some(&index) = chunk.code.get(offset + 1) else {
        text.push_str(&format!("{name:<16} <truncated>"));
        return (text, offset + 1);
    };
    let rendered = match chunk.constants.get(index as usize) {
        Some(&value) => format_value(value),
        None => "<bad constant>".to_string(),
    };
    text.push_str(&format!("{name:<16} {index:4} '{rendered}'"));
    (text, offset + 2)
}

// ── Tests ────────────────────────────────────────────────────────────
