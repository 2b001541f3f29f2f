use crate::chunk::{
    Chunk, OP_ADD, OP_CONSTANT, OP_DIVIDE, OP_MULTIPLY, OP_NEGATE, OP_RETURN, OP_SUBTRACT,
};
use crate::value::Value;

/// Hard upper bound on expression nesting depth. Exceeding it is a
/// reported fault, never undefined behavior.
pub const STACK_MAX: usize = 256;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("stack overflow: the value stack is limited to {} slots", STACK_MAX)]
    StackOverflow,
    #[error("stack underflow: pop from an empty stack")]
    StackUnderflow,
    #[error("constant index {index} out of range for a pool of {len}")]
    InvalidConstantIndex { index: usize, len: usize },
    #[error("unknown opcode: {op}")]
    UnknownOpcode { op: u8 },
    #[error("chunk truncated at offset {offset}: bytecode ended mid-instruction or without OP_RETURN")]
    TruncatedChunk { offset: usize },
}

type VmResult<T> = Result<T, RuntimeError>;

// One generic pop-b/pop-a/combine/push routine serves all four arithmetic
// opcodes; the tag picks the combining function.
enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

// ── VM ───────────────────────────────────────────────────────────────

/// The virtual machine: a fixed-capacity value stack plus an instruction
/// cursor into a borrowed [`Chunk`]. One instance serves one logical
/// session; `interpret` resets the stack on entry, so an instance is
/// reusable across chunks but never concurrently.
pub struct Vm {
    stack: [Value; STACK_MAX],
    stack_top: usize,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    pub fn new() -> Self {
        Vm { stack: [0.0; STACK_MAX], stack_top: 0 }
    }

    /// Execute `chunk` from the start and return the value popped by
    /// `OP_RETURN`. Faults abort immediately; the stack is reset on the
    /// next call, so no partial results survive a failed run.
    pub fn interpret(&mut self, chunk: &Chunk) -> VmResult<Value> {
        self.reset_stack();
        self.run(chunk)
    }

    fn reset_stack(&mut self) {
        self.stack_top = 0;
    }

    fn push(&mut self, value: Value) -> VmResult<()> {
        if self.stack_top == STACK_MAX {
            return Err(RuntimeError::StackOverflow);
        }
        self.stack[self.stack_top] = value;
        self.stack_top += 1;
        Ok(())
    }

    fn pop(&mut self) -> VmResult<Value> {
        if self.stack_top == 0 {
            return Err(RuntimeError::StackUnderflow);
        }
        self.stack_top -= 1;
        Ok(self.stack[self.stack_top])
    }

    // `b` comes off the stack first: the producer pushes the left operand
    // before the right, so `a` sits deeper. Division by zero is not a
    // fault; it follows IEEE-754 (±inf, NaN) like every other float edge.
    fn binary_op(&mut self, op: BinaryOp) -> VmResult<()> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.push(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
        })
    }

    fn run(&mut self, chunk: &Chunk) -> VmResult<Value> {
        let mut ip = 0usize;

        while ip < chunk.code.count() {
            #[cfg(feature = "trace")]
            {
                use crate::value::format_value;
                let mut stack_line = String::from("          ");
                for slot in &self.stack[..self.stack_top] {
                    stack_line.push_str(&format!("[ {} ]", format_value(*slot)));
                }
                println!("{stack_line}");
                let (text, _) = crate::debug::disassemble_instruction(chunk, ip);
                println!("{text}");
            }

            let op = chunk.code[ip];
            ip += 1;
            match op {
                OP_CONSTANT => {
                    let index = match chunk.code.get(ip) {
                        Some(&byte) => byte as usize,
                        None => return Err(RuntimeError::TruncatedChunk { offset: ip - 1 }),
                    };
                    ip += 1;
                    let len = chunk.constants.count();
                    match chunk.constants.get(index) {
                        Some(&constant) => self.push(constant)?,
                        None => return Err(RuntimeError::InvalidConstantIndex { index, len }),
                    }
                }
                OP_ADD => self.binary_op(BinaryOp::Add)?,
                OP_SUBTRACT => self.binary_op(BinaryOp::Subtract)?,
                OP_MULTIPLY => self.binary_op(BinaryOp::Multiply)?,
                OP_DIVIDE => self.binary_op(BinaryOp::Divide)?,
                OP_NEGATE => {
                    let value = self.pop()?;
                    self.push(-value)?;
                }
                OP_RETURN => return self.pop(),
                _ => return Err(RuntimeError::UnknownOpcode { op }),
            }
        }

        // Fell off the end of the instruction stream without OP_RETURN.
        Err(RuntimeError::TruncatedChunk { offset: ip })
    }
}

// ── Tests ────────────────────────────────────────────────────────────
