use thiserror::Error;

/// A fatal fault raised by the engine.
///
/// Faults terminate the run. The engine never retries on its own; a supervisor
/// may call `reset()` and reload a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("unknown opcode {opcode:#06x} at pc {pc:#06x}")]
    UnknownOpcode { opcode: u16, pc: u16 },
    #[error("stack overflow at pc {pc:#06x}")]
    StackOverflow { pc: u16 },
    #[error("stack underflow at pc {pc:#06x}")]
    StackUnderflow { pc: u16 },
    #[error("address {addr:#06x} out of range at pc {pc:#06x}")]
    OutOfRangeAddress { addr: usize, pc: u16 },
}
