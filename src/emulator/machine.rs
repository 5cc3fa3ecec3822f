//! The CHIP-8 machine state as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use crate::emulator::error::Fault;
use crate::emulator::framebuffer::Framebuffer;
use crate::emulator::keypad::Keypad;
use crate::emulator::timer::Timers;

pub const MEM_SIZE: usize = 4096;
pub const NUM_REGISTERS: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const PC_START: u16 = 0x200;
pub const FLAG: usize = 0xF;
pub const FONT_SPRITE_LEN: u16 = 5;
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Everything the interpreter mutates. Owned by exactly one `Emulator`.
pub struct MachineState {
    pub(crate) memory: [u8; MEM_SIZE],
    pub(crate) registers: [u8; NUM_REGISTERS],
    pub(crate) timers: Timers,
    pub(crate) i: u16,
    pub(crate) program_counter: u16,
    pub(crate) stack_pointer: usize,
    pub(crate) stack: [u16; STACK_SIZE],
    pub(crate) screen: Framebuffer,
    pub(crate) keypad: Keypad,
}

impl MachineState {
    pub fn new() -> MachineState {
        let mut state = MachineState {
            memory: [0; MEM_SIZE],
            registers: [0; NUM_REGISTERS],
            timers: Timers::default(),
            i: 0,
            program_counter: PC_START,
            stack_pointer: 0,
            stack: [0; STACK_SIZE],
            screen: Framebuffer::new(),
            keypad: Keypad::new(),
        };
        state.reset();
        state
    }

    /// Zero everything, install the font and point pc at the program area.
    /// The keypad keeps its identity so existing writer handles stay connected.
    pub fn reset(&mut self) {
        self.memory = [0; MEM_SIZE];
        self.memory[..FONT.len()].copy_from_slice(&FONT);
        self.registers = [0; NUM_REGISTERS];
        self.timers = Timers::default();
        self.i = 0;
        self.program_counter = PC_START;
        self.stack_pointer = 0;
        self.stack = [0; STACK_SIZE];
        self.screen.clear();
        self.keypad.handle().release_all();
    }

    /// Copy a program into memory at 0x200. Nothing else is touched.
    pub fn load_game(&mut self, program: &[u8]) -> Result<(), Fault> {
        let start = PC_START as usize;
        let end = start + program.len();
        if end > MEM_SIZE {
            return Err(Fault::OutOfRangeAddress { addr: end - 1, pc: self.program_counter });
        }
        self.memory[start..end].copy_from_slice(program);
        Ok(())
    }

    fn check(&self, addr: usize) -> Result<usize, Fault> {
        if addr < MEM_SIZE {
            Ok(addr)
        } else {
            Err(Fault::OutOfRangeAddress { addr, pc: self.program_counter })
        }
    }

    pub fn read(&self, addr: usize) -> Result<u8, Fault> {
        Ok(self.memory[self.check(addr)?])
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<(), Fault> {
        let addr = self.check(addr)?;
        self.memory[addr] = value;
        Ok(())
    }

    /// `len` bytes starting at `addr`; every byte must be addressable.
    pub fn read_range(&self, addr: usize, len: usize) -> Result<&[u8], Fault> {
        if len > 0 {
            self.check(addr + len - 1)?;
        }
        let start = self.check(addr)?;
        Ok(&self.memory[start..start + len])
    }

    /// Fetch the big-endian opcode at pc.
    pub fn fetch(&self) -> Result<u16, Fault> {
        let pc = self.program_counter as usize;
        Ok(u16::from_be_bytes([self.read(pc)?, self.read(pc + 1)?]))
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Fault> {
        if self.stack_pointer >= STACK_SIZE {
            return Err(Fault::StackOverflow { pc: self.program_counter });
        }
        self.stack[self.stack_pointer] = addr;
        self.stack_pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.stack_pointer == 0 {
            return Err(Fault::StackUnderflow { pc: self.program_counter });
        }
        self.stack_pointer -= 1;
        Ok(self.stack[self.stack_pointer])
    }

    pub fn register(&self, n: usize) -> u8 {
        self.registers[n]
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn pc(&self) -> u16 {
        self.program_counter
    }

    pub fn sp(&self) -> usize {
        self.stack_pointer
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.screen.get(x, y)
    }
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}
