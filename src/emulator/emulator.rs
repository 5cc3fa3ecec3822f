//! The fetch-decode-execute engine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::emulator::error::Fault;
use crate::emulator::framebuffer::Frame;
use crate::emulator::instruction::*;
use crate::emulator::keypad::KeypadHandle;
use crate::emulator::machine::{MachineState, FLAG, FONT_SPRITE_LEN, MEM_SIZE};

/// Where the engine is in its run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Fetching and executing instructions.
    Running,
    /// Parked on `FX0A` until a key is pressed; the key goes into the register.
    AwaitingKey(Reg),
    /// Halted on a fault until the next `reset()`.
    Faulted(Fault),
}

/// One CHIP-8 session. Nothing here is global, so any number of
/// emulators may run side by side.
pub struct Emulator {
    state: MachineState,
    run_state: RunState,
    rng: StdRng,
    frame_dirty: bool,
    beep: bool,
}

impl Emulator {
    /// Create a new emulator with an entropy-seeded random source.
    pub fn new() -> Emulator {
        Emulator::with_rng(StdRng::from_entropy())
    }

    /// Create a new emulator whose `CXNN` results are reproducible.
    pub fn with_seed(seed: u64) -> Emulator {
        Emulator::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Emulator {
        Emulator {
            state: MachineState::new(),
            run_state: RunState::Running,
            rng,
            frame_dirty: true,
            beep: false,
        }
    }

    /// Return to power-on state. Writer handles from `keypad()` stay valid.
    pub fn reset(&mut self) {
        log::debug!("Resetting emulator");
        self.state.reset();
        self.run_state = RunState::Running;
        self.frame_dirty = true;
        self.beep = false;
    }

    /// Copy a program into memory at 0x200. Call `reset()` first
    /// when replacing a program.
    pub fn load_game(&mut self, program: &[u8]) -> Result<(), Fault> {
        log::debug!("Loading {} program bytes", program.len());
        self.state.load_game(program)
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    /// A writer handle for the input collaborator.
    pub fn keypad(&self) -> KeypadHandle {
        self.state.keypad.handle()
    }

    /// Copy of the current screen, regardless of the dirty flag.
    pub fn snapshot(&self) -> Frame {
        self.state.screen.snapshot()
    }

    /// A copy of the screen if it changed since the last call.
    pub fn take_frame(&mut self) -> Option<Frame> {
        if self.frame_dirty {
            self.frame_dirty = false;
            Some(self.state.screen.snapshot())
        } else {
            None
        }
    }

    /// Whether a beep was raised since the last call.
    pub fn take_beep(&mut self) -> bool {
        std::mem::replace(&mut self.beep, false)
    }

    /// One 60Hz timer tick. Returns `true` if this tick beeped.
    pub fn tick_timers(&mut self) -> bool {
        let beep = self.state.timers.tick();
        if beep {
            log::debug!("Beep");
            self.beep = true;
        }
        beep
    }

    /// Perform a single step: fetch, decode and execute one instruction,
    /// or poll the keypad once while awaiting a key.
    pub fn step(&mut self) -> Result<(), Fault> {
        match self.run_state {
            RunState::Faulted(ref fault) => return Err(fault.clone()),
            RunState::AwaitingKey(reg) => {
                self.poll_key(reg);
                return Ok(());
            }
            RunState::Running => {}
        }

        let pc = self.state.pc();
        let result = self.state.fetch().and_then(|opcode| {
            let instruction = Instruction::decode(opcode).ok_or(Fault::UnknownOpcode { opcode, pc })?;
            log::trace!("{:#06x}: {:#06x} {:?}", pc, opcode, instruction);
            self.execute_single(instruction)
        });
        self.record(result)
    }

    /// Execute an instruction directly, as if it had been fetched at pc.
    pub fn execute(&mut self, instruction: Instruction) -> Result<(), Fault> {
        if let RunState::Faulted(ref fault) = self.run_state {
            return Err(fault.clone());
        }
        let result = self.execute_single(instruction);
        self.record(result)
    }

    /// Execute many instructions sequentially, stopping at the first fault.
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> Result<(), Fault> {
        instructions.iter().try_for_each(|instruction| self.execute(*instruction))
    }

    fn record(&mut self, result: Result<(), Fault>) -> Result<(), Fault> {
        if let Err(ref fault) = result {
            log::error!("Halting: {}", fault);
            self.run_state = RunState::Faulted(fault.clone());
        }
        result
    }

    fn poll_key(&mut self, Reg(x): Reg) {
        if let Some(key) = self.state.keypad.lowest_pressed() {
            log::debug!("Key {:#x} satisfies wait into V{:X}", key, x);
            self.state.registers[x as usize] = key;
            self.state.program_counter += 2;
            self.run_state = RunState::Running;
        }
    }

    fn skip_if(&mut self, condition: bool) {
        self.state.program_counter += if condition { 4 } else { 2 };
    }

    /// Execute a single instruction. Every arm owns its pc update.
    fn execute_single(&mut self, instruction: Instruction) -> Result<(), Fault> {
        let pc = self.state.program_counter;
        let v = &mut self.state.registers;

        match instruction {

            // Clear the screen
            Instruction::ClearScreen => {
                self.state.screen.clear();
                self.frame_dirty = true;
                self.state.program_counter += 2;
            }

            // Return to the instruction after the call site
            Instruction::Return => {
                let call_site = self.state.pop()?;
                self.state.program_counter = call_site + 2;
            }

            Instruction::Goto(Addr(addr)) => {
                self.state.program_counter = addr;
            }

            // Store the call site on the stack, then jump
            Instruction::Call(Addr(addr)) => {
                self.state.push(pc)?;
                self.state.program_counter = addr;
            }

            Instruction::IfRegEqConst(Reg(x), Const(n)) => {
                let condition = v[x as usize] == n;
                self.skip_if(condition);
            }

            Instruction::IfRegNeqConst(Reg(x), Const(n)) => {
                let condition = v[x as usize] != n;
                self.skip_if(condition);
            }

            Instruction::IfRegEqReg(Reg(x), Reg(y)) => {
                let condition = v[x as usize] == v[y as usize];
                self.skip_if(condition);
            }

            Instruction::SetRegToConst(Reg(x), Const(n)) => {
                v[x as usize] = n;
                self.state.program_counter += 2;
            }

            // No carry flag for this one
            Instruction::IncRegByConst(Reg(x), Const(n)) => {
                v[x as usize] = v[x as usize].wrapping_add(n);
                self.state.program_counter += 2;
            }

            Instruction::SetRegToReg(Reg(x), Reg(y)) => {
                v[x as usize] = v[y as usize];
                self.state.program_counter += 2;
            }

            Instruction::BitwiseOr(Reg(x), Reg(y)) => {
                v[x as usize] |= v[y as usize];
                self.state.program_counter += 2;
            }

            Instruction::BitwiseAnd(Reg(x), Reg(y)) => {
                v[x as usize] &= v[y as usize];
                self.state.program_counter += 2;
            }

            Instruction::BitwiseXor(Reg(x), Reg(y)) => {
                v[x as usize] ^= v[y as usize];
                self.state.program_counter += 2;
            }

            // VF is 1 on carry
            Instruction::IncRegByReg(Reg(x), Reg(y)) => {
                let (sum, carry) = v[x as usize].overflowing_add(v[y as usize]);
                v[FLAG] = carry as u8;
                v[x as usize] = sum;
                self.state.program_counter += 2;
            }

            // VF is 1 when there is no borrow
            Instruction::DecRegByReg(Reg(x), Reg(y)) => {
                let (vx, vy) = (v[x as usize], v[y as usize]);
                v[FLAG] = (vx >= vy) as u8;
                v[x as usize] = vx.wrapping_sub(vy);
                self.state.program_counter += 2;
            }

            Instruction::BitshiftRight(Reg(x), _) => {
                let vx = v[x as usize];
                v[FLAG] = vx & 1;
                v[x as usize] = vx >> 1;
                self.state.program_counter += 2;
            }

            Instruction::SetVxVyMinusVx(Reg(x), Reg(y)) => {
                let (vx, vy) = (v[x as usize], v[y as usize]);
                v[FLAG] = (vy >= vx) as u8;
                v[x as usize] = vy.wrapping_sub(vx);
                self.state.program_counter += 2;
            }

            Instruction::BitshiftLeft(Reg(x), _) => {
                let vx = v[x as usize];
                v[FLAG] = (vx >> 7) & 1;
                v[x as usize] = vx << 1;
                self.state.program_counter += 2;
            }

            Instruction::IfRegNeqReg(Reg(x), Reg(y)) => {
                let condition = v[x as usize] != v[y as usize];
                self.skip_if(condition);
            }

            Instruction::SetI(Addr(addr)) => {
                self.state.i = addr;
                self.state.program_counter += 2;
            }

            Instruction::SetPcToV0PlusAddr(Addr(addr)) => {
                let target = addr as usize + v[0] as usize;
                if target >= MEM_SIZE {
                    return Err(Fault::OutOfRangeAddress { addr: target, pc });
                }
                self.state.program_counter = target as u16;
            }

            Instruction::SetVxRand(Reg(x), Const(n)) => {
                v[x as usize] = self.rng.gen::<u8>() & n;
                self.state.program_counter += 2;
            }

            Instruction::Draw(Reg(x), Reg(y), Const(sprite_height)) => {
                let x_coord = v[x as usize] as usize;
                let y_coord = v[y as usize] as usize;
                self.draw(x_coord, y_coord, sprite_height as usize)?;
                self.state.program_counter += 2;
            }

            Instruction::IfKeyEqVx(Reg(x)) => {
                let condition = self.state.keypad.is_pressed(v[x as usize]);
                self.skip_if(condition);
            }

            Instruction::IfKeyNeqVx(Reg(x)) => {
                let condition = !self.state.keypad.is_pressed(v[x as usize]);
                self.skip_if(condition);
            }

            Instruction::SetRegToDelayTimer(Reg(x)) => {
                v[x as usize] = self.state.timers.delay;
                self.state.program_counter += 2;
            }

            // Park until the keypad is polled with a key down. pc stays put.
            Instruction::SetRegToGetKey(reg) => {
                log::debug!("Awaiting key at {:#06x}", pc);
                self.run_state = RunState::AwaitingKey(reg);
            }

            Instruction::SetDelayTimerToReg(Reg(x)) => {
                self.state.timers.delay = v[x as usize];
                self.state.program_counter += 2;
            }

            Instruction::SetSoundTimerToReg(Reg(x)) => {
                self.state.timers.sound = v[x as usize];
                self.state.program_counter += 2;
            }

            Instruction::AddRegToI(Reg(x)) => {
                self.state.i = (self.state.i + v[x as usize] as u16) % MEM_SIZE as u16;
                self.state.program_counter += 2;
            }

            // Each font glyph is 5 bytes long, starting at 0
            Instruction::SetIToSpriteAddrVx(Reg(x)) => {
                self.state.i = v[x as usize] as u16 * FONT_SPRITE_LEN;
                self.state.program_counter += 2;
            }

            Instruction::SetIToBcdOfReg(Reg(x)) => {
                let value = v[x as usize];
                let i = self.state.i as usize;
                self.state.read_range(i, 3)?;
                self.state.write(i, value / 100)?;
                self.state.write(i + 1, value / 10 % 10)?;
                self.state.write(i + 2, value % 10)?;
                self.state.program_counter += 2;
            }

            // Dump V0 through Vx to memory, I is left alone
            Instruction::RegDump(Reg(x)) => {
                let i = self.state.i as usize;
                let count = x as usize + 1;
                self.state.read_range(i, count)?;
                let registers = self.state.registers;
                self.state.memory[i..i + count].copy_from_slice(&registers[..count]);
                self.state.program_counter += 2;
            }

            // Load V0 through Vx from memory, I is left alone
            Instruction::RegLoad(Reg(x)) => {
                let i = self.state.i as usize;
                let count = x as usize + 1;
                let bytes = self.state.read_range(i, count)?.to_vec();
                self.state.registers[..count].copy_from_slice(&bytes);
                self.state.program_counter += 2;
            }
        };

        Ok(())
    }

    /// XOR an 8-pixel-wide sprite of `height` rows from memory at I onto the
    /// screen, wrapping at the edges. VF ends up 1 if any lit pixel was erased.
    fn draw(&mut self, x_coord: usize, y_coord: usize, height: usize) -> Result<(), Fault> {
        let sprite = self.state.read_range(self.state.i as usize, height)?.to_vec();

        let mut collision = false;
        for (row_no, &row) in sprite.iter().enumerate() {
            for bit in 0..8 {
                if row >> (7 - bit) & 1 == 1 {
                    collision |= self.state.screen.xor(x_coord + bit, y_coord + row_no);
                }
            }
        }

        self.state.registers[FLAG] = collision as u8;
        self.frame_dirty = true;
        Ok(())
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
