/*!

A CHIP-8 interpreter core as specified at https://en.wikipedia.org/wiki/CHIP-8.

# Crossterm Frontend

If you want to try the emulator on some programs, there is a ready-to-use implementation
you can run by using `cargo run --release --bin crossterm_frontend -- <program>`.
You can then use the keys 0-9 and a-f to give input, but which ones to use depend on the CHIP-8 program.
Press `q` or `Esc` to quit.

# Library

The engine is a plain session object. Load a program and step it yourself:

```rust
use chip8_vm::emulator::Emulator;

let mut emulator = Emulator::with_seed(7);

// Load a program at address 0x200.
let clear_display = [0x00, 0xE0];
emulator.load_game(&clear_display).unwrap();
emulator.step().unwrap(); // Will now clear the display
assert_eq!(emulator.state().pc(), 0x202);
```

Alternatively, you can experiment by executing instructions manually.

```rust
use chip8_vm::emulator::Emulator;
use chip8_vm::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut emulator = Emulator::with_seed(7);

emulator.execute(Instruction::ClearScreen).unwrap();

emulator.execute_many(&[
    Instruction::Goto(Addr(0x250)),
    Instruction::SetRegToConst(Reg(0xA), Const(35)),
    Instruction::SetRegToReg(Reg(0xB), Reg(0xA))
]).unwrap();
assert_eq!(emulator.state().register(0xB), 35);
```

Timers are not tied to `step()`. Call `tick_timers()` at 60Hz, however many
instructions run in between, and collect `take_frame()` / `take_beep()` for
your renderer and speaker.

## Running on a thread

`Scheduler` owns an emulator on a dedicated thread and paces instructions and
timers at two independent rates. Implement `EmulatorOutput` to receive frame
snapshots and beeps, and write keys through the `KeypadHandle` it hands out.

```ignore
use chip8_vm::{config::Config, scheduler::Scheduler};

let scheduler = Scheduler::spawn(&Config::default(), MyOutput::new())?;
scheduler.load(program);
scheduler.start();
scheduler.set_key(0xA, true);
```
*/

pub mod config;
pub mod emulator;
pub mod scheduler;
pub mod util;
