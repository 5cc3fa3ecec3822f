use std::error::Error;
use std::path::PathBuf;

use structopt::StructOpt;

use chip8_vm::config::Config;
use chip8_vm::emulator::Emulator;

/// Run a CHIP-8 program headless for a fixed number of instructions.
#[derive(StructOpt, Debug)]
#[structopt(name = "chip8-vm")]
struct Opt {
    /// Instructions to execute before stopping
    #[structopt(short, long, default_value = "1000")]
    cycles: u64,

    /// Instruction rate, used to interleave timer ticks
    #[structopt(long, default_value = "500")]
    hz: u32,

    /// Timer rate
    #[structopt(long = "timer-hz", default_value = "60")]
    timer_hz: u32,

    /// Seed for the random number instruction
    #[structopt(long)]
    seed: Option<u64>,

    /// Print the final screen
    #[structopt(short, long)]
    dump: bool,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    rom: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    let config = Config { instruction_hz: opt.hz, timer_hz: opt.timer_hz, seed: opt.seed };
    config.validate()?;
    log::debug!("{:?}", config);
    log::info!("Executing {:?}", &opt.rom);
    let program = std::fs::read(&opt.rom)?;

    let mut emulator = match config.seed {
        Some(seed) => Emulator::with_seed(seed),
        None => Emulator::new(),
    };
    emulator.load_game(&program)?;

    // Virtual time: a timer tick falls due every hz / timer_hz instructions
    let mut timer_credit = 0u64;
    let mut beeps = 0;
    for _ in 0..opt.cycles {
        emulator.step()?;
        timer_credit += config.timer_hz as u64;
        while timer_credit >= config.instruction_hz as u64 {
            timer_credit -= config.instruction_hz as u64;
            if emulator.tick_timers() {
                beeps += 1;
            }
        }
    }

    log::info!("Stopped at pc {:#06x} after {} beeps", emulator.state().pc(), beeps);
    if opt.dump {
        print!("{}", emulator.snapshot());
    }

    Ok(())
}
