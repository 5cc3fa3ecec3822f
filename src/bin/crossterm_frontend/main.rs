use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use structopt::StructOpt;

use chip8_vm::config::Config;
use chip8_vm::emulator::keypad::NUM_KEYS;
use chip8_vm::scheduler::Scheduler;

mod crossterm_io;
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent};
use crossterm_io::{key_to_u8, CrosstermOutput};

/// Terminals only report presses, so a key is held this long after its last press.
const KEY_HOLD: Duration = Duration::from_millis(150);

/// The program options.
#[derive(StructOpt)]
struct Opt {
    /// Instructions per second
    #[structopt(long, default_value = "500")]
    hz: u32,

    /// Timer ticks per second
    #[structopt(long = "timer-hz", default_value = "60")]
    timer_hz: u32,

    /// Seed for the random number instruction
    #[structopt(long)]
    seed: Option<u64>,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    let config = Config { instruction_hz: opt.hz, timer_hz: opt.timer_hz, seed: opt.seed };
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let scheduler = Scheduler::spawn(&config, CrosstermOutput::new()?)?;
    scheduler.load(program);
    scheduler.start();

    // Input loop, the engine runs on its own thread
    let keypad = scheduler.keypad();
    let mut held: [Option<Instant>; NUM_KEYS] = [None; NUM_KEYS];
    loop {
        if poll(Duration::from_millis(10))? {
            if let Event::Key(KeyEvent { code, .. }) = read()? {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    code => {
                        if let Some(key) = key_to_u8(code) {
                            keypad.set_key(key, true);
                            held[key as usize] = Some(Instant::now());
                        }
                    }
                }
            }
        }

        for (key, pressed_at) in held.iter_mut().enumerate() {
            if pressed_at.map_or(false, |at| at.elapsed() >= KEY_HOLD) {
                keypad.set_key(key as u8, false);
                *pressed_at = None;
            }
        }
    }

    scheduler.shutdown()?;
    Ok(())
}
