//! Drives an `Emulator` on its own thread.
//!
//! Instructions and timers are paced separately: a `Pacer` per rate turns
//! elapsed wall-clock time into a number of due ticks. Frames and beeps are
//! handed to an `EmulatorOutput` after each batch, and input arrives through
//! the keypad handle at any time.

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::emulator::output::EmulatorOutput;
use crate::emulator::{Emulator, Fault, KeypadHandle};

/// Converts elapsed time into a count of ticks for one fixed rate.
#[derive(Debug, Clone)]
pub struct Pacer {
    period: Duration,
    next: Instant,
    max_burst: u32,
}

impl Pacer {
    /// The first tick is due at `start`.
    pub fn new(hz: u32, start: Instant) -> Pacer {
        let hz = hz.max(1);
        Pacer {
            period: Duration::from_nanos(1_000_000_000 / hz as u64),
            next: start,
            max_burst: (hz / 4).max(1),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of ticks that fell due up to `now`.
    /// After a long stall at most a quarter second of ticks is replayed.
    pub fn due(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }
        let behind = (now - self.next).as_nanos() / self.period.as_nanos();
        let ticks = behind.min(u32::MAX as u128 - 1) as u32 + 1;
        self.next += self.period * ticks;
        if ticks > self.max_burst {
            log::warn!("Fell behind by {} ticks, replaying {}", ticks, self.max_burst);
            return self.max_burst;
        }
        ticks
    }

    /// Time left until the next tick falls due.
    pub fn until_next(&self, now: Instant) -> Duration {
        if now < self.next {
            self.next - now
        } else {
            Duration::from_secs(0)
        }
    }

    /// Forget any backlog, for example after a pause.
    pub fn restart(&mut self, now: Instant) {
        self.next = now;
    }
}

pub enum Command {
    /// Reset the machine and load a new program.
    Load(Vec<u8>),
    Start,
    Pause,
    Shutdown,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Load(program) => write!(f, "Load({} bytes)", program.len()),
            Command::Start => write!(f, "Start"),
            Command::Pause => write!(f, "Pause"),
            Command::Shutdown => write!(f, "Shutdown"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not start engine thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Owns the engine thread. Dropping it shuts the thread down.
pub struct Scheduler {
    commands: Sender<Command>,
    keypad: KeypadHandle,
    halted: Arc<AtomicBool>,
    worker: Option<JoinHandle<Result<(), Fault>>>,
}

impl Scheduler {
    /// Start a paused engine thread that reports to `output`.
    pub fn spawn<O>(config: &Config, output: O) -> Result<Scheduler, SchedulerError>
    where
        O: EmulatorOutput + Send + 'static,
    {
        config.validate()?;

        let emulator = match config.seed {
            Some(seed) => Emulator::with_seed(seed),
            None => Emulator::new(),
        };
        let keypad = emulator.keypad();
        let halted = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = channel();

        let now = Instant::now();
        let worker = Worker {
            emulator,
            output,
            commands: receiver,
            running: false,
            steps: Pacer::new(config.instruction_hz, now),
            timers: Pacer::new(config.timer_hz, now),
            halted: halted.clone(),
        };
        let handle = thread::Builder::new()
            .name("chip8-engine".into())
            .spawn(move || worker.run())?;

        log::debug!(
            "Engine thread started at {} Hz, timers at {} Hz",
            config.instruction_hz,
            config.timer_hz
        );

        Ok(Scheduler {
            commands: sender,
            keypad,
            halted,
            worker: Some(handle),
        })
    }

    fn send(&self, command: Command) {
        if let Err(err) = self.commands.send(command) {
            log::debug!("Engine thread is gone, dropped {:?}", err.0);
        }
    }

    /// Reset the machine and load `program` at 0x200.
    pub fn load(&self, program: Vec<u8>) {
        self.send(Command::Load(program));
    }

    pub fn start(&self) {
        self.send(Command::Start);
    }

    pub fn pause(&self) {
        self.send(Command::Pause);
    }

    /// The single writer of the key latch.
    pub fn keypad(&self) -> KeypadHandle {
        self.keypad.clone()
    }

    pub fn set_key(&self, key: u8, pressed: bool) {
        self.keypad.set_key(key, pressed);
    }

    /// Whether the engine thread has stopped, on a fault or otherwise.
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    /// Stop the engine thread and return the fault that halted it, if any.
    pub fn shutdown(mut self) -> Result<(), Fault> {
        self.stop()
    }

    fn stop(&mut self) -> Result<(), Fault> {
        self.send(Command::Shutdown);
        match self.worker.take() {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                log::error!("Engine thread panicked");
                Ok(())
            }),
            None => Ok(()),
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

struct Worker<O> {
    emulator: Emulator,
    output: O,
    commands: Receiver<Command>,
    running: bool,
    steps: Pacer,
    timers: Pacer,
    halted: Arc<AtomicBool>,
}

impl<O: EmulatorOutput> Worker<O> {
    fn run(mut self) -> Result<(), Fault> {
        let result = self.event_loop();
        self.halted.store(true, Ordering::Release);
        if let Err(ref fault) = result {
            self.output.fault(fault);
        }
        log::debug!("Engine thread stopped");
        result
    }

    fn event_loop(&mut self) -> Result<(), Fault> {
        loop {
            // Block while paused, poll while running
            let command = if self.running {
                match self.commands.try_recv() {
                    Ok(command) => Some(command),
                    Err(TryRecvError::Empty) => None,
                    Err(TryRecvError::Disconnected) => Some(Command::Shutdown),
                }
            } else {
                Some(self.commands.recv().unwrap_or(Command::Shutdown))
            };

            if let Some(command) = command {
                if !self.handle(command)? {
                    return Ok(());
                }
                continue;
            }

            let now = Instant::now();
            self.tick(now)?;
            let now = Instant::now();
            thread::sleep(self.steps.until_next(now).min(self.timers.until_next(now)));
        }
    }

    /// Returns `false` once the loop should end.
    fn handle(&mut self, command: Command) -> Result<bool, Fault> {
        log::debug!("Engine command {:?}", command);
        match command {
            Command::Load(program) => {
                self.emulator.reset();
                self.emulator.load_game(&program)?;
                self.flush();
            }
            Command::Start => {
                let now = Instant::now();
                self.steps.restart(now);
                self.timers.restart(now);
                self.running = true;
            }
            Command::Pause => self.running = false,
            Command::Shutdown => return Ok(false),
        }
        Ok(true)
    }

    fn tick(&mut self, now: Instant) -> Result<(), Fault> {
        for _ in 0..self.steps.due(now) {
            self.emulator.step()?;
        }
        for _ in 0..self.timers.due(now) {
            self.emulator.tick_timers();
        }
        self.flush();
        Ok(())
    }

    fn flush(&mut self) {
        if let Some(frame) = self.emulator.take_frame() {
            self.output.present(&frame);
        }
        if self.emulator.take_beep() {
            self.output.beep();
        }
    }
}
