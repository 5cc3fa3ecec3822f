use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

pub const NUM_KEYS: usize = 16;

/// The 16-key input latch, packed one bit per key.
///
/// The engine holds the `Keypad` and only reads it. Input collaborators
/// write through a `KeypadHandle`, which may live on any thread.
#[derive(Debug, Default)]
pub struct Keypad {
    state: Arc<AtomicU16>,
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad { state: Arc::new(AtomicU16::new(0)) }
    }

    /// A writer handle for the input collaborator.
    pub fn handle(&self) -> KeypadHandle {
        KeypadHandle { state: self.state.clone() }
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.state.load(Ordering::Acquire) & (1 << (key & 0xF)) != 0
    }

    /// The lowest-indexed key currently held, if any.
    pub fn lowest_pressed(&self) -> Option<u8> {
        let state = self.state.load(Ordering::Acquire);
        if state == 0 {
            None
        } else {
            Some(state.trailing_zeros() as u8)
        }
    }
}

/// Write side of the key latch.
#[derive(Debug, Clone)]
pub struct KeypadHandle {
    state: Arc<AtomicU16>,
}

impl KeypadHandle {
    /// Set or release a single key. Keys outside 0x0..=0xF are ignored.
    pub fn set_key(&self, key: u8, pressed: bool) {
        if key as usize >= NUM_KEYS {
            log::warn!("Ignoring out of range key {:#x}", key);
            return;
        }
        let bit = 1 << key;
        if pressed {
            self.state.fetch_or(bit, Ordering::AcqRel);
        } else {
            self.state.fetch_and(!bit, Ordering::AcqRel);
        }
    }

    pub fn release_all(&self) {
        self.state.store(0, Ordering::Release);
    }
}
