pub mod emulator;
pub mod error;
pub mod framebuffer;
pub mod instruction;
pub mod keypad;
pub mod machine;
pub mod output;
pub mod timer;

pub use self::emulator::{Emulator, RunState};
pub use self::error::Fault;
pub use self::framebuffer::Frame;
pub use self::keypad::KeypadHandle;
