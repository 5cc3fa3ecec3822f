use crate::emulator::error::Fault;
use crate::emulator::framebuffer::Frame;

/// Represents the rendering and audio side of a running emulator.
/// Implementations receive owned snapshots, never the live screen.
pub trait EmulatorOutput {
    /// Called with a copy of the screen whenever it changed.
    fn present(&mut self, frame: &Frame);

    /// Called once each time the sound timer runs out.
    fn beep(&mut self) {}

    /// Called once if execution halts on a fault.
    fn fault(&mut self, _fault: &Fault) {}
}

/// An output device that only counts what it was sent.
#[derive(Debug, Default)]
pub struct DummyOutput {
    pub frames: usize,
    pub beeps: usize,
}

impl DummyOutput {
    pub fn new() -> DummyOutput {
        DummyOutput::default()
    }
}

impl EmulatorOutput for DummyOutput {
    fn present(&mut self, _frame: &Frame) {
        self.frames += 1;
    }

    fn beep(&mut self) {
        self.beeps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::framebuffer::Framebuffer;
    use pretty_assertions::assert_eq;

    #[test]
    fn dummy_output_counts() {
        let mut output = DummyOutput::new();
        output.present(&Framebuffer::new().snapshot());
        output.beep();
        output.beep();
        output.fault(&Fault::StackUnderflow { pc: 0x200 });
        assert_eq!(1, output.frames);
        assert_eq!(2, output.beeps);
    }
}
