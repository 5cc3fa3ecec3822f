/// The delay and sound timers, counted down at 60Hz by the scheduler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    /// Count both timers down once. Returns `true` when the sound timer
    /// runs out on this tick, which is the moment to beep.
    pub fn tick(&mut self) -> bool {
        if self.delay > 0 {
            self.delay -= 1;
        }

        let mut beep = false;
        if self.sound > 0 {
            beep = self.sound == 1;
            self.sound -= 1;
        }
        beep
    }
}
