use chip8_vm::emulator::framebuffer::{Frame, SCREEN_HEIGHT};
use chip8_vm::emulator::output::EmulatorOutput;
use chip8_vm::emulator::Fault;

use crossterm::event::KeyCode;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{stdout, Write};

/// Draws frames into the alternate screen, two columns per pixel.
pub struct CrosstermOutput;

impl CrosstermOutput {
    pub fn new() -> crossterm::Result<CrosstermOutput> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        Ok(CrosstermOutput)
    }

    fn draw(&mut self, frame: &Frame) -> crossterm::Result<()> {
        let mut out = stdout();
        for (y, row) in frame.rows().enumerate() {
            let line: String = row.iter().map(|lit| if *lit { "██" } else { "  " }).collect();
            queue!(out, cursor::MoveTo(0, y as u16), Print(line))?;
        }
        out.flush()?;
        Ok(())
    }
}

impl Drop for CrosstermOutput {
    fn drop(&mut self) {
        let _ = execute!(stdout(), LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

impl EmulatorOutput for CrosstermOutput {
    fn present(&mut self, frame: &Frame) {
        if let Err(err) = self.draw(frame) {
            log::error!("Could not draw frame: {}", err);
        }
    }

    // The terminal bell is the only speaker we have
    fn beep(&mut self) {
        let mut out = stdout();
        let _ = write!(out, "\x07").and_then(|_| out.flush());
    }

    fn fault(&mut self, fault: &Fault) {
        let _ = execute!(
            stdout(),
            cursor::MoveTo(0, SCREEN_HEIGHT as u16 + 1),
            Print(format!("halted: {} (press q to quit)", fault))
        );
    }
}

/// Map 0-9 and a-f to keypad keys.
pub fn key_to_u8(key: KeyCode) -> Option<u8> {
    match key {
        KeyCode::Char(c) => c.to_digit(16).map(|c| c as u8),
        _ => None,
    }
}
