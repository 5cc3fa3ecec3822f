use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

type Pixels = [[bool; SCREEN_WIDTH]; SCREEN_HEIGHT];
const EMPTY_SCREEN: Pixels = [[false; SCREEN_WIDTH]; SCREEN_HEIGHT];

/// The live 64x32 monochrome screen owned by the engine.
#[derive(Clone)]
pub struct Framebuffer {
    pixels: Pixels,
}

impl Framebuffer {
    pub fn new() -> Framebuffer {
        Framebuffer { pixels: EMPTY_SCREEN }
    }

    pub fn clear(&mut self) {
        self.pixels = EMPTY_SCREEN;
    }

    /// Coordinates wrap around both edges.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y % SCREEN_HEIGHT][x % SCREEN_WIDTH]
    }

    /// Flip a pixel, returning whether it was set before the flip.
    /// Coordinates wrap around both edges.
    pub fn xor(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.pixels[y % SCREEN_HEIGHT][x % SCREEN_WIDTH];
        let was_set = *pixel;
        *pixel = !was_set;
        was_set
    }

    /// Take an owned copy for a renderer.
    pub fn snapshot(&self) -> Frame {
        Frame { pixels: self.pixels }
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable copy of the screen, safe to hand to another thread.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Pixels,
}

impl Frame {
    /// Coordinates wrap around both edges, like the live screen.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y % SCREEN_HEIGHT][x % SCREEN_WIDTH]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool; SCREEN_WIDTH]> {
        self.pixels.iter()
    }

    pub fn count_lit(&self) -> usize {
        self.pixels.iter().flatten().filter(|p| **p).count()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for c in row.iter() {
                write!(f, "{}", if *c { "#" } else { " " })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({} lit)\n{}", self.count_lit(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn xor_reports_previous_state() {
        let mut screen = Framebuffer::new();
        assert_eq!(false, screen.xor(3, 4));
        assert_eq!(true, screen.get(3, 4));
        assert_eq!(true, screen.xor(3, 4));
        assert_eq!(false, screen.get(3, 4));
    }

    #[test]
    fn coordinates_wrap() {
        let mut screen = Framebuffer::new();
        screen.xor(SCREEN_WIDTH + 1, SCREEN_HEIGHT + 2);
        assert!(screen.get(1, 2));
    }

    #[test]
    fn snapshot_is_detached_from_live_screen() {
        let mut screen = Framebuffer::new();
        screen.xor(0, 0);
        let frame = screen.snapshot();
        screen.clear();
        assert!(frame.get(0, 0));
        assert_eq!(0, screen.snapshot().count_lit());
    }

    #[test]
    fn frame_lookups_wrap() {
        let mut screen = Framebuffer::new();
        screen.xor(SCREEN_WIDTH - 1, 0);
        let frame = screen.snapshot();
        assert!(frame.get(2 * SCREEN_WIDTH - 1, SCREEN_HEIGHT));
        assert!(!frame.get(SCREEN_WIDTH, SCREEN_HEIGHT));
    }

    #[test]
    fn frame_displays_as_text() {
        let mut screen = Framebuffer::new();
        screen.xor(0, 0);
        let text = screen.snapshot().to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(SCREEN_WIDTH, first.len());
        assert!(first.starts_with("# "));
        assert_eq!(SCREEN_HEIGHT, text.lines().count());
    }
}
