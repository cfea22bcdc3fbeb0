//! Display collaborator interface.
//!
//! The panel is bilevel: a pixel is ink or background, nothing between.
//! Pixel writes mutate an off-screen buffer inside the implementation;
//! nothing reaches the glass until [`refresh`](DisplayPanel::refresh).

/// A bilevel memory display.
pub trait DisplayPanel {
    /// Panel resolution as (width, height) in pixels.
    fn size(&self) -> (u32, u32);

    /// Set one pixel in the off-screen buffer. `on` means ink.
    /// Out-of-bounds coordinates are ignored.
    fn set_pixel(&mut self, x: u32, y: u32, on: bool);

    /// Fill the whole off-screen buffer with one level.
    fn clear(&mut self, on: bool) {
        let (width, height) = self.size();
        for y in 0..height {
            for x in 0..width {
                self.set_pixel(x, y, on);
            }
        }
    }

    /// Push the off-screen buffer to the glass. Full-screen only; the
    /// panel has no partial refresh.
    fn refresh(&mut self);
}
