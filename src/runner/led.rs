//! Terminal LED panel.
//!
//! Paints the VIA's two output ports as rows of LEDs, bit 7 on the left,
//! overwriting the same line on every change.

use std::io::{self, Write};

use termion::color;

pub struct LedPanel {
    last: Option<(u8, u8)>,
}

impl LedPanel {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Redraw if either port changed since the last call.
    pub fn refresh(&mut self, port_a: u8, port_b: u8) -> io::Result<()> {
        if self.last == Some((port_a, port_b)) {
            return Ok(());
        }
        self.last = Some((port_a, port_b));
        let mut out = io::stdout();
        write!(out, "\r  PA {}   PB {} ", row(port_a), row(port_b))?;
        out.flush()
    }
}

impl Default for LedPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn row(bits: u8) -> String {
    let mut s = String::new();
    for bit in (0..8).rev() {
        if bits & (1 << bit) != 0 {
            s.push_str(&format!(
                "{}●{}",
                color::Fg(color::LightRed),
                color::Fg(color::Reset)
            ));
        } else {
            s.push_str(&format!(
                "{}○{}",
                color::Fg(color::LightBlack),
                color::Fg(color::Reset)
            ));
        }
    }
    s
}
