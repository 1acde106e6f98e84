//! Terminal rendering of the core's Markdown output.
//!
//! Everything the core displays is Markdown. With color enabled it goes
//! through termimad; otherwise it is printed as is.

use std::fmt::Display;

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Prints Markdown either styled or as plain text.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Green);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Renders the Markdown produced by `value`'s `Display`.
    pub fn render<T: Display + ?Sized>(&self, value: &T) -> Result<()> {
        let markdown = value.to_string();
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            if line.starts_with('#') {
                // Keep the hashes so heading levels stay visible
                println!("\x1b[36m{line}\x1b[0m");
            } else if let Some(done) = line.find("[x]") {
                // Dim finished tasks
                println!("{}\x1b[2m{}\x1b[0m", &line[..done], &line[done..]);
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
