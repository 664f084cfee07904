use crate::session::Dot;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Write};

const CORNER: char = '+';
const HORIZONTAL: char = '-';
const VERTICAL: char = '|';
const DOT: &str = "o";

/// Draws the arena. Coordinates are the server's; implementations clip them.
pub trait Renderer {
    fn draw_border(&mut self, height: i32, width: i32) -> io::Result<()>;

    /// Blanks the area inside the border, then places one dot per participant.
    fn draw_positions(&mut self, height: i32, width: i32, dots: &[Dot]) -> io::Result<()>;
}

/// Renders onto a terminal of fixed size with crossterm commands.
pub struct TerminalRenderer<W: Write> {
    out: W,
    columns: u16,
    rows: u16,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, columns: u16, rows: u16) -> Self {
        Self { out, columns, rows }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Arena size limited to what the terminal can show.
    fn visible(&self, height: i32, width: i32) -> (u16, u16) {
        (clip(height, self.rows), clip(width, self.columns))
    }

    fn cell(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let column = u16::try_from(x).ok().filter(|&c| c < self.columns)?;
        let row = u16::try_from(y).ok().filter(|&r| r < self.rows)?;
        Some((column, row))
    }
}

fn clip(extent: i32, limit: u16) -> u16 {
    u16::try_from(extent.max(0)).unwrap_or(u16::MAX).min(limit)
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw_border(&mut self, height: i32, width: i32) -> io::Result<()> {
        let (rows, columns) = self.visible(height, width);
        queue!(self.out, Clear(ClearType::All))?;

        if rows == 0 || columns == 0 {
            return self.out.flush();
        }

        let bottom = rows - 1;
        let right = columns - 1;

        for column in 0..columns {
            queue!(
                self.out,
                MoveTo(column, 0),
                Print(HORIZONTAL),
                MoveTo(column, bottom),
                Print(HORIZONTAL)
            )?;
        }
        for row in 1..bottom {
            queue!(
                self.out,
                MoveTo(0, row),
                Print(VERTICAL),
                MoveTo(right, row),
                Print(VERTICAL)
            )?;
        }
        for (column, row) in [(0, 0), (right, 0), (0, bottom), (right, bottom)] {
            queue!(self.out, MoveTo(column, row), Print(CORNER))?;
        }

        self.out.flush()
    }

    fn draw_positions(&mut self, height: i32, width: i32, dots: &[Dot]) -> io::Result<()> {
        let (rows, columns) = self.visible(height, width);

        if rows > 2 && columns > 2 {
            let blank = " ".repeat(usize::from(columns - 2));
            for row in 1..rows - 1 {
                queue!(self.out, MoveTo(1, row), Print(&blank))?;
            }
        }

        for dot in dots {
            let Some((column, row)) = self.cell(dot.x, dot.y) else {
                continue;
            };
            if dot.own {
                queue!(self.out, MoveTo(column, row), PrintStyledContent(DOT.bold()))?;
            } else {
                queue!(self.out, MoveTo(column, row), Print(DOT))?;
            }
        }

        self.out.flush()
    }
}

/// Raw mode plus alternate screen for as long as the guard lives.
///
/// Dropping the guard restores the terminal on every exit path, including
/// errors and interrupts.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(io::stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
