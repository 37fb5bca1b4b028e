//! Terminal rendering surface: every cell shows two stacked pixels with the upper-half block.

use crate::error::Result;
use crate::graphics::Framebuffer;
use crate::input::{cells_to_viewport, ButtonRect, HudButton};
use crate::picking::Viewport;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{Stdout, Write};
use std::time::{Duration, Instant};

const UPPER_HALF_BLOCK: char = '▀';
const HINTS: &str = "double-click: explode  click photo: focus  drag: orbit  wheel: zoom  \
                     r: reset  m: music  d: debug  p: pause  q: quit";
const RESET_LABEL: &str = "[ Reset ]";
const MUSIC_LABEL: &str = "[ ♪ Music ]";
const TEXT: Color = Color::Rgb {
    r: 235,
    g: 235,
    b: 235,
};
const PANEL: Color = Color::Rgb { r: 0, g: 0, b: 0 };
const BUTTON: Color = Color::Rgb {
    r: 120,
    g: 30,
    b: 30,
};

/// Text drawn over the picture
#[derive(Clone, Debug, Default)]
pub struct Hud {
    /// The reset control is only offered while exploded
    pub show_reset: bool,
    pub paused: bool,
    pub debug: Option<Vec<String>>,
}

/// Lays out the bottom-row controls for a terminal of the given size
pub fn layout_buttons(columns: u16, rows: u16, show_reset: bool) -> Vec<ButtonRect> {
    if rows == 0 {
        return Vec::new();
    }
    let row = rows - 1;
    let mut buttons = Vec::new();
    let music_width = MUSIC_LABEL.chars().count() as u16;
    if columns > music_width {
        buttons.push(ButtonRect {
            button: HudButton::Music,
            column: columns - music_width - 1,
            row,
            width: music_width,
        });
    }
    let reset_width = RESET_LABEL.chars().count() as u16;
    let reset_column = columns.saturating_sub(reset_width) / 2;
    let music_column = buttons.first().map_or(0, |music| music.column);
    if show_reset && reset_column + reset_width < music_column {
        buttons.push(ButtonRect {
            button: HudButton::Reset,
            column: reset_column,
            row,
            width: reset_width,
        });
    }
    buttons
}

/// The terminal in raw mode on the alternate screen with mouse capture.
/// Everything is restored on drop.
pub struct TerminalSurface {
    out: Stdout,
    columns: u16,
    rows: u16,
    buttons: Vec<ButtonRect>,
}

impl TerminalSurface {
    pub fn enter() -> Result<Self> {
        let (columns, rows) = match termsize::get() {
            Some(size) => (size.cols, size.rows),
            None => terminal::size()?,
        };

        terminal::enable_raw_mode()?;
        let mut out = std::io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide,
            Clear(ClearType::All)
        )?;
        log::info!("terminal surface: {columns}x{rows} cells");

        Ok(TerminalSurface {
            out,
            columns,
            rows,
            buttons: Vec::new(),
        })
    }

    pub fn viewport(&self) -> Viewport {
        cells_to_viewport(self.columns, self.rows)
    }

    /// Adopts a new pixel size; each cell is two pixels tall
    pub fn resize(&mut self, viewport: Viewport) {
        self.columns = viewport.width.min(u16::MAX as usize) as u16;
        self.rows = (viewport.height / 2).min(u16::MAX as usize) as u16;
    }

    /// HUD controls drawn by the last [`present`](Self::present)
    pub fn buttons(&self) -> &[ButtonRect] {
        &self.buttons
    }

    /// Waits up to `timeout` for a terminal event
    pub fn poll(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Draws the framebuffer and the HUD, then flushes
    pub fn present(&mut self, framebuffer: &Framebuffer, hud: &Hud) -> Result<()> {
        let columns = (self.columns as usize).min(framebuffer.width());
        let rows = (self.rows as usize).min(framebuffer.height() / 2);

        for row in 0..rows {
            queue!(self.out, MoveTo(0, row as u16))?;
            let mut colors: Option<([u8; 3], [u8; 3])> = None;
            for column in 0..columns {
                let top = framebuffer.pixel(column, row * 2);
                let bottom = framebuffer.pixel(column, row * 2 + 1);
                if colors != Some((top, bottom)) {
                    queue!(
                        self.out,
                        SetForegroundColor(rgb(top)),
                        SetBackgroundColor(rgb(bottom))
                    )?;
                    colors = Some((top, bottom));
                }
                queue!(self.out, Print(UPPER_HALF_BLOCK))?;
            }
        }

        self.draw_hud(hud)?;
        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }

    fn draw_hud(&mut self, hud: &Hud) -> Result<()> {
        let width = self.columns as usize;
        self.label(0, 0, &truncate(&format!(" tree3d  {HINTS}"), width), PANEL)?;

        if let Some(lines) = &hud.debug {
            for (i, line) in lines.iter().enumerate() {
                let row = i as u16 + 1;
                if row + 1 >= self.rows {
                    break;
                }
                self.label(0, row, &truncate(&format!(" {line} "), width), PANEL)?;
            }
        }

        if hud.paused && self.rows > 2 {
            let text = " Paused ";
            let column = (self.columns.saturating_sub(text.len() as u16)) / 2;
            self.label(column, self.rows / 2, text, PANEL)?;
        }

        self.buttons = layout_buttons(self.columns, self.rows, hud.show_reset);
        for rect in self.buttons.clone() {
            let text = match rect.button {
                HudButton::Reset => RESET_LABEL,
                HudButton::Music => MUSIC_LABEL,
            };
            self.label(rect.column, rect.row, text, BUTTON)?;
        }
        Ok(())
    }

    fn label(&mut self, column: u16, row: u16, text: &str, background: Color) -> Result<()> {
        queue!(
            self.out,
            MoveTo(column, row),
            SetForegroundColor(TEXT),
            SetBackgroundColor(background),
            Print(text)
        )?;
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Err(err) = execute!(
            self.out,
            ResetColor,
            DisableMouseCapture,
            Show,
            LeaveAlternateScreen
        ) {
            log::error!("failed to leave the alternate screen: {err}");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            log::error!("failed to leave raw mode: {err}");
        }
    }
}

/// Frames-per-second estimate refreshed once a second
pub struct FpsCounter {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        FpsCounter {
            frames_since_last_update: 0,
            last_fps_calculation: now,
            fps: 0.0,
        }
    }

    pub fn frame(&mut self, now: Instant) {
        self.frames_since_last_update += 1;
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}
