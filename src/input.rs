//! Translation of terminal events into scene input events.

use crate::picking::Viewport;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use glam::Vec2;
use std::time::Duration;

/// Default maximum gap between the two presses of a double-click
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Input consumed by [`World::handle`](crate::driver::World::handle)
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed at a device pixel position
    PointerDown(Vec2),
    DoubleClick,
    /// Primary button dragged by a device pixel delta
    Drag(Vec2),
    /// Wheel steps, positive zooms in
    Zoom(f32),
    Reset,
    PlaySound,
    Resize(Viewport),
    ToggleDebug,
    TogglePause,
    Quit,
}

/// Clickable HUD controls
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HudButton {
    Reset,
    Music,
}

/// A HUD control occupying `width` cells starting at (`column`, `row`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonRect {
    pub button: HudButton,
    pub column: u16,
    pub row: u16,
    pub width: u16,
}

impl ButtonRect {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        row == self.row && column >= self.column && column < self.column + self.width
    }
}

/// Detects double-clicks from consecutive primary-button presses
#[derive(Clone, Debug)]
pub struct ClickTracker {
    window: Duration,
    last: Option<(Duration, u16, u16)>,
}

impl ClickTracker {
    pub fn new(window: Duration) -> Self {
        ClickTracker { window, last: None }
    }

    /// Records a press at `now`; returns true when it completes a double-click
    pub fn press(&mut self, now: Duration, column: u16, row: u16) -> bool {
        let double = match self.last {
            Some((at, c, r)) => {
                now.saturating_sub(at) <= self.window
                    && c.abs_diff(column) <= 1
                    && r.abs_diff(row) <= 1
            }
            None => false,
        };
        // A completed double-click does not start another one.
        self.last = if double { None } else { Some((now, column, row)) };
        double
    }
}

/// Maps raw terminal events to input events
pub struct InputMapper {
    clicks: ClickTracker,
    last_drag: Option<(u16, u16)>,
}

impl InputMapper {
    pub fn new(double_click_window: Duration) -> Self {
        InputMapper {
            clicks: ClickTracker::new(double_click_window),
            last_drag: None,
        }
    }

    /// Translates one terminal event. `buttons` are the HUD controls currently on screen.
    pub fn map(&mut self, event: &Event, now: Duration, buttons: &[ButtonRect]) -> Vec<InputEvent> {
        match event {
            Event::Key(key) => map_key(key).into_iter().collect(),
            Event::Mouse(mouse) => self.map_mouse(mouse, now, buttons),
            Event::Resize(columns, rows) => vec![InputEvent::Resize(cells_to_viewport(
                *columns, *rows,
            ))],
            _ => Vec::new(),
        }
    }

    fn map_mouse(
        &mut self,
        mouse: &MouseEvent,
        now: Duration,
        buttons: &[ButtonRect],
    ) -> Vec<InputEvent> {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(hit) = buttons.iter().find(|b| b.contains(column, row)) {
                    return vec![match hit.button {
                        HudButton::Reset => InputEvent::Reset,
                        HudButton::Music => InputEvent::PlaySound,
                    }];
                }
                self.last_drag = Some((column, row));
                let mut events = vec![InputEvent::PointerDown(cell_center(column, row))];
                if self.clicks.press(now, column, row) {
                    events.push(InputEvent::DoubleClick);
                }
                events
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some((last_column, last_row)) = self.last_drag.replace((column, row)) else {
                    return Vec::new();
                };
                let delta = cell_center(column, row) - cell_center(last_column, last_row);
                vec![InputEvent::Drag(delta)]
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.last_drag = None;
                Vec::new()
            }
            MouseEventKind::ScrollUp => vec![InputEvent::Zoom(1.0)],
            MouseEventKind::ScrollDown => vec![InputEvent::Zoom(-1.0)],
            _ => Vec::new(),
        }
    }
}

fn map_key(key: &KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputEvent::Quit)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputEvent::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputEvent::Reset),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(InputEvent::PlaySound),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(InputEvent::ToggleDebug),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(InputEvent::TogglePause),
        _ => None,
    }
}

/// Each cell carries two vertically stacked pixels
pub fn cells_to_viewport(columns: u16, rows: u16) -> Viewport {
    Viewport::new(columns as usize, rows as usize * 2)
}

/// Device pixel at the middle of a terminal cell
pub fn cell_center(column: u16, row: u16) -> Vec2 {
    Vec2::new(column as f32 + 0.5, row as f32 * 2.0 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn double_click_needs_two_quick_nearby_presses() {
        let mut tracker = ClickTracker::new(DOUBLE_CLICK_WINDOW);
        assert!(!tracker.press(Duration::from_millis(0), 10, 5));
        assert!(tracker.press(Duration::from_millis(300), 11, 5));
        // The pair is consumed; a third press starts over.
        assert!(!tracker.press(Duration::from_millis(350), 11, 5));
        assert!(!tracker.press(Duration::from_millis(1000), 11, 5));
        assert!(!tracker.press(Duration::from_millis(1100), 20, 5));
    }

    #[test]
    fn presses_emit_pointer_then_double_click() {
        let mut mapper = InputMapper::new(DOUBLE_CLICK_WINDOW);
        let down = mouse(MouseEventKind::Down(MouseButton::Left), 4, 3);
        let first = mapper.map(&down, Duration::from_millis(0), &[]);
        assert_eq!(first, vec![InputEvent::PointerDown(Vec2::new(4.5, 7.0))]);
        let second = mapper.map(&down, Duration::from_millis(100), &[]);
        assert_eq!(second.len(), 2);
        assert_eq!(second[1], InputEvent::DoubleClick);
    }

    #[test]
    fn hud_buttons_take_precedence() {
        let mut mapper = InputMapper::new(DOUBLE_CLICK_WINDOW);
        let buttons = [ButtonRect {
            button: HudButton::Reset,
            column: 10,
            row: 20,
            width: 9,
        }];
        let down = mouse(MouseEventKind::Down(MouseButton::Left), 12, 20);
        assert_eq!(
            mapper.map(&down, Duration::ZERO, &buttons),
            vec![InputEvent::Reset]
        );
        let outside = mouse(MouseEventKind::Down(MouseButton::Left), 19, 20);
        assert!(matches!(
            mapper.map(&outside, Duration::ZERO, &buttons)[0],
            InputEvent::PointerDown(_)
        ));
    }

    #[test]
    fn drag_reports_pixel_deltas() {
        let mut mapper = InputMapper::new(DOUBLE_CLICK_WINDOW);
        mapper.map(&mouse(MouseEventKind::Down(MouseButton::Left), 5, 5), Duration::ZERO, &[]);
        let events = mapper.map(
            &mouse(MouseEventKind::Drag(MouseButton::Left), 7, 4),
            Duration::ZERO,
            &[],
        );
        assert_eq!(events, vec![InputEvent::Drag(Vec2::new(2.0, -2.0))]);
    }

    #[test]
    fn keys_and_resize() {
        let mut mapper = InputMapper::new(DOUBLE_CLICK_WINDOW);
        assert_eq!(mapper.map(&key('r'), Duration::ZERO, &[]), vec![InputEvent::Reset]);
        assert_eq!(mapper.map(&key('m'), Duration::ZERO, &[]), vec![InputEvent::PlaySound]);
        assert_eq!(mapper.map(&key('x'), Duration::ZERO, &[]), vec![]);
        assert_eq!(
            mapper.map(&Event::Resize(80, 24), Duration::ZERO, &[]),
            vec![InputEvent::Resize(Viewport::new(80, 48))]
        );
    }
}
