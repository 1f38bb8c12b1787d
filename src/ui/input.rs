/// Keyboard input tracker.
///
/// Every command in the game is one-shot (jump, restart, pause, quit), so only
/// the edge matters. Terminals report a held key as a stream of Press/Repeat
/// events; a key counts as held until no event for it has arrived within
/// `HOLD_TIMEOUT`, and only the not-held → held transition is a fresh press.
/// Holding Space therefore jumps once, not on every autorepeat.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// After this long without a Press/Repeat event, consider the key released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the most recent drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,

    /// Set when the terminal reported a resize during the last drain.
    resized: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            resized: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame.
    pub fn drain_events(&mut self) {
        self.begin_frame();
        let now = Instant::now();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.record(key, now),
                Ok(Event::Resize(..)) => self.resized = true,
                _ => {}
            }
        }

        self.expire(now);
    }

    /// Was any of these keys freshly pressed this frame?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
        })
    }

    pub fn resized(&self) -> bool {
        self.resized
    }

    // ── Internal ──

    fn begin_frame(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.resized = false;
    }

    fn record(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        if key.kind == KeyEventKind::Release {
            // Not every terminal reports releases; the timeout handles it.
            return;
        }
        let was_held = self.is_held(key.code, now);
        self.last_active.insert(key.code, now);
        if !was_held {
            self.fresh_presses.push(key.code);
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn is_held(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .map_or(false, |t| now.duration_since(*t) < HOLD_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn frame(input: &mut InputState, now: Instant, keys: &[KeyEvent]) {
        input.begin_frame();
        for k in keys {
            input.record(*k, now);
        }
        input.expire(now);
    }

    #[test]
    fn first_press_is_fresh() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        frame(&mut input, t0, &[key(KeyCode::Char(' '), KeyEventKind::Press)]);
        assert!(input.any_pressed(&[KeyCode::Char(' ')]));
        assert!(!input.any_pressed(&[KeyCode::Enter]));
    }

    #[test]
    fn autorepeat_is_not_a_new_press() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        let space = key(KeyCode::Char(' '), KeyEventKind::Press);
        frame(&mut input, t0, &[space]);
        frame(&mut input, t0 + Duration::from_millis(30), &[space]);
        assert!(!input.any_pressed(&[KeyCode::Char(' ')]));
        frame(&mut input, t0 + Duration::from_millis(60), &[key(KeyCode::Char(' '), KeyEventKind::Repeat)]);
        assert!(!input.any_pressed(&[KeyCode::Char(' ')]));
    }

    #[test]
    fn press_after_timeout_is_fresh_again() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        let space = key(KeyCode::Char(' '), KeyEventKind::Press);
        frame(&mut input, t0, &[space]);
        frame(&mut input, t0 + HOLD_TIMEOUT, &[]);
        frame(&mut input, t0 + HOLD_TIMEOUT * 2, &[space]);
        assert!(input.any_pressed(&[KeyCode::Char(' ')]));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        frame(&mut input, t0, &[key(KeyCode::Up, KeyEventKind::Release)]);
        assert!(!input.any_pressed(&[KeyCode::Up]));
    }

    #[test]
    fn ctrl_c_detected() {
        let mut input = InputState::new();
        let mut ev = key(KeyCode::Char('c'), KeyEventKind::Press);
        ev.modifiers = KeyModifiers::CONTROL;
        frame(&mut input, Instant::now(), &[ev]);
        assert!(input.ctrl_c_pressed());
    }
}
