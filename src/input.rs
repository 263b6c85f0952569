//! Keyboard mapping and frame pacing for the terminal loop

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use crate::app::{App, InputMode, ListTab};
use crate::types::AppEvent;

/// Time between frames at `fps` (never zero)
pub fn frame_budget(fps: u32) -> Duration {
    let frame_ms = 1000u32.saturating_div(fps.max(1)) as u64;
    Duration::from_millis(frame_ms.max(1))
}

/// How long to block on input before the next loop iteration.
///
/// With a redraw pending, wait out the rest of the frame budget. Idle loops
/// block for a whole budget so the loop never degenerates into a busy poll.
pub fn poll_wait(budget: Duration, since_last_frame: Duration, redraw_pending: bool) -> Duration {
    if redraw_pending {
        budget.saturating_sub(since_last_frame)
    } else {
        budget
    }
}

pub fn handle_key(app: &mut App, k: KeyEvent) {
    // Quit works from every mode, including the go-to prompt
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (k.code, k.modifiers) {
        app.on_event(AppEvent::Quit);
        return;
    }

    if app.input_mode() == InputMode::Goto {
        match k.code {
            KeyCode::Char(c) => app.goto_add_char(c),
            KeyCode::Backspace => app.goto_backspace(),
            KeyCode::Enter => app.apply_goto(),
            KeyCode::Esc => app.cancel_goto(),
            _ => {}
        }
        return;
    }

    match (k.code, k.modifiers) {
        (KeyCode::Char('q'), _) => app.on_event(AppEvent::Quit),
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => app.toggle_debug_panel(),

        (KeyCode::Tab, _) => app.next_tab(),
        (KeyCode::BackTab, _) => app.prev_tab(),
        (KeyCode::Char('1'), _) => app.select_tab(ListTab::Paged),
        (KeyCode::Char('2'), _) => app.select_tab(ListTab::Incremental),

        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.up(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.down(),
        (KeyCode::Enter, _) => app.open_selected(),

        (KeyCode::Left, _) => app.prev_page(),
        (KeyCode::Right, _) => app.next_page(),
        (KeyCode::Home, _) => app.first_page(),
        (KeyCode::End, _) => app.last_page(),
        (KeyCode::Char('n'), _) | (KeyCode::Char(' '), _) => app.load_more(),

        (KeyCode::Char('r'), _) => app.retry(),
        (KeyCode::Esc, _) | (KeyCode::Char('b'), _) | (KeyCode::Char('h'), _) => app.go_home(),
        (KeyCode::Char(':'), _) => app.start_goto(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Endpoints;
    use crate::router::Route;
    use crate::theme::Theme;

    fn app() -> App {
        App::new(Endpoints::default(), 20, 30, Theme::Nord, None, Route::List)
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        handle_key(app, KeyEvent::new(code, modifiers));
    }

    #[test]
    fn test_frame_budget() {
        assert_eq!(frame_budget(30), Duration::from_millis(33));
        assert_eq!(frame_budget(120), Duration::from_millis(8));
        assert_eq!(frame_budget(0), Duration::from_millis(1000));
        assert_eq!(frame_budget(5000), Duration::from_millis(1));
    }

    #[test]
    fn test_idle_loop_waits_full_budget() {
        let budget = frame_budget(30);
        // Long after the last frame with nothing to draw: still block a whole frame
        assert_eq!(poll_wait(budget, Duration::from_secs(10), false), budget);
        assert_eq!(poll_wait(budget, Duration::ZERO, false), budget);
    }

    #[test]
    fn test_pending_redraw_waits_remaining_budget() {
        let budget = Duration::from_millis(33);
        assert_eq!(poll_wait(budget, Duration::from_millis(10), true), Duration::from_millis(23));
        assert_eq!(poll_wait(budget, Duration::from_millis(50), true), Duration::ZERO);
    }

    #[test]
    fn test_ctrl_c_quits_from_goto_prompt() {
        let mut app = app();
        press(&mut app, KeyCode::Char(':'), KeyModifiers::NONE);
        assert_eq!(app.input_mode(), InputMode::Goto);

        press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.quit_flag());
        assert_eq!(app.goto_input(), "");
    }

    #[test]
    fn test_goto_prompt_takes_plain_letters() {
        let mut app = app();
        press(&mut app, KeyCode::Char(':'), KeyModifiers::NONE);
        for c in "/pokemon/qb".chars() {
            press(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        // 'q' and 'b' are text here, not quit/back
        assert!(!app.quit_flag());
        assert_eq!(app.goto_input(), "/pokemon/qb");

        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.route(), &Route::detail("qb"));
    }

    #[test]
    fn test_normal_mode_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.tab(), ListTab::Incremental);
        press(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert!(app.debug_visible());
        press(&mut app, KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(app.quit_flag());
    }
}
