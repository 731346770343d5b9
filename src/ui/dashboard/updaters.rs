//! Dashboard state update logic
//!
//! Applies controller messages and activity events once per frame, and maps key presses onto
//! controller operations.

use super::state::{DashboardState, InputMode, KeyOutcome};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Longest input accepted by the date box, `YYYY-MM-DD`.
const DATE_INPUT_LEN: usize = 10;

impl DashboardState {
    /// Update the dashboard state for the next frame.
    pub fn update(&mut self) {
        self.tick += 1;

        // Fetch results and countdown ticks
        self.controller.process_pending();

        while let Some(event) = self.pending_events.pop_front() {
            self.add_to_activity_log(event);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        // Raw mode delivers Ctrl+C as a key press
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyOutcome::Quit;
        }
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key.code),
            InputMode::EditingDate => {
                self.handle_editing_key(key.code);
                KeyOutcome::Continue
            }
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> KeyOutcome {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Char('d') | KeyCode::Char('/') => {
                self.date_input = self.view().selected_date.clone();
                self.input_mode = InputMode::EditingDate;
            }
            KeyCode::Char('c') => {
                self.date_input.clear();
                self.controller.clear_date_filter();
            }
            KeyCode::Char('r') => self.controller.refresh(),
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn handle_editing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                if self.date_input.len() < DATE_INPUT_LEN {
                    self.date_input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Enter => {
                self.controller.set_selected_date(self.date_input.clone());
                // A rejected date keeps the box open; the error is shown in the summary.
                if self.controller.search_by_date().is_ok() {
                    self.input_mode = InputMode::Normal;
                }
            }
            KeyCode::Esc => {
                self.date_input.clear();
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DashboardController;
    use crate::environment::Environment;
    use crate::events::{Event, EventSender, EventType};
    use crate::logging::LogLevel;
    use crate::models::RawBillingDashboard;
    use crate::monitor::MockBillingMonitor;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn state_with(monitor: MockBillingMonitor) -> DashboardState {
        let (sender, _receiver) = mpsc::channel(10);
        let controller = DashboardController::with_today(
            Arc::new(monitor),
            EventSender::new(sender),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        );
        DashboardState::new(Environment::Local, controller, false)
    }

    fn press(state: &mut DashboardState, code: KeyCode) -> KeyOutcome {
        state.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(state: &mut DashboardState, text: &str) {
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn quit_keys_only_quit_outside_the_date_box() {
        let mut state = state_with(MockBillingMonitor::new());
        assert_eq!(press(&mut state, KeyCode::Char('q')), KeyOutcome::Quit);

        press(&mut state, KeyCode::Char('d'));
        assert_eq!(state.input_mode, InputMode::EditingDate);
        assert_eq!(press(&mut state, KeyCode::Char('q')), KeyOutcome::Continue);
        assert_eq!(press(&mut state, KeyCode::Esc), KeyOutcome::Continue);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(press(&mut state, KeyCode::Esc), KeyOutcome::Quit);

        press(&mut state, KeyCode::Char('d'));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(state.handle_key(ctrl_c), KeyOutcome::Quit);
    }

    #[tokio::test]
    async fn date_box_accepts_only_date_characters() {
        let mut state = state_with(MockBillingMonitor::new());
        press(&mut state, KeyCode::Char('/'));
        type_text(&mut state, "2026-1x0-01-99");
        assert_eq!(state.date_input, "2026-10-01");

        press(&mut state, KeyCode::Backspace);
        assert_eq!(state.date_input, "2026-10-0");
    }

    #[tokio::test(start_paused = true)]
    async fn enter_submits_a_historical_search() {
        let mut monitor = MockBillingMonitor::new();
        monitor
            .expect_get_dashboard_by_date()
            .times(1)
            .returning(|_| {
                Ok(RawBillingDashboard {
                    total_processed: Some(5.0),
                    ..Default::default()
                })
            });
        let mut state = state_with(monitor);

        press(&mut state, KeyCode::Char('d'));
        type_text(&mut state, "2026-10-01");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(!state.view().is_live_mode);
        assert_eq!(state.view().selected_date, "2026-10-01");

        tokio::time::sleep(Duration::from_millis(10)).await;
        state.update();
        assert_eq!(
            state.view().dashboard.as_ref().map(|d| d.total_processed),
            Some(5)
        );
    }

    #[tokio::test]
    async fn rejected_date_keeps_the_box_open() {
        let mut monitor = MockBillingMonitor::new();
        monitor.expect_get_dashboard_by_date().never();
        let mut state = state_with(monitor);

        press(&mut state, KeyCode::Char('d'));
        type_text(&mut state, "2027-01-01");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.input_mode, InputMode::EditingDate);
        assert!(state.view().error.is_some());
        assert!(state.view().is_live_mode);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_edit_does_not_replace_the_queried_day() {
        let mut monitor = MockBillingMonitor::new();
        monitor
            .expect_get_dashboard_by_date()
            .withf(|fecha| fecha.to_string() == "2026-10-01")
            .times(2)
            .returning(|_| Ok(RawBillingDashboard::default()));
        let mut state = state_with(monitor);

        press(&mut state, KeyCode::Char('d'));
        type_text(&mut state, "2026-10-01");
        press(&mut state, KeyCode::Enter);
        tokio::time::sleep(Duration::from_millis(10)).await;
        state.update();

        press(&mut state, KeyCode::Char('d'));
        for _ in 0..10 {
            press(&mut state, KeyCode::Backspace);
        }
        type_text(&mut state, "2027-01-01");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.input_mode, InputMode::EditingDate);
        press(&mut state, KeyCode::Esc);

        assert!(!state.view().is_live_mode);
        assert_eq!(
            state.view().queried_date_string().as_deref(),
            Some("2026-10-01")
        );

        press(&mut state, KeyCode::Char('r'));
        assert!(!state.view().is_live_mode);
        assert_eq!(
            state.view().queried_date_string().as_deref(),
            Some("2026-10-01")
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
        state.update();
        assert_eq!(state.view().error, None);
    }

    #[test]
    fn update_moves_events_into_a_bounded_activity_log() {
        let mut state = state_with(MockBillingMonitor::new());
        for i in 0..(crate::consts::cli_consts::MAX_ACTIVITY_LOGS + 5) {
            state.add_event(Event::dashboard_with_level(
                format!("event {}", i),
                EventType::Refresh,
                LogLevel::Info,
            ));
        }
        state.update();
        assert!(state.pending_events.is_empty());
        assert_eq!(
            state.activity_logs.len(),
            crate::consts::cli_consts::MAX_ACTIVITY_LOGS
        );
        assert_eq!(
            state.activity_logs.front().map(|e| e.msg.as_str()),
            Some("event 5")
        );
        assert_eq!(state.tick, 1);
    }
}
