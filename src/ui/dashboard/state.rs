//! Dashboard state management
//!
//! Contains the main dashboard state struct and related enums

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::controller::{DashboardController, DashboardView};
use crate::environment::Environment;
use crate::events::Event as ActivityEvent;

use std::collections::VecDeque;

/// What key presses currently do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Single-key commands.
    Normal,
    /// Typing a `YYYY-MM-DD` date into the filter box.
    EditingDate,
}

/// Outcome of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct DashboardState {
    /// The backend the controller talks to.
    pub environment: Environment,
    /// Owns the view state and every background fetch.
    pub controller: DashboardController,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<ActivityEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<ActivityEvent>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,
    pub input_mode: InputMode,
    /// Date typed so far while editing the filter.
    pub date_input: String,
}

impl DashboardState {
    pub fn new(
        environment: Environment,
        controller: DashboardController,
        with_background_color: bool,
    ) -> Self {
        Self {
            environment,
            controller,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color,
            tick: 0,
            input_mode: InputMode::Normal,
            date_input: String::new(),
        }
    }

    pub fn view(&self) -> &DashboardView {
        self.controller.view()
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: ActivityEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: ActivityEvent) {
        self.pending_events.push_back(event);
    }
}
