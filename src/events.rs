//! Event System
//!
//! Activity events produced by the dashboard controller and the diagnostics logger

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Source {
    /// Live polling of the current dashboard.
    LivePoller,
    /// One-shot query for a past date.
    HistoricalQuery,
    /// Mode changes and input validation.
    Dashboard,
    /// Records forwarded from the `log` facade.
    Diagnostics,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn live_poller_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::LivePoller, msg, event_type, log_level)
    }

    pub fn historical_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::HistoricalQuery, msg, event_type, log_level)
    }

    pub fn dashboard_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Dashboard, msg, event_type, log_level)
    }

    pub fn diagnostic(msg: String, log_level: LogLevel) -> Self {
        let event_type = if log_level >= LogLevel::Warn {
            EventType::Error
        } else {
            EventType::Refresh
        };
        Self::new(Source::Diagnostics, msg, event_type, log_level)
    }

    pub fn should_display(&self) -> bool {
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

/// Non-blocking event publishing for code that runs on the UI thread.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Queue an event, dropping it if the activity queue is full or closed.
    pub fn emit(&self, event: Event) {
        let _ = self.sender.try_send(event);
    }

    pub fn live(&self, message: String, event_type: EventType, log_level: LogLevel) {
        self.emit(Event::live_poller_with_level(message, event_type, log_level));
    }

    pub fn historical(&self, message: String, event_type: EventType, log_level: LogLevel) {
        self.emit(Event::historical_with_level(message, event_type, log_level));
    }

    pub fn dashboard(&self, message: String, event_type: EventType, log_level: LogLevel) {
        self.emit(Event::dashboard_with_level(message, event_type, log_level));
    }
}
