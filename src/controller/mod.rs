//! Dashboard controller
//!
//! View-model behind the dashboard screen. It owns the view state, decides whether the
//! dashboard is following the live polling stream or showing a one-shot historical query,
//! and drives the countdown to the next refresh.
//!
//! Background tasks never touch the view directly. They post messages tagged with the
//! generation of the fetch that produced them, and the owner applies them by calling
//! [`DashboardController::process_pending`] from its event loop. Messages from a fetch that
//! has since been replaced are dropped.

mod normalize;
mod validation;

pub use normalize::normalize_dashboard;
pub use validation::{DATE_FORMAT, DateValidationError, validate_query_date};

use crate::consts::cli_consts::{
    CONTROLLER_QUEUE_SIZE, ERROR_DETAIL_MAX_LEN, FETCH_FAILED_MESSAGE, polling,
};
use crate::error_classifier::ErrorClassifier;
use crate::events::{EventSender, EventType, Source};
use crate::logging::LogLevel;
use crate::models::{BillingDashboard, RawBillingDashboard, SeriesStatsPoint};
use crate::monitor::error::MonitorError;
use crate::monitor::{BillingMonitor, DashboardPoller, PollUpdate};
use crate::ui::dashboard::utils::truncate_message;
use chrono::{DateTime, Local, NaiveDate};
use log::{debug, trace};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Everything the dashboard screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Dataset currently displayed, if any fetch has succeeded yet.
    pub dashboard: Option<BillingDashboard>,
    pub loading: bool,
    /// User-facing error text.
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
    /// Seconds until the next live refresh.
    pub countdown: u32,
    /// Date filter as typed by the user, possibly empty.
    pub selected_date: String,
    /// Day the historical dataset belongs to. `None` in live mode.
    pub queried_date: Option<NaiveDate>,
    /// Latest day that may be queried, fixed when the controller is created.
    pub max_selectable_date: NaiveDate,
    pub is_live_mode: bool,
}

impl DashboardView {
    fn new(today: NaiveDate) -> Self {
        Self {
            dashboard: None,
            loading: true,
            error: None,
            last_updated: None,
            countdown: polling::COUNTDOWN_SECS,
            selected_date: String::new(),
            queried_date: None,
            max_selectable_date: today,
            is_live_mode: true,
        }
    }

    pub fn max_selectable_date_string(&self) -> String {
        self.max_selectable_date.format(DATE_FORMAT).to_string()
    }

    pub fn queried_date_string(&self) -> Option<String> {
        self.queried_date
            .map(|date| date.format(DATE_FORMAT).to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Success,
    Error,
}

/// Success percentage to display; zero until something has been processed.
pub fn success_percentage_of(dashboard: Option<&BillingDashboard>) -> f64 {
    match dashboard {
        Some(d) if d.total_processed > 0 => d.success_rate,
        _ => 0.0,
    }
}

/// Error percentage to display; zero until something has been processed.
pub fn error_percentage_of(dashboard: Option<&BillingDashboard>) -> f64 {
    match dashboard {
        Some(d) if d.total_processed > 0 => 100.0 - d.success_rate,
        _ => 0.0,
    }
}

/// Bar height in percent of the largest series total of the dataset.
pub fn series_bar_height_of(
    dashboard: Option<&BillingDashboard>,
    point: &SeriesStatsPoint,
    kind: SeriesKind,
) -> f64 {
    let Some(dashboard) = dashboard else {
        return 0.0;
    };
    let max_total = dashboard
        .series_stats
        .iter()
        .map(SeriesStatsPoint::effective_total)
        .max()
        .unwrap_or(0)
        .max(1);
    let value = match kind {
        SeriesKind::Success => point.success,
        SeriesKind::Error => point.error,
    };
    value as f64 / max_total as f64 * 100.0
}

#[derive(Debug)]
enum ControllerMessage {
    Poll {
        generation: u64,
        update: PollUpdate,
    },
    Historical {
        generation: u64,
        fecha: String,
        result: Result<RawBillingDashboard, MonitorError>,
    },
}

/// The fetch currently feeding the view. Aborted when replaced or dropped.
#[derive(Debug)]
struct ActiveSubscription {
    generation: u64,
    handle: JoinHandle<()>,
    /// Set while following the live stream.
    poller: Option<DashboardPoller>,
}

impl Drop for ActiveSubscription {
    fn drop(&mut self) {
        self.handle.abort();
        if let Some(poller) = &self.poller {
            poller.stop();
        }
    }
}

pub struct DashboardController {
    monitor: Arc<dyn BillingMonitor>,
    poll_interval: Duration,
    view: DashboardView,
    events: EventSender,
    classifier: ErrorClassifier,
    message_sender: mpsc::Sender<ControllerMessage>,
    message_receiver: mpsc::Receiver<ControllerMessage>,
    subscription: Option<ActiveSubscription>,
    countdown_timer: Option<JoinHandle<()>>,
    /// Total ticks fired by the countdown timer. Kept off the message queue so a stalled
    /// owner never delays fetch results behind cosmetic ticks.
    countdown_ticks: Option<watch::Receiver<u64>>,
    ticks_seen: u64,
    generation: u64,
}

impl Debug for DashboardController {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("environment", self.monitor.environment())
            .field("view", &self.view)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl DashboardController {
    pub fn new(monitor: Arc<dyn BillingMonitor>, events: EventSender) -> Self {
        Self::with_today(monitor, events, Local::now().date_naive())
    }

    /// Creates a controller whose latest selectable date is `today`.
    pub fn with_today(
        monitor: Arc<dyn BillingMonitor>,
        events: EventSender,
        today: NaiveDate,
    ) -> Self {
        let (message_sender, message_receiver) = mpsc::channel(CONTROLLER_QUEUE_SIZE);
        Self {
            monitor,
            poll_interval: polling::polling_interval(),
            view: DashboardView::new(today),
            events,
            classifier: ErrorClassifier::new(),
            message_sender,
            message_receiver,
            subscription: None,
            countdown_timer: None,
            countdown_ticks: None,
            ticks_seen: 0,
            generation: 0,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    /// Enter live mode and start the countdown timer. Must be called inside a tokio runtime.
    pub fn init(&mut self) {
        self.start_live_mode();
        self.start_countdown();
    }

    /// Follow the shared polling stream, replacing whatever fetch was active.
    pub fn start_live_mode(&mut self) {
        self.stop_current_subscription();
        self.skip_countdown_ticks();
        self.view.is_live_mode = true;
        self.view.queried_date = None;
        self.view.loading = true;
        self.view.error = None;
        self.view.countdown = polling::COUNTDOWN_SECS;

        let generation = self.next_generation();
        let poller = DashboardPoller::spawn(Arc::clone(&self.monitor), self.poll_interval);
        let mut subscription = poller.subscribe();
        let sender = self.message_sender.clone();
        let handle = tokio::spawn(async move {
            while let Some(update) = subscription.next().await {
                let message = ControllerMessage::Poll { generation, update };
                if sender.send(message).await.is_err() {
                    break;
                }
            }
        });
        self.subscription = Some(ActiveSubscription {
            generation,
            handle,
            poller: Some(poller),
        });

        self.events.live(
            format!(
                "Live mode: refreshing every {}s",
                self.poll_interval.as_secs()
            ),
            EventType::Refresh,
            LogLevel::Info,
        );
    }

    pub fn set_selected_date(&mut self, date: impl Into<String>) {
        self.view.selected_date = date.into();
    }

    /// Validate the selected date and, if it passes, replace live polling with a one-shot
    /// query for that day. Validation failures only set the error text.
    pub fn search_by_date(&mut self) -> Result<(), DateValidationError> {
        let date =
            match validate_query_date(&self.view.selected_date, self.view.max_selectable_date) {
                Ok(date) => date,
                Err(e) => {
                    self.view.error = Some(e.to_string());
                    self.events.dashboard(
                        format!("Date filter rejected: {}", e),
                        EventType::Error,
                        LogLevel::Info,
                    );
                    return Err(e);
                }
            };
        self.start_historical_query(date);
        Ok(())
    }

    /// Replace whatever fetch is active with a one-shot query for `date`.
    fn start_historical_query(&mut self, date: NaiveDate) {
        let fecha = date.format(DATE_FORMAT).to_string();

        self.stop_current_subscription();
        self.view.is_live_mode = false;
        self.view.queried_date = Some(date);
        self.view.loading = true;
        self.view.error = None;
        self.view.countdown = 0;

        let generation = self.next_generation();
        let monitor = Arc::clone(&self.monitor);
        let sender = self.message_sender.clone();
        let query_date = fecha.clone();
        let handle = tokio::spawn(async move {
            let result = monitor.get_dashboard_by_date(&query_date).await;
            let message = ControllerMessage::Historical {
                generation,
                fecha: query_date,
                result,
            };
            let _ = sender.send(message).await;
        });
        self.subscription = Some(ActiveSubscription {
            generation,
            handle,
            poller: None,
        });

        self.events.historical(
            format!("Querying dashboard for {}", fecha),
            EventType::Refresh,
            LogLevel::Info,
        );
    }

    /// Drop the date filter and go back to live polling.
    pub fn clear_date_filter(&mut self) {
        self.view.selected_date.clear();
        self.start_live_mode();
    }

    /// Re-run whatever the dashboard is showing right now. In historical mode that is the
    /// day last queried, not whatever is currently typed in the date filter.
    pub fn refresh(&mut self) {
        if self.view.is_live_mode {
            self.start_live_mode();
        } else if let Some(date) = self.view.queried_date {
            self.start_historical_query(date);
        } else if let Err(e) = self.search_by_date() {
            debug!("Refresh skipped: {}", e);
        }
    }

    /// One countdown step. Only counts down in live mode and never below zero.
    pub fn tick_countdown(&mut self) {
        if !self.view.is_live_mode {
            return;
        }
        self.view.countdown = self.view.countdown.saturating_sub(1);
    }

    /// Apply elapsed countdown ticks, then every message that is ready. Returns how many
    /// ticks and messages were applied.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = self.apply_countdown_ticks();
        while let Ok(message) = self.message_receiver.try_recv() {
            self.handle_message(message);
            processed += 1;
        }
        processed
    }

    /// Wait for the next message or countdown tick and apply it.
    pub async fn process_next(&mut self) {
        enum Wake {
            Message(Option<ControllerMessage>),
            Tick { timer_alive: bool },
        }

        let wake = match self.countdown_ticks.as_mut() {
            Some(ticks) => tokio::select! {
                message = self.message_receiver.recv() => Wake::Message(message),
                changed = ticks.changed() => Wake::Tick { timer_alive: changed.is_ok() },
            },
            None => Wake::Message(self.message_receiver.recv().await),
        };

        match wake {
            Wake::Message(Some(message)) => {
                self.apply_countdown_ticks();
                self.handle_message(message);
            }
            Wake::Message(None) => {}
            Wake::Tick { timer_alive } => {
                self.apply_countdown_ticks();
                if !timer_alive {
                    self.countdown_ticks = None;
                }
            }
        }
    }

    pub fn success_percentage(&self) -> f64 {
        success_percentage_of(self.view.dashboard.as_ref())
    }

    pub fn error_percentage(&self) -> f64 {
        error_percentage_of(self.view.dashboard.as_ref())
    }

    pub fn series_bar_height(&self, point: &SeriesStatsPoint, kind: SeriesKind) -> f64 {
        series_bar_height_of(self.view.dashboard.as_ref(), point, kind)
    }

    #[cfg(test)]
    pub fn has_active_subscription(&self) -> bool {
        self.subscription.is_some()
    }

    /// Generation of the fetch feeding the view, if one is active.
    #[cfg(test)]
    pub fn active_generation(&self) -> Option<u64> {
        self.subscription.as_ref().map(|s| s.generation)
    }

    /// Cancel the active fetch and stop the countdown timer.
    pub fn teardown(&mut self) {
        self.stop_current_subscription();
        // Anything still queued belongs to a cancelled fetch.
        self.generation += 1;
        if let Some(timer) = self.countdown_timer.take() {
            timer.abort();
        }
        self.countdown_ticks = None;
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn stop_current_subscription(&mut self) {
        self.subscription = None;
    }

    fn start_countdown(&mut self) {
        if let Some(timer) = self.countdown_timer.take() {
            timer.abort();
        }
        let (tick_sender, tick_receiver) = watch::channel(0u64);
        let period = polling::countdown_tick();
        self.countdown_timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tick_sender.send_modify(|ticks| *ticks += 1);
                if tick_sender.is_closed() {
                    break;
                }
            }
        }));
        self.countdown_ticks = Some(tick_receiver);
        self.ticks_seen = 0;
    }

    /// Count down once per timer tick fired since the last call.
    fn apply_countdown_ticks(&mut self) -> usize {
        let Some(ticks) = self.countdown_ticks.as_mut() else {
            return 0;
        };
        let fired = *ticks.borrow_and_update();
        let pending = fired.saturating_sub(self.ticks_seen);
        self.ticks_seen = fired;
        for _ in 0..pending {
            self.tick_countdown();
        }
        pending as usize
    }

    /// Mark elapsed ticks as seen without applying them, before the countdown is reset.
    fn skip_countdown_ticks(&mut self) {
        if let Some(ticks) = self.countdown_ticks.as_mut() {
            self.ticks_seen = *ticks.borrow_and_update();
        }
    }

    fn handle_message(&mut self, message: ControllerMessage) {
        match message {
            ControllerMessage::Poll { generation, update } => {
                if generation != self.generation {
                    trace!("Ignoring polling update from generation {}", generation);
                    return;
                }
                match update {
                    PollUpdate::Snapshot(raw) => {
                        self.apply_snapshot(raw.as_ref().clone());
                        self.view.countdown = polling::COUNTDOWN_SECS;
                        let summary = self.snapshot_summary();
                        self.events.live(
                            format!("Dashboard updated: {}", summary),
                            EventType::Success,
                            LogLevel::Info,
                        );
                    }
                    PollUpdate::Failed(error) => self.apply_failure(&error, Source::LivePoller),
                }
            }
            ControllerMessage::Historical {
                generation,
                fecha,
                result,
            } => {
                if generation != self.generation {
                    trace!("Ignoring historical result from generation {}", generation);
                    return;
                }
                match result {
                    Ok(raw) => {
                        self.apply_snapshot(raw);
                        let summary = self.snapshot_summary();
                        self.events.historical(
                            format!("Loaded dashboard for {}: {}", fecha, summary),
                            EventType::Success,
                            LogLevel::Info,
                        );
                    }
                    Err(error) => self.apply_failure(&error, Source::HistoricalQuery),
                }
            }
        }
    }

    fn apply_snapshot(&mut self, raw: RawBillingDashboard) {
        self.view.dashboard = Some(normalize_dashboard(raw));
        self.view.loading = false;
        self.view.error = None;
        self.view.last_updated = Some(Local::now());
    }

    fn apply_failure(&mut self, error: &MonitorError, source: Source) {
        self.view.error = Some(FETCH_FAILED_MESSAGE.to_string());
        self.view.loading = false;

        let level = self.classifier.classify_fetch_error(error);
        let message = match error.status() {
            Some(status) => format!(
                "Dashboard fetch failed ({}, HTTP {})",
                self.classifier.describe(error),
                status
            ),
            None => format!("Dashboard fetch failed ({})", self.classifier.describe(error)),
        };
        debug!(
            "Dashboard fetch error detail: {}",
            truncate_message(Some(&error.to_string()), ERROR_DETAIL_MAX_LEN)
        );
        match source {
            Source::HistoricalQuery => self.events.historical(message, EventType::Error, level),
            _ => self.events.live(message, EventType::Error, level),
        }
    }

    fn snapshot_summary(&self) -> String {
        match &self.view.dashboard {
            Some(d) => format!(
                "{} processed, {} ok, {} errors",
                d.total_processed, d.success_count, d.error_count
            ),
            None => "no data".to_string(),
        }
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        self.teardown();
    }
}
