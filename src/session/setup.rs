//! Session setup and initialization

use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::controller::DashboardController;
use crate::environment::Environment;
use crate::events::{Event, EventSender};
use crate::logging::init_activity_logger;
use crate::monitor::BillingMonitorClient;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Session data for both TUI and headless modes
#[derive(Debug)]
pub struct SessionData {
    /// Activity events from the controller and the logger
    pub event_receiver: mpsc::Receiver<Event>,
    /// Dashboard controller, already in live mode
    pub controller: DashboardController,
    /// Shutdown sender to stop the session
    pub shutdown_sender: broadcast::Sender<()>,
    /// Backend the session talks to
    pub environment: Environment,
}

/// Sets up a monitoring session
///
/// This function handles all the common setup required for both TUI and headless modes:
/// 1. Creates the activity event channel and routes `log` records into it
/// 2. Creates the billing client and the dashboard controller
/// 3. Starts live polling and the countdown timer
///
/// Must be called from within the tokio runtime.
pub fn setup_session(env: Environment) -> SessionData {
    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let events = EventSender::new(event_sender);
    init_activity_logger(events.clone());

    let client = BillingMonitorClient::new(env.clone());
    let mut controller = DashboardController::new(Arc::new(client), events);
    controller.init();

    let (shutdown_sender, _) = broadcast::channel(1);

    SessionData {
        event_receiver,
        controller,
        shutdown_sender,
        environment: env,
    }
}
