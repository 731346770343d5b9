//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::controller::DashboardController;
use crate::environment::Environment;
use crate::events::Event as ActivityEvent;
use crate::ui::dashboard::{DashboardState, KeyOutcome, render_dashboard};
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};

/// The different screens in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Billing dashboard.
    Dashboard,
}

/// Application state
#[derive(Debug)]
pub struct App {
    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Dashboard state. Exists from the start so data loads while the splash is shown.
    dashboard: Box<DashboardState>,

    /// Receives activity events from the controller and the logger.
    event_receiver: mpsc::Receiver<ActivityEvent>,

    /// Broadcasts the shutdown signal.
    shutdown_sender: broadcast::Sender<()>,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        environment: Environment,
        controller: DashboardController,
        event_receiver: mpsc::Receiver<ActivityEvent>,
        shutdown_sender: broadcast::Sender<()>,
        with_background_color: bool,
    ) -> Self {
        Self {
            current_screen: Screen::Splash,
            dashboard: Box::new(DashboardState::new(
                environment,
                controller,
                with_background_color,
            )),
            event_receiver,
            shutdown_sender,
        }
    }

    fn shutdown(&mut self) {
        self.dashboard.controller.teardown();
        let _ = self.shutdown_sender.send(());
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);
    let mut shutdown_receiver = app.shutdown_sender.subscribe();

    // UI event loop
    loop {
        // Ctrl+C or another external shutdown
        if shutdown_receiver.try_recv().is_ok() {
            app.dashboard.controller.teardown();
            return Ok(());
        }

        while let Ok(event) = app.event_receiver.try_recv() {
            app.dashboard.add_event(event);
        }

        app.dashboard.update();
        terminal.draw(|f| render(f, &app))?;

        if app.current_screen == Screen::Splash && splash_start.elapsed() >= splash_duration {
            app.current_screen = Screen::Dashboard;
            continue;
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == KeyEventKind::Release {
                    continue;
                }

                match app.current_screen {
                    Screen::Splash => {
                        // Any key press skips the splash screen
                        app.current_screen = Screen::Dashboard;
                    }
                    Screen::Dashboard => {
                        if app.dashboard.handle_key(key) == KeyOutcome::Quit {
                            app.shutdown();
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, app: &App) {
    match app.current_screen {
        Screen::Splash => render_splash(f),
        Screen::Dashboard => render_dashboard(f, &app.dashboard),
    }
}
