pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! Timing, queue and presentation constants, grouped by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered activity events
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Maximum number of buffered controller messages (fetch outcomes, countdown ticks)
    pub const CONTROLLER_QUEUE_SIZE: usize = 64;

    // =============================================================================
    // POLLING CONFIGURATION
    // =============================================================================

    pub mod polling {
        use std::time::Duration;

        /// Interval between live dashboard fetches (milliseconds)
        pub const POLLING_INTERVAL_MS: u64 = 120_000;

        /// Value the countdown is reset to whenever live data arrives (seconds)
        pub const COUNTDOWN_SECS: u32 = 120;

        /// Period of the cosmetic countdown timer (milliseconds)
        pub const COUNTDOWN_TICK_MS: u64 = 1_000;

        /// Updates a slow subscriber may fall behind before it starts skipping
        pub const UPDATE_BUFFER: usize = 16;

        pub const fn polling_interval() -> Duration {
            Duration::from_millis(POLLING_INTERVAL_MS)
        }

        pub const fn countdown_tick() -> Duration {
            Duration::from_millis(COUNTDOWN_TICK_MS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    pub mod network {
        use std::time::Duration;

        pub const CONNECT_TIMEOUT_SECS: u64 = 10;
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // PRESENTATION
    // =============================================================================

    /// Error messages longer than this are cut in the recent errors table
    pub const MAX_MESSAGE_LEN: usize = 80;

    /// Backend error bodies are cut to this length before they reach the debug log
    pub const ERROR_DETAIL_MAX_LEN: usize = 200;

    /// Shown to the user for any transport failure; the cause only goes to the debug log
    pub const FETCH_FAILED_MESSAGE: &str = "Error al obtener datos del servidor";
}
