//! Backend API configuration constants and types.

/// Configuration for the backend REST client
/// (This is the runtime struct used by the HTTP gateway)
pub struct BackendClientConfig {
    pub timeout_ms: u64,
}

impl Default for BackendClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: API.client.timeout_ms,
        }
    }
}

/// Regular-hours window applied when a chart is loaded with the
/// restrict-hours toggle on.
pub struct SessionHours {
    pub open: (u32, u32),
    pub close: (u32, u32),
}

/// Client-side action budget mirroring the backend's rate limit, so the UI
/// can disable load controls before the backend starts refusing.
pub struct ActionBudgetConfig {
    pub max_actions: u32,
    pub window_hours: u64,
}

/// The Master API Configuration
pub struct ApiConfig {
    pub base_url: &'static str,
    pub client: ClientSettings,
    pub session_hours: SessionHours,
    pub budget: ActionBudgetConfig,
}

pub struct ClientSettings {
    pub timeout_ms: u64,
}

pub const API: ApiConfig = ApiConfig {
    base_url: "http://127.0.0.1:5000",

    client: ClientSettings { timeout_ms: 15_000 },

    // 09:30 to 16:00, matching the exchange session in the data set
    session_hours: SessionHours {
        open: (9, 30),
        close: (16, 0),
    },

    budget: ActionBudgetConfig {
        max_actions: 10,
        window_hours: 12,
    },
};
