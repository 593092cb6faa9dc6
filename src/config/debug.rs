//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep the noisy ones `false` by default
//! so release builds remain quiet.

/// Emit UI interaction logs (e.g., panel switching, manual actions).
pub const PRINT_UI_INTERACTIONS: bool = true;

/// Emit one log line per replay tick. Very noisy at fast speeds.
pub const PRINT_REPLAY_TICKS: bool = false;

/// Emit request/response summaries for every backend fetch.
pub const PRINT_DATA_FETCH: bool = false;

/// Emit simulator events (opens, closes, forced closes at stop).
pub const PRINT_SIM_EVENTS: bool = false;

/// Emit details of UI state serialization/deserialization logs.
pub const PRINT_STATE_SERDE: bool = false;
