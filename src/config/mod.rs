//! Configuration module for the replay-desk application.

pub mod api;
pub mod demo;
pub mod replay;

mod debug; // Private so files reach flags via crate::config::debug re-exports below
pub use debug::{
    PRINT_DATA_FETCH, PRINT_REPLAY_TICKS, PRINT_SIM_EVENTS, PRINT_STATE_SERDE,
    PRINT_UI_INTERACTIONS,
};

// Re-export commonly used items
pub use api::API;
pub use demo::DEMO;
pub use replay::{REPLAY, SpeedPreset};
