pub mod aggregate;
pub mod clock;
pub mod scheduler;
pub mod view;

pub use aggregate::aggregate;
pub use clock::{ReplayClock, ReplayState, StartWarning};
pub use scheduler::{ManualScheduler, TickScheduler, WallScheduler};
pub use view::{build_frame, ControlFlags, CursorView, RenderFrame, VisibleCandle};
