/// Request orchestration.
pub mod compositor;
/// Post-composition events.
pub mod hooks;
