mod phase;
mod state;
mod timer;

pub use phase::Phase;
pub use state::{SessionConfig, SessionState, SessionStatus, COMPLETION_EPSILON};
pub use timer::{SessionTimer, MAX_PENDING_EVENTS};
