//! WebSocket API support
//!
//! The feedback-loop session endpoint, the commands it accepts and the
//! registry that routes workflow events back to the right socket.

pub mod commands;
pub mod handler;
pub mod registry;

pub use commands::{ClientCommand, CommandError};
pub use handler::{feedback_loop_ws, MISSING_API_KEY_REASON};
pub use registry::{EventSender, SessionRegistry};
