//! Client-side notification state.
//!
//! [`state`] holds the pure data model and its invariants, [`session`]
//! wires it to the REST client and push transport, and [`registry`]
//! shares one live session per user across the process.

mod registry;
mod session;
mod state;

pub use registry::SessionRegistry;
pub use session::{NotificationFeed, NotificationSession};
pub use state::{FeedSnapshot, NotificationState};
