//! The per-user status line engine.
//!
//! A [`Service`] keeps one [`SessionState`] per attached user, and a
//! [`Scheduler`] drives refresh cycles over them: capture a world snapshot
//! for every eligible session, format each session's line, hand the results
//! to a [`DisplaySink`]. Visibility and formats are per-user [`Setting`]s
//! that track the live configured defaults and persist through [`Store`].
//!
//! # Module Structure
//!
//! - [`scheduler`]: the two-phase refresh cycle
//! - [`service`]: the attach/detach session registry
//! - [`session`]: one user's sections, settings, and render pass
//! - [`settings`]: overridable values on top of live defaults
//! - [`store`]: per-user TOML documents on disk
//! - [`variables`]: the built-in variable catalog

mod scheduler;
mod service;
mod session;
mod settings;
mod store;
mod variables;

pub use scheduler::{CycleReport, Scheduler};
pub use service::{Service, SessionHandle};
pub use session::{Section, SessionState, Target};
pub use settings::{FormatSetting, Setting};
pub use store::Store;

use std::time::{SystemTime, UNIX_EPOCH};

/// Where rendered lines go. Called on the authoritative thread only, once
/// per delivered session per cycle.
pub trait DisplaySink {
    fn deliver(&mut self, user: &str, line: &str);
}

/// Wall-clock milliseconds since the Unix epoch, the timebase for cycle
/// stamps and suspension windows.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
