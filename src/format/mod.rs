//! Template formatting engine.
//!
//! Everything here is pure string machinery with no world or session
//! knowledge, kept separate so it can be exercised in isolation.
//!
//! # Module Structure
//!
//! - [`template`]: `%name%` compilation into segments
//! - [`scope`]: name → producer tables and expansion
//! - [`cached`]: change-aware formatted values
//! - [`fixed`]: one-decimal fixed-point scalars
//! - [`style`]: `&` → `§` code translation and truncation

pub mod cached;
pub mod fixed;
pub mod scope;
pub mod style;
pub mod template;

pub use cached::CachedText;
pub use fixed::Fixed1;
pub use scope::{Scope, TextSource};
pub use style::{MAX_HUD_LENGTH, translate_codes, truncate};
pub use template::{Segment, Template};
