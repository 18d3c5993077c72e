//! Change-aware formatted text.
//!
//! [`CachedText`] pairs a raw-value getter with a formatter and reformats
//! only when the raw value actually changed. Formatting (allocation, numeric
//! rendering) is far more expensive than fetching and comparing a small
//! value, so each displayed field gets its own instance: a change in one
//! coordinate never reformats an unrelated light level.
//!
//! The type is generic over the raw value and both closures, monomorphized
//! per field, and boxed behind [`TextSource`] when stored in a scope table.

use crate::format::scope::TextSource;
use std::marker::PhantomData;

/// A getter/formatter pair with the last-seen raw value and its text.
pub struct CachedText<C, V, G, F>
where
    V: PartialEq,
    G: Fn(&C) -> V,
    F: Fn(&V) -> String,
{
    get: G,
    format: F,
    last: Option<V>,
    text: String,
    _ctx: PhantomData<fn(&C)>,
}

impl<C, V, G, F> CachedText<C, V, G, F>
where
    V: PartialEq,
    G: Fn(&C) -> V,
    F: Fn(&V) -> String,
{
    pub fn new(get: G, format: F) -> Self {
        Self {
            get,
            format,
            last: None,
            text: String::new(),
            _ctx: PhantomData,
        }
    }
}

impl<C, V, G, F> TextSource<C> for CachedText<C, V, G, F>
where
    V: PartialEq + Send,
    G: Fn(&C) -> V + Send,
    F: Fn(&V) -> String + Send,
{
    fn text(&mut self, ctx: &C) -> &str {
        let raw = (self.get)(ctx);
        // Reformat only on first fetch or when the raw value changed.
        if self.last.as_ref() != Some(&raw) {
            self.text = (self.format)(&raw);
            self.last = Some(raw);
        }
        &self.text
    }
}
