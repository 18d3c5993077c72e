//! Variable scopes for template expansion.
//!
//! A [`Scope`] maps variable names to text producers and drives expansion of
//! a compiled [`Template`]. Producers are evaluated lazily, only when a
//! variable is actually referenced, so hiding a section skips every lookup it
//! would have made. Unbound names render as the literal `%name%` token:
//! misconfiguration stays visible instead of crashing or blanking the line.
//!
//! The scope is generic over a context type `C` (the per-cycle snapshot in
//! practice) passed by reference into every producer, which keeps producers
//! free of captured mutable state.

use crate::format::template::{Segment, Template};
use rustc_hash::FxHashMap;

/// A lazily-evaluated text producer bound to a variable name.
///
/// `text` takes `&mut self` so implementations can cache across calls; see
/// [`CachedText`](crate::format::CachedText).
pub trait TextSource<C>: Send {
    fn text(&mut self, ctx: &C) -> &str;
}

enum Binding<C> {
    /// Fixed text, rebound from the outside (e.g. a section's rendered line).
    Text(String),
    Source(Box<dyn TextSource<C>>),
}

/// Name → producer table used to expand templates.
pub struct Scope<C> {
    bindings: FxHashMap<String, Binding<C>>,
}

impl<C> Scope<C> {
    pub fn new() -> Self {
        Self {
            bindings: FxHashMap::default(),
        }
    }

    /// Bind a name to a lazy producer, replacing any previous binding.
    pub fn bind(&mut self, name: &str, source: impl TextSource<C> + 'static) {
        self.bindings
            .insert(name.to_string(), Binding::Source(Box::new(source)));
    }

    /// Bind a name to fixed text, replacing any previous binding.
    pub fn bind_text(&mut self, name: &str, text: impl Into<String>) {
        self.bindings
            .insert(name.to_string(), Binding::Text(text.into()));
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Expand a template: literals verbatim, variables through their
    /// bindings, unbound variables as the literal `%name%` token.
    pub fn expand(&mut self, template: &Template, ctx: &C) -> String {
        let mut out = String::with_capacity(template.source().len());
        for segment in template.segments() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => match self.bindings.get_mut(name) {
                    Some(Binding::Text(text)) => out.push_str(text),
                    Some(Binding::Source(source)) => out.push_str(source.text(ctx)),
                    None => {
                        out.push('%');
                        out.push_str(name);
                        out.push('%');
                    }
                },
            }
        }
        out
    }
}

impl<C> Default for Scope<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl<C> TextSource<C> for Fixed {
        fn text(&mut self, _ctx: &C) -> &str {
            self.0
        }
    }

    #[test]
    fn test_expand_with_bindings() {
        let mut scope: Scope<()> = Scope::new();
        scope.bind("x", Fixed("10"));
        scope.bind_text("y", "64");

        let template = Template::compile("X:%x% Y:%y%");
        assert_eq!(scope.expand(&template, &()), "X:10 Y:64");
    }

    #[test]
    fn test_unbound_renders_token() {
        let mut scope: Scope<()> = Scope::new();
        let template = Template::compile("at %place%");
        assert_eq!(scope.expand(&template, &()), "at %place%");
    }

    #[test]
    fn test_rebind_replaces() {
        let mut scope: Scope<()> = Scope::new();
        scope.bind_text("who", "alice");
        scope.bind_text("who", "bob");
        assert_eq!(scope.expand(&Template::compile("%who%"), &()), "bob");
    }

    #[test]
    fn test_lazy_evaluation_skips_unreferenced() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        struct Counting(Arc<AtomicUsize>);

        impl<C> TextSource<C> for Counting {
            fn text(&mut self, _ctx: &C) -> &str {
                self.0.fetch_add(1, Ordering::Relaxed);
                "hit"
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let mut scope: Scope<()> = Scope::new();
        scope.bind("unused", Counting(Arc::clone(&calls)));
        scope.bind_text("used", "text");

        scope.expand(&Template::compile("%used%"), &());
        assert_eq!(calls.load(Ordering::Relaxed), 0);

        scope.expand(&Template::compile("%used% %unused%"), &());
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_context_reaches_sources() {
        struct Echo(String);

        impl TextSource<String> for Echo {
            fn text(&mut self, ctx: &String) -> &str {
                self.0 = ctx.clone();
                &self.0
            }
        }

        let mut scope: Scope<String> = Scope::new();
        scope.bind("ctx", Echo(String::new()));
        assert_eq!(
            scope.expand(&Template::compile("<%ctx%>"), &"live".to_string()),
            "<live>"
        );
    }
}
