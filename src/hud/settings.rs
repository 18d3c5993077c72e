//! Per-user settings with live global defaults.
//!
//! A [`Setting`] holds an optional override on top of a default supplier
//! that is re-evaluated on every read. Unset settings therefore follow the
//! `[defaults]` config section as it reloads, with no per-user invalidation.
//!
//! The override is the only thing that persists. Storing an override equal
//! to the current default would pin today's default forever, so equality
//! collapses the override to unset, both on [`Setting::set`] and again on
//! [`Setting::save`] (the default may have changed since the override was
//! stored).

use crate::format::Template;
use crate::log;

/// Supplier of the current default, re-evaluated per read.
type DefaultFn<V> = Box<dyn Fn() -> V + Send + Sync>;

/// A per-user value: optional override plus a live default.
pub struct Setting<V> {
    key: &'static str,
    default: DefaultFn<V>,
    value: Option<V>,
}

/// A template-valued setting, persisted through its source string.
pub type FormatSetting = Setting<Template>;

impl<V: Clone + PartialEq> Setting<V> {
    pub fn new(key: &'static str, default: impl Fn() -> V + Send + Sync + 'static) -> Self {
        Self {
            key,
            default: Box::new(default),
            value: None,
        }
    }

    /// The document key this setting persists under.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// The effective value: the override if set, else the current default.
    pub fn get(&self) -> V {
        match &self.value {
            Some(value) => value.clone(),
            None => (self.default)(),
        }
    }

    /// The current default, ignoring any override.
    pub fn get_default(&self) -> V {
        (self.default)()
    }

    /// True iff no override is stored.
    pub fn is_default(&self) -> bool {
        self.value.is_none()
    }

    /// Install or clear the override. A value equal to the current default
    /// collapses to unset.
    pub fn set(&mut self, value: Option<V>) {
        self.value = match value {
            Some(value) if value == (self.default)() => None,
            other => other,
        };
    }
}

// ============================================================================
// Persistence
// ============================================================================

/// Conversion between a setting value and its TOML document form.
pub trait DocValue: Sized {
    fn to_toml(&self) -> toml::Value;
    fn from_toml(value: &toml::Value) -> Option<Self>;
}

impl DocValue for bool {
    fn to_toml(&self) -> toml::Value {
        toml::Value::Boolean(*self)
    }

    fn from_toml(value: &toml::Value) -> Option<Self> {
        value.as_bool()
    }
}

impl DocValue for Template {
    fn to_toml(&self) -> toml::Value {
        toml::Value::String(self.source().to_string())
    }

    fn from_toml(value: &toml::Value) -> Option<Self> {
        value.as_str().map(Template::compile)
    }
}

impl<V: Clone + PartialEq + DocValue> Setting<V> {
    /// Write the override into `doc`, or clear the key when unset. An
    /// override that meanwhile equals the current default is not written.
    pub fn save(&self, doc: &mut toml::Table) {
        match &self.value {
            Some(value) if *value != (self.default)() => {
                doc.insert(self.key.to_string(), value.to_toml());
            }
            _ => {
                doc.remove(self.key);
            }
        }
    }

    /// Read the override from `doc`. An absent key means unset; a value of
    /// the wrong shape is dropped with a warning.
    pub fn load(&mut self, doc: &toml::Table) {
        match doc.get(self.key) {
            Some(value) => match V::from_toml(value) {
                Some(value) => self.set(Some(value)),
                None => {
                    log!("warning"; "ignoring malformed value for '{}' in user data", self.key);
                    self.value = None;
                }
            },
            None => self.value = None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
