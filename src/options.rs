//! Configuration options for decoding.
//!
//! This module provides types to customize how documents are bound:
//!
//! - [`DecodeOptions`]: Main configuration struct
//! - [`UnknownFieldPolicy`]: What to do with keys the destination does not declare
//! - [`KeyMatching`]: How document keys are matched to field names
//! - [`DecodeHooks`]: Custom conversions keyed by destination type name
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_toml::{from_str_with_options, DecodeOptions};
//!
//! #[derive(Deserialize)]
//! struct Config {
//!     name: String,
//! }
//!
//! let options = DecodeOptions::new().deny_unknown_fields();
//! let result: Result<Config, _> = from_str_with_options("name = \"x\"\nextra = 1", &options);
//! assert!(result.is_err());
//! ```

use crate::error::{Error, Result};
use crate::parser::DEFAULT_MAX_DEPTH;
use crate::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What happens to document keys that match no field of the destination struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Skip them. They are logged at debug level.
    #[default]
    Ignore,
    /// Fail with [`BindErrorKind::UnknownField`](crate::BindErrorKind::UnknownField).
    Error,
}

/// How document keys are matched against struct field names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyMatching {
    /// Keys must equal the (possibly renamed) field name.
    Exact,
    /// A key with no exact match binds to the field that equals it ignoring
    /// ASCII case, so `Title` fills `title`.
    #[default]
    CaseInsensitive,
}

type Hook = Arc<dyn Fn(&Value) -> std::result::Result<Value, String> + Send + Sync>;

/// Registry of custom decode hooks.
///
/// A hook is registered under the name serde reports for the destination
/// type: the struct or enum name for derived types, or the `rename` given to
/// the container. When the binder reaches a destination with that name it
/// passes the node to the hook and binds the node the hook returns instead.
/// An `Err` from the hook becomes a
/// [`BindErrorKind::TypeMismatch`](crate::BindErrorKind::TypeMismatch) carrying
/// the hook's message.
#[derive(Clone, Default)]
pub struct DecodeHooks {
    hooks: HashMap<String, Hook>,
}

impl DecodeHooks {
    #[must_use]
    pub fn new() -> Self {
        DecodeHooks::default()
    }

    pub fn insert<F>(&mut self, type_name: impl Into<String>, hook: F)
    where
        F: Fn(&Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.hooks.insert(type_name.into(), Arc::new(hook));
    }

    /// Runs the hook registered for `type_name`, if any.
    pub(crate) fn apply(
        &self,
        type_name: &str,
        value: &Value,
    ) -> Option<std::result::Result<Value, String>> {
        self.hooks.get(type_name).map(|hook| hook(value))
    }

    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.hooks.contains_key(type_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for DecodeHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.hooks.keys().collect();
        names.sort();
        f.debug_set().entries(names).finish()
    }
}

/// Configuration options for decoding.
///
/// Options are read-only while a decode call runs, so one value can be shared
/// across threads and calls.
///
/// # Examples
///
/// ```rust
/// use serde_toml::{DecodeOptions, KeyMatching, UnknownFieldPolicy};
///
/// let options = DecodeOptions::new()
///     .with_unknown_fields(UnknownFieldPolicy::Error)
///     .with_key_matching(KeyMatching::Exact)
///     .with_max_depth(32);
/// assert_eq!(options.max_depth, 32);
/// ```
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    pub unknown_fields: UnknownFieldPolicy,
    pub key_matching: KeyMatching,
    /// Deepest allowed nesting of tables, arrays and dotted keys.
    pub max_depth: usize,
    hooks: Arc<DecodeHooks>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            unknown_fields: UnknownFieldPolicy::default(),
            key_matching: KeyMatching::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            hooks: Arc::new(DecodeHooks::new()),
        }
    }
}

impl DecodeOptions {
    /// Creates default options: unknown keys ignored, exact key matching,
    /// a nesting limit of 200 and no hooks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_toml::{DecodeOptions, UnknownFieldPolicy};
    ///
    /// let options = DecodeOptions::new();
    /// assert_eq!(options.unknown_fields, UnknownFieldPolicy::Ignore);
    /// assert_eq!(options.max_depth, 200);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Shorthand for `with_unknown_fields(UnknownFieldPolicy::Error)`.
    #[must_use]
    pub fn deny_unknown_fields(self) -> Self {
        self.with_unknown_fields(UnknownFieldPolicy::Error)
    }

    #[must_use]
    pub fn with_key_matching(mut self, matching: KeyMatching) -> Self {
        self.key_matching = matching;
        self
    }

    /// Sets the nesting limit. Zero is rejected when the options are used.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Registers a hook for the destination type named `type_name`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde::Deserialize;
    /// use serde_toml::{from_str_with_options, DecodeOptions, Value};
    ///
    /// #[derive(Deserialize, Debug, PartialEq)]
    /// struct Port(u16);
    ///
    /// #[derive(Deserialize)]
    /// struct Config {
    ///     port: Port,
    /// }
    ///
    /// let options = DecodeOptions::new().with_hook("Port", |value: &Value| match value {
    ///     Value::String(s) => s.parse::<i64>().map(Value::Integer).map_err(|e| e.to_string()),
    ///     other => Ok(other.clone()),
    /// });
    /// let config: Config = from_str_with_options("port = \"8080\"", &options).unwrap();
    /// assert_eq!(config.port, Port(8080));
    /// ```
    #[must_use]
    pub fn with_hook<F>(mut self, type_name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.hooks).insert(type_name, hook);
        self
    }

    /// Replaces all hooks with `hooks`.
    #[must_use]
    pub fn with_hooks(mut self, hooks: DecodeHooks) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    #[must_use]
    pub fn hooks(&self) -> &DecodeHooks {
        &self.hooks
    }

    /// Checks that the options can be used for decoding.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::configuration("max_depth must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::new();
        assert_eq!(options.unknown_fields, UnknownFieldPolicy::Ignore);
        assert_eq!(options.key_matching, KeyMatching::CaseInsensitive);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(options.hooks().is_empty());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_zero_depth_is_a_configuration_error() {
        let err = DecodeOptions::new().with_max_depth(0).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_hooks_are_shared_between_clones() {
        let options = DecodeOptions::new().with_hook("Celsius", |v: &Value| Ok(v.clone()));
        let copy = options.clone();
        assert!(Arc::ptr_eq(&options.hooks, &copy.hooks));

        let extended = copy.with_hook("Kelvin", |_: &Value| Err("no".to_string()));
        assert_eq!(options.hooks().len(), 1);
        assert_eq!(extended.hooks().len(), 2);
        assert_eq!(
            extended.hooks().apply("Kelvin", &Value::from(1)),
            Some(Err("no".to_string()))
        );
        assert_eq!(extended.hooks().apply("Fahrenheit", &Value::from(1)), None);
    }

    #[test]
    fn test_options_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DecodeOptions>();
    }

    #[test]
    fn test_debug_lists_hook_names() {
        let mut hooks = DecodeHooks::new();
        hooks.insert("B", |v: &Value| Ok(v.clone()));
        hooks.insert("A", |v: &Value| Ok(v.clone()));
        assert_eq!(format!("{:?}", hooks), r#"{"A", "B"}"#);
    }
}
