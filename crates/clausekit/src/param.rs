//! Parameter values and the ordered parameter store.

use crate::error::{BuilderError, BuilderResult};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Identity of a value for parameter reuse: its type plus its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ReuseKey {
    type_id: TypeId,
    text: String,
}

trait ErasedValue: Send + Sync {
    fn as_sql(&self) -> &(dyn ToSql + Sync);
    fn raw_text(&self) -> Option<String>;
    fn reuse_key(&self) -> Option<ReuseKey>;
}

struct Displayed<T>(T);

impl<T> ErasedValue for Displayed<T>
where
    T: ToSql + Display + Send + Sync + 'static,
{
    fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &self.0
    }

    fn raw_text(&self) -> Option<String> {
        Some(self.0.to_string())
    }

    fn reuse_key(&self) -> Option<ReuseKey> {
        Some(ReuseKey {
            type_id: TypeId::of::<T>(),
            text: self.0.to_string(),
        })
    }
}

struct Opaque<T>(T);

impl<T> ErasedValue for Opaque<T>
where
    T: ToSql + Send + Sync + 'static,
{
    fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &self.0
    }

    fn raw_text(&self) -> Option<String> {
        None
    }

    fn reuse_key(&self) -> Option<ReuseKey> {
        None
    }
}

/// A clone-friendly, type-erased dynamic value.
///
/// Values created with [`Param::new`] can be bound or inlined as text; values created
/// with [`Param::opaque`] (e.g. `Option<T>`, `Vec<T>`) can only be bound.
#[derive(Clone)]
pub struct Param(Arc<dyn ErasedValue>);

impl Param {
    /// Wrap a value that can be bound as a parameter or rendered as text.
    pub fn new<T: ToSql + Display + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(Displayed(value)))
    }

    /// Wrap a value that can only be bound as a parameter.
    pub fn opaque<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(Opaque(value)))
    }

    /// The value as a `ToSql` trait object for tokio-postgres.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        self.0.as_sql()
    }

    /// Textual form of the value, if it has one.
    pub fn raw_text(&self) -> Option<String> {
        self.0.raw_text()
    }

    pub(crate) fn reuse_key(&self) -> Option<ReuseKey> {
        self.0.reuse_key()
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.raw_text() {
            Some(text) => f.debug_tuple("Param").field(&text).finish(),
            None => f.debug_tuple("Param").field(&"<dyn ToSql>").finish(),
        }
    }
}

/// A named parameter binding.
#[derive(Clone, Debug)]
pub struct ParameterBinding {
    name: String,
    value: Param,
}

impl ParameterBinding {
    /// The parameter name (without placeholder prefix).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound value.
    pub fn value(&self) -> &Param {
        &self.value
    }

    /// Split into name and value.
    pub fn into_parts(self) -> (String, Param) {
        (self.name, self.value)
    }
}

/// Ordered parameter store that owns name uniqueness.
///
/// Generated names are `{prefix}{n}` with `n` increasing monotonically; names already
/// taken by manual bindings are skipped.
#[derive(Clone, Debug, Default)]
pub struct ParamStore {
    bindings: Vec<ParameterBinding>,
    names: HashSet<String>,
    reusable: HashMap<ReuseKey, usize>,
    next_suffix: usize,
}

impl ParamStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value under a generated name and return its 0-based index.
    ///
    /// With `reuse` set, a value equal to a previously registered one returns the
    /// existing index instead.
    pub fn bind(&mut self, value: Param, name_prefix: &str, reuse: bool) -> usize {
        let key = if reuse { value.reuse_key() } else { None };
        if let Some(index) = key.as_ref().and_then(|k| self.reusable.get(k)) {
            return *index;
        }

        let name = self.next_name(name_prefix);
        let index = self.push(name, value);
        if let Some(key) = key {
            self.reusable.insert(key, index);
        }
        index
    }

    /// Register a value under an explicit name and return its 0-based index.
    pub fn bind_named(&mut self, name: impl Into<String>, value: Param) -> BuilderResult<usize> {
        let name = name.into();
        if name.is_empty() {
            return Err(BuilderError::invalid_operation("parameter name cannot be empty"));
        }
        if self.names.contains(&name) {
            return Err(BuilderError::invalid_operation(format!(
                "parameter '{name}' is already bound"
            )));
        }
        Ok(self.push(name, value))
    }

    fn next_name(&mut self, prefix: &str) -> String {
        loop {
            let candidate = format!("{prefix}{}", self.next_suffix);
            self.next_suffix += 1;
            if !self.names.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn push(&mut self, name: String, value: Param) -> usize {
        self.names.insert(name.clone());
        self.bindings.push(ParameterBinding { name, value });
        self.bindings.len() - 1
    }

    /// Binding at `index`.
    pub fn get(&self, index: usize) -> Option<&ParameterBinding> {
        self.bindings.get(index)
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in insertion order.
    pub fn bindings(&self) -> &[ParameterBinding] {
        &self.bindings
    }

    /// Parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.name.as_str())
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.bindings.iter().map(|b| b.value.as_sql()).collect()
    }

    /// Take the bindings out, leaving the store empty.
    pub fn take(&mut self) -> Vec<ParameterBinding> {
        self.names.clear();
        self.reusable.clear();
        self.next_suffix = 0;
        std::mem::take(&mut self.bindings)
    }

    /// Clear all parameters and restart name generation.
    pub fn clear(&mut self) {
        self.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_sequential() {
        let mut store = ParamStore::new();
        assert_eq!(store.bind(Param::new(1_i32), "p", false), 0);
        assert_eq!(store.bind(Param::new("x"), "p", false), 1);
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["p0", "p1"]);
        assert_eq!(store.as_refs().len(), 2);
    }

    #[test]
    fn generated_names_skip_manual_names() {
        let mut store = ParamStore::new();
        store.bind_named("p0", Param::new(10_i64)).unwrap();
        store.bind(Param::new(11_i64), "p", false);
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["p0", "p1"]);
    }

    #[test]
    fn duplicate_manual_name_is_rejected() {
        let mut store = ParamStore::new();
        store.bind_named("id", Param::new(1_i32)).unwrap();
        let err = store.bind_named("id", Param::new(2_i32)).unwrap_err();
        assert!(err.is_invalid_operation());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reuse_matches_type_and_text() {
        let mut store = ParamStore::new();
        let a = store.bind(Param::new(5_i32), "p", true);
        let b = store.bind(Param::new(5_i32), "p", true);
        let c = store.bind(Param::new(5_i64), "p", true);
        let d = store.bind(Param::new("5"), "p", true);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(c, d);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn opaque_values_are_never_reused() {
        let mut store = ParamStore::new();
        store.bind(Param::opaque(Some(1_i32)), "p", true);
        store.bind(Param::opaque(Some(1_i32)), "p", true);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn take_restarts_naming() {
        let mut store = ParamStore::new();
        store.bind(Param::new(1_i32), "p", false);
        let taken = store.take();
        assert_eq!(taken.len(), 1);
        assert!(store.is_empty());
        store.bind(Param::new(2_i32), "p", false);
        assert_eq!(store.get(0).map(|b| b.name()), Some("p0"));
    }

    #[test]
    fn debug_shows_text_when_available() {
        assert_eq!(format!("{:?}", Param::new(7_i32)), r#"Param("7")"#);
        assert_eq!(
            format!("{:?}", Param::opaque(Some(7_i32))),
            r#"Param("<dyn ToSql>")"#
        );
    }
}
