use serde_json::Value;
use std::{
    borrow::Cow,
    collections::{BTreeMap, btree_map},
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

/// A callable exposed to templates as a global. Arguments and the return
/// value cross the engine boundary as json values.
pub type TemplateFunction = Arc<dyn Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync>;

/// The error a [`TemplateFunction`] returns to fail the render that
/// called it
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FunctionError(Cow<'static, str>);

impl FunctionError {
    /// builds a new FunctionError with the provided message
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self(message.into())
    }
}

/**
Named [`TemplateFunction`]s, registered into every template set built
by a load.

```
use serde_json::{Value, json};
use trillium_views::FunctionMap;

let mut functions = FunctionMap::new();
functions.insert("upper", |args: &[Value]| {
    Ok(json!(args.first().and_then(Value::as_str).unwrap_or_default().to_uppercase()))
});

let upper = functions.get("upper").unwrap();
assert_eq!(upper(&[json!("loud")]).unwrap(), "LOUD");
```
*/
#[derive(Clone, Default)]
pub struct FunctionMap(BTreeMap<String, TemplateFunction>);

impl FunctionMap {
    /// builds an empty FunctionMap
    pub fn new() -> Self {
        Self::default()
    }

    /// registers `function` under `name`, replacing any previous
    /// function with that name
    pub fn insert<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        self.0.insert(name.into(), Arc::new(function));
    }

    /// chainable form of [`FunctionMap::insert`]
    pub fn with<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        self.insert(name, function);
        self
    }

    /// merges every function of `other` into this map. Functions in
    /// `other` win on name collisions.
    pub fn merge(&mut self, other: FunctionMap) {
        self.0.extend(other.0);
    }

    /// retrieves a function by name
    pub fn get(&self, name: &str) -> Option<&TemplateFunction> {
        self.0.get(name)
    }

    /// whether a function is registered under this name
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// registered function names, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// iterates over the registered functions in name order
    pub fn iter(&self) -> btree_map::Iter<'_, String, TemplateFunction> {
        self.0.iter()
    }

    /// the number of registered functions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// whether no functions are registered
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for FunctionMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl<'a> IntoIterator for &'a FunctionMap {
    type Item = (&'a String, &'a TemplateFunction);
    type IntoIter = btree_map::Iter<'a, String, TemplateFunction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, TemplateFunction)> for FunctionMap {
    fn from_iter<T: IntoIterator<Item = (K, TemplateFunction)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, f)| (k.into(), f)).collect())
    }
}

impl<K: Into<String>> Extend<(K, TemplateFunction)> for FunctionMap {
    fn extend<T: IntoIterator<Item = (K, TemplateFunction)>>(&mut self, iter: T) {
        self.0
            .extend(iter.into_iter().map(|(k, f)| (k.into(), f)));
    }
}
