use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
    ops::{Deref, DerefMut},
};

/**
The named values made available to a template for the duration of a
single render. Values can be any type that is serde serializable.

Most binding shapes convert into `Bindings` without ceremony:

```
use serde_json::json;
use std::collections::HashMap;
use trillium_views::Bindings;

assert!(Bindings::from(()).is_empty());
assert!(Bindings::from(None::<Bindings>).is_empty());

let bindings = Bindings::from(json!({ "Title": "Hello, World!" }));
assert_eq!(bindings["Title"], "Hello, World!");

let mut map = HashMap::new();
map.insert("Title", json!("Hello, World!"));
assert_eq!(Bindings::from(map), bindings);
```
*/
#[derive(Default, Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Bindings(Map<String, Value>);

impl Bindings {
    /// builds an empty set of bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// serializes `value` and binds it under `key`
    pub fn assign(&mut self, key: impl Into<String>, value: impl Serialize) -> serde_json::Result<()> {
        self.0.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// chainable form of [`Bindings::assign`]
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> serde_json::Result<Self> {
        self.assign(key, value)?;
        Ok(self)
    }

    /// builds bindings from anything that serializes to a map, such as a
    /// struct. A value that serializes to null produces empty bindings.
    pub fn from_serialize(value: &impl Serialize) -> serde_json::Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(serde::ser::Error::custom(format!(
                "bindings must serialize to a map, not {other}"
            ))),
        }
    }

    /// unwraps the underlying map
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Deref for Bindings {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Bindings {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<()> for Bindings {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl<B: Into<Bindings>> From<Option<B>> for Bindings {
    fn from(bindings: Option<B>) -> Self {
        bindings.map(Into::into).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for Bindings {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Value> for Bindings {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            Value::Null => Self::default(),
            other => {
                log::debug!("ignoring non-map bindings {other}");
                Self::default()
            }
        }
    }
}

impl<K: Into<String>, S: BuildHasher> From<HashMap<K, Value, S>> for Bindings {
    fn from(map: HashMap<K, Value, S>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>> From<BTreeMap<K, Value>> for Bindings {
    fn from(map: BTreeMap<K, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
