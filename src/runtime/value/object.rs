//! Minimal object model
//!
//! Objects are shared, lock-guarded property maps with an optional native call
//! slot. Property order is insertion order. Functions are ordinary objects
//! whose call slot is set, which is all the promise machinery needs to tell a
//! thenable apart from any other object.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::runtime_value::Value;
use crate::runtime::errors::JsResult;
use crate::runtime::realm::Realm;

/// Native call slot: `(realm, this, args) -> completion`.
pub type NativeCallable = Arc<dyn Fn(&mut Realm, &Value, &[Value]) -> JsResult<Value> + Send + Sync>;

/// Property key. Only string keys are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyKey(Arc<str>);

impl PropertyKey {
    /// Borrow the key text
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Object storage
#[derive(Default)]
pub struct JsObject {
    /// Own properties in insertion order
    properties: IndexMap<PropertyKey, Value>,
    /// Call slot (functions only)
    call: Option<NativeCallable>,
    /// Function name for display
    name: Option<Arc<str>>,
}

impl JsObject {
    /// Create an empty plain object
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a callable object
    pub fn with_call(
        name: &str,
        call: NativeCallable,
    ) -> Self {
        Self {
            properties: IndexMap::new(),
            call: Some(call),
            name: Some(Arc::from(name)),
        }
    }

    /// Get an own property
    pub fn get(
        &self,
        key: &str,
    ) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Create or overwrite an own property
    pub fn insert(
        &mut self,
        key: impl Into<PropertyKey>,
        value: Value,
    ) -> Option<Value> {
        self.properties.insert(key.into(), value)
    }

    /// Number of own properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the object has no own properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl std::borrow::Borrow<str> for PropertyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Shared handle to an object
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<JsObject>>);

impl ObjectRef {
    /// Wrap object storage in a shared handle
    pub fn new(obj: JsObject) -> Self {
        Self(Arc::new(RwLock::new(obj)))
    }

    /// Create an empty plain object
    pub fn plain() -> Self {
        Self::new(JsObject::new())
    }

    /// Create a native function object
    pub fn function<F>(
        name: &str,
        func: F,
    ) -> Self
    where
        F: Fn(&mut Realm, &Value, &[Value]) -> JsResult<Value> + Send + Sync + 'static,
    {
        Self::new(JsObject::with_call(name, Arc::new(func)))
    }

    /// Create a plain object from `(key, value)` pairs
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut obj = JsObject::new();
        for (key, value) in entries {
            obj.insert(key.as_ref(), value);
        }
        Self::new(obj)
    }

    /// Get an own property (cloned out of the lock)
    pub fn get(
        &self,
        key: &str,
    ) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    /// Create or overwrite an own property
    pub fn set(
        &self,
        key: impl Into<PropertyKey>,
        value: Value,
    ) {
        self.0.write().insert(key, value);
    }

    /// Check for an own property
    pub fn has(
        &self,
        key: &str,
    ) -> bool {
        self.0.read().properties.contains_key(key)
    }

    /// Own property keys in insertion order
    pub fn keys(&self) -> Vec<PropertyKey> {
        self.0.read().properties.keys().cloned().collect()
    }

    /// Whether the call slot is set
    pub fn is_callable(&self) -> bool {
        self.0.read().call.is_some()
    }

    /// Clone the call slot out of the lock so the callee can freely touch this
    /// object while running.
    pub fn call_slot(&self) -> Option<NativeCallable> {
        self.0.read().call.clone()
    }

    /// Function name, if this is a function object
    pub fn name(&self) -> Option<Arc<str>> {
        self.0.read().name.clone()
    }

    /// Identity comparison
    #[inline]
    pub fn ptr_eq(
        &self,
        other: &ObjectRef,
    ) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let obj = self.0.read();
        if obj.call.is_some() {
            let name = obj.name.as_deref().unwrap_or("");
            return write!(f, "function {}() {{ [native code] }}", name);
        }
        // error-shaped objects print like `TypeError: message`
        match (obj.get("name"), obj.get("message")) {
            (Some(Value::String(name)), Some(Value::String(message))) => {
                write!(f, "{}: {}", name, message)
            }
            _ => write!(f, "[object Object]"),
        }
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let obj = self.0.read();
        if obj.call.is_some() {
            return write!(f, "[Function: {}]", obj.name.as_deref().unwrap_or("anonymous"));
        }
        f.debug_map()
            .entries(obj.properties.iter().map(|(k, v)| (k.as_str(), v)))
            .finish()
    }
}
