//! Runtime value type system
//!
//! This module implements `Value`, the unified representation of every script
//! value the built-in library receives or produces. Primitives are stored
//! inline, strings and arrays are shared through `Arc`, ordinary objects go
//! through the object model in [`super::object`], and promises are handles into
//! the realm's settlement-cell arena.

use std::fmt;
use std::sync::Arc;

use super::object::{JsObject, NativeCallable, ObjectRef};
use crate::runtime::errors::JsResult;
use crate::runtime::realm::Realm;
use crate::std::promise::PromiseId;

/// Value type enumeration for `typeof`-style queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// Boolean
    Bool,
    /// IEEE-754 double
    Number,
    /// String
    String,
    /// Immutable array snapshot
    Array,
    /// Ordinary object without a call slot
    Object,
    /// Object with a call slot
    Function,
    /// Promise handle
    Promise,
}

/// Runtime value - unified representation of all script values
///
/// # Design Principles
/// - Uses `enum` for easy pattern matching
/// - `Arc` for shared ownership of strings, arrays and objects
/// - Promises are arena handles; the realm owns the cell they point to
#[derive(Clone, Default)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,

    /// `null`
    Null,

    /// Boolean (stored directly)
    Bool(bool),

    /// Number (stored directly)
    Number(f64),

    /// String (shared string, Arc<str>)
    String(Arc<str>),

    /// Array snapshot (combinator results, iterable inputs)
    Array(Arc<[Value]>),

    /// Ordinary or callable object
    Object(ObjectRef),

    /// Promise handle into the realm arena
    Promise(PromiseId),
}

// ============================================================================
// Constructors
// ============================================================================

impl Value {
    /// Create a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Arc::from(s.as_ref()))
    }

    /// Create an array value from its elements
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Arc::from(elements))
    }

    /// Create a native function value
    pub fn function<F>(
        name: &str,
        func: F,
    ) -> Self
    where
        F: Fn(&mut Realm, &Value, &[Value]) -> JsResult<Value> + Send + Sync + 'static,
    {
        Value::Object(ObjectRef::function(name, func))
    }

    /// Create a plain object from `(key, value)` pairs, keeping their order
    pub fn object<K, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(ObjectRef::from_entries(entries))
    }
}

// ============================================================================
// Type Query Methods
// ============================================================================

impl Value {
    /// Get the type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Undefined => ValueType::Undefined,
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(obj) if obj.is_callable() => ValueType::Function,
            Value::Object(_) => ValueType::Object,
            Value::Promise(_) => ValueType::Promise,
        }
    }

    /// `typeof` result string
    pub fn type_of(&self) -> &'static str {
        match self.value_type() {
            ValueType::Undefined => "undefined",
            ValueType::Null | ValueType::Array | ValueType::Object | ValueType::Promise => "object",
            ValueType::Bool => "boolean",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Function => "function",
        }
    }

    /// `undefined` or `null`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Check whether this value has a call slot
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Object(obj) if obj.is_callable())
    }

    /// Get the object if this value is callable
    pub fn as_callable(&self) -> Option<ObjectRef> {
        match self {
            Value::Object(obj) if obj.is_callable() => Some(obj.clone()),
            _ => None,
        }
    }

    /// Get the object reference
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Get the promise handle
    pub fn as_promise(&self) -> Option<PromiseId> {
        match self {
            Value::Promise(id) => Some(*id),
            _ => None,
        }
    }

    /// Convert to bool
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to f64
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the string contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the array elements
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::array(elements)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<JsObject> for Value {
    fn from(obj: JsObject) -> Self {
        Value::Object(ObjectRef::new(obj))
    }
}

impl From<PromiseId> for Value {
    fn from(id: PromiseId) -> Self {
        Value::Promise(id)
    }
}

impl From<NativeCallable> for Value {
    fn from(func: NativeCallable) -> Self {
        Value::Object(ObjectRef::new(JsObject::with_call("", func)))
    }
}

// ============================================================================
// Equality
// ============================================================================

/// Primitives compare by value, arrays element-wise, objects and promises by
/// identity.
impl PartialEq for Value {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Promise(a), Value::Promise(b)) => a == b,
            _ => false,
        }
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

/// Format a number the way script string conversion does for the common cases.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(elements) => {
                write!(
                    f,
                    "{}",
                    elements
                        .iter()
                        .map(|v| if v.is_nullish() { String::new() } else { v.to_string() })
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
            Value::Object(obj) => write!(f, "{}", obj),
            Value::Promise(_) => write!(f, "[object Promise]"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(elements) => f.debug_list().entries(elements.iter()).finish(),
            Value::Object(obj) => write!(f, "{:?}", obj),
            Value::Promise(id) => write!(f, "{}", id),
        }
    }
}
