//! 外部函数注册表
//!
//! Native functions callable from scripts, keyed by their qualified name
//! (`Promise.resolve`, `Promise.prototype.then`, ...).

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::runtime::errors::{JsResult, RealmError};
use crate::runtime::realm::Realm;
use crate::runtime::value::{ObjectRef, Value};

/// Native call convention: `(realm, this, args) -> completion`
pub type NativeFunction = fn(&mut Realm, &Value, &[Value]) -> JsResult<Value>;

/// 外部函数定义
#[derive(Debug, Clone, Copy)]
pub struct ExternalFunction {
    /// Qualified name
    pub name: &'static str,
    /// Rust 函数指针
    pub func: NativeFunction,
}

impl ExternalFunction {
    /// Wrap the native in a callable object named after its last path segment.
    pub fn to_object(&self) -> ObjectRef {
        let short = self.name.rsplit('.').next().unwrap_or(self.name);
        ObjectRef::function(short, self.func)
    }
}

/// 外部函数注册表
pub static EXTERNAL_FUNCTIONS: Lazy<ExternalFunctionRegistry> = Lazy::new(|| {
    let mut registry = ExternalFunctionRegistry::new();
    registry.init_stdlib();
    registry
});

/// 外部函数注册表类型
#[derive(Debug, Default)]
pub struct ExternalFunctionRegistry {
    functions: HashMap<&'static str, ExternalFunction>,
}

impl ExternalFunctionRegistry {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// 注册外部函数
    pub fn register(
        &mut self,
        func: ExternalFunction,
    ) {
        self.functions.insert(func.name, func);
    }

    /// 获取外部函数
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&ExternalFunction> {
        self.functions.get(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// 初始化所有标准库函数
    fn init_stdlib(&mut self) {
        // std.promise
        for decl in crate::std::promise::native_declarations() {
            if decl.implemented {
                self.register(ExternalFunction {
                    name: decl.native_name,
                    func: decl.func,
                });
            }
        }
    }
}

impl Realm {
    /// Invoke a registered native by qualified name.
    pub fn call_native(
        &mut self,
        name: &str,
        this: &Value,
        args: &[Value],
    ) -> JsResult<Value> {
        let native = EXTERNAL_FUNCTIONS
            .get(name)
            .ok_or_else(|| RealmError::UnknownNative(name.to_string()))?;
        (native.func)(self, this, args)
    }
}
