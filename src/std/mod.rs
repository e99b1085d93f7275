//! Standard library
//!
//! Built-in objects installed into every realm. Currently `std.promise`.

pub mod promise;

/// Represents a function exported from a std module.
#[derive(Debug, Clone)]
pub struct ModuleExport {
    /// Short name (e.g., "then")
    pub short_name: &'static str,
    /// Fully qualified name (e.g., "Promise.prototype.then")
    pub qualified_name: &'static str,
    /// Function signature (e.g., "(onRejected?: Function) -> Promise")
    pub signature: &'static str,
}

/// Get all exports from a std module.
///
/// Returns None if the module doesn't exist or has no exports.
pub fn get_module_exports(module_path: &str) -> Option<Vec<ModuleExport>> {
    match module_path {
        // "std" 模块：返回所有子模块
        "std" => Some(vec![ModuleExport {
            short_name: "promise",
            qualified_name: "std.promise",
            signature: "Module",
        }]),
        "std.promise" => Some(
            promise::native_declarations()
                .into_iter()
                .filter(|d| d.implemented)
                .map(|d| ModuleExport {
                    short_name: d.name,
                    qualified_name: d.native_name,
                    signature: d.signature,
                })
                .collect(),
        ),
        _ => None,
    }
}
