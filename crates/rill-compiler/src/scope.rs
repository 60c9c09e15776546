//! Script Scope
//!
//! Read-only facade over the per-script information collected by earlier
//! phases: the script class metadata (entry point signature, accessor and
//! capability-probe methods), the set of identifier names the script actually
//! references, and boolean decorations keyed by user tree node identity.

use crate::ast::NodeId;
use crate::error::{LowerError, LowerResult};
use crate::location::Location;
use crate::settings::CompilerSettings;
use crate::ty::Ty;
use rustc_hash::FxHashSet;

/// Entry point parameter as declared by the script base class
#[derive(Debug, Clone)]
pub struct MethodArgument {
    pub name: String,
    pub ty: Ty,
}

/// Accessor method exposed to the script (`getX` convention)
#[derive(Debug, Clone)]
pub struct GetMethod {
    pub name: String,
    pub return_ty: Ty,
}

/// Metadata describing the class a script compiles into
#[derive(Debug, Clone)]
pub struct ScriptClassInfo {
    execute_arguments: Vec<MethodArgument>,
    execute_return: Ty,
    get_methods: Vec<GetMethod>,
    needs_methods: Vec<String>,
}

impl ScriptClassInfo {
    pub fn new(
        execute_arguments: Vec<MethodArgument>,
        execute_return: Ty,
        get_methods: Vec<GetMethod>,
        needs_methods: Vec<String>,
    ) -> Self {
        Self {
            execute_arguments,
            execute_return,
            get_methods,
            needs_methods,
        }
    }

    pub fn execute_arguments(&self) -> &[MethodArgument] {
        &self.execute_arguments
    }

    pub fn execute_return(&self) -> &Ty {
        &self.execute_return
    }

    /// Accessor methods in declaration order
    pub fn get_methods(&self) -> &[GetMethod] {
        &self.get_methods
    }

    /// Capability-probe method names (`needsX` convention) in declaration order
    pub fn needs_methods(&self) -> &[String] {
        &self.needs_methods
    }
}

/// All per-script state the lowering pass reads
#[derive(Debug)]
pub struct ScriptScope {
    script_info: ScriptClassInfo,
    settings: CompilerSettings,
    used_variables: FxHashSet<String>,
    method_escape: FxHashSet<NodeId>,
    all_escape: FxHashSet<NodeId>,
}

impl ScriptScope {
    pub fn new(script_info: ScriptClassInfo, settings: CompilerSettings) -> Self {
        Self {
            script_info,
            settings,
            used_variables: FxHashSet::default(),
            method_escape: FxHashSet::default(),
            all_escape: FxHashSet::default(),
        }
    }

    pub fn script_info(&self) -> &ScriptClassInfo {
        &self.script_info
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// Record that the script references an identifier name
    pub fn add_used_variable(&mut self, name: impl Into<String>) {
        self.used_variables.insert(name.into());
    }

    pub fn is_used_variable(&self, name: &str) -> bool {
        self.used_variables.contains(name)
    }

    /// Mark a function node as escaping on every control path
    pub fn mark_method_escape(&mut self, id: NodeId) {
        self.method_escape.insert(id);
    }

    pub fn method_escape(&self, id: NodeId) -> bool {
        self.method_escape.contains(&id)
    }

    /// Mark a block node as escaping on every control path
    pub fn mark_all_escape(&mut self, id: NodeId) {
        self.all_escape.insert(id);
    }

    pub fn all_escape(&self, id: NodeId) -> bool {
        self.all_escape.contains(&id)
    }
}

/// Derive the script-visible variable name from a convention-named method.
///
/// Strips `prefix_len` characters and lower-cases the first remaining one,
/// so `getCtx` exports `ctx` and `needsScore` probes `score`. A name with
/// nothing left after the prefix, or whose remainder does not start with a
/// letter, is a malformed script base class.
pub fn exported_variable_name(
    method_name: &str,
    prefix_len: usize,
    location: &Location,
) -> LowerResult<String> {
    let rest = method_name.get(prefix_len..).unwrap_or("");
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => {
            Ok(first.to_lowercase().chain(chars).collect())
        }
        _ => Err(LowerError::InvalidAccessorName {
            location: location.clone(),
            name: method_name.to_string(),
        }),
    }
}
