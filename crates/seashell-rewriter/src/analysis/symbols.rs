use std::collections::HashMap;

use crate::types::TypeDesc;

/// Lexically scoped name-to-type bindings. The outermost scope is the REPL
/// session scope and survives across submissions; inner scopes are pushed
/// and popped around function bodies during inference.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, TypeDesc>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self { scopes: vec![HashMap::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        // the session scope is never popped
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds `name` in the innermost scope, shadowing any outer binding.
    pub fn add(&mut self, name: impl Into<String>, ty: TypeDesc) {
        self.scopes
            .last_mut()
            .expect("symbol table always has a scope")
            .insert(name.into(), ty);
    }

    /// Innermost binding wins; unbound names are simply unknown.
    pub fn lookup(&self, name: &str) -> TypeDesc {
        for scope in self.scopes.iter().rev() {
            if let Some(ty) = scope.get(name) {
                return ty.clone();
            }
        }
        TypeDesc::Unknown
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn innermost_binding_shadows() {
        let mut table = SymbolTable::new();
        table.add("x", TypeDesc::Class(0));
        table.push_scope();
        table.add("x", TypeDesc::Class(1));
        assert_eq!(table.lookup("x"), TypeDesc::Class(1));
        table.pop_scope();
        assert_eq!(table.lookup("x"), TypeDesc::Class(0));
    }

    #[test]
    fn unbound_is_unknown() {
        let table = SymbolTable::new();
        assert!(table.lookup("nope").is_unknown());
    }

    #[test]
    fn session_scope_survives_pop() {
        let mut table = SymbolTable::new();
        table.pop_scope();
        assert_eq!(table.depth(), 1);
    }
}
