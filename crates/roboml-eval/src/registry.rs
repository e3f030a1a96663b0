//! Function lookup for call dispatch.

use roboml_types::ast::{FunctionDef, Program};
use std::collections::BTreeMap;

/// Name → definition table, built once per run.
///
/// Duplicate names and the presence of the entry function are checked by
/// the validator; on a duplicate the last definition wins.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry<'p> {
    functions: BTreeMap<&'p str, &'p FunctionDef>,
}

impl<'p> FunctionRegistry<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            functions: program
                .functions
                .iter()
                .map(|f| (f.name.as_str(), f))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&'p FunctionDef> {
        self.functions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered function names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'p str> + '_ {
        self.functions.keys().copied()
    }
}
