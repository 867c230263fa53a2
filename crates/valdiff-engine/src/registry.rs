//! The comparer registry: custom comparers and equality operators by type.
//!
//! An explicit registry object rather than ambient global state. Reads are
//! concurrent during comparisons; mutation takes the write lock. Overrides
//! are installed through [`ComparerRegistry::scoped`], which hands back a
//! guard restoring the previous mapping on drop, so parallel test execution
//! cannot leak overrides across cases.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;
use valdiff_types::Value;

use crate::error::{EngineError, EngineResult};

/// A user-supplied equality test for values of a registered type.
///
/// Also the shape of a registered equality operator; the two live in
/// separate tables because they are consulted at different points.
pub trait CustomComparer: Send + Sync {
    /// Whether the two values should be treated as equal.
    fn equal(&self, actual: &Value, expected: &Value) -> bool;
}

impl<F> CustomComparer for F
where
    F: Fn(&Value, &Value) -> bool + Send + Sync,
{
    fn equal(&self, actual: &Value, expected: &Value) -> bool {
        self(actual, expected)
    }
}

type ComparerMap = HashMap<String, Arc<dyn CustomComparer>>;

/// Type-keyed registry of custom comparers and equality operators.
///
/// Lookup for a record consults the exact type name first, then each lineage
/// entry (base types and implemented interfaces, nearest first).
#[derive(Default)]
pub struct ComparerRegistry {
    comparers: RwLock<ComparerMap>,
    operators: RwLock<ComparerMap>,
}

impl ComparerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace the comparer for a type, returning the previous
    /// mapping. Passing `None` removes the entry; the caller is responsible
    /// for restoring the returned mapping, or should prefer
    /// [`scoped`](Self::scoped).
    pub fn register(
        &self,
        type_name: impl Into<String>,
        comparer: Option<Arc<dyn CustomComparer>>,
    ) -> EngineResult<Option<Arc<dyn CustomComparer>>> {
        let type_name = type_name.into();
        debug!(%type_name, installing = comparer.is_some(), "comparer registration");
        Self::install(&self.comparers, type_name, comparer)
    }

    /// Install or replace the equality operator for a type (the relational
    /// operator analogue), returning the previous mapping.
    pub fn register_operator(
        &self,
        type_name: impl Into<String>,
        operator: Option<Arc<dyn CustomComparer>>,
    ) -> EngineResult<Option<Arc<dyn CustomComparer>>> {
        let type_name = type_name.into();
        debug!(%type_name, installing = operator.is_some(), "operator registration");
        Self::install(&self.operators, type_name, operator)
    }

    fn install(
        table: &RwLock<ComparerMap>,
        type_name: String,
        comparer: Option<Arc<dyn CustomComparer>>,
    ) -> EngineResult<Option<Arc<dyn CustomComparer>>> {
        let mut map = table
            .write()
            .map_err(|e| EngineError::RegistryPoisoned(e.to_string()))?;
        Ok(match comparer {
            Some(c) => map.insert(type_name, c),
            None => map.remove(&type_name),
        })
    }

    /// Find the custom comparer for a value's type.
    pub fn lookup_comparer(&self, value: &Value) -> Option<Arc<dyn CustomComparer>> {
        Self::lookup(&self.comparers, value)
    }

    /// Find the equality operator for a value's type.
    pub fn lookup_operator(&self, value: &Value) -> Option<Arc<dyn CustomComparer>> {
        Self::lookup(&self.operators, value)
    }

    fn lookup(table: &RwLock<ComparerMap>, value: &Value) -> Option<Arc<dyn CustomComparer>> {
        // A poisoned lock still holds a coherent map; reads recover.
        let map = table.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(comparer) = map.get(&value.type_name()) {
            return Some(Arc::clone(comparer));
        }
        if let Value::Record(rec) = value {
            for base in &rec.lineage {
                if let Some(comparer) = map.get(base) {
                    return Some(Arc::clone(comparer));
                }
            }
        }
        None
    }

    /// Install a scoped override, restored when the returned guard drops.
    pub fn scoped(
        &self,
        type_name: impl Into<String>,
        comparer: Arc<dyn CustomComparer>,
    ) -> EngineResult<ScopedComparer<'_>> {
        let type_name = type_name.into();
        let previous = self.register(type_name.clone(), Some(comparer))?;
        Ok(ScopedComparer {
            registry: self,
            type_name,
            previous: Some(previous),
        })
    }
}

impl fmt::Debug for ComparerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let comparers = self
            .comparers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        let operators = self
            .operators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("ComparerRegistry")
            .field("comparers", &comparers)
            .field("operators", &operators)
            .finish()
    }
}

/// RAII guard for a scoped comparer override.
///
/// Restores the previous mapping (or absence of one) on drop, even on early
/// return or panic in the scope it guards.
#[must_use = "dropping the guard immediately would restore the previous comparer at once"]
pub struct ScopedComparer<'a> {
    registry: &'a ComparerRegistry,
    type_name: String,
    previous: Option<Option<Arc<dyn CustomComparer>>>,
}

impl Drop for ScopedComparer<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            let mut map = self
                .registry
                .comparers
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            match previous {
                Some(comparer) => {
                    map.insert(self.type_name.clone(), comparer);
                }
                None => {
                    map.remove(&self.type_name);
                }
            }
        }
    }
}
