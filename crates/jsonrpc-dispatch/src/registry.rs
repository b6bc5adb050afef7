//! Procedure lookup
//!
//! The dispatcher only needs one capability from wherever procedures live:
//! turn a method name into a [`Procedure`]. [`ProcedureSource`] is that
//! capability, implemented for plain lists (matched on each procedure's
//! declared name), for name-keyed maps (matched on the key), and for the
//! [`Methods`] registry, which supports registering one procedure under
//! several names.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

use tracing::debug;

use crate::procedure::Procedure;

/// Anything that can resolve a method name to a procedure
pub trait ProcedureSource {
    fn resolve(&self, name: &str) -> Option<&Procedure>;
}

impl ProcedureSource for [Procedure] {
    fn resolve(&self, name: &str) -> Option<&Procedure> {
        self.iter().find(|procedure| procedure.name() == name)
    }
}

impl ProcedureSource for Vec<Procedure> {
    fn resolve(&self, name: &str) -> Option<&Procedure> {
        self.as_slice().resolve(name)
    }
}

impl<S: BuildHasher> ProcedureSource for HashMap<String, Procedure, S> {
    fn resolve(&self, name: &str) -> Option<&Procedure> {
        self.get(name)
    }
}

impl ProcedureSource for BTreeMap<String, Procedure> {
    fn resolve(&self, name: &str) -> Option<&Procedure> {
        self.get(name)
    }
}

impl<T: ProcedureSource + ?Sized> ProcedureSource for &T {
    fn resolve(&self, name: &str) -> Option<&Procedure> {
        (**self).resolve(name)
    }
}

impl<T: ProcedureSource + ?Sized> ProcedureSource for Arc<T> {
    fn resolve(&self, name: &str) -> Option<&Procedure> {
        (**self).resolve(name)
    }
}

/// Registry of procedures by method name.
///
/// Registration needs `&mut self`, so it cannot race with dispatch, which
/// only borrows the registry.
#[derive(Debug, Clone, Default)]
pub struct Methods {
    procedures: HashMap<String, Arc<Procedure>>,
}

impl Methods {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure under its own name
    pub fn add(&mut self, procedure: Procedure) -> &mut Self {
        let name = procedure.name().to_string();
        self.register_method(name, procedure)
    }

    /// Register a procedure under a specific method name.
    ///
    /// The name may differ from the procedure's declared name.
    pub fn register_method(&mut self, method: impl Into<String>, procedure: Procedure) -> &mut Self {
        let method = method.into();
        debug!("Registering procedure '{}' as '{}'", procedure.name(), method);
        self.procedures.insert(method, Arc::new(procedure));
        self
    }

    /// Register one procedure under several method names
    pub fn register_methods<I, N>(&mut self, methods: I, procedure: Procedure) -> &mut Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let shared = Arc::new(procedure);
        for method in methods {
            let method = method.into();
            debug!("Registering procedure '{}' as '{}'", shared.name(), method);
            self.procedures.insert(method, Arc::clone(&shared));
        }
        self
    }

    /// Point `alias` at whatever `method` currently resolves to.
    ///
    /// Returns `false` if `method` is not registered.
    pub fn alias(&mut self, alias: impl Into<String>, method: &str) -> bool {
        match self.procedures.get(method).cloned() {
            Some(procedure) => {
                self.procedures.insert(alias.into(), procedure);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, method: &str) -> bool {
        self.procedures.contains_key(method)
    }

    /// Get all registered method names, sorted
    pub fn registered_methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.procedures.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

impl ProcedureSource for Methods {
    fn resolve(&self, name: &str) -> Option<&Procedure> {
        self.procedures.get(name).map(Arc::as_ref)
    }
}

impl FromIterator<Procedure> for Methods {
    fn from_iter<I: IntoIterator<Item = Procedure>>(iter: I) -> Self {
        let mut methods = Methods::new();
        for procedure in iter {
            methods.add(procedure);
        }
        methods
    }
}
