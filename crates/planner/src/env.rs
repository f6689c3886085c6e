//! Planner environment collaborator.
//!
//! Lowering is pure; the environment is the one external seam it talks to,
//! and only for type-tag resolution. The global-variable hook exists for the
//! later resolution pass and is not invoked during lowering.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::ir::{TypeAtom, TypeRef};

/// A global binding known to the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalVar {
    /// Environment-unique identifier of the binding.
    pub uid: String,
}

/// Resolution environment handed to the lowering entry point.
pub trait PlannerEnv {
    /// Resolve a coarse type tag to an opaque handle.
    fn resolve_type(&self, atom: TypeAtom) -> TypeRef;

    /// Look up a global variable by name. Used by later passes, not by
    /// lowering.
    fn global(&self, name: &str) -> Option<GlobalVar>;
}

/// Default in-memory environment: interns type atoms and knows no globals.
#[derive(Default)]
pub struct TypeRegistry {
    atoms: RwLock<Vec<TypeAtom>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Which atom a handle names, for debugging and tests.
    pub fn atom_of(&self, ty: TypeRef) -> Option<TypeAtom> {
        self.atoms
            .read()
            .expect("type registry lock poisoned")
            .get(ty.0 as usize)
            .copied()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.atoms.read().map(|a| a.len()).unwrap_or_default();
        f.debug_struct("TypeRegistry")
            .field("interned", &count)
            .finish()
    }
}

impl PlannerEnv for TypeRegistry {
    fn resolve_type(&self, atom: TypeAtom) -> TypeRef {
        let mut atoms = self.atoms.write().expect("type registry lock poisoned");
        match atoms.iter().position(|a| *a == atom) {
            Some(i) => TypeRef(i as u32),
            None => {
                atoms.push(atom);
                TypeRef((atoms.len() - 1) as u32)
            }
        }
    }

    fn global(&self, _name: &str) -> Option<GlobalVar> {
        None
    }
}
