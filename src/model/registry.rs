//! Process-wide model registry
//!
//! Model definitions are resolved at most once per record type and published
//! for the process lifetime. Reads after first publish take a shared lock and
//! clone an `Arc`; no caller ever re-runs resolution.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::model::ModelDefinition;

/// A record type whose SQL shape is described by a [`ModelDefinition`].
///
/// Implemented by an external metadata collaborator (hand-written builder,
/// derive macro, code generator); the engine consumes only the resulting
/// plain data.
pub trait Record: 'static {
    /// Assemble the model definition for this type. Runs at most once per
    /// process; the published result is shared by all callers.
    fn model() -> ModelDefinition;
}

static MODELS: Lazy<RwLock<HashMap<TypeId, Arc<ModelDefinition>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Resolve the cached model definition for `T`, computing and publishing it
/// on first access.
///
/// Safe under concurrent first access: resolution runs outside the lock, the
/// first writer wins, and racing callers receive the published instance.
pub fn model_for<T: Record>() -> Arc<ModelDefinition> {
    let key = TypeId::of::<T>();
    if let Some(model) = MODELS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Arc::clone(model);
    }

    let computed = Arc::new(T::model());
    let mut map = MODELS.write().unwrap_or_else(PoisonError::into_inner);
    let published = map.entry(key).or_insert(computed);
    tracing::debug!(model = %published.model_name(), "published model definition");
    Arc::clone(published)
}

/// Look up a published model definition by type id, without computing one.
pub fn registered_model(type_id: TypeId) -> Option<Arc<ModelDefinition>> {
    MODELS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&type_id)
        .cloned()
}
