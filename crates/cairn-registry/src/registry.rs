//! The `(collection, id)` → entry mapping and its concurrency guarantees.

use parking_lot::RwLock;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use cairn_types::{ActionError, Signature};

use crate::action::Action;

// ─────────────────────────────────────────────────────────────────────────────
// Registry Entry
// ─────────────────────────────────────────────────────────────────────────────

/// One registered callable with its metadata.
///
/// Entries are immutable after registration and shared via `Arc`, so a
/// lookup can never observe a half-written entry.
pub struct RegistryEntry {
    /// Stable identifier, unique within its collection.
    pub id: String,
    /// Logical namespace the entry belongs to (e.g. `"openai"`).
    pub collection: String,
    /// Human-readable description for discovery.
    pub description: String,
    /// Parameter descriptor captured at registration time.
    pub signature: Signature,
    action: Arc<dyn Action>,
}

impl RegistryEntry {
    /// The underlying callable.
    pub fn action(&self) -> &Arc<dyn Action> {
        &self.action
    }

    /// Invoke the callable directly, bypassing argument validation.
    pub async fn call(&self, args: Value) -> Result<Value, ActionError> {
        self.action.call(args).await
    }

    /// JSON descriptor for discovery/enumeration by an orchestrator.
    pub fn descriptor(&self) -> Value {
        json!({
            "collection": self.collection,
            "id": self.id,
            "description": self.description,
            "signature": self.signature,
        })
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("collection", &self.collection)
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Action Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Per-collection storage: entries by id plus registration order.
#[derive(Default)]
struct Collection {
    entries: HashMap<String, Arc<RegistryEntry>>,
    order: Vec<String>,
}

/// Thread-safe store of `(collection, id)` → [`RegistryEntry`].
///
/// Registration and lookup are safe to call concurrently from independent
/// tasks or threads. The internal lock guards only the mapping itself; it is
/// never held while an action executes, so a slow network call cannot block
/// registration.
///
/// Duplicate registration of the same `(collection, id)` overwrites the
/// previous entry (last write wins, original order position retained) and
/// logs a warning. This is the documented policy, not an accident.
///
/// Cloning is cheap and shares the underlying store, so a registry can be
/// handed to registration sites and the orchestrator alike.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl ActionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under `(collection, id)`.
    ///
    /// The action's signature is captured here, once. Errors with
    /// [`ActionError::Validation`] when `collection` or `id` is empty or
    /// contains whitespace.
    pub fn register<A: Action + 'static>(
        &self,
        action: A,
        collection: &str,
        id: &str,
        description: impl Into<String>,
    ) -> Result<(), ActionError> {
        self.register_arc(Arc::new(action), collection, id, description)
    }

    /// Register an already-shared action.
    pub fn register_arc(
        &self,
        action: Arc<dyn Action>,
        collection: &str,
        id: &str,
        description: impl Into<String>,
    ) -> Result<(), ActionError> {
        validate_ident("collection", collection)?;
        validate_ident("id", id)?;

        let entry = Arc::new(RegistryEntry {
            id: id.to_string(),
            collection: collection.to_string(),
            description: description.into(),
            signature: action.signature(),
            action,
        });

        let mut collections = self.collections.write();
        let coll = collections.entry(collection.to_string()).or_default();
        if coll.entries.insert(id.to_string(), entry).is_some() {
            // Overwrite keeps the original registration-order slot.
            tracing::warn!(collection, id, "replacing existing registry entry");
        } else {
            coll.order.push(id.to_string());
            tracing::debug!(collection, id, "registered action");
        }
        Ok(())
    }

    /// Look up an entry by `(collection, id)`.
    ///
    /// A miss is a typed [`ActionError::NotFound`], never a panic.
    pub fn lookup(&self, collection: &str, id: &str) -> Result<Arc<RegistryEntry>, ActionError> {
        self.collections
            .read()
            .get(collection)
            .and_then(|coll| coll.entries.get(id))
            .cloned()
            .ok_or_else(|| ActionError::not_found(collection, id))
    }

    /// All entries in a collection, in registration order.
    ///
    /// An unknown collection yields an empty vec.
    pub fn list(&self, collection: &str) -> Vec<Arc<RegistryEntry>> {
        let collections = self.collections.read();
        let Some(coll) = collections.get(collection) else {
            return Vec::new();
        };
        coll.order
            .iter()
            .filter_map(|id| coll.entries.get(id))
            .cloned()
            .collect()
    }

    /// All entries across every collection: collections in sorted name
    /// order, entries in registration order within each.
    pub fn list_all(&self) -> Vec<Arc<RegistryEntry>> {
        let collections = self.collections.read();
        let mut names: Vec<&String> = collections.keys().collect();
        names.sort();
        names
            .into_iter()
            .flat_map(|name| {
                let coll = &collections[name];
                coll.order
                    .iter()
                    .filter_map(|id| coll.entries.get(id))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Remove an entry, returning it.
    ///
    /// An empty collection is dropped along with its last entry.
    pub fn remove(&self, collection: &str, id: &str) -> Result<Arc<RegistryEntry>, ActionError> {
        let mut collections = self.collections.write();
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| ActionError::not_found(collection, id))?;
        let entry = coll
            .entries
            .remove(id)
            .ok_or_else(|| ActionError::not_found(collection, id))?;
        coll.order.retain(|existing| existing != id);
        if coll.entries.is_empty() {
            collections.remove(collection);
        }
        Ok(entry)
    }

    /// Names of all collections, sorted.
    pub fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether `(collection, id)` is registered.
    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.collections
            .read()
            .get(collection)
            .is_some_and(|coll| coll.entries.contains_key(id))
    }

    /// Total number of entries across all collections.
    pub fn len(&self) -> usize {
        self.collections
            .read()
            .values()
            .map(|coll| coll.entries.len())
            .sum()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up, validate arguments, fill defaults, and call.
    ///
    /// Validation failures are reported without executing the action. The
    /// registry lock is released before the call is awaited.
    pub async fn invoke(
        &self,
        collection: &str,
        id: &str,
        mut args: Value,
    ) -> Result<Value, ActionError> {
        let entry = self.lookup(collection, id)?;
        entry.signature.check_args(&args)?;
        entry.signature.apply_defaults(&mut args);
        entry.call(args).await
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let collections = self.collections.read();
        let mut dbg = f.debug_struct("ActionRegistry");
        for (name, coll) in collections.iter() {
            dbg.field(name, &coll.order);
        }
        dbg.finish()
    }
}

/// Identifiers must be non-empty and free of whitespace.
fn validate_ident(field: &str, value: &str) -> Result<(), ActionError> {
    if value.is_empty() {
        return Err(ActionError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ActionError::Validation(format!(
            "{field} '{value}' must not contain whitespace"
        )));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
