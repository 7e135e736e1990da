//! The entity: one record instance with its own data store.
//!
//! An entity owns a mutable key/value store and a shared reference to its
//! type's [`Metamodel`]. It is constructed from arbitrary data (unknown
//! keys are retained, declared fields may be missing) and construction
//! never fails on data shape. Validity is a query
//! ([`is_valid`](Entity::is_valid) /
//! [`error_messages`](Entity::error_messages)), performed after the fact,
//! so ingestion is decoupled from validation and all violations of a
//! record surface together.
//!
//! The store also serves as the memoization cache for derived fields. An
//! `Entity` is `Send` but not `Sync`: one instance belongs to one thread at
//! a time, which keeps memoization race-free without per-entity locking.
//! The metamodel itself is built behind a synchronized once-guard and may
//! be shared freely across threads.

use crate::error::ModelResult;
use crate::schema::Metamodel;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

/// One instance of a record type.
pub struct Entity {
    metamodel: Arc<Metamodel>,
    data: RefCell<Map<String, Value>>,
}

impl Entity {
    /// Create an entity over the given initial data.
    ///
    /// Unknown keys are retained and stay queryable through lenient access;
    /// they are never validated.
    pub fn new(metamodel: Arc<Metamodel>, data: Map<String, Value>) -> Self {
        Self {
            metamodel,
            data: RefCell::new(data),
        }
    }

    /// Create an entity from any JSON value.
    ///
    /// Non-object values yield an entity with an empty store; construction
    /// never fails.
    pub fn from_json(metamodel: Arc<Metamodel>, data: Value) -> Self {
        let map = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(metamodel, map)
    }

    /// This entity's type registry, shared with every other entity of the
    /// same type.
    pub fn metamodel(&self) -> &Arc<Metamodel> {
        &self.metamodel
    }

    /// Strict field read: declared fields resolve with default
    /// substitution, derived fields compute and cache on first access, and
    /// any other name fails with `ModelError::UnknownField`.
    pub fn get(&self, name: &str) -> ModelResult<Value> {
        self.metamodel.resolve(self, name, true)
    }

    /// Lenient field read: like [`get`](Entity::get) for declared and
    /// derived fields, but an unknown name yields the raw store entry or
    /// null. Never fails; suited to probing ad-hoc payload keys.
    pub fn lookup(&self, name: &str) -> Value {
        self.metamodel
            .resolve(self, name, false)
            .unwrap_or(Value::Null)
    }

    /// Insert or replace a store entry.
    ///
    /// The store exposes no removal, so a memoized derived value can be
    /// overwritten but never dropped; its initializer still runs at most
    /// once per entity.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.data.borrow_mut().insert(name.into(), value);
    }

    /// True iff the entity has no field or constraint violations.
    pub fn is_valid(&self) -> bool {
        self.error_messages().is_empty()
    }

    /// Every violation of this entity, one line each: field violations
    /// first, then constraints, both in declaration order. Repeated calls
    /// are idempotent.
    pub fn error_messages(&self) -> Vec<String> {
        self.metamodel.error_messages(self)
    }

    /// Snapshot of the current store contents.
    pub fn data(&self) -> Map<String, Value> {
        self.data.borrow().clone()
    }

    /// Raw store read, bypassing field resolution.
    pub(crate) fn raw_get(&self, name: &str) -> Option<Value> {
        self.data.borrow().get(name).cloned()
    }

    /// Store `value` under `name` unless an entry already exists, returning
    /// whichever value ends up stored. First write wins.
    pub(crate) fn memoize(&self, name: &str, value: Value) -> Value {
        self.data
            .borrow_mut()
            .entry(name.to_string())
            .or_insert(value)
            .clone()
    }

    /// Identity token used in message prefixes for anonymous types: the
    /// address of this entity's store, stable for the entity's lifetime.
    pub(crate) fn identity(&self) -> String {
        format!("{:p}", &self.data)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("type_name", &self.metamodel.type_name())
            .field("data", &self.data.borrow())
            .finish()
    }
}
