//! Execution context
//!
//! A [`Context`] is the explicit store handle threaded through every
//! keeper call. It carries the block header, the events emitted so far,
//! and per-module bypass flags for privileged internal transfers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::FatalError;
use crate::store::{apply_writes, CacheStore, KvStore, PrefixView, PrefixViewMut};

/// Block header fields visible to modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: u64,
    pub time: DateTime<Utc>,
}

impl Default for BlockHeader {
    fn default() -> Self {
        Self {
            height: 1,
            time: DateTime::<Utc>::default(),
        }
    }
}

/// A structured event emitted by a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Emitting module
    pub module: String,
    /// Event kind, e.g. `funds_released`
    pub kind: String,
    /// Event body
    pub data: serde_json::Value,
}

/// Typed events a module can emit
pub trait TypedEvent: Serialize {
    /// Module name recorded on the event
    const MODULE: &'static str;

    /// Kind recorded on the event
    fn kind(&self) -> &'static str;
}

/// Execution context for one transaction or hook call
pub struct Context<'a> {
    store: &'a mut dyn KvStore,
    header: BlockHeader,
    events: Vec<Event>,
    bypass: BTreeSet<String>,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a mut dyn KvStore, header: BlockHeader) -> Self {
        Self {
            store,
            header,
            events: Vec::new(),
            bypass: BTreeSet::new(),
        }
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn block_height(&self) -> u64 {
        self.header.height
    }

    pub fn block_time(&self) -> DateTime<Utc> {
        self.header.time
    }

    /// Read-only view of a module namespace
    pub fn kv(&self, namespace: &str) -> PrefixView<'_> {
        PrefixView::new(&*self.store, &namespace_prefix(namespace))
    }

    /// Read/write view of a module namespace
    pub fn kv_mut(&mut self, namespace: &str) -> PrefixViewMut<'_> {
        PrefixViewMut::new(&mut *self.store, &namespace_prefix(namespace))
    }

    /// Emit a typed event
    pub fn emit<E: TypedEvent>(&mut self, event: &E) -> Result<(), FatalError> {
        let data = serde_json::to_value(event).map_err(|e| FatalError::EventEncoding {
            kind: event.kind().to_string(),
            reason: e.to_string(),
        })?;
        self.events.push(Event {
            module: E::MODULE.to_string(),
            kind: event.kind().to_string(),
            data,
        });
        Ok(())
    }

    /// Events emitted so far, oldest first
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain the emitted events
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// True when `module` restrictions are bypassed in this context
    pub fn has_bypass(&self, module: &str) -> bool {
        self.bypass.contains(module)
    }

    /// Run `f` with `module` restrictions bypassed, restoring the flag afterwards.
    pub fn with_bypass<T>(&mut self, module: &str, f: impl FnOnce(&mut Context<'a>) -> T) -> T {
        let newly_set = self.bypass.insert(module.to_string());
        let out = f(self);
        if newly_set {
            self.bypass.remove(module);
        }
        out
    }

    /// Run `f` against a write overlay. Writes and events are kept only
    /// when `f` returns `Ok`; on `Err` nothing from `f` is visible.
    pub fn atomic<T, E>(
        &mut self,
        f: impl FnOnce(&mut Context<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let (result, writes, events) = {
            let mut cache = CacheStore::new(&*self.store);
            let mut sub = Context {
                store: &mut cache,
                header: self.header.clone(),
                events: Vec::new(),
                bypass: self.bypass.clone(),
            };
            let result = f(&mut sub);
            let events = sub.take_events();
            drop(sub);
            (result, cache.into_writes(), events)
        };
        if result.is_ok() {
            apply_writes(&mut *self.store, writes);
            self.events.extend(events);
        }
        result
    }
}

fn namespace_prefix(namespace: &str) -> Vec<u8> {
    let mut prefix = namespace.as_bytes().to_vec();
    prefix.push(b'/');
    prefix
}
