//! Domain identifiers (strongly-typed IDs).
//!
//! Envelope ids and correlation ids are both opaque strings on the wire, but
//! they mean different things. `Id<T>` keeps them apart at compile time with a
//! phantom marker type while serializing as a plain JSON string.
//!
//! ## Phantom Type パターン
//! `T` is never stored (PhantomData), so an `Id<T>` costs exactly one `String`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// IdMarker は各 ID 型のマーカー trait
pub trait IdMarker: Send + Sync + 'static {
    /// Human-readable kind, used in error messages and logs.
    const KIND: &'static str;
}

/// Generic string identifier.
///
/// # 例
/// ```ignore
/// let event_id = EventId::new("5f0c3c3e-...");
/// let context = CorrelationId::new("a1b2...");
/// // event_id と context は異なる型なので、混同できない
/// ```
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    /// An empty id. Correlation is best-effort, so a missing context maps here.
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn kind(&self) -> &'static str {
        T::KIND
    }
}

// Manual impls: derives would put bounds on `T`, which is never instantiated.
impl<T: IdMarker> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T: IdMarker> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: IdMarker> Eq for Id<T> {}

impl<T: IdMarker> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: IdMarker> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", T::KIND, self.value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T: IdMarker> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Envelope のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {}

impl IdMarker for Event {
    const KIND: &'static str = "EventId";
}

/// Correlation context (`shkeptncontext`) のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Correlation {}

impl IdMarker for Correlation {
    const KIND: &'static str = "CorrelationId";
}

/// Identifier of one envelope, assigned by its producer.
pub type EventId = Id<Event>;

/// Identifier shared by every envelope of one logical task instance.
pub type CorrelationId = Id<Correlation>;
