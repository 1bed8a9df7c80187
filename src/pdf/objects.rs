//! Append-only arena of numbered PDF indirect objects.

use std::fmt;

use crate::error::{Error, Result};

/// 1-based indirect object number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub usize);

impl ObjectId {
    /// Indirect reference syntax, e.g. `4 0 R`.
    pub fn reference(self) -> String {
        format!("{} 0 R", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Object slots numbered by insertion order.
///
/// Objects that reference something not yet numbered (a page pointing at
/// its parent Pages node) are [`reserve`](Self::reserve)d first and
/// [`set`](Self::set) once the referenced number is known.
#[derive(Debug, Default)]
pub struct ObjectArena {
    slots: Vec<Option<String>>,
}

impl ObjectArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object body and return its number.
    pub fn add(&mut self, body: impl Into<String>) -> ObjectId {
        self.slots.push(Some(body.into()));
        ObjectId(self.slots.len())
    }

    /// Allocate a number whose body is filled in later.
    pub fn reserve(&mut self) -> ObjectId {
        self.slots.push(None);
        ObjectId(self.slots.len())
    }

    /// Fill a previously reserved slot.
    pub fn set(&mut self, id: ObjectId, body: impl Into<String>) -> Result<()> {
        let slot = id
            .0
            .checked_sub(1)
            .and_then(|index| self.slots.get_mut(index))
            .ok_or_else(|| Error::Serialize(format!("object {} was never allocated", id)))?;
        *slot = Some(body.into());
        Ok(())
    }

    /// Number of allocated objects.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no objects were allocated.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over `(id, body)` pairs in number order.
    ///
    /// Fails if any reserved slot was never filled.
    pub fn bodies(&self) -> Result<Vec<(ObjectId, &str)>> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let id = ObjectId(index + 1);
                slot.as_deref()
                    .map(|body| (id, body))
                    .ok_or_else(|| Error::Serialize(format!("object {} was reserved but never written", id)))
            })
            .collect()
    }
}
