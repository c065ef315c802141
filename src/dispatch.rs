//! Name-keyed handler registries.
//!
//! Timers, desired twin properties and direct methods are each routed
//! through a [`Registry`] that maps a static name to a handler.  Handlers
//! are plain `fn` pointers, so looking one up copies it out and the
//! registry borrow ends before the handler runs.

use heapless::Vec;

use crate::error::RegistryError;

pub struct Registry<H: Copy, const N: usize> {
    entries: Vec<(&'static str, H), N>,
}

impl<H: Copy, const N: usize> Default for Registry<H, N> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<H: Copy, const N: usize> Registry<H, N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `name`.  Names are unique.
    pub fn bind(&mut self, name: &'static str, handler: H) -> Result<(), RegistryError> {
        if self.lookup(name).is_some() {
            return Err(RegistryError::Duplicate(name));
        }
        self.entries
            .push((name, handler))
            .map_err(|_| RegistryError::Full)
    }

    pub fn lookup(&self, name: &str) -> Option<H> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, h)| *h)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }
}
