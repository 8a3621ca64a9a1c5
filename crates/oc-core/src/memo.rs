//! Write-once cells for lazily derived quantities.
//!
//! A `Memo` is filled by its compute function on first read and then returns
//! the same value forever. A failing compute leaves the cell empty so the
//! error is reported again on the next read.

use std::cell::OnceCell;
use std::fmt;

pub struct Memo<T> {
    name: &'static str,
    cell: OnceCell<T>,
}

impl<T> Memo<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the cached value without computing it.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the cached value, computing it with `f` on first access.
    pub fn get_or_try_init<E>(&self, f: impl FnOnce() -> Result<T, E>) -> Result<&T, E>
    where
        T: fmt::Debug,
    {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        let value = f()?;
        tracing::debug!(quantity = self.name, value = ?value, "memoized");
        // A re-entrant compute may have filled the cell already; first value wins.
        Ok(self.cell.get_or_init(|| value))
    }
}

impl<T: Copy + fmt::Debug> Memo<T> {
    /// Copying variant of [`Memo::get_or_try_init`] for scalar quantities.
    pub fn value<E>(&self, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        self.get_or_try_init(f).copied()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("name", &self.name)
            .field("value", &self.cell.get())
            .finish()
    }
}
