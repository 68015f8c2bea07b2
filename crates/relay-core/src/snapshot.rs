//! Lock-holding iteration over a point-in-time view.
//!
//! A [`ScopedSnapshot`] couples two resources into one value:
//! - a cursor over a read-only view of a shared collection
//! - the lock handle (usually a read guard) that keeps writers out
//!
//! The lock is released exactly once, after the view, whichever way the
//! snapshot goes away: explicit [`ScopedSnapshot::release`], early `break`,
//! `?` propagation or panic unwinding. Writers waiting on the lock resume only
//! then.
//!
//! ```text
//! registry.snapshot() ──► ScopedSnapshot { view, lock }
//!                               │ advance()/current()/Iterator
//!                               ▼
//!                         release() / Drop ──► drop(view) ──► drop(lock)
//! ```

/// Cursor over a snapshot view that owns the lock protecting it.
///
/// `L` is any lock-release handle: dropping it releases the lock. Both
/// arguments are owned values, so a snapshot can never be built around a
/// missing view or a missing lock.
#[must_use = "dropping a ScopedSnapshot immediately releases its lock"]
pub struct ScopedSnapshot<T, L> {
    /// `None` once released.
    view: Option<Vec<T>>,
    /// 0 = before the first element, `n` = at element `n - 1`,
    /// `len + 1` = exhausted.
    cursor: usize,
    lock: Option<L>,
}

impl<T, L> ScopedSnapshot<T, L> {
    /// Wraps `view` together with an already-acquired `lock`.
    pub fn new(view: impl IntoIterator<Item = T>, lock: L) -> Self {
        Self {
            view: Some(view.into_iter().collect()),
            cursor: 0,
            lock: Some(lock),
        }
    }

    /// Element at the current position.
    ///
    /// `None` before the first [`advance`](Self::advance), after exhaustion,
    /// and after release.
    pub fn current(&self) -> Option<&T> {
        let index = self.cursor.checked_sub(1)?;
        self.view.as_ref()?.get(index)
    }

    /// Moves to the next element. Returns `false` once exhausted or released.
    pub fn advance(&mut self) -> bool {
        let Some(len) = self.view.as_ref().map(Vec::len) else {
            return false;
        };
        if self.cursor <= len {
            self.cursor += 1;
        }
        self.cursor <= len
    }

    /// Rewinds to before the first element. No-op after release.
    pub fn reset(&mut self) {
        if self.view.is_some() {
            self.cursor = 0;
        }
    }

    /// Drops the view, then the lock. Idempotent.
    pub fn release(&mut self) {
        drop(self.view.take());
        drop(self.lock.take());
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.lock.is_none()
    }

    /// Number of elements captured at acquisition (0 after release).
    pub fn len(&self) -> usize {
        self.view.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remaining(&self) -> usize {
        self.len().saturating_sub(self.cursor)
    }
}

impl<T: Clone, L> Iterator for ScopedSnapshot<T, L> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.advance() {
            self.current().cloned()
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T, L> Drop for ScopedSnapshot<T, L> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T, L> std::fmt::Debug for ScopedSnapshot<T, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedSnapshot")
            .field("len", &self.len())
            .field("cursor", &self.cursor)
            .field("released", &self.is_released())
            .finish()
    }
}
