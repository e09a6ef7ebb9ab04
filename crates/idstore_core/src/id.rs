//! Record identifier.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::num::NonZeroU64;

/// Identifier for a record of type `T`.
///
/// Identifiers are positive integers that are:
/// - Issued in strictly increasing order, starting at 1
/// - Never reused, even after the record is removed
/// - Tagged with the record type, so ids of different stores don't mix
///
/// The tag is a zero-sized `PhantomData<fn() -> T>`, which keeps `Id<T>`
/// `Copy + Send + Sync` regardless of `T`.
pub struct Id<T> {
    raw: NonZeroU64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// The first identifier a store issues.
    #[inline]
    #[must_use]
    pub const fn first() -> Self {
        Self {
            raw: NonZeroU64::MIN,
            _marker: PhantomData,
        }
    }

    /// Returns the successor of this identifier.
    ///
    /// # Panics
    ///
    /// Panics if the counter would wrap past `u64::MAX`.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        match self.raw.checked_add(1) {
            Some(raw) => Self {
                raw,
                _marker: PhantomData,
            },
            None => panic!("identifier space exhausted"),
        }
    }

    /// Returns the successor, or `None` at `u64::MAX`.
    #[inline]
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.raw.checked_add(1) {
            Some(raw) => Some(Self {
                raw,
                _marker: PhantomData,
            }),
            None => None,
        }
    }

    /// Returns the successor, staying at `u64::MAX` once there.
    #[inline]
    #[must_use]
    pub const fn saturating_next(self) -> Self {
        match self.checked_next() {
            Some(next) => next,
            None => self,
        }
    }

    /// Rebuilds an identifier from its raw value.
    ///
    /// Returns `None` for zero, which is never issued.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(raw) => Some(Self {
                raw,
                _marker: PhantomData,
            }),
            None => None,
        }
    }

    /// Returns the raw integer value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.raw.get()
    }
}

// Manual impls: deriving would put bounds on `T`.

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::first()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.raw)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl<T> From<Id<T>> for u64 {
    fn from(id: Id<T>) -> Self {
        id.as_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn first_is_one() {
        assert_eq!(Id::<Marker>::first().as_u64(), 1);
    }

    #[test]
    fn next_increments() {
        let id = Id::<Marker>::first();
        assert_eq!(id.next().as_u64(), 2);
        assert_eq!(id.next().next().as_u64(), 3);
    }

    #[test]
    fn ordering() {
        let id1 = Id::<Marker>::first();
        let id2 = id1.next();
        assert!(id1 < id2);
        assert_eq!(id1.max(id2), id2);
    }

    #[test]
    fn from_raw_rejects_zero() {
        assert!(Id::<Marker>::from_raw(0).is_none());
        assert_eq!(Id::<Marker>::from_raw(7).map(Id::as_u64), Some(7));
    }

    #[test]
    fn copy_without_bounds() {
        // Marker is neither Clone nor Debug.
        let id = Id::<Marker>::first();
        let copy = id;
        assert_eq!(id, copy);
        assert_eq!(format!("{id:?}"), "Id(1)");
        assert_eq!(format!("{id}"), "1");
    }

    #[test]
    fn checked_and_saturating_next() {
        let max = Id::<Marker>::from_raw(u64::MAX).unwrap();
        assert!(max.checked_next().is_none());
        assert_eq!(max.saturating_next(), max);
        assert_eq!(Id::<Marker>::first().checked_next().map(Id::as_u64), Some(2));
        assert_eq!(Id::<Marker>::first().saturating_next().as_u64(), 2);
    }

    #[test]
    #[should_panic(expected = "identifier space exhausted")]
    fn next_panics_at_max() {
        let _ = Id::<Marker>::from_raw(u64::MAX).unwrap().next();
    }
}
