//! # IDs
//! Sequence numbers, namespaced by a marker type. Every namespace counts up from one independently,
//! so within a namespace a larger ID was always allocated later in this execution of the program.
//!
//! IDs are for diagnostics and identity only. Nothing in the crate orders data by them.

// Next free value per namespace.
static SEQUENCES: parking_lot::RwLock<
    std::collections::BTreeMap<std::any::TypeId, std::sync::atomic::AtomicU64>,
> = parking_lot::const_rwlock(std::collections::BTreeMap::new());

/// Process-unique, monotonically increasing ID within the namespace `T`.
pub struct SequenceID<T: std::any::Any> {
    seq: std::num::NonZeroU64,
    _namespace: std::marker::PhantomData<T>,
}
impl<T: std::any::Any> Clone for SequenceID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for SequenceID<T> {}
impl<T: std::any::Any> PartialEq for SequenceID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}
impl<T: std::any::Any> Eq for SequenceID<T> {}
impl<T: std::any::Any> PartialOrd for SequenceID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: std::any::Any> Ord for SequenceID<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.seq.cmp(&other.seq)
    }
}
impl<T: std::any::Any> std::hash::Hash for SequenceID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.seq.hash(state);
    }
}
// The marker is never stored, so its auto traits shouldn't leak onto the ID.
unsafe impl<T: std::any::Any> Send for SequenceID<T> {}
unsafe impl<T: std::any::Any> Sync for SequenceID<T> {}

impl<T: std::any::Any> SequenceID<T> {
    /// Allocate the next ID of this namespace.
    #[must_use]
    pub fn next() -> Self {
        let ty = std::any::TypeId::of::<T>();
        let seq = {
            let read = SEQUENCES.upgradable_read();
            if let Some(counter) = read.get(&ty) {
                counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            } else {
                // First use of this namespace, happens once per type.
                let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
                // Another thread may have raced us to the insert.
                write
                    .entry(ty)
                    .or_insert_with(|| 1.into())
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            }
        };

        let Some(seq) = std::num::NonZeroU64::new(seq) else {
            // Wrapped around after u64::MAX allocations. Uniqueness can't be upheld anymore.
            #[cfg(not(test))]
            {
                log::error!("{} sequence exhausted! Aborting!", std::any::type_name::<T>());
                log::logger().flush();
                std::process::abort();
            }
            #[cfg(test)]
            {
                panic!("{} sequence exhausted!", std::any::type_name::<T>())
            }
        };

        Self {
            seq,
            _namespace: std::marker::PhantomData,
        }
    }
    /// The raw sequence number. Different namespaces share values!
    #[must_use]
    pub fn get(&self) -> u64 {
        self.seq.get()
    }
}
impl<T: std::any::Any> std::fmt::Display for SequenceID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // rsplit always yields at least one item.
        let name = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or_default();
        write!(f, "{name}#{}", self.seq)
    }
}
impl<T: std::any::Any> std::fmt::Debug for SequenceID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}
