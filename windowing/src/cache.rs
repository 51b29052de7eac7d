/// Row keys usable in a [`MeasurementCache`].
///
/// Hashed keys with `std`; without it the cache is ordered and keys must be `Ord`. Implemented
/// for every type meeting the bound.
#[cfg(feature = "std")]
pub trait KeyCacheKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq> KeyCacheKey for K {}

#[cfg(not(feature = "std"))]
pub trait KeyCacheKey: Ord {}
#[cfg(not(feature = "std"))]
impl<K: Ord> KeyCacheKey for K {}

#[cfg(feature = "std")]
type Heights<K> = std::collections::HashMap<K, f64>;
#[cfg(not(feature = "std"))]
type Heights<K> = alloc::collections::BTreeMap<K, f64>;

/// Measured row heights keyed by row key.
///
/// Entries are only ever inserted or overwritten. Keying by row identity instead of index lets
/// measurements follow rows across reordering and insertion.
#[derive(Clone, Debug)]
pub struct MeasurementCache<K> {
    heights: Heights<K>,
}

impl<K: KeyCacheKey> MeasurementCache<K> {
    pub fn new() -> Self {
        Self {
            heights: Heights::<K>::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.heights.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.heights.contains_key(key)
    }

    /// Stores `height` under `key`, returning the previous value.
    pub fn insert(&mut self, key: K, height: f64) -> Option<f64> {
        self.heights.insert(key, height)
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Iterates over the cached heights without allocating.
    pub fn for_each(&self, mut f: impl FnMut(&K, f64)) {
        for (k, v) in self.heights.iter() {
            f(k, *v);
        }
    }
}

impl<K: KeyCacheKey> Default for MeasurementCache<K> {
    fn default() -> Self {
        Self::new()
    }
}
