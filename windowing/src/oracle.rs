use crate::cache::{KeyCacheKey, MeasurementCache};
use crate::options::HeightFn;
use crate::range::RowSource;
use crate::{ConfigError, WindowOptions};

#[derive(Clone, Copy)]
enum Strategy<'a> {
    Fixed(&'a HeightFn),
    Dynamic(&'a HeightFn),
}

/// Resolves the current best-known height of a row.
///
/// In fixed-size mode the configured `row_height` is authoritative and the cache is never
/// consulted. Otherwise a cached measurement wins over the estimate.
pub struct HeightOracle<'a, K> {
    options: &'a WindowOptions<K>,
    cache: &'a MeasurementCache<K>,
    strategy: Strategy<'a>,
}

impl<'a, K: KeyCacheKey> HeightOracle<'a, K> {
    pub fn new(
        options: &'a WindowOptions<K>,
        cache: &'a MeasurementCache<K>,
    ) -> Result<Self, ConfigError> {
        let strategy = match (&options.row_height, &options.estimate_row_height) {
            (Some(fixed), _) => Strategy::Fixed(fixed),
            (None, Some(estimate)) => Strategy::Dynamic(estimate),
            (None, None) => return Err(ConfigError::MissingHeightStrategy),
        };
        Ok(Self {
            options,
            cache,
            strategy,
        })
    }

    pub fn is_fixed_size(&self) -> bool {
        matches!(self.strategy, Strategy::Fixed(_))
    }

    pub fn height_of(&self, index: usize) -> f64 {
        let key = (self.options.get_row_key)(index);
        self.height_of_keyed(index, &key)
    }

    pub fn height_of_keyed(&self, index: usize, key: &K) -> f64 {
        match self.strategy {
            Strategy::Fixed(f) => sanitize_extent(index, f(index)),
            Strategy::Dynamic(estimate) => match self.cache.get(key) {
                Some(measured) => measured,
                None => sanitize_extent(index, estimate(index)),
            },
        }
    }
}

impl<K: KeyCacheKey> RowSource<K> for HeightOracle<'_, K> {
    fn row_count(&self) -> usize {
        self.options.row_count
    }

    fn row_key(&self, index: usize) -> K {
        (self.options.get_row_key)(index)
    }

    fn row_height(&self, index: usize, key: &K) -> f64 {
        self.height_of_keyed(index, key)
    }
}

/// Caller-supplied heights must be finite and non-negative; anything else counts as zero.
pub(crate) fn sanitize_extent(index: usize, height: f64) -> f64 {
    if height.is_finite() && height >= 0.0 {
        return height;
    }
    wwarn!(index, height, "row height must be finite and >= 0, using 0");
    0.0
}
