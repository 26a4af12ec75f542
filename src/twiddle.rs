use crate::complex::{Complex, FftFloat};
use crate::fft::Direction;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Roots of unity for one power-of-two length `n`.
///
/// Only the forward factors `e^{-2πik/n}` for `k < n/2` are stored. Stage `s`
/// (sub-transform length `m = 2^s`) needs `e^{-2πik/m}`, which is entry
/// `k * n/m` of the same table. Inverse factors are the conjugates.
#[derive(Debug, Clone, PartialEq)]
pub struct TwiddleTable<T> {
    len: usize,
    factors: Vec<Complex<T>>,
}

impl<T: FftFloat> TwiddleTable<T> {
    pub fn new(len: usize) -> Self {
        debug_assert!(len.is_power_of_two(), "length {len} is not a power of two");
        // Angles are evaluated in f64 whatever T is, so f32 tables are
        // correctly rounded too.
        let factors = (0..len / 2)
            .map(|k| {
                let angle = -2.0 * PI * k as f64 / len as f64;
                Complex::new(T::from_f64(angle.cos()), T::from_f64(angle.sin()))
            })
            .collect();
        TwiddleTable { len, factors }
    }

    /// Transform length this table was built for.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of butterfly stages, `log2(len)`.
    pub fn stages(&self) -> u32 {
        self.len.trailing_zeros()
    }

    /// Distance between consecutive factors of `stage` in the stored table.
    #[inline]
    pub fn stride(&self, stage: u32) -> usize {
        self.len >> stage
    }

    /// The factor combining position `k` of the lower half of a block with
    /// its partner at `stage` (1-based, block size `2^stage`).
    pub fn factor(&self, stage: u32, k: usize, direction: Direction) -> Complex<T> {
        debug_assert!(stage >= 1 && stage <= self.stages());
        debug_assert!(k < (1 << (stage - 1)));
        direction.orient(self.factors[k * self.stride(stage)])
    }

    pub(crate) fn factors(&self) -> &[Complex<T>] {
        &self.factors
    }
}

struct CacheEntry<T> {
    table: Arc<OnceLock<Arc<TwiddleTable<T>>>>,
    last_used: u64,
}

/// Process-wide store of twiddle tables keyed by transform length.
///
/// Each length is built at most once: the map lock is only held to find or
/// reserve the slot, the table itself is built through the slot's `OnceLock`.
/// Tables are immutable and handed out as `Arc`s, so a plan holding one never
/// touches the lock again. A capacity of 0 means tables are never evicted;
/// otherwise the least recently requested length is dropped first.
pub struct TwiddleCache<T> {
    entries: Mutex<HashMap<usize, CacheEntry<T>>>,
    capacity: AtomicUsize,
    clock: AtomicU64,
}

impl<T: FftFloat> Default for TwiddleCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FftFloat> TwiddleCache<T> {
    pub fn new() -> Self {
        TwiddleCache {
            entries: Mutex::new(HashMap::new()),
            capacity: AtomicUsize::new(0),
            clock: AtomicU64::new(0),
        }
    }

    /// Return the table for `len`, building it on first use.
    pub fn get(&self, len: usize) -> Arc<TwiddleTable<T>> {
        let slot = {
            let mut entries = self.lock();
            let tick = self.clock.fetch_add(1, Ordering::Relaxed);
            match entries.get_mut(&len) {
                Some(entry) => {
                    entry.last_used = tick;
                    Arc::clone(&entry.table)
                }
                None => {
                    self.make_room(&mut entries);
                    let slot = Arc::new(OnceLock::new());
                    entries.insert(
                        len,
                        CacheEntry {
                            table: Arc::clone(&slot),
                            last_used: tick,
                        },
                    );
                    slot
                }
            }
        };

        Arc::clone(slot.get_or_init(|| {
            tracing::debug!(len, "building twiddle table");
            Arc::new(TwiddleTable::new(len))
        }))
    }

    pub fn contains(&self, len: usize) -> bool {
        self.lock().contains_key(&len)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached table. Plans built earlier keep their own `Arc`.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Relaxed)
    }

    /// Bound the number of distinct lengths kept; 0 removes the bound.
    pub fn set_capacity(&self, capacity: usize) {
        self.capacity.store(capacity, Ordering::Relaxed);
        let mut entries = self.lock();
        if capacity > 0 {
            while entries.len() > capacity {
                Self::evict_oldest(&mut entries);
            }
        }
    }

    fn make_room(&self, entries: &mut HashMap<usize, CacheEntry<T>>) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }
        while entries.len() >= capacity {
            Self::evict_oldest(entries);
        }
    }

    fn evict_oldest(entries: &mut HashMap<usize, CacheEntry<T>>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(len, _)| *len);
        if let Some(len) = oldest {
            tracing::trace!(len, "evicting twiddle table");
            entries.remove(&len);
        }
    }

    // The map only ever holds fully inserted entries, so a poisoned lock is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<usize, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The process-wide cache for precision `T`.
pub fn twiddle_cache<T: FftFloat>() -> &'static TwiddleCache<T> {
    T::twiddle_cache()
}
