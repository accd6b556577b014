use std::collections::BTreeSet;

use super::SurfaceId;

/// Liveness table for the surface handle namespace.
///
/// Invariants:
/// - an id is either live (allocated, not yet released) or free
/// - `allocate` always returns the smallest free id, so ids stay dense when
///   surfaces are destroyed and recreated in tight loops
///
/// Memory is proportional to the number of live ids, not to the number of
/// allocations ever performed.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    live: BTreeSet<u32>,
}

impl HandleRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the smallest free id as live and returns it.
    pub fn allocate(&mut self) -> SurfaceId {
        // `live` iterates in ascending order; the first position where the
        // value runs ahead of the counter is the lowest gap.
        let mut next = 0u32;
        for &id in &self.live {
            if id != next {
                break;
            }
            next += 1;
        }
        self.live.insert(next);
        SurfaceId(next)
    }

    /// Frees `id`. Returns `false` if it was not live.
    ///
    /// A `false` here means the caller released twice or released an id it
    /// never owned; it never disturbs other ids.
    pub fn release(&mut self, id: SurfaceId) -> bool {
        self.live.remove(&id.0)
    }

    #[inline]
    pub fn is_live(&self, id: SurfaceId) -> bool {
        self.live.contains(&id.0)
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
