use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A single grid cell holding an optional tile value.
///
/// A present value is always a power of two >= 2.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Slot(Option<u32>);

impl Slot {
    /// An empty slot.
    pub const EMPTY: Slot = Slot(None);

    /// Build an occupied slot, rejecting values that are not a power of two >= 2.
    pub fn with_value(value: u32) -> Result<Self> {
        if value >= 2 && value.is_power_of_two() {
            Ok(Slot(Some(value)))
        } else {
            Err(EngineError::InvalidTile(value))
        }
    }

    /// Read a raw matrix cell where `0` means empty.
    pub fn from_raw(raw: u32) -> Result<Self> {
        match raw {
            0 => Ok(Slot::EMPTY),
            v => Slot::with_value(v),
        }
    }

    /// Raw matrix cell value, `0` when empty.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0.unwrap_or(0)
    }

    #[inline]
    pub fn value(self) -> Option<u32> {
        self.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0.is_none()
    }

    /// Fill an empty slot with a 2 (90%) or 4 (10%). Occupied slots are left alone.
    ///
    /// The tile value is drawn from `rng` even when the slot is occupied.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let tile = generate_random_tile(rng);
        if self.is_empty() {
            self.0 = Some(tile);
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Slide this slot's tile into `target` if `target` is empty.
    ///
    /// Returns true when the tile moved.
    pub fn move_into(&mut self, target: &mut Slot) -> bool {
        match (self.0, target.0) {
            (Some(v), None) => {
                target.0 = Some(v);
                self.clear();
                true
            }
            _ => false,
        }
    }

    /// Merge this slot's tile into an equal `target` (doubling it), otherwise
    /// fall back to [`Slot::move_into`].
    ///
    /// Returns true when anything changed.
    pub fn merge_into(&mut self, target: &mut Slot) -> bool {
        match (self.0, target.0) {
            (Some(v), Some(t)) if v == t => match t.checked_mul(2) {
                Some(doubled) => {
                    target.0 = Some(doubled);
                    self.clear();
                    true
                }
                // Already the largest representable tile.
                None => self.move_into(target),
            },
            (Some(_), _) => self.move_into(target),
            (None, _) => false,
        }
    }
}

impl TryFrom<u32> for Slot {
    type Error = EngineError;

    fn try_from(raw: u32) -> Result<Self> {
        Slot::from_raw(raw)
    }
}

impl From<Slot> for u32 {
    fn from(slot: Slot) -> u32 {
        slot.raw()
    }
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::{rngs::StdRng, SeedableRng};

    fn tile(v: u32) -> Slot {
        Slot::with_value(v).unwrap()
    }

    #[test]
    fn it_rejects_invalid_values() {
        assert_eq!(Slot::with_value(0), Err(EngineError::InvalidTile(0)));
        assert_eq!(Slot::with_value(1), Err(EngineError::InvalidTile(1)));
        assert_eq!(Slot::with_value(6), Err(EngineError::InvalidTile(6)));
        assert_eq!(Slot::from_raw(0), Ok(Slot::EMPTY));
        assert_eq!(Slot::from_raw(2048).map(Slot::raw), Ok(2048));
    }

    #[test]
    fn it_spawns_only_into_empty() {
        let mut rng = StepRng::new(0, 0);
        let mut slot = Slot::EMPTY;
        slot.spawn(&mut rng);
        assert_eq!(slot.value(), Some(2));

        let mut occupied = tile(8);
        occupied.spawn(&mut rng);
        assert_eq!(occupied.value(), Some(8));
    }

    #[test]
    fn it_spawns_mostly_twos() {
        let mut rng = StdRng::seed_from_u64(2048);
        let mut fours = 0;
        for _ in 0..10_000 {
            let mut slot = Slot::EMPTY;
            slot.spawn(&mut rng);
            match slot.value() {
                Some(2) => {}
                Some(4) => fours += 1,
                other => panic!("unexpected spawn {other:?}"),
            }
        }
        assert!((700..1300).contains(&fours), "fours = {fours}");
    }

    #[test]
    fn it_moves_into_empty_only() {
        let mut src = tile(4);
        let mut dst = Slot::EMPTY;
        assert!(src.move_into(&mut dst));
        assert!(src.is_empty());
        assert_eq!(dst.value(), Some(4));

        let mut src = tile(4);
        let mut dst = tile(2);
        assert!(!src.move_into(&mut dst));
        assert_eq!((src.raw(), dst.raw()), (4, 2));

        let mut src = Slot::EMPTY;
        let mut dst = Slot::EMPTY;
        assert!(!src.move_into(&mut dst));
        assert!(dst.is_empty());
    }

    #[test]
    fn it_merges_equal_tiles() {
        let mut src = tile(16);
        let mut dst = tile(16);
        assert!(src.merge_into(&mut dst));
        assert!(src.is_empty());
        assert_eq!(dst.value(), Some(32));
    }

    #[test]
    fn it_does_not_merge_past_u32() {
        let mut src = tile(1 << 31);
        let mut dst = tile(1 << 31);
        assert!(!src.merge_into(&mut dst));
        assert_eq!((src.raw(), dst.raw()), (1 << 31, 1 << 31));

        let mut src = tile(1 << 30);
        let mut dst = tile(1 << 30);
        assert!(src.merge_into(&mut dst));
        assert_eq!(dst.value(), Some(1 << 31));
    }

    #[test]
    fn it_merge_falls_back_to_move() {
        let mut src = tile(2);
        let mut dst = Slot::EMPTY;
        assert!(src.merge_into(&mut dst));
        assert_eq!((src.raw(), dst.raw()), (0, 2));

        let mut src = tile(2);
        let mut dst = tile(4);
        assert!(!src.merge_into(&mut dst));
        assert_eq!((src.raw(), dst.raw()), (2, 4));

        let mut src = Slot::EMPTY;
        let mut dst = tile(4);
        assert!(!src.merge_into(&mut dst));
        assert_eq!(dst.raw(), 4);
    }

    #[test]
    fn it_clears() {
        let mut slot = tile(64);
        slot.clear();
        assert!(slot.is_empty());
        slot.clear();
        assert!(slot.is_empty());
    }
}
