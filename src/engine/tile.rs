use std::fmt;

use super::EngineError;

/// Largest exponent a tile can hold (2^63 still fits the `u64` value).
pub(crate) const MAX_EXPONENT: u8 = 63;

/// A single grid cell.
///
/// Stored as the base-2 exponent of its value, 0 for empty, so `Tile(1)`
/// is a 2, `Tile(2)` a 4 and so on. Equality is by value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile(u8);

impl Tile {
    /// The empty cell.
    pub const EMPTY: Tile = Tile(0);

    /// The tile every spawn places.
    pub const TWO: Tile = Tile(1);

    /// Build a tile from its face value.
    ///
    /// ```
    /// use grid_2048::engine::Tile;
    /// assert_eq!(Tile::from_value(8).unwrap().value(), 8);
    /// assert!(Tile::from_value(0).unwrap().is_empty());
    /// assert!(Tile::from_value(6).is_err());
    /// assert!(Tile::from_value(1).is_err());
    /// ```
    pub fn from_value(value: u64) -> Result<Self, EngineError> {
        match value {
            0 => Ok(Tile::EMPTY),
            v if v >= 2 && v.is_power_of_two() => Ok(Tile(v.trailing_zeros() as u8)),
            v => Err(EngineError::InvalidTile { value: v }),
        }
    }

    /// Face value, 0 when empty.
    #[inline]
    pub fn value(self) -> u64 {
        if self.0 == 0 { 0 } else { 1u64 << self.0 }
    }

    /// Base-2 exponent, 0 when empty.
    #[inline]
    pub fn exponent(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    fn doubled(self) -> Tile {
        debug_assert!(self.0 < MAX_EXPONENT, "tile exponent overflow");
        Tile(self.0 + 1)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({})", self.value())
    }
}

/// A tile plus its "already merged" marker, alive only for one line pass.
///
/// Slots are built fresh from grid tiles at the start of every move and
/// turned back into plain tiles at the end, so the marker never outlives
/// the move that set it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MergeSlot {
    tile: Tile,
    merged: bool,
}

impl MergeSlot {
    pub(crate) const EMPTY: MergeSlot = MergeSlot { tile: Tile::EMPTY, merged: false };

    #[inline]
    pub(crate) fn tile(self) -> Tile {
        self.tile
    }

    #[inline]
    pub(crate) fn is_empty(self) -> bool {
        self.tile.is_empty()
    }

    /// Double the value and mark the slot as merged for the rest of the pass.
    #[inline]
    pub(crate) fn increase(&mut self) {
        self.tile = self.tile.doubled();
        self.merged = true;
    }

    /// Equal values and neither side merged yet during this pass. Tiles at
    /// `MAX_EXPONENT` never merge, the doubled value would not fit a `u64`.
    #[inline]
    pub(crate) fn can_merge(self, other: MergeSlot) -> bool {
        !self.is_empty()
            && self.tile.0 < MAX_EXPONENT
            && self.tile == other.tile
            && !self.merged
            && !other.merged
    }
}

impl From<Tile> for MergeSlot {
    #[inline]
    fn from(tile: Tile) -> Self {
        MergeSlot { tile, merged: false }
    }
}

impl PartialEq for MergeSlot {
    fn eq(&self, other: &Self) -> bool {
        self.tile == other.tile
    }
}

impl Eq for MergeSlot {}
