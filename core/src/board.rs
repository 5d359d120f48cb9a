use crate::rng::SplitMix64;

pub const BOARD_SIDE: usize = 3;
pub const SLOT_COUNT: usize = BOARD_SIDE * BOARD_SIDE;

/// Tile identifier, 1-based. The value doubles as the tile's solved
/// slot index + 1, so identity alone determines which region of the
/// picture a tile shows.
pub type TileId = u8;

/// CSS background offsets per tile identity, reading order. With the
/// picture scaled to 300% of a cell, each pair crops one ninth.
const BACKGROUND_OFFSETS: [&str; SLOT_COUNT] = [
    "0% 0%", "50% 0%", "100% 0%",
    "0% 50%", "50% 50%", "100% 50%",
    "0% 100%", "50% 100%", "100% 100%",
];

pub fn background_offset(id: TileId) -> &'static str {
    BACKGROUND_OFFSETS[(id.saturating_sub(1) as usize).min(SLOT_COUNT - 1)]
}

/// Assignment of tiles to grid slots. Always a permutation of 1..=9;
/// slot `i` holds the tile rendered at grid position `i` (row-major).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    slots: [TileId; SLOT_COUNT],
}

impl Board {
    /// The solved arrangement: tile `i + 1` on slot `i`.
    pub fn solved() -> Self {
        let mut slots = [0; SLOT_COUNT];
        for (slot, id) in slots.iter_mut().enumerate() {
            *id = slot as TileId + 1;
        }
        Self { slots }
    }

    pub fn from_slots(slots: [TileId; SLOT_COUNT]) -> Self {
        Self { slots }
    }

    /// Fisher-Yates permutation of the identity sequence.
    pub fn shuffled(rng: &mut SplitMix64) -> Self {
        let mut board = Self::solved();
        for i in (1..SLOT_COUNT).rev() {
            let j = rng.next_below(i + 1);
            board.slots.swap(i, j);
        }
        board
    }

    pub fn slots(&self) -> &[TileId; SLOT_COUNT] {
        &self.slots
    }

    pub fn slot_of(&self, id: TileId) -> Option<usize> {
        self.slots.iter().position(|tile| *tile == id)
    }

    /// Exchange the slots holding `a` and `b`. Self-swaps and unknown
    /// identifiers leave the board untouched and report false.
    pub fn swap_tiles(&mut self, a: TileId, b: TileId) -> bool {
        if a == b {
            return false;
        }
        let (Some(slot_a), Some(slot_b)) = (self.slot_of(a), self.slot_of(b)) else {
            return false;
        };
        self.slots.swap(slot_a, slot_b);
        true
    }

    pub fn is_solved(&self) -> bool {
        self.slots
            .iter()
            .enumerate()
            .all(|(slot, id)| *id as usize == slot + 1)
    }
}
