//! Pure game state for the barabara picture puzzle: a 3×3 board of
//! image tiles, scrambling, swap-on-drop transitions, and the round
//! lifecycle with its seconds clock. No browser types; the app crate
//! owns all rendering and input.

pub mod board;
pub mod rng;
pub mod session;

pub use board::{background_offset, Board, TileId, BOARD_SIDE, SLOT_COUNT};
pub use rng::SplitMix64;
pub use session::{DropOutcome, Phase, Session};
