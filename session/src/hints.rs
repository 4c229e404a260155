//! Advisory hint policy applied after each drop.

use egg_drop_core::{Hint, HINT_PROXIMITY_FLOORS};

/// Hint shown after the egg survives a drop from `floor`.
pub(crate) fn after_survival(floor: u32, critical_floor: u32) -> Hint {
    if floor < critical_floor.saturating_sub(HINT_PROXIMITY_FLOORS) {
        Hint::MuchHigher
    } else if floor < critical_floor {
        Hint::BitHigher
    } else {
        Hint::VeryClose
    }
}

/// Hint shown after the egg breaks, leaving `eggs_left` eggs.
pub(crate) fn after_break(eggs_left: u32, critical_floor: u32) -> Hint {
    if eggs_left == 0 {
        Hint::Revealed { critical_floor }
    } else {
        Hint::TryLower
    }
}

/// Hint shown once the player wins.
pub(crate) fn after_win(critical_floor: u32, drops: u32) -> Hint {
    Hint::Success {
        critical_floor,
        drops,
    }
}
