#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Egg Drop engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and the pure strategy system. Adapters submit
//! [`Command`] values describing desired mutations, the session executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. The hidden critical floor is drawn through the
//! injected [`CriticalFloorSource`] capability so that replays stay
//! deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest building height accepted by a game configuration.
pub const MIN_FLOORS: u32 = 1;
/// Tallest building height accepted by a game configuration.
pub const MAX_FLOORS: u32 = 1_000;
/// Smallest egg supply accepted by a game configuration.
pub const MIN_EGGS: u32 = 1;
/// Largest egg supply accepted by a game configuration.
pub const MAX_EGGS: u32 = 10;

/// Floors below the critical floor that still count as "a bit higher".
pub const HINT_PROXIMITY_FLOORS: u32 = 10;

const DEFAULT_FLOORS: u32 = 100;
const DEFAULT_EGGS: u32 = 2;

/// Validated building height and egg supply for a single game.
///
/// Deserialization runs the same bounds check as [`GameConfig::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    total_floors: u32,
    total_eggs: u32,
}

/// Unchecked wire form of [`GameConfig`].
#[derive(Deserialize)]
struct RawGameConfig {
    total_floors: u32,
    total_eggs: u32,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = InvalidArgument;

    fn try_from(raw: RawGameConfig) -> Result<Self, Self::Error> {
        Self::new(raw.total_floors, raw.total_eggs)
    }
}

impl GameConfig {
    /// Creates a configuration, rejecting values outside the supported bounds.
    pub fn new(total_floors: u32, total_eggs: u32) -> Result<Self, InvalidArgument> {
        if !(MIN_FLOORS..=MAX_FLOORS).contains(&total_floors) {
            return Err(InvalidArgument::FloorsOutOfRange {
                floors: total_floors,
            });
        }
        if !(MIN_EGGS..=MAX_EGGS).contains(&total_eggs) {
            return Err(InvalidArgument::EggsOutOfRange { eggs: total_eggs });
        }

        Ok(Self {
            total_floors,
            total_eggs,
        })
    }

    /// Creates a configuration by clamping both values to the supported bounds.
    #[must_use]
    pub fn clamped(total_floors: u32, total_eggs: u32) -> Self {
        Self {
            total_floors: total_floors.clamp(MIN_FLOORS, MAX_FLOORS),
            total_eggs: total_eggs.clamp(MIN_EGGS, MAX_EGGS),
        }
    }

    /// Number of floors in the building.
    #[must_use]
    pub const fn total_floors(&self) -> u32 {
        self.total_floors
    }

    /// Number of eggs handed to the player at the start of the game.
    #[must_use]
    pub const fn total_eggs(&self) -> u32 {
        self.total_eggs
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_floors: DEFAULT_FLOORS,
            total_eggs: DEFAULT_EGGS,
        }
    }
}

/// Reasons a request is refused. Every refusal leaves state untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum InvalidArgument {
    /// The egg count lies outside the supported bounds.
    #[error("egg count {eggs} is outside the supported range {}..={}", MIN_EGGS, MAX_EGGS)]
    EggsOutOfRange {
        /// Egg count that was supplied.
        eggs: u32,
    },
    /// The floor count lies outside the supported bounds.
    #[error(
        "floor count {floors} is outside the supported range {}..={}",
        MIN_FLOORS,
        MAX_FLOORS
    )]
    FloorsOutOfRange {
        /// Floor count that was supplied.
        floors: u32,
    },
    /// The chosen drop floor is not one the player may still test.
    #[error("floor {floor} cannot be tested; choose a floor in {lowest}..={highest}")]
    FloorOutOfRange {
        /// Floor the player attempted to drop from.
        floor: u32,
        /// Lowest floor that may still be tested.
        lowest: u32,
        /// Highest floor in the building.
        highest: u32,
    },
    /// The game already ended; only a new game or a reset may follow.
    #[error("the game is over; start a new game to keep dropping eggs")]
    SessionOver,
}

/// Capability that draws the hidden critical floor for a new game.
///
/// Implementations must return a value in `1..=total_floors`. Sessions clamp
/// anything else into that range.
pub trait CriticalFloorSource {
    /// Draws a critical floor for a building with `total_floors` floors.
    fn critical_floor(&mut self, total_floors: u32) -> u32;
}

/// Source that always yields the same critical floor.
///
/// Intended for tests and scripted replays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedFloor(u32);

impl FixedFloor {
    /// Creates a source that always reports `floor`.
    #[must_use]
    pub const fn new(floor: u32) -> Self {
        Self(floor)
    }

    /// Retrieves the floor reported by the source.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl CriticalFloorSource for FixedFloor {
    fn critical_floor(&mut self, total_floors: u32) -> u32 {
        self.0.min(total_floors)
    }
}

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Drops are still accepted.
    Active,
    /// Terminal state; only a new game leaves it.
    Over,
}

/// What happened to the egg on a drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropOutcome {
    /// The chosen floor is at or above the critical floor.
    Broke,
    /// The chosen floor is below the critical floor.
    Survived,
}

/// Why a session moved to [`SessionState::Over`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The last egg broke before the player won.
    EggsExhausted,
    /// The player dropped from exactly the critical floor.
    FloorFound,
    /// The player used as many drops as the optimal strategy needs.
    OptimalDropsReached,
}

impl EndReason {
    /// Reports whether the reason counts as a win for the player.
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Self::FloorFound | Self::OptimalDropsReached)
    }
}

/// Advisory message shown to the player. Never influences game logic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hint {
    /// No hint yet.
    #[default]
    None,
    /// The egg survived far below the critical floor.
    MuchHigher,
    /// The egg survived within a few floors of the critical floor.
    BitHigher,
    /// The egg survived at or above the critical floor.
    VeryClose,
    /// The egg broke and eggs remain.
    TryLower,
    /// The last egg broke; the critical floor is revealed.
    Revealed {
        /// Hidden floor the player failed to find.
        critical_floor: u32,
    },
    /// The player won.
    Success {
        /// Hidden floor, revealed on success.
        critical_floor: u32,
        /// Drops taken to win.
        drops: u32,
    },
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::MuchHigher => f.write_str("Come on! Go higher, genius!"),
            Self::BitHigher => f.write_str("Getting warmer! Try a bit higher, okay?"),
            Self::VeryClose => f.write_str("You're really close! Just a bit more..."),
            Self::TryLower => f.write_str("Seriously? You should've gone lower!"),
            Self::Revealed { critical_floor } => write!(
                f,
                "Ha! Couldn't figure it out, huh? It was floor {critical_floor} all along!"
            ),
            Self::Success { .. } => f.write_str("Finally! You listened!"),
        }
    }
}

/// Everything a presentation layer needs to render the result of one drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropReport {
    /// Floor the egg was dropped from.
    pub floor: u32,
    /// Whether the egg broke or survived.
    pub outcome: DropOutcome,
    /// Eggs remaining after the drop.
    pub eggs_left: u32,
    /// Highest floor confirmed safe after the drop; zero when none.
    pub last_safe_floor: u32,
    /// Drops taken so far, including this one.
    pub drops_made: u32,
    /// Indicates whether the drop ended the game.
    pub game_over: bool,
    /// Why the game ended, if it did.
    pub end_reason: Option<EndReason>,
    /// Hint produced by the drop.
    pub hint: Hint,
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Replaces the session with a fresh game using the provided configuration.
    StartGame {
        /// Building height and egg supply for the new game.
        config: GameConfig,
    },
    /// Drops an egg from the provided floor.
    DropEgg {
        /// Absolute floor number, counted from one.
        floor: u32,
    },
    /// Starts a fresh game with the current configuration.
    Reset,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Announces that a new game began.
    GameStarted {
        /// Configuration of the new game.
        config: GameConfig,
        /// Worst-case drop count of the optimal strategy for the game.
        optimal_drops: u32,
    },
    /// Confirms that an egg was dropped.
    EggDropped {
        /// Outcome of the drop.
        report: DropReport,
    },
    /// Announces that the game reached its terminal state.
    GameEnded {
        /// Reason the game ended.
        reason: EndReason,
        /// Hidden floor, revealed once the game is over.
        critical_floor: u32,
        /// Drops taken over the whole game.
        drops_made: u32,
    },
    /// Reports that a drop request was refused.
    DropRejected {
        /// Floor provided in the drop request.
        floor: u32,
        /// Specific reason the drop was refused.
        error: InvalidArgument,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_values_outside_bounds() {
        assert_eq!(
            GameConfig::new(0, 2),
            Err(InvalidArgument::FloorsOutOfRange { floors: 0 })
        );
        assert_eq!(
            GameConfig::new(1_001, 2),
            Err(InvalidArgument::FloorsOutOfRange { floors: 1_001 })
        );
        assert_eq!(
            GameConfig::new(100, 0),
            Err(InvalidArgument::EggsOutOfRange { eggs: 0 })
        );
        assert_eq!(
            GameConfig::new(100, 11),
            Err(InvalidArgument::EggsOutOfRange { eggs: 11 })
        );
    }

    #[test]
    fn config_accepts_boundaries() {
        let low = GameConfig::new(MIN_FLOORS, MIN_EGGS).expect("lower bounds");
        assert_eq!((low.total_floors(), low.total_eggs()), (1, 1));
        let high = GameConfig::new(MAX_FLOORS, MAX_EGGS).expect("upper bounds");
        assert_eq!((high.total_floors(), high.total_eggs()), (1_000, 10));
    }

    #[test]
    fn clamped_config_stays_within_bounds() {
        let config = GameConfig::clamped(5_000, 0);
        assert_eq!(config.total_floors(), MAX_FLOORS);
        assert_eq!(config.total_eggs(), MIN_EGGS);
    }

    #[test]
    fn default_config_matches_classic_puzzle() {
        let config = GameConfig::default();
        assert_eq!(config.total_floors(), 100);
        assert_eq!(config.total_eggs(), 2);
    }

    #[test]
    fn fixed_floor_never_exceeds_building() {
        let mut source = FixedFloor::new(72);
        assert_eq!(source.critical_floor(100), 72);
        assert_eq!(source.critical_floor(50), 50);
        assert_eq!(source.get(), 72, "drawing must not change the stored floor");
    }

    #[test]
    fn hints_render_revealed_floor() {
        assert_eq!(Hint::None.to_string(), "");
        assert!(Hint::Revealed { critical_floor: 72 }
            .to_string()
            .contains("floor 72"));
        let success = Hint::Success {
            critical_floor: 72,
            drops: 4,
        };
        assert_eq!(success.to_string(), "Finally! You listened!");
    }

    #[test]
    fn end_reasons_classify_wins() {
        assert!(EndReason::FloorFound.is_win());
        assert!(EndReason::OptimalDropsReached.is_win());
        assert!(!EndReason::EggsExhausted.is_win());
    }

    #[test]
    fn config_round_trips_through_bincode() {
        let config = GameConfig::new(250, 3).expect("valid config");
        let bytes = bincode::serialize(&config).expect("serialize");
        let restored: GameConfig = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, config);
    }

    #[test]
    fn deserialized_config_is_bounds_checked() {
        for (floors, eggs) in [(0u32, 2u32), (100, 0), (1_001, 2), (100, 11)] {
            let bytes = bincode::serialize(&(floors, eggs)).expect("serialize");
            assert!(
                bincode::deserialize::<GameConfig>(&bytes).is_err(),
                "({floors}, {eggs}) must be refused"
            );
        }
    }

    #[test]
    fn start_command_with_invalid_config_is_refused_on_decode() {
        let valid = Command::StartGame {
            config: GameConfig::default(),
        };
        let mut bytes = bincode::serialize(&valid).expect("serialize");
        // Variant tag (4 bytes) then total_floors (4 bytes, little endian).
        bytes[4..8].copy_from_slice(&0u32.to_le_bytes());
        assert!(bincode::deserialize::<Command>(&bytes).is_err());
    }

    #[test]
    fn rejection_event_round_trips_through_bincode() {
        let event = Event::DropRejected {
            floor: 50,
            error: InvalidArgument::FloorOutOfRange {
                floor: 50,
                lowest: 51,
                highest: 100,
            },
        };
        let bytes = bincode::serialize(&event).expect("serialize");
        let restored: Event = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, event);
    }
}
