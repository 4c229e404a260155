#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session state for Egg Drop.
//!
//! A [`Session`] is created with a hidden critical floor drawn from an injected
//! [`CriticalFloorSource`] and the worst-case bound computed by the
//! [`StrategyEngine`]. Drops mutate it through [`apply_drop`] or the
//! command-driven [`apply`] entry point. Once a session is over it never
//! changes again; new games replace it wholesale.

mod hints;

use egg_drop_core::{
    Command, CriticalFloorSource, DropOutcome, DropReport, EndReason, Event, GameConfig, Hint,
    InvalidArgument, SessionState,
};
use egg_drop_system_strategy::StrategyEngine;
use rand::Rng;
use tracing::{debug, trace};

/// State of a single egg drop game.
///
/// `eggs_left` never increases, `last_safe_floor` never decreases, and an
/// [`SessionState::Over`] session rejects every further drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    config: GameConfig,
    critical_floor: u32,
    eggs_left: u32,
    last_safe_floor: u32,
    drops_made: u32,
    optimal_drops: u32,
    state: SessionState,
    end_reason: Option<EndReason>,
    hint: Hint,
}

impl Session {
    /// Starts a new game, drawing the hidden critical floor from `source`.
    pub fn new<S>(config: GameConfig, source: &mut S, engine: &mut StrategyEngine) -> Self
    where
        S: CriticalFloorSource + ?Sized,
    {
        let total_floors = config.total_floors();
        let critical_floor = source.critical_floor(total_floors).clamp(1, total_floors);
        let optimal_drops = engine.optimal_drops(&config);

        debug!(
            floors = total_floors,
            eggs = config.total_eggs(),
            optimal_drops,
            "starting new game"
        );
        trace!(critical_floor, "critical floor drawn");

        Self {
            config,
            critical_floor,
            eggs_left: config.total_eggs(),
            last_safe_floor: 0,
            drops_made: 0,
            optimal_drops,
            state: SessionState::Active,
            end_reason: None,
            hint: Hint::None,
        }
    }

    fn finish(&mut self, reason: EndReason) {
        self.state = SessionState::Over;
        self.end_reason = Some(reason);
        debug!(?reason, drops = self.drops_made, "game over");
    }

    fn report(&self, floor: u32, outcome: DropOutcome) -> DropReport {
        DropReport {
            floor,
            outcome,
            eggs_left: self.eggs_left,
            last_safe_floor: self.last_safe_floor,
            drops_made: self.drops_made,
            game_over: self.state == SessionState::Over,
            end_reason: self.end_reason,
            hint: self.hint,
        }
    }
}

/// Drops an egg from `floor`, returning what happened.
///
/// Refuses drops once the game is over and floors outside
/// `last_safe_floor + 1..=total_floors`; a refused drop leaves the session
/// untouched. A drop ends the game when the last egg breaks, when `floor` is
/// the critical floor, or when the drop count reaches the optimal bound. The
/// two winning conditions take precedence over running out of eggs.
pub fn apply_drop(session: &mut Session, floor: u32) -> Result<DropReport, InvalidArgument> {
    if session.state == SessionState::Over {
        return Err(InvalidArgument::SessionOver);
    }

    let lowest = session.last_safe_floor + 1;
    let highest = session.config.total_floors();
    if floor < lowest || floor > highest {
        return Err(InvalidArgument::FloorOutOfRange {
            floor,
            lowest,
            highest,
        });
    }

    session.drops_made += 1;
    let critical_floor = session.critical_floor;
    let outcome = if floor >= critical_floor {
        DropOutcome::Broke
    } else {
        DropOutcome::Survived
    };

    match outcome {
        DropOutcome::Broke => {
            session.eggs_left = session.eggs_left.saturating_sub(1);
            session.hint = hints::after_break(session.eggs_left, critical_floor);
        }
        DropOutcome::Survived => {
            session.last_safe_floor = floor;
            session.hint = hints::after_survival(floor, critical_floor);
        }
    }

    let win = if floor == critical_floor {
        Some(EndReason::FloorFound)
    } else if session.drops_made == session.optimal_drops {
        Some(EndReason::OptimalDropsReached)
    } else {
        None
    };
    if win.is_some() {
        session.hint = hints::after_win(critical_floor, session.drops_made);
    }
    let exhausted = (session.eggs_left == 0).then_some(EndReason::EggsExhausted);
    if let Some(reason) = win.or(exhausted) {
        session.finish(reason);
    }

    debug!(
        floor,
        ?outcome,
        eggs_left = session.eggs_left,
        drops = session.drops_made,
        "egg dropped"
    );
    Ok(session.report(floor, outcome))
}

/// Starts a fresh game with the same configuration as `session`.
#[must_use]
pub fn reset<S>(session: &Session, source: &mut S, engine: &mut StrategyEngine) -> Session
where
    S: CriticalFloorSource + ?Sized,
{
    Session::new(session.config, source, engine)
}

/// Applies the provided command to the session, broadcasting resulting events.
pub fn apply<S>(
    session: &mut Session,
    command: Command,
    source: &mut S,
    engine: &mut StrategyEngine,
    out_events: &mut Vec<Event>,
) where
    S: CriticalFloorSource + ?Sized,
{
    match command {
        Command::StartGame { config } => {
            *session = Session::new(config, source, engine);
            out_events.push(Event::GameStarted {
                config,
                optimal_drops: session.optimal_drops,
            });
        }
        Command::Reset => {
            *session = reset(session, source, engine);
            out_events.push(Event::GameStarted {
                config: session.config,
                optimal_drops: session.optimal_drops,
            });
        }
        Command::DropEgg { floor } => match apply_drop(session, floor) {
            Ok(report) => {
                out_events.push(Event::EggDropped { report });
                if let Some(reason) = report.end_reason {
                    out_events.push(Event::GameEnded {
                        reason,
                        critical_floor: session.critical_floor,
                        drops_made: session.drops_made,
                    });
                }
            }
            Err(error) => out_events.push(Event::DropRejected { floor, error }),
        },
    }
}

/// Critical floor source backed by any [`rand::Rng`], drawing uniformly.
#[derive(Clone, Debug)]
pub struct RngFloorSource<R> {
    rng: R,
}

impl<R: Rng> RngFloorSource<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Consumes the source, yielding the wrapped generator.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> CriticalFloorSource for RngFloorSource<R> {
    fn critical_floor(&mut self, total_floors: u32) -> u32 {
        self.rng.gen_range(1..=total_floors.max(1))
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::ops::RangeInclusive;

    use super::Session;
    use egg_drop_core::{EndReason, GameConfig, Hint, SessionState};
    use egg_drop_system_strategy::StrategyEngine;

    /// Provides the configuration the session was started with.
    #[must_use]
    pub fn config(session: &Session) -> GameConfig {
        session.config
    }

    /// Reports whether the session still accepts drops.
    #[must_use]
    pub fn state(session: &Session) -> SessionState {
        session.state
    }

    /// Reports why the session ended, if it has.
    #[must_use]
    pub fn end_reason(session: &Session) -> Option<EndReason> {
        session.end_reason
    }

    /// Eggs the player still holds.
    #[must_use]
    pub fn eggs_left(session: &Session) -> u32 {
        session.eggs_left
    }

    /// Drops taken so far.
    #[must_use]
    pub fn drops_made(session: &Session) -> u32 {
        session.drops_made
    }

    /// Highest floor confirmed safe; zero when none has been.
    #[must_use]
    pub fn last_safe_floor(session: &Session) -> u32 {
        session.last_safe_floor
    }

    /// Worst-case drop count of the optimal strategy for the whole building.
    #[must_use]
    pub fn optimal_drops(session: &Session) -> u32 {
        session.optimal_drops
    }

    /// Most recent advisory hint.
    #[must_use]
    pub fn hint(session: &Session) -> Hint {
        session.hint
    }

    /// Untested floors above the last safe floor.
    #[must_use]
    pub fn floors_remaining(session: &Session) -> u32 {
        session
            .config
            .total_floors()
            .saturating_sub(session.last_safe_floor)
    }

    /// Floors the player may drop from next, or `None` once the game is over.
    #[must_use]
    pub fn allowed_floors(session: &Session) -> Option<RangeInclusive<u32>> {
        if session.state == SessionState::Over || floors_remaining(session) == 0 {
            return None;
        }
        Some(session.last_safe_floor + 1..=session.config.total_floors())
    }

    /// Floor the optimal strategy would test next, or `None` once the game is over.
    ///
    /// The suggestion is advisory; any floor in [`allowed_floors`] is accepted.
    #[must_use]
    pub fn suggested_floor(session: &Session, engine: &mut StrategyEngine) -> Option<u32> {
        let allowed = allowed_floors(session)?;
        let floor = engine
            .suggested_floor(
                session.eggs_left,
                floors_remaining(session),
                session.last_safe_floor,
            )
            .ok()?;
        Some(floor.clamp(*allowed.start(), *allowed.end()))
    }

    /// Fraction of the starting eggs still unbroken, in `0.0..=1.0`.
    #[must_use]
    pub fn eggs_fraction(session: &Session) -> f32 {
        session.eggs_left as f32 / session.config.total_eggs() as f32
    }

    /// Reveals the critical floor once the session is over.
    #[must_use]
    pub fn revealed_critical_floor(session: &Session) -> Option<u32> {
        (session.state == SessionState::Over).then_some(session.critical_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egg_drop_core::FixedFloor;

    fn session(floors: u32, eggs: u32, critical_floor: u32) -> Session {
        let config = GameConfig::new(floors, eggs).expect("valid config");
        Session::new(
            config,
            &mut FixedFloor::new(critical_floor),
            &mut StrategyEngine::new(),
        )
    }

    #[test]
    fn new_session_starts_active_with_full_supply() {
        let session = session(100, 2, 72);
        assert_eq!(session.state, SessionState::Active);
        assert_eq!(session.eggs_left, 2);
        assert_eq!(session.last_safe_floor, 0);
        assert_eq!(session.drops_made, 0);
        assert_eq!(session.optimal_drops, 14);
        assert_eq!(session.hint, Hint::None);
        assert_eq!(session.end_reason, None);
    }

    #[test]
    fn critical_floor_is_clamped_into_building() {
        assert_eq!(session(10, 1, 0).critical_floor, 1);
        assert_eq!(session(10, 1, 50).critical_floor, 10);
    }

    #[test]
    fn reset_keeps_configuration_and_clears_progress() {
        let mut engine = StrategyEngine::new();
        let mut first = session(100, 3, 40);
        let _ = apply_drop(&mut first, 20).expect("drop accepted");

        let fresh = reset(&first, &mut FixedFloor::new(80), &mut engine);
        assert_eq!(fresh.config, first.config);
        assert_eq!(fresh.critical_floor, 80);
        assert_eq!(fresh.drops_made, 0);
        assert_eq!(fresh.eggs_left, 3);
        assert_eq!(fresh.state, SessionState::Active);
    }

    #[test]
    fn rng_source_stays_within_building() {
        let mut source = RngFloorSource::new(rand::rngs::mock::StepRng::new(0, 7_919));
        for _ in 0..100 {
            let floor = source.critical_floor(13);
            assert!((1..=13).contains(&floor), "drew {floor}");
        }
    }
}
