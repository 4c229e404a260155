//! Line-oriented terminal front end driving a single game session.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use egg_drop_core::{Command, CriticalFloorSource, DropOutcome, Event, GameConfig, Hint};
use egg_drop_session::{self as session, query, Session};
use egg_drop_system_strategy::StrategyEngine;
use thiserror::Error;

const GAUGE_WIDTH: usize = 10;

const HOW_TO_PLAY: &str = "\
How to play:
  1. Choose the number of floors and eggs (`floors N`, `eggs N`).
  2. Type a floor number to drop an egg from it, or press enter to use the suggestion.
  3. Eggs dropped from the critical floor or above break; below it they survive.
  4. Use the ghost's hints and the optimal strategy to find the highest safe floor.
  5. The game ends when you find the critical floor, reach the optimal drop count, or run out of eggs.
  6. Type `new` for a fresh game and `quit` to leave.";

/// Player request parsed from one input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Drop(u32),
    DropSuggested,
    NewGame,
    SetFloors(u32),
    SetEggs(u32),
    Help,
    Quit,
}

/// Reasons an input line could not be understood.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum InputError {
    #[error("`{0}` needs a number, for example `{0} 10`")]
    MissingValue(&'static str),
    #[error("`{0}` is not a whole number")]
    InvalidNumber(String),
    #[error("unknown command `{0}`; type `help` for instructions")]
    Unknown(String),
}

pub(crate) fn parse_input(line: &str) -> Result<Input, InputError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Input::DropSuggested);
    };

    match head.to_ascii_lowercase().as_str() {
        "new" | "reset" => Ok(Input::NewGame),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" | "q" => Ok(Input::Quit),
        "floors" => number(words.next(), "floors").map(Input::SetFloors),
        "eggs" => number(words.next(), "eggs").map(Input::SetEggs),
        "drop" => number(words.next(), "drop").map(Input::Drop),
        _ if head.bytes().all(|byte| byte.is_ascii_digit()) => {
            number(Some(head), "drop").map(Input::Drop)
        }
        _ => Err(InputError::Unknown(head.to_owned())),
    }
}

fn number(word: Option<&str>, command: &'static str) -> Result<u32, InputError> {
    let word = word.ok_or(InputError::MissingValue(command))?;
    word.parse()
        .map_err(|_| InputError::InvalidNumber(word.to_owned()))
}

/// Runs the interactive loop until the player quits or input ends.
pub(crate) fn run<R, W, S>(input: R, mut output: W, config: GameConfig, mut source: S) -> Result<()>
where
    R: BufRead,
    W: Write,
    S: CriticalFloorSource,
{
    let mut engine = StrategyEngine::new();
    let mut session = Session::new(config, &mut source, &mut engine);
    let mut events = vec![Event::GameStarted {
        config,
        optimal_drops: query::optimal_drops(&session),
    }];

    writeln!(output, "Egg Drop Challenge")?;
    writeln!(output, "Find the highest floor where the egg survives the drop!")?;

    let mut lines = input.lines();
    loop {
        render_events(&mut output, &events)?;
        events.clear();
        render_status(&mut output, &session, &mut engine)?;
        output.flush().context("failed to flush terminal output")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read player input")?;

        let command = match parse_input(&line) {
            Ok(Input::Quit) => break,
            Ok(Input::Help) => {
                writeln!(output, "{HOW_TO_PLAY}")?;
                continue;
            }
            Ok(Input::NewGame) => Command::Reset,
            Ok(Input::SetFloors(floors)) => {
                match GameConfig::new(floors, query::config(&session).total_eggs()) {
                    Ok(config) => Command::StartGame { config },
                    Err(error) => {
                        writeln!(output, "{error}")?;
                        continue;
                    }
                }
            }
            Ok(Input::SetEggs(eggs)) => {
                match GameConfig::new(query::config(&session).total_floors(), eggs) {
                    Ok(config) => Command::StartGame { config },
                    Err(error) => {
                        writeln!(output, "{error}")?;
                        continue;
                    }
                }
            }
            Ok(Input::Drop(floor)) => Command::DropEgg { floor },
            Ok(Input::DropSuggested) => match query::suggested_floor(&session, &mut engine) {
                Some(floor) => Command::DropEgg { floor },
                None => {
                    writeln!(output, "The game is over. Type `new` to play again.")?;
                    continue;
                }
            },
            Err(error) => {
                writeln!(output, "{error}")?;
                continue;
            }
        };

        session::apply(&mut session, command, &mut source, &mut engine, &mut events);
    }

    Ok(())
}

fn render_events<W: Write>(output: &mut W, events: &[Event]) -> Result<()> {
    for event in events {
        match event {
            Event::GameStarted {
                config,
                optimal_drops,
            } => writeln!(
                output,
                "New game: {} floors, {} eggs. The optimal strategy needs {optimal_drops} drops.",
                config.total_floors(),
                config.total_eggs(),
            )?,
            Event::EggDropped { report } => match report.outcome {
                DropOutcome::Broke => writeln!(output, "Egg broke at floor {}!", report.floor)?,
                DropOutcome::Survived => writeln!(
                    output,
                    "Egg survived the drop from floor {}!",
                    report.floor
                )?,
            },
            Event::GameEnded {
                reason,
                critical_floor,
                drops_made,
            } => {
                if reason.is_win() {
                    writeln!(
                        output,
                        "Congratulations! You found the critical floor ({critical_floor}) in {drops_made} drops!"
                    )?;
                } else {
                    writeln!(
                        output,
                        "Game over! You've used all your eggs. The critical floor was {critical_floor}."
                    )?;
                }
            }
            Event::DropRejected { error, .. } => writeln!(output, "{error}")?,
        }
    }
    Ok(())
}

fn render_status<W: Write>(
    output: &mut W,
    session: &Session,
    engine: &mut StrategyEngine,
) -> Result<()> {
    let config = query::config(session);
    writeln!(
        output,
        "Floors: {} | Eggs left: {} {} | Drops made: {} | Optimal: {} drops",
        config.total_floors(),
        query::eggs_left(session),
        egg_gauge(query::eggs_fraction(session)),
        query::drops_made(session),
        query::optimal_drops(session),
    )?;

    let hint = query::hint(session);
    if hint != Hint::None {
        writeln!(output, "Ghost's hint: {hint}")?;
    }

    match (
        query::allowed_floors(session),
        query::suggested_floor(session, engine),
    ) {
        (Some(allowed), Some(suggested)) => write!(
            output,
            "Choose a floor in {}..={} [enter = {suggested}]: ",
            allowed.start(),
            allowed.end(),
        )?,
        _ => write!(output, "Type `new` to play again or `quit` to leave: ")?,
    }
    Ok(())
}

fn egg_gauge(fraction: f32) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * GAUGE_WIDTH as f32).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH - filled)
    )
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use egg_drop_core::FixedFloor;

    use super::*;

    fn play(script: &str, config: GameConfig, critical_floor: u32) -> String {
        let mut output = Vec::new();
        run(
            Cursor::new(script.to_owned()),
            &mut output,
            config,
            FixedFloor::new(critical_floor),
        )
        .expect("scripted session");
        String::from_utf8(output).expect("utf-8 output")
    }

    #[test]
    fn parses_numbers_as_drops() {
        assert_eq!(parse_input("42"), Ok(Input::Drop(42)));
        assert_eq!(parse_input("  drop 7 "), Ok(Input::Drop(7)));
        assert_eq!(parse_input(""), Ok(Input::DropSuggested));
    }

    #[test]
    fn parses_configuration_commands() {
        assert_eq!(parse_input("floors 250"), Ok(Input::SetFloors(250)));
        assert_eq!(parse_input("EGGS 3"), Ok(Input::SetEggs(3)));
        assert_eq!(parse_input("new"), Ok(Input::NewGame));
        assert_eq!(parse_input("quit"), Ok(Input::Quit));
    }

    #[test]
    fn reports_malformed_input() {
        assert_eq!(parse_input("eggs"), Err(InputError::MissingValue("eggs")));
        assert_eq!(
            parse_input("floors ten"),
            Err(InputError::InvalidNumber("ten".to_owned()))
        );
        assert_eq!(
            parse_input("jump"),
            Err(InputError::Unknown("jump".to_owned()))
        );
        assert_eq!(
            parse_input("99999999999"),
            Err(InputError::InvalidNumber("99999999999".to_owned()))
        );
    }

    #[test]
    fn gauge_scales_with_remaining_eggs() {
        assert_eq!(egg_gauge(1.0), "[##########]");
        assert_eq!(egg_gauge(0.5), "[#####-----]");
        assert_eq!(egg_gauge(0.0), "[----------]");
    }

    #[test]
    fn scripted_game_reaches_the_critical_floor() {
        let output = play("50\n75\n60\n72\n\nquit\n", GameConfig::default(), 72);

        assert!(output.contains("The optimal strategy needs 14 drops."));
        assert!(output.contains("Egg survived the drop from floor 50!"));
        assert!(output.contains("Egg broke at floor 75!"));
        assert!(output.contains("Congratulations! You found the critical floor (72) in 4 drops!"));
        assert!(output.contains("The game is over. Type `new` to play again."));
    }

    #[test]
    fn suggested_drops_follow_the_optimal_plan() {
        let output = play("\n", GameConfig::default(), 72);
        assert!(output.contains("[enter = 9]"));
        assert!(output.contains("Egg survived the drop from floor 9!"));
    }

    #[test]
    fn invalid_requests_leave_the_game_untouched() {
        let output = play("0\nfloors 5000\neggs 2\n", GameConfig::default(), 72);
        assert!(output.contains("floor 0 cannot be tested"));
        assert!(output.contains("floor count 5000 is outside the supported range"));
        assert!(output.contains("Drops made: 0"));
    }

    #[test]
    fn losing_reveals_the_critical_floor() {
        let config = GameConfig::new(10, 1).expect("valid config");
        let output = play("8\n", config, 5);
        assert!(output.contains("Game over! You've used all your eggs. The critical floor was 5."));
        assert!(output.contains("Ghost's hint: Ha! Couldn't figure it out, huh? It was floor 5 all along!"));
    }
}
