//! Command scripts for the `play` command
//!
//! One command per line, arguments separated by whitespace. `#` starts a
//! comment. Units are referred to by their numeric id, cells by row and
//! column.

use std::str::FromStr;

use anyhow::{bail, Context, Result};

use panzer_core::{Cell, EquipmentId, UnitId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Select(UnitId),
    Move { unit: UnitId, to: Cell },
    Attack { attacker: UnitId, defender: UnitId, support: bool },
    Resupply(UnitId),
    Reinforce(UnitId),
    Mount(UnitId),
    Unmount(UnitId),
    Upgrade { unit: UnitId, equipment: EquipmentId, transport: Option<EquipmentId> },
    /// Purchase for the current player
    Buy { equipment: EquipmentId, transport: Option<EquipmentId> },
    /// Deploy an entry of the current player's deployment list
    Deploy { index: usize, to: Cell },
    Undo,
    EndTurn,
    Map,
    Units,
}

/// Parse a whole script into (line number, command) pairs
pub fn parse_script(source: &str) -> Result<Vec<(usize, Command)>> {
    let mut commands = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let parsed = parse_line(line).with_context(|| format!("Script line {}: {:?}", i + 1, line.trim()))?;
        if let Some(command) = parsed {
            commands.push((i + 1, command));
        }
    }
    Ok(commands)
}

/// Parse one line. Blank and comment-only lines give `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let content = match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    };
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let Some((&name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "select" => {
            expect_args(args, 1, 1)?;
            Command::Select(unit(args, 0)?)
        }
        "move" => {
            expect_args(args, 3, 3)?;
            Command::Move { unit: unit(args, 0)?, to: cell(args, 1)? }
        }
        "attack" | "support" => {
            expect_args(args, 2, 2)?;
            Command::Attack {
                attacker: unit(args, 0)?,
                defender: unit(args, 1)?,
                support: name.eq_ignore_ascii_case("support"),
            }
        }
        "resupply" => {
            expect_args(args, 1, 1)?;
            Command::Resupply(unit(args, 0)?)
        }
        "reinforce" => {
            expect_args(args, 1, 1)?;
            Command::Reinforce(unit(args, 0)?)
        }
        "mount" => {
            expect_args(args, 1, 1)?;
            Command::Mount(unit(args, 0)?)
        }
        "unmount" => {
            expect_args(args, 1, 1)?;
            Command::Unmount(unit(args, 0)?)
        }
        "upgrade" => {
            expect_args(args, 2, 3)?;
            Command::Upgrade {
                unit: unit(args, 0)?,
                equipment: number(args, 1, "equipment id")?,
                transport: optional(args, 2, "transport id")?,
            }
        }
        "buy" => {
            expect_args(args, 1, 2)?;
            Command::Buy {
                equipment: number(args, 0, "equipment id")?,
                transport: optional(args, 1, "transport id")?,
            }
        }
        "deploy" => {
            expect_args(args, 3, 3)?;
            Command::Deploy { index: number(args, 0, "deployment index")?, to: cell(args, 1)? }
        }
        "undo" => {
            expect_args(args, 0, 0)?;
            Command::Undo
        }
        "end" => {
            expect_args(args, 0, 0)?;
            Command::EndTurn
        }
        "map" => Command::Map,
        "units" => Command::Units,
        other => bail!("Unknown command '{}'", other),
    };
    Ok(Some(command))
}

// ============================================================================
// ARGUMENT HELPERS
// ============================================================================

fn expect_args(args: &[&str], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        if min == max {
            bail!("Expected {} argument(s), got {}", min, args.len());
        }
        bail!("Expected {} to {} arguments, got {}", min, max, args.len());
    }
    Ok(())
}

fn number<T>(args: &[&str], index: usize, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args.get(index).with_context(|| format!("Missing {}", what))?;
    raw.parse().with_context(|| format!("Invalid {} '{}'", what, raw))
}

fn optional<T>(args: &[&str], index: usize, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if index < args.len() {
        number(args, index, what).map(Some)
    } else {
        Ok(None)
    }
}

fn unit(args: &[&str], index: usize) -> Result<UnitId> {
    number(args, index, "unit id").map(UnitId)
}

fn cell(args: &[&str], index: usize) -> Result<Cell> {
    Ok(Cell::new(number(args, index, "row")?, number(args, index + 1, "column")?))
}
