//! Play command - drive the built-in skirmish from a command script
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), read_script(), play_script()
//! - Level 3: execute() - one command against the board

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use panzer_core::{Board, GameConfig, GameError, Rules, Side};

use crate::render::{render_map, render_units};
use crate::scenario;
use crate::script::{parse_script, Command};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Command script (reads stdin when omitted)
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Game configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed for combat rolls (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the map after every command
    #[arg(long)]
    pub show_map: bool,
}

/// What a command did, as printed to the user
struct Report {
    text: String,
    winner: Option<Side>,
}

impl Report {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), winner: None }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.seed)?;
    let mut board = scenario::skirmish(config)?;
    tracing::info!("Scenario: {} - {}", board.name(), board.description());
    board.log_summary();

    let source = read_script(args.script.as_deref())?;
    let commands = parse_script(&source)?;
    tracing::info!("Running {} commands", commands.len());

    let winner = play_script(&mut board, &commands, args.show_map);

    println!("{}", render_map(&board));
    match winner {
        Some(side) => println!("{} win on turn {}", side.name(), board.turn()),
        None => println!("No winner after turn {}", board.turn()),
    }
    board.log_summary();
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::load(path).with_context(|| format!("Failed to load config {:?}", path))?,
        None => GameConfig::default(),
    };
    if seed.is_some() {
        config.rules.seed = seed;
    }
    Ok(config)
}

fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read script {:?}", path)),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read script from stdin")?;
            Ok(source)
        }
    }
}

/// Run commands until the script ends or a side wins. Rejected commands
/// are reported and skipped.
fn play_script<R: Rules>(board: &mut Board<R>, commands: &[(usize, Command)], show_map: bool) -> Option<Side> {
    for (line, command) in commands {
        match execute(board, command) {
            Ok(report) => {
                println!("{:>4}: {}", line, report.text);
                if show_map {
                    println!("{}", render_map(board));
                }
                if report.winner.is_some() {
                    return report.winner;
                }
            }
            Err(e) => {
                tracing::warn!("Line {}: {:?} rejected: {}", line, command, e);
                println!("{:>4}: rejected: {}", line, e);
            }
        }
    }
    None
}

// ============================================================================
// LEVEL 3 - COMMANDS
// ============================================================================

fn current_player_id<R: Rules>(board: &Board<R>) -> Result<u8, GameError> {
    board.current_player().map(|p| p.id).ok_or(GameError::PlayerNotFound(0))
}

fn execute<R: Rules>(board: &mut Board<R>, command: &Command) -> Result<Report, GameError> {
    let report = match *command {
        Command::Select(id) => {
            board.select_unit(id)?;
            let moves = board.move_range().iter().filter(|rc| rc.can_move).count();
            Report::new(format!("selected {} ({} destinations, {} targets)", id, moves, board.attack_targets().len()))
        }
        Command::Move { unit, to } => {
            let result = board.move_unit(unit, to)?;
            let mut text = format!(
                "{} moved to {}",
                unit,
                result.destination().map_or_else(|| "-".to_string(), |c| c.to_string())
            );
            if let Some(cell) = result.surprise_cell {
                text.push_str(&format!(", surprised at {}", cell));
            }
            if board.can_undo_move(unit) {
                text.push_str(" (undo available)");
            }
            Report { text, winner: result.victory_side }
        }
        Command::Attack { attacker, defender, support } => {
            let result = board.attack_unit(attacker, defender, support)?;
            Report::new(format!(
                "{} {} {}: kills {} losses {}",
                attacker,
                if support { "supports against" } else { "attacks" },
                defender,
                result.kills,
                result.losses
            ))
        }
        Command::Resupply(id) => {
            let supply = board.resupply_unit(id)?;
            Report::new(format!("{} resupplied ammo +{} fuel +{}", id, supply.ammo, supply.fuel))
        }
        Command::Reinforce(id) => {
            board.reinforce_unit(id)?;
            let strength = board.unit(id).map_or(0, |u| u.strength);
            Report::new(format!("{} reinforced to strength {}", id, strength))
        }
        Command::Mount(id) => {
            board.mount_unit(id)?;
            Report::new(format!("{} mounted", id))
        }
        Command::Unmount(id) => {
            board.unmount_unit(id)?;
            Report::new(format!("{} dismounted", id))
        }
        Command::Upgrade { unit, equipment, transport } => {
            board.upgrade_unit(unit, equipment, transport)?;
            let name = board.unit(unit).map_or("?", |u| u.equipment().name);
            Report::new(format!("{} upgraded to {}", unit, name))
        }
        Command::Buy { equipment, transport } => {
            let player = current_player_id(board)?;
            board.buy_unit(player, equipment, transport)?;
            let prestige = board.player(player).map_or(0, |p| p.prestige);
            Report::new(format!("player {} bought {} ({} prestige left)", player, equipment, prestige))
        }
        Command::Deploy { index, to } => {
            let player = current_player_id(board)?;
            let id = board.deploy_player_unit(player, index, to)?;
            Report::new(format!("player {} deployed {} at {}", player, id, to))
        }
        Command::Undo => {
            if board.undo_last_move() {
                Report::new("last move undone")
            } else {
                Report::new("nothing to undo")
            }
        }
        Command::EndTurn => {
            board.end_turn();
            let next = board.current_player().map_or(0, |p| p.id);
            Report::new(format!("turn {}, player {} to move", board.turn(), next))
        }
        Command::Map => Report::new(format!("\n{}", render_map(board))),
        Command::Units => Report::new(format!("\n{}", render_units(board))),
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_line;
    use panzer_core::{Cell, RulesConfig, UnitId};

    fn board() -> Board {
        let config = GameConfig {
            rules: RulesConfig::deterministic(),
            ..Default::default()
        };
        scenario::skirmish(config).unwrap()
    }

    fn run_line(board: &mut Board, line: &str) -> Result<Report, GameError> {
        let command = parse_line(line).unwrap().unwrap();
        execute(board, &command)
    }

    #[test]
    fn test_select_and_move() {
        let mut board = board();
        run_line(&mut board, "select 1").unwrap();
        let report = run_line(&mut board, "move 1 2 4").unwrap();
        assert!(report.text.contains("moved to (2,4)"));
        assert_eq!(board.unit(UnitId(1)).unwrap().hex(), Some(Cell::new(2, 4)));
    }

    #[test]
    fn test_rejected_command_reports_error() {
        let mut board = board();
        let err = run_line(&mut board, "select 6").map(|_| ()).unwrap_err();
        assert!(matches!(err, GameError::NotYourUnit { .. }));
    }

    #[test]
    fn test_buy_and_deploy_for_current_player() {
        let mut board = board();
        run_line(&mut board, "buy 5").unwrap();
        let report = run_line(&mut board, "deploy 0 0 0").unwrap();
        assert!(report.text.contains("deployed #11"));
        assert_eq!(board.unit(UnitId(11)).unwrap().owner, scenario::AXIS);
    }

    #[test]
    fn test_end_turn_report() {
        let mut board = board();
        let report = run_line(&mut board, "end").unwrap();
        assert_eq!(report.text, "turn 1, player 1 to move");
    }

    #[test]
    fn test_play_script_skips_rejections() {
        let mut board = board();
        let commands = parse_script("select 6\nselect 2\nend\n").unwrap();
        assert_eq!(play_script(&mut board, &commands, false), None);
        assert_eq!(board.current_player().map(|p| p.id), Some(scenario::ALLIES));
    }

    #[test]
    fn test_seed_overrides_config() {
        let config = load_config(None, Some(42)).unwrap();
        assert_eq!(config.rules.seed, Some(42));
        assert_eq!(load_config(None, None).unwrap().rules.seed, None);
    }
}
