//! # Coordinate protocol
//! A line-based protocol to play a game from a terminal or a script.
//!
//! Each line holds one command:
//! - `<from><to>[promotion]` plays a move, e.g. `e2e4` or `e7e8q`
//! - `promote <q|r|b|n>` completes a pending promotion
//! - `moves <square>` lists the legal destinations of a piece
//! - `undo` takes back the last move
//! - `fen` prints the position string, `load <fen>` sets one up
//! - `board`, `history`, `reset`, `help` and `quit`
//!
//! Replies are written on a single line, errors are prefixed with `error:`.

use std::io::{BufRead, Write};

use thiserror::Error;

use crate::{
    game::{
        action::MoveOutcome,
        fen::{Fen, FenParseError},
        piece::{PieceKind, PromotionTarget},
        position::{GameStatus, Position},
        square::{Square, SquareParseError},
    },
    parsing::PartialFromStr,
};

const HELP: &str = "commands: <from><to>[q|r|b|n], promote <q|r|b|n>, moves <square>, \
undo, fen, load <fen>, board, history, reset, help, quit";

/// Commands understood by the coordinate protocol.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Command {
    Play {
        origin: Square,
        target: Square,
        promotion: Option<PromotionTarget>,
    },
    Promote(PromotionTarget),
    Moves(Square),
    Undo,
    Fen,
    Load(Fen),
    Board,
    History,
    Reset,
    Help,
    Quit,
}
impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Play {
                origin,
                target,
                promotion,
            } => {
                write!(f, "{origin}{target}")?;
                match promotion {
                    Some(p) => write!(f, "{p}"),
                    None => Ok(()),
                }
            }
            Self::Promote(target) => write!(f, "promote {target}"),
            Self::Moves(square) => write!(f, "moves {square}"),
            Self::Undo => write!(f, "undo"),
            Self::Fen => write!(f, "fen"),
            Self::Load(fen) => write!(f, "load {fen}"),
            Self::Board => write!(f, "board"),
            Self::History => write!(f, "history"),
            Self::Reset => write!(f, "reset"),
            Self::Help => write!(f, "help"),
            Self::Quit => write!(f, "quit"),
        }
    }
}

/// Errors returned when a line is not a valid command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Missing argument for `{0}`")]
    MissingArgument(&'static str),
    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
    #[error("Invalid square: {0}")]
    InvalidSquare(SquareParseError),
    #[error("Cannot promote to {0}")]
    InvalidPromotion(String),
    #[error("Invalid position string: {0}")]
    InvalidFen(FenParseError),
}

impl std::str::FromStr for Command {
    type Err = CommandParseError;

    /// Parses a command from a single line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut tokens = s.split_whitespace();
        let verb = tokens.next().ok_or(CommandParseError::Empty)?;

        let command = match verb {
            "moves" => {
                let square = tokens
                    .next()
                    .ok_or(CommandParseError::MissingArgument("moves"))?;
                Command::Moves(square.parse().map_err(CommandParseError::InvalidSquare)?)
            }
            "promote" => {
                let piece = tokens
                    .next()
                    .ok_or(CommandParseError::MissingArgument("promote"))?;
                Command::Promote(parse_promotion(piece)?)
            }
            "load" => {
                let fen = s[verb.len()..].trim();
                if fen.is_empty() {
                    return Err(CommandParseError::MissingArgument("load"));
                }
                return fen
                    .parse()
                    .map(Command::Load)
                    .map_err(CommandParseError::InvalidFen);
            }
            "undo" => Command::Undo,
            "fen" => Command::Fen,
            "board" => Command::Board,
            "history" => Command::History,
            "reset" => Command::Reset,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => parse_move(verb)?,
        };

        match tokens.next() {
            Some(extra) => Err(CommandParseError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn parse_move(s: &str) -> Result<Command, CommandParseError> {
    let (origin, rest) = Square::partial_from_str(s)
        .map_err(|_| CommandParseError::UnknownCommand(s.to_string()))?;
    let (target, rest) =
        Square::partial_from_str(rest).map_err(CommandParseError::InvalidSquare)?;
    let promotion = match rest {
        "" => None,
        piece => Some(parse_promotion(piece)?),
    };
    Ok(Command::Play {
        origin,
        target,
        promotion,
    })
}

fn parse_promotion(s: &str) -> Result<PromotionTarget, CommandParseError> {
    s.parse::<PieceKind>()
        .ok()
        .and_then(PromotionTarget::from_piece_kind)
        .ok_or_else(|| CommandParseError::InvalidPromotion(s.to_string()))
}

/// Runs the protocol on standard I/O until `quit` or the end of input.
pub fn client() -> std::io::Result<()> {
    run(std::io::stdin().lock(), std::io::stdout().lock())
}

/// Reads commands from `input` and writes replies to `output`, starting from the
/// initial position.
pub fn run<R: BufRead, W: Write>(input: R, mut output: W) -> std::io::Result<()> {
    let mut position = Position::initial();

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => {
                log::info!("Received command: {command}");
                execute(&mut position, command, &mut output)?
            }
            Err(e) => {
                log::error!("Could not parse {line:?}: {e}");
                writeln!(output, "error: {e}")?
            }
        }
        output.flush()?;
    }

    Ok(())
}

fn execute<W: Write>(
    position: &mut Position,
    command: Command,
    output: &mut W,
) -> std::io::Result<()> {
    match command {
        Command::Play {
            origin,
            target,
            promotion,
        } => {
            if promotion.is_some() && !reaches_last_rank(position, origin, target) {
                return writeln!(output, "error: {origin}{target} is not a promotion");
            }
            match position.make(origin, target) {
                Ok(MoveOutcome::AwaitingPromotion) => match promotion {
                    Some(piece) => promote(position, piece, output),
                    None => writeln!(
                        output,
                        "pawn on {target} awaits promotion: promote <q|r|b|n>"
                    ),
                },
                Ok(_) => report_last_move(position, output),
                Err(e) => writeln!(output, "error: {e}"),
            }
        }
        Command::Promote(piece) => promote(position, piece, output),
        Command::Moves(square) => {
            let actions = position.actions_from(square);
            if actions.is_empty() {
                writeln!(output, "no legal moves from {square}")
            } else {
                let targets: Vec<String> =
                    actions.iter().map(|a| a.target().to_string()).collect();
                writeln!(output, "{}", targets.join(" "))
            }
        }
        Command::Undo => match position.unmake() {
            Some(entry) => writeln!(output, "undid {entry}"),
            None => writeln!(output, "error: no move to undo"),
        },
        Command::Fen => writeln!(output, "{}", position.fen()),
        Command::Load(fen) => {
            *position = Position::from_fen(&fen);
            writeln!(output, "{}", position.status())
        }
        Command::Board => writeln!(output, "{position}"),
        Command::History => {
            for (i, pair) in position.history().chunks(2).enumerate() {
                write!(output, "{}.", i + 1)?;
                for entry in pair {
                    write!(output, " {entry}")?;
                }
                writeln!(output)?;
            }
            Ok(())
        }
        Command::Reset => {
            position.reset();
            writeln!(output, "{}", position.status())
        }
        Command::Help => writeln!(output, "{HELP}"),
        Command::Quit => Ok(()),
    }
}

fn reaches_last_rank(position: &Position, origin: Square, target: Square) -> bool {
    position.piece_on(origin).is_some_and(|piece| {
        piece.kind == PieceKind::Pawn && target.row() == piece.colour.promotion_row()
    })
}

fn promote<W: Write>(
    position: &mut Position,
    piece: PromotionTarget,
    output: &mut W,
) -> std::io::Result<()> {
    let Some(square) = position.pending_promotion() else {
        return writeln!(output, "error: no promotion is pending");
    };
    match position.promote(square, piece.into()) {
        Ok(()) => report_last_move(position, output),
        Err(e) => writeln!(output, "error: {e}"),
    }
}

fn report_last_move<W: Write>(position: &Position, output: &mut W) -> std::io::Result<()> {
    if let Some(entry) = position.history().last() {
        write!(output, "{entry}")?;
    }
    match position.status() {
        GameStatus::Playing => writeln!(output),
        GameStatus::Checkmate => writeln!(
            output,
            " checkmate, {} wins",
            position.side_to_move().inverse()
        ),
        status => writeln!(output, " {status}"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn session(input: &str) -> String {
        let mut output = Vec::new();
        run(input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn parse_commands() {
        assert_eq!(
            "e2e4".parse(),
            Ok(Command::Play {
                origin: sq("e2"),
                target: sq("e4"),
                promotion: None
            })
        );
        assert_eq!(
            "  e7e8q ".parse(),
            Ok(Command::Play {
                origin: sq("e7"),
                target: sq("e8"),
                promotion: Some(PromotionTarget::Queen)
            })
        );
        assert_eq!("moves e2".parse(), Ok(Command::Moves(sq("e2"))));
        assert_eq!(
            "promote N".parse(),
            Ok(Command::Promote(PromotionTarget::Knight))
        );
        assert_eq!("undo".parse(), Ok(Command::Undo));
        assert_eq!("exit".parse(), Ok(Command::Quit));
        assert!(matches!(
            "load 4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Command>(),
            Ok(Command::Load(_))
        ));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandParseError::Empty));
        assert_eq!(
            "hello".parse::<Command>(),
            Err(CommandParseError::UnknownCommand("hello".to_string()))
        );
        assert_eq!(
            "moves".parse::<Command>(),
            Err(CommandParseError::MissingArgument("moves"))
        );
        assert_eq!(
            "undo now".parse::<Command>(),
            Err(CommandParseError::UnexpectedArgument("now".to_string()))
        );
        assert_eq!(
            "e2e9".parse::<Command>(),
            Err(CommandParseError::InvalidSquare(
                SquareParseError::InvalidRank('9')
            ))
        );
        assert_eq!(
            "e7e8k".parse::<Command>(),
            Err(CommandParseError::InvalidPromotion("k".to_string()))
        );
        assert_eq!(
            "load 8/8 w".parse::<Command>(),
            Err(CommandParseError::InvalidFen(FenParseError::IncompleteRank {
                rank: 6,
                undefined: 8
            }))
        );
    }

    #[test]
    fn command_display() {
        for command in ["e2e4", "e7e8q", "promote r", "moves g1", "undo", "board"] {
            assert_eq!(command.parse::<Command>().unwrap().to_string(), command);
        }
    }

    #[test]
    fn plays_and_reports_position() {
        assert_eq!(
            session("e2e4\n\ne7e5\nfen\nquit\nundo\n"),
            "e4\ne5\nrnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2\n"
        );
    }

    #[test]
    fn reports_errors_and_keeps_going() {
        let output = session("e2e5\nfoo\nundo\ne2e4\nundo\nmoves g1\n");
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            [
                "error: e2e5 is not a legal move",
                "error: Unknown command: foo",
                "error: no move to undo",
                "e4",
                "undid e4",
                "f3 h3",
            ]
        );
    }

    #[test]
    fn fools_mate_session() {
        let output = session("f2f3\ne7e5\ng2g4\nd8h4\n");
        assert_eq!(output.lines().last(), Some("Qh4 checkmate, Black wins"));
    }

    #[test]
    fn promotion_session() {
        let output = session(
            "load 4k3/P7/8/8/8/8/8/4K3 w - - 0 1\na7a8\ne1e2\npromote k\npromote q\nhistory\n",
        );
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            [
                "playing",
                "pawn on a8 awaits promotion: promote <q|r|b|n>",
                "error: The pawn on a8 must be promoted first",
                "error: Cannot promote to k",
                "a8=Q check",
                "1. a8=Q",
            ]
        );
    }

    #[test]
    fn promotion_suffix_only_on_last_rank() {
        let output = session("e2e4q\ne2e4\n");
        assert_eq!(output, "error: e2e4 is not a promotion\ne4\n");
    }
}
