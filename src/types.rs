//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator: states, transition rules, head directions, instant descriptions, execution
//! results, and the error taxonomy.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The blank symbol used when a machine definition does not declare one.
pub const DEFAULT_BLANK_SYMBOL: &str = "B";
/// The default step ceiling used by front-ends to guard against non-halting machines.
pub const DEFAULT_MAX_STEPS: usize = 10000;

/// A named machine state.
///
/// States are plain values compared by name. They are owned by the `MachineConfig`
/// that declares them and cloned into snapshots as needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct State(String);

impl State {
    /// Creates a state, rejecting empty names.
    pub fn new(name: impl Into<String>) -> Result<Self, TuringMachineError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TuringMachineError::InvalidMachine(
                MachineViolation::EmptyStateName,
            ));
        }

        Ok(Self(name))
    }

    /// Returns the state name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for State {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl FromStr for Direction {
    type Err = TuringMachineError;

    /// Parses the short move notation used in machine documents: `L`, `R` or `S`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            "S" => Ok(Direction::Stay),
            other => Err(TuringMachineError::InvalidRule(format!(
                "invalid move '{}', expected one of L, R, S",
                other
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = match self {
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Stay => "S",
        };
        f.write_str(short)
    }
}

/// A single deterministic transition rule:
/// `(state, read) -> (write, direction, next_state)`.
///
/// Rules can only be built through [`Transition::new`], so every `Transition`
/// value in the program is structurally valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    state: String,
    read: String,
    write: String,
    direction: Direction,
    next_state: String,
}

impl Transition {
    /// Builds a rule from its five textual fields.
    ///
    /// # Returns
    ///
    /// * `Ok(Transition)` when the move is one of `L`, `R`, `S` and every other field is non-empty.
    /// * `Err(TuringMachineError::InvalidRule)` otherwise. The move is checked first.
    pub fn new(
        state: impl Into<String>,
        read: impl Into<String>,
        write: impl Into<String>,
        direction: &str,
        next_state: impl Into<String>,
    ) -> Result<Self, TuringMachineError> {
        let direction = direction.parse::<Direction>()?;
        let transition = Self {
            state: state.into(),
            read: read.into(),
            write: write.into(),
            direction,
            next_state: next_state.into(),
        };

        for (field, value) in [
            ("state", &transition.state),
            ("read", &transition.read),
            ("write", &transition.write),
            ("next_state", &transition.next_state),
        ] {
            if value.is_empty() {
                return Err(TuringMachineError::InvalidRule(format!(
                    "{} must be a non-empty string",
                    field
                )));
            }
        }

        Ok(transition)
    }

    /// The lookup key of this rule: `(source state, read symbol)`.
    pub fn signature(&self) -> (&str, &str) {
        (&self.state, &self.read)
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn read(&self) -> &str {
        &self.read
    }

    pub fn write(&self) -> &str {
        &self.write
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_state(&self) -> &str {
        &self.next_state
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) -> ({}, {}, {})",
            self.state, self.read, self.write, self.direction, self.next_state
        )
    }
}

/// An instant description: one frozen configuration of a run.
///
/// Holds the current state, every tape cell in order, and the head index.
/// The head always indexes into the tape, which is never empty during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstantDescription {
    state: String,
    cells: Vec<String>,
    head: usize,
}

impl InstantDescription {
    pub(crate) fn new(state: &str, cells: &[String], head: usize) -> Self {
        debug_assert!(!state.is_empty());
        debug_assert!(head < cells.len());

        Self {
            state: state.to_string(),
            cells: cells.to_vec(),
            head,
        }
    }

    /// Returns the state name of this configuration.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the tape cells, one symbol per cell.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Returns the tape rendered as text (cells concatenated).
    pub fn tape(&self) -> String {
        self.cells.concat()
    }

    /// Returns the cell index under the head.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> &str {
        &self.cells[self.head]
    }
}

/// Represents the outcome of a single step of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The machine applied a transition and can keep going.
    Continue,
    /// The run is over.
    Halt(Halt),
}

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Halt {
    /// The machine entered an accept state.
    Accepted,
    /// No rule matches the current state and symbol (halt by omission).
    NoTransition { state: String, symbol: String },
    /// The configured step ceiling was reached before the machine halted.
    StepLimit,
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::Accepted => write!(f, "reached an accept state"),
            Halt::NoTransition { state, symbol } => {
                write!(f, "no transition for state {} reading {}", state, symbol)
            }
            Halt::StepLimit => write!(f, "step limit reached"),
        }
    }
}

/// The result of running one input to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Execution {
    /// Every configuration in order; the first one is the initial configuration.
    pub trace: Vec<InstantDescription>,
    /// The accept/reject verdict.
    pub accepted: bool,
    /// Why the run stopped.
    pub halt: Halt,
}

impl Execution {
    /// Number of transitions applied during the run.
    pub fn steps(&self) -> usize {
        self.trace.len().saturating_sub(1)
    }
}

/// The `MachineConfig` invariant that a definition violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineViolation {
    /// The state list is empty.
    NoStates,
    /// A declared state has an empty name.
    EmptyStateName,
    /// Input symbols missing from the tape alphabet.
    AlphabetNotSubset(Vec<String>),
    /// The initial state is empty.
    EmptyInitialState,
    /// The initial state is not a declared state.
    UndeclaredInitialState(String),
    /// Accept states that are not declared states.
    UndeclaredAcceptStates(Vec<String>),
    /// The blank symbol is not part of the tape alphabet.
    BlankNotInTapeAlphabet(String),
    /// The machine has no transitions.
    NoTransitions,
}

impl fmt::Display for MachineViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineViolation::NoStates => write!(f, "at least one state must be defined"),
            MachineViolation::EmptyStateName => write!(f, "state names must be non-empty"),
            MachineViolation::AlphabetNotSubset(symbols) => write!(
                f,
                "input_alphabet must be a subset of tape_alphabet (missing {})",
                symbols.join(", ")
            ),
            MachineViolation::EmptyInitialState => write!(f, "initial_state must be non-empty"),
            MachineViolation::UndeclaredInitialState(state) => {
                write!(f, "initial_state '{}' must belong to states", state)
            }
            MachineViolation::UndeclaredAcceptStates(states) => {
                write!(f, "accept_states [{}] must belong to states", states.join(", "))
            }
            MachineViolation::BlankNotInTapeAlphabet(blank) => {
                write!(f, "blank_symbol '{}' must be part of tape_alphabet", blank)
            }
            MachineViolation::NoTransitions => write!(f, "at least one transition is required"),
        }
    }
}

/// Represents various errors that can occur while building or running a Turing Machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// A transition rule has an unknown move or an empty field.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),
    /// A machine definition violates one of its invariants.
    #[error("Invalid machine: {0}")]
    InvalidMachine(MachineViolation),
    /// Two rules share the same `(state, symbol)` signature.
    #[error("Duplicate transition for state {state} and symbol {symbol}")]
    DuplicateTransition { state: String, symbol: String },
    /// A rule references a state that is not declared.
    #[error("Transition references undefined state '{0}'")]
    DanglingState(String),
    /// An input string contains symbols outside the input alphabet.
    #[error("Input contains symbols outside the input alphabet: {}", .0.join(", "))]
    InvalidSymbol(Vec<String>),
    /// Indicates that a machine document could not be parsed.
    #[error("Program parsing error: {0}")]
    ParseError(String),
    /// Indicates a structural problem in a machine document.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to reading machine documents from disk.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(left_json, "\"Left\"");

        let right: Direction = serde_json::from_str("\"Right\"").unwrap();
        assert_eq!(right, Direction::Right);
    }

    #[test]
    fn test_direction_short_notation() {
        assert_eq!("L".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("R".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!("S".parse::<Direction>().unwrap(), Direction::Stay);
        assert!(matches!(
            "X".parse::<Direction>(),
            Err(TuringMachineError::InvalidRule(_))
        ));
        assert_eq!(Direction::Stay.to_string(), "S");
    }

    #[test]
    fn test_transition_creation() {
        let transition = Transition::new("q0", "a", "X", "R", "q1").unwrap();

        assert_eq!(transition.signature(), ("q0", "a"));
        assert_eq!(transition.write(), "X");
        assert_eq!(transition.direction(), Direction::Right);
        assert_eq!(transition.next_state(), "q1");
        assert_eq!(transition.to_string(), "(q0, a) -> (X, R, q1)");
    }

    #[test]
    fn test_transition_rejects_invalid_move() {
        let err = Transition::new("q0", "a", "X", "Up", "q1").unwrap_err();
        assert!(matches!(err, TuringMachineError::InvalidRule(msg) if msg.contains("Up")));
    }

    #[test]
    fn test_transition_rejects_empty_fields() {
        for (state, read, write, next) in [
            ("", "a", "b", "q1"),
            ("q0", "", "b", "q1"),
            ("q0", "a", "", "q1"),
            ("q0", "a", "b", ""),
        ] {
            let result = Transition::new(state, read, write, "S", next);
            assert!(matches!(result, Err(TuringMachineError::InvalidRule(_))));
        }
    }

    #[test]
    fn test_move_checked_before_fields() {
        let err = Transition::new("", "a", "b", "?", "q1").unwrap_err();
        assert!(err.to_string().contains("invalid move"));
    }

    #[test]
    fn test_state_rejects_empty_name() {
        assert_eq!(
            State::new(""),
            Err(TuringMachineError::InvalidMachine(
                MachineViolation::EmptyStateName
            ))
        );
        assert_eq!(State::new("q0").unwrap().name(), "q0");
    }

    #[test]
    fn test_instant_description_accessors() {
        let cells = vec!["a".to_string(), "bb".to_string(), "B".to_string()];
        let id = InstantDescription::new("q1", &cells, 1);

        assert_eq!(id.state(), "q1");
        assert_eq!(id.tape(), "abbB");
        assert_eq!(id.symbol(), "bb");
        assert_eq!(id.head(), 1);
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::InvalidSymbol(vec!["2".to_string(), "x".to_string()]);
        assert_eq!(
            error.to_string(),
            "Input contains symbols outside the input alphabet: 2, x"
        );

        let error = TuringMachineError::InvalidMachine(MachineViolation::UndeclaredInitialState(
            "q9".to_string(),
        ));
        assert!(error.to_string().contains("q9"));
    }

    #[test]
    fn test_execution_steps() {
        let mut execution = Execution {
            trace: Vec::new(),
            accepted: false,
            halt: Halt::StepLimit,
        };
        assert_eq!(execution.steps(), 0);

        let id = InstantDescription::new("q0", &["B".to_string()], 0);
        execution.trace = vec![id.clone(), id];
        assert_eq!(execution.steps(), 1);
    }
}
