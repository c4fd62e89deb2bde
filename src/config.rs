//! This module defines `MachineConfig`, the validated and immutable description of a
//! single-tape Turing Machine: its states, alphabets, initial and accept states, blank
//! symbol, transition rules, and the optional batch of inputs to run.

use crate::types::{MachineViolation, State, Transition, TuringMachineError, DEFAULT_BLANK_SYMBOL};
use std::collections::HashSet;

/// A validated machine definition.
///
/// A `MachineConfig` can only be obtained through [`MachineConfig::new`] (or
/// [`MachineConfigBuilder`]), which checks every invariant up front. Once built it is
/// never mutated, so the invariants are never re-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineConfig {
    states: Vec<State>,
    input_alphabet: Vec<String>,
    tape_alphabet: Vec<String>,
    initial_state: State,
    accept_states: Vec<State>,
    blank: String,
    transitions: Vec<Transition>,
    inputs: Option<Vec<String>>,
}

impl MachineConfig {
    /// Builds a definition from raw collections.
    ///
    /// Checks run in a fixed order and the first violation is returned:
    ///
    /// 1. the state list is non-empty and every name is non-empty;
    /// 2. the input alphabet is a subset of the tape alphabet;
    /// 3. the initial state is non-empty and declared;
    /// 4. every accept state is declared;
    /// 5. the blank symbol belongs to the tape alphabet;
    /// 6. there is at least one transition.
    ///
    /// Transitions are structurally valid by construction (see [`Transition::new`]).
    /// `blank` defaults to [`DEFAULT_BLANK_SYMBOL`].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        states: Vec<String>,
        input_alphabet: Vec<String>,
        tape_alphabet: Vec<String>,
        initial_state: String,
        accept_states: Vec<String>,
        transitions: Vec<Transition>,
        blank: Option<String>,
        inputs: Option<Vec<String>>,
    ) -> Result<Self, TuringMachineError> {
        let invalid = |violation| Err(TuringMachineError::InvalidMachine(violation));

        if states.is_empty() {
            return invalid(MachineViolation::NoStates);
        }
        let states = states
            .into_iter()
            .map(State::new)
            .collect::<Result<Vec<_>, _>>()?;
        let declared: HashSet<&str> = states.iter().map(State::name).collect();

        let tape_symbols: HashSet<&str> = tape_alphabet.iter().map(String::as_str).collect();
        let missing: Vec<String> = input_alphabet
            .iter()
            .filter(|symbol| !tape_symbols.contains(symbol.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return invalid(MachineViolation::AlphabetNotSubset(missing));
        }

        if initial_state.is_empty() {
            return invalid(MachineViolation::EmptyInitialState);
        }
        if !declared.contains(initial_state.as_str()) {
            return invalid(MachineViolation::UndeclaredInitialState(initial_state));
        }

        let undeclared: Vec<String> = accept_states
            .iter()
            .filter(|state| !declared.contains(state.as_str()))
            .cloned()
            .collect();
        if !undeclared.is_empty() {
            return invalid(MachineViolation::UndeclaredAcceptStates(undeclared));
        }

        let blank = blank.unwrap_or_else(|| DEFAULT_BLANK_SYMBOL.to_string());
        if !tape_symbols.contains(blank.as_str()) {
            return invalid(MachineViolation::BlankNotInTapeAlphabet(blank));
        }

        if transitions.is_empty() {
            return invalid(MachineViolation::NoTransitions);
        }

        // Names are known to be declared (hence non-empty) at this point.
        let initial_state = State::new(initial_state)?;
        let accept_states = accept_states
            .into_iter()
            .map(State::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            states,
            input_alphabet,
            tape_alphabet,
            initial_state,
            accept_states,
            blank,
            transitions,
            inputs,
        })
    }

    /// Starts a builder; convenient for tests and programmatic definitions.
    pub fn builder() -> MachineConfigBuilder {
        MachineConfigBuilder::default()
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn input_alphabet(&self) -> &[String] {
        &self.input_alphabet
    }

    pub fn tape_alphabet(&self) -> &[String] {
        &self.tape_alphabet
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn accept_states(&self) -> &[State] {
        &self.accept_states
    }

    /// Returns the blank symbol written into freshly created tape cells.
    pub fn blank(&self) -> &str {
        &self.blank
    }

    /// Returns the rules in declaration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns the batch inputs declared alongside the machine, if any.
    pub fn inputs(&self) -> Option<&[String]> {
        self.inputs.as_deref()
    }

    /// Checks whether `name` is a declared state.
    pub fn has_state(&self, name: &str) -> bool {
        self.states.iter().any(|state| state.name() == name)
    }
}

/// Collects the raw parts of a [`MachineConfig`] before validation.
#[derive(Debug, Default, Clone)]
pub struct MachineConfigBuilder {
    states: Vec<String>,
    input_alphabet: Vec<String>,
    tape_alphabet: Vec<String>,
    initial_state: String,
    accept_states: Vec<String>,
    transitions: Vec<Transition>,
    blank: Option<String>,
    inputs: Option<Vec<String>>,
}

fn owned<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl MachineConfigBuilder {
    pub fn states<I: IntoIterator<Item = S>, S: Into<String>>(mut self, states: I) -> Self {
        self.states = owned(states);
        self
    }

    pub fn input_alphabet<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        symbols: I,
    ) -> Self {
        self.input_alphabet = owned(symbols);
        self
    }

    pub fn tape_alphabet<I: IntoIterator<Item = S>, S: Into<String>>(mut self, symbols: I) -> Self {
        self.tape_alphabet = owned(symbols);
        self
    }

    pub fn initial_state(mut self, state: impl Into<String>) -> Self {
        self.initial_state = state.into();
        self
    }

    pub fn accept_states<I: IntoIterator<Item = S>, S: Into<String>>(mut self, states: I) -> Self {
        self.accept_states = owned(states);
        self
    }

    pub fn blank(mut self, blank: impl Into<String>) -> Self {
        self.blank = Some(blank.into());
        self
    }

    pub fn inputs<I: IntoIterator<Item = S>, S: Into<String>>(mut self, inputs: I) -> Self {
        self.inputs = Some(owned(inputs));
        self
    }

    /// Adds an already validated rule.
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Adds a rule from its textual fields, failing on an invalid rule.
    pub fn rule(
        self,
        state: &str,
        read: &str,
        write: &str,
        direction: &str,
        next_state: &str,
    ) -> Result<Self, TuringMachineError> {
        let transition = Transition::new(state, read, write, direction, next_state)?;
        Ok(self.transition(transition))
    }

    /// Validates the collected parts.
    pub fn build(self) -> Result<MachineConfig, TuringMachineError> {
        MachineConfig::new(
            self.states,
            self.input_alphabet,
            self.tape_alphabet,
            self.initial_state,
            self.accept_states,
            self.transitions,
            self.blank,
            self.inputs,
        )
    }
}
