//! This module defines the `TuringMachine` execution engine for deterministic single-tape
//! machines. The engine precomputes a `(state, symbol)` lookup table from a validated
//! `MachineConfig` and drives independent runs over input strings, recording every
//! configuration along the way.

use crate::config::MachineConfig;
use crate::types::{
    Direction, Execution, Halt, InstantDescription, State, Step, Transition, TuringMachineError,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, trace};

/// A deterministic single-tape Turing Machine.
///
/// The engine owns its definition and a lookup table built once at construction.
/// Nothing in it changes afterwards: each call to [`TuringMachine::run`] or
/// [`TuringMachine::start`] allocates its own tape and trace, so a single engine
/// can serve any number of runs, including concurrent ones.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    config: MachineConfig,
    rules: HashMap<State, HashMap<String, Transition>>,
    accept_states: HashSet<State>,
    input_symbols: HashSet<char>,
    max_steps: Option<usize>,
}

impl TuringMachine {
    /// Creates an engine from a validated `MachineConfig`.
    ///
    /// # Arguments
    ///
    /// * `config` - The machine definition.
    /// * `max_steps` - Optional step ceiling. `None` runs until the machine halts.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::DuplicateTransition)` if two rules share a signature.
    /// * `Err(TuringMachineError::DanglingState)` if a rule references an undeclared state.
    pub fn new(
        config: MachineConfig,
        max_steps: Option<usize>,
    ) -> Result<Self, TuringMachineError> {
        let rules = build_rules(&config)?;
        let accept_states = config.accept_states().iter().cloned().collect();
        // Input alphabet entries that are not single characters can never match
        // a character of an input string.
        let input_symbols = config
            .input_alphabet()
            .iter()
            .filter_map(|symbol| single_char(symbol))
            .collect();

        debug!(
            states = config.states().len(),
            rules = config.transitions().len(),
            max_steps = ?max_steps,
            "built transition table"
        );

        Ok(Self {
            config,
            rules,
            accept_states,
            input_symbols,
            max_steps,
        })
    }

    /// Returns the definition this engine was built from.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Returns the configured step ceiling.
    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    /// Finds the rule for `state` reading `symbol`, if any.
    pub fn transition(&self, state: &str, symbol: &str) -> Option<&Transition> {
        self.rules.get(state)?.get(symbol)
    }

    /// Checks whether `state` is an accept state.
    pub fn is_accepting(&self, state: &str) -> bool {
        self.accept_states.contains(state)
    }

    /// Validates `input` and returns a fresh run positioned at the initial configuration.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::InvalidSymbol)` listing the offending characters,
    ///   deduplicated and sorted, if `input` uses symbols outside the input alphabet.
    pub fn start(&self, input: &str) -> Result<Run<'_>, TuringMachineError> {
        self.validate_input(input)?;
        Ok(Run::new(self, input))
    }

    /// Runs `input` to completion (or to the step ceiling).
    ///
    /// The returned trace always starts with the initial configuration and holds one
    /// more snapshot than the number of steps executed.
    pub fn run(&self, input: &str) -> Result<Execution, TuringMachineError> {
        let mut run = self.start(input)?;

        let halt = loop {
            if let Step::Halt(halt) = run.step() {
                break halt;
            }
        };

        debug!(input, steps = run.steps(), halt = %halt, "run finished");

        Ok(run.finish(halt))
    }

    /// Runs every input independently, in order.
    pub fn run_all<I, S>(&self, inputs: I) -> Vec<Result<Execution, TuringMachineError>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        inputs
            .into_iter()
            .map(|input| self.run(input.as_ref()))
            .collect()
    }

    fn validate_input(&self, input: &str) -> Result<(), TuringMachineError> {
        let invalid: BTreeSet<char> = input
            .chars()
            .filter(|c| !self.input_symbols.contains(c))
            .collect();

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(TuringMachineError::InvalidSymbol(
                invalid.into_iter().map(String::from).collect(),
            ))
        }
    }
}

/// Builds the `(state, symbol) -> Transition` table, rejecting duplicates and
/// rules that reference undeclared states. Rules are checked in declaration order.
fn build_rules(
    config: &MachineConfig,
) -> Result<HashMap<State, HashMap<String, Transition>>, TuringMachineError> {
    let mut rules: HashMap<State, HashMap<String, Transition>> = HashMap::new();

    for transition in config.transitions() {
        let (state, symbol) = transition.signature();

        if rules
            .get(state)
            .is_some_and(|by_symbol| by_symbol.contains_key(symbol))
        {
            return Err(TuringMachineError::DuplicateTransition {
                state: state.to_string(),
                symbol: symbol.to_string(),
            });
        }

        for referenced in [state, transition.next_state()] {
            if !config.has_state(referenced) {
                return Err(TuringMachineError::DanglingState(referenced.to_string()));
            }
        }

        rules
            .entry(State::new(state)?)
            .or_default()
            .insert(symbol.to_string(), transition.clone());
    }

    Ok(rules)
}

fn single_char(symbol: &str) -> Option<char> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// A single in-progress run of a [`TuringMachine`].
///
/// A run exclusively owns its tape, head, current state, and trace. The tape is a
/// finite, left-anchored vector that grows by one blank cell whenever the head
/// steps past either end.
#[derive(Debug, Clone)]
pub struct Run<'m> {
    machine: &'m TuringMachine,
    tape: Vec<String>,
    head: usize,
    state: &'m str,
    steps: usize,
    trace: Vec<InstantDescription>,
    halted: Option<Halt>,
}

impl<'m> Run<'m> {
    fn new(machine: &'m TuringMachine, input: &str) -> Self {
        let blank = machine.config.blank();
        let tape: Vec<String> = if input.is_empty() {
            vec![blank.to_string()]
        } else {
            input.chars().map(String::from).collect()
        };
        let state = machine.config.initial_state().name();
        let trace = vec![InstantDescription::new(state, &tape, 0)];

        Self {
            machine,
            tape,
            head: 0,
            state,
            steps: 0,
            trace,
            halted: None,
        }
    }

    /// Executes a single step.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied and the machine is not in an accept state.
    /// * `Step::Halt(Halt::Accepted)` if the current (or initial) state is accepting.
    /// * `Step::Halt(Halt::NoTransition { .. })` if no rule matches; no snapshot is added.
    /// * `Step::Halt(Halt::StepLimit)` if the step ceiling was reached.
    ///
    /// Once halted, every further call returns the same halt.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = &self.halted {
            return Step::Halt(halt.clone());
        }
        let machine = self.machine;

        // Covers an accepting initial state: halt before any step runs.
        if machine.is_accepting(self.state) {
            return self.halt(Halt::Accepted);
        }

        if machine
            .max_steps
            .is_some_and(|max_steps| self.steps >= max_steps)
        {
            return self.halt(Halt::StepLimit);
        }

        let symbol = &self.tape[self.head];
        let Some(transition) = machine.transition(self.state, symbol) else {
            let halt = Halt::NoTransition {
                state: self.state.to_string(),
                symbol: symbol.clone(),
            };
            return self.halt(halt);
        };

        trace!(step = self.steps + 1, rule = %transition, head = self.head, "applying transition");

        self.tape[self.head] = transition.write().to_string();
        self.state = transition.next_state();
        self.move_head(transition.direction());
        self.steps += 1;
        self.trace
            .push(InstantDescription::new(self.state, &self.tape, self.head));

        if machine.is_accepting(self.state) {
            return self.halt(Halt::Accepted);
        }

        Step::Continue
    }

    /// Moves the head, growing the tape by one blank cell when it steps past either end.
    /// Moving left off cell 0 inserts the blank at the front and keeps the head at 0.
    fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.head == 0 {
                    self.tape.insert(0, self.machine.config.blank().to_string());
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head == self.tape.len() {
                    self.tape.push(self.machine.config.blank().to_string());
                }
            }
            Direction::Stay => {}
        }
    }

    fn halt(&mut self, halt: Halt) -> Step {
        self.halted = Some(halt.clone());
        Step::Halt(halt)
    }

    /// Returns the current state name.
    pub fn state(&self) -> &str {
        self.state
    }

    /// Returns the current tape cells.
    pub fn tape(&self) -> &[String] {
        &self.tape
    }

    /// Returns the current head index.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the number of transitions applied so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the snapshots recorded so far.
    pub fn trace(&self) -> &[InstantDescription] {
        &self.trace
    }

    /// Returns how the run halted, if it has.
    pub fn halted(&self) -> Option<&Halt> {
        self.halted.as_ref()
    }

    fn finish(self, halt: Halt) -> Execution {
        // At the ceiling the verdict is whatever the current state happens to be.
        let accepted = match halt {
            Halt::Accepted => true,
            Halt::NoTransition { .. } => false,
            Halt::StepLimit => self.machine.is_accepting(self.state),
        };

        Execution {
            trace: self.trace,
            accepted,
            halt,
        }
    }
}
