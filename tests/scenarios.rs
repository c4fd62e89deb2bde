//! End-to-end runs: machine document -> engine -> trace and verdict.

use turing_sim::{Halt, ProgramLoader, TuringMachine, TuringMachineError};

fn document(initial: &str, accept: &str, transitions: &str) -> String {
    format!(
        r#"{{
            "mt": {{
                "states": ["q0", "q1", "qa"],
                "input_alphabet": ["0", "1"],
                "tape_alphabet": ["0", "1", "B"],
                "initial_state": "{initial}",
                "accept_states": ["{accept}"],
                "transitions": [{transitions}]
            }}
        }}"#
    )
}

const FIRST_ONE: &str = r#"
    { "state": "q0", "read": "0", "write": "0", "move": "R", "next": "q0" },
    { "state": "q0", "read": "1", "write": "1", "move": "R", "next": "qa" }"#;

fn engine(content: &str, max_steps: Option<usize>) -> Result<TuringMachine, TuringMachineError> {
    let program = ProgramLoader::load_program_from_string(content)?;
    TuringMachine::new(program.config, max_steps)
}

#[test]
fn accepts_after_reading_a_one() {
    let machine = engine(&document("q0", "qa", FIRST_ONE), None).unwrap();
    let execution = machine.run("01").unwrap();

    let states: Vec<&str> = execution.trace.iter().map(|id| id.state()).collect();
    assert_eq!(states, vec!["q0", "q0", "qa"]);
    assert!(execution.accepted);
}

#[test]
fn empty_input_rejects_by_omission() {
    let machine = engine(&document("q0", "qa", FIRST_ONE), None).unwrap();
    let execution = machine.run("").unwrap();

    assert_eq!(execution.trace.len(), 1);
    assert_eq!(execution.trace[0].tape(), "B");
    assert!(!execution.accepted);
}

#[test]
fn accepting_initial_state_halts_immediately() {
    let machine = engine(&document("qa", "qa", FIRST_ONE), None).unwrap();

    for input in ["", "0", "0110"] {
        let execution = machine.run(input).unwrap();
        assert_eq!(execution.trace.len(), 1);
        assert!(execution.accepted);
    }
    assert!(matches!(
        machine.run("012"),
        Err(TuringMachineError::InvalidSymbol(_))
    ));
}

#[test]
fn duplicate_signature_fails_construction() {
    let transitions = r#"
        { "state": "q0", "read": "0", "write": "0", "move": "R", "next": "q0" },
        { "state": "q0", "read": "0", "write": "1", "move": "R", "next": "q1" }"#;

    assert_eq!(
        engine(&document("q0", "qa", transitions), None).unwrap_err(),
        TuringMachineError::DuplicateTransition {
            state: "q0".to_string(),
            symbol: "0".to_string()
        }
    );
}

#[test]
fn invalid_symbol_leaves_engine_usable() {
    let machine = engine(&document("q0", "qa", FIRST_ONE), None).unwrap();

    assert_eq!(
        machine.run("2"),
        Err(TuringMachineError::InvalidSymbol(vec!["2".to_string()]))
    );
    assert!(machine.run("1").unwrap().accepted);
}

#[test]
fn step_ceiling_stops_an_endless_machine() {
    let transitions = r#"
        { "state": "q0", "read": ["0", "1", "B"], "write": ["0", "1", "B"],
          "move": "R", "next": "q0" }"#;
    let machine = engine(&document("q0", "qa", transitions), Some(3)).unwrap();
    let execution = machine.run("0").unwrap();

    assert_eq!(execution.trace.len(), 4);
    assert_eq!(execution.halt, Halt::StepLimit);
    assert!(!execution.accepted);
}

#[test]
fn dangling_destination_fails_construction() {
    let transitions = r#"
        { "state": "q0", "read": "0", "write": "0", "move": "R", "next": "q9" }"#;

    assert_eq!(
        engine(&document("q0", "qa", transitions), None).unwrap_err(),
        TuringMachineError::DanglingState("q9".to_string())
    );
}
