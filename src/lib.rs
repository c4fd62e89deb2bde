//! This crate provides the core logic for a deterministic single-tape Turing Machine simulator.
//! It includes modules for defining and validating machines, loading machine documents,
//! executing runs that record every configuration, and a small set of embedded sample machines.

pub mod config;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod types;

/// Re-exports the validated machine definition and its builder.
pub use config::{MachineConfig, MachineConfigBuilder};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::{DocumentFormat, LoadedProgram, ProgramLoader};
/// Re-exports the execution engine and its per-run cursor.
pub use machine::{Run, TuringMachine};
/// Re-exports the embedded sample machine registry.
pub use programs::{NamedProgram, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Direction, Execution, Halt, InstantDescription, MachineViolation, State, Step, Transition,
    TuringMachineError, DEFAULT_BLANK_SYMBOL, DEFAULT_MAX_STEPS,
};
