//! Sample machines embedded at compile time, parsed on first use into a shared registry.

use crate::config::MachineConfig;
use crate::loader::ProgramLoader;
use crate::types::TuringMachineError;

use std::sync::RwLock;
use tracing::warn;

// Default embedded programs
const PROGRAM_TEXTS: [&str; 3] = [
    include_str!("../machines/first-one.json"),
    include_str!("../machines/even-zeros.json"),
    include_str!("../machines/anbn.json"),
];

/// An embedded machine and its display name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedProgram {
    pub name: String,
    pub config: MachineConfig,
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<NamedProgram>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Parses the embedded programs into the registry, once.
    pub fn load() -> Result<(), TuringMachineError> {
        let mut write_guard = PROGRAMS.write().map_err(|_| {
            TuringMachineError::FileError("Failed to acquire write lock".to_string())
        })?;

        if !write_guard.is_empty() {
            return Ok(());
        }

        for (index, program_text) in PROGRAM_TEXTS.iter().enumerate() {
            match ProgramLoader::load_program_from_string(program_text) {
                Ok(program) => write_guard.push(NamedProgram {
                    name: program
                        .name
                        .unwrap_or_else(|| format!("program-{}", index)),
                    config: program.config,
                }),
                Err(e) => warn!(index, error = %e, "failed to parse embedded program"),
            }
        }

        Ok(())
    }

    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        let _ = Self::load();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<NamedProgram, TuringMachineError> {
        let _ = Self::load();

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<NamedProgram, TuringMachineError> {
        let _ = Self::load();

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        let _ = Self::load();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .map(|program| program.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = Self::get_program_by_index(index)?;
        let config = &program.config;

        Ok(ProgramInfo {
            index,
            name: program.name.clone(),
            initial_state: config.initial_state().to_string(),
            state_count: config.states().len(),
            transition_count: config.transitions().len(),
            input_count: config.inputs().map_or(0, |inputs| inputs.len()),
        })
    }

    /// Get the raw document text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, TuringMachineError> {
        PROGRAM_TEXTS.get(index).copied().ok_or_else(|| {
            TuringMachineError::ValidationError(format!(
                "Program text index {} out of range",
                index
            ))
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub state_count: usize,
    pub transition_count: usize,
    pub input_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::TuringMachine;
    use crate::types::DEFAULT_MAX_STEPS;

    fn verdicts(name: &str) -> Vec<(String, bool)> {
        let program = ProgramManager::get_program_by_name(name).unwrap();
        let inputs = program.config.inputs().unwrap_or_default().to_vec();
        let machine = TuringMachine::new(program.config, Some(DEFAULT_MAX_STEPS)).unwrap();

        inputs
            .into_iter()
            .map(|input| {
                let accepted = machine.run(&input).unwrap().accepted;
                (input, accepted)
            })
            .collect()
    }

    #[test]
    fn test_program_manager_initialization() {
        assert!(ProgramManager::load().is_ok());
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
    }

    #[test]
    fn test_all_programs_build_engines() {
        for i in 0..ProgramManager::get_program_count() {
            let program = ProgramManager::get_program_by_index(i).unwrap();
            assert!(
                TuringMachine::new(program.config, None).is_ok(),
                "Program '{}' is invalid",
                program.name
            );
        }
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_program_names();
        assert_eq!(names, vec!["First One", "Even Zeros", "a^n b^n"]);
    }

    #[test]
    fn test_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(999).is_err());
    }

    #[test]
    fn test_get_program_by_name() {
        assert!(ProgramManager::get_program_by_name("even zeros").is_ok());
        assert!(ProgramManager::get_program_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_get_program_info() {
        let info = ProgramManager::get_program_info(2).unwrap();

        assert_eq!(info.index, 2);
        assert_eq!(info.name, "a^n b^n");
        assert_eq!(info.initial_state, "q0");
        assert_eq!(info.state_count, 5);
        assert_eq!(info.transition_count, 11);
        assert_eq!(info.input_count, 6);

        assert!(ProgramManager::get_program_info(999).is_err());
    }

    #[test]
    fn test_get_program_text() {
        assert!(ProgramManager::get_program_text_by_index(0)
            .unwrap()
            .contains("First One"));
        assert!(ProgramManager::get_program_text_by_index(3).is_err());
    }

    #[test]
    fn test_first_one_verdicts() {
        let expected = [("01", true), ("0001", true), ("000", false), ("", false)];
        let expected: Vec<(String, bool)> = expected
            .iter()
            .map(|(input, accepted)| (input.to_string(), *accepted))
            .collect();
        assert_eq!(verdicts("First One"), expected);
    }

    #[test]
    fn test_even_zeros_verdicts() {
        let accepted: Vec<bool> = verdicts("Even Zeros").into_iter().map(|(_, a)| a).collect();
        // "", "00", "0101", "0", "0001"
        assert_eq!(accepted, vec![true, true, true, false, false]);
    }

    #[test]
    fn test_anbn_verdicts() {
        let accepted: Vec<bool> = verdicts("a^n b^n").into_iter().map(|(_, a)| a).collect();
        // "", "ab", "aabb", "aab", "abb", "ba"
        assert_eq!(accepted, vec![true, true, true, false, false, false]);
    }
}
