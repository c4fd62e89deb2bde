//! This module provides the `ProgramLoader` struct, responsible for turning machine
//! documents into validated `MachineConfig` values. Documents are JSON or YAML, read
//! from files, directories, or in-memory strings. Both formats share one layout; in
//! JSON a document looks like:
//!
//! ```json
//! {
//!   "name": "first one",
//!   "mt": {
//!     "states": ["q0", "qa"],
//!     "input_alphabet": ["0", "1"],
//!     "tape_alphabet": ["0", "1", "B"],
//!     "initial_state": "q0",
//!     "accept_states": ["qa"],
//!     "blank_symbol": "B",
//!     "transitions": [
//!       { "state": "q0", "read": "0", "write": "0", "move": "R", "next": "q0" },
//!       { "state": "q0", "read": ["1"], "write": ["1"], "move": "R", "next": "qa" }
//!     ]
//!   },
//!   "inputs": ["01", ""]
//! }
//! ```
//!
//! and the same document in YAML:
//!
//! ```yaml
//! mt:
//!   states: [q0, qa]
//!   input_alphabet: ["0", "1"]
//!   tape_alphabet: ["0", "1", B]
//!   initial_state: q0
//!   accept_states: [qa]
//!   transitions:
//!     - { state: q0, read: "0", write: "0", move: R, next: q0 }
//!     - { state: q0, read: ["1"], write: ["1"], move: R, next: qa }
//! inputs: ["01", ""]
//! ```
//!
//! Symbols that look like numbers must be quoted in YAML.

use crate::config::MachineConfig;
use crate::types::{Transition, TuringMachineError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The top-level layout of a machine document.
#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    name: Option<String>,
    mt: MachineSection,
    #[serde(default)]
    inputs: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct MachineSection {
    states: Vec<String>,
    input_alphabet: Vec<String>,
    tape_alphabet: Vec<String>,
    initial_state: String,
    accept_states: Vec<String>,
    transitions: Vec<TransitionEntry>,
    #[serde(default)]
    blank_symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransitionEntry {
    state: String,
    read: Symbols,
    write: Symbols,
    #[serde(rename = "move")]
    direction: String,
    next: String,
}

/// A `read`/`write` field: one symbol or a list of symbols.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Symbols {
    One(String),
    Many(Vec<String>),
}

impl Symbols {
    fn into_vec(self) -> Vec<String> {
        match self {
            Symbols::One(symbol) => vec![symbol],
            Symbols::Many(symbols) => symbols,
        }
    }
}

/// The serialization format of a machine document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a `.json`, `.yaml` or `.yml` extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(DocumentFormat::Json),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }

    /// Guesses the format of in-memory content: a leading `{` means JSON.
    pub fn detect(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            DocumentFormat::Json
        } else {
            DocumentFormat::Yaml
        }
    }

    fn parse(self, content: &str) -> Result<Document, TuringMachineError> {
        match self {
            DocumentFormat::Json => serde_json::from_str(content)
                .map_err(|e| TuringMachineError::ParseError(e.to_string())),
            DocumentFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| TuringMachineError::ParseError(e.to_string())),
        }
    }
}

/// A machine definition together with the optional display name from its document.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProgram {
    pub name: Option<String>,
    pub config: MachineConfig,
}

/// `ProgramLoader` is a utility struct for loading machine documents.
/// It provides methods to load programs from individual files, from string content,
/// and to discover and load all machine documents within a specified directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single machine from the specified file path.
    ///
    /// The format follows the file extension; unknown extensions are detected from the content.
    ///
    /// # Returns
    ///
    /// * `Ok(LoadedProgram)` if the file is successfully read, parsed and validated.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ParseError)` if the content is not a valid document.
    /// * Any validation error raised while building the `MachineConfig`.
    pub fn load_program(path: &Path) -> Result<LoadedProgram, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let format = DocumentFormat::from_path(path)
            .unwrap_or_else(|| DocumentFormat::detect(&content));
        Self::load_program_as(&content, format)
    }

    /// Loads a single machine from the provided string content, detecting its format.
    pub fn load_program_from_string(content: &str) -> Result<LoadedProgram, TuringMachineError> {
        Self::load_program_as(content, DocumentFormat::detect(content))
    }

    /// Loads a single machine from string content in the given format.
    pub fn load_program_as(
        content: &str,
        format: DocumentFormat,
    ) -> Result<LoadedProgram, TuringMachineError> {
        let document = format.parse(content)?;

        let name = document.name;
        let mt = document.mt;
        let transitions = expand_transitions(mt.transitions)?;

        debug!(name = ?name, transitions = transitions.len(), "parsed machine document");

        let config = MachineConfig::new(
            mt.states,
            mt.input_alphabet,
            mt.tape_alphabet,
            mt.initial_state,
            mt.accept_states,
            transitions,
            mt.blank_symbol,
            document.inputs,
        )?;

        Ok(LoadedProgram { name, config })
    }

    /// Loads all machine documents (`.json`, `.yaml` or `.yml`) from a given directory.
    ///
    /// Directories and other files are skipped. Each loaded file yields its own
    /// result, so one broken document does not hide the others.
    pub fn load_programs(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, LoadedProgram), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => {
                    return vec![Err(TuringMachineError::FileError(format!(
                        "Failed to read directory entry: {}",
                        e
                    )))]
                }
            }
        }
        // read_dir order is platform dependent
        paths.sort();

        paths
            .into_iter()
            .filter(|path| !path.is_dir() && DocumentFormat::from_path(path).is_some())
            .map(|path| match Self::load_program(&path) {
                Ok(program) => Ok((path, program)),
                Err(e) => Err(TuringMachineError::FileError(format!(
                    "Failed to load program from {}: {}",
                    path.display(),
                    e
                ))),
            })
            .collect()
    }
}

/// Expands each entry into one rule per `(read, write)` pair.
fn expand_transitions(
    entries: Vec<TransitionEntry>,
) -> Result<Vec<Transition>, TuringMachineError> {
    let mut transitions = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let reads = entry.read.into_vec();
        let writes = entry.write.into_vec();

        if reads.len() != writes.len() {
            return Err(TuringMachineError::ValidationError(format!(
                "Transition #{} has {} symbols in 'read' but {} in 'write'",
                index,
                reads.len(),
                writes.len()
            )));
        }

        for (read, write) in reads.into_iter().zip(writes) {
            transitions.push(Transition::new(
                entry.state.as_str(),
                read,
                write,
                &entry.direction,
                entry.next.as_str(),
            )?);
        }
    }

    Ok(transitions)
}
