mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use turing_sim::{
    MachineConfig, ProgramLoader, ProgramManager, TuringMachine, DEFAULT_MAX_STEPS,
};

/// Runs a deterministic single-tape Turing machine over a batch of inputs and prints
/// every instant description.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
  turing-sim-cli machines/anbn.json
  turing-sim-cli machines/anbn.json -i aabb -i aab
  turing-sim-cli --builtin \"Even Zeros\" --json
  turing-sim-cli --show \"First One\"
  cat machines/first-one.json | turing-sim-cli")]
struct Cli {
    /// Path to a machine document (.json, .yaml or .yml).
    /// Read from stdin when omitted and stdin is piped.
    program: Option<PathBuf>,

    /// Use an embedded sample machine instead of a file
    #[arg(short, long, conflicts_with = "program")]
    builtin: Option<String>,

    /// List the embedded sample machines and exit
    #[arg(short, long)]
    list: bool,

    /// Print the document of an embedded sample machine and exit
    #[arg(long, value_name = "NAME")]
    show: Option<String>,

    /// Input string to run (repeatable). Defaults to the document's `inputs`.
    #[arg(short, long)]
    input: Vec<String>,

    /// Maximum number of steps per run
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Run without a step ceiling
    #[arg(long, conflicts_with = "max_steps")]
    unbounded: bool,

    /// Print each run as a JSON object
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list {
        list_programs()?;
        return Ok(());
    }
    if let Some(name) = &cli.show {
        return show_program(name);
    }

    let config = load_config(&cli)?;
    info!(
        states = config.states().len(),
        transitions = config.transitions().len(),
        "Machine loaded"
    );

    let inputs = resolve_inputs(&cli.input, &config);
    if inputs.is_empty() {
        println!("No inputs defined for this machine.");
        return Ok(());
    }

    let max_steps = (!cli.unbounded).then_some(cli.max_steps);
    let machine = TuringMachine::new(config, max_steps).context("failed to build machine")?;
    debug!(?max_steps, inputs = inputs.len(), "Running batch");

    if !cli.json {
        print_summary(machine.config());
    }

    for (idx, input) in inputs.iter().enumerate() {
        match machine.run(input) {
            Ok(execution) if cli.json => {
                debug!(input = %input, accepted = execution.accepted, "Run finished");
                println!("{}", json!({ "input": input, "execution": execution }));
            }
            Ok(execution) => {
                debug!(input = %input, accepted = execution.accepted, "Run finished");
                println!();
                println!("{}", render::format_execution(input, Some(idx + 1), &execution));
            }
            // A bad input only affects its own run.
            Err(e) => eprintln!("Input #{} \"{}\": {}", idx + 1, input, e),
        }
    }

    Ok(())
}

/// Picks the inputs to run: the command-line inputs when given, else the document's own.
fn resolve_inputs(cli_inputs: &[String], config: &MachineConfig) -> Vec<String> {
    if cli_inputs.is_empty() {
        config.inputs().map(<[String]>::to_vec).unwrap_or_default()
    } else {
        cli_inputs.to_vec()
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads the machine from `--builtin`, a file, or piped stdin, in that order.
fn load_config(cli: &Cli) -> Result<MachineConfig> {
    if let Some(name) = &cli.builtin {
        let program = ProgramManager::get_program_by_name(name)
            .with_context(|| format!("unknown builtin machine '{}'", name))?;
        debug!(name = %program.name, "Using embedded machine");
        return Ok(program.config);
    }

    if let Some(path) = &cli.program {
        let program = ProgramLoader::load_program(path)
            .with_context(|| format!("failed to load machine from {}", path.display()))?;
        return Ok(program.config);
    }

    if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read machine from stdin")?;
        let program = ProgramLoader::load_program_from_string(&buffer)
            .context("failed to load machine from stdin")?;
        return Ok(program.config);
    }

    bail!("no machine given: pass a document path, --builtin <NAME>, or pipe a document on stdin")
}

fn list_programs() -> Result<()> {
    for index in 0..ProgramManager::get_program_count() {
        let info = ProgramManager::get_program_info(index)?;
        println!(
            "{:<12} states={} transitions={} inputs={}",
            info.name, info.state_count, info.transition_count, info.input_count
        );
    }

    Ok(())
}

fn show_program(name: &str) -> Result<()> {
    let index = ProgramManager::list_program_names()
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(name))
        .with_context(|| format!("unknown builtin machine '{}'", name))?;
    print!("{}", ProgramManager::get_program_text_by_index(index)?);

    Ok(())
}

fn print_summary(config: &MachineConfig) {
    let accept_states: Vec<&str> = config.accept_states().iter().map(|s| s.name()).collect();

    println!("Machine loaded");
    println!("   States: {}", config.states().len());
    println!("   Transitions: {}", config.transitions().len());
    println!("   Initial state: {}", config.initial_state());
    println!("   Accept states: {}", accept_states.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(inputs: Option<&[&str]>) -> MachineConfig {
        let builder = MachineConfig::builder()
            .states(["q0", "qa"])
            .input_alphabet(["0", "1"])
            .tape_alphabet(["0", "1", "B"])
            .initial_state("q0")
            .accept_states(["qa"])
            .rule("q0", "1", "1", "R", "qa")
            .unwrap();
        let builder = match inputs {
            Some(inputs) => builder.inputs(inputs.iter().copied()),
            None => builder,
        };
        builder.build().unwrap()
    }

    #[test]
    fn test_resolve_inputs_prefers_command_line() {
        let inputs = resolve_inputs(&["11".to_string()], &config(Some(&["01"][..])));
        assert_eq!(inputs, vec!["11".to_string()]);
    }

    #[test]
    fn test_resolve_inputs_falls_back_to_document() {
        let inputs = resolve_inputs(&[], &config(Some(&["01", ""][..])));
        assert_eq!(inputs, vec!["01".to_string(), String::new()]);
    }

    #[test]
    fn test_resolve_inputs_empty_without_any_source() {
        assert!(resolve_inputs(&[], &config(None)).is_empty());
        assert!(resolve_inputs(&[], &config(Some(&[][..]))).is_empty());
    }

    #[test]
    fn test_show_known_and_unknown_program() {
        assert!(show_program("even zeros").is_ok());
        assert!(show_program("missing").is_err());
    }
}
