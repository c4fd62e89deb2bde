//! Text rendering of execution traces.

use turing_sim::{Execution, InstantDescription};

/// Renders the tape with the head cell wrapped in brackets, e.g. `ab[c]d`.
pub fn format_tape(cells: &[String], head: usize) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            if i == head {
                format!("[{}]", cell)
            } else {
                cell.clone()
            }
        })
        .collect()
}

/// One trace line: the state right-aligned, then the tape.
pub fn format_snapshot(id: &InstantDescription) -> String {
    format!("{:>4} | {}", id.state(), format_tape(id.cells(), id.head()))
}

/// The full report for one run.
pub fn format_execution(input: &str, index: Option<usize>, execution: &Execution) -> String {
    let rule = "-".repeat(60);
    let header = match index {
        Some(index) => format!("Input #{}", index),
        None => "Input".to_string(),
    };

    let mut lines = vec![
        rule.clone(),
        format!("{}: \"{}\"", header, input),
        rule.clone(),
        String::new(),
    ];
    lines.extend(execution.trace.iter().map(format_snapshot));
    lines.push(String::new());
    lines.push(rule.clone());
    lines.push(if execution.accepted {
        "ACCEPTED".to_string()
    } else {
        format!("REJECTED ({})", execution.halt)
    });
    lines.push(rule);

    lines.join("\n")
}
