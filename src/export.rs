//! Workflow structure export for visualization.
//!
//! Renders a machine's state graph as Graphviz DOT or Mermaid text so the
//! workflow wired up in code can be reviewed as a diagram. Edge labels come
//! from the `describe` strings of the conditions and actions on each
//! transition; error routes render as dashed edges.
//!
//! Export reads the structure only. It never evaluates a condition or runs
//! an action, and the output is identical whether the machine has run or
//! not.

use crate::machine::Machine;
use std::fmt::Write as _;

/// Render the machine's state graph as Graphviz DOT.
///
/// # Example
///
/// ```rust
/// use tickwork::export::to_dot;
/// use tickwork::machine::{MachineBuilder, TransitionBuilder};
///
/// let machine = MachineBuilder::new("session")
///     .states(["Init", "Offline"])
///     .initial("Init")
///     .transition("Init", TransitionBuilder::new().to("Offline"))
///     .build()
///     .unwrap();
///
/// let dot = to_dot(&machine);
/// assert!(dot.contains("\"Init\" -> \"Offline\""));
/// ```
pub fn to_dot(machine: &Machine) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph \"{}\" {{", escape(machine.name()));
    let _ = writeln!(out, "    rankdir=LR;");
    let _ = writeln!(out, "    node [shape=box, style=rounded];");
    let _ = writeln!(out, "    __start [shape=point];");
    let _ = writeln!(
        out,
        "    __start -> \"{}\";",
        escape(machine.initial_state())
    );

    for state in machine.states() {
        let _ = writeln!(out, "    \"{}\";", escape(state.name()));
    }
    for state in machine.states() {
        for transition in state.transitions() {
            let target = machine.states()[transition.target].name();
            let label = edge_label(
                &transition.describe_conditions(),
                &transition.describe_steps(),
            );
            if label.is_empty() {
                let _ = writeln!(
                    out,
                    "    \"{}\" -> \"{}\";",
                    escape(state.name()),
                    escape(target)
                );
            } else {
                let _ = writeln!(
                    out,
                    "    \"{}\" -> \"{}\" [label=\"{}\"];",
                    escape(state.name()),
                    escape(target),
                    escape(&label)
                );
            }
            if let Some(error_id) = transition.error_target {
                let error_state = machine.states()[error_id].name();
                let _ = writeln!(
                    out,
                    "    \"{}\" -> \"{}\" [style=dashed, label=\"on error\"];",
                    escape(state.name()),
                    escape(error_state)
                );
            }
        }
    }

    out.push_str("}\n");
    out
}

/// Render the machine's state graph as a Mermaid `stateDiagram-v2`.
///
/// State names with characters Mermaid cannot use as identifiers are
/// declared with an alias so the display name survives intact.
pub fn to_mermaid(machine: &Machine) -> String {
    let mut out = String::from("stateDiagram-v2\n");

    for (index, state) in machine.states().iter().enumerate() {
        if ident(state.name()) != state.name() {
            let _ = writeln!(out, "    state \"{}\" as s{}", state.name(), index);
        }
    }

    let _ = writeln!(out, "    [*] --> {}", node(machine, machine_initial(machine)));

    for (index, state) in machine.states().iter().enumerate() {
        for transition in state.transitions() {
            let label = edge_label(
                &transition.describe_conditions(),
                &transition.describe_steps(),
            );
            if label.is_empty() {
                let _ = writeln!(
                    out,
                    "    {} --> {}",
                    node(machine, index),
                    node(machine, transition.target)
                );
            } else {
                let _ = writeln!(
                    out,
                    "    {} --> {}: {}",
                    node(machine, index),
                    node(machine, transition.target),
                    label
                );
            }
            if let Some(error_id) = transition.error_target {
                let _ = writeln!(
                    out,
                    "    {} --> {}: on error",
                    node(machine, index),
                    node(machine, error_id)
                );
            }
        }
    }

    out
}

fn machine_initial(machine: &Machine) -> usize {
    machine
        .states()
        .iter()
        .position(|s| s.name() == machine.initial_state())
        .unwrap_or(0)
}

fn node(machine: &Machine, index: usize) -> String {
    let name = machine.states()[index].name();
    if ident(name) == name {
        name.to_string()
    } else {
        format!("s{index}")
    }
}

fn edge_label(conditions: &[String], steps: &[String]) -> String {
    let mut label = conditions.join(" && ");
    if !steps.is_empty() {
        if !label.is_empty() {
            label.push_str(" / ");
        } else {
            label.push_str("/ ");
        }
        label.push_str(&steps.join("; "));
    }
    label
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn ident(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Run;
    use crate::condition::Predicate;
    use crate::machine::{MachineBuilder, TransitionBuilder};

    fn session_machine() -> Machine {
        MachineBuilder::new("session")
            .states(["Init", "Starting", "Online", "Offline"])
            .initial("Init")
            .transition(
                "Init",
                TransitionBuilder::new()
                    .when(Predicate::new("IsStarted", |_| true))
                    .to("Starting"),
            )
            .transition(
                "Starting",
                TransitionBuilder::new()
                    .then(Run::new("StartNetwork", |_| Ok(())))
                    .to("Online")
                    .on_error("Offline"),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn dot_includes_every_state_and_edge() {
        let dot = to_dot(&session_machine());

        assert!(dot.starts_with("digraph \"session\" {"));
        for state in ["Init", "Starting", "Online", "Offline"] {
            assert!(dot.contains(&format!("\"{state}\";")), "missing {state}");
        }
        assert!(dot.contains("__start -> \"Init\";"));
        assert!(dot.contains("\"Init\" -> \"Starting\" [label=\"IsStarted\"];"));
        assert!(dot.contains("\"Starting\" -> \"Online\" [label=\"/ StartNetwork\"];"));
        assert!(dot.contains(
            "\"Starting\" -> \"Offline\" [style=dashed, label=\"on error\"];"
        ));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn dot_escapes_quotes_in_labels() {
        let machine = MachineBuilder::new("m")
            .states(["A", "B"])
            .initial("A")
            .transition(
                "A",
                TransitionBuilder::new()
                    .when(Predicate::new("says \"hi\"", |_| true))
                    .to("B"),
            )
            .build()
            .unwrap();

        let dot = to_dot(&machine);
        assert!(dot.contains("label=\"says \\\"hi\\\"\""));
    }

    #[test]
    fn mermaid_marks_the_initial_state() {
        let mermaid = to_mermaid(&session_machine());

        assert!(mermaid.starts_with("stateDiagram-v2\n"));
        assert!(mermaid.contains("[*] --> Init"));
        assert!(mermaid.contains("Init --> Starting: IsStarted"));
        assert!(mermaid.contains("Starting --> Online: / StartNetwork"));
        assert!(mermaid.contains("Starting --> Offline: on error"));
    }

    #[test]
    fn mermaid_aliases_names_that_are_not_identifiers() {
        let machine = MachineBuilder::new("m")
            .states(["Waiting Room", "Done"])
            .initial("Waiting Room")
            .transition("Waiting Room", TransitionBuilder::new().to("Done"))
            .build()
            .unwrap();

        let mermaid = to_mermaid(&machine);
        assert!(mermaid.contains("state \"Waiting Room\" as s0"));
        assert!(mermaid.contains("[*] --> s0"));
        assert!(mermaid.contains("s0 --> Done"));
    }

    #[test]
    fn export_is_stable_across_runs() {
        let machine = session_machine();
        assert_eq!(to_dot(&machine), to_dot(&machine));
        assert_eq!(to_mermaid(&machine), to_mermaid(&machine));
    }
}
