use crate::config::Protocol;
use crate::types::VerdictReport;

use std::fmt::Write;

/// The serialized verdict plus the status the worker process should exit
/// with. Printing and exiting are left to the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub exit_status: i32,
}

pub fn render(protocol: Protocol, verdict: &VerdictReport, clean: bool) -> Rendered {
    match protocol {
        Protocol::Verbose => render_verbose(verdict),
        Protocol::Terse => render_terse(verdict, clean),
    }
}

/// Human-facing test harness layout: fixed labeled sections in order.
fn render_verbose(verdict: &VerdictReport) -> Rendered {
    let mut text = String::new();

    let _ = writeln!(text, "STDOUT:");
    let _ = writeln!(text, "{}", verdict.stdout);
    let _ = writeln!(text, "STDERR:");
    let _ = writeln!(text, "{}", verdict.stderr);

    if let Some(matched) = verdict.matched {
        let _ = writeln!(text, "OUTPUT_MATCH: {}", matched);
        if let Some(ref diff) = verdict.diff {
            let _ = writeln!(text, "Expected output:");
            for line in &diff.expected {
                let _ = writeln!(text, "{}", line);
            }
            let _ = writeln!(text, "Your output:");
            for line in &diff.actual {
                let _ = writeln!(text, "{}", line);
            }
        }
    }

    Rendered {
        text,
        exit_status: 0,
    }
}

/// Machine-facing orchestrator layout: stdout alone on a clean run,
/// stdout and stderr concatenated otherwise, with the child's exit code
/// propagated (or 1 when the child's code is zero despite a non-clean run).
fn render_terse(verdict: &VerdictReport, clean: bool) -> Rendered {
    if clean {
        return Rendered {
            text: verdict.stdout.clone(),
            exit_status: 0,
        };
    }

    let mut text = verdict.stdout.clone();
    if !text.is_empty() && !verdict.stderr.is_empty() {
        text.push('\n');
    }
    text.push_str(&verdict.stderr);

    let exit_status = if verdict.exit_code != 0 {
        verdict.exit_code
    } else {
        1
    };

    Rendered { text, exit_status }
}
