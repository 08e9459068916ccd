use crate::config::CleanPolicy;
use crate::types::{ExecutionResult, OutputDiff, ValidationSpec, VerdictReport};

/// A clean run has exit code zero and, under the strict policy, an empty
/// error stream. Diagnostic output on stderr disqualifies a run even when
/// the process otherwise "succeeded".
pub fn is_clean(result: &ExecutionResult, policy: CleanPolicy) -> bool {
    if result.timed_out || result.exit_code != 0 {
        return false;
    }
    match policy {
        CleanPolicy::Strict => result.stderr.is_empty(),
        CleanPolicy::ExitCodeOnly => true,
    }
}

/// Turns a raw execution result into a verdict, optionally comparing stdout
/// against the expected lines. Pure: no I/O, no side effects.
///
/// The comparison is an exact ordered-sequence match: equal length and
/// pairwise equality. Without a validation spec, `matched` is absent.
pub fn classify(result: &ExecutionResult, validation: Option<&ValidationSpec>) -> VerdictReport {
    let (matched, diff) = match validation {
        None => (None, None),
        Some(spec) => {
            let actual: Vec<String> = result.stdout.lines().map(str::to_owned).collect();
            if actual == spec.expected_lines {
                (Some(true), None)
            } else {
                let diff = OutputDiff {
                    expected: spec.expected_lines.clone(),
                    actual,
                };
                (Some(false), Some(diff))
            }
        }
    };

    VerdictReport {
        stdout: result.stdout.clone(),
        stderr: result.stderr.clone(),
        exit_code: result.exit_code,
        matched,
        diff,
    }
}
