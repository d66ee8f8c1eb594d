//! Shared test helpers for running whole programs

use rill_runtime::{Fault, Rill};

// Re-export testing utilities
pub use pretty_assertions::assert_eq;

/// Run a program and assert it completes with exactly the given output
pub fn assert_output(source: &str, expected: &str) {
    let mut runtime = Rill::new();
    let outcome = runtime.run(source);
    if let Err(fault) = &outcome.result {
        panic!("program faulted: {}\nsource: {}", fault, source);
    }
    assert_eq!(outcome.output, expected, "output mismatch for {:?}", source);
}

/// Run a program expected to fault; returns the fault and whatever was printed
pub fn run_fault(source: &str) -> (Fault, String) {
    let mut runtime = Rill::new();
    let outcome = runtime.run(source);
    match outcome.result {
        Err(fault) => (fault, outcome.output),
        Ok(()) => panic!("expected a fault, program completed: {:?}", source),
    }
}
