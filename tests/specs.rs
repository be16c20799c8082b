//! Behavioral specifications for the `rcp` CLI.
//!
//! Black-box: each test invokes the built `rcp` binary and asserts on its
//! stdout/stderr/exit code. See §8 of spec.md for the literal scenarios
//! these mirror.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/help.rs"]
mod cli_help;
#[path = "specs/cli/errors.rs"]
mod cli_errors;

// scenarios/ (§8 literal scenarios A-F)
#[path = "specs/scenarios/hello.rs"]
mod scenario_hello;
#[path = "specs/scenarios/conditional.rs"]
mod scenario_conditional;
#[path = "specs/scenarios/greeting.rs"]
mod scenario_greeting;
#[path = "specs/scenarios/parallel.rs"]
mod scenario_parallel;
#[path = "specs/scenarios/timeout.rs"]
mod scenario_timeout;
#[path = "specs/scenarios/output_placeholder.rs"]
mod scenario_output_placeholder;

// test runner (train -> run round trip, §8 round-trip law)
#[path = "specs/test_train.rs"]
mod test_train;
#[path = "specs/expectation_diff.rs"]
mod expectation_diff;
