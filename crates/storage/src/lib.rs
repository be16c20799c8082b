// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rcp-storage: the stream sink back-ends and the build presentation tree
//! they maintain (§4.3), plus golden expectation-file persistence (§4.9).

pub mod expectation;
pub mod presentation;
pub mod sink;

pub use expectation::{expectation_path, Expectation, ExpectationError};
pub use presentation::{BuildPresentation, StepView};
pub use sink::{AnnotationEmitter, StructuredEmitter};
