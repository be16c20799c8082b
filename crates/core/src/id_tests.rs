// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

crate::define_id! {
    pub struct TestId;
}

#[test]
fn new_and_as_str_round_trip() {
    let id = TestId::new("abc");
    assert_eq!(id.as_str(), "abc");
    assert_eq!(id.to_string(), "abc");
}

#[test]
fn sequential_id_gen_increments() {
    let gen = SequentialIdGen::new("step");
    assert_eq!(gen.next(), "step-1");
    assert_eq!(gen.next(), "step-2");
    assert_eq!(gen.next(), "step-3");
}

#[test]
fn sequential_id_gen_clone_shares_counter() {
    let gen = SequentialIdGen::new("x");
    let clone = gen.clone();
    assert_eq!(gen.next(), "x-1");
    assert_eq!(clone.next(), "x-2");
}

#[test]
fn uuid_id_gen_produces_unique_values() {
    let gen = UuidIdGen;
    assert_ne!(gen.next(), gen.next());
}
