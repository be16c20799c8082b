// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rcp test run [--filter regex]` / `rcp test train [--filter regex]` -
//! drive every built-in recipe's simulation specs through the harness
//! (§4.9, §6).

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::registry;

#[derive(Args)]
pub struct TestArgs {
    #[command(subcommand)]
    pub command: TestCommand,
}

#[derive(Subcommand)]
pub enum TestCommand {
    /// Run simulation specs and compare against golden expectation files.
    Run {
        /// Only run specs whose `recipe::test_name` matches this regex.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Run simulation specs, writing their golden expectation files.
    Train {
        #[arg(long)]
        filter: Option<String>,
    },
}

fn expectations_dir() -> PathBuf {
    PathBuf::from(".rcp/expectations")
}

pub async fn handle(args: TestArgs) -> Result<()> {
    let (filter, train) = match &args.command {
        TestCommand::Run { filter } => (filter.clone(), false),
        TestCommand::Train { filter } => (filter.clone(), true),
    };

    // §4.9: the reachable line set is registered up front, independent of
    // which specs actually run below, so a line nothing touches this
    // invocation is reported as missed rather than never having existed.
    registry::declare_coverage_points();

    let module_registry = registry::module_registry();
    let mut total = 0usize;
    let mut failed = 0usize;

    for recipe_name in registry::names() {
        let Some(recipe) = registry::find(recipe_name) else {
            continue;
        };
        let specs = recipe.gen_tests();
        let full_names: Vec<String> = specs.iter().map(|s| format!("{recipe_name}::{}", s.name)).collect();
        let name_refs: Vec<&str> = full_names.iter().map(String::as_str).collect();
        let selected: std::collections::HashSet<&str> = match &filter {
            Some(pattern) => rcp_sim::filter_by_name(&name_refs, pattern).into_iter().collect(),
            None => name_refs.iter().copied().collect(),
        };

        for (spec, full_name) in specs.iter().zip(full_names.iter()) {
            if !selected.contains(full_name.as_str()) {
                continue;
            }
            total += 1;
            let expectation_path = expectations_dir().join(format!("{full_name}.json"));
            let outcome =
                rcp_sim::run_test(&*recipe, &module_registry, spec, Some(&expectation_path), train).await;

            if train {
                if outcome.trained {
                    println!("trained {full_name}");
                } else {
                    println!("skipped {full_name} (post-process hook dropped the expectation)");
                }
                continue;
            }

            if outcome.passed() {
                println!("ok     {full_name}");
            } else {
                failed += 1;
                println!("FAILED {full_name}");
                for check in &outcome.check_failures {
                    println!("  check failed: {} at {}", check.expression, check.location);
                }
                if let Some(diff) = &outcome.expectation_diff {
                    println!("  expectation diff: {diff}");
                }
                if let Some(mismatch) = &outcome.error_mismatch {
                    println!("  {mismatch}");
                }
            }
        }
    }

    println!("{} run, {} failed", total, failed);

    // §4.9/§6: `test run` additionally gates on 100% line-touch coverage of
    // whatever recipe source actually executed this invocation. `test
    // train` is a developer convenience and isn't held to the gate.
    let mut coverage_incomplete = false;
    if !train {
        let report = registry::coverage().lock().report();
        for file in report.iter().filter(|f| !f.missed_lines.is_empty()) {
            coverage_incomplete = true;
            println!(
                "coverage: {} touched {}/{} lines (missed {:?})",
                file.file, file.touched, file.reachable, file.missed_lines
            );
        }
        if coverage_incomplete {
            println!("coverage incomplete");
        }
    }

    if failed > 0 || coverage_incomplete {
        std::process::exit(1);
    }
    Ok(())
}
