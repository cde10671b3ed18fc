//! # Sample Matrix Walkthrough
//!
//! Runs the whole pipeline over the bundled sample matrix:
//! - Validating the document
//! - Generating ranked, content-addressed candidates
//! - Executing test cases against the reference monitors
//! - Printing the reporting projections
//!
//! Run with: `RUST_LOG=debug cargo run -p behavior-matrix --example run_sample`

use behavior_matrix::{Engine, EngineConfig};
use serde_json::{json, Value};

const SAMPLE: &str = include_str!("../tests/fixtures/sample_matrix.json");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for observability
    tracing_subscriber::fmt::init();

    println!("Behavior Matrix - Sample Walkthrough\n");

    // Step 1: Validate
    let document: Value = serde_json::from_str(SAMPLE)?;
    let engine = Engine::with_config(EngineConfig::default().with_seed(42));
    let matrix = engine.validate(&document)?;
    println!(
        "Validated {} rows ({} enabled)\n",
        matrix.len(),
        matrix.enabled_rows().count()
    );

    // Step 2: Generate candidates
    let policy = json!({"min_priority": 0.5, "max_candidates": 5});
    let candidates = engine.generate(&matrix, Some(&policy))?;
    println!("Top {} candidates:", candidates.len());
    for c in &candidates {
        println!(
            "  {:.12}  {:<10} {:<16} {} -> {}  (p={:.2})",
            c.tc_id, c.phase, c.fault_id, c.start_state, c.end_state, c.priority
        );
    }
    println!();

    // Step 3: Execute
    let report = engine.execute(&matrix);
    println!("{}", report);

    // Step 4: Projections
    let projections = engine.projections(&matrix);
    println!("{}", serde_json::to_string_pretty(&projections)?);

    Ok(())
}
