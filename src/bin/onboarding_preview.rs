use abroadpath::onboarding::{build_steps, infer_segment, AnswerPatch, AnswerSet};
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<()> {
    let patch_arg = env::args()
        .nth(1)
        .context("Usage: cargo run --bin onboarding_preview -- <path-to-answers.json>")?;
    let patch_path = PathBuf::from(patch_arg);
    let raw = fs::read_to_string(&patch_path)
        .with_context(|| format!("Failed to read answers file {:?}", patch_path))?;
    let patch: AnswerPatch = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse answers file {:?}", patch_path))?;

    let mut answers = AnswerSet::new();
    patch.apply_to(&mut answers);

    let steps = build_steps(&answers);
    println!("{} steps for {}:", steps.len(), patch_path.display());
    for (index, step) in steps.iter().enumerate() {
        let gate = if step.can_continue() { "open" } else { "blocked" };
        println!("  {:>2}. {:<20} {}", index, step.id().as_str(), gate);
    }
    println!("Segment: {}", infer_segment(&answers));
    Ok(())
}
