// Build command: 3-step pipeline (clear outputs, transform, swig + post-process).

use std::time::Instant;

use swigpp_codegen::context::RunSettings;
use swigpp_codegen::diagnostics;

use crate::CliError;

const STEP_COUNT: u8 = 3;

const STEP_DESCS: [&str; STEP_COUNT as usize] = [
    "Clear generated output directories",
    "Transform interface files",
    "Run swig and post-process outputs",
];

/// Steps selected by `--step` / `--from`. The two flags are mutually exclusive.
pub fn select_steps(step: Option<u8>, from: u8) -> Result<Vec<u8>, CliError> {
    if step.is_some() && from != 1 {
        return Err(CliError::Usage("--step and --from are mutually exclusive".to_string()));
    }
    if let Some(s) = step {
        if !(1..=STEP_COUNT).contains(&s) {
            return Err(CliError::Usage(format!("--step must be 1-{STEP_COUNT}, got {s}")));
        }
        return Ok(vec![s]);
    }
    if !(1..=STEP_COUNT).contains(&from) {
        return Err(CliError::Usage(format!("--from must be 1-{STEP_COUNT}, got {from}")));
    }
    Ok((from..=STEP_COUNT).collect())
}

pub fn run_steps(settings: &RunSettings, steps: &[u8]) -> Result<(), CliError> {
    diagnostics::reset();
    let total = steps.len();
    let overall_start = Instant::now();

    eprintln!("\n{}", "=".repeat(60));
    eprintln!(
        "  swigpp {} pipeline (target {}, profile {})",
        settings.backend, settings.target, settings.profile
    );
    eprintln!("  Running {total} of {STEP_COUNT} steps");
    eprintln!("{}\n", "=".repeat(60));

    for (i, &step_num) in steps.iter().enumerate() {
        let step_start = Instant::now();
        let desc = STEP_DESCS
            .get(usize::from(step_num).wrapping_sub(1))
            .copied()
            .unwrap_or("unknown step");
        eprintln!("[{}/{}] Step {}: {}", i + 1, total, step_num, desc);
        eprintln!("{}", "-".repeat(60));

        match step_num {
            1 => swigpp_codegen::clean_outputs(settings)?,
            2 => {
                swigpp_codegen::run_transform(settings)?;
            }
            3 => {
                swigpp_codegen::run_build(settings)?;
            }
            other => return Err(CliError::Usage(format!("no such step: {other}"))),
        }

        let elapsed = step_start.elapsed().as_secs_f64();
        eprintln!("  Step {step_num} completed in {elapsed:.1}s\n");
    }

    let overall = overall_start.elapsed().as_secs_f64();
    let warnings = diagnostics::warning_count();
    eprintln!("{}", "=".repeat(60));
    eprintln!("  All steps completed in {overall:.1}s ({warnings} warnings)");
    eprintln!("{}", "=".repeat(60));
    Ok(())
}

/// The `transform` command: replace the rewritten interface tree and leave swig
/// outputs alone.
pub fn run_transform_only(settings: &RunSettings) -> Result<(), CliError> {
    diagnostics::reset();
    let start = Instant::now();
    swigpp_codegen::clean_modules(settings)?;
    let summary = swigpp_codegen::run_transform(settings)?;
    let elapsed = start.elapsed().as_secs_f64();
    eprintln!(
        "  Transformed {} files in {} packages in {elapsed:.1}s ({} warnings)",
        summary.files,
        summary.packages,
        diagnostics::warning_count()
    );
    Ok(())
}
