//! cobie-validate - check a COBie submission against its requirements
//!
//! Command-line front end for the `cobie_validation` library.

use anyhow::{bail, Context, Result};
use cobie_validation::prelude::*;
use cobie_validation::report::{detail_table, reportable_groups};
use std::path::PathBuf;
use std::sync::Arc;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cobie-validate");

    if args.len() < 2 {
        print_usage(program);
        return;
    }

    let outcome = match args[1].as_str() {
        "validate" => validate(&args[2..]),
        "summary" => {
            if args.len() < 3 {
                eprintln!("Error: Please specify a validated facility file");
                std::process::exit(2);
            }
            summary(&args[2]).map(|_| true)
        }
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(true)
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(program);
            std::process::exit(2);
        }
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(2);
        }
    }
}

fn print_usage(program: &str) {
    println!("cobie-validate v{}", cobie_validation::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  validate <requirements.json> <submission.json> [options]");
    println!("                    Validate a submission and print the report");
    println!("  summary <validated.json>");
    println!("                    Print the report of a saved validation result");
    println!("  help              Show this help message");
    println!();
    println!("Validate options:");
    println!("  --out <file>              Save the validated facility as JSON");
    println!("  --stop-on-first-fail      Stop comparing a node at its first failing attribute");
    println!("  --classification <name>   Classification used for grouping (default: Uniclass2015)");
    println!("  --config <file.toml>      Load validation options from a TOML file");
    println!();
    println!("Set RUST_LOG=debug for diagnostics.");
}

#[derive(Debug, Default)]
struct ValidateArgs {
    requirements: PathBuf,
    submission: PathBuf,
    out: Option<PathBuf>,
    stop_on_first_fail: bool,
    classification: Option<String>,
    config: Option<PathBuf>,
}

fn parse_validate_args(args: &[String]) -> Result<ValidateArgs> {
    if args.len() < 2 {
        bail!("Please specify requirement and submission files");
    }

    let mut parsed = ValidateArgs {
        requirements: PathBuf::from(&args[0]),
        submission: PathBuf::from(&args[1]),
        ..Default::default()
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--out" if i + 1 < args.len() => {
                parsed.out = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--classification" if i + 1 < args.len() => {
                parsed.classification = Some(args[i + 1].clone());
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                parsed.config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--stop-on-first-fail" => {
                parsed.stop_on_first_fail = true;
                i += 1;
            }
            other => bail!("Unknown option: {}", other),
        }
    }

    Ok(parsed)
}

fn validate(args: &[String]) -> Result<bool> {
    let args = parse_validate_args(args)?;

    let mut options = match &args.config {
        Some(path) => ValidationOptions::from_toml_file(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => ValidationOptions::default(),
    };
    if args.stop_on_first_fail {
        options = options.with_termination(TerminationMode::StopOnFirstFail);
    }
    if let Some(classification) = args.classification {
        options = options.with_classification(classification);
    }

    let requirement = Facility::read_json_file(&args.requirements)
        .with_context(|| format!("reading {}", args.requirements.display()))?;
    let submission = Facility::read_json_file(&args.submission)
        .with_context(|| format!("reading {}", args.submission.display()))?;

    println!("🔍 Validating '{}' against '{}'", submission.object.label(), requirement.object.label());

    let validator = FacilityValidator::with_options(options)?.with_diagnostics(Arc::new(LogDiagnostics));
    let validated = validator.validate(&requirement, &submission);

    print_report(&validated);

    if let Some(out) = &args.out {
        validated
            .write_json_file(out)
            .with_context(|| format!("writing {}", out.display()))?;
        println!("💾 Saved validation result to {}", out.display());
    }

    Ok(validated.passed())
}

fn summary(path: &str) -> Result<()> {
    let validated = ValidatedFacility::read_json_file(path).with_context(|| format!("reading {}", path))?;
    print_report(&validated);
    Ok(())
}

fn print_report(validated: &ValidatedFacility) {
    println!();
    println!("Facility: {}", validated.name);
    if !validated.project_name.is_empty() {
        println!("Project:  {}", validated.project_name);
    }
    if !validated.site_name.is_empty() {
        println!("Site:     {}", validated.site_name);
    }
    println!();

    for table in facility_summary(validated) {
        println!("{}", table.render_text());
    }

    let classification = validated.classification_preference.as_str();
    for section in [Section::AssetTypes, Section::Zones] {
        for group in reportable_groups(validated.section(section), classification) {
            let table = detail_table(group);
            if !table.is_empty() {
                println!("{}", table.render_text());
            }
        }
    }

    for warning in &validated.warnings {
        println!("⚠️  {}", warning.message);
    }

    println!("{}", validated.summary());
}
