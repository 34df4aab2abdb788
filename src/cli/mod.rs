// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Four commands are supported:
//   1. `train`   — trains and selects a model from a CSV
//   2. `predict` — scores skill ratings, prints JSON
//   3. `metrics` — prints the current model's metrics
//   4. `careers` — prints static career details
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{bail, Context, Result};
use clap::Parser;
use commands::{parse_rating, CareersArgs, Commands, MetricsArgs, PredictArgs, TrainArgs};

use crate::data::encoder::{PersonalityProfile, PERSONALITY_COUNT};
use crate::domain::career::Career;
use crate::domain::subject::RatingMap;

#[derive(Parser, Debug)]
#[command(
    name = "career-predictor",
    version = "0.1.0",
    about = "Recommend IT careers from self-rated skills, with a trained model or rule-based fallback."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
            Commands::Metrics(args) => run_metrics(args),
            Commands::Careers(args) => run_careers(args),
        }
    }
}

/// Handles the `train` subcommand.
fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on '{}'", args.data);
    let outcome = TrainUseCase::new(args.into()).execute()?;
    let m = &outcome.metrics;

    println!("Selected model:      {}", m.model_name);
    println!("CV accuracy:         {:.4} (+/- {:.4})", m.cv_accuracy, m.cv_std * 2.0);
    println!("Validation accuracy: {:.4}", m.validation_accuracy);
    println!("Precision / Recall:  {:.4} / {:.4}", m.precision, m.recall);
    println!("F1 score:            {:.4}", m.f1_score);
    println!("Test accuracy:       {:.4}", m.test_accuracy);
    Ok(())
}

/// Handles the `predict` subcommand.
fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let ratings  = collect_ratings(&args)?;
    let mut use_case = PredictUseCase::new((&args).into());
    if !use_case.uses_trained_model() {
        tracing::info!("Scoring with the rule-based fallback");
    }

    if let Some(values) = &args.personality {
        let Ok(traits) = <[f64; PERSONALITY_COUNT]>::try_from(values.as_slice()) else {
            bail!("--personality needs {PERSONALITY_COUNT} values, got {}", values.len());
        };
        use_case = use_case.with_personality(PersonalityProfile::new(traits));
    }

    let report = match use_case.predict(ratings) {
        Ok(report) => report,
        Err(e) if e.is_client_error() => {
            bail!("{e}: pass --rating \"Subject=Label\" or --ratings-file")
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Ratings from --ratings-file, overridden by any --rating flags
fn collect_ratings(args: &PredictArgs) -> Result<RatingMap> {
    let mut ratings = match &args.ratings_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read ratings file '{path}'"))?;
            serde_json::from_str::<RatingMap>(&json)
                .with_context(|| format!("'{path}' is not a JSON object of subject → label"))?
        }
        None => RatingMap::new(),
    };

    for raw in &args.ratings {
        let Some((subject, label)) = parse_rating(raw) else {
            bail!("Invalid --rating '{raw}', expected \"Subject=Label\"");
        };
        ratings.insert(subject, label);
    }
    Ok(ratings)
}

/// Handles the `metrics` subcommand.
fn run_metrics(args: MetricsArgs) -> Result<()> {
    use crate::application::predict_use_case::load_metrics_store;
    use crate::infra::checkpoint::ArtifactStore;

    let artifacts = ArtifactStore::new(&args.artifact_dir);
    let store     = load_metrics_store(&args.artifact_dir);
    println!("{}", serde_json::to_string_pretty(&store.summary())?);
    match store.latest() {
        Some(metrics) => println!("{}", serde_json::to_string_pretty(metrics)?),
        None          => println!("No trained model yet; showing fallback summary."),
    }

    if artifacts.has_artifact() {
        if let Ok(cfg) = artifacts.load_config() {
            println!("Trained with:\n{}", serde_json::to_string_pretty(&cfg)?);
        }
    }
    Ok(())
}

/// Handles the `careers` subcommand.
fn run_careers(args: CareersArgs) -> Result<()> {
    match args.name {
        Some(name) => {
            let Some(career) = Career::parse(&name) else {
                bail!("Unknown career '{name}'");
            };
            println!("{}", serde_json::to_string_pretty(career.info())?);
        }
        None => {
            for career in Career::ALL {
                println!("{}", career.name());
            }
        }
    }
    Ok(())
}
