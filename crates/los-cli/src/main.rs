//! los - Length-of-stay prediction CLI
//!
//! Usage:
//!   los train                          # Fit on LengthOfStay.csv, write the model
//!   los train --data d.csv --seed 7    # Custom dataset and split seed
//!   los predict                        # Interactive form
//!   los predict --rcount 3 --gender Laki-laki --asthma Tidak --pneum Ya --depress Tidak
//!   los about                          # Explore the dataset

use clap::{Parser, Subcommand};
use los_model::config::{DEFAULT_DATA_PATH, DEFAULT_MODEL_PATH, DEFAULT_SEED, DEFAULT_TEST_SIZE};
use los_model::service::ServiceConfig;
use los_model::training::TrainingConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod error;
mod output;

use commands::{about, predict, train};

/// los - hospital length-of-stay predictor
///
/// Trains a linear regression on patient records and predicts how many
/// days a patient will stay.
#[derive(Parser)]
#[command(name = "los")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the model on the dataset and write the artifact
    Train {
        /// Dataset CSV
        #[arg(long, value_name = "FILE", default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Where to write the model
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_MODEL_PATH)]
        output: PathBuf,

        /// Shuffle seed for the train/test split
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Held-out share of rows
        #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
        test_size: f64,
    },

    /// Predict length of stay for a patient
    Predict {
        /// Model artifact
        #[arg(long, value_name = "FILE", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Dataset CSV
        #[arg(long, value_name = "FILE", default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Number of diagnoses
        #[arg(long, allow_negative_numbers = true)]
        rcount: Option<i64>,

        /// Gender (Laki-laki or Perempuan)
        #[arg(long)]
        gender: Option<String>,

        /// Asthma (Ya or Tidak)
        #[arg(long)]
        asthma: Option<String>,

        /// Pneumonia (Ya or Tidak)
        #[arg(long)]
        pneum: Option<String>,

        /// Depression (Ya or Tidak)
        #[arg(long)]
        depress: Option<String>,
    },

    /// Show dataset preview, statistics and correlations
    About {
        /// Dataset CSV
        #[arg(long, value_name = "FILE", default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("los_model=info,los=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Train {
            data,
            output,
            seed,
            test_size,
        } => train::run(
            &TrainingConfig::new()
                .with_data_path(data)
                .with_model_path(output)
                .with_seed(seed)
                .with_test_size(test_size),
        ),

        Commands::Predict {
            model,
            data,
            rcount,
            gender,
            asthma,
            pneum,
            depress,
        } => predict::run(
            &ServiceConfig::new()
                .with_model_path(model)
                .with_data_path(data),
            predict::FormArgs {
                rcount,
                gender,
                asthma,
                pneum,
                depress,
            },
        ),

        Commands::About { data } => about::run(&data),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            e.exit_code()
        }
    }
}
