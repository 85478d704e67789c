//! medml - Main entry point

use clap::Parser;
use medml::cli::{cmd_clean, cmd_compare, cmd_evaluate, Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medml=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean {
            data,
            output,
            missing_token,
        } => cmd_clean(&data, &output, &missing_token)?,
        Commands::Evaluate {
            data,
            model,
            folds,
            seed,
            balance,
            balance_seed,
            output,
        } => cmd_evaluate(&data, &model, folds, seed, &balance, balance_seed, &output)?,
        Commands::Compare {
            report_a,
            report_b,
            name_a,
            name_b,
            output,
        } => cmd_compare(&report_a, &report_b, &name_a, &name_b, output.as_deref())?,
    }

    Ok(())
}
