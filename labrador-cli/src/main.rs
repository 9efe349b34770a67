#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use cli::{Cli, Commands, InputArgs, MethodCli};
use cmd::query::QueryArgs;
use human_panic::setup_panic;
use labrador::normalization::{IceNormalizer, NormalizationMethod, ScnNormalizer};
use labrador::topdom::TopDomParams;
use labrador::HicExperiment;
use lazy_static::lazy_static;

use crate::logging::init_logging;
use crate::opts::OutputWriter;
use crate::progress_bar::LabradorProgressBar;

mod cli;
mod cmd;
mod loader;
mod logging;
mod opts;
mod progress_bar;

lazy_static! {
    pub(crate) static ref PROGRESS_BAR: LabradorProgressBar = LabradorProgressBar::new();
}

fn main() -> anyhow::Result<()> {
    setup_panic!();

    let cli: Cli = Cli::parse();

    if !cli.no_progress {
        PROGRESS_BAR.show();
    }

    init_logging(cli.verbose.log_level_filter()).expect("Could not initialize logging");

    match &cli.command {
        Commands::Stats { input } => {
            let (experiment, _) = load(input)?;

            PROGRESS_BAR.finish();
            cmd::stats::stats(&experiment, std::io::stdout())
                .context("Failed to print matrix statistics")?;
        }
        Commands::Query {
            input,
            chrom,
            start,
            end,
            field,
            symmetric,
            output,
        } => {
            let (experiment, delimiter) = load(input)?;
            let output = OutputWriter::from_path(output)?;

            let args = QueryArgs {
                chrom: chrom.as_str(),
                start: *start,
                end: *end,
                field: field.as_str(),
                symmetric: *symmetric,
            };
            cmd::query::query(&experiment, &args, output.into_write(), delimiter)
                .context("Failed to write the queried block")?;
        }
        Commands::Normalize {
            input,
            method,
            source,
            max_iter,
            threshold,
            iterations,
            output,
        } => {
            let (mut experiment, delimiter) = load(input)?;
            let output = OutputWriter::from_path(output)?;

            let progress_notifier = Arc::new(PROGRESS_BAR.clone());
            let method = match method {
                MethodCli::Ice => NormalizationMethod::Ice(
                    IceNormalizer::builder()
                        .max_iter(*max_iter)
                        .threshold(*threshold)
                        .progress_notifier(progress_notifier)
                        .build(),
                ),
                MethodCli::Scn => NormalizationMethod::Scn(
                    ScnNormalizer::builder()
                        .iterations(*iterations)
                        .progress_notifier(progress_notifier)
                        .build(),
                ),
                MethodCli::MinMax => NormalizationMethod::MinMax,
            };
            PROGRESS_BAR.set_message(format!("Normalizing with {}", method));

            cmd::normalize::normalize(
                &mut experiment,
                &method,
                source,
                output.into_write(),
                delimiter,
            )
            .context("Failed to normalize contact matrices")?;
        }
        Commands::Topdom {
            input,
            chrom,
            window,
            field,
            no_significance,
            threads,
            output,
        } => {
            let (experiment, delimiter) = load(input)?;
            let output = OutputWriter::from_path(output)?;

            let params = TopDomParams::builder()
                .window_size(*window)
                .significance_test(!*no_significance)
                .thread_num(threads.unwrap_or(0))
                .progress_notifier(Arc::new(PROGRESS_BAR.clone()))
                .build();
            let chroms = match chrom {
                Some(chrom) => vec![chrom.clone()],
                None => experiment.avail_chroms(),
            };
            PROGRESS_BAR.set_message("Calculating bin signal".to_owned());

            cmd::topdom::topdom(
                &experiment,
                &chroms,
                field,
                &params,
                output.into_write(),
                delimiter,
            )
            .context("Failed to call domain boundaries")?;
        }
    }

    PROGRESS_BAR.finish();
    Ok(())
}

/// Reads the contact file described by given options. Returns the
/// experiment along with the delimiter to use for the output.
fn load(input: &InputArgs) -> anyhow::Result<(HicExperiment, u8)> {
    let delimiter = u8::try_from(input.delimiter)
        .map_err(|_| anyhow!("Delimiter must be a single-byte character"))?;

    let reader = input
        .input
        .as_reader()
        .with_context(|| format!("Could not open {}", input.input))?;
    let experiment = loader::load_experiment(
        reader.into_read(),
        delimiter,
        input.resolution,
        &input.fields,
    )
    .with_context(|| format!("Failed to load contacts from {}", input.input))?;

    Ok((experiment, delimiter))
}
