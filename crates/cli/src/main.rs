mod output;

use analysis::{
    age_group_mapping, age_group_table, age_histogram, build_lens, highest_rated, most_rated,
    ratings_by_age_group, sex_disagreements, sex_pivot, top_movies, AnalysisConfig, Report, DIFF,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{Dataset, Relation};
use output::{histogram_json, print_diverging, print_histogram, print_json, print_table};
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Lens - descriptive statistics over the MovieLens 100K ratings
#[derive(Parser)]
#[command(name = "lens")]
#[command(about = "Join, group and pivot the MovieLens 100K ratings", long_about = None)]
struct Cli {
    /// Path to MovieLens 100K dataset directory
    #[arg(short, long, default_value = "data/ml-100k", global = true)]
    data_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Titles with the most ratings
    MostRated {
        #[arg(long, default_value = "25")]
        limit: usize,
    },

    /// Best mean rating among titles with enough ratings
    HighestRated {
        #[arg(long, default_value = "15")]
        limit: usize,

        /// Ratings a title needs to be ranked
        #[arg(long, default_value = "100")]
        min_ratings: usize,
    },

    /// Age group boundaries and the rating summary per group
    AgeGroups,

    /// Mean rating per age group for the most rated movies
    ByAge {
        /// Size of the most rated movie set
        #[arg(long, default_value = "50")]
        top: usize,
    },

    /// Mean rating by sex and the M - F difference for the most rated movies
    SexDiff {
        /// Size of the most rated movie set
        #[arg(long, default_value = "50")]
        top: usize,
    },

    /// Histogram of user ages
    AgeHistogram {
        #[arg(long, default_value = "30")]
        bins: usize,
    },

    /// Run every query with the default settings
    Report,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let dataset = Dataset::load_from_files(&cli.data_dir)
        .with_context(|| format!("Failed to load MovieLens dataset from {}", cli.data_dir.display()))?;
    info!("Loaded dataset in {:?}", start.elapsed());

    let config = AnalysisConfig::default();
    match cli.command {
        Commands::MostRated { limit } => {
            handle_most_rated(&dataset, config.with_most_rated_limit(limit), cli.format)?
        }
        Commands::HighestRated { limit, min_ratings } => handle_highest_rated(
            &dataset,
            config.with_highest_rated_limit(limit).with_min_ratings(min_ratings),
            cli.format,
        )?,
        Commands::AgeGroups => handle_age_groups(&dataset, config, cli.format)?,
        Commands::ByAge { top } => handle_by_age(&dataset, config.with_top_movies(top), cli.format)?,
        Commands::SexDiff { top } => {
            handle_sex_diff(&dataset, config.with_top_movies(top), cli.format)?
        }
        Commands::AgeHistogram { bins } => {
            handle_age_histogram(&dataset, config.with_histogram_bins(bins), cli.format)?
        }
        Commands::Report => handle_report(&dataset, config, cli.format)?,
    }

    Ok(())
}

fn emit(format: Format, title: &str, relation: &Relation) -> Result<()> {
    match format {
        Format::Table => {
            print_table(title, relation);
            Ok(())
        }
        Format::Json => print_json(relation),
    }
}

/// Handle the 'most-rated' command
fn handle_most_rated(dataset: &Dataset, config: AnalysisConfig, format: Format) -> Result<()> {
    let lens = build_lens(dataset, &config)?;
    let top = most_rated(&lens, config.most_rated_limit).context("most-rated query failed")?;
    emit(format, &format!("{} most rated titles", config.most_rated_limit), &top)
}

/// Handle the 'highest-rated' command
fn handle_highest_rated(dataset: &Dataset, config: AnalysisConfig, format: Format) -> Result<()> {
    let lens = build_lens(dataset, &config)?;
    let best = highest_rated(&lens, config.min_ratings, config.highest_rated_limit)
        .context("highest-rated query failed")?;
    let title = format!(
        "Highest rated titles with at least {} ratings",
        config.min_ratings
    );
    emit(format, &title, &best)
}

/// Handle the 'age-groups' command
fn handle_age_groups(dataset: &Dataset, config: AnalysisConfig, format: Format) -> Result<()> {
    let lens = build_lens(dataset, &config)?;
    let mapping = age_group_mapping(&lens)?;
    let summary = ratings_by_age_group(&lens).context("age-groups query failed")?;
    match format {
        Format::Table => {
            print_table("Age groups", &mapping.head(10));
            print_table("Ratings by age group", &summary);
        }
        Format::Json => {
            let value = json!({
                "age_groups": mapping.records(),
                "ratings_by_age_group": summary.records(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

/// Handle the 'by-age' command
fn handle_by_age(dataset: &Dataset, config: AnalysisConfig, format: Format) -> Result<()> {
    let lens = build_lens(dataset, &config)?;
    let top = top_movies(&lens, config.top_movies)?;
    let table = age_group_table(&lens, &top, &config).context("by-age query failed")?;
    let title = format!("Mean rating by age group, {} most rated movies", top.len());
    emit(format, &title, &table)
}

/// Handle the 'sex-diff' command
fn handle_sex_diff(dataset: &Dataset, config: AnalysisConfig, format: Format) -> Result<()> {
    let lens = build_lens(dataset, &config)?;
    let top = top_movies(&lens, config.top_movies)?;
    let pivoted = sex_pivot(&lens, &config).context("sex-diff pivot failed")?;
    let ranked = sex_disagreements(&pivoted, &top).context("sex-diff ranking failed")?;
    match format {
        Format::Table => {
            print_table("Mean rating by sex (diff = M - F)", &ranked);
            print_diverging(
                "Female-leaning (left) to male-leaning (right)",
                &ranked,
                "title",
                DIFF,
            )?;
        }
        Format::Json => print_json(&ranked)?,
    }
    Ok(())
}

/// Handle the 'age-histogram' command
fn handle_age_histogram(dataset: &Dataset, config: AnalysisConfig, format: Format) -> Result<()> {
    let bins = age_histogram(&dataset.users, config.histogram_bins)?;
    match format {
        Format::Table => print_histogram("User ages", &bins),
        Format::Json => println!("{}", serde_json::to_string_pretty(&histogram_json(&bins))?),
    }
    Ok(())
}

/// Handle the 'report' command
fn handle_report(dataset: &Dataset, config: AnalysisConfig, format: Format) -> Result<()> {
    let report = Report::build(dataset, &config).context("Failed to build report")?;
    match format {
        Format::Table => {
            println!(
                "{} {} ratings joined with their movies and users",
                "✓".green(),
                report.lens_rows
            );
            print_table("Most rated titles", &report.most_rated);
            print_table(
                &format!("Highest rated titles (at least {} ratings)", config.min_ratings),
                &report.highest_rated,
            );
            print_table("Age groups", &report.age_groups.head(10));
            print_table("Ratings by age group", &report.ratings_by_age_group);
            print_table("Mean rating by age group, top movies", &report.age_group_table);
            print_table("Mean rating by sex, top movies", &report.sex_disagreements);
            print_diverging(
                "Female-leaning (left) to male-leaning (right)",
                &report.sex_disagreements,
                "title",
                DIFF,
            )?;
            print_histogram("User ages", &report.age_histogram);
        }
        Format::Json => {
            let value = json!({
                "lens_rows": report.lens_rows,
                "most_rated": report.most_rated.records(),
                "highest_rated": report.highest_rated.records(),
                "age_groups": report.age_groups.records(),
                "ratings_by_age_group": report.ratings_by_age_group.records(),
                "age_group_table": report.age_group_table.records(),
                "sex_disagreements": report.sex_disagreements.records(),
                "age_histogram": histogram_json(&report.age_histogram),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}
