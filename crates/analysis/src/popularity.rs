//! Which titles are rated most, and which are rated best.

use anyhow::{Context, Result};
use data_loader::Relation;
use pipeline::prelude::*;
use pipeline::SIZE_COLUMN;
use tracing::{debug, instrument, warn};

pub const RATING_COUNT: &str = "rating_count";
pub const RATING_MEAN: &str = "rating_mean";

/// `(title, size)` for the `limit` titles with the most ratings
#[instrument(skip(lens))]
pub fn most_rated(lens: &Relation, limit: usize) -> Result<Relation> {
    let sizes = size_by(lens, &["title"]).context("Failed to count ratings per title")?;
    let top = top_n(&sizes, SIZE_COLUMN, limit)?;
    debug!("Most rated: {} of {} titles", top.len(), sizes.len());
    Ok(top)
}

/// The `n` movie ids with the most ratings, used to scope the wide tables
#[instrument(skip(lens))]
pub fn top_movies(lens: &Relation, n: usize) -> Result<TopNSet> {
    TopNSet::most_frequent(lens, "movie_id", n).context("Failed to rank movies by rating count")
}

/// `(title, rating_count, rating_mean)` for every title
pub fn title_stats(lens: &Relation) -> Result<Relation> {
    group_by(
        lens,
        &["title"],
        &AggSpec::many("rating", &[AggFunc::Count, AggFunc::Mean]),
    )
    .context("Failed to aggregate ratings per title")
}

/// Best mean rating among titles with at least `min_ratings` ratings.
///
/// Equal means keep title order.
#[instrument(skip(lens))]
pub fn highest_rated(lens: &Relation, min_ratings: usize, limit: usize) -> Result<Relation> {
    let stats = title_stats(lens)?;
    let eligible = FilterPipeline::new()
        .add_filter(MinimumCountFilter::new(RATING_COUNT, min_ratings as f64))
        .apply(stats)?;
    if eligible.is_empty() {
        warn!("No title has {} or more ratings", min_ratings);
    }
    Ok(top_n(&eligible, RATING_MEAN, limit)?)
}
