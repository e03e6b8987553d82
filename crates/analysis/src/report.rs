//! Every query run once against one dataset.

use crate::config::AnalysisConfig;
use crate::demographics::{
    age_group_table, age_histogram, ratings_by_age_group, sex_disagreements, sex_pivot,
};
use crate::lens::{age_group_mapping, build_lens};
use crate::popularity::{highest_rated, most_rated, top_movies};
use anyhow::Result;
use data_loader::{Dataset, Relation};
use pipeline::{HistogramBin, TopNSet};
use std::time::Instant;
use tracing::{info, instrument};

/// Results of the full analysis, in the order they are presented
#[derive(Debug, Clone)]
pub struct Report {
    pub lens_rows: usize,
    pub most_rated: Relation,
    pub highest_rated: Relation,
    pub top_movies: TopNSet,
    pub age_groups: Relation,
    pub ratings_by_age_group: Relation,
    pub age_group_table: Relation,
    pub sex_pivot: Relation,
    pub sex_disagreements: Relation,
    pub age_histogram: Vec<HistogramBin>,
}

impl Report {
    /// Join the dataset once and answer every question from the shared lens
    #[instrument(skip_all)]
    pub fn build(dataset: &Dataset, config: &AnalysisConfig) -> Result<Self> {
        let start = Instant::now();
        let lens = build_lens(dataset, config)?;

        let top = top_movies(&lens, config.top_movies)?;

        // Popularity and demographics only share the lens, so they run in parallel
        let (popularity, demographics) = rayon::join(
            || -> Result<_> {
                Ok((
                    most_rated(&lens, config.most_rated_limit)?,
                    highest_rated(&lens, config.min_ratings, config.highest_rated_limit)?,
                    age_histogram(&dataset.users, config.histogram_bins)?,
                ))
            },
            || -> Result<_> {
                let pivoted = sex_pivot(&lens, config)?;
                Ok((
                    age_group_mapping(&lens)?,
                    ratings_by_age_group(&lens)?,
                    age_group_table(&lens, &top, config)?,
                    sex_disagreements(&pivoted, &top)?,
                    pivoted,
                ))
            },
        );
        let (most_rated, highest_rated, age_histogram) = popularity?;
        let (age_groups, ratings_by_age_group, age_group_table, sex_disagreements, sex_pivot) =
            demographics?;

        let report = Self {
            lens_rows: lens.len(),
            most_rated,
            highest_rated,
            top_movies: top,
            age_groups,
            ratings_by_age_group,
            age_group_table,
            sex_pivot,
            sex_disagreements,
            age_histogram,
        };

        info!(
            "Report over {} joined ratings built in {:.2?}",
            report.lens_rows,
            start.elapsed()
        );
        Ok(report)
    }
}
