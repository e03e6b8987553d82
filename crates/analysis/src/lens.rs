//! The denormalized ratings view every query starts from.
//!
//! One row per rating, carrying the movie's columns first, then the
//! rating's, then the user's, plus an `age_group` label.

use crate::config::AnalysisConfig;
use anyhow::{Context, Result};
use data_loader::{Dataset, Relation};
use pipeline::prelude::*;
use tracing::{info, instrument};

pub const AGE_GROUP: &str = "age_group";

/// movies ⋈ ratings on `movie_id`, then ⋈ users on `user_id`
#[instrument(skip_all)]
pub fn join_lens(dataset: &Dataset) -> Result<Relation> {
    let movie_ratings = inner_join(&dataset.movies, &dataset.ratings, &["movie_id"])
        .context("Failed to join movies with ratings")?;
    let lens = inner_join(&movie_ratings, &dataset.users, &["user_id"])
        .context("Failed to join ratings with users")?;
    info!("Built lens with {} rows x {} columns", lens.len(), lens.num_columns());
    Ok(lens)
}

/// The joined view with the `age_group` column attached
pub fn build_lens(dataset: &Dataset, config: &AnalysisConfig) -> Result<Relation> {
    let mut lens = join_lens(dataset)?;
    let bins = config.age_bins()?;
    cut_in_place(&mut lens, "age", &bins, AGE_GROUP).context("Failed to bin user ages")?;
    Ok(lens)
}

/// Distinct `(age, age_group)` pairs, youngest first
pub fn age_group_mapping(lens: &Relation) -> Result<Relation> {
    let pairs = lens
        .select(&["age", AGE_GROUP])
        .context("Lens has no age columns")?
        .distinct();
    Ok(sort_by(&pairs, &[SortKey::ascending("age")])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_dataset;
    use data_loader::Value;

    #[test]
    fn test_lens_has_one_row_per_matched_rating() {
        let dataset = sample_dataset();
        let lens = build_lens(&dataset, &AnalysisConfig::default()).unwrap();
        // The rating for movie 404 has no movie row
        assert_eq!(lens.len(), dataset.ratings.len() - 1);
        assert_eq!(lens.columns()[0], "movie_id");
        assert_eq!(lens.columns().last().map(String::as_str), Some(AGE_GROUP));
        assert!(lens.has_column("sex"));
        assert!(lens.has_column("rating"));
    }

    #[test]
    fn test_age_group_mapping() {
        let lens = build_lens(&sample_dataset(), &AnalysisConfig::default()).unwrap();
        let mapping = age_group_mapping(&lens).unwrap();
        let first = mapping.row(0).unwrap();
        assert_eq!(first.get("age"), Some(&Value::Int(17)));
        assert_eq!(first.get(AGE_GROUP), Some(&Value::from("10-19")));
        let ages: Vec<&Value> = mapping.column("age").unwrap().collect();
        assert!(ages.windows(2).all(|w| w[0] < w[1]));
    }
}
