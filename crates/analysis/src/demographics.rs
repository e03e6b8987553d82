//! How ratings differ across age groups and between the sexes.

use crate::config::AnalysisConfig;
use crate::lens::AGE_GROUP;
use crate::popularity::RATING_MEAN;
use anyhow::{Context, Result};
use data_loader::{Relation, Sex, Value};
use pipeline::prelude::*;
use tracing::{debug, instrument, warn};

pub const DIFF: &str = "diff";

/// `(age_group, rating_count, rating_mean)` over the whole lens.
///
/// Users outside every age bin are left out.
#[instrument(skip(lens))]
pub fn ratings_by_age_group(lens: &Relation) -> Result<Relation> {
    group_by(
        lens,
        &[AGE_GROUP],
        &AggSpec::many("rating", &[AggFunc::Count, AggFunc::Mean]),
    )
    .context("Failed to aggregate ratings per age group")
}

/// Mean rating per `(title, age_group)`, restricted to the movies in `top`
pub fn title_age_means(lens: &Relation, top: &TopNSet) -> Result<Relation> {
    let scoped = filter_in(lens, top.key_column(), &top.key_set())
        .context("Failed to restrict lens to the top movies")?;
    if scoped.is_empty() {
        warn!("No ratings left after restricting to {} top movies", top.len());
    }
    group_by(
        &scoped,
        &["title", AGE_GROUP],
        &[AggSpec::new("rating", AggFunc::Mean)],
    )
    .context("Failed to aggregate ratings per title and age group")
}

/// One row per top title, one column per age group holding its mean rating
#[instrument(skip(lens, top, config), fields(top_movies = top.len()))]
pub fn age_group_table(lens: &Relation, top: &TopNSet, config: &AnalysisConfig) -> Result<Relation> {
    let long = title_age_means(lens, top)?;
    let wide = unstack(
        &long,
        &["title"],
        AGE_GROUP,
        RATING_MEAN,
        Value::Float(config.fill_value),
    )
    .context("Failed to unstack age groups")?;
    debug!("Age group table: {} titles x {} columns", wide.len(), wide.num_columns());
    Ok(wide)
}

/// Mean rating by sex for every movie, indexed by `(movie_id, title)`,
/// with `diff = M - F`.
///
/// A sex with no ratings at all still gets a column of fill values so the
/// difference is always defined.
#[instrument(skip(lens, config))]
pub fn sex_pivot(lens: &Relation, config: &AnalysisConfig) -> Result<Relation> {
    let fill = Value::Float(config.fill_value);
    let mut pivoted = pivot_table(
        lens,
        &["movie_id", "title"],
        "sex",
        "rating",
        AggFunc::Mean,
        fill.clone(),
    )
    .context("Failed to pivot ratings by sex")?;

    for sex in [Sex::Female, Sex::Male] {
        if !pivoted.has_column(sex.code()) {
            warn!("No ratings from sex {}; filling its column", sex.code());
            pivoted.add_column(sex.code(), |_| fill.clone());
        }
    }

    Ok(difference(&pivoted, DIFF, Sex::Male.code(), Sex::Female.code())?)
}

/// `(movie_id, title, F, M, diff)` for the top movies, most female-leaning first
#[instrument(skip(pivoted, top), fields(top_movies = top.len()))]
pub fn sex_disagreements(pivoted: &Relation, top: &TopNSet) -> Result<Relation> {
    let scoped = FilterPipeline::new()
        .add_filter(top.clone().into_filter())
        .apply(pivoted.clone())
        .context("Failed to restrict the sex pivot to the top movies")?;
    Ok(sort_by(&scoped, &[SortKey::ascending(DIFF)])?)
}

/// Histogram of user ages over all users, rated or not
#[instrument(skip(users))]
pub fn age_histogram(users: &Relation, bins: usize) -> Result<Vec<HistogramBin>> {
    histogram_column(users, "age", bins).context("Failed to build the age histogram")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::build_lens;
    use crate::popularity::top_movies;
    use crate::test_support::sample_dataset;

    fn lens() -> Relation {
        build_lens(&sample_dataset(), &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_ratings_by_age_group() {
        let summary = ratings_by_age_group(&lens()).unwrap();
        let groups: Vec<String> = summary.column(AGE_GROUP).unwrap().map(|v| v.to_string()).collect();
        assert_eq!(groups, vec!["10-19", "20-29", "30-39", "50-59"]);
        let teens = summary.row(0).unwrap();
        assert_eq!(teens.get("rating_count"), Some(&Value::Int(2)));
        assert_eq!(teens.get("rating_mean"), Some(&Value::Float(4.5)));
    }

    #[test]
    fn test_age_group_table_fills_missing_cells() {
        let lens = lens();
        let top = top_movies(&lens, 2).unwrap();
        let table = age_group_table(&lens, &top, &AnalysisConfig::default()).unwrap();
        assert_eq!(
            table.columns(),
            &["title", "10-19", "20-29", "30-39", "50-59"].map(String::from)
        );
        assert_eq!(
            table.rows()[0],
            vec![
                Value::from("Fargo (1996)"),
                Value::Float(5.0),
                Value::Float(4.0),
                Value::Float(3.0),
                Value::Float(0.0),
            ]
        );
        // Emma is outside the top two
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_top_set_gives_empty_age_table() {
        let lens = lens();
        let top = top_movies(&lens, 0).unwrap();
        assert!(title_age_means(&lens, &top).unwrap().is_empty());
        let table = age_group_table(&lens, &top, &AnalysisConfig::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), &["title".to_string()]);
    }

    #[test]
    fn test_sex_pivot_diff() {
        let pivoted = sex_pivot(&lens(), &AnalysisConfig::default()).unwrap();
        assert_eq!(
            pivoted.columns(),
            &["movie_id", "title", "F", "M", DIFF].map(String::from)
        );
        let emma = pivoted.row(2).unwrap();
        assert_eq!(emma.get("M"), Some(&Value::Float(0.0)));
        assert_eq!(emma.get(DIFF), Some(&Value::Float(-5.0)));
    }

    #[test]
    fn test_sex_pivot_adds_missing_sex() {
        let lens = lens();
        let only_women = lens.filter(|row| row.get("sex") == Some(&Value::from("F")));
        let pivoted = sex_pivot(&only_women, &AnalysisConfig::default()).unwrap();
        let heat = pivoted.row(0).unwrap();
        assert_eq!(heat.get("M"), Some(&Value::Float(0.0)));
        assert_eq!(heat.get(DIFF), Some(&Value::Float(-2.5)));
    }

    #[test]
    fn test_disagreements_scoped_and_sorted() {
        let lens = lens();
        let top = top_movies(&lens, 2).unwrap();
        let pivoted = sex_pivot(&lens, &AnalysisConfig::default()).unwrap();
        let ranked = sex_disagreements(&pivoted, &top).unwrap();
        let diffs: Vec<&Value> = ranked.column(DIFF).unwrap().collect();
        assert_eq!(diffs, vec![&Value::Float(0.0), &Value::Float(2.0)]);
    }

    #[test]
    fn test_age_histogram_counts_every_user() {
        let dataset = sample_dataset();
        let hist = age_histogram(&dataset.users, 30).unwrap();
        assert_eq!(hist.len(), 30);
        assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), dataset.users.len());
    }
}
