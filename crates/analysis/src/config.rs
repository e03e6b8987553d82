//! Knobs shared by every query.

use anyhow::{Context, Result};
use pipeline::Bins;

/// Limits and binning used by the analysis queries.
///
/// `Default` lists the 25 most rated titles and the 15 best titles among
/// those with at least 100 ratings, scopes the wide tables to the 50 most
/// rated movies, and uses decade age groups up to 80 with a 30-bin age
/// histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub most_rated_limit: usize,
    pub highest_rated_limit: usize,
    pub min_ratings: usize,
    pub top_movies: usize,
    pub age_start: i64,
    pub age_end: i64,
    pub age_width: i64,
    pub histogram_bins: usize,
    /// Cell value for combinations missing from a wide table
    pub fill_value: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            most_rated_limit: 25,
            highest_rated_limit: 15,
            min_ratings: 100,
            top_movies: 50,
            age_start: 0,
            age_end: 80,
            age_width: 10,
            histogram_bins: 30,
            fill_value: 0.0,
        }
    }
}

impl AnalysisConfig {
    /// Number of titles in the most-rated listing (default: 25)
    pub fn with_most_rated_limit(mut self, limit: usize) -> Self {
        self.most_rated_limit = limit;
        self
    }

    /// Number of titles in the highest-rated listing (default: 15)
    pub fn with_highest_rated_limit(mut self, limit: usize) -> Self {
        self.highest_rated_limit = limit;
        self
    }

    /// Ratings a title needs before its mean is ranked (default: 100)
    pub fn with_min_ratings(mut self, min: usize) -> Self {
        self.min_ratings = min;
        self
    }

    /// Size of the most-rated movie set that scopes the wide tables (default: 50)
    pub fn with_top_movies(mut self, n: usize) -> Self {
        self.top_movies = n;
        self
    }

    /// Age partition `[start, end)` in steps of `width` (default: 0..80 by 10)
    pub fn with_age_bins(mut self, start: i64, end: i64, width: i64) -> Self {
        self.age_start = start;
        self.age_end = end;
        self.age_width = width;
        self
    }

    /// Bars in the user age histogram (default: 30)
    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    pub fn with_fill_value(mut self, fill: f64) -> Self {
        self.fill_value = fill;
        self
    }

    pub fn age_bins(&self) -> Result<Bins> {
        Bins::uniform(self.age_start, self.age_end, self.age_width).with_context(|| {
            format!(
                "Invalid age bins {}..{} step {}",
                self.age_start, self.age_end, self.age_width
            )
        })
    }
}
