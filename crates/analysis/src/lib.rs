//! # Analysis Crate
//!
//! The descriptive questions asked of MovieLens 100K, each as a named query
//! over the joined ratings view.
//!
//! ## Components
//!
//! ### Lens
//! Movies ⋈ Ratings ⋈ Users with an `age_group` label per rating.
//!
//! ### Popularity
//! - Most rated titles
//! - Highest rated titles among those with enough ratings
//! - The top movie set that scopes the demographic tables
//!
//! ### Demographics
//! - Rating count and mean per age group
//! - Title × age group mean ratings for the top movies
//! - Mean rating by sex with the `M - F` difference, and the top movies
//!   ranked by it
//! - Histogram of user ages
//!
//! ## Example Usage
//!
//! ```ignore
//! use analysis::{AnalysisConfig, Report};
//! use data_loader::Dataset;
//!
//! let dataset = Dataset::load_from_files(Path::new("data/ml-100k"))?;
//! let config = AnalysisConfig::default().with_top_movies(50);
//! let report = Report::build(&dataset, &config)?;
//! println!("{} titles ranked", report.highest_rated.len());
//! ```

pub mod config;
pub mod demographics;
pub mod lens;
pub mod popularity;
pub mod report;

pub use config::AnalysisConfig;
pub use demographics::{
    DIFF, age_group_table, age_histogram, ratings_by_age_group, sex_disagreements, sex_pivot,
    title_age_means,
};
pub use lens::{AGE_GROUP, age_group_mapping, build_lens, join_lens};
pub use popularity::{RATING_COUNT, RATING_MEAN, highest_rated, most_rated, title_stats, top_movies};
pub use report::Report;

#[cfg(test)]
pub(crate) mod test_support {
    use data_loader::{Dataset, Movie, Rating, Sex, User};

    pub fn sample_dataset() -> Dataset {
        let users = [
            (1, 17, Sex::Male),
            (2, 25, Sex::Female),
            (3, 34, Sex::Male),
            (4, 52, Sex::Female),
            (5, 85, Sex::Male),
        ]
        .map(|(id, age, sex)| User {
            id,
            age,
            sex,
            occupation: "other".to_string(),
            zip_code: "00000".to_string(),
        });
        let movies = [(1, "Heat (1995)"), (2, "Fargo (1996)"), (3, "Emma (1996)")].map(|(id, title)| {
            Movie {
                id,
                title: title.to_string(),
                release_date: None,
                video_release_date: None,
                imdb_url: None,
            }
        });
        let ratings = [
            (1, 1, 4),
            (2, 1, 2),
            (3, 1, 5),
            (4, 1, 3),
            (1, 2, 5),
            (2, 2, 4),
            (3, 2, 3),
            (2, 3, 5),
            (4, 3, 5),
            // No such movie
            (5, 404, 1),
        ]
        .map(|(user_id, movie_id, rating)| Rating {
            user_id,
            movie_id,
            rating,
            timestamp: 881250949,
        });
        Dataset::from_records(&users, &ratings, &movies).unwrap()
    }
}
