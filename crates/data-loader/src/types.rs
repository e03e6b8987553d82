//! Core domain types for the MovieLens 100K dataset.
//!
//! The loader works with untyped `Relation`s, but the three source tables
//! have fixed layouts. The typed records here document those layouts and
//! make it easy to build small in-memory datasets (tests, benchmarks)
//! that go through exactly the same relational pipeline as the files.

use crate::error::RelationResult;
use crate::relation::Relation;
use crate::value::Value;
use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user (1-943 in MovieLens 100K)
pub type UserId = u32;

/// Unique identifier for a movie (1-1682 in MovieLens 100K)
pub type MovieId = u32;

// =============================================================================
// Column layouts
// =============================================================================

pub const USER_COLUMNS: [&str; 5] = ["user_id", "age", "sex", "occupation", "zip_code"];

pub const RATING_COLUMNS: [&str; 4] = ["user_id", "movie_id", "rating", "unix_timestamp"];

/// Leading five fields of `u.item`; the 19 genre flags that follow are not loaded
pub const MOVIE_COLUMNS: [&str; 5] = [
    "movie_id",
    "title",
    "release_date",
    "video_release_date",
    "imdb_url",
];

// =============================================================================
// Records
// =============================================================================

/// Represents a user in the MovieLens dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Age in years
    pub age: u8,
    pub sex: Sex,
    pub occupation: String,
    pub zip_code: String,
}

/// Sex as recorded in `u.user`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// All codes accepted in the `sex` column
    pub const CODES: &'static [&'static str] = &["M", "F"];

    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Sex::Male),
            "F" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Represents a movie in the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    /// Title including the year, e.g. "Toy Story (1995)"
    pub title: String,
    /// Release date as written in the file ("01-Jan-1995"), if any
    pub release_date: Option<String>,
    pub video_release_date: Option<String>,
    pub imdb_url: Option<String>,
}

/// A single rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Whole stars, 1-5
    pub rating: u8,
    /// Unix timestamp when rating was made
    pub timestamp: i64,
}

/// A typed record that maps onto one row of a fixed-layout relation.
pub trait Record {
    /// Column names, in row order
    const COLUMNS: &'static [&'static str];

    fn to_row(&self) -> Vec<Value>;
}

impl Record for User {
    const COLUMNS: &'static [&'static str] = &USER_COLUMNS;

    fn to_row(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.age.into(),
            self.sex.code().into(),
            self.occupation.as_str().into(),
            self.zip_code.as_str().into(),
        ]
    }
}

impl Record for Movie {
    const COLUMNS: &'static [&'static str] = &MOVIE_COLUMNS;

    fn to_row(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.title.as_str().into(),
            self.release_date.clone().into(),
            self.video_release_date.clone().into(),
            self.imdb_url.clone().into(),
        ]
    }
}

impl Record for Rating {
    const COLUMNS: &'static [&'static str] = &RATING_COLUMNS;

    fn to_row(&self) -> Vec<Value> {
        vec![
            self.user_id.into(),
            self.movie_id.into(),
            self.rating.into(),
            self.timestamp.into(),
        ]
    }
}

/// Build a relation from typed records, preserving their order
pub fn to_relation<R: Record>(records: &[R]) -> RelationResult<Relation> {
    Relation::from_rows(
        R::COLUMNS.iter().copied(),
        records.iter().map(Record::to_row).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_codes() {
        assert_eq!(Sex::from_code("F"), Some(Sex::Female));
        assert_eq!(Sex::Male.code(), "M");
        assert_eq!(Sex::from_code("X"), None);
        for code in Sex::CODES {
            assert!(Sex::from_code(code).is_some());
        }
    }

    #[test]
    fn test_movie_row_keeps_missing_fields_null() {
        let movie = Movie {
            id: 267,
            title: "unknown".to_string(),
            release_date: None,
            video_release_date: None,
            imdb_url: None,
        };
        let row = movie.to_row();
        assert_eq!(row[0], Value::Int(267));
        assert!(row[2].is_null() && row[3].is_null() && row[4].is_null());
    }

    #[test]
    fn test_to_relation() {
        let ratings = vec![
            Rating { user_id: 196, movie_id: 242, rating: 3, timestamp: 881250949 },
            Rating { user_id: 186, movie_id: 302, rating: 3, timestamp: 891717742 },
        ];
        let relation = to_relation(&ratings).unwrap();
        assert_eq!(relation.columns().len(), 4);
        assert_eq!(relation.len(), 2);
        assert_eq!(relation.rows()[1][1], Value::Int(302));
    }
}
