//! Loading the three MovieLens tables into memory.
//!
//! A `Dataset` owns the users, ratings and movies relations exactly as
//! parsed. It does no validation beyond what the table layouts enforce:
//! dangling foreign keys simply drop out of later inner joins.

use crate::error::{RelationResult, Result};
use crate::parser::{self, TableSpec};
use crate::relation::Relation;
use crate::types::{Movie, Rating, User, to_relation};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Dataset {
    pub users: Relation,
    pub ratings: Relation,
    pub movies: Relation,
}

impl Dataset {
    /// Load `u.user`, `u.data` and `u.item` from a MovieLens 100K directory.
    ///
    /// The three files are parsed in parallel; a failure in any of them
    /// aborts the load and is returned with the file name and line.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading MovieLens dataset from {}", data_dir.display());

        let users_spec = TableSpec::users();
        let ratings_spec = TableSpec::ratings();
        let movies_spec = TableSpec::movies();

        let users_path = data_dir.join(users_spec.file_name);
        let ratings_path = data_dir.join(ratings_spec.file_name);
        let movies_path = data_dir.join(movies_spec.file_name);

        // Rayon's `join` runs two closures in parallel; nesting gives three-way parallelism
        let ((users, ratings), movies) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_table(&users_path, &users_spec),
                    || parser::parse_table(&ratings_path, &ratings_spec),
                )
            },
            || parser::parse_table(&movies_path, &movies_spec),
        );

        let dataset = Self {
            users: users?,
            ratings: ratings?,
            movies: movies?,
        };

        let (users, ratings, movies) = dataset.counts();
        info!(
            "Loaded {} users, {} ratings, {} movies",
            users, ratings, movies
        );
        Ok(dataset)
    }

    /// Build a dataset from typed records (fixtures, synthetic benchmarks)
    pub fn from_records(users: &[User], ratings: &[Rating], movies: &[Movie]) -> RelationResult<Self> {
        debug!(
            "Building dataset from {} users, {} ratings, {} movies",
            users.len(),
            ratings.len(),
            movies.len()
        );
        Ok(Self {
            users: to_relation(users)?,
            ratings: to_relation(ratings)?,
            movies: to_relation(movies)?,
        })
    }

    /// Row counts as (users, ratings, movies)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.users.len(), self.ratings.len(), self.movies.len())
    }
}
