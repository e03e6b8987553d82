//! # Data Loader Crate
//!
//! This crate loads the MovieLens 100K dataset into in-memory relations.
//!
//! ## Main Components
//!
//! - **value**: `Value`, the scalar stored in every cell
//! - **relation**: `Relation`, an ordered table of rows over named columns
//! - **types**: Typed records (User, Movie, Rating) and the fixed column layouts
//! - **parser**: Schema-driven parsing of the delimited source files
//! - **dataset**: `Dataset`, the three loaded tables
//! - **error**: Error types for loading and for relation operations
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_files(Path::new("data/ml-100k"))?;
//! let (users, ratings, movies) = dataset.counts();
//! println!("{} users rated {} movies {} times", users, movies, ratings);
//! ```

pub mod dataset;
pub mod error;
pub mod parser;
pub mod relation;
pub mod types;
pub mod value;

// Re-export commonly used types for convenience
pub use dataset::Dataset;
pub use error::{DataLoadError, RelationError, RelationResult, Result};
pub use parser::{ColumnSpec, ColumnType, Encoding, TableSpec};
pub use relation::{Relation, Row};
pub use types::{
    // Type aliases
    MovieId,
    UserId,
    // Records
    Movie,
    Rating,
    Record,
    Sex,
    User,
};
pub use value::Value;
