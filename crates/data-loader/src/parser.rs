//! Parser for MovieLens 100K data files.
//!
//! Every source file is described by a `TableSpec`: a delimiter, a text
//! encoding and the ordered list of columns with their declared types.
//! Parsing never infers types. A record is accepted when it has at least as
//! many fields as the layout has columns; extra trailing fields are ignored
//! (this is how only the leading five fields of `u.item` are kept).
//!
//! - u.user: user_id|age|sex|occupation|zip_code
//! - u.data: user_id\tmovie_id\trating\tunix_timestamp
//! - u.item: movie_id|title|release_date|video_release_date|imdb_url|<19 genre flags>

use crate::error::{DataLoadError, Result};
use crate::relation::Relation;
use crate::types::{MOVIE_COLUMNS, RATING_COLUMNS, Sex, USER_COLUMNS};
use crate::value::Value;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Str,
    /// A string where an empty field means "missing"
    OptionalStr,
    /// A string restricted to a fixed set of labels
    Category(&'static [&'static str]),
}

/// Text encoding of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// ISO-8859-1: every byte maps directly to the code point of the same value
    Latin1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub ty: ColumnType,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self { name, ty }
    }
}

/// Fixed layout of one delimited source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Name used in error messages and to locate the file in a data directory
    pub file_name: &'static str,
    pub delimiter: char,
    pub encoding: Encoding,
    pub columns: Vec<ColumnSpec>,
}

impl TableSpec {
    /// Layout of `u.user`
    pub fn users() -> Self {
        let types = [
            ColumnType::Int,
            ColumnType::Int,
            ColumnType::Category(Sex::CODES),
            ColumnType::Str,
            ColumnType::Str,
        ];
        Self::with_columns("u.user", '|', Encoding::Utf8, &USER_COLUMNS, &types)
    }

    /// Layout of `u.data`
    pub fn ratings() -> Self {
        let types = [ColumnType::Int; 4];
        Self::with_columns("u.data", '\t', Encoding::Utf8, &RATING_COLUMNS, &types)
    }

    /// Layout of `u.item`, restricted to its leading five fields
    pub fn movies() -> Self {
        let types = [
            ColumnType::Int,
            ColumnType::Str,
            ColumnType::OptionalStr,
            ColumnType::OptionalStr,
            ColumnType::OptionalStr,
        ];
        Self::with_columns("u.item", '|', Encoding::Latin1, &MOVIE_COLUMNS, &types)
    }

    fn with_columns(
        file_name: &'static str,
        delimiter: char,
        encoding: Encoding,
        names: &[&'static str],
        types: &[ColumnType],
    ) -> Self {
        Self {
            file_name,
            delimiter,
            encoding,
            columns: names
                .iter()
                .zip(types)
                .map(|(&name, &ty)| ColumnSpec::new(name, ty))
                .collect(),
        }
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

/// Read and parse one file according to `spec`
pub fn parse_table(path: &Path, spec: &TableSpec) -> Result<Relation> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let lines = decode_lines(&bytes, spec)?;
    parse_lines(lines.iter().map(String::as_str), spec)
}

/// Parse already-decoded text according to `spec`
pub fn parse_str(content: &str, spec: &TableSpec) -> Result<Relation> {
    parse_lines(content.split('\n'), spec)
}

/// Split raw bytes into lines and decode each one.
///
/// Decoding per line lets a UTF-8 failure report the offending line.
fn decode_lines(bytes: &[u8], spec: &TableSpec) -> Result<Vec<String>> {
    bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .map(|(idx, raw)| match spec.encoding {
            Encoding::Latin1 => Ok(raw.iter().map(|&b| b as char).collect()),
            Encoding::Utf8 => String::from_utf8(raw.to_vec()).map_err(|e| {
                DataLoadError::ParseError {
                    file: spec.file_name.to_string(),
                    line: idx + 1,
                    reason: format!("Invalid UTF-8: {}", e),
                }
            }),
        })
        .collect()
}

fn parse_lines<'a>(lines: impl Iterator<Item = &'a str>, spec: &TableSpec) -> Result<Relation> {
    let mut relation = Relation::new(spec.column_names())?;
    let expected = spec.columns.len();

    for (idx, line) in lines.enumerate() {
        let line_no = idx + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue; // Skip empty lines
        }

        let fields: Vec<&str> = line.split(spec.delimiter).collect();
        if fields.len() < expected {
            return Err(DataLoadError::FieldCountMismatch {
                file: spec.file_name.to_string(),
                expected,
                found: fields.len(),
                line: line_no,
            });
        }

        let row = spec
            .columns
            .iter()
            .zip(&fields)
            .map(|(column, raw)| parse_field(raw, column, spec, line_no))
            .collect::<Result<Vec<Value>>>()?;
        relation.push_row(row)?;
    }

    Ok(relation)
}

fn parse_field(raw: &str, column: &ColumnSpec, spec: &TableSpec, line: usize) -> Result<Value> {
    let error = |reason: String| DataLoadError::ParseError {
        file: spec.file_name.to_string(),
        line,
        reason,
    };

    match column.ty {
        ColumnType::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| error(format!("Invalid {}: {:?} ({})", column.name, raw, e))),
        ColumnType::Str => Ok(Value::Str(raw.to_string())),
        ColumnType::OptionalStr => Ok(if raw.is_empty() {
            Value::Null
        } else {
            Value::Str(raw.to_string())
        }),
        ColumnType::Category(labels) => {
            if labels.contains(&raw) {
                Ok(Value::Str(raw.to_string()))
            } else {
                Err(error(format!(
                    "Invalid {}: {:?} (expected one of {:?})",
                    column.name, raw, labels
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users() {
        let content = "1|24|M|technician|85711\n2|53|F|other|94043\n\n";
        let users = parse_str(content, &TableSpec::users()).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users.columns()[2], "sex");
        assert_eq!(users.rows()[1][1], Value::Int(53));
        assert_eq!(users.rows()[1][2], Value::from("F"));
        assert_eq!(users.rows()[0][4], Value::from("85711"));
    }

    #[test]
    fn test_parse_ratings_tab_delimited() {
        let content = "196\t242\t3\t881250949\r\n186\t302\t3\t891717742\r\n";
        let ratings = parse_str(content, &TableSpec::ratings()).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings.rows()[0][3], Value::Int(881250949));
    }

    #[test]
    fn test_movies_keep_leading_columns_only() {
        let content = "1|Toy Story (1995)|01-Jan-1995||http://us.imdb.com/M/title-exact?Toy%20Story%20(1995)|0|0|0|1|1|1|0|0|0|0|0|0|0|0|0|0|0|0|0\n\
                       267|unknown||||1|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0\n";
        let movies = parse_str(content, &TableSpec::movies()).unwrap();
        assert_eq!(movies.num_columns(), 5);
        assert_eq!(movies.rows()[0][1], Value::from("Toy Story (1995)"));
        assert_eq!(movies.rows()[0][2], Value::from("01-Jan-1995"));
        assert!(movies.rows()[0][3].is_null());
        assert!(movies.rows()[1][2].is_null());
        assert!(movies.rows()[1][4].is_null());
    }

    #[test]
    fn test_short_record_reports_line() {
        let content = "1|24|M|technician|85711\n2|53|F\n";
        let err = parse_str(content, &TableSpec::users()).unwrap_err();
        match err {
            DataLoadError::FieldCountMismatch { file, expected, found, line } => {
                assert_eq!(file, "u.user");
                assert_eq!(expected, 5);
                assert_eq!(found, 3);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_integer_is_parse_error() {
        let content = "196\t242\tthree\t881250949\n";
        let err = parse_str(content, &TableSpec::ratings()).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::ParseError { ref file, line: 1, .. } if file == "u.data"
        ));
        assert!(err.to_string().contains("rating"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = parse_str("1|24|X|technician|85711\n", &TableSpec::users()).unwrap_err();
        assert!(err.to_string().contains("sex"));
    }

    #[test]
    fn test_latin1_decoding() {
        let spec = TableSpec::movies();
        let mut bytes = b"1|Cit".to_vec();
        bytes.push(0xE9); // 'é' in ISO-8859-1
        bytes.extend_from_slice(b" (1995)|||\n");
        let lines = decode_lines(&bytes, &spec).unwrap();
        assert_eq!(lines[0], "1|Cité (1995)|||");
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let spec = TableSpec::users();
        let bytes = b"1|24|M|technician|85711\n2|53|F|oth\xFFer|94043\n";
        let err = decode_lines(bytes, &spec).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_table(Path::new("/definitely/not/here/u.user"), &TableSpec::users())
            .unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
