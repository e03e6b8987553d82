//! Console rendering of query results.

use anyhow::{Context, Result};
use colored::Colorize;
use data_loader::{Relation, Value};
use pipeline::HistogramBin;
use serde_json::json;

const BAR_WIDTH: usize = 50;

/// Fixed-point for floats so columns line up
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Float(v) => format!("{:.2}", v),
        other => other.to_string(),
    }
}

/// Aligned table with a bold header; numbers are right-aligned
pub fn print_table(title: &str, relation: &Relation) {
    println!("\n{}", title.bold().blue());
    if relation.is_empty() {
        println!("{}", "(no rows)".dimmed());
        return;
    }

    let cells: Vec<Vec<String>> = relation
        .rows()
        .iter()
        .map(|row| row.iter().map(format_cell).collect())
        .collect();
    let widths: Vec<usize> = relation
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let numeric: Vec<bool> = (0..relation.num_columns())
        .map(|i| {
            relation
                .rows()
                .iter()
                .all(|row| matches!(row[i], Value::Int(_) | Value::Float(_) | Value::Null))
        })
        .collect();

    let header: Vec<String> = relation
        .columns()
        .iter()
        .zip(&widths)
        .map(|(name, &w)| format!("{:<w$}", name, w = w))
        .collect();
    println!("{}", header.join("  ").bold());
    println!("{}", widths.iter().map(|&w| "-".repeat(w)).collect::<Vec<_>>().join("  "));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if numeric[i] {
                    format!("{:>w$}", cell, w = widths[i])
                } else {
                    format!("{:<w$}", cell, w = widths[i])
                }
            })
            .collect();
        println!("{}", line.join("  "));
    }
    println!("{}", format!("{} rows", relation.len()).dimmed());
}

pub fn print_json(relation: &Relation) -> Result<()> {
    let text = serde_json::to_string_pretty(&relation.records()).context("Failed to serialize rows")?;
    println!("{}", text);
    Ok(())
}

pub fn histogram_json(bins: &[HistogramBin]) -> serde_json::Value {
    json!(bins
        .iter()
        .map(|b| json!({ "lower": b.lower, "upper": b.upper, "count": b.count }))
        .collect::<Vec<_>>())
}

/// Horizontal bars, one per histogram bin
pub fn print_histogram(title: &str, bins: &[HistogramBin]) {
    println!("\n{}", title.bold().blue());
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0);
    if max == 0 {
        println!("{}", "(no values)".dimmed());
        return;
    }
    for bin in bins {
        let len = bin.count * BAR_WIDTH / max;
        println!(
            "{:>6.1} - {:<6.1} {} {}",
            bin.lower,
            bin.upper,
            "█".repeat(len).green(),
            bin.count
        );
    }
}

/// Diverging bars for a signed column; negative values in red, positive in blue
pub fn print_diverging(title: &str, relation: &Relation, label: &str, column: &str) -> Result<()> {
    println!("\n{}", title.bold().blue());
    let labels: Vec<String> = relation.column(label)?.map(|v| v.to_string()).collect();
    let values: Vec<f64> = relation
        .column(column)?
        .map(|v| v.as_f64().unwrap_or(0.0))
        .collect();
    let max = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max == 0.0 {
        println!("{}", "(no differences)".dimmed());
        return Ok(());
    }

    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let half = BAR_WIDTH / 2;
    for (name, value) in labels.iter().zip(&values) {
        let len = ((value.abs() / max) * half as f64).round() as usize;
        let (left, right) = if *value < 0.0 {
            (
                format!("{:>w$}", "█".repeat(len), w = half).red(),
                " ".repeat(half).normal(),
            )
        } else {
            (
                " ".repeat(half).normal(),
                format!("{:<w$}", "█".repeat(len), w = half).blue(),
            )
        };
        println!("{:<lw$} {}|{} {:+.2}", name, left, right, value, lw = label_width);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&Value::Float(3.14159)), "3.14");
        assert_eq!(format_cell(&Value::Int(7)), "7");
        assert_eq!(format_cell(&Value::Null), "");
        assert_eq!(format_cell(&Value::from("Heat (1995)")), "Heat (1995)");
    }

    #[test]
    fn test_histogram_json_shape() {
        let bins = [HistogramBin { lower: 0.0, upper: 10.0, count: 3 }];
        let value = histogram_json(&bins);
        assert_eq!(value[0]["count"], 3);
        assert_eq!(value[0]["upper"], 10.0);
    }
}
