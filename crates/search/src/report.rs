use std::fmt;

use crate::search::level_size;
use crate::SearchResult;

/// Thousands-separates an integer for display.
struct LargeFormatter<T: ToString>(T);

impl<T: ToString> fmt::Display for LargeFormatter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let len = digits.len();
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                write!(f, ",")?;
            }
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

fn energy_cell(energy: u64) -> String {
    if energy == u64::MAX {
        "-".to_string()
    } else {
        format!("{}", LargeFormatter(energy))
    }
}

/// A right-aligned, fixed-width rendering of a [SearchResult] as `Atoms | Minimal
/// Energy | Total Crystals | Optimal Crystals`, one row per population size in
/// `[lower, upper]`. Produces a `String` only; writing it anywhere is the caller's
/// concern.
pub struct Report<'a>(pub &'a SearchResult);

const HEADERS: [&str; 4] = ["Atoms", "Minimal Energy", "Total Crystals", "Optimal Crystals"];

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let rows: Vec<[String; 4]> = (0..result.energies.len())
            .map(|d| {
                [
                    format!("{}", level_size(result.seed_size, result.growing, d)),
                    energy_cell(result.energies[d]),
                    format!("{}", LargeFormatter(result.counts[d])),
                    format!("{}", LargeFormatter(result.opt_counts[d])),
                ]
            })
            .collect();

        let mut widths = [0usize; 4];
        for (i, header) in HEADERS.iter().enumerate() {
            widths[i] = header.len();
        }
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        for (i, header) in HEADERS.iter().enumerate() {
            write!(f, "{:>width$}", header, width = widths[i])?;
            if i + 1 < HEADERS.len() {
                write!(f, " | ")?;
            }
        }
        writeln!(f)?;

        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                write!(f, "{:>width$}", cell, width = widths[i])?;
                if i + 1 < row.len() {
                    write!(f, " | ")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crystal_graph::Lattice;
    use crystal_graph::UniformNeighborhood;

    use super::*;

    fn sample_result() -> SearchResult {
        SearchResult {
            lower: 0,
            upper: 2,
            seed_size: 0,
            growing: true,
            energies: vec![0, 4, u64::MAX],
            counts: vec![1, 1, 0],
            opt_counts: vec![1, 1, 0],
            crystals: None,
            lattice: Lattice::new(UniformNeighborhood::square()),
        }
    }

    fn shrinking_result() -> SearchResult {
        SearchResult {
            lower: 0,
            upper: 2,
            seed_size: 2,
            growing: false,
            energies: vec![8, 4, 0],
            counts: vec![1, 1, 1],
            opt_counts: vec![1, 1, 1],
            crystals: None,
            lattice: Lattice::new(UniformNeighborhood::square()),
        }
    }

    #[test]
    fn test_shrinking_result_labels_seed_row_with_seed_size_not_lower() {
        let result = shrinking_result();
        let text = format!("{}", Report(&result));
        let lines: Vec<&str> = text.lines().collect();
        // d=0 is the seed (population 2, energy 8), not "0" as `lower + d` would print.
        assert!(lines[1].trim_start().starts_with('2'));
        assert!(lines[1].contains('8'));
        // d=2 is the fully-shrunk empty crystal (population 0, energy 0).
        assert!(lines[3].trim_start().starts_with('0'));
    }

    #[test]
    fn test_report_contains_a_header_row_and_one_row_per_level() {
        let result = sample_result();
        let text = format!("{}", Report(&result));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4); // header + 3 levels
        assert!(lines[0].contains("Atoms"));
    }

    #[test]
    fn test_unreached_level_renders_as_a_dash() {
        let result = sample_result();
        let text = format!("{}", Report(&result));
        assert!(text.lines().last().unwrap().trim_start().starts_with('2'));
        assert!(text.contains('-'));
    }

    #[test]
    fn test_large_counts_are_thousands_separated() {
        let mut result = sample_result();
        result.counts[0] = 1_234_567;
        let text = format!("{}", Report(&result));
        assert!(text.contains("1,234,567"));
    }
}
