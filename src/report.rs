use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::once;
use tracing::warn;

use crate::catalog::{Catalog, TOTAL_KEY};
use crate::error::InvalidStateError;
use crate::model::objective_value;
use crate::solver::SolverResult;

pub const FAILURE_MESSAGE: &str = "optimization failed";

/// Tolerance between the recomputed revenue and the solver's own objective
const OBJECTIVE_TOLERANCE: f64 = 1e-6;

/// Human-readable account of a run, one line per catalog item on success
pub fn describe(result: &SolverResult, catalog: &Catalog) -> String {
    let Some(assignment) = result.assignment() else {
        return FAILURE_MESSAGE.to_string();
    };

    let revenue = objective_value(catalog, &assignment.counts);
    if (revenue - assignment.objective).abs() > OBJECTIVE_TOLERANCE {
        warn!(
            recomputed = revenue,
            reported = assignment.objective,
            "recomputed revenue differs from the solver objective"
        );
    }

    once(format!("optimization successful, total revenue = {revenue}"))
        .chain(catalog.iter().zip(&assignment.counts).map(|(item, count)| {
            if item.is_empty_slot() {
                format!("{count} slots left unassigned")
            } else {
                format!("item {} assigned {count} slots", item.name)
            }
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    #[serde(rename = "movie")]
    pub item_name: String,
    #[serde(rename = "num_screens")]
    pub assigned_count: u32,
    pub revenue: f64,
    pub cost: f64,
}

/// Per-item allocation in catalog order, followed by a totals row keyed [`TOTAL_KEY`]
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationTable {
    pub rows: Vec<AllocationRow>,
    pub total: AllocationRow,
}

impl AllocationTable {
    /// Item rows then the totals row
    pub fn iter(&self) -> impl Iterator<Item = &AllocationRow> {
        self.rows.iter().chain(once(&self.total))
    }
}

impl Serialize for AllocationTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl fmt::Display for AllocationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .iter()
            .map(|row| row.item_name.len())
            .max()
            .unwrap_or(0)
            .max("movie".len());
        writeln!(
            f,
            "{:<width$}  {:>11}  {:>12}  {:>12}",
            "movie", "num_screens", "revenue", "cost"
        )?;
        for row in self.iter() {
            writeln!(
                f,
                "{:<width$}  {:>11}  {:>12}  {:>12}",
                row.item_name, row.assigned_count, row.revenue, row.cost
            )?;
        }
        Ok(())
    }
}

/// Tabulate a feasible result. Infeasible runs have no allocation.
pub fn build_table(
    result: &SolverResult,
    catalog: &Catalog,
) -> Result<AllocationTable, InvalidStateError> {
    let assignment = result.assignment().ok_or(InvalidStateError)?;

    let rows: Vec<AllocationRow> = catalog
        .iter()
        .zip(&assignment.counts)
        .map(|(item, &count)| AllocationRow {
            item_name: item.name.clone(),
            assigned_count: count,
            revenue: f64::from(count) * item.revenue_per_slot,
            cost: f64::from(count) * item.cost_per_slot,
        })
        .collect();

    let total = rows.iter().fold(
        AllocationRow {
            item_name: TOTAL_KEY.to_string(),
            assigned_count: 0,
            revenue: 0.0,
            cost: 0.0,
        },
        |mut total, row| {
            total.assigned_count += row.assigned_count;
            total.revenue += row.revenue;
            total.cost += row.cost;
            total
        },
    );

    Ok(AllocationTable { rows, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::solver::SolveStatus;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![CatalogItem::new("A", 10.0, 2.0), CatalogItem::new("B", 8.0, 1.0)],
            0.5,
        )
        .unwrap()
    }

    #[test]
    fn describes_failure_with_fixed_text() {
        let result = SolverResult::failed(SolveStatus::Infeasible);
        assert_eq!(describe(&result, &catalog()), FAILURE_MESSAGE);
    }

    #[test]
    fn describes_each_item_in_catalog_order() {
        let result = SolverResult::optimal(vec![3, 1, 1], 38.0);
        let expected = "optimization successful, total revenue = 38\n\
                        item A assigned 3 slots\n\
                        item B assigned 1 slots\n\
                        1 slots left unassigned";
        assert_eq!(describe(&result, &catalog()), expected);
    }

    #[test]
    fn table_for_infeasible_run_is_invalid() {
        for status in [
            SolveStatus::Infeasible,
            SolveStatus::Unbounded,
            SolveStatus::Error("stopped".into()),
        ] {
            let result = SolverResult::failed(status);
            assert_eq!(build_table(&result, &catalog()), Err(InvalidStateError));
        }
    }

    #[test]
    fn totals_row_sums_every_item() {
        let result = SolverResult::optimal(vec![3, 1, 1], 38.0);
        let table = build_table(&result, &catalog()).unwrap();

        let names: Vec<&str> = table.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "empty", "total"]);

        assert_eq!(table.rows[0].revenue, 30.0);
        assert_eq!(table.rows[0].cost, 6.0);
        assert_eq!(table.rows[2].revenue, 0.0);
        assert_eq!(table.rows[2].cost, 0.5);

        assert_eq!(table.total.assigned_count, 5);
        assert_eq!(table.total.revenue, table.rows.iter().map(|r| r.revenue).sum::<f64>());
        assert_eq!(table.total.cost, table.rows.iter().map(|r| r.cost).sum::<f64>());
        assert_eq!(table.total.revenue, 38.0);
        assert_eq!(table.total.cost, 7.5);
    }

    #[test]
    fn table_serializes_with_output_columns() {
        let result = SolverResult::optimal(vec![3, 1, 1], 38.0);
        let table = build_table(&result, &catalog()).unwrap();
        let yaml = serde_yaml::to_string(&table).unwrap();

        let rows: Vec<AllocationRow> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.last(), Some(&table.total));
        assert!(yaml.contains("movie: total"));
        assert!(yaml.contains("num_screens: 5"));
    }

    #[test]
    fn renders_table_as_text() {
        let result = SolverResult::optimal(vec![3, 1, 1], 38.0);
        let text = build_table(&result, &catalog()).unwrap().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("movie"));
        assert!(lines[4].starts_with("total"));
    }
}
