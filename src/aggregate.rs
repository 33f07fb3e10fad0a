// 📊 Aggregators - group the offer table and reduce it to a small summary
//
// Grouping goes through BTreeMap so groups start in key order; the descending
// sorts are stable, which makes ties come out alphabetically.
//
// Known limitation: headcounts and cross-tab cells count distinct student_id
// per group. A student holding offers from several companies counts once per
// company, so cross-tab row sums can exceed the per-branch headcount.

use crate::record::OfferRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Default N for `top_companies` when the caller has no preference
pub const DEFAULT_TOP_N: usize = 5;

/// Default number of equal-width salary buckets
pub const DEFAULT_SALARY_BINS: usize = 12;

// ============================================================================
// SUMMARY TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelValue {
    pub label: String,
    pub value: f64,
}

/// One histogram bucket covering [lower, upper)
/// (the last bucket also includes its upper edge)
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Branch × company matrix of distinct-student counts
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrossTab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// cells[row][column]
    pub cells: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn max_cell(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

impl From<&LabelCount> for LabelValue {
    fn from(count: &LabelCount) -> Self {
        LabelValue {
            label: count.label.clone(),
            value: count.count as f64,
        }
    }
}

// ============================================================================
// AGGREGATORS
// ============================================================================

fn distinct_students_by<'a, F>(table: &'a [OfferRecord], key: F) -> Vec<LabelCount>
where
    F: Fn(&'a OfferRecord) -> &'a str,
{
    let mut groups: BTreeMap<&str, BTreeSet<i64>> = BTreeMap::new();
    for offer in table {
        groups.entry(key(offer)).or_default().insert(offer.student_id);
    }

    let mut counts: Vec<LabelCount> = groups
        .into_iter()
        .map(|(label, students)| LabelCount {
            label: label.to_string(),
            count: students.len(),
        })
        .collect();

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Distinct students placed per branch, most first
pub fn placements_per_branch(table: &[OfferRecord]) -> Vec<LabelCount> {
    distinct_students_by(table, |o| o.branch.as_str())
}

/// Mean package per branch, highest first.
///
/// Missing packages are skipped; a branch with no packages at all is omitted.
pub fn avg_package_per_branch(table: &[OfferRecord]) -> Vec<LabelValue> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for offer in table {
        if let Some(package) = offer.package_lpa.filter(|p| p.is_finite()) {
            let entry = sums.entry(offer.branch.as_str()).or_default();
            entry.0 += package;
            entry.1 += 1;
        }
    }

    let mut averages: Vec<LabelValue> = sums
        .into_iter()
        .map(|(label, (sum, n))| LabelValue {
            label: label.to_string(),
            value: sum / n as f64,
        })
        .collect();

    averages.sort_by(|a, b| b.value.total_cmp(&a.value));
    averages
}

/// The `n` companies with the most distinct students
pub fn top_companies(table: &[OfferRecord], n: usize) -> Vec<LabelCount> {
    let mut counts = distinct_students_by(table, |o| o.company_name.as_str());
    counts.truncate(n);
    counts
}

/// Bucket the non-missing packages into `bins` equal-width buckets over [min, max]
pub fn salary_distribution(table: &[OfferRecord], bins: usize) -> Histogram {
    let values: Vec<f64> = table
        .iter()
        .filter_map(|o| o.package_lpa)
        .filter(|p| p.is_finite())
        .collect();

    if values.is_empty() || bins == 0 {
        return Histogram::default();
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Single distinct value: widen to a unit range around it
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];

    for value in values {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram {
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                lower: min + width * i as f64,
                upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
                count,
            })
            .collect(),
    }
}

/// Pivot: rows = branch, columns = company, cell = distinct students, 0 when absent
pub fn branch_company_crosstab(table: &[OfferRecord]) -> CrossTab {
    let mut pairs: BTreeMap<(&str, &str), BTreeSet<i64>> = BTreeMap::new();
    let mut rows: BTreeSet<&str> = BTreeSet::new();
    let mut columns: BTreeSet<&str> = BTreeSet::new();

    for offer in table {
        let (branch, company) = (offer.branch.as_str(), offer.company_name.as_str());
        rows.insert(branch);
        columns.insert(company);
        pairs
            .entry((branch, company))
            .or_default()
            .insert(offer.student_id);
    }

    let cells: Vec<Vec<usize>> = rows
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| pairs.get(&(*r, *c)).map_or(0, BTreeSet::len))
                .collect()
        })
        .collect();

    CrossTab {
        rows: rows.into_iter().map(str::to_string).collect(),
        columns: columns.into_iter().map(str::to_string).collect(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OfferTable;
    use proptest::prelude::*;

    fn offer(student_id: i64, branch: &str, company: &str, package: Option<f64>) -> OfferRecord {
        OfferRecord {
            placement_id: None,
            student_id,
            roll_no: format!("R-{student_id}"),
            student_name: format!("Student {student_id}"),
            branch: branch.to_string(),
            cgpa: None,
            batch_year: None,
            company_name: company.to_string(),
            package_lpa: package,
            role: None,
            offer_date: None,
            offer_year: Some(2025),
        }
    }

    fn cell(tab: &CrossTab, row: &str, column: &str) -> Option<usize> {
        let r = tab.rows.iter().position(|x| x == row)?;
        let c = tab.columns.iter().position(|x| x == column)?;
        Some(tab.cells[r][c])
    }

    fn labels<T>(items: &[T], f: impl Fn(&T) -> &str) -> Vec<String> {
        items.iter().map(|i| f(i).to_string()).collect()
    }

    #[test]
    fn test_placements_per_branch_counts_distinct_students() {
        let table = vec![
            offer(1, "CS", "Acme", Some(10.0)),
            offer(1, "CS", "Globex", Some(11.0)),
            offer(2, "CS", "Acme", Some(9.0)),
            offer(3, "EE", "Acme", Some(8.0)),
        ];

        let counts = placements_per_branch(&table);
        assert_eq!(
            counts,
            vec![
                LabelCount { label: "CS".to_string(), count: 2 },
                LabelCount { label: "EE".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_avg_package_per_branch() {
        let table = vec![
            offer(1, "CS", "Acme", Some(10.0)),
            offer(2, "CS", "Acme", Some(12.0)),
            offer(3, "EE", "Acme", Some(8.0)),
        ];

        let avg = avg_package_per_branch(&table);
        assert_eq!(labels(&avg, |a| a.label.as_str()), vec!["CS", "EE"]);
        assert_eq!(avg[0].value, 11.0);
        assert_eq!(avg[1].value, 8.0);
    }

    #[test]
    fn test_avg_package_skips_missing() {
        let table = vec![
            offer(1, "CS", "Acme", Some(10.0)),
            offer(2, "CS", "Acme", None),
            offer(3, "ME", "Acme", None),
        ];

        let avg = avg_package_per_branch(&table);
        assert_eq!(avg.len(), 1);
        assert_eq!(avg[0].label, "CS");
        assert_eq!(avg[0].value, 10.0);
    }

    #[test]
    fn test_top_companies_ties() {
        let mut table = Vec::new();
        let mut id = 0;
        for (company, n) in [("A", 5), ("B", 3), ("C", 3), ("D", 1)] {
            for _ in 0..n {
                id += 1;
                table.push(offer(id, "CS", company, Some(10.0)));
            }
        }

        let top = top_companies(&table, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].label, "A");
        assert_eq!(top[0].count, 5);
        assert!(top[1].label == "B" || top[1].label == "C");
        assert_eq!(top[1].count, 3);
    }

    #[test]
    fn test_top_companies_n_larger_than_companies() {
        let table = vec![offer(1, "CS", "Acme", None)];
        assert_eq!(top_companies(&table, DEFAULT_TOP_N).len(), 1);
    }

    #[test]
    fn test_salary_distribution_bins() {
        let table: OfferTable = (0..=12)
            .map(|i| offer(i, "CS", "Acme", Some(i as f64)))
            .collect();

        let hist = salary_distribution(&table, DEFAULT_SALARY_BINS);
        assert_eq!(hist.bins.len(), 12);
        assert_eq!(hist.bins[0].lower, 0.0);
        assert_eq!(hist.bins[11].upper, 12.0);
        // max lands in the last, closed bucket
        assert_eq!(hist.bins[11].count, 2);
        assert_eq!(hist.total(), 13);
    }

    #[test]
    fn test_salary_distribution_single_value() {
        let table = vec![offer(1, "CS", "Acme", Some(7.0)), offer(2, "CS", "Acme", Some(7.0))];

        let hist = salary_distribution(&table, 4);
        assert_eq!(hist.bins.first().unwrap().lower, 6.5);
        assert_eq!(hist.bins.last().unwrap().upper, 7.5);
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn test_salary_distribution_drops_missing() {
        let table = vec![offer(1, "CS", "Acme", None), offer(2, "CS", "Acme", Some(f64::NAN))];
        assert!(salary_distribution(&table, 12).is_empty());
    }

    #[test]
    fn test_crosstab_fills_zero() {
        let table = vec![
            offer(1, "CS", "Acme", None),
            offer(2, "CS", "Globex", None),
            offer(2, "CS", "Globex", None),
            offer(3, "EE", "Acme", None),
        ];

        let tab = branch_company_crosstab(&table);
        assert_eq!(tab.rows, vec!["CS", "EE"]);
        assert_eq!(tab.columns, vec!["Acme", "Globex"]);
        assert_eq!(tab.cells, vec![vec![1, 1], vec![1, 0]]);
        assert_eq!(cell(&tab, "EE", "Globex"), Some(0));
        assert_eq!(cell(&tab, "ME", "Acme"), None);
        assert_eq!(tab.max_cell(), 1);
    }

    #[test]
    fn test_empty_table_gives_empty_summaries() {
        let table: OfferTable = Vec::new();
        assert!(placements_per_branch(&table).is_empty());
        assert!(avg_package_per_branch(&table).is_empty());
        assert!(top_companies(&table, 6).is_empty());
        assert!(salary_distribution(&table, 12).is_empty());
        assert!(branch_company_crosstab(&table).is_empty());
    }

    fn arb_table() -> impl Strategy<Value = OfferTable> {
        prop::collection::vec(
            (0i64..30, 0usize..4, 0usize..6, prop::option::of(1.0f64..60.0)),
            0..80,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(id, b, c, p)| {
                    offer(id, ["CS", "EE", "ME", "CE"][b], ["A", "B", "C", "D", "E", "F"][c], p)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_headcount_sum_covers_distinct_students(table in arb_table()) {
            let counts = placements_per_branch(&table);
            let total: usize = counts.iter().map(|c| c.count).sum();
            let distinct: BTreeSet<i64> = table.iter().map(|o| o.student_id).collect();
            prop_assert!(total >= distinct.len());
        }

        #[test]
        fn prop_top_n_bounded_and_sorted(table in arb_table(), n in 0usize..8) {
            let all = top_companies(&table, usize::MAX);
            let top = top_companies(&table, n);

            prop_assert!(top.len() <= n);
            prop_assert!(top.len() <= all.len());
            prop_assert!(top.windows(2).all(|w| w[0].count >= w[1].count));

            if let Some(last) = top.last() {
                for excluded in &all[top.len()..] {
                    prop_assert!(excluded.count <= last.count);
                }
            }
        }

        #[test]
        fn prop_crosstab_shape(table in arb_table()) {
            let tab = branch_company_crosstab(&table);
            prop_assert_eq!(tab.cells.len(), tab.rows.len());
            for row in &tab.cells {
                prop_assert_eq!(row.len(), tab.columns.len());
            }
        }

        #[test]
        fn prop_histogram_counts_every_package(table in arb_table(), bins in 1usize..20) {
            let hist = salary_distribution(&table, bins);
            let present = table.iter().filter(|o| o.package_lpa.is_some()).count();
            prop_assert_eq!(hist.total(), present);
            if present > 0 {
                prop_assert_eq!(hist.bins.len(), bins);
            }
        }
    }
}
