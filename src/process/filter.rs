use csv::StringRecord;
use std::collections::HashSet;

use crate::process::utils::clean_str;
use crate::schema::{
    CATEGORY_COLUMN, KEEP_SORT_CRITERIA, KEEP_WAREHOUSES, SORT_CRITERION_COLUMN,
    WAREHOUSE_COLUMN,
};

/// Keeps rows from the allowed warehouses that are either in the beauty
/// category or carry one of the beauty sort criteria.
#[derive(Debug, Clone)]
pub struct RowFilter {
    warehouses: HashSet<&'static str>,
    sort_criteria: HashSet<&'static str>,
    warehouse_idx: Option<usize>,
    category_idx: Option<usize>,
    sort_criterion_idx: Option<usize>,
}

impl RowFilter {
    /// Resolve the filter columns against the export's header row.
    /// A column the export lacks reads as empty for every row.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            warehouses: KEEP_WAREHOUSES.into_iter().collect(),
            sort_criteria: KEEP_SORT_CRITERIA.into_iter().collect(),
            warehouse_idx: find(WAREHOUSE_COLUMN),
            category_idx: find(CATEGORY_COLUMN),
            sort_criterion_idx: find(SORT_CRITERION_COLUMN),
        }
    }

    /// True when all three filter columns were found in the header.
    pub fn has_all_columns(&self) -> bool {
        self.warehouse_idx.is_some()
            && self.category_idx.is_some()
            && self.sort_criterion_idx.is_some()
    }

    pub fn keep(&self, record: &StringRecord) -> bool {
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(clean_str)
                .unwrap_or_default()
        };
        let warehouse = field(self.warehouse_idx);
        let category = field(self.category_idx);
        let sort_criterion = field(self.sort_criterion_idx);

        matches(
            &self.warehouses,
            &self.sort_criteria,
            &warehouse,
            &category,
            &sort_criterion,
        )
    }
}

/// The predicate itself, on already-trimmed values.
pub fn matches(
    warehouses: &HashSet<&str>,
    sort_criteria: &HashSet<&str>,
    warehouse: &str,
    category: &str,
    sort_criterion: &str,
) -> bool {
    warehouses.contains(warehouse)
        && (category.to_lowercase() == "beauty" || sort_criteria.contains(sort_criterion))
}
