// src/schema/mod.rs

pub mod docs;

use crate::dataset::SlotKind;
use crate::table::RawTable;
use std::collections::HashSet;

/// Ordered list of columns a slot's upload must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaSpec {
    pub slot: SlotKind,
    pub columns: &'static [&'static str],
}

pub const TODAY: SchemaSpec = SchemaSpec {
    slot: SlotKind::Today,
    columns: &[
        "first_category_id",
        "second_category_id",
        "third_category_id",
        "discount",
        "holiday_flag",
        "activity_flag",
        "precpt",
        "avg_temperature",
        "avg_humidity",
        "avg_wind_level",
        "stock_hour6_22_cnt",
        "hours_sale_today",
    ],
};

pub const TOMORROW: SchemaSpec = SchemaSpec {
    slot: SlotKind::Tomorrow,
    columns: &[
        "discount",
        "holiday_flag",
        "activity_flag",
        "precpt",
        "avg_temperature",
        "avg_humidity",
        "avg_wind_level",
        "dow_tomorrow",
        "month_tomorrow",
        "is_weekend",
    ],
};

impl SchemaSpec {
    pub fn for_slot(slot: SlotKind) -> &'static SchemaSpec {
        match slot {
            SlotKind::Today => &TODAY,
            SlotKind::Tomorrow => &TOMORROW,
        }
    }

    /// Header-only CSV an operator can fill in.
    pub fn template_csv(&self) -> String {
        format!("{}\n", self.columns.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub satisfied: bool,
    /// Missing names, in the schema's order.
    pub missing: Vec<String>,
}

/// Check `table` against `required`.
///
/// The first row's keys stand for the whole table; an absent or empty table
/// is missing every required column.
pub fn check(table: Option<&RawTable>, required: &SchemaSpec) -> ValidationResult {
    let first = match table.and_then(|t| t.row(0)) {
        Some(row) => row,
        None => {
            return ValidationResult {
                satisfied: false,
                missing: required.columns.iter().map(|c| c.to_string()).collect(),
            }
        }
    };

    let keys: HashSet<&str> = first.keys().map(str::trim).collect();
    let missing: Vec<String> = required
        .columns
        .iter()
        .filter(|c| !keys.contains(*c))
        .map(|c| c.to_string())
        .collect();

    ValidationResult {
        satisfied: missing.is_empty(),
        missing,
    }
}
