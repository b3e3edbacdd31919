// src/schema/layout.rs
//
// The published table changed shape mid-range: before 2014-04-01 the site
// reported a separate PM2.5 sub-index block; from that date on PM2.5 is
// folded into the PSI computation and the block is gone. Which layout
// applies is a function of the reading's date, never of the table shape.

use chrono::NaiveDate;

use super::types::Pollutant;

const PRE_SUBSUME: &[Pollutant] = &[Pollutant::Psi, Pollutant::Pm25];
const POST_SUBSUME: &[Pollutant] = &[Pollutant::Psi];

/// First date on which PM2.5 was subsumed into PSI.
pub fn pm25_subsume_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 4, 1).expect("cutoff date is valid")
}

/// Pollutant columns in force on `date`, in published block order.
pub fn layout_for(date: NaiveDate) -> &'static [Pollutant] {
    if date < pm25_subsume_date() {
        PRE_SUBSUME
    } else {
        POST_SUBSUME
    }
}

/// Union of both layouts: the consolidated dataset's column set.
pub fn union_columns() -> &'static [Pollutant] {
    PRE_SUBSUME
}
