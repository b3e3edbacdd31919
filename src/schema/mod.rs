pub mod layout;
pub mod types;

pub use layout::{layout_for, pm25_subsume_date, union_columns};
pub use types::{HourLabel, Pollutant, Reading, Region};
