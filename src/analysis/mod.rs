pub mod calendar;
pub mod grouping;


pub use calendar::{dates_of_year, CalendarCell, TimeFields};
pub use grouping::{group_values, pivot, PivotTable};
