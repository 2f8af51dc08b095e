mod options;
mod presets;
mod selector;

pub use options::{distinct_periods, PeriodOption};
pub use presets::{end_of_month, start_of_month, DateRange, Preset};
pub use selector::{PeriodSelector, SelectorState};
