pub mod plans;
pub mod sort;

pub use plans::PayoffPlan;
pub use sort::{compare_debts, sort_debts, SortDirection, SortKey};
