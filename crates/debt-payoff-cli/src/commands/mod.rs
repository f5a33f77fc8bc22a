pub mod plans;
pub mod schedule;
pub mod terms;
