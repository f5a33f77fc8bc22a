pub mod aggregate;

pub use aggregate::{build_schedule, DebtSchedule, PortfolioSchedule, ScheduleConfig};
