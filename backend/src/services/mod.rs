pub mod attendance;
pub mod calendar;
pub mod classifier;
pub mod grouping;
pub mod punch;
pub mod session;
pub mod statistics;
