//! Calorie-goal evaluation: goal suggestion, daily status, per-day totals and
//! the monthly badge. Everything here is pure; handlers load the data.

pub mod aggregate;
pub mod badge;
pub mod goal;
pub mod status;
