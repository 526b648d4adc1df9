//! Fireline ballistic calculator
//!
//! Turns a gun grid and a target grid into firing data (range, azimuth,
//! tube elevation, and time of flight) against a fixed calibrated range
//! card, and plans sheaf aim points for multi-gun firing groups.

#![warn(missing_docs)]

pub mod error;
pub mod range_card;
pub mod sheaf;
pub mod solution;

pub use error::BallisticsError;
pub use range_card::{RangeCardEntry, MAX_RANGE_M, MIN_RANGE_M, RANGE_CARD};
pub use sheaf::{aim_point, SheafPattern, Shell};
pub use solution::{
    azimuth, elevation, elevation_for_range, fire_solution, half_round, range, time_of_flight,
    time_of_flight_for_range, FireSolution,
};
