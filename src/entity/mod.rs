pub mod house;
pub mod offender;

pub use house::{burgle_probability, House, HouseUpdate};
pub use offender::{decide, roulette_select, Decision, Offender};
