mod in_flight;
mod time;

pub use in_flight::*;
pub use time::*;
