//! ICS parsing and generation.

mod generate;
mod parse;

pub use generate::{PRODUCER_COMMENT, generate_ics};
pub use parse::parse_calendar;
