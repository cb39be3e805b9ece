//! Background tracker of daily learning time.
//! The daemon converts time elapsed since it started into 10 minute units and stores them per day
//! in a flat JSON file, which feeds a contribution style calendar. The cli controls the daemon and
//! prints stored days.
//!

pub mod cli;
pub mod daemon;
pub mod fs;
pub mod utils;
