//!  Storage is organized through [counter_storage::JsonCounterStorage].
//!  The basic idea is:
//!   - All learning time lives in one JSON file mapping ISO dates to activity units.
//!   - The file is read once at startup and rewritten as a whole after every tick.
//!   - Unreadable content never stops the daemon, it's moved aside and tracking starts over.

pub mod counter_storage;
pub mod entities;
