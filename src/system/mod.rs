//! System-level modules
//!
//! Process-wide setup that is shared by every execution mode.

pub mod logging;
