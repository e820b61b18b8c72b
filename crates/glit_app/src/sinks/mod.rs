//! Result sinks: everything that turns a report into something a person reads.
pub mod console;
pub mod html;
