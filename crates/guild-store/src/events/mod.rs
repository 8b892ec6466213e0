//! Event sink implementations

mod sink;

pub use sink::MemoryEventSink;
