//! In-memory backing store shared by the repositories

mod memory;

pub use memory::MemoryStore;
