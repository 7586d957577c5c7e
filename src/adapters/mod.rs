// Adapters layer: concrete implementations for external systems.

pub mod dataforseo;
pub mod dataset;
pub mod storage;
