pub mod interface;
pub mod nepali;
pub mod sinhala;
pub mod registry;

pub use registry::SegmenterRegistry;
