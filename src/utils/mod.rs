pub mod duration;
pub mod masked_sequence;
pub mod signal_handling;

pub use duration::parse_seconds;
pub use masked_sequence::*;
