pub mod cardio;
pub mod prediction;
pub mod system;

pub use cardio::*;
pub use prediction::*;
pub use system::*;
