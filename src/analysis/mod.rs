pub mod collector;
pub mod dashboard;
pub mod enrichment;
pub mod orchestrator;
pub mod ranking;

pub use collector::*;
pub use dashboard::*;
pub use enrichment::*;
pub use orchestrator::*;
pub use ranking::*;
