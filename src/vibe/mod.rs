pub mod generator;
pub mod metrics;
pub mod publish;

pub use generator::*;
pub use metrics::*;
pub use publish::*;
