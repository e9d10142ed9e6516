pub mod jobspy;

pub use jobspy::JobSpyClient;
