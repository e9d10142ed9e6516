mod batch;
mod listing;

pub use batch::{cmd_batch, run_batch};
pub use listing::{cmd_countries, cmd_sites};
