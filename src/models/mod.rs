pub mod country;
pub mod posting;
pub mod request;
pub mod site;

pub use country::Country;
pub use posting::{JobPosting, ResultTable, TermGroup};
pub use request::{GoogleSearchTerm, JobType, SearchConfig, SearchFilters, SearchRequest};
pub use site::Site;
