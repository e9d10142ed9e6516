pub mod dispatcher;
pub use dispatcher::{DispatchError, SearchDispatcher};

pub mod export;
pub use export::ExportError;

pub mod form;
pub use form::{Advisory, AdvisoryLevel, FormError, PreparedSearch, SearchForm};

pub mod job_search;
pub use job_search::{JobSearchService, SearchError};

pub mod markdown;
