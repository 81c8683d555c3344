pub mod filter;
pub mod login;
pub mod paginate;
pub mod search;

use thiserror::Error;

use crate::backend::BackendError;
use crate::locator::LocatorError;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Locator(#[from] LocatorError),
}

pub use filter::select_status;
pub use login::login;
pub use paginate::process_all_pages;
pub use search::trigger_search;
