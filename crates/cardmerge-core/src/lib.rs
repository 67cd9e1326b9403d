pub mod domain;
pub mod error;
pub mod merge;
pub mod session;

pub use domain::*;
pub use error::CoreError;
pub use merge::*;
pub use session::MergeSession;
