//! Project resources stored in a triple store.
//!
//! [`ProjectDao`] searches, counts and pages projects, and runs the
//! checked insert/update flows whose outcome maps onto an HTTP status.

mod dao;
mod model;
mod result;
pub mod vocabulary;

pub use dao::{ProjectDao, ProjectDaoConfig};
pub use model::{Project, ProjectDetails, ProjectFilter};
pub use result::{PostResult, ResultStatus, StatusSeverity};

#[cfg(test)]
mod tests;
