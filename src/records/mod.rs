//! Record types - the entities a snapshot is made of

pub mod concern;
pub mod project;
pub mod vendor;

pub use concern::{ConcernRecord, ConcernSeverity, ConcernStatus};
pub use project::{ProjectRecord, ProjectStatus};
pub use vendor::{VendorBook, VendorRecord};
