pub mod config;
pub mod error;
pub mod interval;
pub mod registry;
pub mod remap;
pub mod replay;
pub mod tracker;

pub use config::{ClaimPolicy, TrackerSettings};
pub use error::{AuthorshipError, AuthorshipResult};
pub use interval::{AuthorshipInterval, OwnerId};
pub use registry::AuthorshipRegistry;
pub use remap::{Assoc, EditBatch, PositionRemap, TextEdit};
pub use tracker::RangeOwnershipTracker;
