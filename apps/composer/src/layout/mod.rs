// Certificate layout engine.
// Estimates block heights, stacks sections on the page, compacts or relocates
// content that overflows, and positions everything in absolute page coordinates.
// CPU-bound; callers on the async runtime must use tokio::task::spawn_blocking.

pub mod estimator;
pub mod frame;
pub mod planner;
pub mod positioner;
pub mod resolver;
pub mod section;
pub mod styles;

// Re-export the types shared with the service layer and error mapping.
pub use frame::{default_frame, LayoutFrame};
pub use section::SectionId;
pub use styles::{StyleCatalog, StyleId};
