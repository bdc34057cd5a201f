//! Lifecycle observers bound to a UI component's mount lifetime.
//!
//! Each observer is acquired when the component mounts and released when
//! its handle is dropped, whatever triggered the unmount.

pub mod section;
pub mod timer;

pub use section::{
    ElementId, IntersectionEntry, ObservationId, SectionWatch, StaticViewport, ViewportHost,
};
pub use timer::PageTimer;
