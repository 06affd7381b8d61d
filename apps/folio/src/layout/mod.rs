// Layout shell: which sections exist per viewport class, navigation labels,
// and the scroll-spy that decides the active section.

pub mod handlers;
pub mod sections;
pub mod visibility;

pub use sections::{page_layout, section_ids, PageLayout, SectionId};
pub use visibility::{SectionBounds, SectionTracker};
