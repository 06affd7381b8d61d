// Resume content: the loaded record, period parsing, card view models and
// image fallback resolution.

pub mod cards;
pub mod handlers;
pub mod images;
pub mod periods;
pub mod store;
