mod locator;
mod types;


pub use locator::SpanLocator;
pub use types::{Entity, Span};
