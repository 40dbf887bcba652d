//! Knowledge base browser
//!
//! Components:
//! - Search: keyword lookup and cascading surgery/complication selection
//! - Summary: full listing of surgeries and complications
//! - Protocol: renumbered rendering of `Step N:` protocols
//! - Detail: structured view of one complication

pub mod detail;
pub mod protocol;
pub mod search;
pub mod summary;

pub use detail::ComplicationView;
pub use protocol::{extract_steps, format_protocol, ProtocolRendering};
pub use search::{complication_names, find_by_query, select, surgery_names, SearchHit};
pub use summary::summarize;
