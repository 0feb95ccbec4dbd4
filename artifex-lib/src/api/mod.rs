//! Remote page source
//!
//! The [`PageSource`] trait is the narrow interface the selection engine
//! uses to reach the paginated dataset. [`ArticClient`](crate::ArticClient)
//! implements it against the artworks API; [`MemorySource`] serves a fixed
//! in-process dataset.

mod artworks;
mod memory;
mod page;
mod source;

pub use artworks::*;
pub use memory::*;
pub use page::*;
pub use source::*;
