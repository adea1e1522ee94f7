//! Shared pagination primitives for Classbook pipelines.
//!
//! The crate provides three building blocks used by request contexts and
//! presentation adapters:
//!
//! - [`PageRequest`], a validated offset/limit window.
//! - [`Page`], the envelope returned for a windowed listing, carrying the
//!   total number of items and an opaque cursor for the following window.
//! - [`Cursor`], an opaque token that round-trips a [`PageRequest`] without
//!   exposing its encoding to callers.
//!
//! # Example
//!
//! ```
//! use pagination::{Cursor, PageRequest};
//!
//! let request = PageRequest::new(0, 2).expect("valid window");
//! let page = request.apply(vec!["a", "b", "c"]);
//!
//! assert_eq!(page.items(), &["a", "b"]);
//! assert_eq!(page.total(), 3);
//!
//! let next = page.next().expect("more items remain");
//! let decoded = Cursor::parse(next.as_str())
//!     .and_then(|cursor| cursor.decode())
//!     .expect("cursor decodes");
//! assert_eq!(decoded.offset(), 2);
//! ```

mod cursor;
mod error;
mod page;

pub use cursor::Cursor;
pub use error::PaginationError;
pub use page::{DEFAULT_LIMIT, MAX_LIMIT, Page, PageRequest};
