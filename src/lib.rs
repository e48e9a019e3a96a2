#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

mod cache;
mod error;
mod index;

pub use cache::LruCache;
pub use error::{Error, Result};
pub use index::{IntoIter, Iter};

#[cfg(not(feature = "ahash"))]
type RandomState = std::hash::RandomState;
#[cfg(feature = "ahash")]
type RandomState = ahash::RandomState;
