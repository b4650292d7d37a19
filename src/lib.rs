#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod errors;
mod fingerprint;
mod normalize;
pub mod parser;
pub mod simplify;
#[cfg(feature = "testing")]
pub mod testing;
pub mod tokens;
pub mod tree;

pub use errors::Error;
pub use fingerprint::fingerprint_uncached;
#[cfg(feature = "std")]
pub use fingerprint::{DEFAULT_CACHE_CAPACITY, FingerprintCache, fingerprint};
pub use normalize::normalize_whitespace;
pub use parser::{Statements, parse};
pub use simplify::simplify;
pub use tokens::{Token, TokenKind};
pub use tree::{Group, GroupKind, Node};
