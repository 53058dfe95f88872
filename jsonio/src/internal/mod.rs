//! Names that derived impls and hand-written `Encode`/`Decode` impls need, gathered in
//! one namespace. Most users only need what the crate root re-exports.

pub mod blobs;
pub mod context;
pub mod encoded;
pub mod encoder_decoder;
pub mod error;
pub mod options;
pub mod parallel;
pub mod parse;
pub mod persist;
pub mod print;
pub mod rust_std;
pub mod types;

pub use {
    blobs::*,
    context::*,
    encoded::*,
    encoder_decoder::*,
    error::*,
    options::*,
    parallel::*,
    parse::{Seq, MAX_DEPTH},
    persist::blobs_path,
    types::*,
};
