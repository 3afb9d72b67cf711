//! URL modeling: percent-codec, scheme catalog, path simplification and the
//! canonicalizing parser.
//!
//! Every URL the engine handles goes through [`parse_url`], which yields a
//! [`UrlRecord`] whose canonical string is the identity used for work-queue
//! deduplication and for the URL → local file table.

mod codec;
mod error;
mod parse;
mod path;
mod record;
mod sanitize;
mod scheme;

pub use codec::{contains_unsafe, decode, decode_bytes, encode, escape_raw_bytes, UnsafeSet};
pub use error::UrlError;
pub use parse::{parse_url, parse_url_with, url_equal};
pub use path::{simplify, split_dir_file};
pub use record::{FtpType, UrlRecord};
pub use sanitize::escape_local_component;
pub use scheme::{
    guess_scheme, has_scheme, recognized_scheme, scheme_len, skip_url_token, supported_prefix,
    Scheme, RECOGNIZED_SCHEMES,
};
