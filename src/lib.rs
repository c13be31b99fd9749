//! jzip shrinks structured data for storage or the wire
//! by gzipping its JSON form:
//!
//! ```
//! # use serde_json::{json, Value};
//! let value = json!({"a": 1, "b": [true, null, "x"]});
//!
//! let buffer = jzip::zip(&value)?;
//! let back: Value = jzip::unzip(&buffer)?;
//! assert_eq!(value, back);
//! # Ok::<(), jzip::result::CodecError>(())
//! ```
//!
//! Anything that implements [`serde::Serialize`] goes in,
//! and anything that implements [`serde::de::DeserializeOwned`] comes out.
//! There's no schema checking on the way out beyond what serde does
//! to build the requested type, so ask for `serde_json::Value`
//! if you don't know what you're getting.
//!
//! The output is a plain gzip stream holding UTF-8 JSON. No framing, no version tag.
//! Each call stands alone, so they're safe to make from as many threads as you like.
//! With the `tokio` feature (on by default), [`zip_async()`] and [`unzip_async()`]
//! run the gzip step on Tokio's blocking pool.
//!
//! Two kinds of input are refused outright:
//!
//! 1. "Nothing": a value that serializes to a top-level JSON `null`,
//!    or an empty buffer. These fail with [`CodecError::InputMissing`].
//!
//! 2. Bare strings, which fail with [`CodecError::InvalidInputType`].
//!    Store text as-is instead.
//!
//! [`zip_async()`]: codec/fn.zip_async.html
//! [`unzip_async()`]: codec/fn.unzip_async.html
//! [`CodecError::InputMissing`]: result/enum.CodecError.html#variant.InputMissing
//! [`CodecError::InvalidInputType`]: result/enum.CodecError.html#variant.InvalidInputType

pub mod codec;
pub mod result;

pub use codec::{unzip, zip};
#[cfg(feature = "tokio")]
pub use codec::{unzip_async, zip_async};
