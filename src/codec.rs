//! Compressing values to gzipped JSON, and back.
//!
//! The wire format is nothing more than a gzip stream wrapping UTF-8 JSON text:
//! no header, version byte, or length prefix of our own.
//! Anything `gunzip | jq` can read, [`unzip()`] can read, and vice versa.
//!
//! [`unzip()`]: fn.unzip.html

use std::io::prelude::*;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::result::*;

/// Serializes `value` to JSON and gzips it.
///
/// Top-level `null` counts as "no value", so `None`, `()`, and friends
/// are rejected with [`CodecError::InputMissing`].
/// (Nulls nested inside arrays or objects are fine.)
/// Values that serialize to a bare JSON string are rejected with
/// [`CodecError::InvalidInputType`]: there's no structure there worth compressing.
///
/// ```
/// # use serde_json::json;
/// let buffer = jzip::zip(&json!({"a": 1, "b": [true, null, "x"]}))?;
/// assert_eq!(&buffer[..2], &[0x1f, 0x8b]);
/// # Ok::<(), jzip::result::CodecError>(())
/// ```
///
/// [`CodecError::InputMissing`]: ../result/enum.CodecError.html#variant.InputMissing
/// [`CodecError::InvalidInputType`]: ../result/enum.CodecError.html#variant.InvalidInputType
pub fn zip<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    let payload = to_payload(value)?;
    gzip(&payload)
}

/// Gunzips `data` and parses the JSON inside as a `T`.
///
/// An empty buffer is treated as no buffer at all ([`CodecError::InputMissing`]).
/// Corrupt or truncated gzip data fails with [`CodecError::Decompression`];
/// good gzip around bad JSON (or JSON that doesn't fit `T`)
/// fails with [`CodecError::Parse`].
///
/// ```
/// # use serde_json::{json, Value};
/// let buffer = jzip::zip(&42)?;
/// let answer: Value = jzip::unzip(&buffer)?;
/// assert_eq!(answer, json!(42));
/// # Ok::<(), jzip::result::CodecError>(())
/// ```
///
/// [`CodecError::InputMissing`]: ../result/enum.CodecError.html#variant.InputMissing
/// [`CodecError::Decompression`]: ../result/enum.CodecError.html#variant.Decompression
/// [`CodecError::Parse`]: ../result/enum.CodecError.html#variant.Parse
pub fn unzip<T: DeserializeOwned>(data: &[u8]) -> CodecResult<T> {
    let payload = gunzip(data)?;
    from_payload(&payload)
}

/// Like [`zip()`], but hands the gzip step to Tokio's blocking pool
/// so a large payload doesn't stall the calling task.
///
/// [`zip()`]: fn.zip.html
#[cfg(feature = "tokio")]
pub async fn zip_async<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    let payload = to_payload(value)?;
    tokio::task::spawn_blocking(move || gzip(&payload)).await?
}

/// Like [`unzip()`], but hands the gunzip step to Tokio's blocking pool.
///
/// The buffer is taken by value since it has to move to another thread.
///
/// [`unzip()`]: fn.unzip.html
#[cfg(feature = "tokio")]
pub async fn unzip_async<T: DeserializeOwned>(data: Vec<u8>) -> CodecResult<T> {
    let payload = tokio::task::spawn_blocking(move || gunzip(&data)).await??;
    from_payload(&payload)
}

/// Writes `value` as JSON, rejecting nulls and bare strings.
fn to_payload<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    let payload = serde_json::to_vec(value).map_err(CodecError::Serialize)?;
    trace!("Serialized {} bytes of JSON", payload.len());

    // serde_json emits no whitespace around a top-level value,
    // so checking the raw bytes is enough to spot these.
    if payload == b"null" {
        debug!("Refusing to compress null");
        return Err(CodecError::InputMissing);
    }
    if payload.first() == Some(&b'"') {
        debug!("Refusing to compress a string");
        return Err(CodecError::InvalidInputType);
    }
    Ok(payload)
}

fn from_payload<T: DeserializeOwned>(payload: &[u8]) -> CodecResult<T> {
    serde_json::from_slice(payload).map_err(CodecError::Parse)
}

fn gzip(payload: &[u8]) -> CodecResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(payload)
        .map_err(CodecError::Compression)?;
    let compressed = encoder.finish().map_err(CodecError::Compression)?;
    debug!(
        "Compressed {} bytes of JSON to {} bytes",
        payload.len(),
        compressed.len()
    );
    Ok(compressed)
}

fn gunzip(data: &[u8]) -> CodecResult<Vec<u8>> {
    if data.is_empty() {
        debug!("Refusing to decompress an empty buffer");
        return Err(CodecError::InputMissing);
    }
    // zlib's gunzip reads every member of a concatenated stream, so we do too.
    let mut decoder = MultiGzDecoder::new(data);
    let mut payload = Vec::new();
    decoder
        .read_to_end(&mut payload)
        .map_err(CodecError::Decompression)?;
    debug!(
        "Decompressed {} bytes to {} bytes of JSON",
        data.len(),
        payload.len()
    );
    Ok(payload)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn payload_is_compact_json() {
        let payload = to_payload(&json!({"a": 1, "b": [true, null, "x"]})).unwrap();
        assert_eq!(payload, br#"{"a":1,"b":[true,null,"x"]}"#);
    }

    #[test]
    fn nulls_are_missing() {
        assert!(matches!(to_payload(&()), Err(CodecError::InputMissing)));
        assert!(matches!(
            to_payload(&None::<u32>),
            Err(CodecError::InputMissing)
        ));
        assert!(matches!(
            to_payload(&Value::Null),
            Err(CodecError::InputMissing)
        ));
        // Only at the top level
        assert!(to_payload(&[None::<u32>]).is_ok());
        assert!(to_payload(&Some(0)).is_ok());
    }

    #[test]
    fn strings_are_rejected() {
        for err in [
            to_payload("hello"),
            to_payload(&String::from("")),
            to_payload(&'c'),
            to_payload(&json!("hello")),
        ] {
            assert!(matches!(err, Err(CodecError::InvalidInputType)));
        }
        assert!(to_payload(&["hello"]).is_ok());
    }

    #[test]
    fn non_string_keys_fail_to_serialize() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], 2);
        assert!(matches!(to_payload(&map), Err(CodecError::Serialize(_))));
    }

    #[test]
    fn empty_buffer_is_missing() {
        assert!(matches!(gunzip(&[]), Err(CodecError::InputMissing)));
    }

    #[test]
    fn garbage_fails_decompression() {
        assert!(matches!(
            gunzip(b"this is not gzip"),
            Err(CodecError::Decompression(_))
        ));
    }

    #[test]
    fn truncated_buffer_fails_decompression() {
        let compressed = gzip(br#"{"hello":"world"}"#).unwrap();
        let truncated = &compressed[..compressed.len() - 4];
        assert!(matches!(
            gunzip(truncated),
            Err(CodecError::Decompression(_))
        ));
    }

    #[test]
    fn corrupt_checksum_fails_decompression() {
        let mut compressed = gzip(br#"[1,2,3]"#).unwrap();
        // The CRC-32 sits just before the trailing 4-byte length.
        let crc_posit = compressed.len() - 8;
        compressed[crc_posit] ^= 0xff;
        assert!(matches!(
            gunzip(&compressed),
            Err(CodecError::Decompression(_))
        ));
    }

    #[test]
    fn concatenated_members_are_read() {
        let mut compressed = gzip(b"[1,").unwrap();
        compressed.extend(gzip(b"2]").unwrap());
        let value: Vec<u32> = unzip(&compressed).unwrap();
        assert_eq!(value, [1, 2]);
    }

    #[test]
    fn bad_json_fails_parsing() {
        let compressed = gzip(b"{not json").unwrap();
        assert!(matches!(
            unzip::<Value>(&compressed),
            Err(CodecError::Parse(_))
        ));

        // As does good JSON of the wrong shape.
        let compressed = gzip(b"[1,2,3]").unwrap();
        assert!(matches!(
            unzip::<bool>(&compressed),
            Err(CodecError::Parse(_))
        ));
    }
}
