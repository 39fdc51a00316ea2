//! Binary proxy envelope parsing and building (panic-free).
//!
//! Wire layout, little-endian throughout:
//!
//! ```text
//! i32  message type
//! i32  property count
//!      repeated: i32 key len + key bytes   (-1 => null key, rejected)
//!                i32 val len + val bytes   (-1 => null, 0 => empty, >0 => value)
//! i32  attachment count
//!      repeated: i32 len + data            (-1 => none, 0 => empty, >0 => data)
//! ```
//!
//! The three-state length convention (-1 / 0 / >0) is the bit-exact contract
//! with the peer runtime and must survive every round trip.
//!
//! Parsing rules:
//! - Never index (`buf[0]`) — always use `Buf` and `remaining()` checks.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.

use std::collections::HashMap;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::{Buf, BufMut, Bytes};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{FlowgateError, Result};
use crate::protocol::types::MessageType;

/// Well-known property keys shared by the message hierarchy.
pub mod keys {
    pub const REQUEST_ID: &str = "RequestId";
    pub const IS_CANCELLABLE: &str = "IsCancellable";
    pub const ERROR: &str = "Error";
}

/// The self-describing wire unit: type code, property dictionary, and binary
/// attachments. Properties are three-valued (absent / present-null /
/// present-value) and so are attachment slots (none / empty / data).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyEnvelope {
    type_code: i32,
    properties: HashMap<String, Option<String>>,
    attachments: Vec<Option<Vec<u8>>>,
}

impl ProxyEnvelope {
    pub fn new(ty: MessageType) -> Self {
        Self {
            type_code: ty.code(),
            properties: HashMap::new(),
            attachments: Vec::new(),
        }
    }

    /// Raw wire type code. May be a code with no registered message type.
    pub fn type_code(&self) -> i32 {
        self.type_code
    }

    /// Resolved message type, `Unspecified` for zero, `None` for unknown codes.
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_code(self.type_code)
    }

    pub fn set_type(&mut self, ty: MessageType) {
        self.type_code = ty.code();
    }

    // ------------------------------------------------------------------
    // Raw property / attachment surface

    /// Whether the key exists at all (even with a null value).
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// The value for `key`. `None` when the key is absent or carries null.
    /// Use [`has_property`](Self::has_property) to tell those apart.
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_deref())
    }

    pub fn set_string_property(&mut self, key: &str, value: Option<&str>) {
        self.properties
            .insert(key.to_owned(), value.map(str::to_owned));
    }

    pub fn remove_property(&mut self, key: &str) {
        self.properties.remove(key);
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    /// Attachment slot `idx`: `None` when the slot is out of range or holds
    /// the nil marker; `Some(&[])` for empty-but-present.
    pub fn attachment(&self, idx: usize) -> Option<&[u8]> {
        self.attachments.get(idx).and_then(|a| a.as_deref())
    }

    /// Whether slot `idx` exists and is not the nil marker.
    pub fn has_attachment(&self, idx: usize) -> bool {
        matches!(self.attachments.get(idx), Some(Some(_)))
    }

    pub fn push_attachment(&mut self, data: Option<Vec<u8>>) {
        self.attachments.push(data);
    }

    pub fn set_attachment(&mut self, idx: usize, data: Option<Vec<u8>>) {
        if self.attachments.len() <= idx {
            self.attachments.resize(idx + 1, None);
        }
        self.attachments[idx] = data;
    }

    pub fn attachments(&self) -> &[Option<Vec<u8>>] {
        &self.attachments
    }

    // ------------------------------------------------------------------
    // Typed property getters
    //
    // Get-side policy: a missing key, a null value, or a malformed value all
    // yield the caller's default. The peer cannot crash the proxy through a
    // property slot.

    pub fn int_property(&self, key: &str, def: i32) -> i32 {
        self.string_property(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(def)
    }

    pub fn long_property(&self, key: &str, def: i64) -> i64 {
        self.string_property(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(def)
    }

    pub fn bool_property(&self, key: &str, def: bool) -> bool {
        self.string_property(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(def)
    }

    pub fn double_property(&self, key: &str, def: f64) -> f64 {
        self.string_property(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(def)
    }

    /// ISO-8601 UTC timestamp property.
    pub fn datetime_property(&self, key: &str, def: DateTime<Utc>) -> DateTime<Utc> {
        self.string_property(key)
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(def)
    }

    /// Duration property encoded as a decimal count of 100-nanosecond ticks
    /// (the peer runtime's tick resolution). Negative tick counts clamp to
    /// zero.
    pub fn timespan_property(&self, key: &str, def: Duration) -> Duration {
        match self.string_property(key).and_then(|v| v.parse::<i64>().ok()) {
            Some(ticks) if ticks > 0 => Duration::from_nanos(ticks as u64 * 100),
            Some(_) => Duration::ZERO,
            None => def,
        }
    }

    /// Base64-encoded byte-array property. Malformed base64 reads as absent.
    pub fn bytes_property(&self, key: &str) -> Option<Vec<u8>> {
        self.string_property(key).and_then(|v| BASE64.decode(v).ok())
    }

    /// JSON-boxed structured property. Absent, null, or undecodable values
    /// yield `None`.
    pub fn json_property<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.string_property(key)
            .and_then(|v| serde_json::from_str(v).ok())
    }

    // ------------------------------------------------------------------
    // Typed property setters
    //
    // Set-side policy: only JSON encoding can fail, and a failure there is an
    // internal programming error surfaced as `FlowgateError::Internal`.

    pub fn set_int_property(&mut self, key: &str, value: i32) {
        self.set_string_property(key, Some(&value.to_string()));
    }

    pub fn set_long_property(&mut self, key: &str, value: i64) {
        self.set_string_property(key, Some(&value.to_string()));
    }

    pub fn set_bool_property(&mut self, key: &str, value: bool) {
        self.set_string_property(key, Some(if value { "true" } else { "false" }));
    }

    pub fn set_double_property(&mut self, key: &str, value: f64) {
        self.set_string_property(key, Some(&value.to_string()));
    }

    pub fn set_datetime_property(&mut self, key: &str, value: DateTime<Utc>) {
        let iso = value.to_rfc3339_opts(SecondsFormat::Micros, true);
        self.set_string_property(key, Some(&iso));
    }

    pub fn set_timespan_property(&mut self, key: &str, value: Duration) {
        let ticks = (value.as_nanos() / 100) as i64;
        self.set_string_property(key, Some(&ticks.to_string()));
    }

    pub fn set_bytes_property(&mut self, key: &str, value: Option<&[u8]>) {
        match value {
            Some(data) => self.set_string_property(key, Some(&BASE64.encode(data))),
            None => self.set_string_property(key, None),
        }
    }

    pub fn set_json_property<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| FlowgateError::Internal(format!("json encode of {key} failed: {e}")))?;
        self.set_string_property(key, Some(&json));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Wire codec

    /// Serialize the envelope for the wire. Fails when the type is still
    /// `Unspecified` and `allow_unspecified` is false.
    pub fn encode(&self, allow_unspecified: bool) -> Result<Vec<u8>> {
        if !allow_unspecified && self.type_code == MessageType::Unspecified.code() {
            return Err(FlowgateError::Protocol(
                "message type has not been initialized".into(),
            ));
        }

        let mut buf = Vec::with_capacity(self.encoded_size_hint());
        buf.put_i32_le(self.type_code);

        buf.put_i32_le(self.properties.len() as i32);
        for (key, value) in &self.properties {
            put_string(&mut buf, Some(key.as_str()));
            put_string(&mut buf, value.as_deref());
        }

        buf.put_i32_le(self.attachments.len() as i32);
        for attachment in &self.attachments {
            match attachment {
                None => buf.put_i32_le(-1),
                Some(data) => {
                    buf.put_i32_le(data.len() as i32);
                    buf.put_slice(data);
                }
            }
        }

        Ok(buf)
    }

    /// Parse an envelope from wire bytes. The caller decides what to do with
    /// the type code; this layer only enforces structural validity.
    pub fn decode(buf: &mut Bytes) -> Result<ProxyEnvelope> {
        let type_code = get_i32(buf)?;

        let property_count = get_count(buf, "property")?;
        // Capacity hints are clamped by what the buffer could possibly hold
        // (two length prefixes per property, one per attachment), so a forged
        // count cannot trigger a huge allocation.
        let mut properties = HashMap::with_capacity(property_count.min(buf.remaining() / 8));
        for _ in 0..property_count {
            let key = get_string(buf)?
                .ok_or_else(|| FlowgateError::Protocol("null property key".into()))?;
            let value = get_string(buf)?;
            properties.insert(key, value);
        }

        let attachment_count = get_count(buf, "attachment")?;
        let mut attachments = Vec::with_capacity(attachment_count.min(buf.remaining() / 4));
        for _ in 0..attachment_count {
            attachments.push(get_blob(buf)?);
        }

        Ok(ProxyEnvelope {
            type_code,
            properties,
            attachments,
        })
    }

    fn encoded_size_hint(&self) -> usize {
        let props: usize = self
            .properties
            .iter()
            .map(|(k, v)| 8 + k.len() + v.as_ref().map_or(0, String::len))
            .sum();
        let atts: usize = self
            .attachments
            .iter()
            .map(|a| 4 + a.as_ref().map_or(0, Vec::len))
            .sum();
        8 + props + 4 + atts
    }
}

fn put_string(buf: &mut Vec<u8>, value: Option<&str>) {
    match value {
        None => buf.put_i32_le(-1),
        Some(s) => {
            buf.put_i32_le(s.len() as i32);
            buf.put_slice(s.as_bytes());
        }
    }
}

fn get_i32(buf: &mut Bytes) -> Result<i32> {
    if buf.remaining() < 4 {
        return Err(FlowgateError::Protocol("truncated message".into()));
    }
    Ok(buf.get_i32_le())
}

fn get_count(buf: &mut Bytes, what: &str) -> Result<usize> {
    let n = get_i32(buf)?;
    if n < 0 {
        return Err(FlowgateError::Protocol(format!("negative {what} count")));
    }
    Ok(n as usize)
}

/// Read a three-state length-prefixed string: -1 => None, 0 => Some(""),
/// >0 => Some(value).
fn get_string(buf: &mut Bytes) -> Result<Option<String>> {
    match get_blob(buf)? {
        None => Ok(None),
        Some(bytes) => {
            let s = String::from_utf8(bytes)
                .map_err(|_| FlowgateError::Protocol("invalid utf-8 in property".into()))?;
            Ok(Some(s))
        }
    }
}

/// Read a three-state length-prefixed byte buffer.
fn get_blob(buf: &mut Bytes) -> Result<Option<Vec<u8>>> {
    let len = get_i32(buf)?;
    if len == -1 {
        return Ok(None);
    }
    if len < 0 {
        return Err(FlowgateError::Protocol(format!("invalid length {len}")));
    }
    let len = len as usize;
    if buf.remaining() < len {
        return Err(FlowgateError::Protocol("truncated message".into()));
    }
    Ok(Some(buf.copy_to_bytes(len).to_vec()))
}
