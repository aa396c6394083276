//! Record codec
//!
//! Translates between Edge DNS rdata strings and [`RecordData`]. Each
//! supported type registers a decode/encode pair in a table built once by
//! [`RecordCodec::new`].
//!
//! | Type           | rdata                                                      |
//! |----------------|------------------------------------------------------------|
//! | A/AAAA/NS/PTR  | literal                                                    |
//! | CNAME          | literal, trailing dot added on decode                      |
//! | CAA            | `<flags> <tag> <value>`                                    |
//! | MX             | `<preference> <exchange>`                                  |
//! | NAPTR          | `<order> <pref> "<flags>" "<service>" "<regexp>" <repl>`   |
//! | SRV            | `<priority> <weight> <port> <target>`                      |
//! | SSHFP          | `<algorithm> <fp_type> <fingerprint>`, lower-cased on decode |
//! | TXT            | `"<text>"`, `;` and `"` escaped, split into 255-byte segments |
//!
//! A TXT rdata entry may hold several quoted segments. Segments that are
//! exactly the 255-byte split of their text decode to one plain value;
//! any other split is kept in the value as `" "` between segments so that
//! encoding reproduces the same rdata.
//!
//! Structured rdata is split with a fixed field count, so the last field
//! keeps any further spaces.

use std::collections::HashMap;
use std::str::FromStr;
use zonesync_core::{
    CaaValue, Error, MxValue, NaptrValue, RecordData, RecordType, Result, SrvValue, SshfpValue,
};

use crate::wire::WireRecordSet;

/// Maximum bytes of text per quoted TXT segment
pub const TXT_SEGMENT_MAX_BYTES: usize = 255;

type DecodeFn = fn(&WireRecordSet) -> Result<RecordData>;
type EncodeFn = fn(&RecordData) -> Result<Vec<String>>;

#[derive(Clone, Copy)]
struct Codec {
    decode: DecodeFn,
    encode: EncodeFn,
}

/// Lookup table of per-type codecs
#[derive(Clone)]
pub struct RecordCodec {
    table: HashMap<RecordType, Codec>,
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.table.keys().collect();
        types.sort();
        f.debug_struct("RecordCodec").field("types", &types).finish()
    }
}

impl RecordCodec {
    /// Build the table with every supported type
    pub fn new() -> Self {
        let entries: [(RecordType, DecodeFn, EncodeFn); 11] = [
            (RecordType::A, decode_a, |d| encode_plain(RecordType::A, d)),
            (RecordType::Aaaa, decode_aaaa, |d| encode_plain(RecordType::Aaaa, d)),
            (RecordType::Caa, decode_caa, encode_caa),
            (RecordType::Cname, decode_cname, encode_cname),
            (RecordType::Mx, decode_mx, encode_mx),
            (RecordType::Naptr, decode_naptr, encode_naptr),
            (RecordType::Ns, decode_ns, |d| encode_plain(RecordType::Ns, d)),
            (RecordType::Ptr, decode_ptr, |d| encode_plain(RecordType::Ptr, d)),
            (RecordType::Srv, decode_srv, encode_srv),
            (RecordType::Sshfp, decode_sshfp, encode_sshfp),
            (RecordType::Txt, decode_txt, encode_txt),
        ];

        let table = entries
            .into_iter()
            .map(|(t, decode, encode)| (t, Codec { decode, encode }))
            .collect();

        Self { table }
    }

    pub fn supports(&self, record_type: RecordType) -> bool {
        self.table.contains_key(&record_type)
    }

    /// Decode every rdata entry of `wire` as `record_type`
    pub fn decode(&self, record_type: RecordType, wire: &WireRecordSet) -> Result<RecordData> {
        let codec = self.lookup(record_type)?;
        (codec.decode)(wire)
    }

    /// Encode a payload to rdata entries
    pub fn encode(&self, data: &RecordData) -> Result<Vec<String>> {
        let codec = self.lookup(data.record_type())?;
        (codec.encode)(data)
    }

    fn lookup(&self, record_type: RecordType) -> Result<&Codec> {
        self.table
            .get(&record_type)
            .ok_or_else(|| Error::unsupported(format!("no codec for {}", record_type)))
    }
}

fn mismatch(expected: RecordType, data: &RecordData) -> Error {
    Error::unsupported(format!(
        "{} codec cannot encode {} data",
        expected,
        data.record_type()
    ))
}

/// Split `rdata` into exactly `N` space-separated fields; the last keeps its spaces.
fn split_fields<'a, const N: usize>(record_type: RecordType, rdata: &'a str) -> Result<[&'a str; N]> {
    let fields: Vec<&str> = rdata.splitn(N, ' ').collect();
    fields.try_into().map_err(|fields: Vec<&str>| {
        Error::decode(format!(
            "{} rdata \"{}\" has {} fields, expected {}",
            record_type,
            rdata,
            fields.len(),
            N
        ))
    })
}

fn parse_field<T: FromStr>(record_type: RecordType, field: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        Error::decode(format!(
            "{} {} \"{}\" is not a valid number",
            record_type, field, value
        ))
    })
}

/// Strip the one leading and one trailing quote of a quoted field
fn unquote<'a>(record_type: RecordType, field: &str, value: &'a str) -> Result<&'a str> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(|| {
            Error::decode(format!(
                "{} {} {} is not quoted",
                record_type, field, value
            ))
        })
}

fn decode_a(wire: &WireRecordSet) -> Result<RecordData> {
    Ok(RecordData::A {
        values: wire.rdata.clone(),
    })
}

fn decode_aaaa(wire: &WireRecordSet) -> Result<RecordData> {
    Ok(RecordData::Aaaa {
        values: wire.rdata.clone(),
    })
}

fn decode_ns(wire: &WireRecordSet) -> Result<RecordData> {
    Ok(RecordData::Ns {
        values: wire.rdata.clone(),
    })
}

fn decode_ptr(wire: &WireRecordSet) -> Result<RecordData> {
    Ok(RecordData::Ptr {
        values: wire.rdata.clone(),
    })
}

fn encode_plain(expected: RecordType, data: &RecordData) -> Result<Vec<String>> {
    match data {
        RecordData::A { values }
        | RecordData::Aaaa { values }
        | RecordData::Ns { values }
        | RecordData::Ptr { values }
            if data.record_type() == expected =>
        {
            Ok(values.clone())
        }
        other => Err(mismatch(expected, other)),
    }
}

fn decode_cname(wire: &WireRecordSet) -> Result<RecordData> {
    let first = wire
        .rdata
        .first()
        .ok_or_else(|| Error::decode(format!("CNAME {} has no rdata", wire.name)))?;

    let value = if first.ends_with('.') {
        first.clone()
    } else {
        format!("{}.", first)
    };

    Ok(RecordData::Cname { value })
}

fn encode_cname(data: &RecordData) -> Result<Vec<String>> {
    match data {
        RecordData::Cname { value } => Ok(vec![value.clone()]),
        other => Err(mismatch(RecordType::Cname, other)),
    }
}

fn decode_caa(wire: &WireRecordSet) -> Result<RecordData> {
    let mut values = Vec::with_capacity(wire.rdata.len());
    for r in &wire.rdata {
        let [flags, tag, value] = split_fields::<3>(RecordType::Caa, r)?;
        values.push(CaaValue {
            flags: parse_field(RecordType::Caa, "flags", flags)?,
            tag: tag.to_string(),
            value: value.to_string(),
        });
    }
    Ok(RecordData::Caa { values })
}

fn encode_caa(data: &RecordData) -> Result<Vec<String>> {
    match data {
        RecordData::Caa { values } => Ok(values
            .iter()
            .map(|v| format!("{} {} {}", v.flags, v.tag, v.value))
            .collect()),
        other => Err(mismatch(RecordType::Caa, other)),
    }
}

fn decode_mx(wire: &WireRecordSet) -> Result<RecordData> {
    let mut values = Vec::with_capacity(wire.rdata.len());
    for r in &wire.rdata {
        let [preference, exchange] = split_fields::<2>(RecordType::Mx, r)?;
        values.push(MxValue {
            preference: parse_field(RecordType::Mx, "preference", preference)?,
            exchange: exchange.to_string(),
        });
    }
    Ok(RecordData::Mx { values })
}

fn encode_mx(data: &RecordData) -> Result<Vec<String>> {
    match data {
        RecordData::Mx { values } => Ok(values
            .iter()
            .map(|v| format!("{} {}", v.preference, v.exchange))
            .collect()),
        other => Err(mismatch(RecordType::Mx, other)),
    }
}

fn decode_naptr(wire: &WireRecordSet) -> Result<RecordData> {
    let t = RecordType::Naptr;
    let mut values = Vec::with_capacity(wire.rdata.len());
    for r in &wire.rdata {
        let [order, preference, flags, service, regexp, replacement] = split_fields::<6>(t, r)?;
        values.push(NaptrValue {
            order: parse_field(t, "order", order)?,
            preference: parse_field(t, "preference", preference)?,
            flags: unquote(t, "flags", flags)?.to_string(),
            service: unquote(t, "service", service)?.to_string(),
            regexp: unquote(t, "regexp", regexp)?.to_string(),
            replacement: replacement.to_string(),
        });
    }
    Ok(RecordData::Naptr { values })
}

fn encode_naptr(data: &RecordData) -> Result<Vec<String>> {
    match data {
        RecordData::Naptr { values } => Ok(values
            .iter()
            .map(|v| {
                format!(
                    "{} {} \"{}\" \"{}\" \"{}\" {}",
                    v.order, v.preference, v.flags, v.service, v.regexp, v.replacement
                )
            })
            .collect()),
        other => Err(mismatch(RecordType::Naptr, other)),
    }
}

fn decode_srv(wire: &WireRecordSet) -> Result<RecordData> {
    let t = RecordType::Srv;
    let mut values = Vec::with_capacity(wire.rdata.len());
    for r in &wire.rdata {
        let [priority, weight, port, target] = split_fields::<4>(t, r)?;
        values.push(SrvValue {
            priority: parse_field(t, "priority", priority)?,
            weight: parse_field(t, "weight", weight)?,
            port: parse_field(t, "port", port)?,
            target: target.to_string(),
        });
    }
    Ok(RecordData::Srv { values })
}

fn encode_srv(data: &RecordData) -> Result<Vec<String>> {
    match data {
        RecordData::Srv { values } => Ok(values
            .iter()
            .map(|v| format!("{} {} {} {}", v.priority, v.weight, v.port, v.target))
            .collect()),
        other => Err(mismatch(RecordType::Srv, other)),
    }
}

fn decode_sshfp(wire: &WireRecordSet) -> Result<RecordData> {
    let t = RecordType::Sshfp;
    let mut values = Vec::with_capacity(wire.rdata.len());
    for r in &wire.rdata {
        let [algorithm, fingerprint_type, fingerprint] = split_fields::<3>(t, r)?;
        values.push(SshfpValue {
            algorithm: parse_field(t, "algorithm", algorithm)?,
            fingerprint_type: parse_field(t, "fingerprint_type", fingerprint_type)?,
            fingerprint: fingerprint.to_lowercase(),
        });
    }
    Ok(RecordData::Sshfp { values })
}

// Case is left as the caller set it.
fn encode_sshfp(data: &RecordData) -> Result<Vec<String>> {
    match data {
        RecordData::Sshfp { values } => Ok(values
            .iter()
            .map(|v| format!("{} {} {}", v.algorithm, v.fingerprint_type, v.fingerprint))
            .collect()),
        other => Err(mismatch(RecordType::Sshfp, other)),
    }
}

fn decode_txt(wire: &WireRecordSet) -> Result<RecordData> {
    let values = wire
        .rdata
        .iter()
        .map(|r| parse_txt(r))
        .collect::<Result<Vec<_>>>()?;
    Ok(RecordData::Txt { values })
}

fn encode_txt(data: &RecordData) -> Result<Vec<String>> {
    match data {
        RecordData::Txt { values } => Ok(values.iter().map(|v| format_txt(v)).collect()),
        other => Err(mismatch(RecordType::Txt, other)),
    }
}

/// Segment boundary inside a normalized TXT value
const TXT_SEGMENT_SEPARATOR: &str = "\" \"";

/// Parse one or more space-separated quoted segments into a single value.
///
/// Segment boundaries other than the plain 255-byte split are kept as
/// [`TXT_SEGMENT_SEPARATOR`].
fn parse_txt(rdata: &str) -> Result<String> {
    let segments = parse_txt_segments(rdata)?;
    let text = segments.concat();

    if segments.len() > 1 && chunk_text(&text, TXT_SEGMENT_MAX_BYTES) != segments {
        return Ok(segments.join(TXT_SEGMENT_SEPARATOR));
    }
    Ok(text)
}

/// Unescaped text of each quoted segment, turning `\;` and `\"` back
/// into `;` and `"`.
fn parse_txt_segments(rdata: &str) -> Result<Vec<String>> {
    let malformed = |why: &str| Error::decode(format!("TXT rdata {} {}", rdata, why));

    let mut segments = Vec::new();
    let mut chars = rdata.chars().peekable();

    loop {
        while chars.next_if_eq(&' ').is_some() {}
        match chars.next() {
            None => break,
            Some('"') => {}
            Some(_) => return Err(malformed("is not quoted")),
        }

        let mut text = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped @ (';' | '"')) => text.push(escaped),
                    Some(other) => {
                        text.push('\\');
                        text.push(other);
                    }
                    None => return Err(malformed("ends inside an escape")),
                },
                '"' => {
                    closed = true;
                    break;
                }
                c => text.push(c),
            }
        }
        if !closed {
            return Err(malformed("has an unterminated quote"));
        }
        segments.push(text);
    }

    if segments.is_empty() {
        return Err(malformed("is empty"));
    }
    Ok(segments)
}

/// Quote a TXT value, escaping `;` and `"` and splitting long text into
/// segments.
///
/// Values that already carry `\;` or `\"` are accepted as-is.
fn format_txt(value: &str) -> String {
    let text = value.replace("\\;", ";").replace("\\\"", "\"");
    text.split(TXT_SEGMENT_SEPARATOR)
        .flat_map(|segment| chunk_text(segment, TXT_SEGMENT_MAX_BYTES))
        .map(|segment| format!("\"{}\"", escape_txt(segment)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_txt(segment: &str) -> String {
    segment.replace('"', "\\\"").replace(';', "\\;")
}

/// Split into pieces of at most `max` bytes without breaking a character
fn chunk_text(text: &str, max: usize) -> Vec<&str> {
    if text.len() <= max {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = max.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}
