//! Response body decoding.
//!
//! # Responsibilities
//! - Infer the body encoding from the `Content-Type` header
//! - Fall back to ISO-8859-1 when no charset is declared
//! - Decode the buffered body strictly with that encoding
//!
//! # Design Decisions
//! - `charset=` is found with a regex over the lowercased header value, not a
//!   media-type parser; the captured token keeps trailing `;` or quotes
//! - Unknown encodings and malformed bytes are errors, never replaced
//! - Latin-1 labels decode as true ISO-8859-1 and ASCII labels as strict
//!   7-bit ASCII; everything else goes through the WHATWG label table of
//!   `encoding_rs`, which would map both to windows-1252

use std::io::Write;

use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DecodeError, FetchError};
use crate::http::headers::{latin1_to_string, HeaderStore};

/// Encoding assumed when the response does not declare one.
pub const FALLBACK_ENCODING: &str = "iso-8859-1";

static CHARSET_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"charset=(\S+)").unwrap());

/// Latin-1 aliases after [`normalize_label`].
const LATIN1_LABELS: &[&str] = &[
    "iso_8859_1",
    "iso8859_1",
    "iso_ir_100",
    "8859",
    "cp819",
    "ibm819",
    "csisolatin1",
    "latin",
    "latin1",
    "latin_1",
    "l1",
];

/// US-ASCII aliases after [`normalize_label`].
const ASCII_LABELS: &[&str] = &[
    "ascii",
    "us_ascii",
    "us",
    "646",
    "iso646_us",
    "iso_ir_6",
    "ansi_x3.4_1968",
    "ansi_x3_4_1968",
    "ansi_x3.4_1986",
    "iso_646.irv:1991",
    "iso_646.irv_1991",
    "cp367",
    "ibm367",
    "csascii",
];

/// Lowercase and fold `-` and spaces into `_`, so `Latin-1`, `latin_1` and
/// `LATIN 1` compare equal.
fn normalize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Where the encoding of a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    /// Found as `charset=` in the `Content-Type` header.
    Declared,
    /// No charset found; [`FALLBACK_ENCODING`] is used.
    Assumed,
}

/// The encoding name to decode with, as inferred from the headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredEncoding {
    pub name: String,
    pub source: EncodingSource,
}

impl InferredEncoding {
    /// The verbose diagnostic line for this inference.
    pub fn diagnostic(&self) -> String {
        match self.source {
            EncodingSource::Declared => format!("Decoding using {}", self.name),
            EncodingSource::Assumed => format!("Assuming encoding is {}", self.name),
        }
    }
}

/// Text decoded from a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedResponse {
    /// Encoding name used, never empty.
    pub encoding: String,
    pub source: EncodingSource,
    pub text: String,
}

/// A resolved character set able to decode bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Latin1,
    /// 7-bit only; any byte >= 0x80 is malformed.
    Ascii,
    Whatwg(&'static Encoding),
}

impl Charset {
    /// Resolve an encoding label.
    pub fn for_label(label: &str) -> Result<Self, DecodeError> {
        let label = label.trim();
        let normalized = normalize_label(label);
        if LATIN1_LABELS.contains(&normalized.as_str()) {
            return Ok(Self::Latin1);
        }
        if ASCII_LABELS.contains(&normalized.as_str()) {
            return Ok(Self::Ascii);
        }

        Encoding::for_label_no_replacement(label.as_bytes())
            .map(Self::Whatwg)
            .ok_or_else(|| DecodeError::UnknownEncoding(label.to_string()))
    }

    /// Decode `bytes` without replacement characters.
    pub fn decode(self, bytes: &[u8], label: &str) -> Result<String, DecodeError> {
        match self {
            Self::Latin1 => Ok(latin1_to_string(bytes)),
            Self::Ascii if bytes.is_ascii() => Ok(latin1_to_string(bytes)),
            Self::Ascii => Err(DecodeError::Malformed {
                encoding: label.to_string(),
            }),
            Self::Whatwg(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
                .ok_or_else(|| DecodeError::Malformed {
                    encoding: label.to_string(),
                }),
        }
    }
}

/// Infer the body encoding from the response headers.
pub fn infer_encoding(headers: &HeaderStore) -> InferredEncoding {
    let declared = headers.lookup("content-type").and_then(|content_type| {
        let content_type = content_type.to_lowercase();
        CHARSET_REGEX
            .captures(&content_type)
            .map(|caps| caps[1].to_string())
    });

    match declared {
        Some(name) => InferredEncoding {
            name,
            source: EncodingSource::Declared,
        },
        None => InferredEncoding {
            name: FALLBACK_ENCODING.to_string(),
            source: EncodingSource::Assumed,
        },
    }
}

/// Decode `body` with an already inferred encoding.
pub fn decode_body(body: &[u8], encoding: &InferredEncoding) -> Result<String, DecodeError> {
    Charset::for_label(&encoding.name)?.decode(body, &encoding.name)
}

/// Runs once per launch over the completed headers and body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseDecoder {
    verbose: bool,
}

impl ResponseDecoder {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Infer the encoding, report it on `out` when verbose, then decode.
    ///
    /// The diagnostic is written before decoding, so it is visible even when
    /// decoding fails.
    pub fn decode<W: Write>(
        &self,
        headers: &HeaderStore,
        body: &[u8],
        out: &mut W,
    ) -> Result<DecodedResponse, FetchError> {
        let inferred = infer_encoding(headers);
        tracing::debug!(
            encoding = %inferred.name,
            source = ?inferred.source,
            "Encoding inferred"
        );

        if self.verbose {
            writeln!(out, "{}", inferred.diagnostic())?;
        }

        let text = decode_body(body, &inferred)?;
        Ok(DecodedResponse {
            encoding: inferred.name,
            source: inferred.source,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(lines: &[&str]) -> HeaderStore {
        let mut store = HeaderStore::new();
        for line in lines {
            store.record(line.as_bytes());
        }
        store
    }

    #[test]
    fn declared_charset_is_lowercased_token() {
        let store = headers(&["Content-Type: text/html; charset=UTF-8"]);
        let inferred = infer_encoding(&store);

        assert_eq!(inferred.name, "utf-8");
        assert_eq!(inferred.source, EncodingSource::Declared);
    }

    #[test]
    fn utf8_body_round_trips() {
        let store = headers(&["Content-Type: text/html; charset=UTF-8"]);
        let body = "h\u{e9}llo w\u{f6}rld \u{1f980}".as_bytes();
        let mut out = Vec::new();

        let decoded = ResponseDecoder::new(false)
            .decode(&store, body, &mut out)
            .unwrap();

        let encoding = Encoding::for_label(decoded.encoding.as_bytes()).unwrap();
        let (encoded, _, had_errors) = encoding.encode(&decoded.text);
        assert!(!had_errors);
        assert_eq!(encoded.as_ref(), body);
        assert!(out.is_empty());
    }

    #[test]
    fn missing_content_type_falls_back() {
        let inferred = infer_encoding(&HeaderStore::new());
        assert_eq!(inferred.name, FALLBACK_ENCODING);
        assert_eq!(inferred.source, EncodingSource::Assumed);
    }

    #[test]
    fn content_type_without_charset_falls_back() {
        let store = headers(&["Content-Type: application/json"]);
        assert_eq!(infer_encoding(&store).name, FALLBACK_ENCODING);
    }

    #[test]
    fn fallback_accepts_every_byte() {
        let body: Vec<u8> = (0..=255).collect();
        let text = decode_body(&body, &infer_encoding(&HeaderStore::new())).unwrap();

        assert_eq!(text.chars().count(), 256);
        assert!(text.chars().zip(0u32..).all(|(c, b)| c as u32 == b));
    }

    #[test]
    fn charset_found_anywhere_in_value() {
        let store = headers(&["content-type: text/plain; format=flowed; CHARSET=Shift_JIS; q=1"]);
        assert_eq!(infer_encoding(&store).name, "shift_jis;");
    }

    #[test]
    fn trailing_punctuation_is_kept_and_fails() {
        let store = headers(&["Content-Type: text/html; charset=utf-8;"]);
        let inferred = infer_encoding(&store);
        assert_eq!(inferred.name, "utf-8;");

        let err = decode_body(b"hello", &inferred).unwrap_err();
        assert_eq!(err, DecodeError::UnknownEncoding("utf-8;".into()));
    }

    #[test]
    fn quoted_charset_keeps_quotes() {
        let store = headers(&["Content-Type: text/html; charset=\"utf-8\""]);
        assert_eq!(infer_encoding(&store).name, "\"utf-8\"");
    }

    #[test]
    fn malformed_bytes_are_an_error() {
        let store = headers(&["Content-Type: text/plain; charset=utf-8"]);
        let err = ResponseDecoder::default()
            .decode(&store, b"\xff\xfe\xfd", &mut Vec::new())
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::Decode(DecodeError::Malformed { ref encoding }) if encoding == "utf-8"
        ));
    }

    #[test]
    fn latin1_labels_are_not_windows_1252() {
        assert_eq!(Charset::for_label("latin-1").unwrap(), Charset::Latin1);
        assert_eq!(Charset::for_label("ISO-8859-1").unwrap(), Charset::Latin1);

        let text = Charset::Latin1.decode(b"\x80", "iso-8859-1").unwrap();
        assert_eq!(text, "\u{80}");
    }

    #[test]
    fn latin1_aliases_ignore_separator_style() {
        for label in ["latin_1", "iso8859_1", "iso_ir_100", "ISO_8859-1", "Latin 1", "l1"] {
            assert_eq!(Charset::for_label(label).unwrap(), Charset::Latin1, "{label}");
        }
    }

    #[test]
    fn ascii_rejects_high_bytes() {
        let store = headers(&["Content-Type: text/plain; charset=us-ascii"]);
        let inferred = infer_encoding(&store);

        assert_eq!(Charset::for_label(&inferred.name).unwrap(), Charset::Ascii);
        assert_eq!(
            decode_body(b"caf\xe9", &inferred).unwrap_err(),
            DecodeError::Malformed {
                encoding: "us-ascii".into()
            }
        );
        assert_eq!(decode_body(b"cafe", &inferred).unwrap(), "cafe");
    }

    #[test]
    fn ascii_aliases_resolve() {
        for label in ["ascii", "US-ASCII", "ansi_x3.4-1968", "iso646-us", "cp367"] {
            assert_eq!(Charset::for_label(label).unwrap(), Charset::Ascii, "{label}");
        }
    }

    #[test]
    fn whatwg_labels_resolve() {
        let store = headers(&["Content-Type: text/html; charset=euc-kr"]);
        let decoded = ResponseDecoder::default()
            .decode(&store, b"\xc7\xd1", &mut Vec::new())
            .unwrap();
        assert_eq!(decoded.text, "\u{d55c}");
    }

    #[test]
    fn verbose_reports_before_decoding() {
        let mut out = Vec::new();
        let declared = headers(&["Content-Type: text/plain; charset=bogus"]);
        let err = ResponseDecoder::new(true).decode(&declared, b"x", &mut out);

        assert!(err.is_err());
        assert_eq!(String::from_utf8(out).unwrap(), "Decoding using bogus\n");

        let mut out = Vec::new();
        ResponseDecoder::new(true)
            .decode(&HeaderStore::new(), b"x", &mut out)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Assuming encoding is iso-8859-1\n"
        );
    }
}
