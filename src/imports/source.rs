//! Source decoding with encoding detection and a lossy fallback
//!
//! Detection order: byte-order marks (UTF-8, UTF-16 LE/BE), then a PEP 263
//! coding cookie declaring Latin-1, then UTF-8. Bytes that do not decode are
//! replaced with U+FFFD; decoding never fails.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Encoding a source file was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceEncoding {
  Utf8,
  Utf8Bom,
  Utf16Le,
  Utf16Be,
  Latin1,
}

/// Decoded file content
#[derive(Debug, Clone)]
pub struct DecodedSource {
  pub text: String,
  pub encoding: SourceEncoding,
  /// At least one byte sequence was replaced with U+FFFD
  pub lossy: bool,
}

/// Read and decode a file.
pub fn read_source(path: &Path) -> io::Result<DecodedSource> {
  let bytes = fs::read(path)?;
  Ok(decode_source(&bytes))
}

/// Decode raw file bytes.
pub fn decode_source(bytes: &[u8]) -> DecodedSource {
  if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
    let (text, lossy) = utf8_lossy(rest);
    return DecodedSource {
      text,
      encoding: SourceEncoding::Utf8Bom,
      lossy,
    };
  }
  if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
    let (text, lossy) = utf16_lossy(rest, u16::from_le_bytes);
    return DecodedSource {
      text,
      encoding: SourceEncoding::Utf16Le,
      lossy,
    };
  }
  if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
    let (text, lossy) = utf16_lossy(rest, u16::from_be_bytes);
    return DecodedSource {
      text,
      encoding: SourceEncoding::Utf16Be,
      lossy,
    };
  }
  if declares_latin1(bytes) {
    return DecodedSource {
      text: bytes.iter().map(|&b| b as char).collect(),
      encoding: SourceEncoding::Latin1,
      lossy: false,
    };
  }

  let (text, lossy) = utf8_lossy(bytes);
  DecodedSource {
    text,
    encoding: SourceEncoding::Utf8,
    lossy,
  }
}

fn utf8_lossy(bytes: &[u8]) -> (String, bool) {
  match std::str::from_utf8(bytes) {
    Ok(text) => (text.to_string(), false),
    Err(_) => (String::from_utf8_lossy(bytes).into_owned(), true),
  }
}

fn utf16_lossy(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> (String, bool) {
  let mut lossy = bytes.len() % 2 != 0;
  let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
  let text = char::decode_utf16(units)
    .map(|r| {
      r.unwrap_or_else(|_| {
        lossy = true;
        char::REPLACEMENT_CHARACTER
      })
    })
    .collect();
  (text, lossy)
}

/// PEP 263: a `coding[:=]` comment on line one or two.
fn declares_latin1(bytes: &[u8]) -> bool {
  bytes
    .split(|&b| b == b'\n')
    .take(2)
    .filter_map(coding_cookie)
    .next()
    .is_some_and(|name| {
      matches!(
        name.as_str(),
        "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "iso-latin-1" | "l1"
      )
    })
}

fn coding_cookie(line: &[u8]) -> Option<String> {
  let line = String::from_utf8_lossy(line);
  let comment = line.trim_start().strip_prefix('#')?;
  let idx = comment.find("coding")?;
  let rest = comment[idx + "coding".len()..].strip_prefix([':', '='])?;
  let name: String = rest
    .trim_start()
    .chars()
    .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
    .collect();
  if name.is_empty() {
    None
  } else {
    Some(name.to_ascii_lowercase().replace('_', "-"))
  }
}
