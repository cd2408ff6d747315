//! Streaming XML helpers for finding and rewriting asset references.
//!
//! Both extraction and rewriting walk the document through [`scan_document`], which rejects
//! anything that is not a single well-formed element tree before a caller sees an event.

mod attributes;
mod extract;
mod rewrite;

use std::fmt::Display;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::errors::{AssetCacheError, Result};

pub use attributes::{AttributeRule, AttributeTable, MJCF_ASSET_ATTRIBUTES};
pub use extract::{extract_asset_paths, extract_paths};
pub use rewrite::{ReferenceLookup, rewrite_asset_references};

pub(crate) fn parse_error(position: u64, message: impl Display) -> AssetCacheError {
  AssetCacheError::Parse {
    position,
    message: message.to_string(),
  }
}

/// Feed every event of `xml` to `on_event` together with the reader position.
///
/// Fails on reader errors, unclosed elements, a second root element, stray text outside
/// the root, and documents without any element.
pub(crate) fn scan_document<'x, F>(xml: &'x str, mut on_event: F) -> Result<()>
where
  F: FnMut(Event<'x>, u64) -> Result<()>,
{
  let mut reader = Reader::from_str(xml);
  let mut depth = 0usize;
  let mut seen_root = false;

  loop {
    let position = reader.buffer_position() as u64;
    let event = match reader.read_event() {
      Ok(Event::Eof) => break,
      Ok(event) => event,
      Err(err) => return Err(parse_error(reader.error_position() as u64, err)),
    };

    match &event {
      Event::Start(_) | Event::Empty(_) => {
        if depth == 0 && seen_root {
          return Err(parse_error(position, "junk after document element"));
        }
        seen_root = true;
        if matches!(event, Event::Start(_)) {
          depth += 1;
        }
      }
      Event::End(_) => {
        if depth == 0 {
          return Err(parse_error(position, "closing tag without an open element"));
        }
        depth -= 1;
      }
      Event::Text(text) if depth == 0 => {
        if !text.iter().all(u8::is_ascii_whitespace) {
          return Err(parse_error(position, "text outside the root element"));
        }
      }
      Event::CData(_) if depth == 0 => {
        return Err(parse_error(position, "CDATA outside the root element"));
      }
      _ => {}
    }

    on_event(event, position)?;
  }

  if depth != 0 {
    return Err(parse_error(
      reader.buffer_position() as u64,
      format!("{depth} unclosed element(s) at end of document"),
    ));
  }
  if !seen_root {
    return Err(parse_error(0, "no root element"));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn check(xml: &str) -> Result<()> {
    scan_document(xml, |_, _| Ok(()))
  }

  #[test]
  fn accepts_declaration_comments_and_whitespace() {
    check("<?xml version=\"1.0\"?>\n<!-- scene -->\n<mujoco><asset/></mujoco>\n").unwrap();
  }

  #[test]
  fn rejects_malformed_documents() {
    for xml in [
      "<mujoco><asset></mujoco>",
      "<mujoco>",
      "<mujoco/><worldbody/>",
      "stray <mujoco/>",
      "",
      "<mesh file=\"a.stl></mujoco>",
    ] {
      let err = check(xml).expect_err(xml);
      assert!(matches!(err, AssetCacheError::Parse { .. }), "{xml}: {err}");
    }
  }
}
