use std::collections::BTreeSet;

use quick_xml::events::{BytesStart, Event};

use crate::errors::Result;
use crate::xml::{AttributeTable, parse_error, scan_document};

/// Collect asset references from `xml` using the default MJCF attribute table.
pub fn extract_paths(xml: &str) -> Result<Vec<String>> {
  extract_asset_paths(xml, &AttributeTable::mjcf())
}

/// Collect the distinct values of every attribute in `table`, in document order.
///
/// Values are returned exactly as written after entity unescaping; the first occurrence of a
/// repeated value fixes its position and empty values are skipped. Nothing is resolved
/// against the filesystem.
pub fn extract_asset_paths(xml: &str, table: &AttributeTable) -> Result<Vec<String>> {
  let mut seen = BTreeSet::new();
  let mut paths = Vec::new();

  scan_document(xml, |event, position| {
    if let Event::Start(elem) | Event::Empty(elem) = &event {
      for value in asset_values(elem, table, position)? {
        if !value.is_empty() && seen.insert(value.clone()) {
          paths.push(value);
        }
      }
    }
    Ok(())
  })?;

  log::debug!("found {} distinct asset reference(s)", paths.len());
  Ok(paths)
}

fn asset_values(elem: &BytesStart<'_>, table: &AttributeTable, position: u64) -> Result<Vec<String>> {
  let name = elem.name();
  let mut values = Vec::new();
  for attr in elem.attributes() {
    let attr = attr.map_err(|err| parse_error(position, err))?;
    if table.is_asset_reference(name.as_ref(), attr.key.as_ref()) {
      let value = attr
        .unescape_value()
        .map_err(|err| parse_error(position, err))?;
      values.push(value.into_owned());
    }
  }
  Ok(values)
}
