use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};

use crate::errors::{AssetCacheError, Result};
use crate::models::PathMapping;
use crate::xml::{AttributeTable, parse_error, scan_document};

/// Source of replacement values for asset references.
pub trait ReferenceLookup {
  /// Replacement for `raw`, or `None` to leave the attribute untouched.
  fn replacement(&self, raw: &str) -> Option<String>;
}

impl ReferenceLookup for PathMapping {
  fn replacement(&self, raw: &str) -> Option<String> {
    self.get(raw).map(ToString::to_string)
  }
}

impl ReferenceLookup for BTreeMap<String, String> {
  fn replacement(&self, raw: &str) -> Option<String> {
    self.get(raw).cloned()
  }
}

impl ReferenceLookup for HashMap<String, String> {
  fn replacement(&self, raw: &str) -> Option<String> {
    self.get(raw).cloned()
  }
}

/// Replace every asset reference in `xml` that `lookup` knows about.
///
/// Elements without a replaced attribute are written back byte for byte, as is everything
/// outside start tags. Replacement values are escaped on output.
pub fn rewrite_asset_references<L>(xml: &str, table: &AttributeTable, lookup: &L) -> Result<String>
where
  L: ReferenceLookup + ?Sized,
{
  let mut writer = Writer::new(Vec::with_capacity(xml.len()));
  let mut rewritten = 0usize;

  scan_document(xml, |event, position| {
    let event = match event {
      Event::Start(elem) => match rewrite_element(&elem, table, lookup, position)? {
        Some(replaced) => {
          rewritten += 1;
          Event::Start(replaced)
        }
        None => Event::Start(elem),
      },
      Event::Empty(elem) => match rewrite_element(&elem, table, lookup, position)? {
        Some(replaced) => {
          rewritten += 1;
          Event::Empty(replaced)
        }
        None => Event::Empty(elem),
      },
      other => other,
    };
    writer.write_event(event).map_err(|err| {
      AssetCacheError::io(std::io::Error::other(err.to_string()), "<rewritten document>")
    })
  })?;

  log::debug!("rewrote asset references on {rewritten} element(s)");
  String::from_utf8(writer.into_inner()).map_err(|err| parse_error(0, err))
}

fn rewrite_element<L>(
  elem: &BytesStart<'_>,
  table: &AttributeTable,
  lookup: &L,
  position: u64,
) -> Result<Option<BytesStart<'static>>>
where
  L: ReferenceLookup + ?Sized,
{
  let name = elem.name();
  let mut changed = false;
  let mut replaced = elem.to_owned();
  replaced.clear_attributes();

  for attr in elem.attributes() {
    let attr = attr.map_err(|err| parse_error(position, err))?;
    if table.is_asset_reference(name.as_ref(), attr.key.as_ref()) {
      let raw = attr
        .unescape_value()
        .map_err(|err| parse_error(position, err))?
        .into_owned();
      if let Some(value) = lookup.replacement(&raw) {
        changed |= value != raw;
        replaced.push_attribute(Attribute {
          key: attr.key,
          value: Cow::Owned(escape(value.as_str()).into_owned().into_bytes()),
        });
        continue;
      }
    }
    replaced.push_attribute(attr);
  }

  Ok(changed.then_some(replaced))
}
