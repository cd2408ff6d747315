//! Table of element/attribute pairs that reference external files.

use serde::Deserialize;

/// Attributes that name external files in MJCF documents.
///
/// `None` matches the attribute on any element. The six cube-face attributes only carry
/// file names on `<texture>`.
pub const MJCF_ASSET_ATTRIBUTES: &[(Option<&str>, &str)] = &[
  (None, "file"),
  (Some("texture"), "fileright"),
  (Some("texture"), "fileleft"),
  (Some("texture"), "fileup"),
  (Some("texture"), "filedown"),
  (Some("texture"), "filefront"),
  (Some("texture"), "fileback"),
];

/// Single rule marking an attribute as an asset reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttributeRule {
  /// Element name the rule is restricted to, or `None` for every element.
  #[serde(default)]
  pub element: Option<String>,
  /// Attribute name carrying the file reference.
  pub attribute: String,
}

impl AttributeRule {
  /// Rule matching `attribute` on every element.
  pub fn any_element(attribute: impl Into<String>) -> Self {
    Self {
      element: None,
      attribute: attribute.into(),
    }
  }

  /// Rule matching `attribute` on `element` only.
  pub fn on_element(element: impl Into<String>, attribute: impl Into<String>) -> Self {
    Self {
      element: Some(element.into()),
      attribute: attribute.into(),
    }
  }

  fn matches(&self, element: &[u8], attribute: &[u8]) -> bool {
    self.attribute.as_bytes() == attribute
      && self
        .element
        .as_deref()
        .is_none_or(|name| name.as_bytes() == element)
  }
}

/// Set of rules checked against every attribute in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTable {
  rules: Vec<AttributeRule>,
}

impl Default for AttributeTable {
  fn default() -> Self {
    Self::mjcf()
  }
}

impl AttributeTable {
  /// Table built from [`MJCF_ASSET_ATTRIBUTES`].
  pub fn mjcf() -> Self {
    let rules = MJCF_ASSET_ATTRIBUTES
      .iter()
      .map(|(element, attribute)| match element {
        Some(element) => AttributeRule::on_element(*element, *attribute),
        None => AttributeRule::any_element(*attribute),
      })
      .collect();
    Self { rules }
  }

  /// Table containing only the supplied rules.
  pub fn from_rules(rules: Vec<AttributeRule>) -> Self {
    Self { rules }
  }

  /// Append rules, skipping ones already present.
  pub fn extend(&mut self, rules: impl IntoIterator<Item = AttributeRule>) {
    for rule in rules {
      if !self.rules.contains(&rule) {
        self.rules.push(rule);
      }
    }
  }

  /// Rules in match order.
  pub fn rules(&self) -> &[AttributeRule] {
    &self.rules
  }

  /// Whether `attribute` on `element` holds a file reference.
  pub fn is_asset_reference(&self, element: &[u8], attribute: &[u8]) -> bool {
    self.rules.iter().any(|rule| rule.matches(element, attribute))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn file_attribute_matches_any_element() {
    let table = AttributeTable::mjcf();
    assert!(table.is_asset_reference(b"mesh", b"file"));
    assert!(table.is_asset_reference(b"include", b"file"));
    assert!(!table.is_asset_reference(b"mesh", b"name"));
  }

  #[test]
  fn cube_faces_are_limited_to_textures() {
    let table = AttributeTable::mjcf();
    assert!(table.is_asset_reference(b"texture", b"fileright"));
    assert!(!table.is_asset_reference(b"mesh", b"fileright"));
  }

  #[test]
  fn extending_skips_duplicates() {
    let mut table = AttributeTable::mjcf();
    let before = table.rules().len();
    table.extend([
      AttributeRule::any_element("file"),
      AttributeRule::on_element("skin", "texfile"),
    ]);

    assert_eq!(table.rules().len(), before + 1);
    assert!(table.is_asset_reference(b"skin", b"texfile"));
  }
}
