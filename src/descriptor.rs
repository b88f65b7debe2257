//! The read-only view of a test that filters are evaluated against.
//!
//! Filters never look at how a host represents types, assemblies or
//! members; they only go through [`TestDescriptor`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Names of a declaring type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    name: String,
    full_name: String,
    assembly_qualified_name: Option<String>,
}

impl TypeRef {
    /// Build a reference from a full type name such as `Acme.Tests.Fixture`.
    ///
    /// The short name is the segment after the last `.` or `+`; the
    /// assembly-qualified name is only known when `assembly` is given.
    pub fn new(full_name: &str, assembly: Option<&str>) -> Self {
        let name = full_name
            .rsplit(|c| c == '.' || c == '+')
            .next()
            .unwrap_or(full_name)
            .to_string();
        Self {
            name,
            full_name: full_name.to_string(),
            assembly_qualified_name: assembly.map(|asm| format!("{full_name}, {asm}")),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn assembly_qualified_name(&self) -> Option<&str> {
        self.assembly_qualified_name.as_deref()
    }

    /// Namespace part of the full name, if the type is not at the root.
    pub fn namespace(&self) -> Option<&str> {
        self.full_name
            .rsplit_once('.')
            .map(|(namespace, _)| namespace)
            .filter(|namespace| !namespace.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MetadataValues {
    One(String),
    Many(Vec<String>),
}

/// Key/value multimap attached to a test.
///
/// Keys are unique; each key keeps its values in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, MetadataValues>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct Metadata {
    entries: BTreeMap<String, Vec<String>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    /// All values for `key`, empty when the key is absent.
    pub fn get(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, MetadataValues>> for Metadata {
    fn from(raw: BTreeMap<String, MetadataValues>) -> Self {
        let entries = raw
            .into_iter()
            .map(|(key, values)| {
                let values = match values {
                    MetadataValues::One(value) => vec![value],
                    MetadataValues::Many(values) => values,
                };
                (key, values)
            })
            .collect();
        Self { entries }
    }
}

impl From<Metadata> for BTreeMap<String, Vec<String>> {
    fn from(metadata: Metadata) -> Self {
        metadata.entries
    }
}

/// Capabilities a test must expose to be filtered.
///
/// Every accessor may report absence; leaf filters treat an absent value as
/// a non-match.
pub trait TestDescriptor {
    fn id(&self) -> Option<&str>;

    fn name(&self) -> Option<&str>;

    fn assembly_name(&self) -> Option<&str>;

    fn namespace_name(&self) -> Option<&str>;

    /// The type declaring the test.
    fn type_ref(&self) -> Option<&TypeRef>;

    fn member_name(&self) -> Option<&str>;

    /// Whether the declaring type derives, directly or not, from a type
    /// accepted by `supertype`. Interface implementations count.
    fn is_subtype_of(&self, _supertype: &dyn Fn(&TypeRef) -> bool) -> bool {
        false
    }

    fn metadata(&self) -> &Metadata;
}
