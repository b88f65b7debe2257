//! Test catalogs loaded from JSON or JSON5 documents.
//!
//! A catalog lists a tree of tests and a table of types with their base
//! types and interfaces. Type relationships are resolved once when the
//! catalog is built, so filters can ask about supertypes cheaply.

use crate::descriptor::{Metadata, TestDescriptor, TypeRef};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse catalog '{path}': {message}")]
    Parse { path: String, message: String },
}

/// Base types and interfaces of a type, keyed by full name in the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypeDecl {
    pub assembly: Option<String>,
    pub bases: Vec<String>,
}

/// A test as written in the catalog document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TestRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub assembly: Option<String>,
    pub namespace: Option<String>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub member: Option<String>,
    pub metadata: Metadata,
    pub children: Vec<TestRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    types: BTreeMap<String, TypeDecl>,
    tests: Vec<TestRecord>,
}

/// A test with its attributes and supertypes resolved.
#[derive(Debug, Clone)]
pub struct CatalogTest {
    id: Option<String>,
    name: Option<String>,
    assembly: Option<String>,
    namespace: Option<String>,
    type_ref: Option<TypeRef>,
    member: Option<String>,
    metadata: Metadata,
    supertypes: Vec<TypeRef>,
    path: String,
    depth: usize,
    parent: Option<usize>,
}

impl CatalogTest {
    /// Names from the root down to this test, joined by `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Index of the parent test in [`TestCatalog::tests`].
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn supertypes(&self) -> &[TypeRef] {
        &self.supertypes
    }
}

impl TestDescriptor for CatalogTest {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn assembly_name(&self) -> Option<&str> {
        self.assembly.as_deref()
    }

    fn namespace_name(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn type_ref(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }

    fn member_name(&self) -> Option<&str> {
        self.member.as_deref()
    }

    fn is_subtype_of(&self, supertype: &dyn Fn(&TypeRef) -> bool) -> bool {
        self.supertypes.iter().any(|t| supertype(t))
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Tests in depth-first order; parents come before their children.
#[derive(Debug, Clone, Default)]
pub struct TestCatalog {
    tests: Vec<CatalogTest>,
}

impl TestCatalog {
    pub fn from_records(types: &BTreeMap<String, TypeDecl>, roots: &[TestRecord]) -> Self {
        let mut builder = Builder {
            types,
            closures: HashMap::new(),
            tests: Vec::new(),
        };
        for root in roots {
            builder.add(root, None);
        }
        debug!("catalog built with {} tests", builder.tests.len());
        Self {
            tests: builder.tests,
        }
    }

    /// Parse a catalog document. Plain JSON is accepted as well.
    pub fn from_json5_str(raw: &str) -> Result<Self, CatalogError> {
        Self::parse(raw, "<inline>")
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let path_display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path_display.clone(),
            source,
        })?;
        Self::parse(&raw, &path_display)
    }

    fn parse(raw: &str, path: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = json5::from_str(raw).map_err(|e| CatalogError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_records(&file.types, &file.tests))
    }

    pub fn tests(&self) -> &[CatalogTest] {
        &self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

struct Builder<'a> {
    types: &'a BTreeMap<String, TypeDecl>,
    closures: HashMap<String, Vec<TypeRef>>,
    tests: Vec<CatalogTest>,
}

impl Builder<'_> {
    fn add(&mut self, record: &TestRecord, parent: Option<usize>) {
        let inherited = parent.map(|index| &self.tests[index]);

        let type_name = record.type_name.clone().or_else(|| {
            inherited
                .and_then(|p| p.type_ref.as_ref())
                .map(|t| t.full_name().to_string())
        });
        let decl = type_name.as_deref().and_then(|name| self.types.get(name));
        let assembly = record
            .assembly
            .clone()
            .or_else(|| decl.and_then(|d| d.assembly.clone()))
            .or_else(|| inherited.and_then(|p| p.assembly.clone()));
        let type_assembly = decl
            .and_then(|d| d.assembly.as_deref())
            .or(assembly.as_deref());
        let type_ref = type_name
            .as_deref()
            .map(|name| TypeRef::new(name, type_assembly));
        let namespace = record
            .namespace
            .clone()
            .or_else(|| type_ref.as_ref().and_then(|t| t.namespace()).map(str::to_string))
            .or_else(|| inherited.and_then(|p| p.namespace.clone()));

        let label = record
            .name
            .as_deref()
            .or(record.id.as_deref())
            .unwrap_or("?");
        let (path, depth) = match inherited {
            Some(p) => (format!("{}/{}", p.path, label), p.depth + 1),
            None => (label.to_string(), 0),
        };

        let supertypes = match type_name.as_deref() {
            Some(name) => self.supertypes_of(name),
            None => Vec::new(),
        };

        let index = self.tests.len();
        self.tests.push(CatalogTest {
            id: record.id.clone(),
            name: record.name.clone(),
            assembly,
            namespace,
            type_ref,
            member: record.member.clone(),
            metadata: record.metadata.clone(),
            supertypes,
            path,
            depth,
            parent,
        });

        for child in &record.children {
            self.add(child, Some(index));
        }
    }

    /// Transitive bases of `type_name`, nearest first. Cycles are cut.
    fn supertypes_of(&mut self, type_name: &str) -> Vec<TypeRef> {
        if let Some(cached) = self.closures.get(type_name) {
            return cached.clone();
        }

        let mut seen: HashSet<&str> = HashSet::from([type_name]);
        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut resolved = Vec::new();
        if let Some(decl) = self.types.get(type_name) {
            queue.extend(decl.bases.iter().map(String::as_str));
        }

        while let Some(base) = queue.pop_front() {
            if !seen.insert(base) {
                if base == type_name {
                    warn!("type '{type_name}' appears among its own bases");
                }
                continue;
            }
            let decl = self.types.get(base);
            resolved.push(TypeRef::new(base, decl.and_then(|d| d.assembly.as_deref())));
            if let Some(decl) = decl {
                queue.extend(decl.bases.iter().map(String::as_str));
            }
        }

        self.closures.insert(type_name.to_string(), resolved.clone());
        resolved
    }
}
