//! Code model extracted from a source file.
//!
//! The model is the structural slice of a compilation unit that stub
//! generation cares about: namespaces, the classes inside them, and the
//! names of each class's methods, all in declaration order.

use serde::Serialize;
use smallvec::SmallVec;

/// A class declaration and the names of its methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassEntry {
    pub name: String,
    /// Method names in declaration order.
    pub method_names: SmallVec<[String; 8]>,
}

impl ClassEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method_names: SmallVec::new(),
        }
    }
}

/// A namespace declaration and the classes directly governed by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceEntry {
    pub name: String,
    /// Classes in declaration order.
    pub classes: Vec<ClassEntry>,
}

impl NamespaceEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: Vec::new(),
        }
    }
}

/// The full code model for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeModel {
    /// Namespaces in declaration order. A file that failed to parse (or
    /// declares nothing) has an empty list.
    pub namespaces: Vec<NamespaceEntry>,
    /// Parse error if extraction failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl CodeModel {
    /// Create an empty model.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a model carrying a parse error.
    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            namespaces: Vec::new(),
            parse_error: Some(error.into()),
        }
    }

    /// True if the model contains no namespaces.
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Total number of classes across all namespaces.
    pub fn class_count(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.classes.len()).sum()
    }
}
