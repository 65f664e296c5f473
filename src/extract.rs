//! Code model extraction using tree-sitter.
//!
//! Extracts namespace, class, and method declarations from C# source text.
//! Extraction never fails to the caller: malformed input is reported as a
//! warning and yields an empty model, so one bad file cannot take down a
//! pipeline run.

use std::cell::RefCell;
use std::path::Path;

use smallvec::SmallVec;
use tracing::warn;
use tree_sitter::{Node, Parser};

use crate::model::{ClassEntry, CodeModel, NamespaceEntry};

// Thread-local parser caching to avoid re-initialization overhead.
//
// Important: no panics here. Parser initialization can fail (grammar load),
// and extraction must stay panic-free.
thread_local! {
    static CSHARP_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

fn init_csharp_parser() -> Result<Parser, ()> {
    let mut p = Parser::new();
    p.set_language(&tree_sitter_c_sharp::LANGUAGE.into())
        .map_err(|_| ())?;
    Ok(p)
}

fn with_csharp_parser<F, R>(f: F) -> Result<R, String>
where
    F: FnOnce(&mut Parser) -> R,
{
    CSHARP_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(init_csharp_parser().map_err(|()| "failed to initialize parser".to_string())?);
        }

        let parser = slot
            .as_mut()
            .ok_or_else(|| "failed to initialize parser".to_string())?;
        Ok(f(parser))
    })
}

/// Extract node text from content.
fn node_text(node: Node, content: &str) -> String {
    content[node.byte_range()].to_string()
}

/// Name of a declaration node.
///
/// Qualified namespace names (`namespace A.B`) resolve to their leftmost
/// identifier, matching the first-non-keyword-token convention of the
/// generated output's consumers.
fn declaration_name(node: Node, content: &str) -> Option<String> {
    let mut name = node.child_by_field_name("name")?;
    while name.kind() == "qualified_name" {
        name = name.child_by_field_name("qualifier")?;
    }
    Some(node_text(name, content))
}

fn is_namespace(kind: &str) -> bool {
    matches!(
        kind,
        "namespace_declaration" | "file_scoped_namespace_declaration"
    )
}

/// Type declarations that open a new method scope. Methods found inside
/// these do not belong to the enclosing class.
fn is_type_scope(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "struct_declaration"
            | "record_declaration"
            | "interface_declaration"
            | "enum_declaration"
    )
}

/// Extract the code model from C# source text.
///
/// Never returns an error: a file that cannot be parsed is logged as a
/// warning (naming `path`) and produces an empty model.
pub fn extract(path: &Path, text: &str) -> CodeModel {
    let tree = match with_csharp_parser(|parser| parser.parse(text, None)) {
        Ok(Some(tree)) => tree,
        Ok(None) | Err(_) => {
            warn!("cannot parse file: {}", path.display());
            return CodeModel::with_error("parser produced no tree");
        }
    };

    let root = tree.root_node();
    if root.has_error() {
        warn!("cannot parse file: {}", path.display());
        return CodeModel::with_error("syntax errors in source");
    }

    let mut namespaces = Vec::new();
    collect_namespaces(root, text, &mut namespaces);
    CodeModel {
        namespaces,
        parse_error: None,
    }
}

/// Collect every namespace declaration in the tree, in document order.
/// Nested namespaces each yield their own entry.
fn collect_namespaces(node: Node, content: &str, out: &mut Vec<NamespaceEntry>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "namespace_declaration" {
            if let Some(entry) = extract_namespace(child, content) {
                out.push(entry);
            }
        } else if child.kind() == "file_scoped_namespace_declaration" {
            if let Some(entry) = extract_file_scoped_namespace(child, content) {
                out.push(entry);
            }
        }
        collect_namespaces(child, content, out);
    }
}

fn extract_namespace(node: Node, content: &str) -> Option<NamespaceEntry> {
    let mut entry = NamespaceEntry::new(declaration_name(node, content)?);
    collect_classes(node, content, &mut entry.classes);
    Some(entry)
}

/// A file-scoped namespace (`namespace N;`) does not contain the
/// declarations that follow it; they are its siblings in the compilation
/// unit. Collect classes from the remainder of the file instead of the
/// namespace node's children.
fn extract_file_scoped_namespace(node: Node, content: &str) -> Option<NamespaceEntry> {
    let mut entry = NamespaceEntry::new(declaration_name(node, content)?);
    let mut sibling = node.next_sibling();
    while let Some(decl) = sibling {
        if decl.kind() == "class_declaration" {
            if let Some(class) = extract_class(decl, content) {
                entry.classes.push(class);
            }
        }
        collect_classes(decl, content, &mut entry.classes);
        sibling = decl.next_sibling();
    }
    Some(entry)
}

/// Collect classes governed by a namespace node. Collection stops at nested
/// namespace boundaries so each class belongs to its innermost namespace
/// exactly once. Classes nested inside other classes get their own entry.
fn collect_classes(node: Node, content: &str, out: &mut Vec<ClassEntry>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if is_namespace(child.kind()) {
            continue;
        }
        if child.kind() == "class_declaration" {
            if let Some(class) = extract_class(child, content) {
                out.push(class);
            }
        }
        collect_classes(child, content, out);
    }
}

fn extract_class(node: Node, content: &str) -> Option<ClassEntry> {
    let mut entry = ClassEntry::new(declaration_name(node, content)?);
    if let Some(body) = node.child_by_field_name("body") {
        collect_methods(body, content, &mut entry.method_names);
    }
    Some(entry)
}

/// Collect method names in declaration order, stopping at nested type
/// scopes. Constructors, properties, and local functions are not methods.
fn collect_methods(node: Node, content: &str, out: &mut SmallVec<[String; 8]>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if is_type_scope(child.kind()) || is_namespace(child.kind()) {
            continue;
        }
        if child.kind() == "method_declaration" {
            if let Some(name) = declaration_name(child, content) {
                out.push(name);
            }
            continue;
        }
        collect_methods(child, content, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn extract_str(text: &str) -> CodeModel {
        extract(&PathBuf::from("Test.cs"), text)
    }

    #[test]
    fn test_extract_simple_class() {
        let model = extract_str(
            "namespace N { class C { void M1(){} void M2(){} } }",
        );

        assert_eq!(model.namespaces.len(), 1);
        let ns = &model.namespaces[0];
        assert_eq!(ns.name, "N");
        assert_eq!(ns.classes.len(), 1);
        assert_eq!(ns.classes[0].name, "C");
        assert_eq!(ns.classes[0].method_names.as_slice(), ["M1", "M2"]);
    }

    #[test]
    fn test_extract_preserves_method_order() {
        let model = extract_str(
            r#"
namespace Calc
{
    public class Calculator
    {
        public int Add(int a, int b) { return a + b; }
        private void Reset() {}
        public int Sub(int a, int b) { return a - b; }
    }
}
"#,
        );

        let class = &model.namespaces[0].classes[0];
        assert_eq!(class.method_names.as_slice(), ["Add", "Reset", "Sub"]);
    }

    #[test]
    fn test_extract_class_with_no_methods() {
        let model = extract_str("namespace N { class Empty {} }");

        assert_eq!(model.class_count(), 1);
        assert!(model.namespaces[0].classes[0].method_names.is_empty());
    }

    #[test]
    fn test_extract_multiple_classes() {
        let model = extract_str(
            "namespace N { class A { void M(){} } class B { void P(){} } }",
        );

        let ns = &model.namespaces[0];
        assert_eq!(ns.classes.len(), 2);
        assert_eq!(ns.classes[0].name, "A");
        assert_eq!(ns.classes[1].name, "B");
    }

    #[test]
    fn test_nested_namespaces_visit_class_once() {
        let model = extract_str(
            "namespace Outer { namespace Inner { class C { void M(){} } } }",
        );

        assert_eq!(model.namespaces.len(), 2);
        assert_eq!(model.namespaces[0].name, "Outer");
        assert!(model.namespaces[0].classes.is_empty());
        assert_eq!(model.namespaces[1].name, "Inner");
        assert_eq!(model.namespaces[1].classes.len(), 1);
        // The class belongs to its innermost namespace only
        assert_eq!(model.class_count(), 1);
    }

    #[test]
    fn test_nested_class_owns_its_methods() {
        let model = extract_str(
            "namespace N { class Outer { void M(){} class Inner { void P(){} } } }",
        );

        let classes = &model.namespaces[0].classes;
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "Outer");
        assert_eq!(classes[0].method_names.as_slice(), ["M"]);
        assert_eq!(classes[1].name, "Inner");
        assert_eq!(classes[1].method_names.as_slice(), ["P"]);
    }

    #[test]
    fn test_qualified_namespace_uses_leftmost_identifier() {
        let model = extract_str("namespace A.B { class C {} }");

        assert_eq!(model.namespaces[0].name, "A");
    }

    #[test]
    fn test_file_scoped_namespace() {
        let model = extract_str("namespace N;\n\nclass C { void M(){} }\n");

        assert_eq!(model.namespaces.len(), 1);
        assert_eq!(model.namespaces[0].name, "N");
        assert_eq!(model.namespaces[0].classes.len(), 1);
        assert_eq!(model.namespaces[0].classes[0].name, "C");
        assert_eq!(model.namespaces[0].classes[0].method_names.as_slice(), ["M"]);
    }

    #[test]
    fn test_file_scoped_namespace_governs_rest_of_file() {
        // The declarations after `namespace N;` are siblings of the
        // namespace node, not children; all of them belong to it
        let model = extract_str(
            "namespace App;\n\nclass A { void M1(){} void M2(){} }\n\nclass B { void P(){} class Nested { void Q(){} } }\n",
        );

        assert_eq!(model.namespaces.len(), 1);
        let ns = &model.namespaces[0];
        assert_eq!(ns.name, "App");

        let names: Vec<&str> = ns.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "Nested"]);
        assert_eq!(ns.classes[0].method_names.as_slice(), ["M1", "M2"]);
        assert_eq!(ns.classes[1].method_names.as_slice(), ["P"]);
        assert_eq!(ns.classes[2].method_names.as_slice(), ["Q"]);
    }

    #[test]
    fn test_constructors_and_properties_excluded() {
        let model = extract_str(
            r#"
namespace N
{
    class C
    {
        public C() {}
        public int Value { get; set; }
        public void M() {}
    }
}
"#,
        );

        let class = &model.namespaces[0].classes[0];
        assert_eq!(class.method_names.as_slice(), ["M"]);
    }

    #[test]
    fn test_class_outside_namespace_is_ignored() {
        let model = extract_str("class Orphan { void M(){} }");

        assert!(model.is_empty());
    }

    #[test]
    fn test_malformed_input_yields_empty_model() {
        let model = extract_str("this is not C# at all {{{");

        assert!(model.is_empty());
        assert!(model.parse_error.is_some());
    }

    #[test]
    fn test_empty_input() {
        let model = extract_str("");

        assert!(model.is_empty());
        assert!(model.parse_error.is_none());
    }
}
