//! Test stub synthesis and rendering.
//!
//! A [`TestStub`] is the synthetic code unit for one generated test file:
//! an NUnit test class mirroring a discovered source class, with one
//! failing placeholder test per source method. Synthesis is a pure function
//! of the code model; rendering is the canonical normalizer, so the same
//! stub always produces byte-identical text.

use serde::Serialize;
use smallvec::SmallVec;

use crate::model::ClassEntry;

/// Namespace imported by every generated test file.
const TEST_FRAMEWORK_USING: &str = "NUnit.Framework";

/// Body of every generated placeholder test.
const FAIL_STATEMENT: &str = "Assert.Fail(\"autogenerated\");";

/// One synthesized test file, prior to rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestStub {
    /// File name without extension; equals the test class name.
    pub file_base_name: String,
    /// Namespace declared by the generated file (`<ns>.Tests`).
    pub test_namespace: String,
    /// Class declared by the generated file (`<class>Tests`).
    pub test_class_name: String,
    /// One placeholder test per source method, declaration order preserved.
    pub test_method_names: SmallVec<[String; 8]>,
}

/// Synthesize the test stub for one discovered class.
///
/// Deterministic and pure: the same `(namespace_name, class)` pair always
/// yields the same stub.
pub fn synthesize(namespace_name: &str, class: &ClassEntry) -> TestStub {
    let test_class_name = format!("{}Tests", class.name);
    TestStub {
        file_base_name: test_class_name.clone(),
        test_namespace: format!("{}.Tests", namespace_name),
        test_class_name,
        test_method_names: class.method_names.clone(),
    }
}

impl TestStub {
    /// Render the stub as normalized C# text.
    ///
    /// Output shape: a test-framework using directive, a block-scoped
    /// namespace, a public class, and one `[Test]` method per source
    /// method whose body unconditionally fails with `"autogenerated"`.
    /// Whitespace is stable regardless of input formatting (4-space
    /// indent, one blank line between methods).
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("using {};\n\n", TEST_FRAMEWORK_USING));
        out.push_str(&format!("namespace {}\n{{\n", self.test_namespace));
        out.push_str(&format!("    public class {}\n    {{\n", self.test_class_name));

        for (i, method) in self.test_method_names.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str("        [Test]\n");
            out.push_str(&format!("        public void {}()\n", method));
            out.push_str("        {\n");
            out.push_str(&format!("            {}\n", FAIL_STATEMENT));
            out.push_str("        }\n");
        }

        out.push_str("    }\n");
        out.push_str("}\n");
        out
    }
}
