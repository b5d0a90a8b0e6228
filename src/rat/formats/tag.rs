//! XML-like tag serialization of parse trees
//!
//! ## Format
//!
//! - First node tag → element name (kebab-case, `node` when untagged)
//! - Node name → `name` attribute, other attributes follow in key order
//! - `value` attribute → text content
//! - Branches → nested elements (no wrapper)
//!
//! ## Example
//!
//! ```text
//! <rule name="digits">
//!   <intrinsic name="&lt;digit&gt;" expected="&lt;digit&gt;">4</intrinsic>
//! </rule>
//! ```

use crate::rat::tree::TreeSnapshot;

/// Tag serializer that converts a TreeSnapshot to XML-like format
struct TagSerializer {
    output: String,
    indent_level: usize,
}

impl TagSerializer {
    fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
        }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.indent_level)
    }

    fn push_indent(&mut self, s: &str) {
        self.output.push_str(&self.indent());
        self.output.push_str(s);
    }

    fn serialize_snapshot(&mut self, snapshot: &TreeSnapshot) {
        let tag = to_tag_name(snapshot.tags.first().map(String::as_str).unwrap_or("node"));

        let mut open = format!("<{} name=\"{}\"", tag, escape_xml(&snapshot.name));
        for (key, value) in &snapshot.attributes {
            if key != "value" {
                open.push_str(&format!(" {}=\"{}\"", to_tag_name(key), escape_xml(value)));
            }
        }
        open.push('>');

        self.push_indent(&open);
        if let Some(value) = snapshot.attributes.get("value") {
            self.output.push_str(&escape_xml(value));
        }

        if snapshot.branches.is_empty() {
            self.output.push_str(&format!("</{}>", tag));
            self.output.push('\n');
        } else {
            self.output.push('\n');
            self.indent_level += 1;
            for branch in &snapshot.branches {
                self.serialize_snapshot(branch);
            }
            self.indent_level -= 1;
            self.push_indent(&format!("</{}>", tag));
            self.output.push('\n');
        }
    }
}

/// Convert a tag to an element name (e.g., "charLiteral" → "char-literal")
fn to_tag_name(name: &str) -> String {
    let mut tag = String::new();
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            tag.push('-');
        }
        tag.extend(c.to_lowercase());
    }
    tag
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn serialize_snapshot(snapshot: &TreeSnapshot) -> String {
    let mut serializer = TagSerializer::new();
    serializer.serialize_snapshot(snapshot);
    serializer.output
}
