//! Treeviz formatter for parse trees
//!
//! One line per node, children drawn below their parent with box connectors, so the shape
//! of a match can be scanned at a glance:
//!
//!     § number
//!     ├─ § sign
//!     │ └─ ' '-' "-"
//!     └─ § digits
//!       ├─ ◦ <digit> "4"
//!       └─ ◦ <digit> "2"
//!
//! Icons
//!     rule: §
//!     intrinsic: ◦
//!     charLiteral: '
//!     stringLiteral: "
//!     anything else: ○

use crate::rat::tree::TreeSnapshot;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(snapshot: &TreeSnapshot) -> &'static str {
    match snapshot.tags.first().map(String::as_str) {
        Some("rule") => "§",
        Some("intrinsic") => "◦",
        Some("charLiteral") => "'",
        Some("stringLiteral") => "\"",
        _ => "○",
    }
}

fn label(snapshot: &TreeSnapshot) -> String {
    match snapshot.attributes.get("value") {
        Some(value) => format!("{} {:?}", truncate(&snapshot.name, 30), truncate(value, 30)),
        None => truncate(&snapshot.name, 30),
    }
}

pub fn to_treeviz_str(snapshot: &TreeSnapshot) -> String {
    let mut output = format!("{} {}\n", get_icon(snapshot), label(snapshot));
    append_branches(&mut output, &snapshot.branches, "");
    output
}

fn append_branches(output: &mut String, branches: &[TreeSnapshot], prefix: &str) {
    for (i, branch) in branches.iter().enumerate() {
        let is_last = i == branches.len() - 1;
        let connector = if is_last { "└─" } else { "├─" };

        output.push_str(&format!(
            "{}{} {} {}\n",
            prefix,
            connector,
            get_icon(branch),
            label(branch)
        ));

        let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        append_branches(output, &branch.branches, &new_prefix);
    }
}
