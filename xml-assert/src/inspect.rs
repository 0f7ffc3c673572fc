use xml_equiv_core::NormalizedElement;

/// Render a normalized tree outline with a configurable max depth.
pub fn render_tree(node: &NormalizedElement, max_depth: usize) -> String {
    let mut out = String::new();
    render_node(node, 0, max_depth, &mut out);
    out
}

fn render_node(node: &NormalizedElement, depth: usize, max_depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{}{}", indent, node.name));
    for (key, value) in &node.attributes {
        out.push_str(&format!(" @{key}={value:?}"));
    }
    if let Some(text) = &node.text {
        out.push_str(&format!(" text={text:?}"));
    }
    if let Some(tail) = &node.tail {
        out.push_str(&format!(" tail={tail:?}"));
    }
    out.push('\n');

    if depth >= max_depth {
        return;
    }

    for child in &node.children {
        render_node(child, depth + 1, max_depth, out);
    }
}
