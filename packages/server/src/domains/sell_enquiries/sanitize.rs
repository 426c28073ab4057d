use scraper::{Html, Node};

/// Reduce an HTML fragment to its visible text.
///
/// Script and style contents are dropped; whitespace runs collapse to a single space.
pub fn strip_html(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let mut out = String::with_capacity(input.len());

    for node in fragment.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(el) if matches!(el.name(), "script" | "style"))
        });
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
