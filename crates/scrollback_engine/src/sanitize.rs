use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};
use url::Url;

/// Lazy-loading attributes promoted to their eager equivalents.
const LAZY_SOURCES: &[(&str, &str)] = &[
    ("data-src", "src"),
    ("data-srcset", "srcset"),
    ("data-href", "href"),
    ("data-poster", "poster"),
];

/// Attributes never carried into a snapshot.
const DROPPED_ATTRS: &[&str] = &[
    "loading",
    "data-src",
    "data-srcset",
    "data-href",
    "data-poster",
];

/// Attributes holding a single URL reference.
const URL_ATTRS: &[&str] = &["src", "href", "poster"];

/// Elements with no closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Re-serialize a fragment into a self-contained snapshot: lazy-loading
/// attributes are promoted to their real equivalents and embedded media
/// URLs are resolved against `base` to absolute form.
///
/// Comments, processing instructions, and doctypes are dropped; the
/// snapshot holds only elements and text.
pub fn sanitize_fragment(fragment: &str, base: Option<&Url>) -> String {
    let doc = Html::parse_fragment(fragment);
    let mut out = String::with_capacity(fragment.len());
    for child in doc.root_element().children() {
        write_node(child, base, &mut out);
    }
    out
}

fn write_node(node: NodeRef<'_, Node>, base: Option<&Url>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Element(_) => {
            if let Some(el) = ElementRef::wrap(node) {
                write_element(el, base, out);
            }
        }
        _ => {}
    }
}

fn write_element(el: ElementRef<'_>, base: Option<&Url>, out: &mut String) {
    let element = el.value();
    let name = element.name();

    // Lazy attributes override their eager counterparts, which usually
    // hold a blurred or transparent placeholder at harvest time.
    let mut promoted: Vec<(&str, &str)> = Vec::new();
    for (lazy, eager) in LAZY_SOURCES {
        if let Some(value) = element.attr(lazy) {
            promoted.push((eager, value));
        }
    }

    out.push('<');
    out.push_str(name);

    for (attr_name, value) in element.attrs() {
        if DROPPED_ATTRS.contains(&attr_name) {
            continue;
        }
        let value = match promoted.iter().position(|(eager, _)| *eager == attr_name) {
            Some(pos) => promoted.remove(pos).1,
            None => value,
        };
        write_attr(attr_name, value, base, out);
    }
    // Promotions whose eager attribute was absent entirely.
    for (attr_name, value) in promoted {
        write_attr(attr_name, value, base, out);
    }

    out.push('>');
    if VOID_ELEMENTS.contains(&name) {
        return;
    }
    for child in el.children() {
        write_node(child, base, out);
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn write_attr(name: &str, value: &str, base: Option<&Url>, out: &mut String) {
    let resolved = if URL_ATTRS.contains(&name) {
        resolve_reference(value, base)
    } else if name == "srcset" {
        resolve_srcset(value, base)
    } else {
        value.to_string()
    };
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attr(&resolved));
    out.push('"');
}

/// Absolutize one URL reference. Already-absolute and `data:` URLs pass
/// through; relative references resolve against the base when one exists.
fn resolve_reference(reference: &str, base: Option<&Url>) -> String {
    let trimmed = reference.trim();
    if trimmed.is_empty() || trimmed.starts_with("data:") {
        return trimmed.to_string();
    }
    if Url::parse(trimmed).is_ok() {
        return trimmed.to_string();
    }
    match base.and_then(|b| b.join(trimmed).ok()) {
        Some(url) => url.into(),
        None => trimmed.to_string(),
    }
}

/// A srcset is a comma-separated list of `url [descriptor]` entries; each
/// URL part resolves independently.
fn resolve_srcset(value: &str, base: Option<&Url>) -> String {
    value
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            match entry.split_once(char::is_whitespace) {
                Some((url, descriptor)) => {
                    format!("{} {}", resolve_reference(url, base), descriptor.trim())
                }
                None => resolve_reference(entry, base),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
