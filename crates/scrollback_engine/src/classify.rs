use chrono::DateTime;
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};

/// Bit width of the timestamp field in snowflake-style identifiers.
const SNOWFLAKE_SHIFT: u32 = 22;
/// Epoch offset of the snowflake scheme: 2015-01-01T00:00:00Z in millis.
const SNOWFLAKE_EPOCH_MS: i128 = 1_420_070_400_000;
/// Identifiers shorter than this cannot carry a snowflake timestamp field.
const SNOWFLAKE_MIN_DIGITS: usize = 17;
/// Plain numeric identifiers at or above this are taken as literal
/// millisecond timestamps (1e12 ≈ September 2001).
const LITERAL_MS_FLOOR: i128 = 1_000_000_000_000;
/// Decoded timestamps may run at most this far ahead of capture time.
const FUTURE_SLACK_MS: i128 = 86_400_000;

/// Identifier attributes tried in order for the stable key.
const KEY_ATTRS: &[&str] = &["data-list-item-id", "id", "data-message-id"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Loading/skeleton node; must never be cached.
    pub placeholder: bool,
    /// Stable identity across re-renders of the same logical item.
    pub key: String,
    /// Chronological sort key in milliseconds, full integer precision.
    pub order: i128,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("fragment contains no element")]
    NoElement,
}

/// Decides whether a node is a real content item or a loading placeholder,
/// and extracts its identity key and chronological order.
///
/// Pure over the fragment text: the capture timestamp is an input, so the
/// same node classified at the same instant yields the same result.
#[derive(Debug, Clone)]
pub struct ElementClassifier {
    placeholder_classes: Vec<String>,
}

impl ElementClassifier {
    pub fn new(placeholder_classes: &[String]) -> Self {
        Self {
            placeholder_classes: placeholder_classes
                .iter()
                .map(|token| token.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Classify one candidate node given its enumeration index and the
    /// capture timestamp in milliseconds.
    pub fn classify(
        &self,
        fragment: &str,
        index: usize,
        capture_ms: i128,
    ) -> Result<Classification, ClassifyError> {
        let doc = Html::parse_fragment(fragment);
        let root = first_element(&doc).ok_or(ClassifyError::NoElement)?;

        let text = collapsed_text(root);
        Ok(Classification {
            placeholder: self.is_placeholder(root, &text),
            key: extract_key(root, index, &text),
            order: extract_order(root, index, capture_ms),
        })
    }

    /// Placeholder check alone, for re-validating cached snapshots before
    /// merge. An empty or element-free fragment counts as placeholder.
    pub fn is_placeholder_fragment(&self, fragment: &str) -> bool {
        let doc = Html::parse_fragment(fragment);
        match first_element(&doc) {
            Some(root) => {
                let text = collapsed_text(root);
                self.is_placeholder(root, &text)
            }
            None => true,
        }
    }

    fn is_placeholder(&self, el: ElementRef<'_>, text: &str) -> bool {
        let element = el.value();

        // Structural signals: explicit busy/progress markers.
        if element.attr("aria-busy") == Some("true") {
            return true;
        }
        if element.attr("role") == Some("progressbar") {
            return true;
        }
        if let Some(class) = element.attr("class") {
            let class = class.to_ascii_lowercase();
            if self
                .placeholder_classes
                .iter()
                .any(|token| class.contains(token.as_str()))
            {
                return true;
            }
        }

        // Content signal: nothing readable and nothing embedded.
        if text.is_empty() {
            if let Ok(media) = Selector::parse("img, video, audio, picture, iframe, embed") {
                return el.select(&media).next().is_none();
            }
        }

        false
    }
}

/// Identity cascade: list-item identifier -> element id -> message
/// identifier -> first `aria-labelledby` token -> synthesized
/// `idx-{index}-{hash}`.
fn extract_key(el: ElementRef<'_>, index: usize, text: &str) -> String {
    let element = el.value();
    for attr in KEY_ATTRS {
        if let Some(value) = element.attr(attr) {
            let value = value.trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }
    if let Some(labelled) = element.attr("aria-labelledby") {
        if let Some(first) = labelled.split_whitespace().next() {
            return first.to_string();
        }
    }
    format!("idx-{index}-{}", short_hash(text))
}

/// Order cascade: descendant time indicator -> snowflake-decoded numeric
/// identifier -> literal millisecond identifier -> capture time + index.
fn extract_order(el: ElementRef<'_>, index: usize, capture_ms: i128) -> i128 {
    if let Ok(sel) = Selector::parse("time[datetime]") {
        for node in el.select(&sel) {
            if let Some(datetime) = node.value().attr("datetime") {
                if let Ok(parsed) = DateTime::parse_from_rfc3339(datetime.trim()) {
                    return i128::from(parsed.timestamp_millis());
                }
            }
        }
    }

    if let Some((id, digits)) = numeric_identifier(el) {
        if digits >= SNOWFLAKE_MIN_DIGITS {
            let decoded = (id >> SNOWFLAKE_SHIFT) + SNOWFLAKE_EPOCH_MS;
            if decoded > SNOWFLAKE_EPOCH_MS && decoded <= capture_ms + FUTURE_SLACK_MS {
                return decoded;
            }
        }
        if id >= LITERAL_MS_FLOOR && id <= capture_ms + FUTURE_SLACK_MS {
            return id;
        }
    }

    capture_ms + index as i128
}

/// Longest ASCII digit run across the identifier attributes, parsed with
/// full precision. Returns the value and its digit count.
fn numeric_identifier(el: ElementRef<'_>) -> Option<(i128, usize)> {
    let element = el.value();
    let mut best: Option<(i128, usize)> = None;
    for attr in KEY_ATTRS {
        let Some(value) = element.attr(attr) else {
            continue;
        };
        for run in value.split(|c: char| !c.is_ascii_digit()) {
            if run.is_empty() {
                continue;
            }
            let Ok(parsed) = run.parse::<i128>() else {
                continue;
            };
            if best.map_or(true, |(_, len)| run.len() > len) {
                best = Some((parsed, run.len()));
            }
        }
    }
    best
}

fn collapsed_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for chunk in el.text() {
        let trimmed = chunk.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(trimmed);
    }
    out
}

fn first_element<'a>(doc: &'a Html) -> Option<ElementRef<'a>> {
    doc.root_element().children().find_map(ElementRef::wrap)
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
