//! Regex-based HTML conversion for `web_fetch`.
//!
//! Not a full HTML parser. Good enough for readable page text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

static SCRIPT: Lazy<Regex> = Lazy::new(|| re(r"(?is)<script[^>]*>.*?</script>"));
static STYLE: Lazy<Regex> = Lazy::new(|| re(r"(?is)<style[^>]*>.*?</style>"));
static HEAD: Lazy<Regex> = Lazy::new(|| re(r"(?is)<head[^>]*>.*?</head>"));
static COMMENT: Lazy<Regex> = Lazy::new(|| re(r"(?s)<!--.*?-->"));
static BREAK: Lazy<Regex> = Lazy::new(|| re(r"(?i)<br\s*/?>"));
static BLOCK_END: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)</(?:p|div|li|tr|h[1-6]|ul|ol|table|section|article|header|footer)>"));
static TAG: Lazy<Regex> = Lazy::new(|| re(r"<[^>]+>"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| re(r"\n[ \t]*\n(?:[ \t]*\n)+"));
static SPACES: Lazy<Regex> = Lazy::new(|| re(r"[ \t]+"));

static HEADING: Lazy<Regex> = Lazy::new(|| re(r"(?is)<h([1-6])[^>]*>(.*?)</h[1-6]>"));
static LINK: Lazy<Regex> =
    Lazy::new(|| re(r#"(?is)<a[^>]*href=["']([^"']+)["'][^>]*>(.*?)</a>"#));
static STRONG: Lazy<Regex> = Lazy::new(|| re(r"(?is)<(?:strong|b)>(.*?)</(?:strong|b)>"));
static EM: Lazy<Regex> = Lazy::new(|| re(r"(?is)<(?:em|i)>(.*?)</(?:em|i)>"));
static PRE: Lazy<Regex> = Lazy::new(|| re(r"(?is)<pre[^>]*>(?:<code[^>]*>)?(.*?)(?:</code>)?</pre>"));
static CODE: Lazy<Regex> = Lazy::new(|| re(r"(?is)<code[^>]*>(.*?)</code>"));
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| re(r"(?i)<li[^>]*>"));
static PARAGRAPH_END: Lazy<Regex> = Lazy::new(|| re(r"(?i)</p>"));

static TITLE: Lazy<Regex> = Lazy::new(|| re(r"(?is)<title[^>]*>(.*?)</title>"));
static META: Lazy<Regex> = Lazy::new(|| re(r"(?is)<meta\s[^>]*>"));
static META_NAME: Lazy<Regex> = Lazy::new(|| re(r#"(?i)\bname\s*=\s*["']description["']"#));
static META_CONTENT: Lazy<Regex> = Lazy::new(|| re(r#"(?is)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#));
static SECTION_HEADING: Lazy<Regex> = Lazy::new(|| re(r"(?is)<h[1-3][^>]*>(.*?)</h[1-3]>"));

fn strip_invisible(html: &str) -> String {
    let out = COMMENT.replace_all(html, "");
    let out = SCRIPT.replace_all(&out, "");
    let out = STYLE.replace_all(&out, "");
    out.into_owned()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn tidy(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|l| SPACES.replace_all(l, " ").trim().to_string())
        .collect();
    let joined = lines.join("\n");
    BLANK_LINES.replace_all(&joined, "\n\n").trim().to_string()
}

/// Inner text of an element, with tags removed and entities decoded.
fn inner_text(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, "");
    SPACES
        .replace_all(&decode_entities(&text), " ")
        .trim()
        .to_string()
}

/// Converts an HTML page to plain text.
pub(crate) fn html_to_text(html: &str) -> String {
    let body = HEAD.replace_all(html, "");
    let out = strip_invisible(&body);
    let out = BREAK.replace_all(&out, "\n");
    let out = BLOCK_END.replace_all(&out, "\n\n");
    let out = TAG.replace_all(&out, "");
    tidy(&decode_entities(&out))
}

/// Converts an HTML page to Markdown.
pub(crate) fn html_to_markdown(html: &str) -> String {
    let body = HEAD.replace_all(html, "");
    let out = strip_invisible(&body);

    let out = HEADING.replace_all(&out, |caps: &regex::Captures<'_>| {
        let level: usize = caps[1].parse().unwrap_or(1);
        format!("\n\n{} {}\n\n", "#".repeat(level), inner_text(&caps[2]))
    });
    let out = PRE.replace_all(&out, "\n\n```\n$1\n```\n\n");
    let out = CODE.replace_all(&out, "`$1`");
    let out = LINK.replace_all(&out, |caps: &regex::Captures<'_>| {
        format!("[{}]({})", inner_text(&caps[2]), &caps[1])
    });
    let out = STRONG.replace_all(&out, "**$1**");
    let out = EM.replace_all(&out, "*$1*");
    let out = LIST_ITEM.replace_all(&out, "\n- ");
    let out = BREAK.replace_all(&out, "\n");
    let out = PARAGRAPH_END.replace_all(&out, "\n\n");
    let out = TAG.replace_all(&out, "");
    tidy(&decode_entities(&out))
}

/// Structured page summary for the `json` format.
#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct PageSummary {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub headings: Vec<String>,
}

/// Extracts title, meta description and `h1`..`h3` headings.
pub(crate) fn page_summary(html: &str) -> PageSummary {
    let title = TITLE
        .captures(html)
        .map(|c| inner_text(&c[1]))
        .unwrap_or_default();

    let description = META
        .find_iter(html)
        .map(|m| m.as_str())
        .find(|tag| META_NAME.is_match(tag))
        .and_then(|tag| META_CONTENT.captures(tag))
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| decode_entities(m.as_str()));

    let headings = SECTION_HEADING
        .captures_iter(html)
        .map(|c| inner_text(&c[1]))
        .collect();

    PageSummary {
        title,
        description,
        headings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Example &amp; Co</title>
  <meta name="description" content="A test page">
  <style>body { color: red; }</style>
</head>
<body>
  <h1>Welcome</h1>
  <p>Hello <strong>bold</strong> and <a href="https://example.com/x">a <em>link</em></a>.</p>
  <script>alert("hidden")</script>
  <h2>Section</h2>
  <ul><li>one</li><li>two</li></ul>
  <h4>Minor</h4>
</body>
</html>"#;

    #[test]
    fn text_strips_tags_scripts_and_styles() {
        let text = html_to_text(PAGE);
        assert!(text.contains("Welcome"));
        assert!(text.contains("Hello bold and a link."));
        assert!(!text.contains("alert"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn markdown_keeps_structure() {
        let md = html_to_markdown(PAGE);
        assert!(md.contains("# Welcome"));
        assert!(md.contains("## Section"));
        assert!(md.contains("**bold**"));
        assert!(md.contains("[a link](https://example.com/x)"));
        assert!(md.contains("- one"));
        assert!(!md.contains("alert"));
    }

    #[test]
    fn summary_extracts_metadata() {
        let summary = page_summary(PAGE);
        assert_eq!(summary.title, "Example & Co");
        assert_eq!(summary.description.as_deref(), Some("A test page"));
        assert_eq!(summary.headings, vec!["Welcome", "Section"]);
    }

    #[test]
    fn summary_without_description_omits_key() {
        let summary = page_summary("<html><title>T</title></html>");
        let json = serde_json::to_value(&summary).expect("json");
        assert!(json.get("description").is_none());
        assert_eq!(json["headings"], serde_json::json!([]));
    }

    #[test]
    fn meta_attribute_order_does_not_matter() {
        let html = r#"<meta content='Swapped' name="description">"#;
        assert_eq!(page_summary(html).description.as_deref(), Some("Swapped"));
    }
}
