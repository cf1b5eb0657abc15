//! Markdown export.
//!
//! Converts editor HTML into Markdown with a fixed, ordered regex pipeline.
//! The rules run top to bottom over the whole document, so block rules come
//! before the inline rules that their captures still contain.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// The result of exporting a document: its Markdown body plus the file name
/// a download should carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkdownExport {
    pub file_name: String,
    pub markdown: String,
}

impl MarkdownExport {
    pub fn new(document_name: &str, markdown: String) -> Self {
        Self {
            file_name: format!("{document_name}.md"),
            markdown,
        }
    }
}

fn rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            // Headers
            (r"(?i)<h1[^>]*>(.*?)</h1>", "# ${1}\n\n"),
            (r"(?i)<h2[^>]*>(.*?)</h2>", "## ${1}\n\n"),
            (r"(?i)<h3[^>]*>(.*?)</h3>", "### ${1}\n\n"),
            // Lists (ordered lists flatten to bullets as well)
            (r"(?i)<ul[^>]*>(.*?)</ul>", "${1}\n"),
            (r"(?i)<ol[^>]*>(.*?)</ol>", "${1}\n"),
            (r"(?i)<li[^>]*>(.*?)</li>", "* ${1}\n"),
            // Code, before the paragraph rule so <pre> is not eaten as <p...>
            (
                r"(?i)<pre[^>]*><code[^>]*>(.*?)</code></pre>",
                "```\n${1}\n```\n",
            ),
            (r"(?i)<code[^>]*>(.*?)</code>", "`${1}`"),
            // Paragraphs and line breaks
            (r"(?i)<p[^>]*>\s*</p>", "\n"),
            (r"(?i)<p[^>]*>(.*?)</p>", "${1}\n\n"),
            (r"(?i)<br[^>]*>", "\n"),
            // Bold and italic
            (r"(?i)<strong[^>]*>(.*?)</strong>", "**${1}**"),
            (r"(?i)<b[^>]*>(.*?)</b>", "**${1}**"),
            (r"(?i)<em[^>]*>(.*?)</em>", "*${1}*"),
            (r"(?i)<i[^>]*>(.*?)</i>", "*${1}*"),
            // Blockquotes
            (r"(?i)<blockquote[^>]*>(.*?)</blockquote>", "> ${1}\n\n"),
            // Links and images
            (r#"(?i)<a[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#, "[${2}](${1})"),
            (r#"(?i)<img[^>]*src="([^"]*)"[^>]*>"#, "![](${1})"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
        .collect()
    })
}

fn table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<table[^>]*>(.*?)</table>").unwrap())
}

fn row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<tr[^>]*>(.*?)</tr>").unwrap())
}

fn cell_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<t[dh][^>]*>(.*?)</t[dh]>").unwrap())
}

fn cleanup() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"\n\s*\n\s*\n", "\n\n"),
            // Anything still wrapped in angle brackets is dropped
            (r"<[^>]*>", ""),
        ]
        .into_iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
        .collect()
    })
}

/// Render table markup as pipe-separated rows, one line per row.
fn flatten_table(caps: &Captures) -> String {
    let body = &caps[1];
    let mut rows = Vec::new();
    for row in row_re().captures_iter(body) {
        let cells: Vec<String> = cell_re()
            .captures_iter(&row[1])
            .map(|c| c[1].to_string())
            .collect();
        rows.push(cells.join(" | "));
    }
    let mut out = rows.join("\n");
    out.push('\n');
    out
}

/// Convert editor HTML to Markdown.
pub fn html_to_markdown(html: &str) -> String {
    let mut out = html.to_string();
    for (re, replacement) in rules() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out = table_re()
        .replace_all(&out, |caps: &Captures| flatten_table(caps))
        .into_owned();
    out = out.replace("&nbsp;", " ");
    for (re, replacement) in cleanup() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out = out
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    // Per-line trim, then collapse runs of blank lines.
    let trimmed: Vec<&str> = out.trim().lines().map(str::trim).collect();
    let mut markdown = trimmed.join("\n");
    let blanks = Regex::new(r"\n\n\n+").unwrap();
    while blanks.is_match(&markdown) {
        markdown = blanks.replace_all(&markdown, "\n\n").into_owned();
    }
    markdown
}
