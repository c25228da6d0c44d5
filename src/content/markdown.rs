//! Markdown rendering and reading-time estimation

use lazy_static::lazy_static;
use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::content::frontmatter::FrontMatter;

/// Words per minute assumed by the reading-time estimate
const WORDS_PER_MINUTE: usize = 200;

lazy_static! {
    /// A bare URL inside plain text
    static ref BARE_URL: Regex = Regex::new(r"https?://[^\s<>]+").unwrap();
}

/// Output of one render pass
#[derive(Debug, Clone)]
pub struct Rendered {
    /// HTML fragment ready for embedding
    pub html: String,

    /// Parsed front-matter; empty when the input had none or the block
    /// was malformed
    pub front_matter: FrontMatter,

    /// Reading time in minutes derived from the raw body
    pub reading_time: u32,
}

/// Markdown renderer
///
/// Raw HTML in the source passes through unescaped: the renderer trusts its
/// input. A caller feeding it untrusted content must sanitize the output.
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a renderer with the site's fixed Markdown dialect
    pub fn new() -> Self {
        // YAML metadata blocks stay off; FrontMatter::parse owns that split
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        Self { options }
    }

    /// Render a raw document: split front-matter, convert the body to HTML,
    /// estimate reading time from the body's word count.
    ///
    /// Never fails. Malformed front-matter degrades to an empty mapping with
    /// the whole input treated as body.
    pub fn render(&self, raw: &str) -> Rendered {
        let (front_matter, body) = FrontMatter::parse(raw);
        Rendered {
            html: self.render_body(body),
            reading_time: reading_time(body),
            front_matter,
        }
    }

    /// Convert a Markdown body to HTML, auto-linking bare URLs in prose
    fn render_body(&self, body: &str) -> String {
        let parser = Parser::new_ext(body, self.options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        // Links can nest images, so this is a depth, not a flag
        let mut link_depth = 0usize;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(_)) => {
                    in_code_block = true;
                    events.push(event);
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    events.push(event);
                }
                Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => {
                    link_depth += 1;
                    events.push(event);
                }
                Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(event);
                }
                Event::Text(text)
                    if !in_code_block && link_depth == 0 && BARE_URL.is_match(&text) =>
                {
                    push_autolinked(&text, &mut events);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a text run around its bare URLs, emitting a link event per URL
fn push_autolinked<'a>(text: &str, events: &mut Vec<Event<'a>>) {
    let mut last = 0;
    for found in BARE_URL.find_iter(text) {
        let url = trim_url_end(found.as_str());
        if url.is_empty() {
            continue;
        }
        let start = found.start();
        if start > last {
            events.push(Event::Text(text[last..start].to_string().into()));
        }
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(url.to_string()),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        events.push(Event::Text(url.to_string().into()));
        events.push(Event::End(TagEnd::Link));
        last = start + url.len();
    }
    if last < text.len() {
        events.push(Event::Text(text[last..].to_string().into()));
    }
}

/// Strip trailing punctuation that belongs to the sentence, not the URL.
/// A closing paren is kept only while the URL has an unmatched opener.
fn trim_url_end(raw: &str) -> &str {
    let mut url = raw;
    while let Some(last) = url.chars().last() {
        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '"' | '\'' => true,
            ')' => url.matches('(').count() < url.matches(')').count(),
            _ => false,
        };
        if !strip {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
    url
}

/// Whitespace-delimited token count of a raw Markdown body.
/// Markup syntax and code fences count toward the total.
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

/// Reading time in minutes: ceil(word count / 200).
/// The ceiling of zero is zero, so an empty body reads in 0 minutes.
pub fn reading_time(body: &str) -> u32 {
    word_count(body).div_ceil(WORDS_PER_MINUTE) as u32
}
