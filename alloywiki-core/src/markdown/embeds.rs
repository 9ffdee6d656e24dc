//! `![[asset]]` embeds become plain image tags.
//!
//! Embeds are rewritten on parsed events rather than on the source text. A
//! raw `<img>` alone on a source line would open an HTML block and swallow
//! the markdown that follows it, so the tag is emitted as inline HTML
//! inside whatever paragraph or cell the embed was written in.

use once_cell::sync::Lazy;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use regex::Regex;

static EMBED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[\[([^\[\]|\n]+)\]\]").expect("valid embed regex"));

/// Replace every embed in text events with `<img src="target" alt="target">`.
/// The target is used verbatim: no existence check and no path rewriting.
/// Code blocks and inline code are left untouched.
pub fn transform_embeds<'a>(events: impl IntoIterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut result = Vec::new();
    let mut pending = String::new();
    let mut in_code_block = false;

    for event in events {
        match event {
            Event::Text(text) if !in_code_block => {
                pending.push_str(&text);
                continue;
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            _ => {}
        }

        flush_text(&mut pending, &mut result);
        result.push(event);
    }
    flush_text(&mut pending, &mut result);

    result
}

/// Emit merged text, splitting out any embeds it contains
fn flush_text<'a>(pending: &mut String, out: &mut Vec<Event<'a>>) {
    if pending.is_empty() {
        return;
    }
    let text = std::mem::take(pending);

    let mut last = 0;
    for caps in EMBED_RE.captures_iter(&text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            out.push(Event::Text(CowStr::from(text[last..whole.start()].to_string())));
        }
        out.push(Event::InlineHtml(CowStr::from(image_tag(&caps[1]))));
        last = whole.end();
    }

    if last == 0 {
        out.push(Event::Text(CowStr::from(text)));
    } else if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

fn image_tag(target: &str) -> String {
    let target = super::html_escape(target);
    format!("<img src=\"{target}\" alt=\"{target}\">")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{html, Options, Parser};

    fn render(markdown: &str) -> String {
        let events = transform_embeds(Parser::new_ext(markdown, Options::ENABLE_TABLES));
        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        out
    }

    #[test]
    fn test_embed_becomes_image() {
        assert_eq!(
            render("![[asset.png]]"),
            "<p><img src=\"asset.png\" alt=\"asset.png\"></p>\n"
        );
    }

    #[test]
    fn test_target_is_verbatim() {
        assert_eq!(
            render("Trace: ![[HOTG1 DSC trace.jpg]]!"),
            "<p>Trace: <img src=\"HOTG1 DSC trace.jpg\" alt=\"HOTG1 DSC trace.jpg\">!</p>\n"
        );
    }

    #[test]
    fn test_caption_below_embed_is_rendered() {
        let html = render("![[dsc.png]]\n**Figure 1** DSC trace");
        assert!(html.contains(r#"<img src="dsc.png" alt="dsc.png">"#));
        assert!(html.contains("<strong>Figure 1</strong> DSC trace"));
        assert!(!html.contains("**"));
    }

    #[test]
    fn test_embed_in_table_cell() {
        let html = render("| Sample | Plot |\n|---|---|\n| 1 | ![[vsm 1.png]] |\n");
        assert!(html.contains(r#"<td><img src="vsm 1.png" alt="vsm 1.png"></td>"#));
    }

    #[test]
    fn test_code_is_left_alone() {
        let html = render("```\n![[raw.png]]\n```\n\n`![[inline.png]]`");
        assert!(!html.contains("<img"));
        assert!(html.contains("![[raw.png]]"));
        assert!(html.contains("<code>![[inline.png]]</code>"));
    }

    #[test]
    fn test_labelled_embed_is_not_an_embed() {
        assert_eq!(render("![[a.png|small]]"), "<p>![[a.png|small]]</p>\n");
    }
}
