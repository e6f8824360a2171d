use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Extract prose from markdown, one chunk per paragraph, heading, list item
/// or table cell. Code blocks, inline code and raw HTML are skipped.
pub fn paragraphs(content: &str) -> Vec<String> {
    let mut paras = Vec::new();
    let mut current = String::new();
    let mut in_code_block = false;

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
            }
            Event::Text(text) if !in_code_block => {
                current.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak => {
                current.push('\n');
            }
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::TableCell,
            ) => {
                flush(&mut current, &mut paras);
            }
            // Nested lists: text before the sublist belongs to the outer item
            Event::Start(Tag::List(_)) => {
                flush(&mut current, &mut paras);
            }
            _ => {}
        }
    }

    flush(&mut current, &mut paras);
    paras
}

fn flush(current: &mut String, paras: &mut Vec<String>) {
    let text = current.trim();
    if !text.is_empty() {
        paras.push(text.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_paragraphs() {
        let content = r#"
# Title

This is a test paragraph
spanning two lines.

```rust
fn main() {
    println!("This should be ignored");
}
```

More text with `inline_code` here.

- first item
- second item
"#;

        let paras = paragraphs(content);
        assert_eq!(
            paras,
            vec![
                "Title",
                "This is a test paragraph\nspanning two lines.",
                "More text with  here.",
                "first item",
                "second item",
            ]
        );
        assert!(paras.iter().all(|p| !p.contains("println")));
    }

    #[test]
    fn test_link_text_kept_url_dropped() {
        let paras = paragraphs("See [the docs](https://example.com/pathh) now.");
        assert_eq!(paras, vec!["See the docs now."]);
    }
}
