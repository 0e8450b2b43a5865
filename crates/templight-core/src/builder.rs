//! Decoration builder: regions plus token spans in, decorations out.
//!
//! Output order is inherited, not sorted: the scanner yields regions by
//! increasing start and the highlighter yields spans by increasing offset,
//! so appending in that order keeps both sets monotonic. Any change to
//! either producer has to preserve this.

use templight_buffer::TextBuffer;
use templight_syntax::{SyntaxError, TokenSpan};

use crate::config::DecorationConfig;
use crate::decoration::{
    Anchored, DecorationError, DecorationSetBuilder, Decorations, LineDecoration, MarkDecoration,
};
use crate::scanner::{Region, RegionKind};

/// Builds the decorations for one rebuild.
pub struct DecorationBuilder<'a> {
    config: &'a DecorationConfig,
}

impl<'a> DecorationBuilder<'a> {
    pub fn new(config: &'a DecorationConfig) -> Self {
        Self { config }
    }

    /// Decorates every region of `document`.
    ///
    /// `highlight` is called once per region with the region's text. A
    /// failure leaves that region with its line or inline decoration only and
    /// records it in [`Decorations::unhighlighted`].
    pub fn build<F>(&self, document: &TextBuffer, regions: &[Region], mut highlight: F) -> Decorations
    where
        F: FnMut(&str) -> Result<Vec<TokenSpan>, SyntaxError>,
    {
        let mut lines = DecorationSetBuilder::new();
        let mut marks = DecorationSetBuilder::new();
        let mut unhighlighted = Vec::new();
        let mut last_line_mark = None;

        for region in regions {
            let fragment = match document.slice(region.range()) {
                Ok(fragment) => fragment,
                Err(e) => {
                    tracing::warn!(start = region.start, end = region.end, "Skipping region: {}", e);
                    continue;
                }
            };

            match region.kind {
                RegionKind::Block => {
                    self.mark_lines(document, region, &mut lines, &mut last_line_mark);
                }
                RegionKind::Inline => {
                    let mark = MarkDecoration::new(
                        region.start,
                        region.end,
                        &self.config.inline_code_class,
                    )
                    .map(|mark| mark.with_attributes(self.config.attributes.clone()));
                    push(&mut marks, mark);
                }
            }

            match highlight(&*fragment) {
                Ok(spans) => {
                    for span in spans {
                        let Some(class) = span.class else {
                            continue;
                        };
                        let mark = MarkDecoration::new(
                            region.start + span.from,
                            region.start + span.to,
                            class,
                        );
                        push(&mut marks, mark);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        start = region.start,
                        end = region.end,
                        "Highlight unavailable: {}",
                        e
                    );
                    unhighlighted.push(*region);
                }
            }
        }

        Decorations {
            lines: lines.finish(),
            marks: marks.finish(),
            unhighlighted,
        }
    }

    /// Adds one line decoration per line the region touches, skipping
    /// lines already decorated in this rebuild.
    fn mark_lines(
        &self,
        document: &TextBuffer,
        region: &Region,
        lines: &mut DecorationSetBuilder<LineDecoration>,
        last_line_mark: &mut Option<usize>,
    ) {
        let last_char = region.end.saturating_sub(1).max(region.start);
        let span = document
            .char_to_line(region.start)
            .and_then(|first| Ok(first..=document.char_to_line(last_char)?));
        let span = match span {
            Ok(span) => span,
            Err(e) => {
                tracing::warn!(start = region.start, "Cannot locate region lines: {}", e);
                return;
            }
        };

        for line in span {
            let Ok(line_start) = document.line_to_char(line) else {
                continue;
            };
            if *last_line_mark == Some(line_start) {
                continue;
            }
            *last_line_mark = Some(line_start);
            push(
                lines,
                Ok(LineDecoration {
                    line_start,
                    class: self.config.code_block_class.clone(),
                    attributes: self.config.attributes.clone(),
                }),
            );
        }
    }
}

fn push<T: Anchored>(
    builder: &mut DecorationSetBuilder<T>,
    item: Result<T, DecorationError>,
) {
    if let Err(e) = item.and_then(|item| builder.add(item)) {
        tracing::warn!("Dropping decoration: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;

    fn build_with<F>(text: &str, highlight: F) -> Decorations
    where
        F: FnMut(&str) -> Result<Vec<TokenSpan>, SyntaxError>,
    {
        let config = DecorationConfig::default();
        let document = TextBuffer::from(text);
        let regions = Scanner::default().scan(&document);
        DecorationBuilder::new(&config).build(&document, &regions, highlight)
    }

    /// Styles every fragment's first char as a keyword, the rest plain.
    fn first_char_keyword(fragment: &str) -> Result<Vec<TokenSpan>, SyntaxError> {
        let len = fragment.chars().count();
        Ok(vec![
            TokenSpan {
                from: 0,
                to: 1,
                class: Some("cm-keyword".to_string()),
            },
            TokenSpan {
                from: 1,
                to: len,
                class: None,
            },
        ])
    }

    fn no_spans(_: &str) -> Result<Vec<TokenSpan>, SyntaxError> {
        Ok(Vec::new())
    }

    #[test]
    fn test_block_region_marks_every_line_once() {
        let decorations = build_with("<%*\na\nb %>\nafter", |fragment| {
            // Many styled tokens on every line must not duplicate line marks.
            let len = fragment.chars().count();
            Ok((0..len)
                .map(|i| TokenSpan {
                    from: i,
                    to: i + 1,
                    class: Some("cm-variable".to_string()),
                })
                .collect())
        });

        let starts: Vec<_> = decorations.lines.iter().map(|d| d.line_start).collect();
        assert_eq!(starts, vec![0, 4, 6]);
        assert!(decorations.lines.iter().all(|d| d.class == "HyperMD-codeblock HyperMD-codeblock-bg"));
        assert_eq!(
            decorations.lines.as_slice()[0].attributes.get("data-templater-code").map(String::as_str),
            Some("")
        );
        assert_eq!(decorations.marks.len(), 10);
    }

    #[test]
    fn test_inline_region_gets_one_mark() {
        let decorations = build_with("say <% x %> now", no_spans);
        assert!(decorations.lines.is_empty());
        let marks = decorations.marks.as_slice();
        assert_eq!(marks.len(), 1);
        assert_eq!((marks[0].from, marks[0].to), (4, 11));
        assert_eq!(marks[0].class, "cm-inline-code");
        assert_eq!(marks[0].attributes.get("spellcheck").map(String::as_str), Some("false"));
    }

    #[test]
    fn test_token_marks_are_shifted_and_unstyled_skipped() {
        let decorations = build_with("ab <% x %>", first_char_keyword);
        let marks: Vec<_> = decorations
            .marks
            .iter()
            .map(|m| (m.from, m.to, m.class.as_str()))
            .collect();
        assert_eq!(marks, vec![(3, 10, "cm-inline-code"), (3, 4, "cm-keyword")]);
    }

    #[test]
    fn test_output_is_ordered() {
        let text = "<% a %> x <% b %>\n<%*\nc\n%> <% d %>";
        let decorations = build_with(text, first_char_keyword);
        let anchors: Vec<_> = decorations.marks.iter().map(|m| m.from).collect();
        assert!(anchors.windows(2).all(|w| w[0] <= w[1]));
        let lines: Vec<_> = decorations.lines.iter().map(|l| l.line_start).collect();
        assert!(lines.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(lines, vec![0, 18, 22, 24]);
    }

    #[test]
    fn test_failed_region_keeps_region_decoration() {
        let mut calls = 0;
        let decorations = build_with("<% a %> and <% b %>", |fragment| {
            calls += 1;
            if fragment.contains('b') {
                Err(SyntaxError::ParseFailed {
                    grammar: "test".to_string(),
                    len: fragment.len(),
                })
            } else {
                first_char_keyword(fragment)
            }
        });
        assert_eq!(calls, 2);
        assert_eq!(decorations.unhighlighted.len(), 1);
        assert_eq!(decorations.unhighlighted[0].start, 12);
        let classes: Vec<_> = decorations.marks.iter().map(|m| m.class.as_str()).collect();
        assert_eq!(classes, vec!["cm-keyword", "cm-inline-code"]);
        assert_eq!(decorations.lines.len(), 1);
    }

    #[test]
    fn test_inverted_spans_are_dropped() {
        let decorations = build_with("<% x %>", |_| {
            Ok(vec![
                TokenSpan {
                    from: 4,
                    to: 2,
                    class: Some("cm-keyword".to_string()),
                },
                TokenSpan {
                    from: 3,
                    to: 4,
                    class: Some("cm-variable".to_string()),
                },
            ])
        });
        let marks: Vec<_> = decorations.marks.iter().map(|m| (m.from, m.to)).collect();
        assert_eq!(marks, vec![(3, 4)]);
    }

    #[test]
    fn test_no_regions_no_decorations() {
        let decorations = build_with("plain text with 50% > 40%", first_char_keyword);
        assert!(decorations.is_empty());
        assert!(decorations.unhighlighted.is_empty());
    }
}
