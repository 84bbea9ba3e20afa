use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::block::{SpanKind, TextSpan};

static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\[\]()]*)\]\(([^\[\]()]*)\)").expect("image pattern is valid")
});

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]()]*)\]\(([^\[\]()]*)\)").expect("link pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `**`, `*` or `` ` `` opened without a matching close.
    #[error("unterminated inline delimiter `{0}`")]
    UnterminatedDelimiter(&'static str),
}

/// Break a block's text into typed spans.
///
/// Stages run in a fixed order and each one only looks at the plain text the
/// previous stages left behind: images, links, `**` bold, `*` italic, then
/// `` ` `` code. Markup does not nest.
pub fn tokenize(text: &str) -> Result<Vec<TextSpan>, ParseError> {
    let spans = vec![TextSpan::plain(text)];
    let spans = split_images(spans);
    let spans = split_links(spans);
    let spans = split_delimiter(spans, "**", SpanKind::Bold)?;
    let spans = split_delimiter(spans, "*", SpanKind::Italic)?;
    split_delimiter(spans, "`", SpanKind::Code)
}

fn split_images(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    split_matches(spans, &IMAGE, |_, _| true, |caps| {
        TextSpan::image(&caps[1], &caps[2])
    })
}

fn split_links(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    // `![..](..)` left over here failed the image pattern; it is not a link either.
    split_matches(
        spans,
        &LINK,
        |text, start| !text[..start].ends_with('!'),
        |caps| TextSpan::link(&caps[1], &caps[2]),
    )
}

/// Replace every accepted match of `pattern` inside plain spans with the
/// span built by `make`. Rejected matches stay plain text.
fn split_matches(
    spans: Vec<TextSpan>,
    pattern: &Regex,
    accept: impl Fn(&str, usize) -> bool,
    make: impl Fn(&Captures) -> TextSpan,
) -> Vec<TextSpan> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        if span.kind() != SpanKind::Plain {
            out.push(span);
            continue;
        }
        let text = span.text();
        let mut last = 0;
        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if !accept(text, whole.start()) {
                continue;
            }
            push_plain(&mut out, &text[last..whole.start()]);
            out.push(make(&caps));
            last = whole.end();
        }
        push_plain(&mut out, &text[last..]);
    }
    out
}

/// Split plain spans on a paired delimiter. Odd segments take `kind`;
/// an even segment count means a delimiter was left open.
fn split_delimiter(
    spans: Vec<TextSpan>,
    delimiter: &'static str,
    kind: SpanKind,
) -> Result<Vec<TextSpan>, ParseError> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        if span.kind() != SpanKind::Plain {
            out.push(span);
            continue;
        }
        let segments: Vec<&str> = span.text().split(delimiter).collect();
        if segments.len() % 2 == 0 {
            return Err(ParseError::UnterminatedDelimiter(delimiter));
        }
        for (i, segment) in segments.into_iter().enumerate() {
            if segment.is_empty() {
                continue;
            }
            if i % 2 == 1 {
                out.push(TextSpan::styled(segment, kind));
            } else {
                out.push(TextSpan::plain(segment));
            }
        }
    }
    Ok(out)
}

fn push_plain(out: &mut Vec<TextSpan>, text: &str) {
    if !text.is_empty() {
        out.push(TextSpan::plain(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn code_span_in_sentence() {
        assert_eq!(
            tokenize("This is text with a `code block` word").unwrap(),
            vec![
                TextSpan::plain("This is text with a "),
                TextSpan::code("code block"),
                TextSpan::plain(" word"),
            ]
        );
    }

    #[test]
    fn bold_and_italic() {
        assert_eq!(
            tokenize("**bold** and *italic*").unwrap(),
            vec![
                TextSpan::bold("bold"),
                TextSpan::plain(" and "),
                TextSpan::italic("italic"),
            ]
        );
    }

    #[test]
    fn repeated_bold() {
        assert_eq!(
            tokenize("a **b** c **d**").unwrap(),
            vec![
                TextSpan::plain("a "),
                TextSpan::bold("b"),
                TextSpan::plain(" c "),
                TextSpan::bold("d"),
            ]
        );
    }

    #[test]
    fn plain_text_is_one_span() {
        assert_eq!(
            tokenize("nothing special here").unwrap(),
            vec![TextSpan::plain("nothing special here")]
        );
    }

    #[test]
    fn empty_text_has_no_spans() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(tokenize("****").unwrap(), vec![]);
        assert_eq!(
            tokenize("x `` y").unwrap(),
            vec![TextSpan::plain("x "), TextSpan::plain(" y")]
        );
    }

    #[rstest]
    #[case("a **b", "**")]
    #[case("**a** **b", "**")]
    #[case("an *open italic", "*")]
    #[case("a `tick", "`")]
    fn unterminated_delimiters(#[case] input: &str, #[case] delimiter: &'static str) {
        assert_eq!(
            tokenize(input),
            Err(ParseError::UnterminatedDelimiter(delimiter))
        );
    }

    #[test]
    fn stage_order_sees_star_inside_code() {
        // Italic runs before code, so a lone `*` inside backticks is unbalanced.
        assert_eq!(
            tokenize("`a * b`"),
            Err(ParseError::UnterminatedDelimiter("*"))
        );
    }

    #[test]
    fn link() {
        assert_eq!(
            tokenize("This is text with a [link](https://example.com) here").unwrap(),
            vec![
                TextSpan::plain("This is text with a "),
                TextSpan::link("link", "https://example.com"),
                TextSpan::plain(" here"),
            ]
        );
    }

    #[test]
    fn image() {
        assert_eq!(
            tokenize("![alt text](https://example.com/i.png)").unwrap(),
            vec![TextSpan::image("alt text", "https://example.com/i.png")]
        );
    }

    #[test]
    fn image_is_not_also_a_link() {
        let spans = tokenize("see ![img](/i.png) and [link](/page)").unwrap();
        let images = spans.iter().filter(|s| s.kind() == SpanKind::Image).count();
        let links = spans.iter().filter(|s| s.kind() == SpanKind::Link).count();
        assert_eq!((images, links), (1, 1));
        assert_eq!(
            spans,
            vec![
                TextSpan::plain("see "),
                TextSpan::image("img", "/i.png"),
                TextSpan::plain(" and "),
                TextSpan::link("link", "/page"),
            ]
        );
    }

    #[test]
    fn bang_only_marks_an_image_directly_before_bracket() {
        assert_eq!(
            tokenize("!(x)[a](/b)").unwrap(),
            vec![
                TextSpan::plain("!(x)"),
                TextSpan::link("a", "/b"),
            ]
        );
        assert_eq!(
            tokenize("wow![a](/b)").unwrap(),
            vec![
                TextSpan::plain("wow"),
                TextSpan::image("a", "/b"),
            ]
        );
    }

    #[test]
    fn brackets_in_url_do_not_match() {
        assert_eq!(
            tokenize("[a](b(c))").unwrap(),
            vec![TextSpan::plain("[a](b(c))")]
        );
    }

    #[test]
    fn link_text_keeps_its_markup() {
        assert_eq!(
            tokenize("[**bold**](/x) **out**").unwrap(),
            vec![
                TextSpan::link("**bold**", "/x"),
                TextSpan::plain(" "),
                TextSpan::bold("out"),
            ]
        );
    }

    #[rstest]
    #[case("plain **bold** more *it* and `code` end", "plain bold more it and code end")]
    #[case("**a***b*`c`", "abc")]
    #[case("*one* two **three** `four`", "one two three four")]
    fn concatenated_text_drops_only_delimiters(#[case] input: &str, #[case] expected: &str) {
        let text: String = tokenize(input)
            .unwrap()
            .iter()
            .map(TextSpan::text)
            .collect();
        assert_eq!(text, expected);
    }
}
