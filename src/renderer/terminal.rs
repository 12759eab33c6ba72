//! Terminal front-end: draws a [`Document`] with ratatui.
//!
//! Layout is deliberately simple. Every element except `span` is a block and
//! starts a new line; text and `span`s flow inline. Recognized props:
//!
//! - `hidden = true` skips the node and its subtree,
//! - `bold = true` renders bold,
//! - `fg = "<color>"` sets the foreground (any name ratatui's `Color` parses).

use std::str::FromStr;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget},
};

use super::document::{Document, NodeId, NodeKind};
use crate::vdom::{PropValue, Props};

const INLINE_TAGS: &[&str] = &["span"];

/// Widget rendering the subtree of `root` in `document`.
pub struct Screen<'a> {
    document: &'a Document,
    root: NodeId,
}

impl<'a> Screen<'a> {
    #[must_use]
    pub const fn new(document: &'a Document, root: NodeId) -> Self {
        Self { document, root }
    }

    /// Lays the subtree out into lines.
    #[must_use]
    pub fn lines(&self) -> Vec<Line<'a>> {
        let mut layout = Layout::default();
        layout.walk(self.document, self.root, Style::default());
        layout.finish()
    }
}

impl Widget for Screen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Text::from(self.lines())).render(area, buf);
    }
}

#[derive(Default)]
struct Layout<'a> {
    lines: Vec<Line<'a>>,
    current: Vec<Span<'a>>,
}

impl<'a> Layout<'a> {
    fn walk(&mut self, document: &'a Document, id: NodeId, style: Style) {
        let Some(node) = document.get(id) else {
            return;
        };

        match &node.kind {
            NodeKind::Text(value) => self.current.push(Span::styled(value.as_str(), style)),
            NodeKind::Element { tag, props } => {
                if matches!(props.get("hidden"), Some(PropValue::Bool(true))) {
                    return;
                }
                let style = styled(style, props);
                let block = !INLINE_TAGS.contains(&tag.as_str());

                if block {
                    self.break_line();
                }
                for child in &node.children {
                    self.walk(document, *child, style);
                }
                if block {
                    self.break_line();
                }
            }
        }
    }

    fn break_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    fn finish(mut self) -> Vec<Line<'a>> {
        self.break_line();
        self.lines
    }
}

fn styled(mut style: Style, props: &Props) -> Style {
    if matches!(props.get("bold"), Some(PropValue::Bool(true))) {
        style = style.add_modifier(Modifier::BOLD);
    }
    if let Some(PropValue::Str(name)) = props.get("fg") {
        if let Ok(color) = Color::from_str(name) {
            style = style.fg(color);
        }
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
    use crate::vdom::{el, text};
    use ratatui::{Terminal, backend::TestBackend};

    fn mount(tree: &crate::vdom::VirtualNode) -> (Document, NodeId) {
        let mut doc = Document::new();
        let mirror = reconcile(&mut doc, None, Some(tree))
            .unwrap()
            .mirror
            .unwrap();
        let root = *mirror.target();
        (doc, root)
    }

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area().width)
            .map(|x| buffer.cell((x, y)).map_or(" ", |c| c.symbol()))
            .collect::<String>()
            .trim_end()
            .to_owned()
    }

    #[test]
    fn test_blocks_and_inline_spans() {
        let tree = el(
            "div",
            Props::new(),
            [
                el("p", Props::new(), [text("Count: "), el("span", Props::new(), [text("3")])]),
                el("p", Props::new(), [text("press q")]),
            ],
        );
        let (doc, root) = mount(&tree);

        let lines = Screen::new(&doc, root).lines();
        let rendered: Vec<String> = lines.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["Count: 3", "press q"]);
    }

    #[test]
    fn test_hidden_and_styles() {
        let tree = el(
            "div",
            Props::new(),
            [
                el("p", Props::new().with("hidden", true), [text("secret")]),
                el("p", Props::new().with("bold", true).with("fg", "red"), [text("alert")]),
            ],
        );
        let (doc, root) = mount(&tree);

        let lines = Screen::new(&doc, root).lines();
        assert_eq!(lines.len(), 1);
        let span = &lines[0].spans[0];
        assert_eq!(span.content, "alert");
        assert_eq!(span.style.fg, Some(Color::Red));
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_renders_into_buffer() {
        let tree = el("div", Props::new(), [el("p", Props::new(), [text("hello")])]);
        let (doc, root) = mount(&tree);

        let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(Screen::new(&doc, root), frame.area()))
            .unwrap();

        assert_eq!(row(terminal.backend().buffer(), 0), "hello");
        assert_eq!(row(terminal.backend().buffer(), 1), "");
    }
}
