//! Custom widgets for the flashcard TUI.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Paragraph, Widget},
};

use super::theme::Theme;

// ══════════════════════════════════════════════════════════════════════════
// Logo Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct Logo<'a> {
    theme: &'a Theme,
}

impl<'a> Logo<'a> {
    const ART: &'static str = r#"
    ╭──────────────────────────────────────────╮
    │  _____ _ _           _           _       │
    │ |  ___| (_)_ __   __| | ___  ___| | __   │
    │ | |_  | | | '_ \ / _` |/ _ \/ __| |/ /   │
    │ |  _| | | | |_) | (_| |  __/ (__|   <    │
    │ |_|   |_|_| .__/ \__,_|\___|\___|_|\_\   │
    │           |_|                            │
    │        ┌──────┐  question, flip, answer  │
    │        │ Q──A │                          │
    │        └──────┘                          │
    ╰──────────────────────────────────────────╯"#;

    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    pub fn render_to(theme: &Theme, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = Self::ART
            .lines()
            .skip(1)
            .map(|line| {
                Line::from(vec![Span::styled(
                    line,
                    Style::default().fg(theme.colors.primary),
                )])
            })
            .collect();

        let para = Paragraph::new(lines).alignment(Alignment::Center);

        para.render(area, buf);
    }
}

impl Widget for Logo<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Self::render_to(self.theme, area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Deck Bar Widget
// ══════════════════════════════════════════════════════════════════════════

/// One-line strip above the card: position in the deck, which side is
/// showing, and the total count.
pub struct DeckBar<'a> {
    position: Option<usize>,
    total: usize,
    front_visible: bool,
    theme: &'a Theme,
}

impl<'a> DeckBar<'a> {
    pub fn new(position: Option<usize>, total: usize, front_visible: bool, theme: &'a Theme) -> Self {
        Self {
            position,
            total,
            front_visible,
            theme,
        }
    }
}

impl Widget for DeckBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::horizontal([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

        // Position
        let position_text = match self.position {
            Some(i) => Line::from(vec![
                Span::styled("Card ", Style::default().fg(self.theme.colors.text_muted)),
                Span::styled(
                    format!("{} / {}", i + 1, self.total),
                    self.theme.highlight(),
                ),
            ]),
            None => Line::from(vec![Span::styled(
                "No cards",
                Style::default().fg(self.theme.colors.text_dim),
            )]),
        };
        Paragraph::new(position_text)
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        // Side indicator
        let side_text = if self.position.is_some() {
            if self.front_visible {
                Line::from(vec![
                    Span::styled("● ", self.theme.card_front()),
                    Span::styled("Question", Style::default().fg(self.theme.colors.text_muted)),
                ])
            } else {
                Line::from(vec![
                    Span::styled("● ", self.theme.card_back()),
                    Span::styled("Answer", Style::default().fg(self.theme.colors.text_muted)),
                ])
            }
        } else {
            Line::from("")
        };
        Paragraph::new(side_text)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        // Total
        let total_text = Line::from(vec![
            Span::styled("Total: ", Style::default().fg(self.theme.colors.text_muted)),
            Span::styled(
                self.total.to_string(),
                Style::default().fg(self.theme.colors.text_dim),
            ),
        ]);
        Paragraph::new(total_text)
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Flashcard Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct FlashcardWidget<'a> {
    content: &'a str,
    is_front: bool,
    theme: &'a Theme,
}

impl<'a> FlashcardWidget<'a> {
    pub fn new(content: &'a str, is_front: bool, theme: &'a Theme) -> Self {
        Self {
            content,
            is_front,
            theme,
        }
    }
}

impl Widget for FlashcardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (label, label_style, border_style) = if self.is_front {
            (
                "QUESTION",
                self.theme.card_front(),
                Style::default().fg(self.theme.colors.accent),
            )
        } else {
            (
                "ANSWER",
                self.theme.card_back(),
                Style::default().fg(self.theme.colors.success),
            )
        };

        // Outer block with pretty border
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.colors.bg_card))
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(label, label_style),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center);

        let inner = block.inner(area);
        block.render(area, buf);

        // Wrap up front so vertical centering counts display lines, not
        // newlines in the source text.
        let text_width = inner.width.saturating_sub(4).max(1) as usize;
        let wrapped = textwrap::wrap(self.content, text_width);
        let lines: Vec<Line> = wrapped
            .iter()
            .map(|l| {
                Line::from(Span::styled(
                    l.to_string(),
                    Style::default().fg(self.theme.colors.text),
                ))
            })
            .collect();

        let vertical_padding = inner.height.saturating_sub(lines.len() as u16) / 2;

        let content_area = Rect {
            x: inner.x + 2,
            y: inner.y + vertical_padding,
            width: inner.width.saturating_sub(4),
            height: inner.height.saturating_sub(vertical_padding),
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(content_area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Key Hints Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct KeyHints<'a> {
    hints: &'a [(&'a str, &'a str)],
    theme: &'a Theme,
}

impl<'a> KeyHints<'a> {
    pub fn new(hints: &'a [(&'a str, &'a str)], theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans: Vec<Span> = self
            .hints
            .iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(*key, self.theme.key_highlight()),
                    Span::styled(format!(" {} ", desc), self.theme.key_hint()),
                    Span::styled("│ ", Style::default().fg(self.theme.colors.text_dim)),
                ]
            })
            .collect();

        let line = Line::from(spans);
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Empty Deck Widget
// ══════════════════════════════════════════════════════════════════════════

/// Shown in place of the card when the deck has no cards.
pub struct EmptyDeckWidget<'a> {
    theme: &'a Theme,
}

impl<'a> EmptyDeckWidget<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for EmptyDeckWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.colors.text_dim))
            .style(Style::default().bg(self.theme.colors.bg_card));

        let inner = block.inner(area);
        block.render(area, buf);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Deck is empty!",
                Style::default()
                    .fg(self.theme.colors.text)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(self.theme.colors.text_muted)),
                Span::styled("a", self.theme.key_highlight()),
                Span::styled(
                    " to add a new card to begin.",
                    Style::default().fg(self.theme.colors.text_muted),
                ),
            ]),
        ];

        let vertical_padding = inner.height.saturating_sub(text.len() as u16) / 2;
        let content_area = Rect {
            x: inner.x,
            y: inner.y + vertical_padding,
            width: inner.width,
            height: inner.height.saturating_sub(vertical_padding),
        };

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .render(content_area, buf);
    }
}
