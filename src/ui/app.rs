//! Main application state and logic.

use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::debug;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use super::widgets::{DeckBar, EmptyDeckWidget, FlashcardWidget, KeyHints, Logo};
use crate::config::Config;
use crate::deck::DeckController;

/// How long a status message stays on screen.
const STATUS_SECS: u64 = 4;

// ══════════════════════════════════════════════════════════════════════════
// Application State
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Study,
    AddCard,
    EditCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub at: Instant,
}

pub struct App {
    pub screen: Screen,
    pub running: bool,

    // Config and theme
    pub config: Config,
    pub theme: Theme,

    // The deck itself
    pub deck: DeckController,

    // Card form state, shared by the add and edit screens
    pub input_front: String,
    pub input_back: String,
    pub input_focus: usize, // 0 = front, 1 = back

    // Press-twice confirmation for delete
    pub delete_pending: bool,

    // Status message (shown temporarily)
    pub status_message: Option<StatusMessage>,
}

impl App {
    pub fn new(deck: DeckController, config: Config) -> Self {
        let theme = Theme::from_name(&config.theme);

        Self {
            screen: Screen::Study,
            running: true,
            config,
            theme,
            deck,
            input_front: String::new(),
            input_back: String::new(),
            input_focus: 0,
            delete_pending: false,
            status_message: None,
        }
    }

    pub fn cycle_theme(&mut self) {
        let new_theme_name = self.theme.name.next();
        self.theme = Theme::new(new_theme_name);
        self.config.theme = new_theme_name.as_str().to_string();
        let _ = self.config.save();
    }

    pub fn set_status(&mut self, text: String) {
        self.status_message = Some(StatusMessage {
            text,
            kind: StatusKind::Info,
            at: Instant::now(),
        });
    }

    pub fn set_error(&mut self, text: String) {
        self.status_message = Some(StatusMessage {
            text,
            kind: StatusKind::Error,
            at: Instant::now(),
        });
    }

    pub fn open_add_card(&mut self) {
        self.input_front.clear();
        self.input_back.clear();
        self.input_focus = 0;
        self.delete_pending = false;
        self.screen = Screen::AddCard;
    }

    /// Enter the edit screen with the current card's text pre-filled.
    pub fn open_edit_card(&mut self) {
        self.delete_pending = false;
        match self.deck.current() {
            Ok(card) => {
                self.input_front = card.front.clone();
                self.input_back = card.back.clone();
                self.input_focus = 0;
                self.screen = Screen::EditCard;
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn close_card_form(&mut self) {
        self.input_front.clear();
        self.input_back.clear();
        self.input_focus = 0;
        self.screen = Screen::Study;
    }

    fn submit_card_form(&mut self) {
        match self.screen {
            Screen::AddCard => match self.deck.add_card(&self.input_front, &self.input_back) {
                Ok(card) => {
                    let front = card.front.clone();
                    self.set_status(format!(
                        "Added \"{}\" ({} cards)",
                        preview(&front),
                        self.deck.len()
                    ));
                    self.close_card_form();
                }
                // Leave the inputs intact for correction
                Err(e) => self.set_error(e.to_string()),
            },
            Screen::EditCard => match self.deck.edit_current(&self.input_front, &self.input_back) {
                Ok(()) => {
                    self.set_status("Card updated".to_string());
                    self.close_card_form();
                }
                Err(e) => self.set_error(e.to_string()),
            },
            Screen::Study => {}
        }
    }

    fn delete_current_card(&mut self) {
        match self.deck.delete_current() {
            Ok(card) => {
                self.set_status(format!(
                    "Deleted \"{}\" ({} left)",
                    preview(&card.front),
                    self.deck.len()
                ));
            }
            Err(e) => self.set_error(e.to_string()),
        }
        self.delete_pending = false;
    }

    // ══════════════════════════════════════════════════════════════════════
    // Event Handling
    // ══════════════════════════════════════════════════════════════════════

    pub fn handle_events(&mut self) -> anyhow::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }

                match self.screen {
                    Screen::Study => self.handle_study_keys(key.code),
                    Screen::AddCard | Screen::EditCard => self.handle_card_form_keys(key.code),
                }
            }
        }
        Ok(())
    }

    pub fn handle_study_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                debug!("quit requested");
                self.running = false;
            }
            KeyCode::Char('t') => {
                self.delete_pending = false;
                self.cycle_theme();
            }
            KeyCode::Char(' ') | KeyCode::Char('f') => {
                self.delete_pending = false;
                self.deck.flip();
            }
            KeyCode::Right | KeyCode::Char('n') | KeyCode::Char('l') => {
                self.delete_pending = false;
                self.deck.next();
            }
            KeyCode::Left | KeyCode::Char('p') | KeyCode::Char('h') => {
                self.delete_pending = false;
                self.deck.previous();
            }
            KeyCode::Char('a') => self.open_add_card(),
            KeyCode::Char('e') => self.open_edit_card(),
            KeyCode::Char('d') => {
                if self.delete_pending {
                    self.delete_current_card();
                } else if self.deck.is_empty() {
                    self.set_error("the deck has no cards".to_string());
                } else {
                    self.delete_pending = true;
                    self.set_status("Press d again to delete this card".to_string());
                }
            }
            _ => {
                self.delete_pending = false;
            }
        }
    }

    pub fn handle_card_form_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.close_card_form(),
            KeyCode::Tab => {
                self.input_focus = (self.input_focus + 1) % 2;
            }
            KeyCode::Enter => {
                if self.input_focus == 0 {
                    self.input_focus = 1;
                } else {
                    self.submit_card_form();
                }
            }
            KeyCode::Char(c) => {
                if self.input_focus == 0 {
                    self.input_front.push(c);
                } else {
                    self.input_back.push(c);
                }
            }
            KeyCode::Backspace => {
                if self.input_focus == 0 {
                    self.input_front.pop();
                } else {
                    self.input_back.pop();
                }
            }
            _ => {}
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Rendering
    // ══════════════════════════════════════════════════════════════════════

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Clear with background
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.colors.bg_dark)),
            area,
        );

        match self.screen {
            Screen::Study => self.render_study(frame, area),
            Screen::AddCard => self.render_card_form(frame, area, "Add Card"),
            Screen::EditCard => self.render_card_form(frame, area, "Edit Card"),
        }
    }

    fn render_study(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(1),  // Top padding
            Constraint::Length(1),  // Title
            Constraint::Length(1),  // Deck bar
            Constraint::Length(1),  // Spacing
            Constraint::Min(8),     // Card
            Constraint::Length(1),  // Status
            Constraint::Length(2),  // Hints
        ])
        .split(area);

        // Title
        let title = Paragraph::new("Flipdeck")
            .alignment(Alignment::Center)
            .style(self.theme.title());
        frame.render_widget(title, chunks[1]);

        // Deck bar
        let position = if self.deck.is_empty() {
            None
        } else {
            Some(self.deck.cursor())
        };
        frame.render_widget(
            DeckBar::new(
                position,
                self.deck.len(),
                self.deck.is_front_visible(),
                &self.theme,
            ),
            chunks[2],
        );

        // Card display
        let card_area = centered_rect(70, 90, chunks[4]);
        match self.deck.current() {
            Ok(card) => {
                let (content, is_front) = if self.deck.is_front_visible() {
                    (card.front.as_str(), true)
                } else {
                    (card.back.as_str(), false)
                };
                frame.render_widget(FlashcardWidget::new(content, is_front, &self.theme), card_area);
            }
            Err(_) => {
                // Logo above the empty-deck prompt
                let empty_chunks = Layout::vertical([
                    Constraint::Length(12),
                    Constraint::Min(6),
                ])
                .split(card_area);
                frame.render_widget(Logo::new(&self.theme), empty_chunks[0]);
                frame.render_widget(EmptyDeckWidget::new(&self.theme), empty_chunks[1]);
            }
        }

        self.render_status(frame, chunks[5]);

        // Key hints with theme indicator
        let theme_hint = format!("[{}]", self.theme.name.display_name());
        let hints_data: [(&str, &str); 8] = [
            ("Space", "flip"),
            ("n/→", "next"),
            ("p/←", "prev"),
            ("a", "add"),
            ("e", "edit"),
            ("d", "delete"),
            ("t", &theme_hint),
            ("q", "quit"),
        ];
        let hints = KeyHints::new(&hints_data, &self.theme);
        frame.render_widget(hints, chunks[6]);
    }

    fn render_card_form(&mut self, frame: &mut Frame, area: Rect, title: &str) {
        let chunks = Layout::vertical([
            Constraint::Length(3),  // Title
            Constraint::Length(1),  // Spacing
            Constraint::Length(3),  // Front label + input
            Constraint::Length(1),  // Spacing
            Constraint::Length(3),  // Back label + input
            Constraint::Length(2),  // Spacing
            Constraint::Length(1),  // Status / card count
            Constraint::Min(1),     // Spacer
            Constraint::Length(2),  // Hints
        ])
        .split(centered_rect(60, 100, area));

        // Title
        let title_para = Paragraph::new(title)
            .alignment(Alignment::Center)
            .style(self.theme.title());
        frame.render_widget(title_para, chunks[0]);

        // Card metadata when editing
        if self.screen == Screen::EditCard {
            if let Ok(card) = self.deck.current() {
                let meta = Paragraph::new(format!(
                    "#{} · added {}",
                    card.id,
                    card.created_at.format("%Y-%m-%d")
                ))
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.theme.colors.text_dim));
                frame.render_widget(meta, chunks[1]);
            }
        }

        // Front input
        let front_style = if self.input_focus == 0 {
            Style::default().fg(self.theme.colors.accent)
        } else {
            Style::default().fg(self.theme.colors.text_muted)
        };
        let front = Paragraph::new(self.input_front.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(front_style)
                .title(" Question ")
                .title_style(front_style),
        );
        frame.render_widget(front, chunks[2]);

        // Back input
        let back_style = if self.input_focus == 1 {
            Style::default().fg(self.theme.colors.accent)
        } else {
            Style::default().fg(self.theme.colors.text_muted)
        };
        let back = Paragraph::new(self.input_back.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(back_style)
                .title(" Answer ")
                .title_style(back_style),
        );
        frame.render_widget(back, chunks[4]);

        // Cursor at the end of the focused field, clamped inside the border
        let (field_area, text) = if self.input_focus == 0 {
            (chunks[2], self.input_front.as_str())
        } else {
            (chunks[4], self.input_back.as_str())
        };
        let text_cols = text.width() as u16;
        let max_cols = field_area.width.saturating_sub(2);
        frame.set_cursor_position((
            field_area.x + 1 + text_cols.min(max_cols.saturating_sub(1)),
            field_area.y + 1,
        ));

        // Status, or the card count when there is nothing to report
        if self.status_is_fresh() {
            self.render_status(frame, chunks[6]);
        } else {
            let count = Paragraph::new(format!("Cards: {}", self.deck.len()))
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.theme.colors.text_muted));
            frame.render_widget(count, chunks[6]);
        }

        // Hints
        let hints = KeyHints::new(
            &[
                ("Tab", "switch field"),
                ("Enter", "save"),
                ("Esc", "cancel"),
            ],
            &self.theme,
        );
        frame.render_widget(hints, chunks[8]);
    }

    fn status_is_fresh(&self) -> bool {
        self.status_message
            .as_ref()
            .is_some_and(|m| m.at.elapsed().as_secs() < STATUS_SECS)
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            if msg.at.elapsed().as_secs() < STATUS_SECS {
                let style = match msg.kind {
                    StatusKind::Info => self.theme.status_info(),
                    StatusKind::Error => self.theme.status_error(),
                };
                let status = Paragraph::new(Line::from(Span::styled(msg.text.as_str(), style)))
                    .alignment(Alignment::Center);
                frame.render_widget(status, area);
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Helper Functions
// ══════════════════════════════════════════════════════════════════════════

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Truncate card text for status messages.
fn preview(text: &str) -> String {
    const MAX: usize = 24;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_app() -> App {
        let deck = DeckController::new(vec![
            ("Q1".to_string(), "A1".to_string()),
            ("Q2".to_string(), "A2".to_string()),
        ]);
        App::new(deck, Config::default())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_card_form_keys(KeyCode::Char(c));
        }
    }

    #[test]
    fn study_keys_drive_navigation_and_flip() {
        let mut app = sample_app();
        app.handle_study_keys(KeyCode::Char('f'));
        assert!(!app.deck.is_front_visible());

        app.handle_study_keys(KeyCode::Char('n'));
        assert_eq!(app.deck.cursor(), 1);
        assert!(app.deck.is_front_visible());

        app.handle_study_keys(KeyCode::Left);
        assert_eq!(app.deck.cursor(), 0);
    }

    #[test]
    fn quit_key_stops_the_app() {
        let mut app = sample_app();
        app.handle_study_keys(KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = sample_app();
        app.handle_study_keys(KeyCode::Char('d'));
        assert!(app.delete_pending);
        assert_eq!(app.deck.len(), 2);

        app.handle_study_keys(KeyCode::Char('d'));
        assert!(!app.delete_pending);
        assert_eq!(app.deck.len(), 1);
    }

    #[test]
    fn any_other_key_cancels_pending_delete() {
        let mut app = sample_app();
        app.handle_study_keys(KeyCode::Char('d'));
        app.handle_study_keys(KeyCode::Char('n'));
        assert!(!app.delete_pending);
        assert_eq!(app.deck.len(), 2);
    }

    #[test]
    fn add_card_flow_appends_and_returns_to_study() {
        let mut app = sample_app();
        app.handle_study_keys(KeyCode::Char('a'));
        assert_eq!(app.screen, Screen::AddCard);

        type_text(&mut app, "Q3");
        app.handle_card_form_keys(KeyCode::Tab);
        type_text(&mut app, "A3");
        app.handle_card_form_keys(KeyCode::Enter);

        assert_eq!(app.screen, Screen::Study);
        assert_eq!(app.deck.len(), 3);
        assert_eq!(app.deck.current().unwrap().front, "Q3");
    }

    #[test]
    fn enter_on_front_field_moves_focus_to_back() {
        let mut app = sample_app();
        app.open_add_card();
        type_text(&mut app, "Q3");
        app.handle_card_form_keys(KeyCode::Enter);
        assert_eq!(app.input_focus, 1);
        assert_eq!(app.screen, Screen::AddCard);
    }

    #[test]
    fn blank_submission_keeps_inputs_for_correction() {
        let mut app = sample_app();
        app.open_add_card();
        type_text(&mut app, "Q3");
        app.handle_card_form_keys(KeyCode::Tab);
        app.handle_card_form_keys(KeyCode::Enter);

        assert_eq!(app.screen, Screen::AddCard);
        assert_eq!(app.deck.len(), 2);
        assert_eq!(app.input_front, "Q3");
        assert!(matches!(
            app.status_message,
            Some(StatusMessage {
                kind: StatusKind::Error,
                ..
            })
        ));
    }

    #[test]
    fn edit_screen_prefills_current_card() {
        let mut app = sample_app();
        app.handle_study_keys(KeyCode::Char('n'));
        app.handle_study_keys(KeyCode::Char('e'));

        assert_eq!(app.screen, Screen::EditCard);
        assert_eq!(app.input_front, "Q2");
        assert_eq!(app.input_back, "A2");
    }

    #[test]
    fn edit_submission_updates_card_in_place() {
        let mut app = sample_app();
        app.handle_study_keys(KeyCode::Char('e'));
        app.handle_card_form_keys(KeyCode::Backspace);
        type_text(&mut app, "1 revised");
        app.handle_card_form_keys(KeyCode::Tab);
        app.handle_card_form_keys(KeyCode::Enter);

        assert_eq!(app.screen, Screen::Study);
        assert_eq!(app.deck.len(), 2);
        assert_eq!(app.deck.current().unwrap().front, "Q1 revised");
        assert_eq!(app.deck.current().unwrap().back, "A1");
    }

    #[test]
    fn edit_on_empty_deck_reports_error() {
        let mut app = App::new(DeckController::new(Vec::new()), Config::default());
        app.handle_study_keys(KeyCode::Char('e'));
        assert_eq!(app.screen, Screen::Study);
        assert!(matches!(
            app.status_message,
            Some(StatusMessage {
                kind: StatusKind::Error,
                ..
            })
        ));
    }

    #[test]
    fn escape_cancels_the_form_without_mutation() {
        let mut app = sample_app();
        app.open_add_card();
        type_text(&mut app, "half-finished");
        app.handle_card_form_keys(KeyCode::Esc);

        assert_eq!(app.screen, Screen::Study);
        assert_eq!(app.deck.len(), 2);
        assert!(app.input_front.is_empty());
    }
}
