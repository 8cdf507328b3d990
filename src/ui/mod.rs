//! Terminal preview of a form using ratatui
//!
//! Shows what the generated form will look like:
//! - Form title and description
//! - One input mock-up per field, in field order
//! - The read-only verification digit next to a NIT, when applicable

mod components;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

pub use components::{field_lines, FieldsPanel, HeaderPanel};

use crate::form::{FormConfig, FormField, FormSession};
use crate::nit::{verification_digit_field, VerificationDigitField};

/// Everything the preview needs, detached from the session it came from
#[derive(Debug, Clone)]
pub struct FormPreview {
    pub title: String,
    pub description: String,
    /// Sorted by `order`
    pub fields: Vec<FormField>,
    pub verification_digit: Option<VerificationDigitField>,
}

impl FormPreview {
    fn build(
        title: &str,
        description: &str,
        fields: &[FormField],
        nit_value: Option<&str>,
    ) -> Self {
        let mut fields = fields.to_vec();
        fields.sort_by_key(|f| f.order);

        Self {
            title: title.to_string(),
            description: description.to_string(),
            verification_digit: verification_digit_field(&fields, nit_value),
            fields,
        }
    }

    /// Preview a form still being edited
    pub fn from_session(session: &FormSession, nit_value: Option<&str>) -> Self {
        Self::build(
            session.name(),
            session.description(),
            session.fields(),
            nit_value,
        )
    }

    /// Preview a saved form
    pub fn from_config(config: &FormConfig, nit_value: Option<&str>) -> Self {
        Self::build(
            config.name(),
            config.description(),
            config.fields(),
            nit_value,
        )
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled Form"
        } else {
            &self.title
        }
    }
}

/// Draw the whole preview into `frame`
pub fn draw_preview(frame: &mut Frame, preview: &FormPreview) {
    let header_height = if preview.description.is_empty() { 3 } else { 4 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height), // Title
            Constraint::Min(3),                // Fields
            Constraint::Length(1),             // Key hint
        ])
        .split(frame.area());

    HeaderPanel::new(preview).render(frame, chunks[0]);
    FieldsPanel::new(preview).render(frame, chunks[1]);

    let hint = Paragraph::new(Line::from(" [Cancel]  [Submit]    press any key to close"))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, chunks[2]);
}

/// Full-screen preview application
pub struct PreviewApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl PreviewApp {
    /// Enter the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    /// Show `preview` until a key is pressed, then restore the terminal
    pub fn run(mut self, preview: &FormPreview) -> Result<()> {
        loop {
            self.terminal.draw(|frame| draw_preview(frame, preview))?;

            // Anything but a key press (e.g. a resize) just redraws
            if event::poll(Duration::from_millis(250))? {
                if let CrosstermEvent::Key(_) = event::read()? {
                    break;
                }
            }
        }

        self.restore()
    }

    fn restore(mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for PreviewApp {
    fn drop(&mut self) {
        // Best effort cleanup
        terminal::disable_raw_mode().ok();
        self.terminal
            .backend_mut()
            .execute(LeaveAlternateScreen)
            .ok();
        self.terminal.show_cursor().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{ORDERS, TERCEROS};
    use ratatui::backend::TestBackend;

    fn render(preview: &FormPreview, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw_preview(frame, preview)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_preview_orders() {
        let mut session = FormSession::for_table("Orders", &ORDERS.column_metadata());
        session.reorder(14, Some(0));
        let preview = FormPreview::from_session(&session, None);

        assert_eq!(preview.fields[0].name, "Status");
        assert!(preview.verification_digit.is_none());

        let screen = render(&preview, 80, 40);
        assert!(screen.contains("Orders Form"));
        assert!(screen.contains("Status *"));
        assert!(screen.contains("References Customers (id, name)"));
    }

    #[test]
    fn test_untitled_and_empty() {
        let mut session = FormSession::for_table("Nothing", &[]);
        session.set_name(" ");
        let preview = FormPreview::from_session(&session, None);

        let screen = render(&preview, 60, 12);
        assert!(screen.contains("Untitled Form"));
        assert!(screen.contains("No fields configured yet"));
    }

    #[test]
    fn test_verification_digit_row() {
        let session = FormSession::for_table("Terceros", &TERCEROS.column_metadata());
        let config = session.to_snapshot().unwrap();
        let preview = FormPreview::from_config(&config, Some("800197268"));

        let lines: Vec<String> = FieldsPanel::new(&preview)
            .lines()
            .iter()
            .map(|l| l.to_string())
            .collect();

        let nit = lines.iter().position(|l| l.trim() == "Nit *").unwrap();
        let dv = lines
            .iter()
            .position(|l| l.contains("Dígito de Verificación (DV)"))
            .unwrap();
        assert!(dv > nit);
        assert!(lines.iter().any(|l| l.contains("[ 4 ] (read-only)")));
    }

    #[test]
    fn test_field_lines_per_type() {
        let fields = FormSession::for_table("Orders", &ORDERS.column_metadata())
            .fields()
            .to_vec();

        let order_date: Vec<String> = field_lines(&fields[3]).iter().map(|l| l.to_string()).collect();
        assert_eq!(order_date[1].trim(), "[ yyyy-mm-dd ]");

        let freight: Vec<String> = field_lines(&fields[7]).iter().map(|l| l.to_string()).collect();
        assert_eq!(freight[0].trim(), "Freight");
        assert_eq!(freight[1].trim(), "[ Enter freight ]");
    }
}
