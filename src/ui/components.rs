//! Widgets for the form preview

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::FormPreview;
use crate::form::{FieldType, FormField};
use crate::nit::VerificationDigitField;

/// Title and description of the form
pub struct HeaderPanel<'a> {
    preview: &'a FormPreview,
}

impl<'a> HeaderPanel<'a> {
    pub fn new(preview: &'a FormPreview) -> Self {
        Self { preview }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![Line::from(Span::styled(
            format!(" {}", self.preview.display_title()),
            title_style,
        ))];

        if !self.preview.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!(" {}", self.preview.description),
                Style::default().fg(Color::Gray),
            )));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Form Preview ")
            .border_style(Style::default().fg(Color::Blue));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Field list with one input mock-up per field
pub struct FieldsPanel<'a> {
    preview: &'a FormPreview,
}

impl<'a> FieldsPanel<'a> {
    pub fn new(preview: &'a FormPreview) -> Self {
        Self { preview }
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let preview = self.preview;

        if preview.fields.is_empty() {
            return vec![Line::from(Span::styled(
                " No fields configured yet",
                Style::default().fg(Color::DarkGray),
            ))];
        }

        let mut lines = Vec::new();
        for field in &preview.fields {
            lines.extend(field_lines(field));
            lines.push(Line::from(""));

            // The digit sits right under the NIT it belongs to
            if let Some(dv) = preview
                .verification_digit
                .as_ref()
                .filter(|dv| dv.source_field == field.name)
            {
                lines.extend(verification_digit_lines(dv));
                lines.push(Line::from(""));
            }
        }

        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Fields ")
            .border_style(Style::default().fg(Color::Blue));

        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

/// Label, input mock-up and foreign key hint for one field
pub fn field_lines(field: &FormField) -> Vec<Line<'static>> {
    let mut label = vec![Span::styled(
        format!(" {}", field.label),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if field.required {
        label.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }

    let lower = field.label.to_lowercase();
    let input = match field.field_type {
        FieldType::Text => format!("[ Enter {} ]", lower),
        FieldType::Textarea => format!("[ Enter {} ... ]", lower),
        FieldType::Number => format!("[ Enter {} ] #", lower),
        FieldType::Date => "[ yyyy-mm-dd ]".to_string(),
        FieldType::Switch => "[ ] Enabled".to_string(),
        FieldType::Select => format!("[ Select {} v ]", lower),
    };

    let mut lines = vec![
        Line::from(label),
        Line::from(Span::styled(
            format!("   {}", input),
            Style::default().fg(Color::Gray),
        )),
    ];

    if field.field_type == FieldType::Select {
        let choices: Vec<&str> = field
            .options
            .iter()
            .flatten()
            .map(|o| o.label.as_str())
            .collect();
        if !choices.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("   options: {}", choices.join(", ")),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if field.is_foreign_key {
        let display = field
            .foreign_key_fields
            .as_deref()
            .unwrap_or_default()
            .join(", ");
        lines.push(Line::from(Span::styled(
            format!(
                "   References {} ({})",
                field.referenced_table.as_deref().unwrap_or("?"),
                display
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

fn verification_digit_lines(dv: &VerificationDigitField) -> Vec<Line<'static>> {
    let value = dv
        .value
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());

    vec![
        Line::from(Span::styled(
            format!(" {}", dv.label),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("   [ {} ] (read-only)", value),
            Style::default().fg(Color::Green),
        )),
    ]
}
