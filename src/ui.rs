use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph},
};

use crate::model::UiData;

pub const TITLE_HEIGHT: usize = 1;
pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const CMDLINE_HEIGHT: usize = 2;
pub const COLUMN_WIDTH_MARGIN: usize = 2;

// Highlight used for selected rows/columns, the tui stand-in for the page's
// light green cell background.
fn highlight_style() -> Style {
    Style::default().bg(Color::Green).fg(Color::Black)
}

pub struct TableUi;

impl TableUi {
    pub fn new() -> Self {
        TableUi
    }

    pub fn draw(&self, data: &UiData, frame: &mut Frame) {
        let area = frame.area();
        if area.height < (TITLE_HEIGHT + TABLE_HEADER_HEIGHT + CMDLINE_HEIGHT) as u16 {
            return;
        }
        let title_area = Rect::new(0, 0, area.width, 1);
        let header_area = Rect::new(0, TITLE_HEIGHT as u16, area.width, 1);
        let table_area = Rect::new(
            0,
            (TITLE_HEIGHT + TABLE_HEADER_HEIGHT) as u16,
            area.width,
            area.height - (TITLE_HEIGHT + TABLE_HEADER_HEIGHT + CMDLINE_HEIGHT) as u16,
        );
        let form_area = Rect::new(0, area.height - 2, area.width, 1);
        let status_area = Rect::new(0, area.height - 1, area.width, 1);

        self.draw_title(data, frame, title_area);
        self.draw_header(data, frame, header_area);
        self.draw_table(data, frame, table_area);
        if let Some(form) = &data.form {
            self.draw_form(form, frame, form_area);
        }
        self.draw_status(data, frame, status_area);
        if data.show_popup {
            self.draw_popup(data, frame, area);
        }
    }

    fn draw_title(&self, data: &UiData, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::from(format!(" {} ", data.name)).bold()];
        if data.filter_active {
            spans.push(Span::from(" [filtered] ").yellow());
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_header(&self, data: &UiData, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::with_capacity(data.table.len() * 2 + 1);
        spans.push(Span::from(" "));
        for (idx, column) in data.table.iter().enumerate() {
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if data.highlighted_cols.get(idx).copied().unwrap_or(false) {
                style = highlight_style().add_modifier(Modifier::BOLD);
            }
            if idx == data.cursor_col {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled(pad(&column.name, column.width), style));
            spans.push(Span::from(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_table(&self, data: &UiData, frame: &mut Frame, area: Rect) {
        if data.nrows == 0 {
            let message = Paragraph::new("No data available").dim();
            frame.render_widget(message, area);
            return;
        }

        let view_rows = data
            .table
            .first()
            .map(|c| c.data.len())
            .unwrap_or(0)
            .min(area.height as usize);
        let mut lines = Vec::with_capacity(view_rows);
        for row in 0..view_rows {
            let row_highlighted = data.highlighted_rows.get(row).copied().unwrap_or(false);
            let mut spans = Vec::with_capacity(data.table.len() * 2 + 1);
            spans.push(Span::from(" "));
            for (idx, column) in data.table.iter().enumerate() {
                let col_highlighted = data.highlighted_cols.get(idx).copied().unwrap_or(false);
                let mut style = Style::default();
                if row_highlighted || col_highlighted {
                    style = highlight_style();
                }
                if row == data.cursor_row && idx == data.cursor_col {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                let value = column.data.get(row).map(String::as_str).unwrap_or("");
                spans.push(Span::styled(pad(value, column.width), style));
                spans.push(Span::from(" "));
            }
            lines.push(Line::from(spans));
        }
        frame.render_widget(Paragraph::new(Text::from(lines)), area);
    }

    fn draw_form(&self, form: &crate::inputter::FormView, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        let mut x: usize = 0;
        let title = format!(" {} | ", form.title);
        x += title.chars().count();
        spans.push(Span::from(title).bold());
        let mut cursor_x = x;
        for (idx, (label, value)) in form.fields.iter().enumerate() {
            let label_text = format!("{}: ", label);
            let value_style = if idx == form.active {
                cursor_x = x + label_text.chars().count() + form.cursor;
                Style::default().add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default()
            };
            x += label_text.chars().count() + value.chars().count() + 2;
            spans.push(Span::from(label_text).dim());
            spans.push(Span::styled(value.clone(), value_style));
            spans.push(Span::from("  "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        if (cursor_x as u16) < area.width {
            frame.set_cursor_position(Position::new(cursor_x as u16, area.y));
        }
    }

    fn draw_status(&self, data: &UiData, frame: &mut Frame, area: Rect) {
        let status = Line::from(vec![
            Span::from(format!(" {}", data.status_message)),
            Span::from(format!("  |  {} rows", data.nrows)).dim(),
        ]);
        frame.render_widget(Paragraph::new(status), area);
    }

    fn draw_popup(&self, data: &UiData, frame: &mut Frame, area: Rect) {
        let width = area.width.min(64);
        let height = area
            .height
            .min(data.popup_message.lines().count() as u16 + 2);
        let popup = Rect::new(
            (area.width - width) / 2,
            (area.height - height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);
        let block = Block::bordered().title(" Help ");
        frame.render_widget(
            Paragraph::new(data.popup_message.as_str()).block(block),
            popup,
        );
    }
}

fn pad(s: &str, width: usize) -> String {
    let truncated: String = s.chars().take(width).collect();
    format!("{:<width$}", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_truncates_and_fills() {
        assert_eq!(pad("abc", 5), "abc  ");
        assert_eq!(pad("abcdef", 3), "abc");
        assert_eq!(pad("", 2), "  ");
    }
}
