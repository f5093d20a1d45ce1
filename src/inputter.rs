//! Multi-field line editor used for the filter form and the download dialog.
//! Keys edit the active field; Tab/Down and Shift-Tab/Up switch fields, Enter
//! finishes the form, Esc cancels it.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use tracing::trace;

pub struct Field {
    pub label: &'static str,
    pub value: String,
    cursor: usize,
}

pub struct Form {
    pub title: &'static str,
    fields: Vec<Field>,
    active: usize,
    finished: bool,
    canceled: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FormResult {
    pub finished: bool,
    pub canceled: bool,
}

/// Snapshot of the form for rendering.
#[derive(Debug, Default, Clone)]
pub struct FormView {
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub active: usize,
    pub cursor: usize,
}

impl Form {
    pub fn new(title: &'static str, fields: &[(&'static str, &str)]) -> Self {
        Form {
            title,
            fields: fields
                .iter()
                .map(|(label, prefill)| Field {
                    label,
                    value: prefill.to_string(),
                    cursor: prefill.chars().count(),
                })
                .collect(),
            active: 0,
            finished: false,
            canceled: false,
        }
    }

    /// Filter controls: primary column, comma separated operation columns,
    /// and/or combinator, null check mode and the 1-based row range.
    pub fn filter_form() -> Self {
        Form::new(
            "Filter",
            &[
                ("primary", ""),
                ("columns", ""),
                ("type", "and"),
                ("check", "null"),
                ("from", ""),
                ("to", ""),
            ],
        )
    }

    pub fn download_form() -> Self {
        Form::new("Download", &[("filename", ""), ("format", "xlsx")])
    }

    pub fn read(&mut self, key: KeyEvent) -> FormResult {
        match key.code {
            KeyCode::Enter => self.finished = true,
            KeyCode::Esc => {
                self.canceled = true;
                self.finished = true;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.active = (self.active + 1) % self.fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.active = (self.active + self.fields.len() - 1) % self.fields.len();
            }
            KeyCode::Left => {
                let field = &mut self.fields[self.active];
                field.cursor = field.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                let field = &mut self.fields[self.active];
                if field.cursor < field.value.chars().count() {
                    field.cursor += 1;
                }
            }
            KeyCode::Backspace => self.backspace(),
            code => {
                if let Some(chr) = code.as_char() {
                    let field = &mut self.fields[self.active];
                    let pos = Self::byte_pos(&field.value, field.cursor);
                    field.value.insert(pos, chr);
                    field.cursor += 1;
                }
            }
        }
        trace!(
            "Form \"{}\": key {:?}, active field {}",
            self.title, key.code, self.active
        );
        FormResult {
            finished: self.finished,
            canceled: self.canceled,
        }
    }

    fn backspace(&mut self) {
        let field = &mut self.fields[self.active];
        if field.cursor > 0 {
            let pos = Self::byte_pos(&field.value, field.cursor - 1);
            field.value.remove(pos);
            field.cursor -= 1;
        }
    }

    // Map a char position to a byte index for String edits.
    fn byte_pos(value: &str, cursor: usize) -> usize {
        value
            .char_indices()
            .nth(cursor)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(value.len())
    }

    pub fn values(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.value.clone()).collect()
    }

    pub fn view(&self) -> FormView {
        FormView {
            title: self.title.to_string(),
            fields: self
                .fields
                .iter()
                .map(|f| (f.label.to_string(), f.value.clone()))
                .collect(),
            active: self.active,
            cursor: self.fields[self.active].cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyCode;

    fn type_str(form: &mut Form, s: &str) {
        for chr in s.chars() {
            form.read(KeyCode::Char(chr).into());
        }
    }

    #[test]
    fn typing_fills_the_active_field() {
        let mut form = Form::filter_form();
        type_str(&mut form, "Name");
        form.read(KeyCode::Tab.into());
        type_str(&mut form, "B, C");
        let values = form.values();
        assert_eq!(values[0], "Name");
        assert_eq!(values[1], "B, C");
        assert_eq!(values[2], "and");
    }

    #[test]
    fn enter_finishes_and_esc_cancels() {
        let mut form = Form::download_form();
        let result = form.read(KeyCode::Enter.into());
        assert!(result.finished && !result.canceled);

        let mut form = Form::download_form();
        let result = form.read(KeyCode::Esc.into());
        assert!(result.finished && result.canceled);
    }

    #[test]
    fn backspace_and_cursor_edit_mid_field() {
        let mut form = Form::download_form();
        type_str(&mut form, "repor");
        form.read(KeyCode::Left.into());
        form.read(KeyCode::Backspace.into());
        // "repr" with the cursor before the final 'r'
        type_str(&mut form, "o");
        assert_eq!(form.values()[0], "repor");
    }

    #[test]
    fn field_cycling_wraps() {
        let mut form = Form::download_form();
        form.read(KeyCode::Tab.into());
        assert_eq!(form.view().active, 1);
        form.read(KeyCode::Tab.into());
        assert_eq!(form.view().active, 0);
        form.read(KeyCode::BackTab.into());
        assert_eq!(form.view().active, 1);
    }

    #[test]
    fn prefilled_fields_edit_at_end() {
        let mut form = Form::filter_form();
        // jump to the "type" field and append
        form.read(KeyCode::Tab.into());
        form.read(KeyCode::Tab.into());
        type_str(&mut form, "x");
        assert_eq!(form.values()[2], "andx");
    }
}
