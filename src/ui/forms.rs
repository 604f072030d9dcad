use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::commands::Action;

/// The three data-entry panels on the main screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormKind {
    Student,
    Book,
    Issue,
}

impl FormKind {
    pub(crate) const ALL: [FormKind; 3] = [FormKind::Student, FormKind::Book, FormKind::Issue];

    pub(crate) fn index(self) -> usize {
        match self {
            FormKind::Student => 0,
            FormKind::Book => 1,
            FormKind::Issue => 2,
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            FormKind::Student => "Add New Student",
            FormKind::Book => "Add New Book",
            FormKind::Issue => "Issue Book",
        }
    }

    pub(crate) fn labels(self) -> &'static [&'static str] {
        match self {
            FormKind::Student => &["Student ID", "Name", "Course"],
            FormKind::Book => &["Book ID", "Title", "Author"],
            FormKind::Issue => &["Student ID", "Book ID"],
        }
    }

    /// Whether the field at `idx` holds an integer id.
    pub(crate) fn is_numeric(self, idx: usize) -> bool {
        match self {
            FormKind::Student | FormKind::Book => idx == 0,
            FormKind::Issue => true,
        }
    }

    /// Action fired when Enter is pressed inside this panel.
    pub(crate) fn submit_action(self) -> Action {
        match self {
            FormKind::Student => Action::AddStudent,
            FormKind::Book => Action::AddBook,
            FormKind::Issue => Action::IssueBook,
        }
    }

    pub(crate) fn field_count(self) -> usize {
        self.labels().len()
    }
}

/// Unsaved text for one panel. Nothing here touches the database; the record
/// writer validates the values when the panel is submitted.
#[derive(Clone, Debug)]
pub(crate) struct EntryForm {
    kind: FormKind,
    values: Vec<String>,
}

impl EntryForm {
    pub(crate) fn new(kind: FormKind) -> Self {
        Self {
            kind,
            values: vec![String::new(); kind.field_count()],
        }
    }

    pub(crate) fn kind(&self) -> FormKind {
        self.kind
    }

    pub(crate) fn values(&self) -> &[String] {
        &self.values
    }

    pub(crate) fn value(&self, idx: usize) -> &str {
        self.values.get(idx).map(String::as_str).unwrap_or_default()
    }

    /// Append a character to field `idx`. Id fields only take digits plus a
    /// leading minus sign.
    pub(crate) fn push_char(&mut self, idx: usize, ch: char) -> bool {
        let numeric = self.kind.is_numeric(idx);
        let Some(value) = self.values.get_mut(idx) else {
            return false;
        };

        let accepted = if numeric {
            ch.is_ascii_digit() || (ch == '-' && value.is_empty())
        } else {
            !ch.is_control()
        };
        if accepted {
            value.push(ch);
        }
        accepted
    }

    pub(crate) fn backspace(&mut self, idx: usize) {
        if let Some(value) = self.values.get_mut(idx) {
            value.pop();
        }
    }

    /// Wipe every field after a successful submit.
    pub(crate) fn clear(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
    }

    /// Render a single field line for the panel.
    pub(crate) fn build_line(&self, idx: usize, is_active: bool) -> Line<'static> {
        let label = self.kind.labels().get(idx).copied().unwrap_or_default();
        let value = self.value(idx);

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(field_prefix(label)),
            Span::styled(display, style),
        ])
    }

    /// Character count of field `idx`, used to place the cursor.
    pub(crate) fn value_len(&self, idx: usize) -> usize {
        self.value(idx).chars().count()
    }
}

/// Labels are padded to a common width so the inputs line up.
pub(crate) fn field_prefix(label: &str) -> String {
    format!("{:<12}", format!("{label}:"))
}
