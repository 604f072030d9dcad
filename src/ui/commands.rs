//! Named user actions and the table that routes them to handlers. Buttons and
//! shortcuts only ever produce an [`Action`]; which code runs for it is decided
//! here.

use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::debug;

use super::app::App;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    AddStudent,
    AddBook,
    IssueBook,
    ShowStudents,
    ShowBooks,
    ShowIssuedBooks,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::AddStudent,
        Action::AddBook,
        Action::IssueBook,
        Action::ShowStudents,
        Action::ShowBooks,
        Action::ShowIssuedBooks,
    ];

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Action::AddStudent => "Add Student",
            Action::AddBook => "Add Book",
            Action::IssueBook => "Issue Book",
            Action::ShowStudents => "Show Students",
            Action::ShowBooks => "Show Books",
            Action::ShowIssuedBooks => "Show Issued Books",
        }
    }
}

pub(crate) type Handler = fn(&mut App) -> Result<()>;

const DISPATCH: [(Action, Handler); 6] = [
    (Action::AddStudent, App::add_student),
    (Action::AddBook, App::add_book),
    (Action::IssueBook, App::issue_book),
    (Action::ShowStudents, App::show_students),
    (Action::ShowBooks, App::show_books),
    (Action::ShowIssuedBooks, App::show_issued_books),
];

/// Look up the handler for `action` and run it.
pub(crate) fn dispatch(app: &mut App, action: Action) -> Result<()> {
    let handler = DISPATCH
        .iter()
        .find(|(name, _)| *name == action)
        .map(|(_, handler)| *handler)
        .ok_or_else(|| anyhow!("no handler registered for {action:?}"))?;
    debug!(action = action.label(), "dispatching action");
    handler(app)
}

/// A global shortcut that works regardless of which field has focus.
pub(crate) struct KeyBinding {
    pub(crate) code: KeyCode,
    pub(crate) modifiers: KeyModifiers,
    pub(crate) hint: &'static str,
    pub(crate) action: Action,
}

pub(crate) const KEY_BINDINGS: [KeyBinding; 3] = [
    KeyBinding {
        code: KeyCode::F(2),
        modifiers: KeyModifiers::NONE,
        hint: "F2",
        action: Action::ShowStudents,
    },
    KeyBinding {
        code: KeyCode::F(3),
        modifiers: KeyModifiers::NONE,
        hint: "F3",
        action: Action::ShowBooks,
    },
    KeyBinding {
        code: KeyCode::F(4),
        modifiers: KeyModifiers::NONE,
        hint: "F4",
        action: Action::ShowIssuedBooks,
    },
];

pub(crate) fn action_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    KEY_BINDINGS
        .iter()
        .find(|binding| binding.code == code && binding.modifiers == modifiers)
        .map(|binding| binding.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_has_a_handler() {
        for action in Action::ALL {
            assert!(
                DISPATCH.iter().any(|(name, _)| *name == action),
                "{action:?} is not routed"
            );
        }
    }

    #[test]
    fn function_keys_open_tables() {
        assert_eq!(
            action_for_key(KeyCode::F(2), KeyModifiers::NONE),
            Some(Action::ShowStudents)
        );
        assert_eq!(
            action_for_key(KeyCode::F(4), KeyModifiers::NONE),
            Some(Action::ShowIssuedBooks)
        );
        assert_eq!(action_for_key(KeyCode::F(3), KeyModifiers::SHIFT), None);
        assert_eq!(action_for_key(KeyCode::Char('s'), KeyModifiers::NONE), None);
    }
}
