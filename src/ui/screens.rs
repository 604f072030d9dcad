use crate::models::TableView;

/// One open table window. Every "show" action creates a fresh window holding
/// a snapshot of the table; it is never refreshed afterwards.
pub(crate) struct TableWindow {
    pub(crate) view: TableView,
    /// Sequence number, so two windows of the same table can be told apart.
    pub(crate) number: usize,
    pub(crate) selected: usize,
}

impl TableWindow {
    pub(crate) fn new(view: TableView, number: usize) -> Self {
        Self {
            view,
            number,
            selected: 0,
        }
    }

    pub(crate) fn title(&self) -> String {
        let rows = self.view.len();
        let noun = if rows == 1 { "row" } else { "rows" };
        format!(
            " {} #{} ({rows} {noun}) ",
            self.view.table.title(),
            self.number
        )
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.view.is_empty() {
            return;
        }
        let len = self.view.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.view.len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Table;

    fn window(rows: usize) -> TableWindow {
        let view = TableView {
            table: Table::Books,
            rows: (0..rows)
                .map(|idx| vec![idx.to_string(), "Title".into(), "Author".into()])
                .collect(),
        };
        TableWindow::new(view, 1)
    }

    #[test]
    fn selection_is_clamped() {
        let mut window = window(3);
        window.move_selection(-4);
        assert_eq!(window.selected, 0);
        window.move_selection(10);
        assert_eq!(window.selected, 2);
        window.select_first();
        assert_eq!(window.selected, 0);
        window.select_last();
        assert_eq!(window.selected, 2);
    }

    #[test]
    fn empty_window_keeps_selection_at_zero() {
        let mut window = window(0);
        window.move_selection(5);
        window.select_last();
        assert_eq!(window.selected, 0);
        assert_eq!(window.title(), " Books Table #1 (0 rows) ");
    }

    #[test]
    fn title_uses_singular_for_one_row() {
        assert_eq!(window(1).title(), " Books Table #1 (1 row) ");
    }
}
