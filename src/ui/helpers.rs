use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// How far each stacked table window is shifted from the one below it.
const CASCADE_STEP_X: u16 = 3;
const CASCADE_STEP_Y: u16 = 1;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Place the `depth`-th table window. Windows start near the top-left corner
/// and step down and right, clamped so they never leave `area`.
pub(crate) fn cascade_rect(area: Rect, depth: usize) -> Rect {
    let width = (area.width * 3 / 4).max(area.width.min(20));
    let height = (area.height * 2 / 3).max(area.height.min(6));

    let max_dx = area.width.saturating_sub(width);
    let max_dy = area.height.saturating_sub(height);
    let depth = u16::try_from(depth).unwrap_or(u16::MAX);

    let dx = (2 + depth.saturating_mul(CASCADE_STEP_X)).min(max_dx);
    let dy = (1 + depth.saturating_mul(CASCADE_STEP_Y)).min(max_dy);

    Rect {
        x: area.x + dx,
        y: area.y + dy,
        width,
        height,
    }
}
