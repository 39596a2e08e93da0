use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

/// Stacked single-column layout
pub struct AppLayout {
    pub input_area: Rect,
    pub result_area: Rect,
    pub notes_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// - Input box: 3 rows
    /// - Translation box: 3 rows
    /// - Notes pane: the rest
    /// - Status bar: bottom row
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            input_area: chunks[0],
            result_area: chunks[1],
            notes_area: chunks[2],
            status_area: chunks[3],
        }
    }
}

/// Centered popup of `percent_x` width and fixed `height`, clamped to `area`.
pub fn popup_area(area: Rect, percent_x: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] =
        Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center).areas(row);
    popup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_correctly() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24));

        assert_eq!(layout.input_area.height, 3);
        assert_eq!(layout.result_area.height, 3);
        assert_eq!(layout.result_area.y, 3);
        assert_eq!(layout.notes_area.height, 17);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 23);
        assert_eq!(layout.notes_area.width, 80);
    }

    #[test]
    fn test_popup_is_centered() {
        let popup = popup_area(Rect::new(0, 0, 100, 30), 60, 10);

        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 10);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }

    #[test]
    fn test_popup_clamped_to_small_area() {
        let area = Rect::new(0, 0, 40, 5);
        let popup = popup_area(area, 50, 12);

        assert_eq!(popup.height, 5);
        assert!(area.contains(popup.as_position()));
    }
}
