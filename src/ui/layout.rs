// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the screen, computed once per frame.
pub struct AppLayout {
    pub input: Rect,
    pub options: Rect,
    pub results: Rect,
    pub summary: Rect,
    pub footer: Rect,
}

/// Splits the frame into the form at the top, results and summary side by
/// side in the middle, and a two-line footer (notice, then key hints).
pub fn create_layout(frame_size: Rect) -> AppLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(frame_size);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(main_chunks[2]);

    AppLayout {
        input: main_chunks[0],
        options: main_chunks[1],
        results: content_chunks[0],
        summary: content_chunks[1],
        footer: main_chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fills_frame() {
        let layout = create_layout(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.input.height, 3);
        assert_eq!(layout.options.y, 3);
        assert_eq!(layout.footer.y, 38);
        assert_eq!(layout.results.width + layout.summary.width, 100);
        assert_eq!(layout.results.height, 34);
    }
}
