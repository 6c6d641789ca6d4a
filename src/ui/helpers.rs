use anyhow::Error;
use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Day-first form the record table shows dates in.
const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

/// Reformat a calendar day as `DD.MM.YYYY` for the table.
pub(crate) fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Distances print without trailing zeros, so merged totals like `7.5` read
/// the same way they were typed.
pub(crate) fn display_distance(distance: f64) -> String {
    let rounded = (distance * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

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

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Context};

    use super::*;

    #[test]
    fn test_display_date_is_day_first() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(display_date(date), "05.03.2024");
    }

    #[test]
    fn test_display_distance_trims_noise() {
        assert_eq!(display_distance(7.5), "7.5");
        assert_eq!(display_distance(3.0), "3");
        assert_eq!(display_distance(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 15);
    }

    #[test]
    fn test_surface_error_prefers_root_cause() {
        let err = Err::<(), _>(anyhow!("root cause"))
            .context("outer")
            .unwrap_err();
        assert_eq!(surface_error(&err), "root cause");
    }
}
