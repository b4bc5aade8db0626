//! Painter-based chart rendering
//!
//! Charts are drawn directly with the egui painter, no plotting dependency.
//! The trend chart plots rows-per-day as a marked polyline; bar charts are
//! horizontal count rows.

use crate::app::charts::{BarChart, TrendChart};
use crate::theme;
use eframe::egui;

const AXIS_GUTTER: f32 = 34.0;
const LABEL_HEIGHT: f32 = 16.0;

/// Rows-per-day line chart with start/end date labels and a max-count rule.
pub fn trend_chart(ui: &mut egui::Ui, chart: &TrendChart) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(format!("Trend over time ({})", chart.column))
                .size(12.0)
                .color(theme::TEXT_MUTED),
        )
        .selectable(false),
    );

    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), theme::CHART_HEIGHT),
        egui::Sense::hover(),
    );
    let painter = ui.painter();

    let plot = egui::Rect::from_min_max(
        egui::pos2(rect.left() + AXIS_GUTTER, rect.top() + 4.0),
        egui::pos2(rect.right() - 8.0, rect.bottom() - LABEL_HEIGHT),
    );

    let max_count = chart.points.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1);
    let first_day = chart.points.first().map(|(d, _)| *d).unwrap_or_default();
    let last_day = chart.points.last().map(|(d, _)| *d).unwrap_or_default();
    let day_span = (last_day - first_day).num_days().max(1) as f32;

    // Horizontal grid: zero line, midline, top line
    for frac in [0.0_f32, 0.5, 1.0] {
        let y = plot.bottom() - frac * plot.height();
        painter.line_segment(
            [egui::pos2(plot.left(), y), egui::pos2(plot.right(), y)],
            egui::Stroke::new(1.0, theme::CHART_GRID),
        );
    }
    painter.text(
        egui::pos2(plot.left() - 6.0, plot.top()),
        egui::Align2::RIGHT_CENTER,
        max_count.to_string(),
        egui::FontId::proportional(10.0),
        theme::TEXT_DIM,
    );
    painter.text(
        egui::pos2(plot.left() - 6.0, plot.bottom()),
        egui::Align2::RIGHT_CENTER,
        "0",
        egui::FontId::proportional(10.0),
        theme::TEXT_DIM,
    );

    // Polyline with per-day markers
    let positions: Vec<egui::Pos2> = chart
        .points
        .iter()
        .map(|(day, count)| {
            let x_frac = (*day - first_day).num_days() as f32 / day_span;
            let y_frac = *count as f32 / max_count as f32;
            egui::pos2(
                plot.left() + x_frac * plot.width(),
                plot.bottom() - y_frac * plot.height(),
            )
        })
        .collect();

    for pair in positions.windows(2) {
        painter.line_segment([pair[0], pair[1]], egui::Stroke::new(2.0, theme::CHART_LINE));
    }
    for pos in &positions {
        painter.circle_filled(*pos, 3.0, theme::CHART_LINE);
    }

    // Date labels at both ends
    painter.text(
        egui::pos2(plot.left(), rect.bottom() - 2.0),
        egui::Align2::LEFT_BOTTOM,
        first_day.format("%Y-%m-%d").to_string(),
        egui::FontId::proportional(10.0),
        theme::TEXT_DIM,
    );
    painter.text(
        egui::pos2(plot.right(), rect.bottom() - 2.0),
        egui::Align2::RIGHT_BOTTOM,
        last_day.format("%Y-%m-%d").to_string(),
        egui::FontId::proportional(10.0),
        theme::TEXT_DIM,
    );
}

/// Horizontal value-count bars, most frequent on top.
pub fn bar_chart(ui: &mut egui::Ui, chart: &BarChart) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(format!("Distribution: {}", chart.column))
                .size(12.0)
                .color(theme::TEXT_MUTED),
        )
        .selectable(false),
    );

    let row_height = 20.0;
    let label_width = 120.0;
    let count_width = 36.0;
    let max_count = chart.bars.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1);

    for (value, count) in &chart.bars {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), row_height),
            egui::Sense::hover(),
        );
        let painter = ui.painter();

        painter.text(
            egui::pos2(rect.left(), rect.center().y),
            egui::Align2::LEFT_CENTER,
            truncate_label(value, 18),
            egui::FontId::proportional(11.0),
            theme::TEXT_SECONDARY,
        );

        let track_left = rect.left() + label_width;
        let track_width = (rect.width() - label_width - count_width).max(10.0);
        let bar_width = (*count as f32 / max_count as f32) * track_width;
        let bar_rect = egui::Rect::from_min_size(
            egui::pos2(track_left, rect.top() + 3.0),
            egui::vec2(bar_width.max(2.0), row_height - 6.0),
        );
        painter.rect_filled(bar_rect, 2.0, theme::CHART_BAR);

        painter.text(
            egui::pos2(bar_rect.right() + 6.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            count.to_string(),
            egui::FontId::proportional(11.0),
            theme::TEXT_DIM,
        );
    }
}

fn truncate_label(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_truncate_with_ellipsis() {
        assert_eq!(truncate_label("short", 18), "short");
        let long = "a very long categorical value indeed";
        let out = truncate_label(long, 18);
        assert!(out.ends_with('…'));
        assert_eq!(out.chars().count(), 18);
    }
}
