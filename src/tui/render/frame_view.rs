use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::video::RgbImage;

/// Upper half block: the cell's foreground paints the top pixel row and
/// its background the bottom one
const HALF_BLOCK: &str = "\u{2580}";

/// Where an image lands inside a cell area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u16,
    pub y: u16,
    /// Size in cells; each cell row holds two pixel rows
    pub cols: u16,
    pub rows: u16,
}

/// Largest aspect-preserving placement of a `width`x`height` image in
/// `area`, centered.
pub fn fit_image(width: u32, height: u32, area: Rect) -> Option<Placement> {
    if width == 0 || height == 0 || area.width == 0 || area.height == 0 {
        return None;
    }
    let avail_w = area.width as f64;
    let avail_h = area.height as f64 * 2.0;
    let scale = (avail_w / width as f64).min(avail_h / height as f64);
    let cols = ((width as f64 * scale).floor() as u16).clamp(1, area.width);
    let pixel_rows = ((height as f64 * scale).floor() as u16).max(1);
    let rows = pixel_rows.div_ceil(2).min(area.height);
    Some(Placement {
        x: area.x + (area.width - cols) / 2,
        y: area.y + (area.height - rows) / 2,
        cols,
        rows,
    })
}

/// Nearest-neighbour source pixel for cell column `col`, pixel row `prow`
fn sample(image: &RgbImage, place: &Placement, col: u16, prow: u16) -> Color {
    let x = (col as u64 * image.width as u64 / place.cols as u64) as u32;
    let y = (prow as u64 * image.height as u64 / (place.rows as u64 * 2)) as u32;
    let (r, g, b) = image.pixel(x.min(image.width - 1), y.min(image.height - 1));
    Color::Rgb(r, g, b)
}

/// Draw the current frame, or a placeholder when none could be decoded.
pub fn render_frame_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let Some(image) = app.image.as_ref() else {
        let text = format!("frame {} unavailable", app.cursor());
        let y = area.y + area.height / 2;
        let line_area = Rect::new(area.x, y, area.width, area.height.min(1));
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(app.theme.dim).bg(bg)),
            line_area,
        );
        return;
    };
    let Some(place) = fit_image(image.width, image.height, area) else {
        return;
    };

    let buf = frame.buffer_mut();
    for row in 0..place.rows {
        for col in 0..place.cols {
            let top = sample(image, &place, col, row * 2);
            let bottom = sample(image, &place, col, row * 2 + 1);
            if let Some(cell) = buf.cell_mut((place.x + col, place.y + row)) {
                cell.set_symbol(HALF_BLOCK).set_fg(top).set_bg(bottom);
            }
        }
    }
}
