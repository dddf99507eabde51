use ratatui::{
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::canvas::{Canvas, Circle},
    Frame,
};

use crate::domain::{Background, Blob};

/// Rings per blob; more rings read as a softer, filled disc
const RINGS: u32 = 3;

pub fn render_background_pane(f: &mut Frame, background: &Background, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let height = background.height;
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, background.width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for blob in &background.blobs {
                for circle in blob_rings(blob, height) {
                    ctx.draw(&circle);
                }
            }
        });

    f.render_widget(canvas, area);
}

/// Concentric rings for one blob. Canvas y grows upwards, blob y grows downwards.
fn blob_rings(blob: &Blob, height: f64) -> Vec<Circle> {
    let (r, g, b) = blob.rgb();
    (0..RINGS)
        .map(|i| Circle {
            x: blob.x,
            y: height - blob.y,
            radius: blob.r * (RINGS - i) as f64 / RINGS as f64,
            color: Color::Rgb(r, g, b),
        })
        .collect()
}
