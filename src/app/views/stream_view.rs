use crate::app::views::View;
use crate::error::FrameError;
use crate::network::StreamFrame;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use egui::{Color32, ColorImage, TextureHandle, TextureOptions};
use tracing::warn;

/// Shows the latest stream frame. Decodes a payload only when a new frame
/// arrives and keeps the last good texture otherwise.
pub struct StreamView {
    texture: Option<TextureHandle>,
    shown_sequence: Option<u64>,
    shown_at: Option<DateTime<Utc>>,
    decode_error: Option<String>,
}

impl StreamView {
    pub fn new() -> Self {
        Self {
            texture: None,
            shown_sequence: None,
            shown_at: None,
            decode_error: None,
        }
    }

    pub fn update(&mut self, ctx: &egui::Context, frame: Option<&StreamFrame>) {
        let Some(frame) = frame else {
            return;
        };
        if self.shown_sequence == Some(frame.sequence()) {
            return;
        }
        self.shown_sequence = Some(frame.sequence());

        match decode_frame(frame.payload()) {
            Ok(image) => {
                match &mut self.texture {
                    Some(texture) => texture.set(image, TextureOptions::LINEAR),
                    None => {
                        self.texture =
                            Some(ctx.load_texture("stream_frame", image, TextureOptions::LINEAR));
                    }
                }
                self.shown_at = Some(frame.received_at());
                self.decode_error = None;
            }
            Err(e) => {
                warn!("Skipping frame {}: {}", frame.sequence(), e);
                self.decode_error = Some(e.to_string());
            }
        }
    }
}

impl Default for StreamView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for StreamView {
    fn draw(&mut self, ui: &mut egui::Ui) {
        match &self.texture {
            Some(texture) => {
                ui.add(egui::Image::new(texture).shrink_to_fit());
                if let Some(shown_at) = self.shown_at {
                    ui.label(format!("Frame received {}", shown_at.format("%H:%M:%S")));
                }
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.heading("Waiting for stream...");
                });
            }
        }
        if let Some(error) = &self.decode_error {
            ui.colored_label(Color32::RED, error);
        }
    }
}

/// Decodes a base64 image payload, with or without a `data:` url prefix.
pub fn decode_frame(payload: &str) -> Result<ColorImage, FrameError> {
    let payload = payload.trim();
    let encoded = match payload.split_once(";base64,") {
        Some((_, data)) if payload.starts_with("data:") => data,
        _ => payload,
    };
    let bytes = STANDARD.decode(encoded)?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encoded_png(width: u32, height: u32) -> String {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 120, 40, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        STANDARD.encode(bytes)
    }

    #[test]
    fn decodes_plain_base64() {
        let image = decode_frame(&encoded_png(4, 3)).unwrap();
        assert_eq!(image.size, [4, 3]);
        assert_eq!(image.pixels[0], Color32::from_rgb(200, 120, 40));
    }

    #[test]
    fn decodes_data_url() {
        let payload = format!("data:image/png;base64,{}", encoded_png(2, 2));
        assert_eq!(decode_frame(&payload).unwrap().size, [2, 2]);
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(decode_frame("not base64!"), Err(FrameError::Encoding(_))));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let payload = STANDARD.encode(b"definitely not a jpeg");
        assert!(matches!(decode_frame(&payload), Err(FrameError::Image(_))));
    }
}
