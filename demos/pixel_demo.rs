//! Pixel demo: a bordered canvas drawn with pixels and composited layers.
//!
//! Run with: `cargo run --example pixel_demo`. Space toggles the overlay
//! layer, any other key quits.

mod common;

use pulse::{quit, Cmd, Color, Compositor, Layer, Model, Msg, Pixel, PixelBuffer, Program};

struct Canvas {
    width: u16,
    height: u16,
    overlay: bool,
}

impl Canvas {
    fn background(&self) -> PixelBuffer {
        let (w, h) = (i32::from(self.width), i32::from(self.height));
        let mut buffer = PixelBuffer::new(self.width, self.height);
        let border = Pixel::new('█', Color::White, Color::Black);

        buffer.draw_line(0, 0, w - 1, 0, border);
        buffer.draw_line(0, h - 1, w - 1, h - 1, border);
        buffer.draw_line(0, 0, 0, h - 1, border);
        buffer.draw_line(w - 1, 0, w - 1, h - 1, border);
        buffer.draw_line(1, 1, w - 2, h - 2, Pixel::new('\\', Color::Green, Color::Black));
        buffer
    }

    /// The background with a filled rectangle in the center.
    fn with_box(background: &PixelBuffer) -> PixelBuffer {
        let cx = i32::from(background.width()) / 2;
        let cy = i32::from(background.height()) / 2;
        let mut buffer = background.clone();
        buffer.fill_rect(cx - 5, cy - 2, 10, 5, Pixel::new('█', Color::Red, Color::Blue));
        buffer
    }
}

impl Model for Canvas {
    fn update(self, msg: Option<Msg>) -> (Self, Option<Cmd>) {
        match msg {
            Some(Msg::Key { rune: ' ' }) => (
                Self {
                    overlay: !self.overlay,
                    ..self
                },
                None,
            ),
            Some(Msg::Key { .. }) => (self, Some(quit())),
            Some(Msg::Size { width, height }) => (
                Self {
                    width,
                    height,
                    ..self
                },
                None,
            ),
            _ => (self, None),
        }
    }

    fn view(&self) -> String {
        "This is only shown in text mode".to_string()
    }

    fn pixel_view(&self) -> Option<PixelBuffer> {
        let background = self.background();
        let boxed = Self::with_box(&background);
        // Layers are all or nothing: above 0.5 the whole layer is copied.
        let opacity = if self.overlay { 1.0 } else { 0.3 };

        let mut compositor = Compositor::new();
        compositor.add_layer(Layer::new(&background, 0, 1.0));
        compositor.add_layer(Layer::new(&boxed, 1, opacity));
        compositor.composite()
    }
}

fn main() {
    common::init_logging();

    let canvas = Canvas {
        width: 80,
        height: 24,
        overlay: true,
    };
    if let Err(err) = Program::new(canvas).with_base().run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
