//! Animation: a looping text animation driven by tick commands.
//!
//! Run with: `cargo run --example animation [frames-file]`

mod common;

use pulse::widget::load_frames;
use pulse::{quit, Animation, Cmd, Model, Msg, Program};

const DEFAULT_FRAMES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/assets/heart.txt");

struct Heart {
    animation: Animation,
}

impl Model for Heart {
    fn update(self, msg: Option<Msg>) -> (Self, Option<Cmd>) {
        match msg {
            Some(Msg::Key { rune: 'q' }) => (self, Some(quit())),
            // Kick off the tick chain before the first frame.
            None => {
                let cmd = self.animation.init();
                (self, Some(cmd))
            }
            Some(msg) => {
                let (animation, cmd) = self.animation.update(&msg);
                (Self { animation }, cmd)
            }
        }
    }

    fn view(&self) -> String {
        format!("\n{}\n\nAnimated heart! Press 'q' to quit.\n", self.animation.view())
    }
}

fn main() {
    common::init_logging();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_FRAMES.to_string());
    let frames = match load_frames(&path) {
        Ok(frames) => frames,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let model = Heart {
        animation: Animation::new(frames),
    };
    if let Err(err) = Program::new(model).run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
