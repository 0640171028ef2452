//! Hello world: the smallest possible program.
//!
//! Run with: `cargo run --example hello_world`

mod common;

use pulse::{quit, Cmd, Model, Msg, Program};

struct Hello;

impl Model for Hello {
    fn update(self, msg: Option<Msg>) -> (Self, Option<Cmd>) {
        match msg {
            Some(Msg::Key { rune: 'q' }) => (self, Some(quit())),
            _ => (self, None),
        }
    }

    fn view(&self) -> String {
        "Hello, Pulse!\nPress 'q' to quit.\n".to_string()
    }
}

fn main() {
    common::init_logging();

    if let Err(err) = Program::new(Hello).run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
