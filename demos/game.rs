//! Game: move a player around a board on the alternate screen.
//!
//! Shows size handling, arrow keys and a localized interface.
//!
//! Run with: `cargo run --example game`

mod common;

use pulse::{quit, Cmd, Localizer, Model, Msg, Program};

const CATALOGS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/assets/interface");

struct Game {
    player_x: u16,
    player_y: u16,
    width: u16,
    height: u16,
    score: u32,
    locale: Localizer,
}

impl Game {
    const fn new(locale: Localizer) -> Self {
        Self {
            player_x: 5,
            player_y: 5,
            width: 20,
            height: 10,
            score: 0,
            locale,
        }
    }

    fn step(&mut self, rune: char) {
        let moved = match rune {
            '↑' | 'w' if self.player_y > 0 => {
                self.player_y -= 1;
                true
            }
            '↓' | 's' if self.player_y + 1 < self.height => {
                self.player_y += 1;
                true
            }
            '←' | 'a' if self.player_x > 0 => {
                self.player_x -= 1;
                true
            }
            '→' | 'd' if self.player_x + 1 < self.width => {
                self.player_x += 1;
                true
            }
            _ => false,
        };
        if moved {
            self.score += 1;
        }
    }

    fn next_language(&mut self) {
        let Ok(languages) = self.locale.supported_languages() else {
            return;
        };
        let current = languages
            .iter()
            .position(|lang| lang == self.locale.current_language())
            .unwrap_or(0);
        if let Some(next) = languages.get((current + 1) % languages.len().max(1)) {
            let next = next.clone();
            if let Err(err) = self.locale.set_language(&next) {
                tracing::warn!(%err, "language switch failed");
            }
        }
    }
}

impl Model for Game {
    fn update(mut self, msg: Option<Msg>) -> (Self, Option<Cmd>) {
        match msg {
            Some(Msg::Key { rune: 'q' }) => return (self, Some(quit())),
            Some(Msg::Key { rune: 'l' }) => self.next_language(),
            Some(Msg::Key { rune }) => self.step(rune),
            Some(Msg::Size { width, height }) if width > 2 && height > 5 => {
                // Room for the borders and the text around the board
                self.width = width - 2;
                self.height = height - 6;
                self.player_x = self.player_x.min(self.width - 1);
                self.player_y = self.player_y.min(self.height - 1);
            }
            _ => {}
        }
        (self, None)
    }

    fn view(&self) -> String {
        let lang = self.locale.current_language();
        let mut out = format!(
            "{} | {}\n",
            self.locale.text("game.title", &[]),
            self.locale.text("game.language", &[&lang])
        );
        out.push_str(&self.locale.text("game.score", &[&self.score]));
        out.push_str("\n\n");

        for y in 0..self.height {
            for x in 0..self.width {
                out.push(if (x, y) == (self.player_x, self.player_y) { '@' } else { '.' });
            }
            out.push('\n');
        }

        out.push('\n');
        out.push_str(&self.locale.text("game.help", &[]));
        out
    }
}

fn main() {
    common::init_logging();

    let locale = match Localizer::load(CATALOGS, "en") {
        Ok(locale) => locale,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = Program::new(Game::new(locale)).with_alt_screen().run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
