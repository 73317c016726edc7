//! Skyflap entry point
//!
//! The browser build is driven from JS through the library's `web::WebGame`
//! export; this binary is a native headless demo that plays one run with an
//! autopilot.
//!
//! Usage: `skyflap [easy|normal|hard|extreme] [player name]`
//! Data lives under `$SKYFLAP_DATA` (default: a temp directory).

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use skyflap::persistence::FileStore;
    use skyflap::renderer::{FrameSnapshot, Renderer, display_list};
    use skyflap::sim::{GamePhase, ObstacleSide, Viewport};
    use skyflap::{
        Difficulty, Game, InputEvent, Leaderboard, LocalLeaderboard, NoticeKind, SettingChange,
        StoreError,
    };

    /// Frames simulated before the demo gives up on a run
    const MAX_FRAMES: u64 = 20_000;
    /// 60 Hz
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Flap when this far below the gap center
    const AUTOPILOT_SLACK: f32 = 15.0;

    /// Logs a summary every second of play instead of drawing
    #[derive(Default)]
    struct LogRenderer {
        frames: u64,
    }

    impl Renderer for LogRenderer {
        fn render(&mut self, frame: &FrameSnapshot<'_>) {
            self.frames += 1;
            if self.frames % 60 == 0 {
                log::debug!(
                    "frame {}: score {}, {} obstacles, {} shapes",
                    self.frames,
                    frame.score,
                    frame.obstacles.len(),
                    display_list(frame).len()
                );
            }
        }
    }

    fn data_dir() -> PathBuf {
        std::env::var_os("SKYFLAP_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("skyflap"))
    }

    /// Flap when the flier sinks below the center of the next gap
    fn autopilot(snapshot: &FrameSnapshot<'_>) -> bool {
        let Some(flier) = snapshot.flier else {
            return false;
        };
        let upcoming = snapshot
            .obstacles
            .iter()
            .filter(|o| o.right() > flier.pos.x - flier.radius);
        let mut gap_top = None;
        let mut gap_bottom = None;
        for o in upcoming {
            match o.side {
                ObstacleSide::Upper if gap_top.is_none() => gap_top = Some(o.bottom()),
                ObstacleSide::Lower if gap_bottom.is_none() => gap_bottom = Some(o.pos.y),
                _ => {}
            }
        }
        let target = match (gap_top, gap_bottom) {
            (Some(top), Some(bottom)) => (top + bottom) / 2.0,
            _ => snapshot.viewport.height / 2.0,
        };
        flier.vel >= 0.0 && flier.pos.y > target + AUTOPILOT_SLACK
    }

    pub fn run() -> Result<(), StoreError> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let mut args = std::env::args().skip(1);
        let difficulty = args.next().map(|s| Difficulty::from_name_or_default(&s));
        let player = args.next().unwrap_or_default();

        let dir = data_dir();
        let store = FileStore::open(dir.join("settings.json"))?;
        let leaderboard = LocalLeaderboard::new(FileStore::open(dir.join("highscores.json"))?);
        log::info!("Skyflap (native) starting, data in {}", dir.display());

        let mut game = Game::new(store, leaderboard, Viewport::new(480.0, 800.0));
        if let Err(e) = game.finish_loading() {
            log::warn!("{}", e);
        }
        if let Some(difficulty) = difficulty {
            game.handle(InputEvent::SettingChanged(SettingChange::Difficulty(difficulty)));
        }
        game.handle(InputEvent::Navigate(GamePhase::Playing));

        let mut renderer = LogRenderer::default();
        let mut now = 0.0;
        while game.wants_frame() {
            if autopilot(&game.snapshot()) {
                game.handle(InputEvent::Flap);
            }
            game.frame(now, &mut renderer);
            now += FRAME_MS;

            if game.state().frame_count >= MAX_FRAMES {
                log::info!("Autopilot survived {} frames, stopping", MAX_FRAMES);
                game.handle(InputEvent::Navigate(GamePhase::Menu));
            }
        }

        if let Some(run) = game.last_run().copied() {
            game.handle(InputEvent::SubmitScore(player));
            println!(
                "Score: {}  Best: {}{}",
                run.final_score,
                run.best_score,
                if run.new_best { "  (new best!)" } else { "" }
            );
            if let Ok(scores) = game.leaderboard().list_scores() {
                for (rank, entry) in scores.iter().enumerate() {
                    println!("{:>2}. {:<16} {}", rank + 1, entry.player, entry.score);
                }
            }
        }

        for notice in game.take_notices() {
            match notice.kind {
                NoticeKind::Info => log::info!("{}", notice.message),
                NoticeKind::Error => log::warn!("{}", notice.message),
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        eprintln!("skyflap: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
}
