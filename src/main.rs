//! Critter Catch entry point
//!
//! Headless driver: runs a scripted session at 60 Hz against the silent audio
//! backend and logs what happens. Usage: `critter-catch [settings.json]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use critter_catch::audio::SilentBackend;
    use critter_catch::sim::Direction;
    use critter_catch::sim::input::zone_name;
    use critter_catch::{Session, Settings};

    env_logger::init();
    log::info!("Critter Catch (headless) starting...");

    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load_from(&path),
        None => Settings::default(),
    };

    let mut session = Session::new(&settings, SilentBackend);
    session.start();
    let handle = session.handle();

    // Walk a square, pressing a new control every two seconds
    let route = [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Stop,
    ];
    let frame_dt = 1.0 / 60.0;
    let frames = 60 * 2 * route.len() as u32;
    let mut captured = 0usize;

    for frame in 0..frames {
        if frame % 120 == 0 {
            let direction = route[(frame / 120) as usize % route.len()];
            let name = zone_name(direction);
            if let Some(zone) = session.pad().zones.iter().find(|z| z.name == name) {
                handle.pointer_down(zone.rect.center);
            }
        }

        let report = session.frame(frame as f64 * frame_dt);
        for capture in &report.captures {
            captured += 1;
            log::info!(
                "Caught variant {} ({})",
                capture.variant,
                capture.collectible
            );
        }
    }

    let state = session.state();
    let visible = state.collectibles.iter().filter(|c| c.visible).count();
    log::info!(
        "Finished after {} ticks: {} caught, {} critters alive ({} visible)",
        state.time_ticks,
        captured,
        state.collectibles.len(),
        visible
    );
    session.teardown();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
