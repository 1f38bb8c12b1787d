/// Entry point and frame loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use sim::event::GameEvent;
use sim::session::Session;
use sim::world::Phase;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    // Logs go to stderr; redirect it (`2>run.log`) to keep the screen clean.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = GameConfig::load();

    // Devices first: their warnings should land before the alternate screen.
    let sound = SoundEngine::new();
    let mut pad = GamepadState::new();
    pad.load_button_config(&config.gamepad);
    if pad.connected {
        log::info!("gamepad detected");
    }

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let mut session = Session::new(&config);
    let result = game_loop(&mut session, &mut renderer, &mut pad, sound.as_ref());

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Dash Runner!");
    println!("Final Score: {}", session.score());
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    pad: &mut GamepadState,
    sound: Option<&SoundEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_frame = Instant::now();

    loop {
        kb.drain_events();
        pad.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || pad.quit_pressed() {
            log::info!("quit at score {}", session.score());
            break;
        }
        if kb.resized() {
            renderer.invalidate();
        }

        let mut events = Vec::new();
        if kb.any_pressed(KEYS_PAUSE) || pad.pause_pressed() {
            events.extend(session.toggle_pause());
        }
        if kb.any_pressed(KEYS_JUMP) || pad.jump_pressed() {
            events.extend(session.request_jump());
        }
        if session.phase() == Phase::GameOver && (kb.any_pressed(KEYS_RESTART) || pad.restart_pressed()) {
            events.extend(session.reset());
        }

        let now = Instant::now();
        events.extend(session.advance(now - last_frame));
        last_frame = now;

        process_events(sound, &events);

        renderer.render(&session.snapshot())?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for event in events {
        log::debug!("{event:?}");
        let sfx = match sound {
            Some(s) => s,
            None => continue,
        };
        match event {
            GameEvent::Jumped => sfx.play_jump(),
            GameEvent::Landed => sfx.play_land(),
            GameEvent::Collision { .. } => sfx.play_game_over(),
            GameEvent::Reset => sfx.play_restart(),
            _ => {}
        }
    }
}

// ── Key Constants ──

const KEYS_JUMP: &[KeyCode] = &[
    KeyCode::Char(' '),
    KeyCode::Up,
    KeyCode::Char('w'),
    KeyCode::Char('W'),
    KeyCode::Char('k'),
    KeyCode::Char('K'),
];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::F(1)];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];
