use std::time::Duration;

use clap::Parser;
use raylib::prelude::*;

use digitshow::constants::*;
use digitshow::fetch::{FetchResult, FetchTask, FrameSource, HttpSource, parse_digit};
use digitshow::message::MessageBox;
use digitshow::playback::{Playback, TriggerSignal};
use digitshow::texture::load_frame_texture;

/// Digit slideshow - fetches generated digit images and plays them
/// back with a crossfade.
#[derive(Parser, Debug)]
#[command(name = "digitshow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the primary (remote) generation endpoint
    #[arg(long, default_value = "https://digit2image-backend.onrender.com")]
    primary_url: String,

    /// Base URL of the secondary (local fallback) generation endpoint
    #[arg(long, default_value = "http://localhost:8080")]
    secondary_url: String,

    /// Draw playback state on top of the canvas
    #[arg(short, long)]
    verbose: bool,
}

fn sources(cli: &Cli) -> Vec<Box<dyn FrameSource>> {
    vec![
        Box::new(HttpSource::new("remote", &cli.primary_url)),
        Box::new(HttpSource::new("local", &cli.secondary_url)),
    ]
}

fn main() {
    let cli = Cli::parse();

    let (mut rl, thread) = raylib::init()
        .size(CANVAS_SIZE, CANVAS_SIZE + PANEL_HEIGHT)
        .title("Digit Slideshow")
        .vsync()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- UI Layout ---
    let input_rect = Rectangle::new(12.0, CANVAS_SIZE as f32 + 12.0, 92.0, 30.0);
    let button_rect = Rectangle::new(116.0, CANVAS_SIZE as f32 + 12.0, 152.0, 30.0);

    // --- Application State ---
    let mut playback: Playback<Texture2D> = Playback::new();
    let mut message = MessageBox::new(Duration::from_millis(MESSAGE_DURATION_MS));
    let mut input = String::new();
    let mut pending: Option<FetchTask> = None;
    let mut trigger_enabled = true;

    // --- Main Loop ---
    while !rl.window_should_close() {
        // 1. Text input for the digit field
        while let Some(c) = rl.get_char_pressed() {
            if c.is_ascii_graphic() && input.len() < 8 {
                input.push(c);
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_BACKSPACE) {
            input.pop();
        }

        // 2. Trigger: button click or ENTER, ignored while disabled
        let clicked = rl.is_key_pressed(KeyboardKey::KEY_ENTER)
            || (rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT)
                && button_rect.check_collision_point_rec(rl.get_mouse_position()));
        if clicked && trigger_enabled {
            match parse_digit(&input) {
                Some(digit) => {
                    trigger_enabled = false;
                    pending = Some(FetchTask::spawn(sources(&cli), digit));
                }
                None => {
                    message.show("Invalid input. Please enter a digit between 0 and 9.");
                }
            }
        }

        // 3. Drain a finished fetch; the trigger comes back in every
        //    terminal case
        if let Some(result) = pending.as_ref().and_then(|task| task.poll()) {
            match result {
                FetchResult::Frames(frames) => {
                    let mut textures = Vec::with_capacity(frames.len());
                    for frame in &frames {
                        match load_frame_texture(&mut rl, &thread, frame) {
                            Ok(texture) => textures.push(texture),
                            Err(e) => eprintln!("Error creating frame texture: {}", e),
                        }
                    }
                    playback.extend(textures);
                }
                FetchResult::Failed(e) => {
                    eprintln!("Fetch failed: {:#}", e);
                    message.show("Failed to fetch images from both servers.");
                }
                FetchResult::Cancelled => {}
            }
            pending = None;
            trigger_enabled = true;
        }

        // 4. Advance the animation by one tick
        let (plan, signal) = playback.tick();
        match signal {
            TriggerSignal::Disable => trigger_enabled = false,
            TriggerSignal::Enable => {
                if pending.is_none() {
                    trigger_enabled = true;
                }
            }
            TriggerSignal::None => {}
        }

        message.update();

        // --- Render ---
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);

        let dest = Rectangle::new(0.0, 0.0, CANVAS_SIZE as f32, CANVAS_SIZE as f32);
        for (index, alpha) in [plan.previous, plan.current].into_iter().flatten() {
            let texture = playback.frame(index);
            d.draw_texture_pro(
                texture,
                Rectangle::new(0.0, 0.0, texture.width() as f32, texture.height() as f32),
                dest,
                Vector2::zero(),
                0.0,
                Color::new(255, 255, 255, alpha),
            );
        }

        // Control panel
        d.draw_rectangle(0, CANVAS_SIZE, CANVAS_SIZE, PANEL_HEIGHT, Color::new(28, 28, 32, 255));

        d.draw_rectangle_rec(input_rect, Color::new(16, 16, 18, 255));
        d.draw_rectangle_lines_ex(input_rect, 1.0, Color::LIGHTGRAY);
        d.draw_text(&input, input_rect.x as i32 + 8, input_rect.y as i32 + 6, 20, Color::RAYWHITE);

        let button_color = if trigger_enabled { Color::DARKBLUE } else { Color::DARKGRAY };
        let label_color = if trigger_enabled { Color::RAYWHITE } else { Color::GRAY };
        d.draw_rectangle_rec(button_rect, button_color);
        let label_width = d.measure_text("Generate", 20);
        d.draw_text(
            "Generate",
            button_rect.x as i32 + (button_rect.width as i32 - label_width) / 2,
            button_rect.y as i32 + 6,
            20,
            label_color,
        );

        if let Some(text) = message.visible_text() {
            d.draw_text(text, 12, CANVAS_SIZE + 54, 10, Color::ORANGE);
        }

        if cli.verbose {
            let status = format!(
                "phase: {:?}  index: {:?}/{}",
                playback.phase(),
                playback.current_index(),
                playback.len()
            );
            d.draw_text(&status, 10, 10, 10, Color::LIME);
            if let Some(task) = &pending {
                d.draw_text(&format!("fetching digit {}...", task.digit()), 10, 24, 10, Color::LIME);
            }
        }
    }

    // An in-flight fetch runs to completion on its own; just tell it
    // not to start another request.
    if let Some(task) = &pending {
        task.cancel();
    }
}
