#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Word Defence.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the crate depends on macroquad without its default `audio`
//! feature.
//!
//! The logical canvas is scaled uniformly to fit the window and centred, so
//! every coordinate handed to the simulation is expressed in canvas units.

mod text;

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use macroquad::{
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    text::{draw_text_ex, load_ttf_font_from_bytes, measure_text, Font, TextParams},
};
use std::{
    collections::VecDeque,
    sync::mpsc,
    time::{Duration, Instant},
};
use tracing::info;
use word_defence_core::{BULLET_RADIUS, MONSTER_RADIUS};
use word_defence_rendering::{
    layout, AnswerButton, BulletPresentation, FrameInput, MonsterPresentation, Presentation,
    RenderingBackend, Scene, TilePresentation, TowerPresentation,
};

use self::text::wrap_label;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    font_bytes: Option<Vec<u8>>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Supplies a TrueType font used for all text, so meanings outside the
    /// built-in font's Latin range render.
    #[must_use]
    pub fn with_font_bytes(mut self, font_bytes: Option<Vec<u8>>) -> Self {
        self.font_bytes = font_bytes;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            font_bytes,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            canvas_size,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: canvas_size.x.round() as i32,
            window_height: canvas_size.y.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (init_sender, init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let font = match font_bytes.as_deref().map(load_font).transpose() {
                Ok(font) => {
                    let _ = init_sender.send(Ok(()));
                    font
                }
                Err(error) => {
                    let _ = init_sender.send(Err(error));
                    return;
                }
            };

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                if KeyboardShortcuts::poll().quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let frame_dt =
                    Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));

                let metrics = SceneMetrics::new(canvas_size, screen, Vec2::ZERO);
                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = gather_frame_input_from_observations(
                    &metrics,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_pressed(MouseButton::Left),
                );

                let simulation_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let simulation = simulation_start.elapsed();

                let render_start = Instant::now();
                let metrics =
                    SceneMetrics::new(canvas_size, screen, scene.shake.offset(canvas_size));
                draw_banner(&metrics, canvas_size);
                draw_tiles(&scene, &metrics);
                draw_towers(&scene.towers, &metrics);
                draw_monsters(&scene.monsters, &metrics);
                draw_bullets(&scene.bullets, &metrics);
                draw_quiz(&scene, &metrics, font);
                draw_hud(&scene, &metrics, font);
                let render = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(metrics) = fps_metrics {
                        info!(
                            fps = format_args!("{:.2}", metrics.per_second),
                            fps_10s = format_args!("{:.2}", metrics.trailing_ten_seconds),
                            sim_ms = metrics.avg_simulation.as_secs_f64() * 1_000.0,
                            render_ms = metrics.avg_render.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

fn load_font(bytes: &[u8]) -> Result<Font> {
    load_ttf_font_from_bytes(bytes)
        .map_err(|error| anyhow!("{error:?}"))
        .context("failed to load TrueType font")
}

/// Uniform canvas-to-screen transform.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    canvas: Vec2,
}

impl SceneMetrics {
    /// Fits the canvas inside the screen, centred, and displaces it by
    /// `shake` canvas units.
    fn new(canvas: Vec2, screen: Vec2, shake: Vec2) -> Self {
        let scale = if canvas.x <= f32::EPSILON || canvas.y <= f32::EPSILON {
            1.0
        } else {
            (screen.x / canvas.x).min(screen.y / canvas.y).max(0.0)
        };
        let offset = (screen - canvas * scale) * 0.5 + shake * scale;

        Self {
            scale,
            offset,
            canvas,
        }
    }

    fn to_screen(&self, world: Vec2) -> Vec2 {
        self.offset + world * self.scale
    }

    fn to_world(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }

        let world = (screen - self.offset) / self.scale;
        let inside =
            world.x >= 0.0 && world.y >= 0.0 && world.x < self.canvas.x && world.y < self.canvas.y;
        inside.then_some(world)
    }

    fn length(&self, world_length: f32) -> f32 {
        world_length * self.scale
    }
}

fn gather_frame_input_from_observations(
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    clicked: bool,
) -> FrameInput {
    if !clicked {
        return FrameInput::default();
    }

    FrameInput {
        click_world_space: metrics.to_world(cursor_position),
    }
}

fn draw_rect_centered(
    metrics: &SceneMetrics,
    center: Vec2,
    size: Vec2,
    color: macroquad::color::Color,
) {
    let top_left = metrics.to_screen(center - size * 0.5);
    let size = size * metrics.scale;
    macroquad::shapes::draw_rectangle(top_left.x, top_left.y, size.x, size.y, color);
}

fn draw_banner(metrics: &SceneMetrics, canvas: Vec2) {
    let size = Vec2::new(canvas.x, layout::BANNER_HEIGHT);
    draw_rect_centered(
        metrics,
        size * 0.5,
        size,
        to_macroquad_color(layout::BANNER_COLOR),
    );
}

fn draw_tiles(scene: &Scene, metrics: &SceneMetrics) {
    let grid = scene.tile_grid;
    let size = Vec2::splat(layout::TILE_DRAW_LENGTH.min(grid.tile_length));
    for TilePresentation { cell, color, .. } in &scene.tiles {
        draw_rect_centered(
            metrics,
            grid.cell_center(*cell),
            size,
            to_macroquad_color(*color),
        );
    }
}

fn draw_towers(towers: &[TowerPresentation], metrics: &SceneMetrics) {
    let fill = to_macroquad_color(layout::TOWER_COLOR);
    let outline = to_macroquad_color(layout::TEXT_COLOR);
    let size = Vec2::splat(layout::TOWER_SIZE);

    for tower in towers {
        draw_rect_centered(metrics, tower.center, size, fill);
        let top_left = metrics.to_screen(tower.center - size * 0.5);
        let scaled = metrics.length(layout::TOWER_SIZE);
        macroquad::shapes::draw_rectangle_lines(
            top_left.x,
            top_left.y,
            scaled,
            scaled,
            metrics.length(layout::TOWER_OUTLINE),
            outline,
        );
    }
}

fn draw_monsters(monsters: &[MonsterPresentation], metrics: &SceneMetrics) {
    let fill = to_macroquad_color(layout::MONSTER_COLOR);
    let bar = to_macroquad_color(layout::TEXT_COLOR);

    for monster in monsters {
        let center = metrics.to_screen(monster.center);
        macroquad::shapes::draw_circle(center.x, center.y, metrics.length(MONSTER_RADIUS), fill);

        let fraction = monster.health_fraction.clamp(0.0, 1.0);
        if fraction < 1.0 {
            let width = MONSTER_RADIUS * 2.0;
            let origin = monster.center - Vec2::new(MONSTER_RADIUS, MONSTER_RADIUS + 6.0);
            let screen = metrics.to_screen(origin);
            macroquad::shapes::draw_rectangle(
                screen.x,
                screen.y,
                metrics.length(width * fraction),
                metrics.length(3.0),
                bar,
            );
        }
    }
}

fn draw_bullets(bullets: &[BulletPresentation], metrics: &SceneMetrics) {
    let fill = to_macroquad_color(layout::BULLET_COLOR);
    for bullet in bullets {
        let center = metrics.to_screen(bullet.center);
        macroquad::shapes::draw_circle(center.x, center.y, metrics.length(BULLET_RADIUS), fill);
    }
}

fn draw_quiz(scene: &Scene, metrics: &SceneMetrics, font: Option<Font>) {
    if let Some(word) = &scene.quiz.word {
        draw_text_centered(
            word,
            layout::WORD_CENTER,
            layout::WORD_FONT_SIZE,
            layout::WORD_COLOR,
            metrics,
            font,
        );
    }

    for button in &scene.quiz.buttons {
        draw_answer_button(button, metrics, font);
    }
}

fn draw_answer_button(button: &AnswerButton, metrics: &SceneMetrics, font: Option<Font>) {
    draw_rect_centered(
        metrics,
        button.center,
        layout::ANSWER_BUTTON_SIZE,
        to_macroquad_color(layout::BUTTON_COLOR),
    );
    let top_left = metrics.to_screen(button.center - layout::ANSWER_BUTTON_SIZE * 0.5);
    let size = layout::ANSWER_BUTTON_SIZE * metrics.scale;
    macroquad::shapes::draw_rectangle_lines(
        top_left.x,
        top_left.y,
        size.x,
        size.y,
        1.0,
        macroquad::color::BLACK,
    );

    let font_size = layout::ANSWER_FONT_SIZE;
    let lines = wrap_label(&button.label, layout::ANSWER_WRAP_WIDTH, |line| {
        measure_text(line, font, font_size, 1.0).width
    });
    let line_height = f32::from(font_size) * 1.2;
    let first = button.center.y - line_height * (lines.len().saturating_sub(1)) as f32 * 0.5;
    for (index, line) in lines.iter().enumerate() {
        draw_text_centered(
            line,
            Vec2::new(button.center.x, first + line_height * index as f32),
            font_size,
            layout::TEXT_COLOR,
            metrics,
            font,
        );
    }
}

fn draw_hud(scene: &Scene, metrics: &SceneMetrics, font: Option<Font>) {
    let points = scene.hud.points_label();
    let size = layout::POINTS_FONT_SIZE;
    let baseline = layout::POINTS_POSITION + Vec2::new(0.0, f32::from(size));
    draw_text_at(&points, baseline, size, metrics, font);

    if let Some(stats) = &scene.hud.stats_line {
        let width = measure_text(&points, font, size, 1.0).width;
        let position = baseline + Vec2::new(width + 24.0, 0.0);
        draw_text_at(stats, position, size / 4 * 3, metrics, font);
    }
}

fn draw_text_at(
    text: &str,
    baseline: Vec2,
    font_size: u16,
    metrics: &SceneMetrics,
    font: Option<Font>,
) {
    let screen = metrics.to_screen(baseline);
    let _ = draw_text_ex(
        text,
        screen.x,
        screen.y,
        text_params(font_size, layout::TEXT_COLOR, metrics, font),
    );
}

fn draw_text_centered(
    text: &str,
    center: Vec2,
    font_size: u16,
    color: word_defence_rendering::Color,
    metrics: &SceneMetrics,
    font: Option<Font>,
) {
    let params = text_params(font_size, color, metrics, font);
    let dimensions = measure_text(text, font, params.font_size, params.font_scale);
    let screen = metrics.to_screen(center);
    let _ = draw_text_ex(
        text,
        screen.x - dimensions.width * 0.5,
        screen.y + dimensions.offset_y * 0.5,
        params,
    );
}

fn text_params(
    font_size: u16,
    color: word_defence_rendering::Color,
    metrics: &SceneMetrics,
    font: Option<Font>,
) -> TextParams {
    TextParams {
        font: font.unwrap_or_default(),
        font_size,
        font_scale: metrics.scale,
        color: to_macroquad_color(color),
        ..TextParams::default()
    }
}

fn to_macroquad_color(color: word_defence_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec2_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() <= 1e-4,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn scene_metrics_letterbox_wide_screens() {
        let metrics = SceneMetrics::new(layout::CANVAS_SIZE, Vec2::new(1600.0, 750.0), Vec2::ZERO);
        assert!((metrics.scale - 1.0).abs() <= f32::EPSILON);
        assert_vec2_close(metrics.offset, Vec2::new(400.0, 0.0));
    }

    #[test]
    fn scene_metrics_shrink_to_fit_small_screens() {
        let metrics = SceneMetrics::new(layout::CANVAS_SIZE, Vec2::new(400.0, 750.0), Vec2::ZERO);
        assert!((metrics.scale - 0.5).abs() <= f32::EPSILON);
        assert_vec2_close(metrics.offset, Vec2::new(0.0, 187.5));
        assert_vec2_close(metrics.to_screen(Vec2::new(800.0, 750.0)), Vec2::new(400.0, 562.5));
    }

    #[test]
    fn to_world_inverts_to_screen_inside_canvas() {
        let metrics =
            SceneMetrics::new(layout::CANVAS_SIZE, Vec2::new(1000.0, 1000.0), Vec2::ZERO);
        let world = Vec2::new(125.0, 375.0);
        let screen = metrics.to_screen(world);
        assert_vec2_close(metrics.to_world(screen).expect("inside canvas"), world);
        assert!(metrics.to_world(Vec2::new(1.0, 1.0)).is_none(), "letterbox bar");
    }

    #[test]
    fn shake_displaces_the_canvas() {
        let still = SceneMetrics::new(layout::CANVAS_SIZE, layout::CANVAS_SIZE, Vec2::ZERO);
        let shaken =
            SceneMetrics::new(layout::CANVAS_SIZE, layout::CANVAS_SIZE, Vec2::new(3.0, -2.0));
        assert_vec2_close(shaken.offset - still.offset, Vec2::new(3.0, -2.0));
    }

    #[test]
    fn clicks_are_reported_in_world_space() {
        let metrics = SceneMetrics::new(layout::CANVAS_SIZE, Vec2::new(1600.0, 750.0), Vec2::ZERO);

        let input = gather_frame_input_from_observations(&metrics, Vec2::new(525.0, 375.0), true);
        assert_vec2_close(
            input.click_world_space.expect("click inside canvas"),
            Vec2::new(125.0, 375.0),
        );

        let idle = gather_frame_input_from_observations(&metrics, Vec2::new(525.0, 375.0), false);
        assert_eq!(idle, FrameInput::default());

        let outside = gather_frame_input_from_observations(&metrics, Vec2::new(10.0, 10.0), true);
        assert!(outside.click_world_space.is_none());
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            ..FrameBreakdown::default()
        };
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());

        let metrics = counter
            .record_frame(frame(250))
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() <= 1e-3);
        assert!(counter.record_frame(frame(250)).is_none());
    }

    #[test]
    fn fps_counter_averages_stage_durations() {
        let mut counter = FpsCounter::default();
        let frame = FrameBreakdown {
            frame: Duration::from_millis(500),
            simulation: Duration::from_millis(2),
            render: Duration::from_millis(4),
        };
        assert!(counter.record_frame(frame).is_none());
        let metrics = counter.record_frame(frame).expect("one second elapsed");
        assert_eq!(metrics.avg_simulation, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::from_millis(4));
    }
}
