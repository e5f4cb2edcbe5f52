#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Word Defence adapters.

pub mod layout;

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};
use word_defence_core::{BulletId, CellCoord, MonsterId, TowerId};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            red as f32 / 255.0,
            green as f32 / 255.0,
            blue as f32 / 255.0,
            1.0,
        )
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Position of a primary-button press on this frame, in world units.
    pub click_world_space: Option<Vec2>,
}

/// Describes the square tile grid of the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in world units.
    pub tile_length: f32,
    /// Upper-left corner of the grid in world units.
    pub origin: Vec2,
}

impl TileGridPresentation {
    /// Creates a new tile grid descriptor.
    ///
    /// Returns an error when `tile_length` is not a positive finite number.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        origin: Vec2,
    ) -> std::result::Result<Self, RenderingError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            origin,
        })
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Centre of the provided cell in world units.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.origin
            + Vec2::new(cell.column() as f32 + 0.5, cell.row() as f32 + 0.5) * self.tile_length
    }

    /// Resolves the cell under a world-space position, if it lies inside the grid.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        let local = (position - self.origin) / self.tile_length;
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }

        let column = local.x.floor() as u32;
        let row = local.y.floor() as u32;
        (column < self.columns && row < self.rows).then(|| CellCoord::new(column, row))
    }
}

/// Single map tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Cell covered by the tile.
    pub cell: CellCoord,
    /// Whether monsters walk over the tile.
    pub is_path: bool,
    /// Fill color of the tile.
    pub color: Color,
}

impl TilePresentation {
    /// Creates a tile using the standard path or grass color.
    #[must_use]
    pub const fn new(cell: CellCoord, is_path: bool) -> Self {
        Self {
            cell,
            is_path,
            color: if is_path {
                layout::PATH_COLOR
            } else {
                layout::GRASS_COLOR
            },
        }
    }
}

/// Tower drawn as a square centred on its cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Identifier of the tower.
    pub id: TowerId,
    /// Centre in world units.
    pub center: Vec2,
}

impl TowerPresentation {
    /// Creates a new tower descriptor.
    #[must_use]
    pub const fn new(id: TowerId, center: Vec2) -> Self {
        Self { id, center }
    }
}

/// Monster drawn as a filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterPresentation {
    /// Identifier of the monster.
    pub id: MonsterId,
    /// Centre in world units.
    pub center: Vec2,
    /// Remaining hit points as a fraction of the starting value.
    pub health_fraction: f32,
}

impl MonsterPresentation {
    /// Creates a new monster descriptor.
    #[must_use]
    pub const fn new(id: MonsterId, center: Vec2, health_fraction: f32) -> Self {
        Self {
            id,
            center,
            health_fraction,
        }
    }
}

/// Bullet in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletPresentation {
    /// Identifier of the bullet.
    pub id: BulletId,
    /// Centre in world units.
    pub center: Vec2,
}

impl BulletPresentation {
    /// Creates a new bullet descriptor.
    #[must_use]
    pub const fn new(id: BulletId, center: Vec2) -> Self {
        Self { id, center }
    }
}

/// Clickable answer option.
#[derive(Clone, Debug, PartialEq)]
pub struct AnswerButton {
    /// Index of the option inside the active question.
    pub option: usize,
    /// Meaning shown on the button.
    pub label: String,
    /// Centre of the button in world units.
    pub center: Vec2,
}

impl AnswerButton {
    /// Creates a button laid out in the two-column answer grid.
    #[must_use]
    pub fn new(option: usize, label: impl Into<String>) -> Self {
        Self {
            option,
            label: label.into(),
            center: layout::answer_button_center(option),
        }
    }

    /// Reports whether the world-space position lies on the button.
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        let half = layout::ANSWER_BUTTON_SIZE * 0.5;
        let delta = (position - self.center).abs();
        delta.x <= half.x && delta.y <= half.y
    }
}

/// Banner showing the active word and its candidate meanings.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct QuizPanelPresentation {
    /// Word to translate, absent while the next question is pending.
    pub word: Option<String>,
    /// Answer buttons in option order.
    pub buttons: Vec<AnswerButton>,
}

impl QuizPanelPresentation {
    /// Builds the panel for a question.
    #[must_use]
    pub fn for_question(word: impl Into<String>, options: &[String]) -> Self {
        Self {
            word: Some(word.into()),
            buttons: options
                .iter()
                .enumerate()
                .map(|(index, label)| AnswerButton::new(index, label.as_str()))
                .collect(),
        }
    }

    /// Option whose button lies under the world-space position.
    #[must_use]
    pub fn option_at(&self, position: Vec2) -> Option<usize> {
        self.buttons
            .iter()
            .find(|button| button.contains(position))
            .map(|button| button.option)
    }
}

/// Text overlays drawn between the banner and the map.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HudPresentation {
    /// Current point balance.
    pub points: u32,
    /// Optional session summary drawn next to the balance.
    pub stats_line: Option<String>,
}

impl HudPresentation {
    /// Label shown for the point balance.
    #[must_use]
    pub fn points_label(&self) -> String {
        format!("Point: {}", self.points)
    }
}

/// Camera shake triggered by wrong answers.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScreenShake {
    remaining: Duration,
    elapsed: Duration,
    intensity: f32,
}

impl ScreenShake {
    /// Starts a shake lasting `duration`, displacing the view by up to
    /// `intensity` times the canvas size. Restarting replaces a running shake.
    pub fn trigger(&mut self, duration: Duration, intensity: f32) {
        self.remaining = duration;
        self.elapsed = Duration::ZERO;
        self.intensity = intensity.max(0.0);
    }

    /// Advances the shake timer.
    pub fn advance(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Reports whether the shake still displaces the view.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.remaining.is_zero()
    }

    /// Offset to apply to the whole scene for the current frame.
    #[must_use]
    pub fn offset(&self, canvas: Vec2) -> Vec2 {
        if !self.is_active() {
            return Vec2::ZERO;
        }

        let phase = self.elapsed.as_secs_f32() * 97.0;
        Vec2::new(phase.sin(), (phase * 1.7).cos()) * canvas * self.intensity
    }
}

/// Region of the scene selected by a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneHit {
    /// An answer button of the active question.
    Answer(usize),
    /// A map tile.
    Tile(CellCoord),
}

/// Scene description combining the quiz banner, map and inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid that composes the map.
    pub tile_grid: TileGridPresentation,
    /// Tiles of the map in row-major order.
    pub tiles: Vec<TilePresentation>,
    /// Towers placed on the map.
    pub towers: Vec<TowerPresentation>,
    /// Monsters currently on the path.
    pub monsters: Vec<MonsterPresentation>,
    /// Bullets in flight.
    pub bullets: Vec<BulletPresentation>,
    /// Quiz banner content.
    pub quiz: QuizPanelPresentation,
    /// Text overlays.
    pub hud: HudPresentation,
    /// Active camera shake.
    pub shake: ScreenShake,
}

impl Scene {
    /// Creates a scene with an empty map population.
    #[must_use]
    pub fn new(tile_grid: TileGridPresentation, tiles: Vec<TilePresentation>) -> Self {
        Self {
            tile_grid,
            tiles,
            towers: Vec::new(),
            monsters: Vec::new(),
            bullets: Vec::new(),
            quiz: QuizPanelPresentation::default(),
            hud: HudPresentation::default(),
            shake: ScreenShake::default(),
        }
    }

    /// Resolves what lies under a world-space position. Answer buttons take
    /// precedence over the map.
    #[must_use]
    pub fn hit_test(&self, position: Vec2) -> Option<SceneHit> {
        if let Some(option) = self.quiz.option_at(position) {
            return Some(SceneHit::Answer(option));
        }
        self.tile_grid.cell_at(position).map(SceneHit::Tile)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Size of the logical canvas in world units.
    pub canvas_size: Vec2,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor for the standard canvas.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            canvas_size: layout::CANVAS_SIZE,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Word Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta, per-frame
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive side length.
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> TileGridPresentation {
        TileGridPresentation::new(16, 10, 50.0, Vec2::new(0.0, 250.0)).expect("valid grid")
    }

    fn scene_with_question() -> Scene {
        let mut scene = Scene::new(grid(), Vec::new());
        let options = ["one", "two", "three", "four"].map(String::from);
        scene.quiz = QuizPanelPresentation::for_question("word", &options);
        scene
    }

    #[test]
    fn tile_grid_rejects_non_positive_tile_length() {
        let error = TileGridPresentation::new(4, 4, 0.0, Vec2::ZERO)
            .expect_err("zero tile length must be rejected");
        assert_eq!(error, RenderingError::InvalidTileLength { tile_length: 0.0 });
    }

    #[test]
    fn cell_at_resolves_map_tiles() {
        let grid = grid();
        assert_eq!(
            grid.cell_at(Vec2::new(125.0, 375.0)),
            Some(CellCoord::new(2, 2))
        );
        assert_eq!(grid.cell_at(Vec2::new(125.0, 240.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(800.0, 300.0)), None);
        assert_eq!(grid.cell_center(CellCoord::new(2, 2)), Vec2::new(125.0, 375.0));
    }

    #[test]
    fn hex_colors_unpack_channels() {
        assert_eq!(Color::from_hex(0xe74c3c), Color::from_rgb_u8(0xe7, 0x4c, 0x3c));
        assert_eq!(Color::from_hex(0xffffff), Color::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn answer_buttons_use_two_column_grid() {
        let scene = scene_with_question();
        let centers: Vec<_> = scene.quiz.buttons.iter().map(|button| button.center).collect();
        assert_eq!(
            centers,
            vec![
                Vec2::new(550.0, 70.0),
                Vec2::new(670.0, 70.0),
                Vec2::new(550.0, 130.0),
                Vec2::new(670.0, 130.0),
            ]
        );
    }

    #[test]
    fn hit_test_prefers_buttons_and_falls_back_to_tiles() {
        let scene = scene_with_question();

        assert_eq!(scene.hit_test(Vec2::new(600.0, 90.0)), Some(SceneHit::Answer(0)));
        assert_eq!(scene.hit_test(Vec2::new(720.0, 150.0)), Some(SceneHit::Answer(3)));
        assert_eq!(scene.hit_test(Vec2::new(610.0, 70.0)), None, "gap between columns");
        assert_eq!(
            scene.hit_test(Vec2::new(30.0, 260.0)),
            Some(SceneHit::Tile(CellCoord::new(0, 0)))
        );
        assert_eq!(scene.hit_test(Vec2::new(100.0, 100.0)), None);
    }

    #[test]
    fn shake_runs_for_its_duration() {
        let mut shake = ScreenShake::default();
        assert_eq!(shake.offset(layout::CANVAS_SIZE), Vec2::ZERO);

        shake.trigger(Duration::from_millis(100), 0.005);
        shake.advance(Duration::from_millis(16));
        assert!(shake.is_active());
        let offset = shake.offset(layout::CANVAS_SIZE);
        assert!(offset.x.abs() <= 800.0 * 0.005 && offset.y.abs() <= 750.0 * 0.005);

        shake.advance(Duration::from_millis(90));
        assert!(!shake.is_active());
        assert_eq!(shake.offset(layout::CANVAS_SIZE), Vec2::ZERO);
    }

    #[test]
    fn points_label_matches_banner_text() {
        let hud = HudPresentation {
            points: 420,
            stats_line: None,
        };
        assert_eq!(hud.points_label(), "Point: 420");
    }
}
