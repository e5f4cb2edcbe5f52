//! Fixed canvas layout and palette.

use glam::Vec2;

use crate::Color;

/// Logical canvas size in world units.
pub const CANVAS_SIZE: Vec2 = Vec2::new(800.0, 750.0);

/// Height of the quiz banner spanning the top of the canvas.
pub const BANNER_HEIGHT: f32 = 200.0;
/// Anchor of the word, which is drawn centred on it.
pub const WORD_CENTER: Vec2 = Vec2::new(200.0, 100.0);
/// Font size of the word.
pub const WORD_FONT_SIZE: u16 = 36;

/// Centre of the first answer button.
pub const ANSWER_GRID_ORIGIN: Vec2 = Vec2::new(550.0, 70.0);
/// Distance between the centres of neighbouring buttons.
pub const ANSWER_GRID_STEP: Vec2 = Vec2::new(120.0, 60.0);
/// Number of buttons per row.
pub const ANSWER_GRID_COLUMNS: usize = 2;
/// Size of an answer button.
pub const ANSWER_BUTTON_SIZE: Vec2 = Vec2::new(110.0, 50.0);
/// Font size of answer labels.
pub const ANSWER_FONT_SIZE: u16 = 14;
/// Width at which answer labels wrap.
pub const ANSWER_WRAP_WIDTH: f32 = 100.0;

/// Top-left anchor of the point label.
pub const POINTS_POSITION: Vec2 = Vec2::new(20.0, 215.0);
/// Font size of the point label.
pub const POINTS_FONT_SIZE: u16 = 20;

/// Side length of a drawn tile, leaving a gap to the next tile.
pub const TILE_DRAW_LENGTH: f32 = 48.0;
/// Side length of a drawn tower.
pub const TOWER_SIZE: f32 = 40.0;
/// Width of the outline drawn around towers.
pub const TOWER_OUTLINE: f32 = 2.0;

/// Canvas background.
pub const BACKGROUND_COLOR: Color = Color::from_hex(0x34495e);
/// Quiz banner background.
pub const BANNER_COLOR: Color = Color::from_hex(0xffe4c4);
/// Word text.
pub const WORD_COLOR: Color = Color::from_hex(0x000000);
/// Answer button fill.
pub const BUTTON_COLOR: Color = Color::from_hex(0xe74c3c);
/// Answer label and HUD text.
pub const TEXT_COLOR: Color = Color::from_hex(0xffffff);
/// Path tiles.
pub const PATH_COLOR: Color = Color::from_hex(0xbdc3c7);
/// Buildable tiles.
pub const GRASS_COLOR: Color = Color::from_hex(0x27ae60);
/// Tower fill.
pub const TOWER_COLOR: Color = Color::from_hex(0x2c3e50);
/// Monster fill.
pub const MONSTER_COLOR: Color = Color::from_hex(0xe74c3c);
/// Bullet fill.
pub const BULLET_COLOR: Color = Color::from_hex(0xf1c40f);

/// Centre of the answer button for option `index`.
#[must_use]
pub fn answer_button_center(index: usize) -> Vec2 {
    let column = (index % ANSWER_GRID_COLUMNS) as f32;
    let row = (index / ANSWER_GRID_COLUMNS) as f32;
    ANSWER_GRID_ORIGIN + Vec2::new(column, row) * ANSWER_GRID_STEP
}
