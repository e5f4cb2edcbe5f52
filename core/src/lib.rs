#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Word Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable snapshots, and
//! respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Word Defence.";

/// Half the side length of a monster's collision box in world units.
pub const MONSTER_RADIUS: f32 = 20.0;

/// Half the side length of a bullet's collision box in world units.
pub const BULLET_RADIUS: f32 = 5.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new monster enters the path at its starting point.
    SpawnMonster,
    /// Requests placement of a tower on the provided cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell that will host the tower.
        cell: CellCoord,
    },
    /// Requests that a tower launches a bullet toward a monster.
    FireBullet {
        /// Tower that should fire.
        tower: TowerId,
        /// Monster whose current position the bullet is aimed at.
        target: MonsterId,
    },
    /// Installs the next quiz question.
    PoseQuestion {
        /// Question presented to the player.
        question: QuizQuestion,
    },
    /// Reports that the player selected one of the presented options.
    AnswerQuestion {
        /// Zero-based index into the active question's options.
        option: usize,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a monster entered the path.
    MonsterSpawned {
        /// Identifier assigned to the monster.
        monster: MonsterId,
        /// Hit points the monster starts with.
        health: Health,
    },
    /// Reports that a monster reached the end of the path and left the map.
    MonsterEscaped {
        /// Identifier of the monster that escaped.
        monster: MonsterId,
    },
    /// Reports that a bullet struck a monster.
    MonsterDamaged {
        /// Identifier of the monster that was hit.
        monster: MonsterId,
        /// Bullet that hit the monster. The bullet no longer exists.
        bullet: BulletId,
        /// Hit points left after the hit.
        remaining: Health,
    },
    /// Reports that a monster ran out of hit points and was removed.
    MonsterDefeated {
        /// Identifier of the defeated monster.
        monster: MonsterId,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Points deducted for the construction.
        cost: Points,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower launched a bullet.
    BulletFired {
        /// Identifier assigned to the bullet.
        bullet: BulletId,
        /// Tower that fired.
        tower: TowerId,
        /// Monster the bullet was aimed at.
        target: MonsterId,
    },
    /// Reports that a bullet left the world bounds without hitting anything.
    BulletExpired {
        /// Identifier of the removed bullet.
        bullet: BulletId,
    },
    /// Announces the player's new point balance.
    PointsChanged {
        /// Balance after the change.
        balance: Points,
    },
    /// Confirms that a question is now awaiting an answer.
    QuestionPosed {
        /// Word the player must translate.
        word: String,
    },
    /// Reports a correct answer. The quiz is transitioning afterwards.
    AnswerAccepted {
        /// Option the player selected.
        option: usize,
        /// Word that was answered and is now retired.
        word: String,
        /// Points credited for the answer.
        reward: Points,
    },
    /// Reports a wrong answer. The question stays active.
    AnswerRejected {
        /// Option the player selected.
        option: usize,
    },
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the bullet identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Position expressed in world units, which match canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate growing to the right.
    pub x: f32,
    /// Vertical coordinate growing downwards.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Describes the discrete tile layout of the map and where it sits in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_length: f32,
    origin: WorldPoint,
}

impl TileGrid {
    /// Number of columns in the default map.
    pub const DEFAULT_COLUMNS: u32 = 16;
    /// Number of rows in the default map.
    pub const DEFAULT_ROWS: u32 = 10;
    /// Side length of a tile in the default layout.
    pub const DEFAULT_TILE_LENGTH: f32 = 50.0;
    /// Upper-left corner of the map in the default layout. The quiz banner
    /// occupies the space above it.
    pub const DEFAULT_ORIGIN: WorldPoint = WorldPoint::new(0.0, 250.0);

    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_length: f32, origin: WorldPoint) -> Self {
        Self {
            columns,
            rows,
            tile_length,
            origin,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Upper-left corner of the grid in world units.
    #[must_use]
    pub const fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Centre of the provided cell in world units.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> WorldPoint {
        let half = self.tile_length * 0.5;
        WorldPoint::new(
            self.origin.x + cell.column() as f32 * self.tile_length + half,
            self.origin.y + cell.row() as f32 * self.tile_length + half,
        )
    }

    /// Resolves the cell containing the provided world point, if any.
    #[must_use]
    pub fn cell_at(&self, point: WorldPoint) -> Option<CellCoord> {
        if self.tile_length <= 0.0 || !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }

        let local_x = point.x - self.origin.x;
        let local_y = point.y - self.origin.y;
        if local_x < 0.0 || local_y < 0.0 {
            return None;
        }

        let column = (local_x / self.tile_length).floor() as u32;
        let row = (local_y / self.tile_length).floor() as u32;
        let cell = CellCoord::new(column, row);
        self.contains(cell).then_some(cell)
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_COLUMNS,
            Self::DEFAULT_ROWS,
            Self::DEFAULT_TILE_LENGTH,
            Self::DEFAULT_ORIGIN,
        )
    }
}

/// Hit points carried by a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the health left after taking `amount` damage, saturating at zero.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// Currency earned by answering questions and spent on towers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Points(u32);

impl Points {
    /// Creates a new point amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Adds two amounts, saturating at the numeric maximum.
    #[must_use]
    pub const fn saturating_add(self, other: Points) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts `cost`, returning `None` when the balance does not cover it.
    #[must_use]
    pub const fn checked_sub(self, cost: Points) -> Option<Self> {
        match self.0.checked_sub(cost.0) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

/// Types of towers that can be constructed on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Basic tower with default attack parameters.
    Basic,
}

impl TowerKind {
    /// Points deducted when the tower is placed.
    #[must_use]
    pub const fn cost(self) -> Points {
        match self {
            Self::Basic => Points::new(100),
        }
    }

    /// Targeting radius in world units. Monsters must be strictly closer.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Basic => 150.0,
        }
    }

    /// Minimum time between two consecutive shots.
    #[must_use]
    pub const fn cooldown(self) -> Duration {
        match self {
            Self::Basic => Duration::from_millis(800),
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the map.
    OutOfBounds,
    /// The requested cell is part of the monster path.
    OnPath,
    /// Another tower already occupies the cell.
    Occupied,
    /// The point balance does not cover the tower cost.
    InsufficientFunds,
}

/// Vocabulary question presented to the player.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuizQuestion {
    word: String,
    options: Vec<String>,
    correct: usize,
}

impl QuizQuestion {
    /// Creates a new question. `correct` indexes into `options`.
    #[must_use]
    pub fn new(word: impl Into<String>, options: Vec<String>, correct: usize) -> Self {
        Self {
            word: word.into(),
            options,
            correct,
        }
    }

    /// Word the player must translate.
    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Candidate meanings in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the correct meaning.
    #[must_use]
    pub const fn correct(&self) -> usize {
        self.correct
    }

    /// Correct meaning, or `None` for a malformed question.
    #[must_use]
    pub fn correct_meaning(&self) -> Option<&str> {
        self.options.get(self.correct).map(String::as_str)
    }

    /// Reports whether the question can be answered at all.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.correct < self.options.len()
    }
}

/// The two states of the quiz.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    /// A question is displayed and the player may answer it.
    AwaitingAnswer,
    /// No question is displayed; the next one has not been posed yet.
    Transitioning,
}

/// Immutable representation of a single monster used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterSnapshot {
    /// Unique identifier assigned to the monster.
    pub id: MonsterId,
    /// Current position along the path.
    pub position: WorldPoint,
    /// Remaining hit points.
    pub health: Health,
}

/// Read-only snapshot describing all monsters on the path.
#[derive(Clone, Debug, Default)]
pub struct MonsterView {
    snapshots: Vec<MonsterSnapshot>,
}

impl MonsterView {
    /// Creates a new monster view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MonsterSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &MonsterSnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether no monsters were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MonsterSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Centre of the tower in world units.
    pub position: WorldPoint,
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether no towers were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Cooldown state of a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower described by the snapshot.
    pub tower: TowerId,
    /// Kind of the tower.
    pub kind: TowerKind,
    /// Time left until the tower may fire again. Zero means ready.
    pub ready_in: Duration,
}

/// Read-only collection of tower cooldowns sorted by tower identifier.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the sorted snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a bullet in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Identifier allocated to the bullet.
    pub id: BulletId,
    /// Current position of the bullet.
    pub position: WorldPoint,
}

/// Read-only snapshot describing all bullets in flight.
#[derive(Clone, Debug, Default)]
pub struct BulletView {
    snapshots: Vec<BulletSnapshot>,
}

impl BulletView {
    /// Creates a new bullet view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BulletSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &BulletSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BulletSnapshot> {
        self.snapshots
    }
}

/// Target assignment computed by the targeting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that should engage.
    pub tower: TowerId,
    /// Monster chosen as the target.
    pub monster: MonsterId,
}

/// Counters describing the current play session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SessionStats {
    /// Monsters that entered the path.
    pub monsters_spawned: u32,
    /// Monsters destroyed by bullets.
    pub monsters_defeated: u32,
    /// Monsters that reached the end of the path.
    pub monsters_escaped: u32,
    /// Towers successfully placed.
    pub towers_built: u32,
    /// Bullets launched by towers.
    pub bullets_fired: u32,
    /// Questions answered correctly.
    pub answers_correct: u32,
    /// Wrong answer attempts.
    pub answers_wrong: u32,
}
