/// All game entity types — pure data, no logic.

// ── Geometry ──────────────────────────────────────────────────────────────────

/// 2-D point/vector in playfield units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }
}

/// Playfield bounds.  World coordinates run from (0, 0) at the top-left to
/// (w, h) exclusive at the bottom-right; y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    /// True if `pos` lies outside the playfield.
    pub fn outside(&self, pos: Vec2) -> bool {
        pos.x < 0.0 || pos.x >= self.w || pos.y < 0.0 || pos.y >= self.h
    }

    /// Out-of-bounds test with the forgiving vertical margin used for enemy
    /// and item despawning: the y coordinate is scaled by 0.8 first, so an
    /// entity is only culled once it is 25% past the bottom edge.
    pub fn outside_margin(&self, pos: Vec2) -> bool {
        self.outside(Vec2::new(pos.x, pos.y * 0.8))
    }
}

/// Default playfield size.
pub const PLAYFIELD: Bounds = Bounds { w: 400.0, h: 600.0 };

// ── Discrete input intents ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// Number of visual frames in the impact-explosion sequence.  A bullet whose
/// explosion index has walked past the last frame is removed on the next tick.
pub const EXPLOSION_FRAMES: usize = 5;

#[derive(Clone, Debug)]
pub struct Bullet {
    pub owner: BulletOwner,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Attack power, fixed at creation.
    pub atk: f32,
    pub exploding: bool,
    /// Index into the explosion sequence; monotonically non-decreasing.
    pub explosion_frame: usize,
}

impl Bullet {
    pub fn new(owner: BulletOwner, pos: Vec2, vel: Vec2, atk: f32) -> Bullet {
        Bullet {
            owner,
            pos,
            vel,
            atk,
            exploding: false,
            explosion_frame: 0,
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Fire-port offsets gained through FirePort pickups, in pickup order.
pub const PLAYER_PORT_LAYOUT: [Vec2; 3] = [
    Vec2 { x: 0.0, y: -15.0 },
    Vec2 { x: -10.0, y: -8.0 },
    Vec2 { x: 10.0, y: -8.0 },
];

/// Attack multiplier applied to bullets once the blaster upgrade is held.
pub const BLASTER_ATK_MUL: f32 = 3.0;

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    /// Distance covered by one movement intent.
    pub speed: f32,
    pub crash_box: Vec2,
    pub atk: f32,
    pub defen: f32,
    pub hp: f32,
    pub hp_max: f32,
    /// Minimum milliseconds between shots.
    pub fire_interval: f32,
    pub last_fired: f32,
    pub fire_ports: Vec<Vec2>,
    pub has_blaster: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Player {
        Player {
            pos,
            speed: 5.0,
            crash_box: Vec2::new(10.0, 12.0),
            atk: 20.0,
            defen: 0.0,
            hp: 100.0,
            hp_max: 100.0,
            fire_interval: 250.0,
            last_fired: 0.0,
            fire_ports: vec![PLAYER_PORT_LAYOUT[0]],
            has_blaster: false,
        }
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Basic,
    DoubleShooter,
    TripleShooter,
    /// Mini-boss: fires an 8-direction bullet ring.
    RingBurst,
    Charger,
    Tracker,
    Windmill,
    VaderFighter,
    /// Boss: periodically launches escort fighters.
    CapitalShip,
    EscortFighter,
    FinalBoss,
}

/// Loot/level tier a defeated enemy belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyTier {
    Ordinary,
    MidBoss,
    TopBoss,
}

impl EnemyKind {
    /// Resolve a spawn-table identifier.  Unknown identifiers return `None`
    /// so the scheduler can skip the rule without aborting the tick.
    pub fn from_id(id: &str) -> Option<EnemyKind> {
        match id {
            "basic" => Some(EnemyKind::Basic),
            "double-shooter" => Some(EnemyKind::DoubleShooter),
            "triple-shooter" => Some(EnemyKind::TripleShooter),
            "ring-burst" => Some(EnemyKind::RingBurst),
            "charger" => Some(EnemyKind::Charger),
            "tracker" => Some(EnemyKind::Tracker),
            "windmill" => Some(EnemyKind::Windmill),
            "vader-fighter" => Some(EnemyKind::VaderFighter),
            "capital-ship" => Some(EnemyKind::CapitalShip),
            "escort-fighter" => Some(EnemyKind::EscortFighter),
            "final-boss" => Some(EnemyKind::FinalBoss),
            _ => None,
        }
    }

    /// Boss-class enemies suppress periodic spawning while alive and are
    /// exempt from out-of-bounds removal.
    pub fn is_boss(&self) -> bool {
        matches!(
            self,
            EnemyKind::RingBurst | EnemyKind::CapitalShip | EnemyKind::FinalBoss
        )
    }

    pub fn tier(&self) -> EnemyTier {
        match self {
            EnemyKind::RingBurst | EnemyKind::CapitalShip => EnemyTier::MidBoss,
            EnemyKind::FinalBoss => EnemyTier::TopBoss,
            _ => EnemyTier::Ordinary,
        }
    }
}

/// Second, independent fire channel of the final boss: a slow heavy beam
/// whose firing origin re-rolls to a random x position every 2-second phase.
#[derive(Clone, Debug)]
pub struct BeamChannel {
    pub interval: f32,
    pub last_fired: f32,
    pub origin_x: f32,
    /// Index of the 2-second phase the origin was last rolled in.
    pub phase: u64,
}

/// Length of one beam-origin phase in milliseconds.
pub const BEAM_PHASE_MS: f32 = 2000.0;

/// Attack multiplier of the beam channel over the boss's base attack.
pub const BEAM_ATK_MUL: f32 = 2.5;

/// Cadence of capital-ship / final-boss escort launches, in milliseconds.
pub const ESCORT_CYCLE_MS: f32 = 3000.0;

#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub hp: f32,
    /// Captured post-scaling for boss-class enemies only (HP-bar ratio).
    pub max_hp: Option<f32>,
    pub atk: f32,
    pub defen: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub crash_box: Vec2,
    pub fire_ports: Vec<Vec2>,
    pub fire_interval: f32,
    pub last_fired: f32,
    /// Final boss only.
    pub beam: Option<BeamChannel>,
}

impl Enemy {
    /// Construct an enemy with its unscaled base stats.  Progression scaling
    /// is applied separately, once, at spawn time.
    pub fn new(kind: EnemyKind, pos: Vec2) -> Enemy {
        let (hp, atk, defen, vel, crash_box, ports, fire_interval): (
            f32,
            f32,
            f32,
            Vec2,
            Vec2,
            &[Vec2],
            f32,
        ) = match kind {
            EnemyKind::Basic => (
                1.0,
                5.0,
                0.0,
                Vec2::new(1.5, 1.0),
                Vec2::new(10.0, 8.0),
                &[Vec2 { x: 0.0, y: 10.0 }],
                1200.0,
            ),
            EnemyKind::DoubleShooter => (
                30.0,
                6.0,
                1.0,
                Vec2::new(2.0, 0.8),
                Vec2::new(14.0, 10.0),
                &[Vec2 { x: -8.0, y: 10.0 }, Vec2 { x: 8.0, y: 10.0 }],
                1000.0,
            ),
            EnemyKind::TripleShooter => (
                45.0,
                7.0,
                2.0,
                Vec2::new(1.2, 0.6),
                Vec2::new(12.0, 10.0),
                &[Vec2 { x: 0.0, y: 12.0 }],
                1400.0,
            ),
            EnemyKind::RingBurst => (
                250.0,
                8.0,
                3.0,
                Vec2::new(2.0, 0.2),
                Vec2::new(18.0, 14.0),
                &[Vec2 { x: 0.0, y: 0.0 }],
                900.0,
            ),
            EnemyKind::Charger => (
                20.0,
                10.0,
                1.0,
                Vec2::new(2.0, 0.6),
                Vec2::new(10.0, 8.0),
                &[Vec2 { x: 0.0, y: 8.0 }],
                1600.0,
            ),
            EnemyKind::Tracker => (
                15.0,
                8.0,
                0.0,
                Vec2::ZERO,
                Vec2::new(9.0, 9.0),
                &[Vec2 { x: 0.0, y: 8.0 }],
                2000.0,
            ),
            EnemyKind::Windmill => (
                60.0,
                6.0,
                2.0,
                Vec2::new(1.0, 0.4),
                Vec2::new(13.0, 13.0),
                &[Vec2 { x: 0.0, y: 0.0 }],
                700.0,
            ),
            EnemyKind::VaderFighter => (
                80.0,
                12.0,
                4.0,
                Vec2::new(3.0, 0.5),
                Vec2::new(12.0, 10.0),
                &[Vec2 { x: -6.0, y: 10.0 }, Vec2 { x: 6.0, y: 10.0 }],
                800.0,
            ),
            EnemyKind::CapitalShip => (
                1200.0,
                10.0,
                6.0,
                Vec2::new(1.5, 0.1),
                Vec2::new(30.0, 20.0),
                &[
                    Vec2 { x: -20.0, y: 16.0 },
                    Vec2 { x: 0.0, y: 18.0 },
                    Vec2 { x: 20.0, y: 16.0 },
                ],
                1100.0,
            ),
            EnemyKind::EscortFighter => (
                8.0,
                6.0,
                1.0,
                Vec2::new(3.0, 1.2),
                Vec2::new(8.0, 7.0),
                &[Vec2 { x: 0.0, y: 8.0 }],
                900.0,
            ),
            EnemyKind::FinalBoss => (
                5000.0,
                15.0,
                8.0,
                Vec2::new(1.0, 0.05),
                Vec2::new(36.0, 26.0),
                &[Vec2 { x: -24.0, y: 20.0 }, Vec2 { x: 24.0, y: 20.0 }],
                400.0,
            ),
        };
        let beam = match kind {
            EnemyKind::FinalBoss => Some(BeamChannel {
                interval: 2500.0,
                last_fired: 0.0,
                origin_x: pos.x,
                phase: 0,
            }),
            _ => None,
        };
        Enemy {
            kind,
            hp,
            max_hp: None,
            atk,
            defen,
            pos,
            vel,
            crash_box,
            fire_ports: ports.to_vec(),
            fire_interval,
            last_fired: 0.0,
            beam,
        }
    }
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Restores hp, clamped to the current maximum.
    Heal,
    /// Raises the hp cap.
    MaxHp,
    /// +1 shot per second, capped at 20/sec.
    FireRate,
    Attack,
    Defense,
    /// Heavy-weapon upgrade; idempotent once held.
    Blaster,
    /// Adds one fire port, capped at 3.
    FirePort,
}

/// Half-extent of an item's pickup box.
pub const ITEM_HALF_EXTENT: Vec2 = Vec2 { x: 8.0, y: 8.0 };

#[derive(Clone, Debug)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Kind-specific payload magnitude (hp restored, stat added, ...).
    pub power: f32,
}

impl Item {
    pub fn new(kind: ItemKind, pos: Vec2) -> Item {
        let power = match kind {
            ItemKind::Heal => 50.0,
            ItemKind::MaxHp => 25.0,
            ItemKind::FireRate => 1.0,
            ItemKind::Attack => 2.0,
            ItemKind::Defense => 1.0,
            ItemKind::Blaster | ItemKind::FirePort => 0.0,
        };
        Item {
            kind,
            pos,
            vel: Vec2::new(0.0, 3.0),
            power,
        }
    }
}
