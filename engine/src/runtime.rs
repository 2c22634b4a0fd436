use rand::Rng;
use util::{clamp_to, srng, GameRng};

use crate::{
    prelude::*, ArmKind, ChassisKind, Config, MountKind,
    Scheduler, SystemKind, Team, Units, UsableKind, PLAYER_SPEED, PLAYER_VISION,
};

/// State of the turn loop after an `advance` call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TurnStatus {
    /// Player's turn, nothing happens until the player acts.
    AwaitingInput,
    /// Autonomous turns ran out of the per-frame budget, call again.
    Busy,
    /// No units left to act.
    Idle,
    /// Player unit has been destroyed.
    GameOver,
}

/// Main data container for game engine runtime.
#[derive(Clone, Debug)]
pub struct Runtime {
    pub(crate) level: Level,
    pub(crate) units: Units,
    pub(crate) scheduler: Scheduler,
    pub(crate) player: Option<UnitId>,
    pub(crate) waiting_for_player: bool,
    pub(crate) log: MsgLog,
    pub(crate) rng: GameRng,
    config: Config,
}

impl Runtime {
    pub fn new(config: Config, level: Level) -> Self {
        Runtime {
            level,
            units: Default::default(),
            scheduler: Default::default(),
            player: None,
            waiting_for_player: false,
            log: MsgLog::new(config.log_capacity),
            rng: srng(&config.seed),
            config,
        }
    }

    /// Set up the built-in test level.
    ///
    /// Walled rectangle with a wall segment, conveyor belts, stairs, some
    /// loose equipment and a squad of wandering hostile drones.
    pub fn test_level(config: Config) -> Result<Self> {
        let mut level =
            Level::new(config.level_width.max(3), config.level_height.max(3));
        let (w, h) = (level.width(), level.height());
        for p in level.positions().collect::<Vec<_>>() {
            if p.x == 0 || p.y == 0 || p.x == w - 1 || p.y == h - 1 {
                level.set_terrain(p, Terrain::Wall);
            }
        }
        for x in 30..=40 {
            level.set_terrain(ivec2(x, 30), Terrain::Wall);
        }
        for x in 20..30 {
            level.set_terrain(ivec2(x, 70), Terrain::ConveyorHorizontal);
        }
        for y in 20..30 {
            level.set_terrain(ivec2(70, y), Terrain::ConveyorVertical);
        }
        level.set_terrain(ivec2(45, 45), Terrain::StairsUp1);
        level.set_terrain(ivec2(60, 60), Terrain::StairsDown1);

        let mut ret = Runtime::new(config, level);

        let player_pos =
            clamp_to(ivec2(w / 2, h / 2), w - 1, h - 1).max(ivec2(1, 1));
        let player = Unit::new("Robot Jones", '@')
            .with_chassis(Item::chassis(ChassisKind::Basic))
            .with_equipment([
                Item::arm(ArmKind::Claw),
                Item::arm(ArmKind::Hammer),
                Item::mount(MountKind::Laser),
                Item::system(SystemKind::Plating),
            ])
            .with_inventory([
                Item::arm(ArmKind::Shock),
                Item::mount(MountKind::Stunner),
                Item::usable(UsableKind::Grenade),
            ]);
        ret.spawn_player(player, player_pos)?;

        for (offset, item) in [
            (ivec2(2, 0), Item::arm(ArmKind::EnergyLance)),
            (ivec2(2, 1), Item::system(SystemKind::Battery)),
            (ivec2(2, 1), Item::system(SystemKind::SensorArray)),
            (ivec2(-2, 2), Item::mount(MountKind::MineLayer)),
            (ivec2(-1, -2), Item::usable(UsableKind::Missile)),
        ] {
            let p = player_pos + offset;
            if ret.level.terrain(p).is_passable() {
                ret.place_item(p, item)?;
            }
        }

        for _ in 0..ret.config.ai_units {
            let Some(p) = ret.random_spawn_point(player_pos) else {
                log::warn!("test_level: no room for more drones");
                break;
            };
            let drone = Unit::new("drone", 'z')
                .with_chassis(Item::chassis(ChassisKind::Dome))
                .with_equipment([Item::arm(ArmKind::Claw)])
                .with_brain(Brain::Wander);
            ret.spawn(drone, p)?;
        }

        ret.update_fov();
        Ok(ret)
    }

    /// Random free floor cell outside the player's immediate surroundings.
    fn random_spawn_point(&mut self, avoid: IVec2) -> Option<IVec2> {
        let (w, h) = (self.level.width(), self.level.height());
        for _ in 0..1000 {
            let p = ivec2(self.rng.gen_range(0..w), self.rng.gen_range(0..h));
            if self.level.terrain(p) == Terrain::Floor
                && self.level.unit_at(p).is_none()
                && (p - avoid).chess_len() > PLAYER_VISION
            {
                return Some(p);
            }
        }
        None
    }

    /// Place a new unit on the level and queue it for its first turn.
    pub fn spawn(&mut self, mut unit: Unit, pos: IVec2) -> Result<UnitId> {
        let id = UnitId(self.units.len());
        self.level.place_unit(pos, id)?;
        unit.pos = pos;
        let id = self.units.insert(unit);
        self.scheduler.schedule(id, 0)?;
        log::debug!("spawned {id} at {pos}");
        Ok(id)
    }

    /// Place the player unit.
    ///
    /// Sets the unit up with player speed, vision and brain.
    pub fn spawn_player(&mut self, unit: Unit, pos: IVec2) -> Result<UnitId> {
        if self.player.is_some() {
            return Err(Error::InvalidArgument("player already exists"));
        }
        let unit = unit
            .with_brain(Brain::Player)
            .with_team(Team::Friendly)
            .with_speed(PLAYER_SPEED)
            .with_vision(PLAYER_VISION);
        let id = self.spawn(unit, pos)?;
        self.player = Some(id);
        self.update_fov();
        Ok(id)
    }

    /// Put an item on the ground.
    pub fn place_item(&mut self, pos: IVec2, item: Item) -> Result<()> {
        self.level
            .drop_item(pos, item)
            .map_err(|_| Error::InvalidArgument("position outside level"))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn now(&self) -> Instant {
        self.scheduler.now()
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn units(&self) -> &Units {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn player(&self) -> Option<UnitId> {
        self.player
    }

    pub fn player_unit(&self) -> Option<&Unit> {
        self.units.get(self.player?)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn log(&self) -> &MsgLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut MsgLog {
        &mut self.log
    }

    /// The turn loop is suspended until the player acts.
    pub fn is_waiting_for_player(&self) -> bool {
        self.waiting_for_player
    }

    pub fn is_game_over(&self) -> bool {
        self.player.is_some_and(|p| !self.units.is_alive(p))
    }

    /// Run the turn loop until it is the player's turn, the per-frame turn
    /// budget runs out or the game ends.
    pub fn advance(&mut self) -> TurnStatus {
        if self.is_game_over() {
            return TurnStatus::GameOver;
        }
        if self.waiting_for_player {
            return TurnStatus::AwaitingInput;
        }

        for _ in 0..self.config.ai_turns_per_frame.max(1) {
            let Some(id) = self.scheduler.pop_next() else {
                return TurnStatus::Idle;
            };

            if !self.units.is_alive(id) {
                log::warn!("advance: dead unit {id} came up in the queue");
                self.scheduler.release(id);
                continue;
            }

            if Some(id) == self.player {
                self.waiting_for_player = true;
                self.update_fov();
                return TurnStatus::AwaitingInput;
            }

            match self.take_turn(id) {
                Some(delay) if self.units.is_alive(id) => {
                    if let Err(e) = self.scheduler.schedule(id, delay) {
                        log::warn!("advance: can't reschedule {id}: {e}");
                    }
                }
                _ => self.scheduler.release(id),
            }

            if self.is_game_over() {
                msg!(self.log; "Game over.");
                return TurnStatus::GameOver;
            }
        }

        TurnStatus::Busy
    }

    /// Perform the player's action and hand the turn back to the
    /// scheduler.
    ///
    /// Returns the time the action took. Failed actions take no time and
    /// the player keeps the turn.
    pub fn act(&mut self, action: Action) -> Result<i64> {
        let player = self.player.ok_or(Error::InvalidArgument("no player"))?;
        if !self.waiting_for_player {
            return Err(Error::InvalidArgument("not the player's turn"));
        }

        let cost = self.execute(player, action)?;
        self.waiting_for_player = false;
        if self.units.is_alive(player) {
            self.scheduler.schedule(player, cost)?;
        }
        self.update_fov();
        Ok(cost)
    }
}
