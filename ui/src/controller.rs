//! Command state machine between key presses and the game runtime.

use std::collections::VecDeque;

use engine::{prelude::*, SlotRef, WeaponClass};

use crate::{InputAction, InputMap, KeyTyped, Menu};

/// Which screen is interpreting input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    OnMap,
    /// Picking an equipped weapon to use.
    SelectingAbility,
    /// Picking a target for ranged fire, all ready ranged weapons fire if
    /// no weapon is given.
    Targeting {
        weapon: Option<SlotRef>,
        targets: Vec<UnitId>,
        current: usize,
    },
    /// Text shown until any key is pressed.
    TextPause {
        lines: Vec<String>,
        then: Box<Mode>,
    },
    InventoryScreen,
    /// Choosing what to do with an inventory item.
    InventorySelect {
        item: usize,
    },
    /// Equipment slots of the player's chassis.
    EquipScreen,
    /// Inventory items that fit an empty slot.
    EquipInventory {
        candidates: Vec<usize>,
    },
    PickUp,
    HelpScreen,
}

const ITEM_OPTIONS: [&str; 3] = ["Equip", "Drop", "Describe"];

/// Player input handling with buffering of keys that arrive while other
/// units are taking their turns.
#[derive(Clone, Debug)]
pub struct Controller {
    mode: Mode,
    menu: Menu,
    /// Pending menu selection for modes that nest menus.
    parent_menu: Menu,
    buffer: VecDeque<KeyTyped>,
    input_map: InputMap,
    quit: bool,
}

impl Default for Controller {
    fn default() -> Self {
        Controller::new(InputMap::default())
    }
}

impl Controller {
    pub fn new(input_map: InputMap) -> Self {
        Controller {
            mode: Mode::OnMap,
            menu: Default::default(),
            parent_menu: Default::default(),
            buffer: Default::default(),
            input_map,
            quit: false,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn input_map(&self) -> &InputMap {
        &self.input_map
    }

    /// Keys waiting for the player's turn, oldest first.
    pub fn buffered(&self) -> impl Iterator<Item = &KeyTyped> + '_ {
        self.buffer.iter()
    }

    /// Quit command was given.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Feed a key press.
    ///
    /// Keys are interpreted right away on the player's turn and queued
    /// otherwise. Quit is never queued, and keys after game over are
    /// dropped.
    pub fn send_key(&mut self, r: &mut Runtime, key: KeyTyped) {
        if self.input_map.get(key) == Some(InputAction::QuitGame) {
            log::info!("quit requested");
            self.quit = true;
            return;
        }

        if r.is_game_over() {
            log::debug!("game over, ignoring {key}");
            return;
        }

        if r.is_waiting_for_player() && self.buffer.is_empty() {
            self.process(r, key);
        } else {
            self.buffer.push_back(key);
        }
    }

    /// Run the turn loop for one frame, replaying buffered keys whenever
    /// the player's turn comes up.
    pub fn update(&mut self, r: &mut Runtime) -> TurnStatus {
        loop {
            let status = r.advance();
            if status == TurnStatus::AwaitingInput {
                if let Some(key) = self.buffer.pop_front() {
                    self.process(r, key);
                    continue;
                }
            }
            return status;
        }
    }

    fn process(&mut self, r: &mut Runtime, key: KeyTyped) {
        let input = self.input_map.get(key);
        log::trace!("{key} -> {input:?} in {:?}", self.mode);

        match self.mode.clone() {
            Mode::TextPause { then, .. } => self.mode = *then,
            Mode::HelpScreen => self.mode = Mode::OnMap,
            mode => {
                let Some(input) = input else {
                    log::debug!("unbound key {key}");
                    return;
                };
                self.dispatch(r, mode, input);
            }
        }
    }

    fn dispatch(&mut self, r: &mut Runtime, mode: Mode, input: InputAction) {
        use InputAction::*;

        let Some(player) = r.player_unit() else {
            return;
        };

        match mode {
            Mode::OnMap => match input {
                Pass => self.act(r, Action::Wait),
                Fire => self.start_targeting(r, None),
                Abilities => self.enter(Mode::SelectingAbility),
                Inventory => self.enter(Mode::InventoryScreen),
                Equipment => self.enter(Mode::EquipScreen),
                PickUp => match r.level().items_at(player.pos()).len() {
                    0 => msg!(r.log_mut(); "There is nothing here."),
                    1 => self.act(r, Action::PickUp(0)),
                    _ => self.enter(Mode::PickUp),
                },
                Help => self.enter(Mode::HelpScreen),
                _ => {
                    if let Some(dir) = input.dir() {
                        self.act(r, Action::Move(dir));
                    }
                }
            },

            Mode::SelectingAbility => {
                let abilities = ability_slots(player);
                match self.navigate(input, abilities.len()) {
                    Some(i) => {
                        let slot = abilities[i];
                        if player
                            .equipment(slot)
                            .is_some_and(|e| e.is_targetted())
                        {
                            self.start_targeting(r, Some(slot));
                        } else {
                            msg!(r.log_mut(); "You can't use that yet.");
                            self.mode = Mode::OnMap;
                        }
                    }
                    None => self.cancel_to(input, Mode::OnMap),
                }
            }

            Mode::Targeting {
                weapon,
                targets,
                current,
            } => {
                if targets.is_empty() {
                    self.mode = Mode::OnMap;
                    return;
                }
                match input {
                    Confirm => {
                        let target = targets[current % targets.len()];
                        self.mode = Mode::OnMap;
                        self.act(r, Action::Fire { weapon, target });
                    }
                    Cancel => self.mode = Mode::OnMap,
                    Cycle | East | South | SouthEast | NorthEast => {
                        self.mode = Mode::Targeting {
                            weapon,
                            current: (current + 1) % targets.len(),
                            targets,
                        };
                    }
                    West | North | NorthWest | SouthWest => {
                        self.mode = Mode::Targeting {
                            weapon,
                            current: (current + targets.len() - 1)
                                % targets.len(),
                            targets,
                        };
                    }
                    _ => {}
                }
            }

            Mode::InventoryScreen => {
                match self.navigate(input, player.inventory.len()) {
                    Some(item) => {
                        self.parent_menu = self.menu;
                        self.menu = Menu::default();
                        self.mode = Mode::InventorySelect { item };
                    }
                    None => self.cancel_to(input, Mode::OnMap),
                }
            }

            Mode::InventorySelect { item } => {
                let Some(selected) = player.inventory.get(item) else {
                    self.mode = Mode::InventoryScreen;
                    return;
                };
                match self.navigate(input, ITEM_OPTIONS.len()) {
                    Some(0) => {
                        self.mode = Mode::OnMap;
                        self.act(r, Action::Equip(item));
                    }
                    Some(1) => {
                        self.mode = Mode::OnMap;
                        self.act(r, Action::Drop(item));
                    }
                    Some(_) => {
                        self.mode = Mode::TextPause {
                            lines: selected.describe(),
                            then: Box::new(Mode::InventorySelect { item }),
                        };
                    }
                    None => {
                        if input == Cancel {
                            self.menu = self.parent_menu;
                            self.mode = Mode::InventoryScreen;
                        }
                    }
                }
            }

            Mode::EquipScreen => {
                let Some(chassis) = player.chassis() else {
                    msg!(r.log_mut(); "You have no chassis.");
                    self.mode = Mode::OnMap;
                    return;
                };
                match self.navigate(input, chassis.total_slots()) {
                    Some(flat) if chassis.get_flat(flat).is_some() => {
                        self.mode = Mode::OnMap;
                        self.act(r, Action::Unequip(flat));
                    }
                    Some(flat) => {
                        let family = chassis.slot_family(flat);
                        let candidates: Vec<usize> = player
                            .inventory
                            .iter()
                            .enumerate()
                            .filter(|(_, i)| {
                                family.is_some()
                                    && SlotFamily::of(i.category()) == family
                            })
                            .map(|(n, _)| n)
                            .collect();
                        if candidates.is_empty() {
                            msg!(r.log_mut(); "Nothing to equip there.");
                        } else {
                            self.parent_menu = self.menu;
                            self.menu = Menu::default();
                            self.mode = Mode::EquipInventory { candidates };
                        }
                    }
                    None => self.cancel_to(input, Mode::OnMap),
                }
            }

            Mode::EquipInventory { candidates } => {
                match self.navigate(input, candidates.len()) {
                    Some(i) => {
                        self.mode = Mode::OnMap;
                        self.act(r, Action::Equip(candidates[i]));
                    }
                    None => {
                        if input == Cancel {
                            self.menu = self.parent_menu;
                            self.mode = Mode::EquipScreen;
                        }
                    }
                }
            }

            Mode::PickUp => {
                let n = r.level().items_at(player.pos()).len();
                match self.navigate(input, n) {
                    Some(i) => {
                        self.mode = Mode::OnMap;
                        self.act(r, Action::PickUp(i));
                    }
                    None => self.cancel_to(input, Mode::OnMap),
                }
            }

            // Handled before dispatch.
            Mode::TextPause { .. } | Mode::HelpScreen => {}
        }
    }

    /// Move the menu cursor, returns the selection on confirm.
    fn navigate(&mut self, input: InputAction, len: usize) -> Option<usize> {
        use InputAction::*;
        match input {
            North | West => self.menu.up(len),
            South | East | Cycle => self.menu.down(len),
            NorthEast => self.menu.page_up(len),
            SouthEast => self.menu.page_down(len),
            Confirm => return self.menu.selected(len),
            _ => {}
        }
        None
    }

    fn cancel_to(&mut self, input: InputAction, mode: Mode) {
        if input == InputAction::Cancel {
            self.mode = mode;
        }
    }

    fn enter(&mut self, mode: Mode) {
        self.menu = Menu::default();
        self.mode = mode;
    }

    fn start_targeting(&mut self, r: &mut Runtime, weapon: Option<SlotRef>) {
        let now = r.now();
        let has_weapon =
            r.player_unit().and_then(|u| u.chassis()).is_some_and(|c| {
                match weapon {
                    Some(slot) => c.get(slot).is_some_and(|i| i.is_ready(now)),
                    None => c.ranged().any(|(_, i)| i.is_ready(now)),
                }
            });
        if !has_weapon {
            msg!(r.log_mut(); "No ranged weapons ready.");
            return;
        }

        let targets = visible_targets(r);
        if targets.is_empty() {
            msg!(r.log_mut(); "No targets in sight.");
            return;
        }
        self.mode = Mode::Targeting {
            weapon,
            targets,
            current: 0,
        };
    }

    fn act(&mut self, r: &mut Runtime, action: Action) {
        if let Err(e) = r.act(action) {
            log::debug!("{action:?} failed: {e}");
            if let Error::Occupied(id) = e {
                if let Some(u) = r.unit(id) {
                    let name = u.name.clone();
                    msg!(r.log_mut(); "{name} is in the way.");
                }
            }
        }
    }

    /// Entry lines for the current menu mode.
    pub fn menu_entries(&self, r: &Runtime) -> Vec<String> {
        let Some(player) = r.player_unit() else {
            return Vec::new();
        };
        match &self.mode {
            Mode::SelectingAbility => ability_slots(player)
                .into_iter()
                .filter_map(|s| player.equipment(s))
                .map(|i| i.name())
                .collect(),
            Mode::Targeting {
                targets, current, ..
            } => targets
                .iter()
                .enumerate()
                .filter_map(|(n, &id)| {
                    let mark = if n == *current { '>' } else { ' ' };
                    r.unit(id).map(|u| format!("{mark} {}", u.name))
                })
                .collect(),
            Mode::TextPause { lines, .. } => lines.clone(),
            Mode::InventoryScreen => {
                player.inventory.iter().map(|i| i.name()).collect()
            }
            Mode::InventorySelect { .. } => {
                ITEM_OPTIONS.iter().map(|s| s.to_string()).collect()
            }
            Mode::EquipScreen => player
                .chassis()
                .map(|c| c.list_equipment())
                .unwrap_or_default(),
            Mode::EquipInventory { candidates } => candidates
                .iter()
                .filter_map(|&n| player.inventory.get(n))
                .map(|i| i.name())
                .collect(),
            Mode::PickUp => r
                .level()
                .items_at(player.pos())
                .iter()
                .map(|i| i.name())
                .collect(),
            Mode::HelpScreen => self.input_map.help_lines(),
            Mode::OnMap => Vec::new(),
        }
    }
}

/// Equipped items usable from the ability menu, ranged then tactical.
fn ability_slots(unit: &Unit) -> Vec<SlotRef> {
    let Some(c) = unit.chassis() else {
        return Vec::new();
    };
    c.all_items()
        .filter(|(_, i)| {
            matches!(
                i.weapon_class(),
                WeaponClass::Ranged | WeaponClass::Tactical
            )
        })
        .map(|(s, _)| s)
        .collect()
}

/// Live hostile units the player can see and reach, nearest first.
fn visible_targets(r: &Runtime) -> Vec<UnitId> {
    let Some(player) = r.player_unit() else {
        return Vec::new();
    };
    let range2 = player.vision_range * player.vision_range;
    let mut ret: Vec<(i32, UnitId)> = r
        .units()
        .live()
        .filter(|(_, u)| u.is_enemy_of(player))
        .filter(|(_, u)| r.level().is_visible(u.pos()))
        .map(|(id, u)| ((u.pos() - player.pos()).len2(), id))
        .filter(|(d, _)| *d < range2)
        .collect();
    ret.sort();
    ret.into_iter().map(|(_, id)| id).collect()
}
