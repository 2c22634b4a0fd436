use std::{fmt, str::FromStr};

use bitflags::bitflags;
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use util::{Dir, IndexMap};

/// Logical key identity, already decoded from hardware events.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    /// Printable character, always lowercase for letters. Shifted letters
    /// carry the shift in the modifier mask.
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Escape,
    Tab,
    Backspace,
}

bitflags! {
    #[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug)]
    pub struct Mods: u8 {
        const SHIFT = 0x1;
        const ALT = 0x2;
        const CTRL = 0x4;
    }
}

/// Key press with modifier state.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct KeyTyped {
    key: Key,
    mods: Mods,
}

impl KeyTyped {
    pub fn new(key: Key, mods: Mods) -> Self {
        // Normalize uppercase letters into lowercase plus shift.
        match key {
            Key::Char(c) if c.is_uppercase() => KeyTyped {
                key: Key::Char(c.to_ascii_lowercase()),
                mods: mods | Mods::SHIFT,
            },
            _ => KeyTyped { key, mods },
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn mods(&self) -> Mods {
        self.mods
    }
}

impl From<Key> for KeyTyped {
    fn from(key: Key) -> Self {
        KeyTyped::new(key, Mods::empty())
    }
}

impl From<char> for KeyTyped {
    fn from(c: char) -> Self {
        KeyTyped::new(Key::Char(c), Mods::empty())
    }
}

const NAMED_KEYS: [(&str, Key); 13] = [
    ("Up", Key::Up),
    ("Down", Key::Down),
    ("Left", Key::Left),
    ("Right", Key::Right),
    ("Home", Key::Home),
    ("End", Key::End),
    ("PgUp", Key::PageUp),
    ("PgDn", Key::PageDown),
    ("Ret", Key::Enter),
    ("Esc", Key::Escape),
    ("Tab", Key::Tab),
    ("Bksp", Key::Backspace),
    ("Sp", Key::Char(' ')),
];

impl FromStr for KeyTyped {
    type Err = String;

    /// Parse emacs style key descriptions, `"S-q"`, `"C-c"`, `"PgUp"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mods = Mods::empty();
        let mut rest = s;
        while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
            mods |= match &rest[..1] {
                "S" => Mods::SHIFT,
                "A" => Mods::ALT,
                "C" => Mods::CTRL,
                _ => return Err(format!("bad modifier in {s:?}")),
            };
            rest = &rest[2..];
        }

        if let Some((_, key)) = NAMED_KEYS.iter().find(|(n, _)| *n == rest) {
            return Ok(KeyTyped::new(*key, mods));
        }

        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(KeyTyped::new(Key::Char(c), mods)),
            _ => Err(format!("unknown key {s:?}")),
        }
    }
}

impl fmt::Display for KeyTyped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (m, prefix) in
            [(Mods::SHIFT, "S-"), (Mods::ALT, "A-"), (Mods::CTRL, "C-")]
        {
            if self.mods.contains(m) {
                write!(f, "{prefix}")?;
            }
        }
        match NAMED_KEYS.iter().find(|(_, k)| *k == self.key) {
            Some((name, _)) => write!(f, "{name}"),
            None => match self.key {
                Key::Char(c) => write!(f, "{c}"),
                _ => write!(f, "{:?}", self.key),
            },
        }
    }
}

/// Split a whitespace separated key script into key events.
pub fn parse_keys(script: &str) -> Result<Vec<KeyTyped>, String> {
    script.split_whitespace().map(|k| k.parse()).collect()
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum InputAction {
    North,
    South,
    West,
    East,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    Pass,
    Fire,
    Abilities,
    Inventory,
    Equipment,
    PickUp,
    Help,
    Cycle,
    Confirm,
    Cancel,
    QuitGame,
}

impl InputAction {
    pub fn dir(self) -> Option<Dir> {
        use InputAction::*;
        match self {
            North => Some(Dir::North),
            NorthEast => Some(Dir::NorthEast),
            East => Some(Dir::East),
            SouthEast => Some(Dir::SouthEast),
            South => Some(Dir::South),
            SouthWest => Some(Dir::SouthWest),
            West => Some(Dir::West),
            NorthWest => Some(Dir::NorthWest),
            _ => None,
        }
    }

    pub fn describe(self) -> &'static str {
        use InputAction::*;
        match self {
            North => "move north",
            South => "move south",
            West => "move west",
            East => "move east",
            NorthEast => "move northeast",
            NorthWest => "move northwest",
            SouthEast => "move southeast",
            SouthWest => "move southwest",
            Pass => "wait a turn",
            Fire => "fire ranged weapons",
            Abilities => "use equipment",
            Inventory => "inventory",
            Equipment => "equipment",
            PickUp => "pick up items",
            Help => "this help",
            Cycle => "next target",
            Confirm => "confirm",
            Cancel => "cancel",
            QuitGame => "quit",
        }
    }
}

#[derive(Clone, Debug, Deref, Eq, PartialEq)]
pub struct InputMap(IndexMap<KeyTyped, InputAction>);

impl Default for InputMap {
    fn default() -> Self {
        use InputAction::*;

        let mut ret: IndexMap<KeyTyped, InputAction> = Default::default();

        // NB. Order matters, first binding for command is the main binding
        // that's reported by key_for.
        for (k, cmd) in &[
            ("k", North),
            ("j", South),
            ("h", West),
            ("l", East),
            ("u", NorthEast),
            ("y", NorthWest),
            ("n", SouthEast),
            ("b", SouthWest),
            ("Up", North),
            ("Down", South),
            ("Left", West),
            ("Right", East),
            ("PgUp", NorthEast),
            ("Home", NorthWest),
            ("PgDn", SouthEast),
            ("End", SouthWest),
            (".", Pass),
            ("Sp", Pass),
            ("f", Fire),
            ("a", Abilities),
            ("i", Inventory),
            ("e", Equipment),
            ("g", PickUp),
            (",", PickUp),
            ("?", Help),
            ("Tab", Cycle),
            ("Ret", Confirm),
            ("Esc", Cancel),
            ("S-q", QuitGame),
        ] {
            match k.parse::<KeyTyped>() {
                Ok(key) => {
                    ret.insert(key, *cmd);
                }
                Err(e) => log::error!("InputMap::default: {e}"),
            }
        }

        InputMap(ret)
    }
}

impl InputMap {
    pub fn get(&self, key: KeyTyped) -> Option<InputAction> {
        self.0.get(&key).copied()
    }

    /// Find the key for the given action.
    pub fn key_for(&self, action: InputAction) -> Option<KeyTyped> {
        self.0
            .iter()
            .find_map(|(k, v)| (*v == action).then_some(*k))
    }

    /// Help screen text, one line per command with its main key.
    pub fn help_lines(&self) -> Vec<String> {
        let mut ret = Vec::new();
        for (k, a) in self.0.iter() {
            if self.key_for(*a) == Some(*k) {
                ret.push(format!("{:>5}  {}", k.to_string(), a.describe()));
            }
        }
        ret
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parsing() {
        let k: KeyTyped = "S-q".parse().unwrap();
        assert_eq!(k.key(), Key::Char('q'));
        assert_eq!(k.mods(), Mods::SHIFT);
        assert_eq!(k, KeyTyped::from('Q'));

        let k: KeyTyped = "C-A-PgUp".parse().unwrap();
        assert_eq!(k.key(), Key::PageUp);
        assert_eq!(k.mods(), Mods::CTRL | Mods::ALT);

        assert_eq!("-".parse::<KeyTyped>().unwrap(), KeyTyped::from('-'));
        assert_eq!("Sp".parse::<KeyTyped>().unwrap(), KeyTyped::from(' '));
        assert!("Foo".parse::<KeyTyped>().is_err());
        assert!("X-a".parse::<KeyTyped>().is_err());

        assert_eq!(parse_keys("k k  Ret").unwrap().len(), 3);
    }

    #[test]
    fn display_round_trip() {
        for s in ["S-q", "C-c", "PgDn", "Sp", "?", "A-Ret"] {
            assert_eq!(s.parse::<KeyTyped>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn quit_needs_shift() {
        let map = InputMap::default();
        assert_eq!(map.get(KeyTyped::from('q')), None);
        assert_eq!(map.get(KeyTyped::from('Q')), Some(InputAction::QuitGame));
        assert_eq!(
            map.key_for(InputAction::North),
            Some(KeyTyped::from('k'))
        );
    }

    #[test]
    fn help_lists_each_command_once() {
        let lines = InputMap::default().help_lines();
        assert_eq!(lines.len(), 19);
        assert!(lines.iter().any(|l| l.ends_with("S-q  quit")));
    }
}
