//! Game user interface machinery

pub mod prelude {
    pub use crate::{
        cell_view, CellView, Controller, InputAction, InputMap, KeyTyped,
        MapView, Menu, Mode,
    };
}

mod controller;
pub use controller::{Controller, Mode};

mod input;
pub use input::{parse_keys, InputAction, InputMap, Key, KeyTyped, Mods};

mod menu;
pub use menu::{Menu, PAGE_SIZE};

mod tile_display;
pub use tile_display::{cell_view, CellView, MapView};
