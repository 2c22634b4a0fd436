use engine::prelude::*;
use ui::prelude::*;

/// Size of the printed map window.
const VIEW_SIZE: IVec2 = IVec2::new(80, 30);

/// Message lines shown under the map.
const LOG_LINES: usize = 8;

/// Play a key script against the runtime, then wait out `turns` more
/// player turns.
pub fn play(
    r: &mut Runtime,
    c: &mut Controller,
    keys: &[KeyTyped],
    turns: usize,
) -> TurnStatus {
    let wait: KeyTyped = ' '.into();
    let script =
        keys.iter().copied().chain(std::iter::repeat(wait).take(turns));

    let mut status = settle(r, c);
    for key in script {
        if c.quit_requested() || status != TurnStatus::AwaitingInput {
            break;
        }
        c.send_key(r, key);
        status = settle(r, c);
    }
    status
}

/// Run frames until the game needs the player or stops.
fn settle(r: &mut Runtime, c: &mut Controller) -> TurnStatus {
    loop {
        match c.update(r) {
            TurnStatus::Busy => continue,
            status => return status,
        }
    }
}

/// Text rendering of the current game state.
pub fn screen(r: &Runtime, c: &Controller) -> Vec<String> {
    let center = r.player_unit().map_or(IVec2::ZERO, |u| u.pos());
    let view = MapView::new(VIEW_SIZE, center, r.level());
    let mut ret = view.render(r, VIEW_SIZE);

    ret.push(String::new());
    if let Some(u) = r.player_unit() {
        let hp = u.chassis.as_ref().map_or(0, |f| f.durability.max(0));
        ret.push(format!("{} [{hp}] T:{}", u.name, r.now()));
    }

    if *c.mode() != Mode::OnMap {
        ret.push(format!("-- {:?} --", c.mode()));
        let entries = c.menu_entries(r);
        let range = c.menu().visible(entries.len());
        let shown = entries.iter().enumerate().skip(range.start);
        for (i, e) in shown.take(range.len()) {
            let mark = if i == c.menu().selection() { '>' } else { ' ' };
            ret.push(format!("{mark} {e}"));
        }
    }

    ret.push(String::new());
    ret.extend(r.log().tail(LOG_LINES).map(|s| s.to_string()));
    ret
}
