use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Tile delta with y growing downward.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Step applied to a vertical menu highlight; horizontal keys do not navigate menus.
    pub const fn menu_step(self) -> Option<i32> {
        match self {
            Direction::Up => Some(-1),
            Direction::Down => Some(1),
            Direction::Left | Direction::Right => None,
        }
    }
}

/// Discrete map-screen input. `Cancel` only backs out of the current state;
/// `Back` does the same but lets the host leave the map when nothing was open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapInput {
    Move(Direction),
    Confirm,
    Cancel,
    Back,
    ToggleInfo,
}

pub fn map_key_code(key: KeyCode) -> Option<MapInput> {
    match key {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(MapInput::Move(Direction::Up)),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(MapInput::Move(Direction::Down)),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(MapInput::Move(Direction::Left)),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(MapInput::Move(Direction::Right)),
        KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space | KeyCode::KeyZ => {
            Some(MapInput::Confirm)
        }
        KeyCode::KeyX => Some(MapInput::Cancel),
        KeyCode::Escape => Some(MapInput::Back),
        KeyCode::Tab => Some(MapInput::ToggleInfo),
        _ => None,
    }
}

/// Parses the key names used by replay scripts (`ArrowUp`, `KeyZ`, `Escape`, ...).
pub fn key_code_from_name(name: &str) -> Option<KeyCode> {
    let key = match name {
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "KeyW" => KeyCode::KeyW,
        "KeyA" => KeyCode::KeyA,
        "KeyS" => KeyCode::KeyS,
        "KeyD" => KeyCode::KeyD,
        "KeyZ" => KeyCode::KeyZ,
        "KeyX" => KeyCode::KeyX,
        "Enter" => KeyCode::Enter,
        "NumpadEnter" => KeyCode::NumpadEnter,
        "Space" => KeyCode::Space,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_to_same_directions() {
        assert_eq!(
            map_key_code(KeyCode::ArrowLeft),
            Some(MapInput::Move(Direction::Left))
        );
        assert_eq!(
            map_key_code(KeyCode::KeyA),
            Some(MapInput::Move(Direction::Left))
        );
        assert_eq!(
            map_key_code(KeyCode::KeyS),
            Some(MapInput::Move(Direction::Down))
        );
    }

    #[test]
    fn confirm_cancel_and_back_are_distinct() {
        assert_eq!(map_key_code(KeyCode::KeyZ), Some(MapInput::Confirm));
        assert_eq!(map_key_code(KeyCode::Space), Some(MapInput::Confirm));
        assert_eq!(map_key_code(KeyCode::KeyX), Some(MapInput::Cancel));
        assert_eq!(map_key_code(KeyCode::Escape), Some(MapInput::Back));
        assert_eq!(map_key_code(KeyCode::Tab), Some(MapInput::ToggleInfo));
        assert_eq!(map_key_code(KeyCode::F5), None);
    }

    #[test]
    fn script_names_round_trip_through_keymap() {
        let key = key_code_from_name("ArrowUp").expect("known key");
        assert_eq!(map_key_code(key), Some(MapInput::Move(Direction::Up)));
        assert!(key_code_from_name("Hyper").is_none());
    }

    #[test]
    fn only_vertical_directions_step_menus() {
        assert_eq!(Direction::Up.menu_step(), Some(-1));
        assert_eq!(Direction::Down.menu_step(), Some(1));
        assert_eq!(Direction::Left.menu_step(), None);
        assert_eq!(Direction::Right.delta(), (1, 0));
    }
}
