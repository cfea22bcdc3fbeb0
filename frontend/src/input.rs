use lantern_core::device::{Button, InputPad};

/// A pad whose held set is fixed for the whole run (from `--hold`).
pub struct HeldPad {
    held: Vec<Button>,
}

impl HeldPad {
    pub fn new(held: Vec<Button>) -> Self {
        Self { held }
    }
}

impl InputPad for HeldPad {
    fn pressed(&self, button: Button) -> bool {
        self.held.contains(&button)
    }
}

/// Parse a button name (e.g., "a", "left"). Case-insensitive.
pub fn parse_button(name: &str) -> Option<Button> {
    match name.trim().to_ascii_lowercase().as_str() {
        "up" => Some(Button::Up),
        "down" => Some(Button::Down),
        "left" => Some(Button::Left),
        "right" => Some(Button::Right),
        "a" => Some(Button::A),
        "b" => Some(Button::B),
        _ => None,
    }
}

/// Parse a comma-separated hold list (e.g., "a,left"). Returns the first
/// unknown name on error.
pub fn parse_held(arg: Option<&str>) -> Result<Vec<Button>, String> {
    let Some(arg) = arg else {
        return Ok(Vec::new());
    };
    arg.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_button(s).ok_or_else(|| s.to_string()))
        .collect()
}
