//! Viewport event payloads
//!
//! Hosts deliver events in more than one representation: typed native events
//! and loosely-typed key/value records. Both implement [`EventPayload`], and
//! [`dispatch`] turns any payload into a [`ToolEvent`] for the active tool.

use glam::Vec2;
use serde_json::{Map, Value};

/// Key code of Escape
pub const KEY_CODE_ESCAPE: i64 = 27;

/// Key code of the left Control key
pub const KEY_CODE_LEFT_CONTROL: i64 = 0xFFE3;

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Only Shift held
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

impl MouseButton {
    /// Button from its host number (1 = left, 2 = middle, 3 = right)
    pub fn from_number(number: i64) -> Self {
        match number {
            1 => MouseButton::Primary,
            2 => MouseButton::Middle,
            3 => MouseButton::Secondary,
            n => MouseButton::Other(n.clamp(0, u8::MAX as i64) as u8),
        }
    }

    /// Button from a host name such as `BUTTON1` or `right`
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        if name.contains("right") || name.contains("button3") || name.ends_with('3') {
            Some(MouseButton::Secondary)
        } else if name.contains("middle") || name.contains("button2") || name.ends_with('2') {
            Some(MouseButton::Middle)
        } else if name.contains("left") || name.contains("button1") || name.ends_with('1') {
            Some(MouseButton::Primary)
        } else {
            None
        }
    }
}

/// Press state of a button or key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Down,
    Up,
}

impl ButtonState {
    fn parse(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name.contains("down") || name.contains("press") {
            Some(ButtonState::Down)
        } else if name.contains("up") || name.contains("release") {
            Some(ButtonState::Up)
        } else {
            None
        }
    }
}

/// Keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    LeftControl,
    /// Printable key, stored upper-case
    Character(char),
    /// Any other key code
    Code(i64),
}

impl Key {
    /// Key from a host key code
    pub fn from_code(code: i64) -> Self {
        match code {
            KEY_CODE_ESCAPE => Key::Escape,
            KEY_CODE_LEFT_CONTROL => Key::LeftControl,
            c => match u8::try_from(c) {
                Ok(b) if b.is_ascii_graphic() => Key::Character(b.to_ascii_uppercase() as char),
                _ => Key::Code(c),
            },
        }
    }

    /// Key from a host key name
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "esc" | "escape" => Some(Key::Escape),
            "left_control" | "leftcontrol" | "control" | "ctrl" => Some(Key::LeftControl),
            _ => {
                let mut chars = name.trim().chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Character(c.to_ascii_uppercase())),
                    _ => None,
                }
            }
        }
    }
}

/// Broad kind of an incoming event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Location,
    MouseButton,
    Keyboard,
    Unknown,
}

/// Capabilities every host event representation provides
pub trait EventPayload {
    fn category(&self) -> EventCategory;
    fn position(&self) -> Option<Vec2>;
    fn button(&self) -> Option<MouseButton>;
    fn state(&self) -> Option<ButtonState>;
    fn key(&self) -> Option<Key>;
    fn modifiers(&self) -> Modifiers;
}

/// Typed event as delivered by the native scene-graph layer
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    Location {
        position: Vec2,
        modifiers: Modifiers,
    },
    MouseButton {
        position: Vec2,
        button: u8,
        state: ButtonState,
        modifiers: Modifiers,
    },
    Keyboard {
        key: Key,
        state: ButtonState,
        modifiers: Modifiers,
    },
}

impl NativeEvent {
    /// Pointer moved
    pub fn moved(x: f32, y: f32) -> Self {
        NativeEvent::Location {
            position: Vec2::new(x, y),
            modifiers: Modifiers::default(),
        }
    }

    /// Button pressed
    pub fn pressed(x: f32, y: f32, button: u8, modifiers: Modifiers) -> Self {
        NativeEvent::MouseButton {
            position: Vec2::new(x, y),
            button,
            state: ButtonState::Down,
            modifiers,
        }
    }

    /// Key pressed
    pub fn key_down(key: Key) -> Self {
        NativeEvent::Keyboard {
            key,
            state: ButtonState::Down,
            modifiers: Modifiers::default(),
        }
    }
}

impl EventPayload for NativeEvent {
    fn category(&self) -> EventCategory {
        match self {
            NativeEvent::Location { .. } => EventCategory::Location,
            NativeEvent::MouseButton { .. } => EventCategory::MouseButton,
            NativeEvent::Keyboard { .. } => EventCategory::Keyboard,
        }
    }

    fn position(&self) -> Option<Vec2> {
        match self {
            NativeEvent::Location { position, .. } | NativeEvent::MouseButton { position, .. } => {
                Some(*position)
            }
            NativeEvent::Keyboard { .. } => None,
        }
    }

    fn button(&self) -> Option<MouseButton> {
        match self {
            NativeEvent::MouseButton { button, .. } => Some(MouseButton::from_number(*button as i64)),
            _ => None,
        }
    }

    fn state(&self) -> Option<ButtonState> {
        match self {
            NativeEvent::MouseButton { state, .. } | NativeEvent::Keyboard { state, .. } => {
                Some(*state)
            }
            NativeEvent::Location { .. } => None,
        }
    }

    fn key(&self) -> Option<Key> {
        match self {
            NativeEvent::Keyboard { key, .. } => Some(*key),
            _ => None,
        }
    }

    fn modifiers(&self) -> Modifiers {
        match self {
            NativeEvent::Location { modifiers, .. }
            | NativeEvent::MouseButton { modifiers, .. }
            | NativeEvent::Keyboard { modifiers, .. } => *modifiers,
        }
    }
}

/// Loosely-typed event record (`{"Type": "SoMouseButtonEvent", ...}`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyValueEvent {
    fields: Map<String, Value>,
}

impl KeyValueEvent {
    /// Wrap a key/value map
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a JSON value; only objects are accepted
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::new(fields)),
            _ => None,
        }
    }

    /// Parse a JSON object
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let fields: Map<String, Value> = serde_json::from_str(text)?;
        Ok(Self::new(fields))
    }

    /// First non-null value under any of the aliases
    fn get(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|k| self.fields.get(*k))
            .find(|v| !v.is_null())
    }

    fn event_type(&self) -> String {
        self.get(&["Type", "type"])
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    fn flag(&self, aliases: &[&str]) -> bool {
        self.get(aliases).and_then(Value::as_bool).unwrap_or(false)
    }
}

impl EventPayload for KeyValueEvent {
    fn category(&self) -> EventCategory {
        let event_type = self.event_type();
        if event_type.contains("button") || event_type.contains("mouse") {
            EventCategory::MouseButton
        } else if event_type.contains("location") || self.fields.contains_key("position") {
            EventCategory::Location
        } else if event_type.contains("keyboard") || self.fields.contains_key("key") {
            EventCategory::Keyboard
        } else {
            EventCategory::Unknown
        }
    }

    fn position(&self) -> Option<Vec2> {
        match self.get(&["Position", "pos", "position"])? {
            Value::Array(items) if items.len() >= 2 => {
                let x = items[0].as_f64()?;
                let y = items[1].as_f64()?;
                Some(Vec2::new(x as f32, y as f32))
            }
            Value::Object(map) => {
                let x = map.get("x")?.as_f64()?;
                let y = map.get("y")?.as_f64()?;
                Some(Vec2::new(x as f32, y as f32))
            }
            _ => None,
        }
    }

    fn button(&self) -> Option<MouseButton> {
        match self.get(&["Button", "button", "button1"])? {
            Value::String(name) => MouseButton::parse(name),
            Value::Number(n) => n.as_i64().map(MouseButton::from_number),
            _ => None,
        }
    }

    fn state(&self) -> Option<ButtonState> {
        match self.get(&["State", "state", "Action"]) {
            Some(Value::String(name)) => ButtonState::parse(name),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(1) => Some(ButtonState::Down),
                Some(0) => Some(ButtonState::Up),
                _ => None,
            },
            Some(Value::Bool(down)) => Some(if *down {
                ButtonState::Down
            } else {
                ButtonState::Up
            }),
            _ => ButtonState::parse(&self.event_type()),
        }
    }

    fn key(&self) -> Option<Key> {
        match self.get(&["Key", "key"])? {
            Value::String(name) => Key::parse(name),
            Value::Number(n) => n.as_i64().map(Key::from_code),
            _ => None,
        }
    }

    fn modifiers(&self) -> Modifiers {
        Modifiers {
            shift: self.flag(&["ShiftDown", "shift"]),
            ctrl: self.flag(&["CtrlDown", "ctrl"]),
            alt: self.flag(&["AltDown", "alt"]),
        }
    }
}

/// Event as seen by the wall tool
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolEvent {
    PointerMove {
        position: Vec2,
    },
    ButtonDown {
        button: MouseButton,
        position: Option<Vec2>,
        modifiers: Modifiers,
    },
    KeyDown {
        key: Key,
        modifiers: Modifiers,
    },
    KeyUp {
        key: Key,
    },
}

/// Classify any event payload.
///
/// Returns None for events the tool does not react to (button releases,
/// moves without a position, unknown records).
pub fn dispatch(payload: &dyn EventPayload) -> Option<ToolEvent> {
    match payload.category() {
        EventCategory::Location => payload
            .position()
            .map(|position| ToolEvent::PointerMove { position }),
        EventCategory::MouseButton => match payload.state() {
            Some(ButtonState::Down) => Some(ToolEvent::ButtonDown {
                button: payload.button().unwrap_or(MouseButton::Primary),
                position: payload.position(),
                modifiers: payload.modifiers(),
            }),
            _ => None,
        },
        EventCategory::Keyboard => {
            let key = payload.key()?;
            match payload.state() {
                Some(ButtonState::Up) => Some(ToolEvent::KeyUp { key }),
                _ => Some(ToolEvent::KeyDown {
                    key,
                    modifiers: payload.modifiers(),
                }),
            }
        }
        EventCategory::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kv(value: Value) -> KeyValueEvent {
        KeyValueEvent::from_value(value).unwrap()
    }

    #[test]
    fn test_native_events() {
        assert_eq!(
            dispatch(&NativeEvent::moved(1.0, 2.0)),
            Some(ToolEvent::PointerMove {
                position: Vec2::new(1.0, 2.0)
            })
        );
        assert_eq!(
            dispatch(&NativeEvent::pressed(1.0, 2.0, 3, Modifiers::default())),
            Some(ToolEvent::ButtonDown {
                button: MouseButton::Secondary,
                position: Some(Vec2::new(1.0, 2.0)),
                modifiers: Modifiers::default(),
            })
        );

        let release = NativeEvent::MouseButton {
            position: Vec2::ZERO,
            button: 1,
            state: ButtonState::Up,
            modifiers: Modifiers::default(),
        };
        assert_eq!(dispatch(&release), None);
    }

    #[test]
    fn test_key_value_mouse_events() {
        let down = kv(json!({
            "Type": "SoMouseButtonEvent",
            "State": "DOWN",
            "Button": "BUTTON1",
            "Position": [10, 20],
            "ShiftDown": true,
        }));
        assert_eq!(
            dispatch(&down),
            Some(ToolEvent::ButtonDown {
                button: MouseButton::Primary,
                position: Some(Vec2::new(10.0, 20.0)),
                modifiers: Modifiers::shift(),
            })
        );

        let numeric = kv(json!({"type": "mouse", "state": 1, "button": 3}));
        assert!(matches!(
            dispatch(&numeric),
            Some(ToolEvent::ButtonDown {
                button: MouseButton::Secondary,
                position: None,
                ..
            })
        ));

        // Press implied by the type name when no state is given
        let press = kv(json!({"Type": "ButtonPress", "pos": {"x": 1.0, "y": 2.0}}));
        assert!(matches!(
            dispatch(&press),
            Some(ToolEvent::ButtonDown {
                button: MouseButton::Primary,
                ..
            })
        ));

        let up = kv(json!({"Type": "SoMouseButtonEvent", "State": "UP"}));
        assert_eq!(dispatch(&up), None);
    }

    #[test]
    fn test_key_value_location_and_keys() {
        let moved = kv(json!({"position": [5.5, 6.5]}));
        assert_eq!(
            dispatch(&moved),
            Some(ToolEvent::PointerMove {
                position: Vec2::new(5.5, 6.5)
            })
        );

        let escape = kv(json!({"Type": "SoKeyboardEvent", "Key": "Escape"}));
        assert_eq!(
            dispatch(&escape),
            Some(ToolEvent::KeyDown {
                key: Key::Escape,
                modifiers: Modifiers::default()
            })
        );

        let code = kv(json!({"key": 27}));
        assert!(matches!(
            dispatch(&code),
            Some(ToolEvent::KeyDown {
                key: Key::Escape,
                ..
            })
        ));

        let g = kv(json!({"key": "g", "state": "released"}));
        assert_eq!(
            dispatch(&g),
            Some(ToolEvent::KeyUp {
                key: Key::Character('G')
            })
        );

        assert_eq!(dispatch(&kv(json!({"Type": "Timer"}))), None);
    }

    #[test]
    fn test_from_json() {
        let event = KeyValueEvent::from_json(r#"{"Type": "SoLocation2Event", "Position": [3, 4]}"#)
            .unwrap();
        assert_eq!(event.category(), EventCategory::Location);
        assert!(KeyValueEvent::from_value(json!([1, 2])).is_none());
    }

    #[test]
    fn test_button_and_key_parsing() {
        assert_eq!(MouseButton::parse("right"), Some(MouseButton::Secondary));
        assert_eq!(MouseButton::parse("BUTTON2"), Some(MouseButton::Middle));
        assert_eq!(MouseButton::parse("wheel"), None);
        assert_eq!(Key::from_code(KEY_CODE_LEFT_CONTROL), Key::LeftControl);
        assert_eq!(Key::from_code(b'a' as i64), Key::Character('A'));
        assert_eq!(Key::parse("ESC"), Some(Key::Escape));
        assert_eq!(Key::parse("PageUp"), None);
    }
}
