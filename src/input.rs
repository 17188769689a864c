use serde::Deserialize;
use smallvec::{smallvec, SmallVec};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Wheel units reported for one detent of a line-based scroll wheel.
pub const WHEEL_UNITS_PER_NOTCH: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    South,
    East,
    North,
    West,
    Select,
    Start,
    LeftShoulder,
    RightShoulder,
    LeftThumb,
    RightThumb,
}

/// Device state sampled once per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub keys: HashSet<KeyCode>,
    pub gamepad_buttons: HashSet<GamepadButton>,
    pub pointer: (f32, f32),
    pub mouse_buttons: HashSet<MouseButton>,
    /// Absolute wheel counter in wheel units.
    pub scroll: f32,
    pub frame: u64,
}

impl InputSnapshot {
    pub fn with_key(mut self, key: KeyCode) -> Self {
        self.keys.insert(key);
        self
    }

    pub fn with_mouse(mut self, button: MouseButton) -> Self {
        self.mouse_buttons.insert(button);
        self
    }

    pub fn with_gamepad(mut self, button: GamepadButton) -> Self {
        self.gamepad_buttons.insert(button);
        self
    }

    pub fn at_pointer(mut self, x: f32, y: f32) -> Self {
        self.pointer = (x, y);
        self
    }

    pub fn with_scroll(mut self, scroll: f32) -> Self {
        self.scroll = scroll;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Exit,
    ToggleMultithreading,
    NextScene,
    PreviousScene,
    Grab,
    DemoPin,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Exit,
        Action::ToggleMultithreading,
        Action::NextScene,
        Action::PreviousScene,
        Action::Grab,
        Action::DemoPin,
    ];

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "exit" => Some(Self::Exit),
            "toggle_multithreading" => Some(Self::ToggleMultithreading),
            "next_scene" => Some(Self::NextScene),
            "previous_scene" => Some(Self::PreviousScene),
            "grab" => Some(Self::Grab),
            "demo_pin" => Some(Self::DemoPin),
            _ => None,
        }
    }
}

/// Physical inputs that trigger one action. Any of them counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionBinding {
    pub keys: SmallVec<[KeyCode; 2]>,
    pub mouse: Option<MouseButton>,
    pub gamepad: Option<GamepadButton>,
}

impl ActionBinding {
    fn new(keys: SmallVec<[KeyCode; 2]>, mouse: Option<MouseButton>, gamepad: Option<GamepadButton>) -> Self {
        Self { keys, mouse, gamepad }
    }

    /// True while any bound input is down in `snapshot`.
    pub fn held(&self, snapshot: &InputSnapshot) -> bool {
        self.keys.iter().any(|key| snapshot.keys.contains(key))
            || self.mouse.is_some_and(|button| snapshot.mouse_buttons.contains(&button))
            || self.gamepad.is_some_and(|button| snapshot.gamepad_buttons.contains(&button))
    }

    /// True when some bound input is down in `current` but was up in `previous`.
    /// Without a previous snapshot nothing is reported.
    pub fn just_pressed(&self, previous: Option<&InputSnapshot>, current: &InputSnapshot) -> bool {
        let Some(previous) = previous else {
            return false;
        };
        let key_edge = self.keys.iter().any(|key| current.keys.contains(key) && !previous.keys.contains(key));
        let mouse_edge = self.mouse.is_some_and(|button| {
            current.mouse_buttons.contains(&button) && !previous.mouse_buttons.contains(&button)
        });
        let pad_edge = self.gamepad.is_some_and(|button| {
            current.gamepad_buttons.contains(&button) && !previous.gamepad_buttons.contains(&button)
        });
        key_edge || mouse_edge || pad_edge
    }
}

#[derive(Debug, Clone)]
pub struct ActionBindings {
    table: HashMap<Action, ActionBinding>,
}

impl ActionBindings {
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<InputConfigFile>(&contents) {
                Ok(config) => Self::with_key_overrides(config.into_overrides(&path.display().to_string())),
                Err(err) => {
                    log::warn!(
                        target: "jenga_lab::input",
                        "Failed to parse {}: {err}. Falling back to default bindings.",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    target: "jenga_lab::input",
                    "Failed to read {}: {err}. Falling back to default bindings.",
                    path.display()
                );
                Self::default()
            }
        }
    }

    fn with_key_overrides(overrides: HashMap<Action, SmallVec<[KeyCode; 2]>>) -> Self {
        let mut bindings = Self::default();
        for (action, keys) in overrides {
            if let Some(binding) = bindings.table.get_mut(&action) {
                binding.keys = keys;
            }
        }
        bindings
    }

    pub fn binding(&self, action: Action) -> &ActionBinding {
        &self.table[&action]
    }
}

impl Default for ActionBindings {
    fn default() -> Self {
        use GamepadButton as Pad;
        let table = HashMap::from([
            (Action::Exit, ActionBinding::new(smallvec![KeyCode::Escape], None, Some(Pad::Select))),
            (Action::ToggleMultithreading, ActionBinding::new(smallvec![KeyCode::KeyM], None, Some(Pad::South))),
            (
                Action::NextScene,
                ActionBinding::new(smallvec![KeyCode::NumpadAdd, KeyCode::Equal], None, Some(Pad::West)),
            ),
            (
                Action::PreviousScene,
                ActionBinding::new(smallvec![KeyCode::NumpadSubtract, KeyCode::Minus], None, Some(Pad::North)),
            ),
            (Action::Grab, ActionBinding::new(SmallVec::new(), Some(MouseButton::Left), Some(Pad::RightThumb))),
            (Action::DemoPin, ActionBinding::new(smallvec![KeyCode::KeyP], None, Some(Pad::East))),
        ]);
        Self { table }
    }
}

/// Rolling previous/current snapshot pair.
#[derive(Debug, Clone, Default)]
pub struct InputEdgeTracker {
    previous: Option<InputSnapshot>,
    current: InputSnapshot,
}

impl InputEdgeTracker {
    pub fn begin_frame(&mut self, snapshot: InputSnapshot) {
        self.current = snapshot;
    }

    pub fn just_pressed(&self, binding: &ActionBinding) -> bool {
        binding.just_pressed(self.previous.as_ref(), &self.current)
    }

    pub fn held(&self, binding: &ActionBinding) -> bool {
        binding.held(&self.current)
    }

    pub fn current(&self) -> &InputSnapshot {
        &self.current
    }

    /// Retains the current snapshot as next frame's previous one.
    pub fn end_frame(&mut self) {
        self.previous = Some(self.current.clone());
    }
}

/// Folds window and gamepad events into the live device state.
#[derive(Debug, Default)]
pub struct Input {
    state: InputSnapshot,
    frame: u64,
    pub mouse_delta: (f32, f32),
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::Key { code, pressed } => {
                toggle(&mut self.state.keys, code, pressed);
            }
            InputEvent::MouseButton { button, pressed } => {
                toggle(&mut self.state.mouse_buttons, button, pressed);
            }
            InputEvent::Gamepad { button, pressed } => {
                toggle(&mut self.state.gamepad_buttons, button, pressed);
            }
            InputEvent::CursorPos { x, y } => {
                self.state.pointer = (x, y);
            }
            InputEvent::Wheel { delta } => {
                self.state.scroll += delta;
            }
            InputEvent::MouseMove { dx, dy } => {
                self.mouse_delta.0 += dx;
                self.mouse_delta.1 += dy;
            }
            InputEvent::FocusLost => {
                self.state.keys.clear();
                self.state.mouse_buttons.clear();
            }
            InputEvent::Other => {}
        }
    }

    pub fn snapshot(&mut self) -> InputSnapshot {
        let mut snapshot = self.state.clone();
        snapshot.frame = self.frame;
        self.frame += 1;
        snapshot
    }

    pub fn right_held(&self) -> bool {
        self.state.mouse_buttons.contains(&MouseButton::Right)
    }

    pub fn clear_frame(&mut self) {
        self.mouse_delta = (0.0, 0.0);
    }
}

fn toggle<T: Eq + std::hash::Hash>(set: &mut HashSet<T>, value: T, pressed: bool) {
    if pressed {
        set.insert(value);
    } else {
        set.remove(&value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { code: KeyCode, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool },
    Gamepad { button: GamepadButton, pressed: bool },
    CursorPos { x: f32, y: f32 },
    Wheel { delta: f32 },
    MouseMove { dx: f32, dy: f32 },
    FocusLost,
    Other,
}

impl InputEvent {
    pub fn from_window_event(ev: &WindowEvent) -> Self {
        match ev {
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y * WHEEL_UNITS_PER_NOTCH,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                InputEvent::Wheel { delta }
            }
            WindowEvent::CursorMoved { position, .. } => {
                InputEvent::CursorPos { x: position.x as f32, y: position.y as f32 }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                InputEvent::MouseButton { button: *button, pressed: *state == ElementState::Pressed }
            }
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => InputEvent::Key { code, pressed: event.state == ElementState::Pressed },
                PhysicalKey::Unidentified(_) => InputEvent::Other,
            },
            WindowEvent::Focused(false) => InputEvent::FocusLost,
            _ => InputEvent::Other,
        }
    }

    pub fn from_device_event(ev: &DeviceEvent) -> Self {
        match ev {
            DeviceEvent::MouseMotion { delta: (dx, dy) } => {
                InputEvent::MouseMove { dx: *dx as f32, dy: *dy as f32 }
            }
            _ => InputEvent::Other,
        }
    }
}

#[cfg(feature = "gamepad")]
pub use gamepad::GamepadPoller;

#[cfg(feature = "gamepad")]
mod gamepad {
    use super::{GamepadButton, Input, InputEvent};
    use anyhow::{anyhow, Result};
    use gilrs::{Button, EventType, Gilrs};

    pub struct GamepadPoller {
        gilrs: Gilrs,
    }

    impl GamepadPoller {
        pub fn new() -> Result<Self> {
            let gilrs = Gilrs::new().map_err(|err| anyhow!("Failed to initialise gamepad support: {err}"))?;
            Ok(Self { gilrs })
        }

        pub fn poll(&mut self, input: &mut Input) {
            while let Some(event) = self.gilrs.next_event() {
                let (button, pressed) = match event.event {
                    EventType::ButtonPressed(button, _) => (button, true),
                    EventType::ButtonReleased(button, _) => (button, false),
                    EventType::Disconnected => {
                        log::info!(target: "jenga_lab::input", "Gamepad {} disconnected", event.id);
                        continue;
                    }
                    _ => continue,
                };
                if let Some(button) = map_button(button) {
                    input.push(InputEvent::Gamepad { button, pressed });
                }
            }
        }
    }

    fn map_button(button: Button) -> Option<GamepadButton> {
        Some(match button {
            Button::South => GamepadButton::South,
            Button::East => GamepadButton::East,
            Button::North => GamepadButton::North,
            Button::West => GamepadButton::West,
            Button::Select => GamepadButton::Select,
            Button::Start => GamepadButton::Start,
            Button::LeftTrigger => GamepadButton::LeftShoulder,
            Button::RightTrigger => GamepadButton::RightShoulder,
            Button::LeftThumb => GamepadButton::LeftThumb,
            Button::RightThumb => GamepadButton::RightThumb,
            _ => return None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct InputConfigFile {
    #[serde(default)]
    bindings: HashMap<String, Vec<String>>,
}

impl InputConfigFile {
    fn into_overrides(self, origin: &str) -> HashMap<Action, SmallVec<[KeyCode; 2]>> {
        let mut overrides = HashMap::new();
        for (action_name, keys) in self.bindings {
            let Some(action) = Action::from_str(&action_name.trim().to_lowercase()) else {
                log::warn!(target: "jenga_lab::input", "{origin}: unknown action '{action_name}', ignoring.");
                continue;
            };
            let mut parsed = SmallVec::new();
            for key in keys {
                match key_from_name(&key) {
                    Some(code) => parsed.push(code),
                    None => log::warn!(
                        target: "jenga_lab::input",
                        "{origin}: unknown key '{key}' for action '{action_name}', ignoring."
                    ),
                }
            }
            if parsed.is_empty() {
                log::warn!(
                    target: "jenga_lab::input",
                    "{origin}: action '{action_name}' has no valid keys, keeping defaults."
                );
                continue;
            }
            overrides.insert(action, parsed);
        }
        overrides
    }
}

fn key_from_name(raw: &str) -> Option<KeyCode> {
    let name = raw.trim().to_lowercase();
    let code = match name.as_str() {
        "escape" | "esc" => KeyCode::Escape,
        "space" => KeyCode::Space,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "equal" | "plus" | "=" => KeyCode::Equal,
        "minus" | "-" => KeyCode::Minus,
        "numpad_add" => KeyCode::NumpadAdd,
        "numpad_subtract" => KeyCode::NumpadSubtract,
        "page_up" => KeyCode::PageUp,
        "page_down" => KeyCode::PageDown,
        "up" => KeyCode::ArrowUp,
        "down" => KeyCode::ArrowDown,
        "left" => KeyCode::ArrowLeft,
        "right" => KeyCode::ArrowRight,
        "f1" => KeyCode::F1,
        "f2" => KeyCode::F2,
        "f3" => KeyCode::F3,
        "f4" => KeyCode::F4,
        other => return letter_or_digit(other),
    };
    Some(code)
}

fn letter_or_digit(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA,
        KeyCode::KeyB,
        KeyCode::KeyC,
        KeyCode::KeyD,
        KeyCode::KeyE,
        KeyCode::KeyF,
        KeyCode::KeyG,
        KeyCode::KeyH,
        KeyCode::KeyI,
        KeyCode::KeyJ,
        KeyCode::KeyK,
        KeyCode::KeyL,
        KeyCode::KeyM,
        KeyCode::KeyN,
        KeyCode::KeyO,
        KeyCode::KeyP,
        KeyCode::KeyQ,
        KeyCode::KeyR,
        KeyCode::KeyS,
        KeyCode::KeyT,
        KeyCode::KeyU,
        KeyCode::KeyV,
        KeyCode::KeyW,
        KeyCode::KeyX,
        KeyCode::KeyY,
        KeyCode::KeyZ,
    ];
    const DIGITS: [KeyCode; 10] = [
        KeyCode::Digit0,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    match ch {
        'a'..='z' => Some(LETTERS[(ch as u8 - b'a') as usize]),
        '0'..='9' => Some(DIGITS[(ch as u8 - b'0') as usize]),
        _ => None,
    }
}
