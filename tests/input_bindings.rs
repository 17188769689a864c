use jenga_lab::input::{Action, ActionBindings, GamepadButton, InputSnapshot};
use std::io::Write;
use tempfile::NamedTempFile;
use winit::keyboard::KeyCode;

#[test]
fn remapped_scene_keys_override_defaults() {
    let mut temp = NamedTempFile::new().expect("temp input config");
    write!(temp, r#"{{"bindings":{{"next_scene":["n"],"previous_scene":["b", "page_down"]}}}}"#)
        .expect("write remap config");

    let bindings = ActionBindings::load_or_default(temp.path());
    let idle = InputSnapshot::default();
    let next = bindings.binding(Action::NextScene);
    let previous = bindings.binding(Action::PreviousScene);

    assert!(next.just_pressed(Some(&idle), &idle.clone().with_key(KeyCode::KeyN)), "custom key fires");
    assert!(
        !next.just_pressed(Some(&idle), &idle.clone().with_key(KeyCode::Equal)),
        "default key no longer fires once remapped"
    );
    assert!(previous.just_pressed(Some(&idle), &idle.clone().with_key(KeyCode::PageDown)));
    assert!(
        next.just_pressed(Some(&idle), &idle.clone().with_gamepad(GamepadButton::West)),
        "gamepad binding survives a keyboard remap"
    );
}

#[test]
fn unknown_entries_keep_defaults() {
    let mut temp = NamedTempFile::new().expect("temp input config");
    write!(temp, r#"{{"bindings":{{"next_scene":["not_a_key"],"launch_rocket":["r"]}}}}"#)
        .expect("write config");

    let bindings = ActionBindings::load_or_default(temp.path());
    let idle = InputSnapshot::default();
    let next = bindings.binding(Action::NextScene);
    assert!(next.just_pressed(Some(&idle), &idle.clone().with_key(KeyCode::NumpadAdd)));
}

#[test]
fn unreadable_file_falls_back_to_defaults() {
    let mut temp = NamedTempFile::new().expect("temp input config");
    write!(temp, "{{ not json").expect("write config");
    let bindings = ActionBindings::load_or_default(temp.path());
    let idle = InputSnapshot::default();
    let exit = bindings.binding(Action::Exit);
    assert!(exit.just_pressed(Some(&idle), &idle.clone().with_key(KeyCode::Escape)));

    let missing = ActionBindings::load_or_default("config/does_not_exist.json");
    assert_eq!(missing.binding(Action::DemoPin), bindings.binding(Action::DemoPin));
}
