use serde_json::json;
use teleop_client::providers::{ActionMode, ButtonPadAction, FunctionProvider};

use crate::integration::create_test_console;

#[test]
fn test_step_actuate() {
    let mut t = create_test_console();
    t.connect();
    t.ctx().set_velocity_scale(0.5);

    t.buttons()
        .provide_functions(ButtonPadAction::ArmLift)
        .click();
    t.buttons()
        .provide_functions(ButtonPadAction::BaseForward)
        .click();

    assert_eq!(
        t.channel.sent_json(),
        vec![
            json!({"type": "incremental-move", "joint": "joint_lift", "increment": 0.025}),
            json!({"type": "incremental-move", "joint": "translate_mobile_base", "increment": 0.05}),
        ]
    );
}

#[test]
fn test_press_release() {
    let mut t = create_test_console();
    t.connect();
    t.ctx().set_velocity_scale(0.5);
    t.ctx().set_action_mode(ActionMode::PressRelease);

    let functions = t.buttons().provide_functions(ButtonPadAction::BaseForward);
    functions.click();
    functions.release();

    assert_eq!(
        t.channel.sent_json(),
        vec![
            json!({"type": "drive-base", "linVel": 0.15, "angVel": 0.0}),
            json!({"type": "drive-base", "linVel": 0.0, "angVel": 0.0}),
        ]
    );
}

#[test]
fn test_click_click() {
    let mut t = create_test_console();
    t.connect();
    t.ctx().set_velocity_scale(0.5);
    t.ctx().set_action_mode(ActionMode::ClickClick);

    let extend = t.buttons().provide_functions(ButtonPadAction::ArmExtend);
    extend.click();
    assert_eq!(t.buttons().active_action(), Some(ButtonPadAction::ArmExtend));
    extend.click();
    assert_eq!(t.buttons().active_action(), None);

    assert_eq!(
        t.channel.sent_json(),
        vec![
            json!({"type": "incremental-move", "joint": "wrist_extension", "increment": 0.25}),
            json!({"type": "stop-trajectory"}),
        ]
    );
}

#[test]
fn test_click_click_switches_buttons() {
    let mut t = create_test_console();
    t.connect();
    t.ctx().set_action_mode(ActionMode::ClickClick);

    t.buttons()
        .provide_functions(ButtonPadAction::BaseForward)
        .click();
    t.channel.clear();
    t.buttons()
        .provide_functions(ButtonPadAction::ArmLift)
        .click();

    let sent = t.channel.sent_json();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], json!({"type": "drive-base", "linVel": 0.0, "angVel": 0.0}));
    assert_eq!(sent[1]["type"], "incremental-move");
    assert_eq!(t.buttons().active_action(), Some(ButtonPadAction::ArmLift));
}
