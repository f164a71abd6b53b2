use serde_json::json;
use teleop_client::providers::{FunctionProvider, UnderVideoButton};

use crate::integration::create_test_console;

#[test]
fn test_camera_perspective() {
    let mut t = create_test_console();
    t.connect();

    t.under_video()
        .provide_functions(UnderVideoButton::DriveView)
        .click();

    assert_eq!(
        t.channel.sent_json(),
        vec![json!({"type": "camera-perspective", "camera": "overhead", "mode": "nav"})]
    );

    t.channel.clear();
    t.under_video()
        .provide_functions_for("Gripper View")
        .unwrap()
        .click();
    assert_eq!(
        t.channel.sent_json(),
        vec![json!({"type": "camera-perspective", "camera": "overhead", "mode": "manip"})]
    );
}

#[test]
fn test_toggle_buttons_use_check() {
    let mut t = create_test_console();
    t.connect();

    let functions = t.under_video().provide_functions(UnderVideoButton::DepthSensing);
    functions.click();
    assert!(t.channel.sent().is_empty());

    functions.check(true);
    assert_eq!(
        t.channel.sent_json(),
        vec![json!({"type": "toggle-feature", "feature": "setDepthSensing", "toggle": true})]
    );
}
