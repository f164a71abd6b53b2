use teleop_client::providers::{FunctionProvider, UnknownAction};

use crate::integration::create_test_console;

#[test]
fn test_unknown_labels() {
    let mut t = create_test_console();
    t.connect();

    let err = t.buttons().provide_functions_for("Arm Fly").unwrap_err();
    assert_eq!(err, UnknownAction::new("button pad action", "Arm Fly"));
    assert!(t.under_video().provide_functions_for("Rear View").is_err());
    assert!(t.predictive().provide_functions_for("Autopilot").is_err());
    assert!(t.console.handle_input("do a backflip").is_err());

    assert!(t.channel.sent().is_empty());
}

#[test]
fn test_voice_phrase_reaches_the_robot() {
    let mut t = create_test_console();
    t.connect();

    t.console.handle_input("Please stow.").unwrap();

    let sent = t.channel.sent_json();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["type"], "pose-target");
    assert_eq!(sent[0]["pose"]["joint_wrist_yaw"], 3.4);
}
