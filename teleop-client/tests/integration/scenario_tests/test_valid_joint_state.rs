use teleop_client::providers::{ButtonPadAction, JointStates};

use crate::integration::create_test_console;

#[test]
fn test_valid_joint_state() {
    let mut t = create_test_console();
    t.connect();

    t.console.handle_frame(
        r#"{"type":"validJointState","jointsInLimits":[false,true,true],"jointsInCollision":[false,false,true]}"#,
    );

    assert_eq!(
        t.buttons().joint_states(),
        Some(JointStates {
            in_limits: vec![false, true, true],
            in_collision: vec![false, false, true],
        })
    );
    assert!(t.buttons().is_blocked(ButtonPadAction::ArmLift));
    assert!(t.buttons().is_blocked(ButtonPadAction::WristRotateOut));
    assert!(!t.buttons().is_blocked(ButtonPadAction::ArmExtend));
    assert!(!t.buttons().is_blocked(ButtonPadAction::BaseForward));
    assert_eq!(t.console.protocol_errors(), 0);
}

#[test]
fn test_batched_telemetry_is_handled_in_order() {
    let mut t = create_test_console();
    t.connect();

    t.console.handle_frame(
        r#"[
            {"type":"validJointState","jointsInLimits":[false,true,true],"jointsInCollision":[false,false,false]},
            {"type":"validJointState","jointsInLimits":[true,true,true],"jointsInCollision":[false,false,false]}
        ]"#,
    );

    // The later element wins.
    assert!(!t.buttons().is_blocked(ButtonPadAction::ArmLift));
}
