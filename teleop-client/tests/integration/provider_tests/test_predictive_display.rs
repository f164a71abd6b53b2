use serde_json::json;
use teleop_client::providers::{FunctionProvider, PredictiveDisplayAction, Stroke};

use crate::integration::create_test_console;

#[test]
fn test_predictive_display() {
    let mut t = create_test_console();
    t.connect();
    t.ctx().set_velocity_scale(0.5);

    let functions = t
        .predictive()
        .provide_functions(PredictiveDisplayAction::Trajectory);
    functions.move_to(Stroke::new(0.5, 1.0));
    assert!(t.channel.sent().is_empty());

    functions.click();
    assert!(t.predictive().is_driving());
    functions.leave();
    assert!(!t.predictive().is_driving());

    assert_eq!(
        t.channel.sent_json(),
        vec![
            json!({"type": "drive-base", "linVel": 0.15, "angVel": -0.15}),
            json!({"type": "drive-base", "linVel": 0.0, "angVel": 0.0}),
        ]
    );
}
