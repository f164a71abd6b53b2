use serde_json::json;
use std::sync::Arc;
use teleop_client::RemoteRobot;
use teleop_client::session::{Lifecycle, LifecycleEvent, SessionState};
use teleop_core::{Camera, Perspective, RobotMode, ToggleFeature};

use crate::integration::init_tracing;
use crate::utils::RecordingChannel;

fn exercise(robot: &RemoteRobot) {
    robot.set_robot_mode(RobotMode::Manipulation);
    robot.set_camera_perspective(Camera::Overhead, Perspective::Nav);
    robot.drive_base(0.1, 0.0);
    robot.set_toggle(ToggleFeature::FollowGripper, true);
}

#[test]
fn test_no_traffic_before_connected() {
    init_tracing();

    let mut lifecycle = Lifecycle::new();
    let channel = Arc::new(RecordingChannel::new(lifecycle.subscribe()));
    let robot = RemoteRobot::new(channel.clone());

    exercise(&robot);
    lifecycle.apply(LifecycleEvent::Joined);
    lifecycle.apply(LifecycleEvent::ChannelOpened);
    assert_eq!(lifecycle.state(), SessionState::Negotiating);
    exercise(&robot);
    assert!(channel.sent().is_empty());
    assert_eq!(robot.toggle_state(ToggleFeature::FollowGripper), None);

    lifecycle.apply(LifecycleEvent::TransportConnected);
    robot.stop_trajectory();
    assert_eq!(channel.sent_json(), vec![json!({"type": "stop-trajectory"})]);
}

#[test]
fn test_reconnecting_and_closed_are_quiet() {
    init_tracing();

    let mut lifecycle = Lifecycle::new();
    let channel = Arc::new(RecordingChannel::new(lifecycle.subscribe()));
    let robot = RemoteRobot::new(channel.clone());

    lifecycle.apply(LifecycleEvent::Joined);
    lifecycle.apply(LifecycleEvent::TransportConnected);
    lifecycle.apply(LifecycleEvent::ChannelOpened);

    lifecycle.apply(LifecycleEvent::TransportDisconnected);
    assert_eq!(lifecycle.state(), SessionState::Reconnecting);
    exercise(&robot);
    assert!(channel.sent().is_empty());

    lifecycle.apply(LifecycleEvent::TransportConnected);
    robot.look_at_gripper();
    assert_eq!(channel.sent().len(), 1);

    lifecycle.apply(LifecycleEvent::ChannelClosed);
    assert_eq!(lifecycle.state(), SessionState::Closed);
    exercise(&robot);
    assert_eq!(channel.sent().len(), 1);
}
