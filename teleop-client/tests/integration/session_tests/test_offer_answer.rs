use teleop_client::session::SessionState;
use teleop_core::{PeerRole, SdpKind, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::{TestPeer, next_description, pump_until_connected};

#[tokio::test]
async fn test_offer_answer() {
    init_tracing();

    let mut robot = TestPeer::seated(PeerRole::Robot, 0, "lab").await;
    let mut operator = TestPeer::seated(PeerRole::Operator, 0, "lab").await;

    robot.counterpart_joined().await;
    let errors = pump_until_connected(&mut robot, &mut operator).await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(robot.session.state(), SessionState::Connected);
    assert_eq!(operator.session.state(), SessionState::Connected);
    assert_eq!(robot.sent_descriptions().await.first(), Some(&SdpKind::Offer));
    assert_eq!(
        operator.sent_descriptions().await.first(),
        Some(&SdpKind::Answer)
    );

    robot.session.hangup().await;
    operator.session.hangup().await;
}

#[tokio::test]
async fn test_both_sides_told_at_once_converge() {
    init_tracing();

    let mut robot = TestPeer::seated(PeerRole::Robot, 0, "lab").await;
    let mut operator = TestPeer::seated(PeerRole::Operator, 3, "lab").await;

    // The room tells both seats at once; each side then tries to open.
    operator.counterpart_joined().await;
    robot.counterpart_joined().await;
    operator.session.make_offer().await.unwrap();
    operator.session.on_negotiation_needed().await.unwrap();

    let errors = pump_until_connected(&mut robot, &mut operator).await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(robot.session.state(), SessionState::Connected);
    assert_eq!(operator.session.state(), SessionState::Connected);
    assert_eq!(
        operator.sent_descriptions().await.first(),
        Some(&SdpKind::Answer),
        "operator offered before the robot's first round"
    );

    robot.session.hangup().await;
    operator.session.hangup().await;
}

#[tokio::test]
async fn test_late_collision_ends_the_polite_session() {
    init_tracing();

    let mut robot = TestPeer::seated(PeerRole::Robot, 0, "lab").await;
    let mut operator = TestPeer::seated(PeerRole::Operator, 0, "lab").await;
    operator.counterpart_joined().await;
    robot.counterpart_joined().await;
    let errors = pump_until_connected(&mut robot, &mut operator).await;
    assert!(errors.is_empty(), "{errors:?}");

    // Both renegotiate at the same moment.
    while robot.outbound.try_recv().is_ok() {}
    while operator.outbound.try_recv().is_ok() {}
    robot.session.make_offer().await.unwrap();
    operator.session.make_offer().await.unwrap();
    let robot_offer = next_description(&mut robot.outbound, SdpKind::Offer).await;
    let operator_offer = next_description(&mut operator.outbound, SdpKind::Offer).await;

    // The robot keeps its own offer.
    robot.session.handle_signal(operator_offer).await.unwrap();
    assert_eq!(robot.session.state(), SessionState::Connected);

    // The operator cannot withdraw its offer on this transport, so it gives
    // the session up instead of waiting for an answer that never comes.
    assert!(operator.session.handle_signal(robot_offer).await.is_err());
    assert_eq!(operator.session.state(), SessionState::Closed);

    robot.session.hangup().await;
}

#[tokio::test]
async fn test_rendezvous_error_is_surfaced() {
    init_tracing();

    let mut operator = TestPeer::new(PeerRole::Operator, 0).await;
    let err = operator
        .session
        .handle_signal(SignalMessage::Error {
            reason: "operator seat taken".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("operator seat taken"));
    operator.session.hangup().await;
}
