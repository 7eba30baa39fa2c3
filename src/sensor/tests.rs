use super::source::{ListenerHandle, PermissionState, SensorError};
use super::{PermissionPolicy, ScriptedSensor, SensorSource, SensorSubscription, SubscriptionState};
use crate::context::{Action, AppContext};
use crate::orientation::{ObserverHandle, OrientationSample, SharedObserver};
use crate::store::{Mutation, StateStore};
use async_trait::async_trait;
use std::f64::consts::{FRAC_PI_2, PI};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;

/// Source that accepts every listener and immediately hangs up on it.
#[derive(Default)]
struct HangUpSource {
    added: AtomicU64,
    removed: AtomicUsize,
}

#[async_trait]
impl SensorSource for HangUpSource {
    fn requires_permission(&self) -> bool { false }

    async fn request_permission(&self) -> Result<PermissionState, SensorError> { Ok(PermissionState::Granted) }

    async fn add_listener(
        &self,
        sink: UnboundedSender<OrientationSample>,
    ) -> Result<ListenerHandle, SensorError> {
        drop(sink);
        Ok(ListenerHandle::new(self.added.fetch_add(1, Ordering::Relaxed) + 1))
    }

    async fn remove_listener(&self, _handle: ListenerHandle) -> bool {
        self.removed.fetch_add(1, Ordering::Relaxed);
        false
    }
}

fn init_context(policy: PermissionPolicy) -> (AppContext, Arc<ScriptedSensor>, Arc<SharedObserver>) {
    let observer = Arc::new(SharedObserver::default());
    let store = StateStore::new(observer.clone(), Vec::new()).unwrap();
    let sensor = Arc::new(ScriptedSensor::new(policy));
    (AppContext::new(store, sensor.clone()), sensor, observer)
}

async fn accel_state(context: &AppContext) -> bool { context.store().read().await.state().accel_state }

/// Lets the forwarding task drain its queue on the current-thread runtime.
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_subscribe_without_permission_prompt() {
    let (context, sensor, _) = init_context(PermissionPolicy::NotRequired);
    context.dispatch(Action::RequestPermission).await;
    assert_eq!(context.subscription_state().await, SubscriptionState::Subscribed);
    assert!(accel_state(&context).await);
    assert_eq!(sensor.listener_count().await, 1);
    assert_eq!(sensor.permission_requests(), 0);
}

#[tokio::test]
async fn test_subscribe_after_grant() {
    let (context, sensor, _) = init_context(PermissionPolicy::Granted);
    context.dispatch(Action::RequestPermission).await;
    assert_eq!(context.subscription_state().await, SubscriptionState::Subscribed);
    assert!(accel_state(&context).await);
    assert_eq!(sensor.permission_requests(), 1);
}

#[tokio::test]
async fn test_denied_rejected_and_unsupported_stay_unsubscribed() {
    for policy in [PermissionPolicy::Denied, PermissionPolicy::Rejected, PermissionPolicy::Unsupported] {
        let (context, sensor, _) = init_context(policy);
        context.dispatch(Action::RequestPermission).await;
        assert_eq!(context.subscription_state().await, SubscriptionState::Unsubscribed, "{policy}");
        assert!(!accel_state(&context).await, "{policy}");
        assert_eq!(sensor.listener_count().await, 0, "{policy}");
    }
}

#[tokio::test]
async fn test_repeated_request_registers_one_listener() {
    let (context, sensor, _) = init_context(PermissionPolicy::Granted);
    context.dispatch(Action::RequestPermission).await;
    context.dispatch(Action::RequestPermission).await;
    assert_eq!(sensor.listener_count().await, 1);
    assert_eq!(sensor.permission_requests(), 1);
}

#[tokio::test]
async fn test_accel_off_twice_is_harmless() {
    let (context, sensor, _) = init_context(PermissionPolicy::NotRequired);
    context.dispatch(Action::RequestPermission).await;
    context.dispatch(Action::AccelOff).await;
    assert!(!accel_state(&context).await);
    assert_eq!(sensor.listener_count().await, 0);
    context.dispatch(Action::AccelOff).await;
    assert!(!accel_state(&context).await);
    assert_eq!(context.subscription_state().await, SubscriptionState::Unsubscribed);
}

#[tokio::test]
async fn test_accel_off_without_subscription() {
    let (context, sensor, _) = init_context(PermissionPolicy::Granted);
    context.dispatch(Action::AccelOff).await;
    assert!(!accel_state(&context).await);
    assert_eq!(sensor.permission_requests(), 0);
}

#[tokio::test]
async fn test_samples_reach_observer_until_accel_off() {
    let (context, sensor, observer) = init_context(PermissionPolicy::NotRequired);
    context.dispatch(Action::RequestPermission).await;

    assert_eq!(sensor.emit(OrientationSample::from_vendor(90.0, Some(90.0))).await, 1);
    settle().await;
    assert!((observer.yaw() - FRAC_PI_2).abs() < 1e-9);
    assert!(observer.pitch().abs() < 1e-9);

    context.dispatch(Action::AccelOff).await;
    assert_eq!(sensor.emit(OrientationSample::from_vendor(180.0, Some(90.0))).await, 0);
    settle().await;
    assert!((observer.yaw() - FRAC_PI_2).abs() < 1e-9);
}

#[tokio::test]
async fn test_resubscribe_after_accel_off() {
    let (context, sensor, observer) = init_context(PermissionPolicy::NotRequired);
    context.dispatch(Action::RequestPermission).await;
    context.dispatch(Action::AccelOff).await;
    context.dispatch(Action::RequestPermission).await;
    assert_eq!(sensor.listener_count().await, 1);

    sensor.emit(OrientationSample::from_euler(0.0, -90.0, 0.0)).await;
    settle().await;
    assert!((observer.yaw() - PI).abs() < 1e-9);
}

#[tokio::test]
async fn test_handle_orientation_action_bypasses_subscription() {
    let (context, _, observer) = init_context(PermissionPolicy::Denied);
    context.dispatch(Action::HandleOrientation(OrientationSample::from_vendor(90.0, None))).await;
    assert!((observer.yaw() - FRAC_PI_2).abs() < 1e-9);
    assert!(observer.pitch().abs() < 1e-9);
}

#[tokio::test]
async fn test_commit_through_context() {
    let (context, _, _) = init_context(PermissionPolicy::NotRequired);
    context.commit(Mutation::ToggleBool(String::from("showFPS"))).await.unwrap();
    assert!(context.store().read().await.state().flags.show_fps);
    assert!(context.commit(Mutation::ToggleBool(String::from("accelState"))).await.is_err());
}

#[tokio::test]
async fn test_dropping_subscription_stops_forwarding() {
    let observer = Arc::new(SharedObserver::default());
    let store = Arc::new(RwLock::new(StateStore::new(observer.clone(), Vec::new()).unwrap()));
    let sensor = Arc::new(ScriptedSensor::new(PermissionPolicy::NotRequired));
    let mut subscription = SensorSubscription::new(sensor.clone(), store);
    subscription.request_permission().await;
    assert!(subscription.is_subscribed());
    drop(subscription);
    settle().await;
    assert_eq!(sensor.emit(OrientationSample::from_vendor(90.0, None)).await, 0);
    assert!(observer.yaw().abs() < 1e-9);
}

#[tokio::test]
async fn test_listener_closed_by_source_clears_accel_state() {
    let observer = Arc::new(SharedObserver::default());
    let store = StateStore::new(observer, Vec::new()).unwrap();
    let source = Arc::new(HangUpSource::default());
    let context = AppContext::new(store, source.clone());

    context.dispatch(Action::RequestPermission).await;
    settle().await;
    assert_eq!(context.subscription_state().await, SubscriptionState::Unsubscribed);
    assert!(!accel_state(&context).await);

    context.dispatch(Action::RequestPermission).await;
    assert_eq!(source.added.load(Ordering::Relaxed), 2);
    assert_eq!(source.removed.load(Ordering::Relaxed), 1);

    settle().await;
    assert!(!accel_state(&context).await);
    context.dispatch(Action::AccelOff).await;
    assert_eq!(source.removed.load(Ordering::Relaxed), 2);
}

#[tokio::test]
async fn test_forwarded_samples_follow_handle_orientation() {
    let (context, sensor, observer) = init_context(PermissionPolicy::NotRequired);
    context.dispatch(Action::RequestPermission).await;
    sensor.emit(OrientationSample::from_vendor(90.0, Some(90.0))).await;
    settle().await;
    let forwarded = observer.direction();

    context.dispatch(Action::HandleOrientation(OrientationSample::from_vendor(180.0, None))).await;
    context.dispatch(Action::HandleOrientation(OrientationSample::from_vendor(90.0, Some(90.0)))).await;
    assert_eq!(observer.direction(), forwarded);

    sensor.emit(OrientationSample { beta: Some(10.0), ..Default::default() }).await;
    settle().await;
    assert_eq!(observer.direction(), forwarded);
}

#[test]
fn test_policy_parses_from_config_strings() {
    assert_eq!(PermissionPolicy::from_str("not-required"), Ok(PermissionPolicy::NotRequired));
    assert_eq!(PermissionPolicy::from_str("Denied"), Ok(PermissionPolicy::Denied));
    assert!(PermissionPolicy::from_str("maybe").is_err());
    assert!(ScriptedSensor::new(PermissionPolicy::Rejected).requires_permission());
    assert!(!ScriptedSensor::new(PermissionPolicy::Unsupported).requires_permission());
}
