#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod context;
mod logger;
mod orientation;
mod sensor;
mod store;

use crate::context::{Action, AppContext};
use crate::orientation::{OrientationSample, SharedObserver};
use crate::sensor::{PermissionPolicy, ScriptedSensor};
use crate::store::{LocationRecord, ModuleState, Mutation, StateStore, StoreModule};
use rand::Rng;
use std::{env, str::FromStr, sync::Arc, time::Duration};

const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);
const DEFAULT_SAMPLE_COUNT: usize = 20;
const SENSOR_JITTER_DEG: f64 = 1.5;

/// Start-up settings taken from the environment.
struct RunConfig {
    permission: PermissionPolicy,
    sample_interval: Duration,
    sample_count: usize,
}

impl RunConfig {
    fn from_env() -> Self {
        let permission = env::var("SKYVIEW_PERMISSION").map_or(PermissionPolicy::NotRequired, |v| {
            PermissionPolicy::from_str(&v).unwrap_or_else(|_| {
                warn!("Unknown SKYVIEW_PERMISSION '{v}', assuming no permission is required");
                PermissionPolicy::NotRequired
            })
        });
        let sample_interval = env::var("SKYVIEW_SAMPLE_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(DEFAULT_SAMPLE_INTERVAL, Duration::from_millis);
        let sample_count = env::var("SKYVIEW_SAMPLE_COUNT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_SAMPLE_COUNT);
        Self { permission, sample_interval, sample_count }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = RunConfig::from_env();
    let observer = Arc::new(SharedObserver::default());
    let sensor = Arc::new(ScriptedSensor::new(config.permission));
    let context = init(Arc::clone(&observer), Arc::clone(&sensor));

    context.dispatch(Action::RequestPermission).await;
    info!("Orientation subscription is {}", context.subscription_state().await);

    run_location_demo(&context).await;

    let mut rng = rand::rng();
    #[allow(clippy::cast_precision_loss)]
    let step = 360.0 / config.sample_count.max(1) as f64;
    for i in 0..config.sample_count {
        #[allow(clippy::cast_precision_loss)]
        let alpha = (i as f64 * step + rng.random_range(-SENSOR_JITTER_DEG..SENSOR_JITTER_DEG))
            .rem_euclid(360.0);
        let beta = 90.0 + rng.random_range(-SENSOR_JITTER_DEG..SENSOR_JITTER_DEG);
        let gamma = rng.random_range(-SENSOR_JITTER_DEG..SENSOR_JITTER_DEG);
        let delivered = sensor.emit(OrientationSample::from_euler(alpha, beta, gamma)).await;
        tokio::time::sleep(config.sample_interval).await;
        if delivered > 0 {
            info!("alpha {alpha:>6.2}° -> observer {}", observer.direction());
        }
    }

    context.dispatch(Action::AccelOff).await;
    let snapshot = {
        let store_lock = context.store();
        let store = store_lock.read().await;
        serde_json::to_string_pretty(store.state())
    };
    match snapshot {
        Ok(json) => log!("Final state:\n{json}"),
        Err(e) => error!("Could not serialize final state: {e}"),
    }
}

fn init(observer: Arc<SharedObserver>, sensor: Arc<ScriptedSensor>) -> AppContext {
    let modules: Vec<(String, Box<dyn StoreModule>)> = vec![(
        String::from("satellites"),
        Box::new(ModuleState::new().with("visible", true.into()).with("maxMagnitude", 4.into())),
    )];
    let store = StateStore::new(observer, modules)
        .unwrap_or_else(|e| fatal!("Could not compose state store: {e}"));
    AppContext::new(store, sensor)
}

async fn run_location_demo(context: &AppContext) {
    let detected = LocationRecord {
        street_address: String::from("Rue de la Paix"),
        alt: 35.0,
        accuracy: 40.0,
        ..LocationRecord::new("Paris", "France", 48.8534, 2.3488)
    };
    let mutations = [
        Mutation::SetAutoDetectedLocation(detected),
        Mutation::SetCurrentLocation(LocationRecord::new("La Silla", "Chile", -29.2567, -70.7346)),
        Mutation::SetUseAutoLocation(true),
        Mutation::ToggleBool(String::from("satellites.visible")),
        Mutation::SetValue { path: String::from("showFPS"), value: true.into() },
    ];
    for mutation in mutations {
        let name = mutation.to_string();
        if let Err(e) = context.commit(mutation).await {
            error!("Mutation {name} failed: {e}");
        }
    }
    let store_lock = context.store();
    let store = store_lock.read().await;
    let state = store.state();
    info!(
        "Location {} ({}), auto: {}",
        state.current_location.short_name, state.current_location.country, state.use_auto_location
    );
}
