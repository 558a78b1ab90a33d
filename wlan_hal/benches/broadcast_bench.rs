//! Listener broadcast benchmarks.
//!
//! Measures fan-out cost of the listener registry for growing listener
//! counts, and the cost of a full start/stop cycle on simulated drivers.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use wlan_common::event::{
    CallbackResult, EventListener, ListenerId, WifiEvent, WifiEventCallback,
};
use wlan_common::hal::config::DeviceConfig;
use wlan_common::status::WifiStatus;
use wlan_hal::callback::CallbackRegistry;
use wlan_hal::driver_registry::{ConfiguredHalFactory, DriverRegistry};
use wlan_hal::drivers::register_all_drivers;
use wlan_hal::feature_flags::DefaultFeatureFlags;
use wlan_hal::iface_tool::SimulatedInterfaceTool;
use wlan_hal::mode_controller::SimulatedModeController;
use wlan_hal::wifi::Wifi;

#[derive(Default)]
struct Counter(AtomicU64);

impl WifiEventCallback for Counter {
    fn on_start(&self) -> CallbackResult {
        self.0.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_stop(&self) -> CallbackResult {
        self.0.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_failure(&self, _status: &WifiStatus) -> CallbackResult {
        Ok(())
    }
}

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_broadcast");
    for listeners in [1u64, 8, 64] {
        let registry = CallbackRegistry::<EventListener>::new("bench");
        for id in 0..listeners {
            registry.register(
                ListenerId(id),
                EventListener::V1_0(Arc::new(Counter::default())),
            );
        }

        group.bench_with_input(BenchmarkId::from_parameter(listeners), &registry, |b, reg| {
            b.iter(|| {
                let report = reg.broadcast(|listener| listener.deliver(black_box(&WifiEvent::Started)));
                black_box(report)
            });
        });
    }
    group.finish();
}

fn bench_start_stop_cycle(c: &mut Criterion) {
    let mut registry = DriverRegistry::new();
    register_all_drivers(&mut registry).unwrap();
    let factory = ConfiguredHalFactory::new(
        registry,
        vec![
            DeviceConfig::simulated(["wlan0", "wlan1"]),
            DeviceConfig::simulated(["wlan2"]),
        ],
    );
    let wifi = Wifi::new(
        Arc::new(SimulatedInterfaceTool::new()),
        &factory,
        Arc::new(SimulatedModeController::new()),
        Arc::new(DefaultFeatureFlags::default()),
    )
    .expect("create controller");

    c.bench_function("wifi_start_stop_cycle", |b| {
        b.iter(|| {
            wifi.start().unwrap();
            wifi.stop().unwrap();
        });
    });
}

criterion_group!(benches, bench_broadcast, bench_start_stop_cycle);
criterion_main!(benches);
