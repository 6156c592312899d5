use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use wxss_bundle::{
    BundleOptions, DeviceMetrics, DeviceProfile, Orientation, Package, StyleEngine,
    spawn_device_watch, watch_device,
};

fn engine(width: f64) -> Arc<StyleEngine> {
    let mut package = Package::new("/pkg", BundleOptions::default());
    package.insert("a.wxss", Some(".a{width:100rpx}".to_string()));
    package.insert("b.wxss", Some(".b{height:300rpx}".to_string()));
    package.process().unwrap();
    Arc::new(StyleEngine::new(
        Arc::new(package),
        DeviceProfile::new("android", width, 800.0, 2.0),
    ))
}

fn metrics(width: f64) -> DeviceMetrics {
    DeviceMetrics {
        screen_width: Some(width),
        ..Default::default()
    }
}

#[test]
fn test_apply_profile_rerenders_cached_entries() {
    let engine = engine(375.0);
    assert_eq!(engine.render("a.wxss", "").unwrap(), ".a{width:50px}");

    engine
        .apply_profile(DeviceProfile::new("android", 750.0, 800.0, 2.0))
        .unwrap();

    assert_eq!(engine.profile().width(), 750.0);
    assert_eq!(engine.cached("a.wxss", "").as_deref(), Some(".a{width:100px}"));
}

#[test]
fn test_listeners_see_registration_order() {
    let engine = engine(375.0);
    engine.render("b.wxss", "").unwrap();
    engine.render("a.wxss", "dark").unwrap();
    engine.render("a.wxss", "").unwrap();
    engine.render("b.wxss", "").unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    engine.subscribe(move |key, css| {
        sink.lock().unwrap().push(format!("{key} {css}"));
    });

    engine
        .apply_profile(DeviceProfile::new("android", 750.0, 800.0, 2.0))
        .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "/pkg/b.wxss- .b{height:300px}",
            "/pkg/a.wxss-dark .a{width:100px}",
            "/pkg/a.wxss- .a{width:100px}",
        ]
    );
}

#[test]
fn test_listener_may_render() {
    let engine = engine(375.0);
    engine.render("a.wxss", "").unwrap();

    let inner = Arc::clone(&engine);
    engine.subscribe(move |_, _| {
        inner.render("b.wxss", "late").unwrap();
    });
    engine
        .apply_profile(DeviceProfile::new("android", 750.0, 800.0, 2.0))
        .unwrap();

    assert_eq!(engine.cached("b.wxss", "late").as_deref(), Some(".b{height:300px}"));
    assert_eq!(engine.recalculation_count(), 2);
}

#[test]
fn test_landscape_uses_height_as_width() {
    let profile = DeviceProfile::from_metrics(&DeviceMetrics {
        screen_width: Some(800.0),
        screen_height: Some(400.0),
        orientation: Orientation::Landscape,
        ..Default::default()
    });
    assert_eq!(profile.width(), 400.0);

    let engine = engine(375.0);
    engine.render("a.wxss", "").unwrap();
    engine.apply_profile(profile).unwrap();
    assert_eq!(engine.cached("a.wxss", "").as_deref(), Some(".a{width:53px}"));
}

#[tokio::test]
async fn test_watch_device_applies_updates_until_sender_drops() {
    let engine = engine(375.0);
    engine.render("a.wxss", "").unwrap();

    let (updates_tx, mut updates_rx) = mpsc::unbounded_channel();
    engine.subscribe(move |_, css| {
        let _ = updates_tx.send(css.to_string());
    });

    let (tx, rx) = watch::channel(DeviceMetrics::default());
    let pump = tokio::spawn(watch_device(Arc::clone(&engine), rx));

    tx.send(metrics(750.0)).unwrap();
    assert_eq!(updates_rx.recv().await.unwrap(), ".a{width:100px}");

    tx.send(metrics(150.0)).unwrap();
    assert_eq!(updates_rx.recv().await.unwrap(), ".a{width:20px}");

    drop(tx);
    pump.await.unwrap();
    assert_eq!(engine.profile().width(), 150.0);
}

#[tokio::test]
async fn test_spawned_watch_applies_updates() {
    let engine = engine(375.0);
    engine.render("b.wxss", "").unwrap();

    let (updates_tx, mut updates_rx) = mpsc::unbounded_channel();
    engine.subscribe(move |_, css| {
        let _ = updates_tx.send(css.to_string());
    });

    let (tx, rx) = watch::channel(DeviceMetrics::default());
    let mut handle = spawn_device_watch(Arc::clone(&engine), rx);

    tx.send(metrics(750.0)).unwrap();
    assert_eq!(updates_rx.recv().await.unwrap(), ".b{height:300px}");

    handle.cancel();
}
