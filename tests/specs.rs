//! End-to-end specs: spawn the compiled `fleethubd` binary and drive it
//! over real TCP/WebSocket connections, exactly as a producer or a browser
//! client would. Mirrors the scenarios from the design notes (A-F).

use std::net::TcpListener as StdTcpListener;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use assert_cmd::cargo::cargo_bin;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

/// Polls `condition` every 20ms up to `timeout_ms`, the same shape as the
/// workspace's own `wait_for` test helper but async, since our clients talk
/// over real sockets instead of shelling out to a CLI.
async fn wait_for<F, Fut>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if condition().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

fn free_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

/// A running `fleethubd` instance, killed when dropped.
struct Daemon {
    child: Child,
    bus_port: u16,
    browser_port: u16,
}

impl Daemon {
    fn spawn() -> Self {
        Self::spawn_with_env(&[])
    }

    fn spawn_with_env(extra_env: &[(&str, &str)]) -> Self {
        let bus_port = free_port();
        let browser_port = free_port();

        let mut cmd = Command::new(cargo_bin("fleethubd"));
        cmd.arg("--bus-port")
            .arg(bus_port.to_string())
            .arg("--browser-port")
            .arg(browser_port.to_string())
            .env("FLEETHUB_PUSH_INTERVAL_MS", "50")
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        for (k, v) in extra_env {
            cmd.env(k, v);
        }
        let child = cmd.spawn().expect("spawn fleethubd");

        Daemon { child, bus_port, browser_port }
    }

    fn bus_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.bus_port)
    }

    fn browser_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.browser_port)
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Connects to `url`, retrying briefly while the daemon finishes binding.
async fn connect(url: &str) -> tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>> {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(2_000);
    loop {
        match tokio_tungstenite::connect_async(url).await {
            Ok((ws, _)) => return ws,
            Err(e) => {
                if tokio::time::Instant::now() >= deadline {
                    panic!("could not connect to {url}: {e}");
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        }
    }
}

async fn send_producer_frame(ws: &mut tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>, bus_id: &str, lat: f64, lng: f64, route: &str) {
    let payload = json!({ "busId": bus_id, "lat": lat, "lng": lng, "route": route }).to_string();
    ws.send(Message::Text(payload.into())).await.expect("send producer frame");
}

async fn send_viewer_bounds(ws: &mut tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>, sw: (f64, f64), ne: (f64, f64)) {
    let payload = json!({
        "msgType": "newBounds",
        "data": {
            "southWest": { "lat": sw.0, "lng": sw.1 },
            "northEast": { "lat": ne.0, "lng": ne.1 },
        }
    })
    .to_string();
    ws.send(Message::Text(payload.into())).await.expect("send viewer bounds");
}

/// Reads frames off a viewer socket until one parses as a `Buses` snapshot,
/// returning its `buses` array.
async fn next_snapshot(ws: &mut tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>) -> Vec<Value> {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for snapshot")
            .expect("stream ended")
            .expect("websocket error");
        let Message::Text(text) = msg else { continue };
        let Ok(parsed) = serde_json::from_str::<Value>(&text) else { continue };
        if parsed.get("msgType").and_then(Value::as_str) == Some("Buses") {
            return parsed["buses"].as_array().cloned().unwrap_or_default();
        }
    }
}

fn bus_ids(buses: &[Value]) -> Vec<&str> {
    buses.iter().filter_map(|b| b["busId"].as_str()).collect()
}

/// Scenario A: a producer reports one vehicle; a viewer with no viewport
/// set (send-all policy) must see it.
#[tokio::test]
async fn scenario_a_single_vehicle_visibility() {
    let daemon = Daemon::spawn();

    let mut producer = connect(&daemon.bus_url()).await;
    send_producer_frame(&mut producer, "bus-1", 55.75, 37.62, "Route 1").await;

    let mut viewer = connect(&daemon.browser_url()).await;
    let seen = wait_for(3_000, || async {
        bus_ids(&next_snapshot(&mut viewer).await).contains(&"bus-1")
    })
    .await;
    assert!(seen, "viewer with no viewport should see every vehicle");
}

/// Scenario B: a viewer whose viewport excludes a vehicle's position must
/// not receive it, even though the vehicle exists in the world.
#[tokio::test]
async fn scenario_b_viewport_exclusion() {
    let daemon = Daemon::spawn();

    let mut producer = connect(&daemon.bus_url()).await;
    send_producer_frame(&mut producer, "bus-2", 55.75, 37.62, "Route 1").await;

    let mut viewer = connect(&daemon.browser_url()).await;
    send_viewer_bounds(&mut viewer, (0.0, 0.0), (1.0, 1.0)).await;

    // Give the producer update time to land before asserting absence.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let snapshot = next_snapshot(&mut viewer).await;
    assert!(!bus_ids(&snapshot).contains(&"bus-2"));
}

/// Scenario C: a vehicle crossing from outside a viewport's cell range to
/// inside it must appear in the very next snapshot, with no stale lag.
#[tokio::test]
async fn scenario_c_cell_transition_is_visible_promptly() {
    let daemon = Daemon::spawn();

    let mut producer = connect(&daemon.bus_url()).await;
    send_producer_frame(&mut producer, "bus-3", 55.09, 37.0, "Route 1").await;

    let mut viewer = connect(&daemon.browser_url()).await;
    send_viewer_bounds(&mut viewer, (55.1, 36.9), (55.2, 37.1)).await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    let before = next_snapshot(&mut viewer).await;
    assert!(!bus_ids(&before).contains(&"bus-3"));

    send_producer_frame(&mut producer, "bus-3", 55.11, 37.0, "Route 1").await;
    let appeared = wait_for(3_000, || async {
        bus_ids(&next_snapshot(&mut viewer).await).contains(&"bus-3")
    })
    .await;
    assert!(appeared, "vehicle crossing into the viewport's cell range should appear");
}

/// Scenario D: a vehicle that stops reporting goes stale and is reaped,
/// disappearing from subsequent snapshots.
#[tokio::test]
async fn scenario_d_zombie_vehicle_is_reaped() {
    let daemon = Daemon::spawn_with_env(&[
        ("FLEETHUB_STALENESS_SECS", "1"),
        ("FLEETHUB_REAP_INTERVAL_SECS", "1"),
    ]);

    let mut producer = connect(&daemon.bus_url()).await;
    send_producer_frame(&mut producer, "bus-4", 10.0, 10.0, "Route 1").await;

    let mut viewer = connect(&daemon.browser_url()).await;
    let seen = wait_for(1_000, || async {
        bus_ids(&next_snapshot(&mut viewer).await).contains(&"bus-4")
    })
    .await;
    assert!(seen, "vehicle should be visible before it goes stale");

    drop(producer); // stop reporting

    let reaped = wait_for(5_000, || async {
        !bus_ids(&next_snapshot(&mut viewer).await).contains(&"bus-4")
    })
    .await;
    assert!(reaped, "stale vehicle should be reaped and vanish from snapshots");
}

/// Scenario E: a malformed producer frame closes that connection without
/// taking the daemon down or corrupting state for other clients.
#[tokio::test]
async fn scenario_e_malformed_producer_frame_closes_connection_only() {
    let daemon = Daemon::spawn();

    let mut bad_producer = connect(&daemon.bus_url()).await;
    bad_producer
        .send(Message::Text("not json at all".into()))
        .await
        .expect("send malformed frame");

    let closed = tokio::time::timeout(Duration::from_secs(2), bad_producer.next())
        .await
        .expect("timed out waiting for close");
    assert!(
        matches!(closed, None | Some(Ok(Message::Close(_))) | Some(Err(_))),
        "malformed frame should close the connection"
    );

    // The daemon itself must still be responsive to a well-formed producer.
    let mut good_producer = connect(&daemon.bus_url()).await;
    send_producer_frame(&mut good_producer, "bus-5", 1.0, 1.0, "Route 1").await;

    let mut viewer = connect(&daemon.browser_url()).await;
    let seen = wait_for(3_000, || async {
        bus_ids(&next_snapshot(&mut viewer).await).contains(&"bus-5")
    })
    .await;
    assert!(seen, "daemon should remain healthy after a malformed producer frame");
}

/// Scenario F: two viewers with disjoint viewports each see only their own
/// vehicle, never the other's.
#[tokio::test]
async fn scenario_f_disjoint_viewers_stay_isolated() {
    let daemon = Daemon::spawn();

    let mut producer = connect(&daemon.bus_url()).await;
    send_producer_frame(&mut producer, "north-bus", 60.0, 60.0, "Route N").await;
    send_producer_frame(&mut producer, "south-bus", -60.0, -60.0, "Route S").await;

    let mut north_viewer = connect(&daemon.browser_url()).await;
    send_viewer_bounds(&mut north_viewer, (59.0, 59.0), (61.0, 61.0)).await;

    let mut south_viewer = connect(&daemon.browser_url()).await;
    send_viewer_bounds(&mut south_viewer, (-61.0, -61.0), (-59.0, -59.0)).await;

    let north_ok = wait_for(3_000, || async {
        let snapshot = next_snapshot(&mut north_viewer).await;
        let ids = bus_ids(&snapshot);
        ids.contains(&"north-bus") && !ids.contains(&"south-bus")
    })
    .await;
    assert!(north_ok, "north viewer should see only north-bus");

    let south_ok = wait_for(3_000, || async {
        let snapshot = next_snapshot(&mut south_viewer).await;
        let ids = bus_ids(&snapshot);
        ids.contains(&"south-bus") && !ids.contains(&"north-bus")
    })
    .await;
    assert!(south_ok, "south viewer should see only south-bus");
}
