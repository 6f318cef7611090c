#![cfg(unix)]

mod common;

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use slidekiosk_api::background::state_monitor;
use slidekiosk_core::Transition;
use slidekiosk_events::ServerEventKind;
use slidekiosk_store::repositories::{SettingsRepo, SlideshowStateRepo};
use tokio_util::sync::CancellationToken;

use common::*;

/// Write an executable shell script standing in for the renderer.
///
/// It runs `setup`, appends a `<pid> <args>` line to `log`, then runs
/// `tail` (e.g. `exec sleep 30`).
fn fake_renderer(dir: &Path, log: &Path, setup: &str, tail: &str) -> PathBuf {
    let script = dir.join("fake-renderer.sh");
    let body = format!(
        "#!/bin/sh\n{setup}\necho \"$$ $*\" >> '{}'\n{tail}\n",
        log.display()
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

/// Wait until `log` has at least `lines` lines and return them.
async fn wait_for_lines(log: &Path, lines: usize) -> Vec<String> {
    for _ in 0..100 {
        if let Ok(text) = std::fs::read_to_string(log) {
            let found: Vec<String> = text.lines().map(str::to_string).collect();
            if found.len() >= lines {
                return found;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("renderer log {} never reached {lines} lines", log.display());
}

fn pid_of(line: &str) -> libc::pid_t {
    line.split_whitespace().next().unwrap().parse().unwrap()
}

fn process_exists(pid: libc::pid_t) -> bool {
    unsafe { libc::kill(pid, 0) == 0 }
}

struct Fixture {
    app: TestApp,
    log: PathBuf,
    _bin: tempfile::TempDir,
}

async fn app_with_renderer(setup: &str, tail: &str) -> Fixture {
    let bin = tempfile::tempdir().unwrap();
    let log = bin.path().join("renderer.log");
    let script = fake_renderer(bin.path(), &log, setup, tail);
    let app = build_test_app_with(|c| {
        c.renderer_bin = script;
        c.renderer_stop_timeout_secs = 1;
    })
    .await;
    Fixture {
        app,
        log,
        _bin: bin,
    }
}

#[tokio::test]
async fn start_launches_renderer_with_positional_args() {
    let Fixture { app, log, _bin } = app_with_renderer("", "exec sleep 30").await;
    upload_png(&app, "a.png").await;
    upload_png(&app, "b.png").await;

    let response = app
        .send(post_json(
            "/slideshow",
            json!({
                "images": ["b.png", "missing.png", "a.png"],
                "delay": 5,
                "transition": "slide-up",
                "transition_duration": 1.5
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let lines = wait_for_lines(&log, 1).await;
    let args: Vec<&str> = lines[0].split_whitespace().skip(1).collect();
    assert_eq!(args.len(), 4);
    let paths: Vec<&str> = args[0].split(',').collect();
    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("/b.png") && Path::new(paths[0]).is_absolute());
    assert!(paths[1].ends_with("/a.png"));
    assert_eq!(&args[1..], &["5", "slide-up", "1.5"]);

    assert!(app.state.supervisor.is_running().await);
    assert!(SlideshowStateRepo::load(&app.state.data).await.unwrap());
    let settings = SettingsRepo::load(&app.state.data).await.unwrap();
    assert_eq!(settings.transition, Transition::SlideUp);

    let state = body_json(app.send(get("/slideshow_state")).await).await;
    assert_eq!(state, json!({ "active": true }));

    app.state.supervisor.stop().await;
}

#[tokio::test]
async fn starting_again_terminates_the_previous_renderer() {
    let Fixture { app, log, _bin } = app_with_renderer("", "exec sleep 30").await;
    upload_png(&app, "a.png").await;

    let start = || post_json("/slideshow", json!({ "images": ["a.png"] }));

    assert_eq!(app.send(start()).await.status(), StatusCode::NO_CONTENT);
    let first = pid_of(&wait_for_lines(&log, 1).await[0]);
    assert!(process_exists(first));

    assert_eq!(app.send(start()).await.status(), StatusCode::NO_CONTENT);
    let lines = wait_for_lines(&log, 2).await;
    let second = pid_of(&lines[1]);

    assert_ne!(first, second);
    assert!(!process_exists(first), "first renderer still alive");
    assert!(process_exists(second));

    app.state.supervisor.stop().await;
    assert!(!process_exists(second));
}

#[tokio::test]
async fn renderer_ignoring_sigterm_is_killed() {
    let Fixture { app, log, _bin } = app_with_renderer("trap '' TERM", "exec sleep 30").await;
    upload_png(&app, "a.png").await;

    app.send(post_json("/slideshow", json!({ "images": ["a.png"] })))
        .await;
    let pid = pid_of(&wait_for_lines(&log, 1).await[0]);

    let response = app.send(post_empty("/stop_slideshow")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!process_exists(pid));
    assert!(!SlideshowStateRepo::load(&app.state.data).await.unwrap());
}

#[tokio::test]
async fn start_without_usable_images_leaves_slideshow_stopped() {
    let Fixture { app, log, _bin } = app_with_renderer("", "exec sleep 30").await;

    let response = app
        .send(post_json(
            "/slideshow",
            json!({ "images": ["nothing.png"], "delay": 7 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(!app.state.supervisor.is_running().await);
    assert!(!log.exists());
    assert_eq!(SettingsRepo::load(&app.state.data).await.unwrap().delay, 7.0);
    let state = body_json(app.send(get("/slideshow_state")).await).await;
    assert_eq!(state, json!({ "active": false }));
}

#[tokio::test]
async fn invalid_start_settings_are_rejected_before_stopping() {
    let Fixture { app, log, _bin } = app_with_renderer("", "exec sleep 30").await;
    upload_png(&app, "a.png").await;
    app.send(post_json("/slideshow", json!({ "images": ["a.png"] })))
        .await;
    wait_for_lines(&log, 1).await;

    let response = app
        .send(post_json(
            "/slideshow",
            json!({ "images": ["a.png"], "transition_duration": -2 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.state.supervisor.is_running().await);

    app.state.supervisor.stop().await;
}

#[tokio::test]
async fn renderer_that_exits_is_reconciled_to_inactive() {
    let Fixture { app, log, _bin } = app_with_renderer("", "exit 0").await;
    upload_png(&app, "a.png").await;

    app.send(post_json("/slideshow", json!({ "images": ["a.png"] })))
        .await;
    wait_for_lines(&log, 1).await;

    let mut active = true;
    for _ in 0..100 {
        let state = body_json(app.send(get("/slideshow_state")).await).await;
        active = state["active"].as_bool().unwrap();
        if !active {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(!active);
    assert!(!SlideshowStateRepo::load(&app.state.data).await.unwrap());
}

#[tokio::test]
async fn missing_renderer_binary_reports_internal_error() {
    let app = build_test_app().await;
    upload_png(&app, "a.png").await;

    let response = app
        .send(post_json("/slideshow", json!({ "images": ["a.png"] })))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "INTERNAL_ERROR");
    assert!(!SlideshowStateRepo::load(&app.state.data).await.unwrap());
}

#[tokio::test]
async fn state_monitor_flips_and_broadcasts_when_renderer_exits() {
    let bin = tempfile::tempdir().unwrap();
    let log = bin.path().join("renderer.log");
    let script = fake_renderer(bin.path(), &log, "", "exec sleep 1");
    let app = build_test_app_with(|c| {
        c.renderer_bin = script;
        c.state_poll_secs = 1;
    })
    .await;
    upload_png(&app, "a.png").await;

    let mut events = app.state.event_bus.subscribe();
    let cancel = CancellationToken::new();
    let monitor = tokio::spawn(state_monitor::run(app.state.clone(), cancel.clone()));

    let response = app
        .send(post_json("/slideshow", json!({ "images": ["a.png"] })))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(SlideshowStateRepo::load(&app.state.data).await.unwrap());

    // No request is made from here on; only the monitor can notice the exit.
    let stopped = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(event) = events.recv().await {
            if event.kind == ServerEventKind::SlideshowState
                && event.payload == json!({ "active": false })
            {
                return true;
            }
        }
        false
    })
    .await
    .expect("no inactive slideshow_state event");
    assert!(stopped);
    assert!(!SlideshowStateRepo::load(&app.state.data).await.unwrap());

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), monitor)
        .await
        .expect("monitor did not stop after cancel")
        .unwrap();
}
