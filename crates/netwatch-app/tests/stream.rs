//! Streaming loop behaviour, driven by a scripted probe and a channel sink

use std::time::Duration;

use netwatch_app::config::{FormatSettings, Settings};
use netwatch_app::NetworkModule;
use netwatch_core::{Output, State};
use netwatch_probe::test_utils::ScriptedProbe;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

fn module(probe: &ScriptedProbe) -> NetworkModule<ScriptedProbe> {
    NetworkModule::with_probe("wg0", probe.clone())
}

async fn next(rx: &mut mpsc::UnboundedReceiver<Output>) -> Output {
    rx.recv().await.expect("stream ended")
}

#[tokio::test(start_paused = true)]
async fn test_renders_once_on_start() {
    let probe = ScriptedProbe::constant(State::Connected);
    let module = module(&probe);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = module.spawn(tx);

    // Bootstrap renderer: raw text of the state
    assert_eq!(next(&mut rx).await, Output::text("connected"));
    assert_eq!(probe.calls(), 1);
    assert_eq!(probe.interfaces(), vec!["wg0"]);
    assert!(rx.try_recv().is_err());

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_renderer_installed_before_start_is_used() {
    let probe = ScriptedProbe::constant(State::Waiting);
    let module = module(&probe);
    module.output(|s| Output::text(format!("wg0 {}", s.code())));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = module.spawn(tx);

    assert_eq!(next(&mut rx).await, Output::text("wg0 50"));
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_new_renderer_rerenders_without_probe() {
    let probe = ScriptedProbe::new([State::Disconnected], State::Connected);
    let module = module(&probe);
    module.refresh_interval(Duration::from_secs(3600));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = module.spawn(tx);
    assert_eq!(next(&mut rx).await, Output::text("disconnected"));

    module.output(|s| Output::text(format!("VPN: {}", s)));
    assert_eq!(next(&mut rx).await, Output::text("VPN: disconnected"));
    assert_eq!(probe.calls(), 1);

    module.output(|s| Output::text(s.label().to_uppercase()));
    assert_eq!(next(&mut rx).await, Output::text("DISCONNECTED"));
    assert_eq!(probe.calls(), 1);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_each_tick_probes_and_renders_once() {
    let script = [
        State::Unknown,
        State::Disconnected,
        State::Waiting,
        State::Waiting,
        State::Connected,
        State::Disconnected,
    ];
    let probe = ScriptedProbe::new(script, State::Connected);
    let module = module(&probe);
    module.refresh_interval(Duration::from_secs(1));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let start = Instant::now();
    let handle = module.spawn(tx);

    let mut seen = Vec::new();
    for _ in 0..script.len() {
        seen.push(next(&mut rx).await.text);
    }

    // Initial render plus five ticks, no coalescing of repeated states
    assert_eq!(
        seen,
        vec![
            "unknown",
            "disconnected",
            "waiting",
            "waiting",
            "connected",
            "disconnected"
        ]
    );
    assert_eq!(probe.calls(), script.len());
    assert_eq!(start.elapsed(), Duration::from_secs(5));

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_ticks_keep_current_renderer() {
    let probe = ScriptedProbe::new([State::Waiting], State::Connected);
    let module = module(&probe);
    module.refresh_interval(Duration::from_secs(1));
    module.output(|s| Output::text(format!("[{}]", s)));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = module.spawn(tx);

    assert_eq!(next(&mut rx).await, Output::text("[waiting]"));
    assert_eq!(next(&mut rx).await, Output::text("[connected]"));
    assert_eq!(probe.calls(), 2);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_tick_and_renderer_change_are_separate_emissions() {
    let probe = ScriptedProbe::new([State::Disconnected], State::Connected);
    let module = module(&probe);
    module.refresh_interval(Duration::from_secs(10));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = module.spawn(tx);
    assert_eq!(next(&mut rx).await, Output::text("disconnected"));

    // Renderer changes mid-interval, tick arrives later
    time::advance(Duration::from_secs(4)).await;
    module.output(|s| Output::text(format!("new {}", s)));

    assert_eq!(next(&mut rx).await, Output::text("new disconnected"));
    assert_eq!(probe.calls(), 1);

    assert_eq!(next(&mut rx).await, Output::text("new connected"));
    assert_eq!(probe.calls(), 2);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_interval_change_resets_running_stream() {
    let probe = ScriptedProbe::constant(State::Connected);
    let module = module(&probe);
    module.refresh_interval(Duration::from_secs(30));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = module.spawn(tx);
    next(&mut rx).await;

    time::advance(Duration::from_secs(20)).await;
    let changed_at = Instant::now();
    module.refresh_interval(Duration::from_secs(2));

    next(&mut rx).await;
    assert_eq!(changed_at.elapsed(), Duration::from_secs(2));
    assert_eq!(probe.calls(), 2);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_interval_change_during_slow_probe_counts_from_the_change() {
    let probe = ScriptedProbe::constant(State::Connected).with_delay(Duration::from_secs(3));
    let module = module(&probe);
    module.refresh_interval(Duration::from_secs(10));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let start = Instant::now();
    let handle = module.spawn(tx);
    next(&mut rx).await;

    // Tick at 10s starts a probe that runs until 13s
    time::sleep_until(start + Duration::from_secs(11)).await;
    assert_eq!(probe.calls(), 2);
    let changed_at = Instant::now();
    module.refresh_interval(Duration::from_secs(4));

    next(&mut rx).await;
    assert_eq!(start.elapsed(), Duration::from_secs(13));

    // Next tick 4s after the change, then the 3s probe
    next(&mut rx).await;
    assert_eq!(changed_at.elapsed(), Duration::from_secs(7));
    assert_eq!(probe.calls(), 3);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_huge_interval_still_streams() {
    let probe = ScriptedProbe::constant(State::Waiting);
    let module = module(&probe);
    module.refresh_interval(Duration::MAX);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = module.spawn(tx);

    assert_eq!(next(&mut rx).await, Output::text("waiting"));
    assert!(!handle.is_finished());

    // Renderer changes still get through
    module.output(|s| Output::text(format!("wg0 {}", s)));
    assert_eq!(next(&mut rx).await, Output::text("wg0 waiting"));
    assert_eq!(probe.calls(), 1);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_probe_failure_is_rendered_as_unknown() {
    let probe = ScriptedProbe::constant(State::Unknown);
    let module = module(&probe);
    module.output(|s| {
        if s.is_disconnected() {
            Output::text("offline").urgent(true)
        } else {
            Output::text("online")
        }
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = module.spawn(tx);

    let out = next(&mut rx).await;
    assert_eq!(out.text, "offline");
    assert!(out.urgent);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_releases_subscription_across_cycles() {
    let probe = ScriptedProbe::constant(State::Connected);
    let module = module(&probe);
    assert_eq!(module.renderer().subscriber_count(), 0);

    for cycle in 1..=5usize {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = module.spawn(tx);

        next(&mut rx).await;
        assert_eq!(module.renderer().subscriber_count(), 1);
        assert!(!handle.is_finished());

        handle.stop().await;
        assert_eq!(module.renderer().subscriber_count(), 0);
        assert_eq!(probe.calls(), cycle);
    }
}

#[tokio::test(start_paused = true)]
async fn test_dropping_stream_future_releases_subscription() {
    let probe = ScriptedProbe::constant(State::Waiting);
    let module = module(&probe);
    module.refresh_interval(Duration::from_secs(1));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let result = time::timeout(Duration::from_millis(2500), module.stream(tx)).await;
    assert!(result.is_err());

    // Initial render plus ticks at 1s and 2s
    let mut count = 0;
    while rx.try_recv().is_ok() {
        count += 1;
    }
    assert_eq!(count, 3);
    assert_eq!(module.renderer().subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_streams_of_separate_modules_are_independent() {
    let probe_a = ScriptedProbe::constant(State::Connected);
    let probe_b = ScriptedProbe::constant(State::Disconnected);
    let a = module(&probe_a);
    let b: NetworkModule<ScriptedProbe> = NetworkModule::with_probe("tun0", probe_b.clone());

    let (tx_a, mut rx_a) = mpsc::unbounded_channel();
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    let handle_a = a.spawn(tx_a);
    let handle_b = b.spawn(tx_b);

    assert_eq!(next(&mut rx_a).await, Output::text("connected"));
    assert_eq!(next(&mut rx_b).await, Output::text("disconnected"));

    a.output(|_| Output::text("only a"));
    assert_eq!(next(&mut rx_a).await, Output::text("only a"));
    assert!(rx_b.try_recv().is_err());
    assert_eq!(probe_b.interfaces(), vec!["tun0"]);

    handle_a.stop().await;
    handle_b.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_apply_settings_while_streaming() {
    let probe = ScriptedProbe::constant(State::Connected);
    let module = module(&probe);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = module.spawn(tx);
    assert_eq!(next(&mut rx).await, Output::text("connected"));

    let settings = Settings {
        interface: Some("wg0".to_string()),
        refresh_interval_secs: 60,
        format: FormatSettings {
            connected: "{iface} up ({code})".to_string(),
            ..Default::default()
        },
    };
    module.apply_settings(&settings);

    assert_eq!(next(&mut rx).await, Output::text("wg0 up (100)"));
    assert_eq!(module.scheduler().interval(), Duration::from_secs(60));
    assert_eq!(probe.calls(), 1);

    handle.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reconfiguration_is_race_free() {
    let probe = ScriptedProbe::constant(State::Connected);
    let module = module(&probe);
    module.refresh_interval(Duration::from_secs(3600));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = module.spawn(tx);
    next(&mut rx).await;

    let writers: Vec<_> = (0..8u32)
        .map(|id| {
            let module = module.clone();
            tokio::spawn(async move {
                for round in 0..50u32 {
                    let tag = format!("{}-{}", id, round);
                    module.output(move |_| Output::text(format!("{}|{}", tag, tag)));
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for writer in writers {
        writer.await.unwrap();
    }
    module.output(|_| Output::text("final|final"));

    let deadline = Duration::from_secs(5);
    loop {
        let out = time::timeout(deadline, next(&mut rx))
            .await
            .expect("final renderer never rendered");
        let (left, right) = out.text.split_once('|').expect("malformed output");
        assert_eq!(left, right);
        if left == "final" {
            break;
        }
    }

    // Renderer changes never probe
    assert_eq!(probe.calls(), 1);
    handle.stop().await;
}
