//! Demo exporter binary.
//!
//! Wires a few dynamic-label vectors into a registry, simulates traffic
//! against them, runs the periodic GC driver, and serves `/metrics`.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use dynavec_core::{CounterVec, GaugeVec, HistogramVec, Labels, Opts};
use dynavec_exporter::{config, http, Registry};

const CONFIG_PATH: &str = "dynavec.yaml";

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = if Path::new(CONFIG_PATH).exists() {
        config::load_from_file(CONFIG_PATH).expect("config load failed")
    } else {
        config::ExporterConfig::default()
    };
    let listen: SocketAddr = cfg
        .exporter
        .listen
        .parse()
        .expect("exporter.listen must be a valid SocketAddr");

    let requests = Arc::new(
        CounterVec::new(
            Opts::new("demo_requests_total", "Requests served, by path and method")
                .expire(Duration::from_secs(300))
                .max_length(1000),
        )
        .expect("counter opts"),
    );
    let response_time = Arc::new(
        HistogramVec::new(
            Opts::new("demo_response_time_seconds", "Response time, by path")
                .buckets(vec![0.005, 0.05, 0.5, 5.0])
                .expire(Duration::from_secs(300))
                .max_length(1000),
        )
        .expect("histogram opts"),
    );
    let inflight = Arc::new(
        GaugeVec::new(Opts::new("demo_inflight_requests", "In-flight requests"))
            .expect("gauge opts"),
    );

    let registry = Arc::new(Registry::new());
    registry.register(requests.clone()).expect("register requests");
    registry
        .register(response_time.clone())
        .expect("register response_time");
    registry.register(inflight.clone()).expect("register inflight");

    // Simulated traffic so the endpoint has something to show.
    {
        let requests = Arc::clone(&requests);
        let response_time = Arc::clone(&response_time);
        let inflight = Arc::clone(&inflight);
        tokio::spawn(async move {
            let paths = ["/index", "/search", "/api/v1/items"];
            let mut i: usize = 0;
            loop {
                let path = paths[i % paths.len()];
                let labels = Labels::from([
                    ("path".to_string(), path.to_string()),
                    ("method".to_string(), "GET".to_string()),
                ]);
                if let Ok(c) = requests.get_or_create(&labels) {
                    c.inc();
                }
                let hist_labels = Labels::from([("path".to_string(), path.to_string())]);
                if let Ok(h) = response_time.get_or_create(&hist_labels) {
                    h.observe(0.001 * (1 + i % 700) as f64);
                }
                if let Ok(g) = inflight.get_or_create(&Labels::new()) {
                    g.set((i % 10) as f64);
                }
                i += 1;
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        });
    }

    // GC is timer-driven, never part of the request path.
    {
        let requests = Arc::clone(&requests);
        let response_time = Arc::clone(&response_time);
        let interval = Duration::from_millis(cfg.exporter.gc_interval_ms);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let a = requests.gc();
                let b = response_time.gc();
                tracing::debug!(
                    deleted = a.deleted + b.deleted,
                    limit_exceeded = a.limit_exceeded || b.limit_exceeded,
                    "gc pass"
                );
            }
        });
    }

    let app = http::build_router(registry);

    tracing::info!(%listen, "dynavec-exporter starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
