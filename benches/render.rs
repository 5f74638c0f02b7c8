//! Benchmarks for event classification and frame rendering, both of which
//! run on every redraw.

use chrono::{Duration, TimeZone, Utc};
use craftwatch::calendar::{classify, Event};
use craftwatch::client::LogEntry;
use craftwatch::dashboard::view::render;
use craftwatch::dashboard::{DashboardState, LogSource, PanelData};
use craftwatch::health::{Dependency, HealthResult};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample_state(events: usize) -> DashboardState {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
    let mut state = DashboardState::new();

    let calendar = (0..events)
        .map(|i| Event {
            name: format!("Event {}", i),
            start: base + Duration::hours(i as i64),
            end: base + Duration::hours(i as i64 + 2),
        })
        .collect();
    let tick = state.calendar.begin();
    state.calendar.complete(tick, PanelData::Ready(calendar));

    let files = (0..20).map(|i| format!("event_{}.json", i)).collect();
    let tick = state.event_files.begin();
    state.event_files.complete(tick, PanelData::Ready(files));

    let entries = (0..50)
        .map(|i| LogEntry {
            timestamp: "2024-06-01T10:00:00".to_string(),
            log_level: "INFO".to_string(),
            message: format!("line {}", i),
        })
        .collect();
    let tick = state.logs.begin();
    state.logs.complete(tick, PanelData::Ready(entries));

    let tick = state.begin_health();
    state.complete_health(
        tick,
        vec![
            HealthResult::healthy(Dependency::GameServer, 12),
            HealthResult::unhealthy(Dependency::RemoteConsole, 30, None),
        ],
    );

    state.selection.log = Some(LogSource::Database);
    state
}

fn bench_classify(c: &mut Criterion) {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
    let end = start + Duration::hours(2);
    let now = start + Duration::minutes(30);

    c.bench_function("classify_event_status", |b| {
        b.iter(|| classify(black_box(start), black_box(end), black_box(now)));
    });
}

fn bench_render(c: &mut Criterion) {
    colored::control::set_override(false);
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap();

    for events in [10, 100] {
        let state = sample_state(events);
        c.bench_function(&format!("render_frame_{}_events", events), |b| {
            b.iter(|| black_box(render(black_box(&state), now)));
        });
    }
}

criterion_group!(benches, bench_classify, bench_render);
criterion_main!(benches);
