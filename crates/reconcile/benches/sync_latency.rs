use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parlay::{generate_candidates, DnbMarket, MarketBundle, MatchSnapshot, MatchSummary, TotalsMarket};
use reconcile::{
    logging::DiscardRunLogWriter, store::MatchRecord, InMemoryParlayStore, SqliteParlayStore,
    StopSignal, SyncEngine, SyncOptions,
};
use time::macros::datetime;
use tokio::runtime::Builder;

const BENCH_MATCHES: usize = 200;

fn summary(index: usize) -> MatchSummary {
    MatchSummary {
        id: format!("match-{index}"),
        home_team: format!("Home {index}"),
        away_team: format!("Away {index}"),
        league: "Bench League".to_string(),
        kickoff: datetime!(2026-10-18 15:00 UTC),
    }
}

fn record(index: usize) -> MatchRecord {
    let summary = summary(index);
    MatchRecord {
        id: summary.id,
        home_team: Some(summary.home_team),
        away_team: Some(summary.away_team),
        league: Some(summary.league),
        kickoff: Some(summary.kickoff),
    }
}

fn snapshots() -> Vec<MatchSnapshot> {
    (0..BENCH_MATCHES)
        .map(|index| {
            MatchSnapshot::new(
                summary(index),
                MarketBundle {
                    dnb: Some(DnbMarket {
                        home: 0.62,
                        away: 0.38,
                    }),
                    totals: Some(TotalsMarket {
                        under_3_5: Some(0.66),
                        under_4_5: Some(0.81),
                        over_2_5: None,
                    }),
                    ..MarketBundle::default()
                },
            )
        })
        .collect()
}

fn bench_sync_latency(c: &mut Criterion) {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime should build");
    let candidates = generate_candidates(&snapshots());

    let memory = Arc::new(InMemoryParlayStore::new());
    (0..BENCH_MATCHES).for_each(|index| memory.upsert_match(record(index)));
    let engine = SyncEngine::new(memory, SyncOptions::default());

    let first = runtime.block_on(engine.sync(
        &candidates,
        &StopSignal::new(),
        &mut DiscardRunLogWriter,
    ));
    if let Some(report) = first.latency {
        println!(
            "first_run created={} p50_micros={} p95_micros={} p99_micros={} max_micros={} samples={}",
            first.stats.created,
            report.p50_micros,
            report.p95_micros,
            report.p99_micros,
            report.max_micros,
            report.count
        );
    }

    c.bench_function("sync_already_synced_memory", |b| {
        b.iter(|| {
            let report = runtime.block_on(engine.sync(
                &candidates,
                &StopSignal::new(),
                &mut DiscardRunLogWriter,
            ));
            black_box(report);
        });
    });

    let sqlite = SqliteParlayStore::open_in_memory().expect("sqlite store should open");
    runtime.block_on(async {
        for index in 0..BENCH_MATCHES {
            sqlite
                .upsert_match(record(index))
                .await
                .expect("match should upsert");
        }
    });
    let engine = SyncEngine::new(Arc::new(sqlite), SyncOptions::default());
    runtime.block_on(engine.sync(&candidates, &StopSignal::new(), &mut DiscardRunLogWriter));

    c.bench_function("sync_already_synced_sqlite", |b| {
        b.iter(|| {
            let report = runtime.block_on(engine.sync(
                &candidates,
                &StopSignal::new(),
                &mut DiscardRunLogWriter,
            ));
            black_box(report);
        });
    });
}

criterion_group!(benches, bench_sync_latency);
criterion_main!(benches);
