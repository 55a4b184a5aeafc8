use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use edge_pulse::telemetry::parsers::{
    count_log_errors, parse_cpu_usage, parse_memory_usage, parse_traffic_rates,
};
use edge_pulse::TelemetrySnapshot;

/// Synthetic /proc/net/dev capture with the given number of interfaces.
fn net_dev_block(interfaces: usize, offset: u64) -> String {
    let mut block = String::from(
        "Inter-|   Receive                                                |  Transmit\n \
         face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed\n",
    );
    for i in 0..interfaces {
        block.push_str(&format!(
            "  eth{}: {} 100 0 0 0 0 0 0 {} 200 0 0 0 0 0 0\n",
            i,
            1_000_000 + offset * (i as u64 + 1),
            2_000_000 + offset * (i as u64 + 1)
        ));
    }
    block
}

fn meminfo_block() -> String {
    "MemTotal: 1024000 kB\nMemFree: 204800 kB\nMemAvailable: 409600 kB\n\
     Buffers: 51200 kB\nCached: 102400 kB\nSwapTotal: 0 kB\nSwapFree: 0 kB\n"
        .to_string()
}

fn log_block(lines: usize) -> String {
    let mut block = String::new();
    for i in 0..lines {
        if i % 5 == 0 {
            block.push_str("Jan  1 00:00:01 gw dhcpd: uid lease 192.168.1.50 is duplicate on eth1\n");
        } else {
            block.push_str("Jan  1 00:00:01 gw kernel: eth0: link up\n");
        }
    }
    block
}

/// Benchmark traffic rate derivation across interface counts
fn bench_traffic_rates(c: &mut Criterion) {
    for interfaces in [2, 8, 32].iter() {
        let before = net_dev_block(*interfaces, 0);
        let after = net_dev_block(*interfaces, 1_048_576);

        c.bench_with_input(
            BenchmarkId::new("traffic_rates", interfaces),
            interfaces,
            |b, _| b.iter(|| parse_traffic_rates(&before, &after, 2.0)),
        );
    }
}

/// Benchmark CPU usage derivation
fn bench_cpu_usage(c: &mut Criterion) {
    let before = "cpu  10132153 290696 3084719 46828483 16683 0 25195 0 0 0\n\
                  cpu0 5066076 145348 1542359 23414241 8341 0 12597 0 0 0\n";
    let after = "cpu  10232153 290696 3184719 47628483 16683 0 25195 0 0 0\n\
                 cpu0 5116076 145348 1592359 23814241 8341 0 12597 0 0 0\n";

    c.bench_function("cpu_usage", |b| b.iter(|| parse_cpu_usage(before, after)));
}

/// Benchmark memory usage derivation
fn bench_memory_usage(c: &mut Criterion) {
    let block = meminfo_block();
    c.bench_function("memory_usage", |b| b.iter(|| parse_memory_usage(&block)));
}

/// Benchmark the log error scanner across tail lengths
fn bench_log_scanner(c: &mut Criterion) {
    for lines in [50, 500].iter() {
        let block = log_block(*lines);
        c.bench_with_input(BenchmarkId::new("log_scanner", lines), lines, |b, _| {
            b.iter(|| count_log_errors(&block))
        });
    }
}

/// Benchmark JSON serialization of a populated snapshot
fn bench_snapshot_serialization(c: &mut Criterion) {
    let before = net_dev_block(8, 0);
    let after = net_dev_block(8, 1_048_576);
    let snapshot = TelemetrySnapshot {
        uptime: "up 10 days".to_string(),
        firmware: "v2.0.9-hotfix.7".to_string(),
        cpu_percent: 11.1,
        memory_percent: 60.0,
        log_errors: 4,
        interfaces: parse_traffic_rates(&before, &after, 2.0),
    };

    c.bench_function("snapshot_json_serialization", |b| {
        b.iter(|| serde_json::to_string(&snapshot).expect("should serialize"))
    });
}

criterion_group!(
    benches,
    bench_traffic_rates,
    bench_cpu_usage,
    bench_memory_usage,
    bench_log_scanner,
    bench_snapshot_serialization
);

criterion_main!(benches);
