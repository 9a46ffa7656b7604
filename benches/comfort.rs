use criterion::{black_box, criterion_group, criterion_main, Criterion};
use littoral::{compute_score, score_rows, MetricValue, MonthlyRow, Params, Rounding};

fn bench_params() -> Params {
    Params {
        ds: 0.5,
        sea_max: 26.0,
        s0: 20.0,
        s1: 22.0,
        s2: 24.0,
        s3: 25.0,
        s4: 26.0,
        rain_t1: 8.0,
        rain_t2: 15.0,
        cold_air_t: 15.0,
        wind_cold_t: 6.0,
        heat_air_t: 32.0,
        calm_wind_t: 2.0,
        breath_air_t: 30.0,
        breath_rain_t: 12.0,
        breath_wind_t: 3.0,
        strong_wind_t: 10.0,
        breeze_w0: 2.0,
        breeze_w1: 6.0,
        breeze_ramp: 1.5,
        wave_t1: 0.5,
        wave_t2: 1.2,
        wave_t3: 2.0,
        rounding: Rounding::Integer,
    }
}

fn value(v: f64) -> MetricValue {
    MetricValue {
        value: v,
        is_proxy: false,
        coverage: 1.0,
        flagged: false,
    }
}

fn bench_compute_score(c: &mut Criterion) {
    let params = bench_params();
    c.bench_function("compute_score", |b| {
        b.iter(|| {
            compute_score(
                black_box(28.0),
                black_box(25.0),
                black_box(3.0),
                black_box(4.0),
                black_box(0.6),
                &params,
            )
        })
    });
}

fn bench_score_year(c: &mut Criterion) {
    let params = bench_params();
    let rows: Vec<MonthlyRow> = (1..=12)
        .map(|month| MonthlyRow {
            location_id: "bench".into(),
            month,
            air_temp_c: value(20.0 + month as f64),
            sea_temp_c: value(18.0 + month as f64 * 0.7),
            rain_days: value((month % 7) as f64 * 2.0),
            wind_ms: value(3.0 + (month % 5) as f64),
            wave_hs_m: value(0.3 + (month % 4) as f64 * 0.4),
        })
        .collect();
    c.bench_function("score_year", |b| {
        b.iter(|| score_rows(black_box(&rows), &params))
    });
}

criterion_group!(benches, bench_compute_score, bench_score_year);
criterion_main!(benches);
