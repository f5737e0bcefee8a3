// Copyright 2025 the Tapestry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `tapestry_long_press` + `tapestry_event`.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use tapestry_event::{InputEvent, TouchPoint};
use tapestry_long_press::{CancelOnMovement, LongPressOptions, PressMachine};

fn machine(options: LongPressOptions<u32>) -> PressMachine<u32> {
    PressMachine::new(Some(Box::new(|_event, _meta| {})), options)
}

fn bench_press_cycles(c: &mut Criterion) {
    c.bench_function("press_cycle/sustained", |b| {
        b.iter_batched(
            || machine(LongPressOptions::new().threshold(400)),
            |mut machine| {
                let mut down = InputEvent::pointer("pointerdown", 1, Point::new(10.0, 10.0), 0);
                machine.start(&mut down, Some(1));
                machine.poll(black_box(400));
                let mut up = InputEvent::pointer("pointerup", 1, Point::new(10.0, 10.0), 450);
                machine.release(&mut up, Some(1), None);
                machine
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("press_cycle/early_release", |b| {
        b.iter_batched(
            || machine(LongPressOptions::new().threshold(400)),
            |mut machine| {
                let mut down = InputEvent::pointer("pointerdown", 1, Point::new(10.0, 10.0), 0);
                machine.start(&mut down, None);
                let mut up = InputEvent::pointer("pointerup", 1, Point::new(10.0, 10.0), 50);
                machine.release(&mut up, None, None);
                machine
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_movement_storm(c: &mut Criterion) {
    // A press riding out a stream of in-tolerance move events.
    c.bench_function("movement/100_moves_within_tolerance", |b| {
        b.iter_batched(
            || {
                let mut machine = machine(
                    LongPressOptions::new()
                        .threshold(100_000)
                        .cancel_on_movement(CancelOnMovement::Within(1_000.0)),
                );
                let mut down = InputEvent::pointer("pointerdown", 1, Point::new(0.0, 0.0), 0);
                machine.start(&mut down, None);
                machine
            },
            |mut machine| {
                for i in 0..100_u64 {
                    let x = (i % 7) as f64;
                    let mut mv =
                        InputEvent::pointer("pointermove", 1, Point::new(x, -x), 10 + i);
                    machine.movement(&mut mv, None);
                }
                machine
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_classification(c: &mut Criterion) {
    let touch = InputEvent::touch(
        "touchmove",
        vec![TouchPoint::new(Point::new(3.0, 4.0))],
        0,
    );
    let foreign = InputEvent::new("wheel", 0);

    c.bench_function("classify/touch_with_position", |b| {
        b.iter(|| {
            let event = black_box(&touch);
            black_box(event.position())
        });
    });

    c.bench_function("classify/foreign_event", |b| {
        b.iter(|| {
            let event = black_box(&foreign);
            black_box(event.classify())
        });
    });
}

criterion_group!(
    benches,
    bench_press_cycles,
    bench_movement_storm,
    bench_classification
);
criterion_main!(benches);
