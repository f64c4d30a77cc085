// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Vec2};
use std::cell::Cell;
use std::rc::Rc;
use ui_events::pointer::PointerButton;
use understory_ruler::{
    ColumnRuler, EditorEvent, EditorHandle, EditorId, GeometryProvider, HeadlessRenderer,
    SubscriptionId, TickSequence, Topics,
};

struct BenchEditor {
    scroll_x: Rc<Cell<f64>>,
    longest: Rc<Cell<u32>>,
}

impl GeometryProvider for BenchEditor {
    fn scroll_position(&self) -> Vec2 {
        Vec2::new(self.scroll_x.get(), 0.0)
    }
    fn viewport_width(&self) -> f64 {
        1280.0
    }
    fn gutter_width(&self) -> f64 {
        42.0
    }
    fn line_padding(&self) -> f64 {
        4.0
    }
    fn font_size(&self) -> f64 {
        14.0
    }
    fn longest_line_length(&self) -> u32 {
        self.longest.get()
    }
    fn word_wrap_enabled(&self) -> bool {
        false
    }
}

impl EditorHandle for BenchEditor {
    fn id(&self) -> EditorId {
        EditorId(1)
    }
    fn subscribe(&mut self, _topics: Topics) -> SubscriptionId {
        SubscriptionId(0)
    }
    fn unsubscribe(&mut self, _subscription: SubscriptionId) {}
}

type Ruler = ColumnRuler<BenchEditor, HeadlessRenderer>;

fn bound_ruler() -> (Ruler, Rc<Cell<f64>>, Rc<Cell<u32>>) {
    let scroll_x = Rc::new(Cell::new(0.0));
    let longest = Rc::new(Cell::new(72));
    let mut ruler = ColumnRuler::new(HeadlessRenderer::default());
    ruler.set_enabled(true);
    ruler.set_editor(Some(BenchEditor {
        scroll_x: scroll_x.clone(),
        longest: longest.clone(),
    }));
    (ruler, scroll_x, longest)
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("ruler/reconcile");

    // Growth and shrink should scale with the delta, not the final length.
    for (from, to) in [(80_u32, 120_u32), (80, 1000), (1000, 80), (990, 1000)] {
        group.throughput(Throughput::Elements(u64::from(from.abs_diff(to))));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{from}->{to}")),
            &(from, to),
            |b, &(from, to)| {
                b.iter_batched(
                    || TickSequence::new(from),
                    |mut seq| {
                        black_box(seq.reconcile(to));
                        black_box(seq);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.bench_function("noop", |b| {
        let mut seq = TickSequence::new(500);
        b.iter(|| black_box(seq.reconcile(black_box(500))));
    });

    group.finish();
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("ruler/refresh");

    group.bench_function("scroll_event", |b| {
        let (mut ruler, scroll_x, _) = bound_ruler();
        let mut x = 0.0;
        b.iter(|| {
            x = (x + 7.0) % 2_000.0;
            scroll_x.set(x);
            ruler.handle_event(EditorId(1), EditorEvent::Scroll);
            black_box(ruler.state());
        });
    });

    group.bench_function("text_event_growing", |b| {
        let (mut ruler, _, longest) = bound_ruler();
        let mut n = 0_u32;
        b.iter(|| {
            n = (n + 13) % 1_200;
            longest.set(n);
            ruler.handle_event(EditorId(1), EditorEvent::TextChange);
            black_box(ruler.state());
        });
    });

    group.bench_function("full", |b| {
        let (mut ruler, _, _) = bound_ruler();
        b.iter(|| {
            ruler.refresh(true);
            black_box(ruler.state());
        });
    });

    group.finish();
}

fn bench_drag(c: &mut Criterion) {
    c.bench_function("ruler/drag_sweep", |b| {
        let (mut ruler, _, _) = bound_ruler();
        let strip = ruler.strip();
        let xs: Vec<f64> = (0..80).map(|col| strip.tick_start(col) + 1.0).collect();
        b.iter(|| {
            ruler.pointer_down(PointerButton::Primary, Point::new(xs[0], 4.0));
            for &x in &xs {
                ruler.pointer_move(Point::new(x, 4.0));
            }
            ruler.pointer_up();
            black_box(ruler.guide());
        });
    });
}

criterion_group!(benches, bench_reconcile, bench_refresh, bench_drag);
criterion_main!(benches);
