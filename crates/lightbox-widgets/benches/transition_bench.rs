//! Benchmark: per-frame cost of the transition machine and presentation.
//!
//! Run with: `cargo bench -p lightbox-widgets --bench transition_bench`
//!
//! Covers one machine tick plus frame derivation mid-expand, and a full
//! render of a populated grid with the overlay shown.

use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use lightbox_core::geometry::PageRect;
use lightbox_widgets::{
    Catalog, CatalogEntry, DisplayList, ItemId, Lightbox, LightboxConfig, TransitionMachine,
};

const FRAME: Duration = Duration::from_millis(16);

fn bench_machine(c: &mut Criterion) {
    let mut group = c.benchmark_group("transition");
    let origin = PageRect::new(0.0, 0.0, 123.0, 120.0, 126.0, 123.0);

    group.bench_function("tick_and_frame", |b| {
        let config = LightboxConfig::default().expand_duration(Duration::from_secs(3600));
        let mut machine = TransitionMachine::new(&config);
        machine.select(ItemId(4), origin);
        b.iter(|| {
            machine.tick(black_box(FRAME));
            black_box(machine.frame());
        });
    });

    group.bench_function("full_cycle", |b| {
        let config = LightboxConfig::default();
        b.iter(|| {
            let mut machine = TransitionMachine::new(&config);
            machine.select(ItemId(4), origin);
            while machine.is_animating() {
                machine.tick(FRAME);
            }
            machine.dismiss();
            while machine.is_animating() {
                machine.tick(FRAME);
            }
            black_box(machine.snapshot())
        });
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let catalog: Catalog = (0..300)
        .map(|i| CatalogEntry::new(format!("img{i}.jpg")).caption(format!("Image {i}")))
        .collect();
    let mut lb = Lightbox::new(catalog, &LightboxConfig::default()).unwrap();
    lb.tick(FRAME);
    lb.select(ItemId(4));
    for _ in 0..10 {
        lb.tick(FRAME);
    }
    let mut list = DisplayList::new();

    c.bench_function("render_with_overlay", |b| {
        b.iter(|| {
            list.clear();
            lb.render(&mut list);
            black_box(list.len())
        });
    });
}

criterion_group!(benches, bench_machine, bench_render);
criterion_main!(benches);
