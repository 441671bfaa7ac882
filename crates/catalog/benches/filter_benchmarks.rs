use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use lumiere_catalog::{
    BrowseSession, FilterState, Page, PriceRange, Product, SortOrder, apply, facet_counts,
    price_bounds,
};
use lumiere_core::ProductId;

const CATEGORIES: [&str; 5] = ["Skincare", "Makeup", "Haircare", "Fragrance", "Bath & Body"];

/// Deterministic synthetic catalogue.
fn catalogue(size: usize) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            in_stock: i % 7 != 0,
            featured: i % 11 == 0,
            bestseller: i % 5 == 0,
            new_launch: i % 13 == 0,
            review_count: (i % 500) as u32,
            ..Product::new(
                ProductId::parse(format!("p{i}")).unwrap(),
                format!("{} Glow Serum No. {i}", CATEGORIES[i % CATEGORIES.len()]),
                CATEGORIES[i % CATEGORIES.len()],
                ((i * 37) % 2_500) as f64 + 99.0,
                ((i % 50) as f64) / 10.0,
            )
        })
        .collect()
}

fn busy_state(products: &[Product]) -> FilterState {
    let mut state = FilterState::default_for(price_bounds(products));
    state.categories.insert("skincare".to_string());
    state.categories.insert("makeup".to_string());
    state.price = PriceRange::new(200.0, 1_800.0).unwrap();
    state.min_rating = 3.5;
    state.in_stock = true;
    state.search = "serum".to_string();
    state
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_apply");

    for size in [100usize, 1_000, 10_000].iter() {
        let products = catalogue(*size);
        let state = busy_state(&products);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("all_facets", size), size, |b, _| {
            b.iter(|| black_box(apply(black_box(&products), black_box(&state))));
        });
    }

    group.finish();
}

fn bench_facet_counts(c: &mut Criterion) {
    let products = catalogue(5_000);
    let state = busy_state(&products);
    c.bench_function("facet_counts_5000", |b| {
        b.iter(|| black_box(facet_counts(black_box(&products), black_box(&state))));
    });
}

fn bench_browse_view(c: &mut Criterion) {
    let mut session = BrowseSession::new(catalogue(5_000));
    let state = busy_state(session.products());
    session.update(|s| *s = state);
    session.set_sort(SortOrder::PriceAsc);
    c.bench_function("browse_view_5000", |b| {
        b.iter(|| black_box(session.view(Page::default())));
    });
}

criterion_group!(benches, bench_apply, bench_facet_counts, bench_browse_view);
criterion_main!(benches);
