use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sdcore::{plan::make_plan, storage::MemoryStorage};
use sdexpr::{expr::Expression, integer::make_unsigned_integer, value::Value};
use sdschema::types::Type;

const ELEMENTS: usize = 4096;

fn build_storage(root: &Type) -> MemoryStorage {
    // Seeded so every run scans the same data.
    let mut rng = ChaCha8Rng::seed_from_u64(0x5D);
    let data = Value::Tuple(
        (0..ELEMENTS)
            .map(|_| make_unsigned_integer(rng.random_range(0..16u32)))
            .collect(),
    );

    let plan = make_plan::<MemoryStorage>(root, vec![], vec![]).unwrap();
    let mut storage = MemoryStorage::with_capacity(8 + ELEMENTS * 4);
    plan.initialize_storage(&mut storage, &data).unwrap();
    storage
}

fn bench_filter(c: &mut Criterion) {
    let root = Type::array(Type::unsigned_integer(32));
    let storage = build_storage(&root);

    // filter($arg[0], \($arg == $bound) [$arg[1]])
    let find = Expression::Argument.at(0).filter(Expression::lambda(
        Expression::Argument.equals(Expression::Bound),
        Expression::Argument.at(1),
    ));
    let plan = make_plan::<MemoryStorage>(&root, vec![find], vec![]).unwrap();
    let key = make_unsigned_integer(7u32);

    c.bench_function("filter_u32_equals", |b| {
        b.iter(|| {
            black_box(plan.get(0, &storage, &key).unwrap());
        })
    });
}

fn bench_index(c: &mut Criterion) {
    let root = Type::array(Type::unsigned_integer(32));
    let storage = build_storage(&root);
    let last = Expression::Argument.at(0).at(ELEMENTS as u64 - 1);
    let plan = make_plan::<MemoryStorage>(&root, vec![last], vec![]).unwrap();

    c.bench_function("index_last_u32", |b| {
        b.iter(|| {
            black_box(plan.get(0, &storage, &Value::Unit).unwrap());
        })
    });
}

criterion_group!(benches, bench_filter, bench_index);
criterion_main!(benches);
