use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sdcore::{
    SdError,
    config::EngineConfig,
    plan::{Plan, make_plan, make_plan_with_config},
    sql::create_tables,
    storage::MemoryStorage,
};
use sdexpr::{expr::Expression, integer::make_unsigned_integer, value::Value};
use sdschema::types::Type;

fn byte(value: u8) -> Value {
    make_unsigned_integer(value)
}

fn byte_array() -> Type {
    Type::array(Type::unsigned_integer(8))
}

/// `filter($arg[0], \($arg == $bound) [$arg[1]])`
fn find_key() -> Expression {
    Expression::Argument.at(0).filter(Expression::lambda(
        Expression::Argument.equals(Expression::Bound),
        Expression::Argument.at(1),
    ))
}

fn storage_with(plan: &Plan<MemoryStorage>, elements: &[u8]) -> MemoryStorage {
    let mut storage = MemoryStorage::new();
    let data = Value::tuple(elements.iter().copied().map(byte));
    plan.initialize_storage(&mut storage, &data).unwrap();
    storage
}

#[test]
fn filter_finds_key() {
    let plan = make_plan::<MemoryStorage>(&byte_array(), vec![find_key()], vec![]).unwrap();
    let storage = storage_with(&plan, &[1, 2, 3]);
    assert_eq!(storage.as_bytes(), &[0, 0, 0, 0, 0, 0, 0, 3, 1, 2, 3]);

    let result = plan.get(0, &storage, &byte(2)).unwrap();
    assert_eq!(result, Some(Value::tuple([byte(2)])));

    let result = plan.get(0, &storage, &byte(4)).unwrap();
    assert_eq!(result, Some(Value::Tuple(vec![])));
}

#[test]
fn truncated_storage_yields_none() {
    let plan = make_plan::<MemoryStorage>(&byte_array(), vec![find_key()], vec![]).unwrap();
    let mut storage = storage_with(&plan, &[1, 2, 3]);
    storage.truncate(10);
    assert_eq!(plan.get(0, &storage, &byte(2)).unwrap(), None);

    // Not even the length prefix.
    storage.truncate(7);
    assert_eq!(plan.get(0, &storage, &byte(2)).unwrap(), None);
}

#[test]
fn overflowing_address_yields_none() {
    let root = Type::array(Type::unsigned_integer(64));
    let get_last = Expression::Argument.at(0).at(u64::MAX / 2);
    let plan = make_plan::<MemoryStorage>(&root, vec![get_last], vec![]).unwrap();

    let storage = MemoryStorage::from(u64::MAX.to_be_bytes().to_vec());
    assert_eq!(plan.get(0, &storage, &Value::Unit).unwrap(), None);
}

#[test]
fn filter_matches_reference_scan() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xF117);
    let plan = make_plan::<MemoryStorage>(&byte_array(), vec![find_key()], vec![]).unwrap();

    for _ in 0..20 {
        let length = rng.random_range(0..64);
        let elements: Vec<u8> = (0..length).map(|_| rng.random_range(0..8)).collect();
        let storage = storage_with(&plan, &elements);
        let key: u8 = rng.random_range(0..8);

        let expected = Value::tuple(elements.iter().filter(|e| **e == key).map(|e| byte(*e)));
        assert_eq!(plan.get(0, &storage, &byte(key)).unwrap(), Some(expected));
    }
}

#[test]
fn contract_violations_are_errors() {
    let index_past_end = Expression::Argument.at(0).at(3);
    let filter_tuple = Expression::Argument.filter(Expression::lambda(
        Expression::literal(Value::Bit(true)),
        Expression::Bound,
    ));
    let plan = make_plan::<MemoryStorage>(&byte_array(), vec![index_past_end, filter_tuple], vec![]).unwrap();
    let storage = storage_with(&plan, &[1, 2, 3]);

    assert!(matches!(
        plan.get(0, &storage, &Value::Unit),
        Err(SdError::IndexOutOfRange { index: 3, length: 3 })
    ));
    assert!(plan.get(1, &storage, &Value::Unit).unwrap_err().is_not_an_array());
}

#[test]
fn empty_plan() {
    let plan = make_plan::<MemoryStorage>(&byte_array(), vec![], vec![]).unwrap();
    assert!(plan.gets.is_empty());
    assert_eq!(plan.layout().to_string(), "[bits8]");
}

#[test]
fn configured_plan_and_tables() {
    let config = EngineConfig::from_toml_str(
        r#"
        [plan]
        analyze_getters = false

        [sql]
        root_table = "bytes"
        "#,
    )
    .unwrap();
    let plan = make_plan_with_config::<MemoryStorage>(&byte_array(), vec![find_key()], vec![], &config).unwrap();
    let storage = storage_with(&plan, &[2, 2]);
    assert_eq!(
        plan.get(0, &storage, &byte(2)).unwrap(),
        Some(Value::tuple([byte(2), byte(2)]))
    );

    let tables = create_tables(&byte_array(), &[find_key()], &config.sql).unwrap();
    assert_eq!(tables, ["CREATE TABLE \"bytes\"( element_0 INTEGER)"]);
}
