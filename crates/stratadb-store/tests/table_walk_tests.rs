//! Range walk behavior over typed tables: boundary handling, direction,
//! early termination, and isolation between tables sharing the keyspace.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stratadb_store::test_utils::MemoryEngine;
use stratadb_store::{Composite, Keyspace, StorageEngine, Table};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Row {
    tag: String,
}

fn row(tag: &str) -> Row {
    Row {
        tag: tag.to_string(),
    }
}

fn keyspace() -> Keyspace {
    Keyspace::new(Arc::new(MemoryEngine::new()) as Arc<dyn StorageEngine>)
}

fn long_table(ks: &Keyspace, id: u32, keys: &[i64]) -> Table<i64, Row> {
    let table = ks.open_table::<i64, Row>(id, "longs");
    ks.begin_write();
    for k in keys {
        table.put(k, &row(&k.to_string())).unwrap();
    }
    ks.commit();
    table
}

fn collect(
    table: &Table<i64, Row>,
    from: Option<i64>,
    to: Option<i64>,
    inclusive: bool,
    reverse: bool,
) -> Vec<i64> {
    let mut seen = Vec::new();
    table
        .walk(from.as_ref(), to.as_ref(), inclusive, reverse, |k| {
            seen.push(k);
            true
        })
        .unwrap();
    seen
}

#[test]
fn test_walk_boundary_matrix() {
    let ks = keyspace();
    let table = long_table(&ks, 1, &[1, 3, 5, 7, 9]);

    assert_eq!(collect(&table, Some(3), Some(7), true, false), vec![3, 5, 7]);
    assert_eq!(collect(&table, Some(3), Some(7), false, false), vec![5]);
    assert_eq!(collect(&table, Some(3), Some(7), true, true), vec![7, 5, 3]);
    assert_eq!(collect(&table, Some(3), Some(7), false, true), vec![5]);
}

#[test]
fn test_walk_bounds_between_stored_keys() {
    let ks = keyspace();
    let table = long_table(&ks, 1, &[1, 3, 5, 7, 9]);

    assert_eq!(collect(&table, Some(2), Some(8), true, false), vec![3, 5, 7]);
    assert_eq!(collect(&table, Some(2), Some(8), false, false), vec![3, 5, 7]);
}

#[test]
fn test_walk_unbounded_and_swapped() {
    let ks = keyspace();
    let table = long_table(&ks, 1, &[1, 3, 5, 7, 9]);

    assert_eq!(collect(&table, None, None, true, false), vec![1, 3, 5, 7, 9]);
    assert_eq!(collect(&table, None, None, true, true), vec![9, 7, 5, 3, 1]);
    // Reversed arguments are swapped; direction comes from `reverse` only.
    assert_eq!(collect(&table, Some(7), Some(3), true, false), vec![3, 5, 7]);
}

#[test]
fn test_walk_negative_keys_in_numeric_order() {
    let ks = keyspace();
    let table = long_table(&ks, 1, &[-5, -1, 0, 2, i64::MIN, i64::MAX]);

    assert_eq!(
        collect(&table, None, None, true, false),
        vec![i64::MIN, -5, -1, 0, 2, i64::MAX]
    );
}

#[test]
fn test_walk_early_termination() {
    let ks = keyspace();
    let table = long_table(&ks, 1, &[1, 3, 5]);

    let mut calls = 0;
    let exhausted = table
        .walk(None, None, true, false, |_| {
            calls += 1;
            false
        })
        .unwrap();
    assert!(!exhausted);
    assert_eq!(calls, 1);

    let exhausted = table.walk(None, None, true, false, |_| true).unwrap();
    assert!(exhausted);
}

#[test]
fn test_walk_records_decodes_values() {
    let ks = keyspace();
    let table = long_table(&ks, 1, &[2, 4]);

    let mut seen = Vec::new();
    table
        .walk_records(None, None, true, false, |k, v: Row| {
            seen.push((k, v.tag));
            true
        })
        .unwrap();
    assert_eq!(
        seen,
        vec![(2, "2".to_string()), (4, "4".to_string())]
    );
}

#[test]
fn test_walk_bypasses_write_buffer() {
    let ks = keyspace();
    let table = long_table(&ks, 1, &[1]);

    ks.begin_write();
    table.put(&2, &row("staged")).unwrap();
    // The staged key is visible to get but not to walks.
    assert_eq!(table.get(&2).unwrap(), Some(row("staged")));
    assert_eq!(collect(&table, None, None, true, false), vec![1]);
    ks.commit();
    assert_eq!(collect(&table, None, None, true, false), vec![1, 2]);
}

#[test]
fn test_tables_are_prefix_isolated() {
    let ks = keyspace();
    // Adjacent ids, plus ids whose encodings differ in length.
    let t1 = long_table(&ks, 1, &[10, 20]);
    let t2 = long_table(&ks, 2, &[11, 21]);
    let t3 = long_table(&ks, 0x7f, &[1]);
    let t4 = long_table(&ks, 0x80, &[2]);

    assert_eq!(collect(&t1, None, None, true, false), vec![10, 20]);
    assert_eq!(collect(&t2, None, None, true, false), vec![11, 21]);
    assert_eq!(collect(&t3, None, None, true, false), vec![1]);
    assert_eq!(collect(&t4, None, None, true, false), vec![2]);
}

#[test]
fn test_max_table_id_walks_via_escape_bound() {
    let ks = keyspace();
    let table = long_table(&ks, u32::MAX, &[1, 2]);

    assert_eq!(collect(&table, None, None, true, false), vec![1, 2]);
    assert_eq!(collect(&table, None, None, true, true), vec![2, 1]);
}

#[test]
fn test_text_table_walks_in_codepoint_order() {
    let ks = keyspace();
    let table = ks.open_table::<String, Row>(3, "texts");

    ks.begin_write();
    for s in ["beta", "alpha", "álpha", "日本"] {
        table.put(&s.to_string(), &row(s)).unwrap();
    }
    ks.commit();

    let mut seen = Vec::new();
    table
        .walk(None, None, true, false, |k| {
            seen.push(k);
            true
        })
        .unwrap();
    assert_eq!(seen, vec!["alpha", "beta", "álpha", "日本"]);

    assert_eq!(
        table.get(&"日本".to_string()).unwrap(),
        Some(row("日本"))
    );
}

#[test]
fn test_bytes_table_shared_prefix_boundaries() {
    // Variable-length byte keys sharing a prefix: byte-wise ordering puts
    // "ab" before "abc" before "b"; bounds must respect that.
    let ks = keyspace();
    let table = ks.open_table::<Vec<u8>, Row>(4, "bytes");

    ks.begin_write();
    for k in [b"ab".to_vec(), b"abc".to_vec(), b"b".to_vec()] {
        table.put(&k, &row("x")).unwrap();
    }
    ks.commit();

    let mut seen = Vec::new();
    table
        .walk(
            Some(&b"ab".to_vec()),
            Some(&b"abc".to_vec()),
            true,
            false,
            |k| {
                seen.push(k);
                true
            },
        )
        .unwrap();
    assert_eq!(seen, vec![b"ab".to_vec(), b"abc".to_vec()]);

    let mut seen = Vec::new();
    table
        .walk(
            Some(&b"ab".to_vec()),
            Some(&b"abc".to_vec()),
            false,
            false,
            |k| {
                seen.push(k);
                true
            },
        )
        .unwrap();
    assert!(seen.is_empty());
}

#[test]
fn test_composite_key_table_round_trips() {
    #[derive(bincode::Encode, bincode::Decode, Clone, Debug, PartialEq)]
    struct OrderLine {
        order_id: u32,
        line: u16,
    }

    let ks = keyspace();
    let table = ks.open_table::<Composite<OrderLine>, Row>(5, "order_lines");

    let key = Composite(OrderLine {
        order_id: 9,
        line: 2,
    });
    ks.begin_write();
    table.put(&key, &row("line")).unwrap();
    ks.commit();

    assert_eq!(table.get(&key).unwrap(), Some(row("line")));

    let mut seen = Vec::new();
    table
        .walk(None, None, true, false, |k| {
            seen.push(k);
            true
        })
        .unwrap();
    assert_eq!(seen, vec![key]);
}
