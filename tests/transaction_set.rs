//! Ordering, category and lineage behaviour of transaction sets

use chrono::DateTime;
use gainledger::{
    Configuration, Entry, EntrySetType, LedgerError, PrecisionDecimal, Transaction,
    TransactionSet, TransactionType,
};
use rust_decimal_macros::dec;
use std::path::Path;

fn configuration() -> Configuration {
    Configuration::from_path(Path::new("tests/data/test_config.json")).unwrap()
}

fn d(value: rust_decimal::Decimal) -> PrecisionDecimal {
    value.into()
}

fn t1(config: &Configuration) -> Transaction {
    Transaction::outflow(
        config,
        10,
        "6/1/2020 3:59:59 -04:00",
        "B1",
        "Coinbase Pro",
        "Bob",
        "SeLL",
        d(dec!(900.9)),
        d(dec!(2.2)),
        d(dec!(0)),
    )
    .unwrap()
}

fn t2(config: &Configuration) -> Transaction {
    Transaction::inflow(
        config,
        20,
        "2021-01-02T08:42:43.882Z",
        "B1",
        "BlockFi",
        "Bob",
        "eaRn",
        d(dec!(1000.0)),
        d(dec!(2.0002)),
        d(dec!(0)),
        Some(d(dec!(2000.2))),
        Some(d(dec!(2000.2))),
    )
    .unwrap()
}

fn t3(config: &Configuration) -> Transaction {
    Transaction::inflow(
        config,
        30,
        "1/8/2021 8:42:43.883 -04:00",
        "B1",
        "Coinbase",
        "Alice",
        "bUy",
        d(dec!(1000)),
        d(dec!(3.0002)),
        d(dec!(20)),
        Some(d(dec!(3000.2))),
        Some(d(dec!(3020.2))),
    )
    .unwrap()
}

fn t4(config: &Configuration) -> Transaction {
    Transaction::transfer(
        config,
        40,
        "2021-03-28T08:42:43.882Z",
        "B1",
        "Coinbase",
        "Bob",
        "Coinbase",
        "Alice",
        d(dec!(100.0)),
        d(dec!(30)),
        d(dec!(30)),
    )
    .unwrap()
}

fn t5(config: &Configuration) -> Transaction {
    Transaction::transfer(
        config,
        50,
        "2021-04-02T08:42:43.882Z",
        "B1",
        "Coinbase Pro",
        "Bob",
        "BlockFi",
        "Alice",
        d(dec!(1000.0)),
        d(dec!(2.0002)),
        d(dec!(1.9998)),
    )
    .unwrap()
}

#[test]
fn mixed_set_orders_and_links_members() {
    let config = configuration();
    let mut set = TransactionSet::new(&config, EntrySetType::Mixed, "B1").unwrap();
    assert_eq!(set.iter().count(), 0);

    set.add_entry(t3(&config)).unwrap();
    set.add_entry(t2(&config)).unwrap();
    let lines: Vec<i64> = set.iter().map(|t| t.line()).collect();
    assert_eq!(lines, vec![20, 30]);

    set.add_entry(t1(&config)).unwrap();
    set.add_entry(t5(&config)).unwrap();
    set.add_entry(t4(&config)).unwrap();

    assert_eq!(set.entry_set_type(), EntrySetType::Mixed);
    assert_eq!(set.asset(), "B1");
    assert_eq!(set.len(), 5);

    let expected = [t1(&config), t2(&config), t3(&config), t4(&config), t5(&config)];
    let parents = [None, Some(10), Some(20), Some(30), Some(40)];
    let timestamps = [
        "2020-06-01T03:59:59-04:00",
        "2021-01-02T08:42:43.882Z",
        "2021-01-08T08:42:43.883-04:00",
        "2021-03-28T08:42:43.882Z",
        "2021-04-02T08:42:43.882Z",
    ];
    let transaction_types = [
        TransactionType::Sell,
        TransactionType::Earn,
        TransactionType::Buy,
        TransactionType::Move,
        TransactionType::Move,
    ];
    let usd_taxable_amounts = [dec!(1981.98), dec!(2000.2), dec!(0), dec!(0), dec!(0.4)];
    let crypto_balance_changes = [dec!(2.2), dec!(2.0002), dec!(3.0002), dec!(0), dec!(0.0004)];
    let usd_balance_changes = [dec!(1981.98), dec!(2000.2), dec!(3020.2), dec!(0), dec!(0.4)];

    let mut count = 0;
    for (i, transaction) in set.iter().enumerate() {
        assert_eq!(transaction, &expected[i]);
        assert_eq!(
            set.get_parent(transaction).unwrap().map(|p| p.line()),
            parents[i]
        );
        assert_eq!(
            transaction.timestamp(),
            DateTime::parse_from_rfc3339(timestamps[i]).unwrap()
        );
        assert_eq!(transaction.transaction_type(), transaction_types[i]);
        assert_eq!(transaction.asset(), "B1");
        assert!(transaction.usd_taxable_amount().equals(&d(usd_taxable_amounts[i])));
        assert!(transaction.crypto_balance_change().equals(&d(crypto_balance_changes[i])));
        assert!(transaction.usd_balance_change().equals(&d(usd_balance_changes[i])));
        count += 1;
    }
    assert_eq!(count, 5);

    // iteration restarts from the beginning
    assert_eq!(set.iter().next().unwrap().line(), 10);
    assert_eq!((&set).into_iter().count(), 5);

    let expected_header = format!(
        "TransactionSet:\n  configuration={}\n  entry_set_type=MIXED\n  asset=B1\n",
        Path::new("tests/data/test_config.json").display()
    );
    assert!(set.to_string().starts_with(&expected_header));
}

#[test]
fn parent_is_independent_of_insertion_order() {
    let config = configuration();
    let orders: [[usize; 5]; 3] = [[0, 1, 2, 3, 4], [4, 3, 2, 1, 0], [2, 4, 0, 3, 1]];
    for order in orders {
        let all = [t1(&config), t2(&config), t3(&config), t4(&config), t5(&config)];
        let mut set = TransactionSet::new(&config, EntrySetType::Mixed, "B1").unwrap();
        for &i in &order {
            set.add_entry(all[i].clone()).unwrap();
        }
        assert!(set.get_parent(&all[0]).unwrap().is_none());
        for i in 1..all.len() {
            assert_eq!(set.get_parent(&all[i]).unwrap(), Some(&all[i - 1]));
        }
    }
}

#[test]
fn category_mismatch_is_type_error() {
    let config = configuration();
    let mut in_set = TransactionSet::new(&config, EntrySetType::In, "B1").unwrap();
    let mut out_set = TransactionSet::new(&config, EntrySetType::Out, "B1").unwrap();
    let mut intra_set = TransactionSet::new(&config, EntrySetType::Intra, "B1").unwrap();

    let err = in_set.add_entry(t1(&config)).unwrap_err();
    assert_eq!(
        err,
        LedgerError::Type("Attempting to add an OUT transaction (line 10) to a set of type IN".to_string())
    );

    let err = out_set.add_entry(t5(&config)).unwrap_err();
    assert!(err.is_type_error());
    assert!(err.message().ends_with("to a set of type OUT"));

    let err = intra_set.add_entry(t2(&config)).unwrap_err();
    assert!(err.is_type_error());
    assert!(err.message().contains("an IN transaction"));
    assert!(err.message().ends_with("to a set of type INTRA"));

    assert!(in_set.add_entry(t2(&config)).is_ok());
    assert!(out_set.add_entry(t1(&config)).is_ok());
    assert!(intra_set.add_entry(t5(&config)).is_ok());
}

#[test]
fn parent_of_non_member_is_value_error() {
    let config = configuration();
    let in_set = TransactionSet::new(&config, EntrySetType::In, "B1").unwrap();
    let out_set = TransactionSet::new(&config, EntrySetType::Out, "B1").unwrap();
    let intra_set = TransactionSet::new(&config, EntrySetType::Intra, "B1").unwrap();

    for (set, transaction) in [
        (&in_set, t1(&config)),
        (&out_set, t5(&config)),
        (&intra_set, t2(&config)),
    ] {
        let err = set.get_parent(&transaction).unwrap_err();
        assert!(err.is_value_error());
        assert!(err.message().starts_with("Unknown entry:"));
    }
}

#[test]
fn same_line_in_another_category_is_not_a_member() {
    let config = configuration();
    let mut set = TransactionSet::new(&config, EntrySetType::Mixed, "B1").unwrap();
    set.add_entry(t2(&config)).unwrap();
    let sale_on_line_20 = Transaction::outflow(
        &config,
        20,
        "2021-01-05T00:00:00Z",
        "B1",
        "Kraken",
        "Bob",
        "sell",
        d(dec!(1000)),
        d(dec!(1)),
        d(dec!(0)),
    )
    .unwrap();
    assert!(set.get_parent(&sale_on_line_20).is_err());
}

#[test]
fn set_type_from_string() {
    let config = configuration();
    let set_type = EntrySetType::type_check_from_string("entry_set_type", "in").unwrap();
    let set = TransactionSet::new(&config, set_type, "B2").unwrap();
    assert_eq!(set.entry_set_type(), EntrySetType::In);

    let err = EntrySetType::type_check_from_string("entry_set_type", "foobar").unwrap_err();
    assert!(err.is_value_error());

    let err = TransactionSet::new(&config, EntrySetType::In, "Qwerty").unwrap_err();
    assert_eq!(err.message(), "Parameter 'asset' value is not known: \"Qwerty\"");
}
