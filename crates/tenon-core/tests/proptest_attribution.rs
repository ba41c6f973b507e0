use proptest::prelude::*;

use tenon_core::compare::{
    ChangeSource, FlatRow, attribute, build_comparison_rows, match_key,
};
use tenon_core::model::{Field, LineItem};

fn arb_line_item() -> impl Strategy<Value = LineItem> {
    (
        0_i64..4,
        0_i64..4,
        prop::option::of(0.0_f64..500.0),
        0.0_f64..10.0,
        prop::option::of("[a-z]{0,6}"),
        prop::option::of(0.0_f64..1000.0),
    )
        .prop_map(|(l1, l2, height, quantity, remark, unit_price)| {
            let mut item = LineItem {
                level1_category_id: l1,
                level2_category_id: l2,
                height,
                quantity,
                remark,
                unit_price,
                ..LineItem::default()
            };
            item.recompute_total();
            item
        })
}

fn arb_row() -> impl Strategy<Value = FlatRow> {
    ("[a-z]{0,4}", arb_line_item()).prop_map(|(project_name, item)| FlatRow {
        project_name,
        item,
    })
}

fn arb_field() -> impl Strategy<Value = Field> {
    prop::sample::select(Field::ALL.to_vec())
}

proptest! {
    #[test]
    fn attribute_is_total(
        field in arb_field(),
        submitted in prop::option::of(arb_line_item()),
        revision in prop::option::of(arb_line_item()),
        current in prop::option::of(arb_line_item()),
    ) {
        let result = attribute(field, submitted.as_ref(), revision.as_ref(), current.as_ref());
        prop_assert!(matches!(
            result,
            ChangeSource::None | ChangeSource::Revision | ChangeSource::Current | ChangeSource::Both
        ));
    }

    #[test]
    fn attribute_is_idempotent(
        field in arb_field(),
        submitted in prop::option::of(arb_line_item()),
        revision in prop::option::of(arb_line_item()),
        current in prop::option::of(arb_line_item()),
    ) {
        let first = attribute(field, submitted.as_ref(), revision.as_ref(), current.as_ref());
        let second = attribute(field, submitted.as_ref(), revision.as_ref(), current.as_ref());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn all_absent_rows_attribute_to_none(field in arb_field()) {
        prop_assert_eq!(attribute(field, None, None, None), ChangeSource::None);
    }

    #[test]
    fn match_key_depends_only_on_the_triple(row in arb_row()) {
        let mut reminted = row.clone();
        reminted.item.id += 1000;
        reminted.item.project_id += 1000;
        reminted.item.quantity += 1.0;
        reminted.item.remark = Some("noise".into());
        prop_assert_eq!(match_key(&row), match_key(&reminted));
    }

    #[test]
    fn union_never_drops_or_duplicates_rows(
        current in prop::collection::vec(arb_row(), 0..6),
    ) {
        let rows = build_comparison_rows(&current, None, None);
        // every current row survives
        prop_assert_eq!(
            rows.iter().filter(|r| r.current.is_some()).count(),
            rows.len()
        );
        // and keys are unique
        let mut keys: Vec<_> = rows.iter().map(|r| format!("{:?}", r.key)).collect();
        keys.sort();
        let before = keys.len();
        keys.dedup();
        prop_assert_eq!(before, keys.len());
        // distinct valid keys plus blank-key fallbacks account for everything
        let mut distinct: Vec<String> = Vec::new();
        let mut blanks = 0_usize;
        for row in &current {
            let key = match_key(row);
            if key == "--" || key.trim().is_empty() {
                blanks += 1;
            } else if !distinct.contains(&key) {
                distinct.push(key);
            }
        }
        prop_assert_eq!(rows.len(), distinct.len() + blanks);
    }
}
