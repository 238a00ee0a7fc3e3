// Coverage and ordering properties of vendor line attribution

use proptest::prelude::*;
use serde_json::json;

use marketplace_commission::orders::models::OrderLine;
use marketplace_commission::orders::{LineAttributor, UNBRANDED_VENDOR_KEY};

const BRAND_ATTRIBUTE: &str = "QXR0cmlidXRlOjQ0";

fn line(index: usize, brand: Option<&str>) -> OrderLine {
    let mut attributes = vec![json!({
        "attribute": {"id": "QXR0cmlidXRlOjE="},
        "values": [{"slug": "blue"}]
    })];
    if let Some(slug) = brand {
        attributes.push(json!({
            "attribute": {"id": BRAND_ATTRIBUTE},
            "values": [{"slug": slug}]
        }));
    }

    serde_json::from_value(json!({
        "id": format!("line-{}", index),
        "variant": {"product": {"attributes": attributes}},
        "totalPrice": {
            "gross": {"amount": "12.10", "currency": "EUR"},
            "net": {"amount": "10.00", "currency": "EUR"}
        }
    }))
    .unwrap()
}

fn brand() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        Just(None),
        Just(Some("acme")),
        Just(Some("north-sea-tea")),
        Just(Some("zeta")),
        Just(Some("")),
    ]
}

fn index_of(line: &OrderLine) -> usize {
    line.id
        .as_deref()
        .and_then(|id| id.strip_prefix("line-"))
        .and_then(|n| n.parse().ok())
        .unwrap()
}

proptest! {
    #[test]
    fn test_every_line_lands_in_exactly_one_group(brands in prop::collection::vec(brand(), 0..40)) {
        let lines: Vec<OrderLine> = brands.iter().enumerate().map(|(i, b)| line(i, *b)).collect();
        let attributor = LineAttributor::new(BRAND_ATTRIBUTE);

        let groups = attributor.attribute(&lines);

        let total: usize = groups.iter().map(|g| g.lines.len()).sum();
        prop_assert_eq!(total, lines.len());

        let mut seen: Vec<usize> = groups
            .iter()
            .flat_map(|g| g.lines.iter().map(index_of))
            .collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..lines.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_groups_keep_line_order_and_are_sorted(brands in prop::collection::vec(brand(), 0..40)) {
        let lines: Vec<OrderLine> = brands.iter().enumerate().map(|(i, b)| line(i, *b)).collect();
        let groups = LineAttributor::new(BRAND_ATTRIBUTE).attribute(&lines);

        let keys: Vec<&str> = groups.iter().map(|g| g.vendor_key.as_str()).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(keys, sorted);

        for group in &groups {
            prop_assert!(!group.lines.is_empty());
            let indices: Vec<usize> = group.lines.iter().map(index_of).collect();
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));

            for l in &group.lines {
                let expected = match brands[index_of(l)] {
                    Some(slug) if !slug.is_empty() => slug,
                    _ => UNBRANDED_VENDOR_KEY,
                };
                prop_assert_eq!(group.vendor_key.as_str(), expected);
            }
        }
    }
}

#[test]
fn test_unattributed_lines_go_to_sentinel_group() {
    let lines = vec![line(0, None), line(1, Some("acme")), line(2, None)];
    let groups = LineAttributor::new(BRAND_ATTRIBUTE).attribute(&lines);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].vendor_key, "acme");
    assert_eq!(groups[1].vendor_key, UNBRANDED_VENDOR_KEY);
    assert_eq!(groups[1].lines.len(), 2);
}

#[test]
fn test_other_attribute_id_means_unbranded() {
    let lines = vec![line(0, Some("acme"))];
    let groups = LineAttributor::new("QXR0cmlidXRlOjk5").attribute(&lines);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].vendor_key, UNBRANDED_VENDOR_KEY);
}

#[test]
fn test_empty_order_has_no_groups() {
    assert!(LineAttributor::new(BRAND_ATTRIBUTE).attribute(&[]).is_empty());
}
