/// Order pricing pipeline against a real MySQL database
///
/// Run with: cargo test --test commission_pipeline_test -- --ignored
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use marketplace_commission::commissions::{
    CommissionRepository, CommissionService, CommissionStatus,
};
use marketplace_commission::core::{AppError, CountryCode};
use marketplace_commission::orders::{LineAttributor, Order, UNBRANDED_VENDOR_KEY};
use marketplace_commission::settings::{SettingsRepository, UpdateSettingsRequest};
use marketplace_commission::vendors::models::{RegisterVendorRequest, MAX_VENDOR_KEY_LENGTH};
use marketplace_commission::vendors::{RateSource, VendorRepository};

mod database_setup;
use database_setup::setup_test_db;

const BRAND_ATTRIBUTE: &str = "QXR0cmlidXRlOjQ0";

/// (vendor slug, gross, net) per line
fn order(id: &str, lines: &[(Option<&str>, &str, &str)], ship_to: Option<&str>) -> Order {
    let lines: Vec<_> = lines
        .iter()
        .enumerate()
        .map(|(i, (brand, gross, net))| {
            let attributes = match brand {
                Some(slug) => json!([{"attribute": {"id": BRAND_ATTRIBUTE}, "values": [{"slug": slug}]}]),
                None => json!([]),
            };
            json!({
                "id": format!("{}-line-{}", id, i),
                "variant": {"product": {"attributes": attributes}},
                "totalPrice": {
                    "gross": {"amount": gross, "currency": "EUR"},
                    "net": {"amount": net, "currency": "EUR"}
                }
            })
        })
        .collect();

    let shipping = ship_to.map(|code| json!({"country": {"code": code}}));

    serde_json::from_value(json!({
        "id": id,
        "lines": lines,
        "shippingAddress": shipping,
        "total": {
            "gross": {"amount": "0", "currency": "EUR"},
            "net": {"amount": "0", "currency": "EUR"}
        }
    }))
    .unwrap()
}

fn service(pool: &sqlx::MySqlPool) -> CommissionService {
    CommissionService::new(pool.clone(), LineAttributor::new(BRAND_ATTRIBUTE))
}

fn register(key: &str, rate: Decimal, country: &str, vat_verified: bool) -> RegisterVendorRequest {
    RegisterVendorRequest {
        vendor_key: key.to_string(),
        display_name: key.to_uppercase(),
        commission_rate: Some(rate),
        country_code: Some(CountryCode::new(country).unwrap()),
        vat_number: vat_verified.then(|| format!("{}123456789", country)),
        is_vat_verified: vat_verified,
    }
}

async fn vendor_count(pool: &sqlx::MySqlPool, vendor_key: &str) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM vendor_profiles WHERE vendor_key = ?")
            .bind(vendor_key)
            .fetch_one(pool)
            .await
            .unwrap();
    count
}

async fn commission_count(pool: &sqlx::MySqlPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM commissions")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_redelivery_converges_on_same_rows() {
    let db = setup_test_db().await;
    let service = service(&db.pool);
    let paid = order(
        "T3JkZXI6MQ==",
        &[(Some("acme"), "121.00", "100.00"), (None, "24.20", "20.00")],
        Some("NL"),
    );

    let first = service.record_order(&paid).await.unwrap();
    let second = service.record_order(&paid).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(commission_count(&db.pool).await, 2);

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.commission.id, b.commission.id);
        assert_eq!(a.commission.commission_key, b.commission.commission_key);
        assert_eq!(a.commission.commission_amount, b.commission.commission_amount);
        assert_eq!(a.commission.created_at, b.commission.created_at);
    }

    assert!(first.iter().all(|r| r.vendor_created));
    assert!(second.iter().all(|r| !r.vendor_created));
    assert_eq!(second[1].vendor.vendor_key, UNBRANDED_VENDOR_KEY);

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_auto_provisioning_uses_current_default_rate() {
    let db = setup_test_db().await;
    let settings = SettingsRepository::new(db.pool.clone());
    settings
        .update(&UpdateSettingsRequest {
            default_commission_rate: Some(dec!(12.50)),
            ..Default::default()
        })
        .await
        .unwrap();

    let results = service(&db.pool)
        .record_order(&order("order-2", &[(Some("north-sea-tea"), "100.00", "82.64")], None))
        .await
        .unwrap();

    let result = &results[0];
    assert!(result.vendor_created);
    assert_eq!(result.vendor.commission_rate, dec!(12.50));
    assert_eq!(result.vendor.display_name, "north sea tea");
    assert!(result.vendor.country_code.is_none());
    assert_eq!(result.commission.rate, dec!(12.50));
    assert_eq!(result.commission.rate_source, RateSource::Base);
    // 100 * 12.5% = 12.50 net; VAT 2.625 rounds half-even to 2.62
    assert_eq!(result.commission.commission_net, dec!(12.50));
    assert_eq!(result.commission.commission_vat, dec!(2.62));
    assert_eq!(result.commission.commission_amount, dec!(15.12));

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_zero_rate_vendor_gets_zero_row() {
    let db = setup_test_db().await;
    let vendors = VendorRepository::new(db.pool.clone());
    vendors
        .create(&register("charity", Decimal::ZERO, "NL", false), Decimal::ZERO)
        .await
        .unwrap();

    let results = service(&db.pool)
        .record_order(&order("order-3", &[(Some("charity"), "50.00", "41.32")], Some("NL")))
        .await
        .unwrap();

    assert_eq!(commission_count(&db.pool).await, 1);
    assert_eq!(results[0].commission_amount, Decimal::ZERO);
    assert_eq!(results[0].commission.order_gross_total, dec!(50.00));

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_reverse_charge_and_oss_are_persisted() {
    let db = setup_test_db().await;
    SettingsRepository::new(db.pool.clone())
        .update(&UpdateSettingsRequest {
            oss_enabled: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    let vendors = VendorRepository::new(db.pool.clone());
    vendors
        .create(&register("brand-de", dec!(10), "DE", true), dec!(10))
        .await
        .unwrap();
    vendors
        .create(&register("brand-nl", dec!(10), "NL", true), dec!(10))
        .await
        .unwrap();

    let results = service(&db.pool)
        .record_order(&order(
            "order-4",
            &[(Some("brand-de"), "100.00", "84.03"), (Some("brand-nl"), "100.00", "84.03")],
            Some("DE"),
        ))
        .await
        .unwrap();

    let de = &results[0].commission;
    assert_eq!(de.vendor_key, "brand-de");
    assert!(!de.is_oss);
    assert_eq!(de.commission_net, dec!(10.00));
    assert_eq!(de.commission_vat, dec!(0.00));
    assert_eq!(de.commission_amount, dec!(10.00));

    let nl = &results[1].commission;
    assert!(nl.is_oss);
    assert_eq!(nl.destination_country.as_str(), "DE");
    assert_eq!(nl.commission_vat, dec!(2.10));
    assert_eq!(nl.commission_amount, dec!(12.10));

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_override_rate_recorded_with_source() {
    let db = setup_test_db().await;
    let vendors = VendorRepository::new(db.pool.clone());
    vendors
        .create(&register("acme", dec!(10), "NL", false), dec!(10))
        .await
        .unwrap();
    let now = Utc::now();
    vendors
        .set_override("acme", dec!(4.5), now + Duration::days(2))
        .await
        .unwrap();

    let service = service(&db.pool);
    let during = service
        .record_order_at(&order("order-5", &[(Some("acme"), "200.00", "165.29")], None), now)
        .await
        .unwrap();
    assert_eq!(during[0].commission.rate, dec!(4.5));
    assert_eq!(during[0].commission.rate_source, RateSource::Override);
    assert_eq!(during[0].commission.commission_net, dec!(9.00));

    let later = service
        .record_order_at(
            &order("order-6", &[(Some("acme"), "200.00", "165.29")], None),
            now + Duration::days(3),
        )
        .await
        .unwrap();
    assert_eq!(later[0].commission.rate, dec!(10));
    assert_eq!(later[0].commission.rate_source, RateSource::Base);

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_settled_commission_is_not_refreshed() {
    let db = setup_test_db().await;
    let service = service(&db.pool);
    let paid = order("order-7", &[(Some("acme"), "100.00", "82.64")], None);

    let first = service.record_order(&paid).await.unwrap();
    sqlx::query("UPDATE commissions SET status = 'SETTLED' WHERE commission_key = ?")
        .bind(&first[0].commission.commission_key)
        .execute(&db.pool)
        .await
        .unwrap();
    sqlx::query("UPDATE vendor_profiles SET commission_rate = 20 WHERE vendor_key = 'acme'")
        .execute(&db.pool)
        .await
        .unwrap();

    let replay = service.record_order(&paid).await.unwrap();

    assert_eq!(replay[0].commission.status, CommissionStatus::Settled);
    assert_eq!(replay[0].commission.rate, dec!(10));
    assert_eq!(
        replay[0].commission.commission_amount,
        first[0].commission.commission_amount
    );

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_refund_is_flagged_for_review() {
    let db = setup_test_db().await;

    let results = service(&db.pool)
        .record_order(&order("order-8", &[(Some("acme"), "-60.50", "-50.00")], None))
        .await
        .unwrap();

    let commission = &results[0].commission;
    assert!(commission.needs_review);
    assert_eq!(commission.order_gross_total, dec!(-60.50));
    assert_eq!(commission.order_vat_rate, Decimal::ZERO);
    assert_eq!(commission.commission_net, dec!(-6.05));

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_failing_group_rolls_back_whole_order() {
    let db = setup_test_db().await;

    // "zeta" sorts after "acme", so acme's rows are written before zeta's
    // total is rejected as too large to store
    let result = service(&db.pool)
        .record_order(&order(
            "order-9",
            &[
                (Some("acme"), "10.00", "8.26"),
                (Some("zeta"), "1000000000000000", "826446280991735"),
            ],
            None,
        ))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(commission_count(&db.pool).await, 0);
    assert!(VendorRepository::new(db.pool.clone())
        .find_by_key("acme")
        .await
        .unwrap()
        .is_none());

    let by_order = CommissionRepository::new(db.pool.clone())
        .find_by_order("order-9")
        .await
        .unwrap();
    assert!(by_order.is_empty());

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_longest_upstream_slug_is_provisioned() {
    let db = setup_test_db().await;
    let longest = "a".repeat(MAX_VENDOR_KEY_LENGTH);
    let order_id = "o".repeat(255);

    let results = service(&db.pool)
        .record_order(&order(&order_id, &[(Some(longest.as_str()), "10.00", "8.26")], None))
        .await
        .unwrap();

    assert!(results[0].vendor_created);
    assert_eq!(results[0].vendor.vendor_key, longest);
    assert_eq!(
        results[0].commission.commission_key,
        format!("{}-{}", order_id, longest)
    );

    let too_long = "a".repeat(MAX_VENDOR_KEY_LENGTH + 1);
    let rejected = service(&db.pool)
        .record_order(&order("order-11", &[(Some(too_long.as_str()), "10.00", "8.26")], None))
        .await;
    assert!(matches!(rejected, Err(AppError::Validation(_))));
    assert_eq!(commission_count(&db.pool).await, 1);

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_overlapping_deliveries_for_new_vendor() {
    let db = setup_test_db().await;
    let service = service(&db.pool);
    let paid = order(
        "order-12",
        &[(Some("acme"), "121.00", "100.00"), (None, "24.20", "20.00")],
        None,
    );

    let (first, second) = tokio::join!(service.record_order(&paid), service.record_order(&paid));
    let first = first.unwrap();
    let second = second.unwrap();

    assert_eq!(vendor_count(&db.pool, "acme").await, 1);
    assert_eq!(commission_count(&db.pool).await, 2);
    // Exactly one delivery provisioned the vendor
    assert!(first[0].vendor_created ^ second[0].vendor_created);
    assert_eq!(first[0].commission.id, second[0].commission.id);
    assert_eq!(first[0].commission_amount, dec!(14.64));
    assert_eq!(second[0].commission_amount, dec!(14.64));

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_overlapping_deliveries_for_known_vendor() {
    let db = setup_test_db().await;
    VendorRepository::new(db.pool.clone())
        .create(&register("acme", dec!(10), "NL", false), dec!(10))
        .await
        .unwrap();
    let service = service(&db.pool);
    let paid = order("order-13", &[(Some("acme"), "121.00", "100.00")], Some("NL"));

    let (first, second) = tokio::join!(service.record_order(&paid), service.record_order(&paid));
    let first = first.unwrap();
    let second = second.unwrap();

    assert!(!first[0].vendor_created);
    assert!(!second[0].vendor_created);
    assert_eq!(vendor_count(&db.pool, "acme").await, 1);
    assert_eq!(commission_count(&db.pool).await, 1);
    assert_eq!(first[0].commission, second[0].commission);

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MySQL connection
async fn test_find_by_order_lists_every_vendor() {
    let db = setup_test_db().await;
    let recorded = service(&db.pool)
        .record_order(&order(
            "order-10",
            &[(Some("zeta"), "10.00", "8.26"), (Some("acme"), "20.00", "16.53")],
            None,
        ))
        .await
        .unwrap();

    let stored = CommissionRepository::new(db.pool.clone())
        .find_by_order("order-10")
        .await
        .unwrap();

    let keys: Vec<&str> = stored.iter().map(|c| c.vendor_key.as_str()).collect();
    assert_eq!(keys, vec!["acme", "zeta"]);
    assert_eq!(stored[0].commission_key, "order-10-acme");
    assert_eq!(stored[0], recorded[0].commission);

    db.cleanup().await;
}
