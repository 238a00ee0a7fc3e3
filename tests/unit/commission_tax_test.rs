// Commission fee, VAT treatment and OSS classification

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use marketplace_commission::core::{CountryCode, Currency};
use marketplace_commission::taxes::{
    CommissionTaxInput, OssClassifier, TaxCalculator, VatTreatment,
};

fn code(c: &str) -> CountryCode {
    CountryCode::new(c).unwrap()
}

fn charge_for(
    gross: Decimal,
    rate: Decimal,
    vendor_country: &CountryCode,
    verified: bool,
) -> marketplace_commission::taxes::CommissionCharge {
    let home = code("NL");
    TaxCalculator::calculate(&CommissionTaxInput {
        effective_rate: rate,
        order_gross_total: gross,
        vendor_country,
        vendor_has_verified_vat: verified,
        home_country: &home,
        standard_vat_rate: dec!(21),
        currency: Currency::EUR,
    })
    .unwrap()
}

#[test]
fn test_reverse_charge_for_verified_foreign_vendor() {
    let charge = charge_for(dec!(100), dec!(10), &code("DE"), true);

    assert_eq!(charge.treatment, VatTreatment::ReverseCharge);
    assert_eq!(charge.net, dec!(10.00));
    assert_eq!(charge.vat, dec!(0.00));
    assert_eq!(charge.amount, dec!(10.00));
}

#[test]
fn test_unverified_foreign_vendor_pays_vat() {
    let charge = charge_for(dec!(100), dec!(10), &code("DE"), false);

    assert_eq!(charge.net, dec!(10.00));
    assert_eq!(charge.vat, dec!(2.10));
    assert_eq!(charge.amount, dec!(12.10));
}

#[test]
fn test_domestic_vendor_pays_vat_even_when_verified() {
    let charge = charge_for(dec!(100), dec!(10), &code("NL"), true);

    assert_eq!(charge.treatment, VatTreatment::Domestic);
    assert_eq!(charge.amount, dec!(12.10));
}

#[test]
fn test_zero_rate_is_a_zero_charge() {
    let charge = charge_for(dec!(999.99), Decimal::ZERO, &code("NL"), false);

    assert_eq!(charge.net, Decimal::ZERO);
    assert_eq!(charge.vat, Decimal::ZERO);
    assert_eq!(charge.amount, Decimal::ZERO);
}

#[test]
fn test_zero_decimal_currency_rounds_to_units() {
    let home = code("NL");
    let charge = TaxCalculator::calculate(&CommissionTaxInput {
        effective_rate: dec!(12.5),
        order_gross_total: dec!(10003),
        vendor_country: &home,
        vendor_has_verified_vat: false,
        home_country: &home,
        standard_vat_rate: dec!(21),
        currency: Currency::HUF,
    })
    .unwrap();

    // 10003 * 12.5% = 1250.375 -> 1250; 1250 * 21% = 262.5 -> 262 (banker's)
    assert_eq!(charge.net, dec!(1250));
    assert_eq!(charge.vat, dec!(262));
    assert_eq!(charge.amount, dec!(1512));
}

#[test]
fn test_oss_examples() {
    assert!(OssClassifier::is_oss(true, &code("DE"), &code("NL")));
    assert!(!OssClassifier::is_oss(false, &code("DE"), &code("NL")));
    assert!(!OssClassifier::is_oss(true, &code("NL"), &code("NL")));
}

fn cents() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000i64).prop_map(|c| Decimal::new(c, 2))
}

fn percentage() -> impl Strategy<Value = Decimal> {
    (0u32..=10_000u32).prop_map(|hundredths| Decimal::new(hundredths as i64, 2))
}

proptest! {
    #[test]
    fn test_amount_is_exactly_net_plus_vat(
        gross in cents(),
        rate in percentage(),
        verified in any::<bool>(),
        domestic in any::<bool>(),
    ) {
        let vendor = if domestic { code("NL") } else { code("FR") };
        let charge = charge_for(gross, rate, &vendor, verified);

        prop_assert_eq!(charge.amount, charge.net + charge.vat);
        prop_assert!(charge.net.scale() <= 2);
        prop_assert!(charge.vat.scale() <= 2);
    }

    #[test]
    fn test_reverse_charge_never_carries_vat(gross in cents(), rate in percentage()) {
        let charge = charge_for(gross, rate, &code("BE"), true);
        prop_assert_eq!(charge.vat, Decimal::ZERO);
        prop_assert_eq!(charge.amount, charge.net);
    }

    #[test]
    fn test_commission_sign_follows_gross(gross in cents(), rate in percentage()) {
        let charge = charge_for(gross, rate, &code("NL"), false);
        if gross >= Decimal::ZERO {
            prop_assert!(charge.amount >= Decimal::ZERO);
        } else {
            prop_assert!(charge.amount <= Decimal::ZERO);
        }
    }

    #[test]
    fn test_commission_never_exceeds_gross(gross in 0i64..10_000_000i64, rate in percentage()) {
        let gross = Decimal::new(gross, 2);
        let charge = charge_for(gross, rate, &code("NL"), true);
        prop_assert!(charge.net <= gross);
    }
}
