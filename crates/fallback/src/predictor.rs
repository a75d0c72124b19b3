//! Fallback Predictor

use crate::fingerprint::fingerprint;
use ad_model::{format_count, AdInput, Prediction};

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Predict ad performance from content fingerprints.
///
/// Budgets that are negative or not finite count as zero, which yields zero
/// reach and engagement rather than an error.
pub fn predict(ad: &AdInput) -> Prediction {
    let title_digest = fingerprint(&ad.title);
    let text_digest = fingerprint(&ad.text);
    let audience_digest = fingerprint(&ad.audience);

    let budget = if ad.budget.is_finite() { ad.budget.max(0.0) } else { 0.0 };

    let base_ctr = 0.5 + f64::from(title_digest % 30) / 10.0;
    let ctr = round2(base_ctr * ad.platform.ctr_multiplier());

    let reach_factor = f64::from(1 + text_digest % 5);
    let reach = (budget * 10.0 * reach_factor).floor() as u64;

    let engagement_factor = f64::from(1 + audience_digest % 3);
    let engagement = (reach as f64 * (ctr / 100.0) * engagement_factor).floor() as u64;

    let confidence = round2(0.6 + f64::from(title_digest % 30) / 100.0);

    let explanation = format!(
        "Based on your ad configuration (Budget: ${}, Platform: {}), we predict a {}% CTR \
         with approximately {} reach and {} engagements.",
        ad.budget,
        ad.platform,
        ctr,
        format_count(reach),
        format_count(engagement),
    );

    Prediction {
        ctr,
        reach,
        engagement,
        confidence,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad_model::Platform;
    use proptest::prelude::*;

    fn summer_sale(platform: &str) -> AdInput {
        AdInput::new(
            "Summer Sale",
            "Get 50% off all items now",
            100.0,
            "young adults",
            platform,
        )
    }

    #[test]
    fn test_summer_sale_instagram() {
        let p = predict(&summer_sale("Instagram"));
        assert_eq!(p.ctr, 1.95);
        assert_eq!(p.reach, 3000);
        assert_eq!(p.engagement, 117);
        assert_eq!(p.confidence, 0.68);
        assert_eq!(
            p.explanation,
            "Based on your ad configuration (Budget: $100, Platform: Instagram), we predict a \
             1.95% CTR with approximately 3,000 reach and 117 engagements."
        );
    }

    #[test]
    fn test_platform_multipliers() {
        let instagram = predict(&summer_sale("Instagram"));
        let facebook = predict(&summer_sale("Facebook"));
        let google = predict(&summer_sale("Google Ads"));

        assert_eq!(facebook.ctr, 1.56);
        assert_eq!(google.ctr, 1.3);
        assert!((instagram.ctr - facebook.ctr * 1.25).abs() < 0.011);
        assert!((instagram.ctr - google.ctr * 1.5).abs() < 0.011);
        assert_eq!(facebook.reach, google.reach);
    }

    #[test]
    fn test_zero_budget_is_degenerate() {
        let mut ad = summer_sale("Facebook");
        ad.budget = 0.0;
        let p = predict(&ad);
        assert_eq!(p.reach, 0);
        assert_eq!(p.engagement, 0);
        assert!(p.ctr > 0.0);
    }

    #[test]
    fn test_empty_fields() {
        let p = predict(&AdInput::default());
        // Empty strings fingerprint to zero
        assert_eq!(p.ctr, 0.5);
        assert_eq!(p.confidence, 0.6);
        assert_eq!(p.reach, 0);
    }

    #[test]
    fn test_non_finite_budget() {
        let mut ad = summer_sale("Instagram");
        ad.budget = f64::NAN;
        let p = predict(&ad);
        assert_eq!(p.reach, 0);
        ad.budget = -250.0;
        assert_eq!(predict(&ad).reach, 0);
    }

    fn platform_strategy() -> impl Strategy<Value = Platform> {
        prop_oneof![
            Just(Platform::Facebook),
            Just(Platform::Instagram),
            Just(Platform::GoogleAds),
            "[A-Za-z]{0,10}".prop_map(Platform::from),
        ]
    }

    proptest! {
        #[test]
        fn prop_deterministic(
            title in ".{0,40}",
            text in ".{0,120}",
            audience in ".{0,40}",
            budget in 0.0f64..100_000.0,
            platform in platform_strategy(),
        ) {
            let ad = AdInput { title, text, budget, audience, platform, image: None };
            prop_assert_eq!(predict(&ad), predict(&ad));
        }

        #[test]
        fn prop_ranges(
            title in ".{0,40}",
            text in ".{0,120}",
            audience in ".{0,40}",
            budget in 0.0f64..100_000.0,
            platform in platform_strategy(),
        ) {
            let multiplier = platform.ctr_multiplier();
            let ad = AdInput { title, text, budget, audience, platform, image: None };
            let p = predict(&ad);
            let base = p.ctr / multiplier;
            prop_assert!(base >= 0.5 - 0.01 && base <= 3.4 + 0.01);
            prop_assert!(p.confidence >= 0.6 && p.confidence <= 0.89);
            prop_assert!(p.reach as f64 <= budget * 50.0);
            prop_assert!(p.engagement <= p.reach);
        }
    }
}
