//! Fallback Suggester

use ad_model::{AdInput, Platform, Prediction, SuggestionSet};

/// CTR (percent) below which copy and targeting need work
pub const CTR_THRESHOLD: f64 = 2.0;

/// Reach per budget dollar below which a budget raise is suggested
pub const REACH_PER_DOLLAR_THRESHOLD: f64 = 8.0;

const URGENT_PREFIX_CHARS: usize = 50;
const EXCLUSIVE_PREFIX_CHARS: usize = 60;

/// First `n` characters of `s`
fn prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Build optimization suggestions from an ad and its prediction
pub fn suggest(ad: &AdInput, prediction: &Prediction) -> SuggestionSet {
    let low_ctr = prediction.ctr < CTR_THRESHOLD;

    let improved_text = vec![
        format!(
            "{} - Limited Time Offer! {}... Don't miss out!",
            ad.title,
            prefix(&ad.text, URGENT_PREFIX_CHARS)
        ),
        format!(
            "Exclusive Deal: {}. {}... Act now!",
            ad.title,
            prefix(&ad.text, EXCLUSIVE_PREFIX_CHARS)
        ),
    ];

    let targeting = if low_ctr {
        "Narrow your audience to users aged 25-45 with interests in similar products"
    } else {
        "Your targeting is effective. Consider expanding to similar demographics."
    }
    .to_string();

    let budget_adjustment = if (prediction.reach as f64) < ad.budget * REACH_PER_DOLLAR_THRESHOLD {
        // Integer percent keeps 100 -> 115 exact
        let raised = (ad.budget * 115.0 / 100.0).floor();
        format!("Increase budget by 15% to ${} for better reach", raised)
    } else {
        format!("Current budget is optimal. Maintain at ${}", ad.budget)
    };

    let platform_recommendation = match ad.platform {
        Platform::GoogleAds => "Consider testing on Instagram for higher engagement".to_string(),
        ref other => other.to_string(),
    };

    let strategy = if low_ctr {
        "improving ad copy and narrowing targeting"
    } else {
        "scaling your campaign"
    };
    let explanation = format!(
        "Based on your {}% CTR, we recommend {}.",
        prediction.ctr, strategy
    );

    SuggestionSet {
        improved_text,
        targeting,
        budget_adjustment,
        platform_recommendation,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ad(platform: &str) -> AdInput {
        AdInput::new(
            "Summer Sale",
            "Get 50% off all items now",
            100.0,
            "young adults",
            platform,
        )
    }

    fn prediction(ctr: f64, reach: u64) -> Prediction {
        Prediction {
            ctr,
            reach,
            engagement: 10,
            confidence: 0.7,
            explanation: String::new(),
        }
    }

    #[test]
    fn test_low_ctr_narrows_targeting() {
        let s = suggest(&ad("Facebook"), &prediction(1.5, 5000));
        assert!(s.targeting.contains("25-45"));
        assert!(s.explanation.contains("improving ad copy and narrowing targeting"));
        assert!(s.explanation.starts_with("Based on your 1.5% CTR"));
    }

    #[test]
    fn test_high_ctr_expands_targeting() {
        let s = suggest(&ad("Facebook"), &prediction(5.0, 5000));
        assert!(s.targeting.contains("expanding"));
        assert!(s.explanation.contains("scaling your campaign"));
    }

    #[test]
    fn test_ctr_threshold_is_exclusive() {
        let s = suggest(&ad("Facebook"), &prediction(2.0, 5000));
        assert!(s.targeting.contains("expanding"));
    }

    #[test]
    fn test_budget_raise_when_reach_low() {
        let s = suggest(&ad("Facebook"), &prediction(3.0, 500));
        assert_eq!(s.budget_adjustment, "Increase budget by 15% to $115 for better reach");
    }

    #[test]
    fn test_budget_optimal_when_reach_high() {
        let s = suggest(&ad("Facebook"), &prediction(3.0, 800));
        assert_eq!(s.budget_adjustment, "Current budget is optimal. Maintain at $100");
    }

    #[test]
    fn test_platform_recommendation() {
        let google = suggest(&ad("Google Ads"), &prediction(3.0, 800));
        assert!(google.platform_recommendation.contains("Instagram"));

        let tiktok = suggest(&ad("TikTok"), &prediction(3.0, 800));
        assert_eq!(tiktok.platform_recommendation, "TikTok");
    }

    #[test]
    fn test_short_text_is_used_whole() {
        let s = suggest(&ad("Instagram"), &prediction(3.0, 800));
        assert_eq!(
            s.improved_text[0],
            "Summer Sale - Limited Time Offer! Get 50% off all items now... Don't miss out!"
        );
        assert_eq!(
            s.improved_text[1],
            "Exclusive Deal: Summer Sale. Get 50% off all items now... Act now!"
        );
    }

    #[test]
    fn test_truncation_lengths() {
        let text: String = ('a'..='z').cycle().take(100).collect();
        let mut input = ad("Instagram");
        input.text = text.clone();
        let s = suggest(&input, &prediction(3.0, 800));

        let first50: String = text.chars().take(50).collect();
        let first60: String = text.chars().take(60).collect();
        assert!(s.improved_text[0].contains(&format!(" {}...", first50)));
        assert!(!s.improved_text[0].contains(&text[..51]));
        assert!(s.improved_text[1].contains(&format!(" {}...", first60)));
        assert!(!s.improved_text[1].contains(&text[..61]));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let mut input = ad("Instagram");
        input.text = "é".repeat(80);
        let s = suggest(&input, &prediction(3.0, 800));
        assert!(s.improved_text[0].contains(&"é".repeat(50)));
        assert!(!s.improved_text[0].contains(&"é".repeat(51)));
    }

    proptest! {
        #[test]
        fn prop_deterministic(
            text in ".{0,100}",
            ctr in 0.0f64..10.0,
            reach in 0u64..100_000,
            budget in 0.0f64..10_000.0,
        ) {
            let mut input = ad("Facebook");
            input.text = text;
            input.budget = budget;
            let p = prediction(ctr, reach);
            let s = suggest(&input, &p);
            prop_assert_eq!(s.improved_text.len(), 2);
            prop_assert_eq!(s, suggest(&input, &p));
        }
    }
}
