//! Prompt Templates

use ad_model::{AdInput, Prediction};

/// Prompt asking for a performance prediction as bare JSON
pub fn prediction_prompt(ad: &AdInput) -> String {
    format!(
        r#"You are an expert digital marketing analyst. Analyze this ad and predict its performance.

Ad Details:
- Title: {title}
- Text: {text}
- Budget: ${budget}
- Target Audience: {audience}
- Platform: {platform}

Provide ONLY a JSON response with this EXACT format (no other text, no markdown):
{{
  "ctr": 2.5,
  "reach": 15000,
  "engagement": 375,
  "confidence": 0.85,
  "explanation": "Your ad shows strong potential with engaging copy and appropriate budget allocation for {platform}."
}}

Predict realistic CTR (%), reach (number), engagement (number), confidence (0-1), and explanation based on industry benchmarks for {platform} ads."#,
        title = ad.title,
        text = ad.text,
        budget = ad.budget,
        audience = ad.audience,
        platform = ad.platform,
    )
}

/// Prompt asking for optimization suggestions as bare JSON
pub fn suggestion_prompt(ad: &AdInput, prediction: &Prediction) -> String {
    format!(
        r#"You are an expert marketing consultant. Based on this ad performance prediction, provide optimization suggestions.

Ad Data:
- Title: {title}
- Text: {text}
- Budget: ${budget}
- Audience: {audience}
- Platform: {platform}

Current Prediction:
- CTR: {ctr}%
- Reach: {reach}
- Engagement: {engagement}

Provide ONLY a JSON response with this EXACT format (no other text, no markdown):
{{
  "improved_text": ["Variant 1 with better copy", "Variant 2 with different angle"],
  "targeting": "Specific targeting recommendation",
  "budget_adjustment": "Increase budget to $X for better reach",
  "platform_recommendation": "{platform}",
  "explanation": "Overall strategy explanation"
}}

Provide actionable, specific recommendations to improve performance."#,
        title = ad.title,
        text = ad.text,
        budget = ad.budget,
        audience = ad.audience,
        platform = ad.platform,
        ctr = prediction.ctr,
        reach = prediction.reach,
        engagement = prediction.engagement,
    )
}
