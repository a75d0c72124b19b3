//! Target Audience Builder

use ad_model::format_count;
use serde::{Deserialize, Serialize};

/// Audience builder inputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudienceRequest {
    pub clothing_type: String,
    /// Budget, Mid-Range, Premium, Luxury
    pub price_range: String,
    /// Male, Female, Unisex
    pub gender: String,
    /// 13-17, 18-24, 25-34, 35-44, 45-54, 55+
    pub age_group: String,
    pub location: String,
    pub shopping_behavior: String,
    pub interests: Vec<String>,
}

/// Generated audience description and insights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceProfile {
    pub description: String,
    pub estimated_size: u64,
    pub recommended_platform: String,
    pub best_time: String,
    pub competition: String,
    /// Percent
    pub expected_conversion_rate: f64,
    pub insights: Vec<String>,
}

fn price_behavior(price_range: &str) -> &'static str {
    match price_range {
        "Budget" => "price-conscious shoppers",
        "Mid-Range" => "value-seeking customers",
        "Premium" => "quality-focused buyers",
        "Luxury" => "luxury brand enthusiasts",
        _ => "shoppers",
    }
}

fn describe(request: &AudienceRequest) -> String {
    let mut description = format!(
        "{} aged {}, located in {}, ",
        request.gender, request.age_group, request.location
    );
    if !request.interests.is_empty() {
        description.push_str(&format!("interested in {}, ", request.interests.join(", ")));
    }
    description.push_str(&format!(
        "{}, {}, looking for {}",
        request.shopping_behavior.to_lowercase(),
        price_behavior(&request.price_range),
        request.clothing_type.to_lowercase()
    ));
    description
}

fn estimate_size(request: &AudienceRequest) -> u64 {
    let mut size: f64 = match request.location.as_str() {
        "Dhaka" => 500_000.0,
        "Chittagong" => 300_000.0,
        "All Bangladesh" => 2_000_000.0,
        _ => 150_000.0,
    };

    // Single-gender products reach roughly half the population
    if request.gender != "Unisex" {
        size *= 0.5;
    }

    size *= match request.age_group.as_str() {
        "13-17" => 0.15,
        "18-24" => 0.25,
        "25-34" => 0.30,
        "35-44" => 0.20,
        "45-54" | "55+" => 0.10,
        _ => 0.20,
    };

    size.round() as u64
}

fn recommended_platform(age_group: &str) -> &'static str {
    match age_group {
        "13-17" | "18-24" => "Instagram (Younger audience prefers visual platform)",
        "45-54" | "55+" => "Facebook (Mature audience, broader reach)",
        _ => "Facebook or Instagram (Both platforms effective for this age group)",
    }
}

fn best_time(age_group: &str) -> &'static str {
    match age_group {
        "13-17" | "18-24" => "7 PM - 10 PM (Evening when young adults most active)",
        "25-34" | "35-44" => "8 AM - 10 AM and 6 PM - 9 PM (Morning commute and evening)",
        _ => "10 AM - 2 PM (Midday when mature audience online)",
    }
}

fn competition_level(price_range: &str) -> &'static str {
    match price_range {
        "Budget" => "High (Budget segment is very competitive)",
        "Luxury" => "Low (Fewer luxury competitors)",
        _ => "Medium (Moderate competition in this segment)",
    }
}

fn expected_conversion(price_range: &str) -> f64 {
    match price_range {
        "Budget" => 3.5,
        "Mid-Range" => 2.5,
        "Premium" => 1.8,
        "Luxury" => 1.2,
        _ => 2.0,
    }
}

/// Build a target audience description with sizing and timing insights
pub fn build_audience(request: &AudienceRequest) -> AudienceProfile {
    let estimated_size = estimate_size(request);
    let recommended_platform = recommended_platform(&request.age_group);
    let best_time = best_time(&request.age_group);
    let competition = competition_level(&request.price_range);
    let expected_conversion_rate = expected_conversion(&request.price_range);

    let insights = vec![
        format!(
            "Estimated Audience Size: {} people in Bangladesh",
            format_count(estimated_size)
        ),
        format!("Recommended Platform: {}", recommended_platform),
        format!("Best Ad Display Time: {}", best_time),
        format!("Competition Level: {}", competition),
        format!("Expected Conversion Rate: {}%", expected_conversion_rate),
    ];

    AudienceProfile {
        description: describe(request),
        estimated_size,
        recommended_platform: recommended_platform.to_string(),
        best_time: best_time.to_string(),
        competition: competition.to_string(),
        expected_conversion_rate,
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AudienceRequest {
        AudienceRequest {
            clothing_type: "Casual Wear".into(),
            price_range: "Mid-Range".into(),
            gender: "Female".into(),
            age_group: "18-24".into(),
            location: "Dhaka".into(),
            shopping_behavior: "Online Shoppers".into(),
            interests: vec!["Fashion".into(), "Music".into()],
        }
    }

    #[test]
    fn test_description() {
        let profile = build_audience(&request());
        assert_eq!(
            profile.description,
            "Female aged 18-24, located in Dhaka, interested in Fashion, Music, \
             online shoppers, value-seeking customers, looking for casual wear"
        );
    }

    #[test]
    fn test_description_without_interests() {
        let profile = build_audience(&AudienceRequest {
            interests: Vec::new(),
            ..request()
        });
        assert!(profile.description.starts_with("Female aged 18-24, located in Dhaka, online shoppers"));
    }

    #[test]
    fn test_size_and_insights() {
        let profile = build_audience(&request());
        // 500k * 0.5 (single gender) * 0.25 (18-24)
        assert_eq!(profile.estimated_size, 62_500);
        assert!(profile.recommended_platform.starts_with("Instagram"));
        assert!(profile.best_time.starts_with("7 PM"));
        assert!(profile.competition.starts_with("Medium"));
        assert_eq!(profile.expected_conversion_rate, 2.5);
        assert_eq!(profile.insights[0], "Estimated Audience Size: 62,500 people in Bangladesh");
    }

    #[test]
    fn test_unisex_nationwide_mature() {
        let profile = build_audience(&AudienceRequest {
            gender: "Unisex".into(),
            location: "All Bangladesh".into(),
            age_group: "55+".into(),
            price_range: "Luxury".into(),
            ..request()
        });
        assert_eq!(profile.estimated_size, 200_000);
        assert!(profile.recommended_platform.starts_with("Facebook (Mature"));
        assert!(profile.competition.starts_with("Low"));
        assert_eq!(profile.expected_conversion_rate, 1.2);
    }
}
