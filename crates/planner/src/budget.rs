//! Budget Calculator

use crate::PlannerError;
use ad_model::format_count;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Share of impressions that reach unique users
const UNIQUE_REACH_RATIO: f64 = 0.75;

/// Inputs to the budget calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    /// Brand Awareness, Website Traffic, Product Sales, Lead Generation, Store Visits
    pub campaign_goal: String,
    /// Campaign length in days
    pub duration: u32,
    /// Small, Medium, Large, Very Large
    pub audience_size: String,
    /// Facebook, Instagram, Google
    pub platform: String,
    /// Low, Medium, High
    pub competition: String,
    pub product_price: f64,
}

/// Recommended budget with projected outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPlan {
    pub total_budget: u64,
    pub daily_budget: u64,
    pub duration: u32,
    pub reach: u64,
    pub expected_sales: u64,
    /// Return on investment in percent, one decimal place
    pub roi: f64,
    pub revenue: f64,
    pub platform: String,
    pub campaign_goal: String,
    pub product_price: f64,
    pub tips: Vec<String>,
}

fn base_daily_budget(audience_size: &str) -> f64 {
    match audience_size {
        "Small" => 200.0,
        "Medium" => 500.0,
        "Large" => 1500.0,
        "Very Large" => 3000.0,
        _ => 0.0,
    }
}

fn platform_multiplier(platform: &str) -> f64 {
    match platform {
        "Instagram" => 1.2,
        "Google" => 1.5,
        _ => 1.0,
    }
}

fn competition_multiplier(competition: &str) -> f64 {
    match competition {
        "Low" => 0.8,
        "High" => 1.3,
        _ => 1.0,
    }
}

fn goal_multiplier(goal: &str) -> f64 {
    match goal {
        "Brand Awareness" => 0.9,
        "Product Sales" => 1.2,
        "Lead Generation" => 1.1,
        _ => 1.0,
    }
}

/// Cost per thousand impressions
fn cpm(platform: &str) -> f64 {
    match platform {
        "Facebook" => 50.0,
        "Instagram" => 70.0,
        "Google" => 100.0,
        _ => 60.0,
    }
}

fn conversion_rate(goal: &str) -> f64 {
    match goal {
        "Brand Awareness" => 0.005,
        "Website Traffic" => 0.01,
        "Product Sales" => 0.02,
        "Lead Generation" => 0.03,
        "Store Visits" => 0.015,
        _ => 0.01,
    }
}

/// Expensive products convert less often
fn price_adjustment(price: f64) -> f64 {
    if price > 5000.0 {
        0.6
    } else if price > 2000.0 {
        0.8
    } else {
        1.0
    }
}

fn estimate_reach(total_budget: f64, platform: &str) -> u64 {
    let impressions = total_budget / cpm(platform) * 1000.0;
    (impressions * UNIQUE_REACH_RATIO).round() as u64
}

fn estimate_sales(reach: u64, price: f64, goal: &str) -> u64 {
    (reach as f64 * conversion_rate(goal) * price_adjustment(price)).round() as u64
}

/// Size a campaign budget and project its reach, sales, and ROI
pub fn calculate_budget(request: &BudgetRequest) -> Result<BudgetPlan, PlannerError> {
    if request.duration == 0 {
        return Err(PlannerError::InvalidDuration);
    }
    if !request.product_price.is_finite() || request.product_price < 0.0 {
        return Err(PlannerError::InvalidPrice(request.product_price));
    }

    let daily = base_daily_budget(&request.audience_size)
        * platform_multiplier(&request.platform)
        * competition_multiplier(&request.competition)
        * goal_multiplier(&request.campaign_goal);

    let total_budget = (daily * f64::from(request.duration)).round() as u64;
    let reach = estimate_reach(total_budget as f64, &request.platform);
    let expected_sales = estimate_sales(reach, request.product_price, &request.campaign_goal);

    let revenue = expected_sales as f64 * request.product_price;
    let roi = if total_budget == 0 {
        0.0
    } else {
        let raw = (revenue - total_budget as f64) / total_budget as f64 * 100.0;
        (raw * 10.0).round() / 10.0
    };

    debug!(
        "Budget plan: total={} reach={} sales={} roi={}",
        total_budget, reach, expected_sales, roi
    );

    let mut plan = BudgetPlan {
        total_budget,
        daily_budget: daily.round() as u64,
        duration: request.duration,
        reach,
        expected_sales,
        roi,
        revenue,
        platform: request.platform.clone(),
        campaign_goal: request.campaign_goal.clone(),
        product_price: request.product_price,
        tips: Vec::new(),
    };
    plan.tips = budget_tips(&plan);
    Ok(plan)
}

fn budget_tips(plan: &BudgetPlan) -> Vec<String> {
    let mut tips = Vec::with_capacity(6);

    tips.push(if plan.roi > 100.0 {
        format!("Excellent ROI projected! Expected {:.1}% return on investment.", plan.roi)
    } else if plan.roi > 50.0 {
        format!("Good ROI projected. Expected {:.1}% return.", plan.roi)
    } else if plan.roi > 0.0 {
        "Moderate ROI. Consider optimizing targeting or increasing conversion rate.".to_string()
    } else {
        "Negative ROI projected. Consider reducing budget or improving ad quality.".to_string()
    });

    let best_share = (plan.total_budget as f64 * 0.7).round() as u64;
    tips.push(format!(
        "Allocate 70% (৳{}) to best-performing ads, 30% to testing.",
        format_count(best_share)
    ));

    tips.push(if plan.duration > 7 {
        format!(
            "Start with ৳{}/day. Increase if performing well after 3 days.",
            format_count(plan.daily_budget)
        )
    } else {
        "Short campaign - Use full daily budget from day 1 for maximum impact.".to_string()
    });

    tips.push(
        match plan.platform.as_str() {
            "Instagram" => {
                "Instagram: Focus on high-quality images. Use Stories and Reels for better engagement."
            }
            "Facebook" => {
                "Facebook: Use carousel ads to show multiple products. Test video ads for higher engagement."
            }
            _ => "Google: Use search ads for high-intent buyers. Focus on keywords related to clothing.",
        }
        .to_string(),
    );

    tips.push(if plan.expected_sales > 0 {
        let cost_per_result = (plan.total_budget as f64 / plan.expected_sales as f64).round() as u64;
        format!(
            "Monitor first 24 hours closely. Pause if cost-per-result exceeds ৳{}.",
            format_count(cost_per_result)
        )
    } else {
        "Monitor first 24 hours closely. Pause if the campaign produces no results.".to_string()
    });

    tips.push(
        "Test 2-3 ad variations to find best performer. Shift budget to winner after 2 days."
            .to_string(),
    );

    tips
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BudgetRequest {
        BudgetRequest {
            campaign_goal: "Product Sales".into(),
            duration: 10,
            audience_size: "Medium".into(),
            platform: "Instagram".into(),
            competition: "Medium".into(),
            product_price: 1500.0,
        }
    }

    #[test]
    fn test_medium_instagram_sales_campaign() {
        let plan = calculate_budget(&request()).unwrap();
        assert_eq!(plan.daily_budget, 720);
        assert_eq!(plan.total_budget, 7200);
        assert_eq!(plan.reach, 77_143);
        assert_eq!(plan.expected_sales, 1543);
        assert_eq!(plan.revenue, 2_314_500.0);
        assert_eq!(plan.roi, 32045.8);
        assert_eq!(plan.tips.len(), 6);
        assert!(plan.tips[0].starts_with("Excellent ROI"));
        assert!(plan.tips[1].contains("৳5,040"));
        assert!(plan.tips[2].contains("৳720/day"));
        assert!(plan.tips[3].starts_with("Instagram"));
        assert!(plan.tips[4].contains("৳5."));
    }

    #[test]
    fn test_luxury_price_lowers_conversion() {
        let plan = calculate_budget(&BudgetRequest {
            campaign_goal: "Brand Awareness".into(),
            duration: 5,
            audience_size: "Small".into(),
            platform: "Facebook".into(),
            competition: "Low".into(),
            product_price: 6000.0,
        })
        .unwrap();
        assert_eq!(plan.total_budget, 720);
        assert_eq!(plan.reach, 10_800);
        assert_eq!(plan.expected_sales, 32);
        assert!(plan.tips[2].starts_with("Short campaign"));
    }

    #[test]
    fn test_unknown_audience_size_yields_zero_budget() {
        let plan = calculate_budget(&BudgetRequest {
            audience_size: "Huge".into(),
            ..request()
        })
        .unwrap();
        assert_eq!(plan.total_budget, 0);
        assert_eq!(plan.roi, 0.0);
        assert!(plan.tips[4].contains("no results"));
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert_eq!(
            calculate_budget(&BudgetRequest { duration: 0, ..request() }),
            Err(PlannerError::InvalidDuration)
        );
        assert!(matches!(
            calculate_budget(&BudgetRequest { product_price: -1.0, ..request() }),
            Err(PlannerError::InvalidPrice(_))
        ));
    }

    proptest::proptest! {
        #[test]
        fn prop_plan_is_total(duration in 1u32..365, price in 0.0f64..20_000.0) {
            let plan = calculate_budget(&BudgetRequest {
                duration,
                product_price: price,
                ..request()
            })
            .unwrap();
            proptest::prop_assert!(plan.roi.is_finite());
            proptest::prop_assert_eq!(plan.tips.len(), 6);
            proptest::prop_assert_eq!(plan.total_budget, 720 * u64::from(duration));
        }
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(calculate_budget(&request()).unwrap()).unwrap();
        assert_eq!(json["totalBudget"], 7200);
        assert_eq!(json["expectedSales"], 1543);
    }
}
