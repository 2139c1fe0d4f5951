//! Plain-text portfolio report

use crate::models::performance::PortfolioPerformance;

/// Render a scored portfolio as text, one row per measure
#[must_use]
pub fn format_portfolio_report(portfolio: &PortfolioPerformance) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Star Rating Summary:\n\
         - Weighted average: {:.2} stars ({})\n\
         - Total points: {:.1} over weight {:.0}\n\
         - Measures scored: {} ({} excluded)\n\
         - Base revenue: ${:.0}\n\
         - HEI factor: {:+.1}%\n\
         - Total revenue: ${:.0}\n\n",
        portfolio.weighted_average_stars,
        portfolio.star_tier,
        portfolio.total_points,
        portfolio.total_weight,
        portfolio.measures.len(),
        portfolio.excluded_measures,
        portfolio.base_revenue,
        portfolio.hei_factor * 100.0,
        portfolio.total_revenue,
    ));

    for (tier, stars) in &portfolio.tier_stars {
        output.push_str(&format!("Tier {tier}: {stars:.2} stars\n"));
    }

    output.push_str(
        "\nMeasure  | Tier | Weight | Rate   | Pctl   | Stars | Points\n\
         ---------|------|--------|--------|--------|-------|-------\n",
    );

    for measure in &portfolio.measures {
        output.push_str(&format!(
            "{:<8} | {:>4} | {:>6.0} | {:>5.1}% | {:>6.2} | {:>5.1} | {:>6.1}\n",
            measure.measure_code.as_str(),
            measure.tier,
            measure.weight,
            measure.rate * 100.0,
            measure.percentile,
            measure.star_rating,
            measure.points,
        ));
    }

    output
}
