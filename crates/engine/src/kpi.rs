//! Benchmarking KPIs: pure reporting-time computations over (demand, sales)
//! pairs. Nothing here is persisted; callers recompute from current
//! aggregates and current sales figures on every run.

use std::collections::BTreeMap;

use crate::model::{KpiReport, RegionalAggregate, SalesRow, SkuKpi};

/// Share of reported demand the supplier did not capture, as a percentage.
/// N/A when there is no demand to lose.
pub fn lost_opportunity_pct(demand: i64, sales: i64) -> Option<f64> {
    if demand == 0 {
        return None;
    }
    Some((demand - sales) as f64 / demand as f64 * 100.0)
}

/// Sales over demand for a SKU the supplier offers. N/A when demand is zero.
pub fn penetration_rate(demand: i64, sales: i64) -> Option<f64> {
    if demand == 0 {
        return None;
    }
    Some(sales as f64 / demand as f64)
}

/// Fraction of demanded SKUs with any sales at all.
pub fn coverage_ratio(skus_with_sales: usize, skus_with_demand: usize) -> Option<f64> {
    if skus_with_demand == 0 {
        return None;
    }
    Some(skus_with_sales as f64 / skus_with_demand as f64)
}

/// Share of demand the supplier could fill, capped at 100%.
/// N/A only when both sides are zero; sales with no recorded demand count
/// as fully filled.
pub fn fill_rate_pct(demand: i64, sales: i64) -> Option<f64> {
    if demand == 0 && sales == 0 {
        return None;
    }
    if demand == 0 {
        return Some(100.0);
    }
    Some((sales.min(demand) as f64 / demand as f64) * 100.0)
}

/// Join aggregated demand with sales figures into the per-run KPI report.
///
/// The SKU universe is the union of SKUs with aggregated demand and SKUs
/// present in the sales relation; sales are summed across regions per SKU.
/// Rows are ordered by SKU so the report is byte-stable.
pub fn build_report(aggregates: &[RegionalAggregate], sales: &[SalesRow]) -> KpiReport {
    let mut demand_by_sku: BTreeMap<&str, i64> = BTreeMap::new();
    for agg in aggregates {
        demand_by_sku.insert(&agg.sku, agg.total);
    }

    let mut sales_by_sku: BTreeMap<&str, i64> = BTreeMap::new();
    for row in sales {
        *sales_by_sku.entry(&row.sku).or_insert(0) += row.quantity;
    }

    let universe: BTreeMap<&str, ()> = demand_by_sku
        .keys()
        .chain(sales_by_sku.keys())
        .map(|sku| (*sku, ()))
        .collect();

    let mut skus = Vec::with_capacity(universe.len());
    let mut with_demand = 0;
    let mut with_sales = 0;

    for sku in universe.keys() {
        let demand = demand_by_sku.get(sku).copied().unwrap_or(0);
        let sold = sales_by_sku.get(sku).copied().unwrap_or(0);
        if demand > 0 {
            with_demand += 1;
        }
        if sold > 0 {
            with_sales += 1;
        }
        skus.push(SkuKpi {
            sku: sku.to_string(),
            demand,
            sales: sold,
            lost_opportunity_pct: lost_opportunity_pct(demand, sold),
            penetration_rate: penetration_rate(demand, sold),
            fill_rate_pct: fill_rate_pct(demand, sold),
        });
    }

    KpiReport {
        coverage_ratio: coverage_ratio(with_sales, with_demand),
        skus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;

    fn agg(sku: &str, total: i64) -> RegionalAggregate {
        RegionalAggregate {
            sku: sku.into(),
            region_totals: Map::new(),
            total,
            record_count: 1,
            rank: 1,
        }
    }

    fn sale(sku: &str, region: &str, quantity: i64) -> SalesRow {
        SalesRow { sku: sku.into(), region: region.into(), quantity }
    }

    #[test]
    fn lost_opportunity_example() {
        assert_eq!(lost_opportunity_pct(12000, 4200), Some(65.0));
    }

    #[test]
    fn lost_opportunity_undefined_at_zero_demand() {
        assert_eq!(lost_opportunity_pct(0, 4200), None);
    }

    #[test]
    fn penetration_basic() {
        assert_eq!(penetration_rate(12000, 4200), Some(0.35));
        assert_eq!(penetration_rate(0, 100), None);
    }

    #[test]
    fn coverage_basic() {
        assert_eq!(coverage_ratio(3, 4), Some(0.75));
        assert_eq!(coverage_ratio(0, 0), None);
    }

    #[test]
    fn fill_rate_capped_and_undefined() {
        assert_eq!(fill_rate_pct(100, 35), Some(35.0));
        assert_eq!(fill_rate_pct(100, 250), Some(100.0));
        assert_eq!(fill_rate_pct(100, 0), Some(0.0));
        assert_eq!(fill_rate_pct(0, 50), Some(100.0));
        assert_eq!(fill_rate_pct(0, 0), None);
    }

    #[test]
    fn report_joins_by_sku_across_regions() {
        let aggregates = vec![agg("SUS-10001", 12000), agg("SUS-10002", 400)];
        let sales = vec![
            sale("SUS-10001", "North America", 3000),
            sale("SUS-10001", "Europe", 1200),
        ];
        let report = build_report(&aggregates, &sales);

        assert_eq!(report.skus.len(), 2);
        let first = &report.skus[0];
        assert_eq!(first.sku, "SUS-10001");
        assert_eq!(first.sales, 4200);
        assert_eq!(first.lost_opportunity_pct, Some(65.0));

        let second = &report.skus[1];
        assert_eq!(second.sales, 0);
        assert_eq!(second.lost_opportunity_pct, Some(100.0));

        // One of two demanded SKUs has sales.
        assert_eq!(report.coverage_ratio, Some(0.5));
    }

    #[test]
    fn sales_only_sku_joins_the_universe() {
        let aggregates = vec![agg("SUS-10001", 100)];
        let sales = vec![sale("SUS-99999", "Europe", 10)];
        let report = build_report(&aggregates, &sales);
        assert_eq!(report.skus.len(), 2);
        let ghost = report.skus.iter().find(|k| k.sku == "SUS-99999").unwrap();
        assert_eq!(ghost.demand, 0);
        assert_eq!(ghost.lost_opportunity_pct, None);
        assert_eq!(ghost.fill_rate_pct, Some(100.0));
    }
}
