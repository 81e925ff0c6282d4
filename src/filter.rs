use crate::model::Tradeup;

/// Inclusive numeric ranges over the accumulated records. `None` on either
/// endpoint means unbounded. A record whose value for a bounded field is
/// missing (including an undefined average input float) never matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub cost_min: Option<f64>,
    pub cost_max: Option<f64>,
    pub profit_min: Option<f64>,
    pub profit_max: Option<f64>,
    pub odds_min: Option<f64>,
    pub odds_max: Option<f64>,
    pub float_min: Option<f64>,
    pub float_max: Option<f64>,
}

fn in_range(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(v) = value else {
        return false;
    };
    min.is_none_or(|lo| v >= lo) && max.is_none_or(|hi| v <= hi)
}

impl Filters {
    pub fn matches(&self, tradeup: &Tradeup) -> bool {
        in_range(tradeup.tradeup_cost, self.cost_min, self.cost_max)
            && in_range(tradeup.mean_profit, self.profit_min, self.profit_max)
            && in_range(tradeup.odds_to_profit, self.odds_min, self.odds_max)
            && in_range(tradeup.avg_input_float(), self.float_min, self.float_max)
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Profitability,
    Odds,
    Cost,
    MeanProfit,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Profitability => "Profitability",
            SortKey::Odds => "Odds",
            SortKey::Cost => "Cost",
            SortKey::MeanProfit => "Profit per trade",
        }
    }

    pub const ALL: [SortKey; 4] = [
        SortKey::Profitability,
        SortKey::Odds,
        SortKey::Cost,
        SortKey::MeanProfit,
    ];
}

/// Total order for the view. Descending for every key except cost, which
/// sorts ascending (cheaper first). Records missing the key's field sort
/// last under either direction; ties are left as the sort produces them.
pub fn sort_view(view: &mut [Tradeup], key: SortKey) {
    match key {
        SortKey::Cost => view.sort_by(|a, b| {
            let va = a.tradeup_cost.unwrap_or(f64::INFINITY);
            let vb = b.tradeup_cost.unwrap_or(f64::INFINITY);
            va.total_cmp(&vb)
        }),
        SortKey::Odds => view.sort_by(|a, b| {
            let va = a.odds_to_profit.unwrap_or(f64::NEG_INFINITY);
            let vb = b.odds_to_profit.unwrap_or(f64::NEG_INFINITY);
            vb.total_cmp(&va)
        }),
        SortKey::MeanProfit => view.sort_by(|a, b| {
            let va = a.mean_profit.unwrap_or(f64::NEG_INFINITY);
            let vb = b.mean_profit.unwrap_or(f64::NEG_INFINITY);
            vb.total_cmp(&va)
        }),
        SortKey::Profitability => view.sort_by(|a, b| {
            let va = a.profitability.unwrap_or(f64::NEG_INFINITY);
            let vb = b.profitability.unwrap_or(f64::NEG_INFINITY);
            vb.total_cmp(&va)
        }),
    }
}

/// Filter then sort, rebuilt from scratch whenever the criteria change.
pub fn build_view(records: &[Tradeup], filters: &Filters, key: SortKey) -> Vec<Tradeup> {
    let mut view: Vec<Tradeup> = records
        .iter()
        .filter(|t| filters.matches(t))
        .cloned()
        .collect();
    sort_view(&mut view, key);
    view
}
