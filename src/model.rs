use serde::{Serialize, Deserialize};

/// One item inside a trade-up, as it appears in the shard JSON.
/// Every numeric field is optional in the wild; missing values are
/// displayed as "N/A" and never matched by bounded filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skin {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub float: Option<f64>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub collection_name: Option<String>,
    /// How many copies of this skin go into the trade-up (inputs only).
    pub times: Option<f64>,
    /// Probability of this output being rolled, in [0, 1] (outputs only).
    pub chance: Option<f64>,
}

impl Skin {
    /// Multiplicity of this skin: `times` floored, absent or non-positive
    /// values count as a single copy.
    pub fn copies(&self) -> u32 {
        match self.times {
            Some(t) if t > 0.0 => t.floor() as u32,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tradeup {
    pub tradeup_cost: Option<f64>,
    pub mean_profit: Option<f64>,
    pub odds_to_profit: Option<f64>,
    pub profitability: Option<f64>,
    #[serde(default)]
    pub input_skins: Vec<Skin>,
    #[serde(default)]
    pub output_skins: Vec<Skin>,
}

impl Tradeup {
    /// Average float of the input skins, weighted by each skin's copy count.
    /// `None` when no input carries a numeric float; an undefined average
    /// fails bounded float filters rather than defaulting to a number.
    pub fn avg_input_float(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0u32;
        for skin in &self.input_skins {
            if let Some(f) = skin.float {
                let copies = skin.copies();
                sum += f * copies as f64;
                count += copies;
            }
        }
        if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(float: Option<f64>, times: Option<f64>) -> Skin {
        Skin {
            name: "skin".into(),
            image: String::new(),
            float,
            buy_price: None,
            sell_price: None,
            collection_name: None,
            times,
            chance: None,
        }
    }

    #[test]
    fn copies_defaults_to_one() {
        assert_eq!(input(None, None).copies(), 1);
        assert_eq!(input(None, Some(0.0)).copies(), 1);
        assert_eq!(input(None, Some(-3.0)).copies(), 1);
        assert_eq!(input(None, Some(2.9)).copies(), 2);
    }

    #[test]
    fn avg_float_is_weighted_by_copies() {
        let t = Tradeup {
            tradeup_cost: Some(10.0),
            mean_profit: Some(5.0),
            odds_to_profit: Some(50.0),
            profitability: None,
            input_skins: vec![input(Some(0.1), Some(2.0)), input(Some(0.3), Some(1.0))],
            output_skins: vec![],
        };
        let avg = t.avg_input_float().unwrap();
        assert!((avg - (0.1 * 2.0 + 0.3) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn avg_float_skips_inputs_without_float() {
        let t = Tradeup {
            tradeup_cost: None,
            mean_profit: None,
            odds_to_profit: None,
            profitability: None,
            input_skins: vec![input(None, Some(5.0)), input(Some(0.2), None)],
            output_skins: vec![],
        };
        assert_eq!(t.avg_input_float(), Some(0.2));
    }

    #[test]
    fn avg_float_undefined_without_any_float() {
        let t = Tradeup {
            tradeup_cost: None,
            mean_profit: None,
            odds_to_profit: None,
            profitability: None,
            input_skins: vec![input(None, Some(2.0))],
            output_skins: vec![],
        };
        assert_eq!(t.avg_input_float(), None);
    }

    #[test]
    fn deserializes_shard_record_with_missing_fields() {
        let json = r#"{
            "tradeup_cost": 12.5,
            "odds_to_profit": 41.2,
            "input_skins": [
                {"name": "AK", "image": "ak.png", "float": 0.11,
                 "buy_price": 1.2, "collection_name": "Arms Deal", "times": 3}
            ],
            "output_skins": [
                {"name": "M4", "image": "m4.png", "float": 0.2,
                 "sell_price": 20.0, "chance": 0.1}
            ]
        }"#;
        let t: Tradeup = serde_json::from_str(json).unwrap();
        assert_eq!(t.tradeup_cost, Some(12.5));
        assert_eq!(t.mean_profit, None);
        assert_eq!(t.profitability, None);
        assert_eq!(t.input_skins[0].copies(), 3);
        assert_eq!(t.output_skins[0].chance, Some(0.1));
        assert_eq!(t.output_skins[0].times, None);
    }
}
