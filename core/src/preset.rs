//! The preset catalog — tagged, validated transaction templates.
//!
//! A preset describes one kind of simulated transaction: a category, a
//! direction and either an amount range or a discrete fixed-amount set.
//! Built-in presets feed the quick-random generator; custom presets are
//! fired explicitly by id through the preset-trigger path.

use crate::{
    balance,
    error::{BankError, BankResult},
    factory::Direction,
    rng::EngineRng,
    types::PresetId,
};
use serde::{Deserialize, Serialize};

/// Closed category set. Free-form category strings in the catalog were a
/// typo magnet; excluding/including presets matches on these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Groceries,
    Dining,
    Transport,
    Shopping,
    Entertainment,
    Subscriptions,
    Utilities,
    Health,
    Salary,
    Transfer,
    TopUp,
    ReferralBonus,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "groceries",
            Self::Dining => "dining",
            Self::Transport => "transport",
            Self::Shopping => "shopping",
            Self::Entertainment => "entertainment",
            Self::Subscriptions => "subscriptions",
            Self::Utilities => "utilities",
            Self::Health => "health",
            Self::Salary => "salary",
            Self::Transfer => "transfer",
            Self::TopUp => "top_up",
            Self::ReferralBonus => "referral_bonus",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "groceries" => Self::Groceries,
            "dining" => Self::Dining,
            "transport" => Self::Transport,
            "shopping" => Self::Shopping,
            "entertainment" => Self::Entertainment,
            "subscriptions" => Self::Subscriptions,
            "utilities" => Self::Utilities,
            "health" => Self::Health,
            "salary" => Self::Salary,
            "transfer" => Self::Transfer,
            "top_up" => Self::TopUp,
            "referral_bonus" => Self::ReferralBonus,
            "other" => Self::Other,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub preset_id: PresetId,
    pub description: String,
    pub direction: Direction,
    pub category: Category,
    pub min_amount: f64,
    pub max_amount: f64,
    /// Discrete set to sample instead of the range, e.g. subscription
    /// tiers. All values whole units >= 1.
    pub fixed_amounts: Option<Vec<f64>>,
    pub is_custom: bool,
}

impl Preset {
    /// Validated constructor. Ranges and fixed sets are checked here so
    /// the generators never have to re-validate at sampling time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        preset_id: impl Into<PresetId>,
        description: impl Into<String>,
        direction: Direction,
        category: Category,
        min_amount: f64,
        max_amount: f64,
        fixed_amounts: Option<Vec<f64>>,
        is_custom: bool,
    ) -> BankResult<Self> {
        // Simulated flows carry whole units, so the bounds must be
        // whole too: otherwise sampling would floor an amount outside
        // the preset's own declared range.
        let whole_unit = |a: f64| a.is_finite() && a >= 1.0 && a.fract() == 0.0;
        if !whole_unit(min_amount) || !whole_unit(max_amount) {
            return Err(BankError::invalid_amount(
                "preset amounts must be whole units >= 1",
            ));
        }
        if max_amount < min_amount {
            return Err(BankError::invalid_amount(
                "preset max_amount must be >= min_amount",
            ));
        }
        if let Some(set) = &fixed_amounts {
            if set.is_empty() || set.iter().any(|a| !whole_unit(*a)) {
                return Err(BankError::invalid_amount(
                    "preset fixed_amounts must be non-empty whole units >= 1",
                ));
            }
        }
        Ok(Self {
            preset_id: preset_id.into(),
            description: description.into(),
            direction,
            category,
            min_amount,
            max_amount,
            fixed_amounts,
            is_custom,
        })
    }

    /// Draw one amount for this preset: a uniform pick from the fixed
    /// set when present, otherwise uniform in [min, max]. Simulated
    /// flows carry whole units, so the draw is floored (never below 1).
    pub fn sample_amount(&self, rng: &mut EngineRng) -> f64 {
        let raw = match &self.fixed_amounts {
            Some(set) => *rng.pick(set).unwrap_or(&self.min_amount),
            None => rng.in_range(self.min_amount, self.max_amount),
        };
        balance::floor_amount(raw).max(1.0)
    }
}

/// The built-in quick-random expense catalog, seeded into the store on
/// first migration. Descriptions mirror what the home-screen action
/// shows the user.
pub fn builtin_catalog() -> BankResult<Vec<Preset>> {
    let p = |id: &str,
             desc: &str,
             category: Category,
             min: f64,
             max: f64,
             fixed: Option<Vec<f64>>| {
        Preset::new(id, desc, Direction::Expense, category, min, max, fixed, false)
    };

    let catalog = vec![
        p("qr-groceries", "Grocery store", Category::Groceries, 8.0, 95.0, None),
        p("qr-coffee", "Coffee shop", Category::Dining, 3.0, 9.0, None),
        p("qr-restaurant", "Restaurant", Category::Dining, 12.0, 68.0, None),
        p("qr-taxi", "Taxi ride", Category::Transport, 6.0, 32.0, None),
        p("qr-fuel", "Fuel station", Category::Transport, 20.0, 70.0, None),
        p("qr-clothes", "Clothing store", Category::Shopping, 15.0, 140.0, None),
        p("qr-electronics", "Electronics store", Category::Shopping, 25.0, 320.0, None),
        p("qr-cinema", "Cinema tickets", Category::Entertainment, 9.0, 34.0, None),
        p(
            "qr-streaming",
            "Streaming subscription",
            Category::Subscriptions,
            5.0,
            20.0,
            Some(vec![5.0, 9.0, 13.0, 18.0]),
        ),
        p("qr-utilities", "Utility bill", Category::Utilities, 30.0, 120.0, None),
        p("qr-pharmacy", "Pharmacy", Category::Health, 4.0, 45.0, None),
    ];
    catalog.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid_and_expense_only() {
        let catalog = builtin_catalog().unwrap();
        assert!(!catalog.is_empty());
        for preset in &catalog {
            assert_eq!(preset.direction, Direction::Expense);
            assert!(!preset.is_custom);
            assert!(preset.min_amount > 0.0);
        }
    }

    #[test]
    fn rejects_inverted_range() {
        let err = Preset::new(
            "bad",
            "bad",
            Direction::Expense,
            Category::Other,
            50.0,
            10.0,
            None,
            true,
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_sub_unit_and_fractional_amounts() {
        for (min, max) in [(0.5, 10.0), (1.5, 10.0), (2.0, 10.25)] {
            let err = Preset::new(
                "bad",
                "bad",
                Direction::Expense,
                Category::Other,
                min,
                max,
                None,
                true,
            );
            assert!(err.is_err(), "bounds {min}..{max} should be rejected");
        }
        let err = Preset::new(
            "bad",
            "bad",
            Direction::Expense,
            Category::Other,
            1.0,
            10.0,
            Some(vec![0.5]),
            true,
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_empty_fixed_set() {
        let err = Preset::new(
            "bad",
            "bad",
            Direction::Expense,
            Category::Other,
            1.0,
            10.0,
            Some(vec![]),
            true,
        );
        assert!(err.is_err());
    }

    #[test]
    fn sample_stays_in_bounds_and_whole() {
        let mut rng = EngineRng::new(11);
        let preset = Preset::new(
            "p",
            "p",
            Direction::Expense,
            Category::Dining,
            5.0,
            40.0,
            None,
            false,
        )
        .unwrap();
        for _ in 0..200 {
            let a = preset.sample_amount(&mut rng);
            assert!((5.0..=40.0).contains(&a));
            assert_eq!(a, a.floor());
        }
    }

    #[test]
    fn sample_draws_from_fixed_set() {
        let mut rng = EngineRng::new(5);
        let preset = Preset::new(
            "p",
            "p",
            Direction::Expense,
            Category::Subscriptions,
            5.0,
            20.0,
            Some(vec![5.0, 9.0, 13.0]),
            false,
        )
        .unwrap();
        for _ in 0..50 {
            let a = preset.sample_amount(&mut rng);
            assert!([5.0, 9.0, 13.0].contains(&a));
        }
    }

    #[test]
    fn category_round_trips() {
        for c in [
            Category::Groceries,
            Category::Transfer,
            Category::ReferralBonus,
            Category::Other,
        ] {
            assert_eq!(Category::parse(c.as_str()), Some(c));
        }
        assert_eq!(Category::parse("no-such"), None);
    }
}
