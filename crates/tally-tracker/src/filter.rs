use tally_core::{CoreError, Coins};

/// Admits accounts holding at least the floor amount in any one
/// whitelisted denomination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdFilter {
    floor: Coins,
}

impl ThresholdFilter {
    /// One `unit` of every whitelisted denomination. A zero unit is
    /// refused: coin vectors hold no zero amounts, so it would leave the
    /// floor empty and admit nobody.
    pub fn new(whitelist: &[String], unit: u128) -> Result<Self, CoreError> {
        if unit == 0 {
            return Err(CoreError::InvalidAmount("threshold unit must be positive".to_string()));
        }
        let mut floor = Coins::new();
        for denom in whitelist {
            if floor.amount_of(denom) == 0 {
                floor.add_amount(denom, unit)?;
            }
        }
        Ok(ThresholdFilter { floor })
    }

    pub fn from_floor(floor: Coins) -> Self {
        ThresholdFilter { floor }
    }

    pub fn floor(&self) -> &Coins {
        &self.floor
    }

    /// Per-denomination comparison; denominations missing from `balance`
    /// count as zero
    pub fn admits(&self, balance: &Coins) -> bool {
        balance.is_any_gte(&self.floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use tally_core::Coin;

    fn coins(pairs: &[(&str, u128)]) -> Coins {
        Coins::from_coins(pairs.iter().map(|(d, a)| Coin::new(*d, *a))).unwrap()
    }

    #[test]
    fn test_exact_floor_included() {
        let filter = ThresholdFilter::new(&["denomA".to_string()], 1_000_000).unwrap();

        assert!(filter.admits(&coins(&[("denomA", 1_000_000)])));
        assert!(!filter.admits(&coins(&[("denomA", 999_999)])));
    }

    #[test]
    fn test_any_single_denomination_suffices() {
        let filter =
            ThresholdFilter::new(&["ukrw".to_string(), "uluna".to_string()], 1_000_000).unwrap();

        assert!(filter.admits(&coins(&[("ukrw", 5), ("uluna", 2_000_000)])));
        // no summing across denominations
        assert!(!filter.admits(&coins(&[("ukrw", 600_000), ("uluna", 600_000)])));
        // non-whitelisted holdings never count
        assert!(!filter.admits(&coins(&[("uusd", 9_000_000)])));
    }

    #[test]
    fn test_duplicate_whitelist_entries_do_not_raise_floor() {
        let filter =
            ThresholdFilter::new(&["uluna".to_string(), "uluna".to_string()], 10).unwrap();
        assert_eq!(filter.floor(), &coins(&[("uluna", 10)]));
    }

    #[test]
    fn test_empty_whitelist_admits_nothing() {
        let filter = ThresholdFilter::new(&[], 1_000_000).unwrap();
        assert!(!filter.admits(&coins(&[("uluna", u128::MAX)])));
    }

    #[test]
    fn test_zero_unit_rejected() {
        let whitelist = ["uluna".to_string()];
        assert!(matches!(
            ThresholdFilter::new(&whitelist, 0),
            Err(CoreError::InvalidAmount(_))
        ));

        // the smallest accepted floor admits any holding
        let one = ThresholdFilter::new(&whitelist, 1).unwrap();
        assert!(one.admits(&coins(&[("uluna", 5)])));
    }

    #[test]
    fn test_raising_floor_never_grows_admitted_set() {
        let mut rng = rand::thread_rng();
        let denoms = ["a", "b", "c"];

        let balances: Vec<Coins> = (0..200)
            .map(|_| {
                let pairs: Vec<(&str, u128)> = denoms
                    .iter()
                    .map(|d| (*d, rng.gen_range(0..2_000u128)))
                    .collect();
                coins(&pairs)
            })
            .collect();

        let low = coins(&[("a", 500), ("b", 700), ("c", 900)]);
        let raised = coins(&[("a", 500), ("b", 1_200), ("c", 900)]);
        let low = ThresholdFilter::from_floor(low);
        let raised = ThresholdFilter::from_floor(raised);

        for balance in &balances {
            if raised.admits(balance) {
                assert!(low.admits(balance));
            }
        }
    }
}
