use serde::{Deserialize, Serialize};
use tally_core::serialize::amount_str;
use tally_core::Address;

use crate::aggregate::AccountBalance;

/// One row of a holder ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub address: Address,
    #[serde(with = "amount_str")]
    pub amount: u128,
}

/// Top `k` holders of `denom`, largest first.
///
/// Partial selection: each round scans the remaining pool for the greatest
/// amount and swap-removes it, O(k·n) without sorting the whole pool.
/// Equal amounts keep input order (the earlier account ranks first).
pub fn select_top_k(accounts: &[AccountBalance], denom: &str, k: usize) -> Vec<RankEntry> {
    // (input position, amount, account)
    let mut pool: Vec<(usize, u128, &AccountBalance)> = accounts
        .iter()
        .enumerate()
        .map(|(pos, account)| (pos, account.balance.amount_of(denom), account))
        .collect();

    let mut ranked = Vec::with_capacity(k.min(pool.len()));
    while ranked.len() < k {
        let Some(best) = position_of_max(&pool) else {
            break;
        };
        let (_, amount, account) = pool.swap_remove(best);
        ranked.push(RankEntry {
            address: account.address,
            amount,
        });
    }
    ranked
}

fn position_of_max(pool: &[(usize, u128, &AccountBalance)]) -> Option<usize> {
    let mut best: Option<(usize, usize, u128)> = None;
    for (idx, (pos, amount, _)) in pool.iter().enumerate() {
        let better = match best {
            None => true,
            Some((_, best_pos, best_amount)) => {
                *amount > best_amount || (*amount == best_amount && *pos < best_pos)
            }
        };
        if better {
            best = Some((idx, *pos, *amount));
        }
    }
    best.map(|(idx, _, _)| idx)
}
