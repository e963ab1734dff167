/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ::portmat_linalg::{MatrixError, Result};
use ::serde::{Deserialize, Serialize};
use ::std::cmp::Ordering;

#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RankOrder {
    /// The largest value gets rank 1.
    Descending,
    /// The smallest value gets rank 1.
    Ascending,
}

impl Default for RankOrder {
    fn default() -> Self { RankOrder::Descending }
}

/// 1-based rank of each element. Tied values share the lowest rank among them,
/// and the following rank is skipped.
pub fn rank(xs: &[f64], order: RankOrder) -> Result<Vec<usize>> {
    if xs.iter().any(|x| x.is_nan()) {
        return Err(MatrixError::invalid_argument("cannot rank data containing NaN"));
    }
    let compare = |a: &f64, b: &f64| -> Ordering {
        let ord = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        match order {
            RankOrder::Ascending => ord,
            RankOrder::Descending => ord.reverse(),
        }
    };

    let mut perm: Vec<usize> = (0..xs.len()).collect();
    perm.sort_by(|&a, &b| compare(&xs[a], &xs[b]));

    let mut ranks = vec![0; xs.len()];
    for (pos, &i) in perm.iter().enumerate() {
        ranks[i] = match pos {
            0 => 1,
            _ => {
                let prev = perm[pos - 1];
                match xs[prev] == xs[i] {
                    true => ranks[prev],
                    false => pos + 1,
                }
            },
        };
    }
    Ok(ranks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::pretty_assertions::assert_eq;

    #[test]
    fn ties_share_lowest_rank() {
        let xs = [7.0, 3.5, 3.5, 1.0, 2.0];
        assert_eq!(rank(&xs, RankOrder::Descending).unwrap(), vec![1, 2, 2, 5, 4]);
        assert_eq!(rank(&xs, RankOrder::Ascending).unwrap(), vec![5, 3, 3, 1, 2]);
    }

    #[test]
    fn all_equal_and_empty() {
        assert_eq!(rank(&[2.0; 4], RankOrder::Descending).unwrap(), vec![1; 4]);
        assert_eq!(rank(&[], RankOrder::Ascending).unwrap(), Vec::<usize>::new());
        assert!(rank(&[1.0, ::std::f64::NAN], RankOrder::Ascending).is_err());
    }

    #[test]
    fn order_from_json() {
        let order: RankOrder = from_json!("ascending");
        assert_eq!(order, RankOrder::Ascending);
        assert_eq!(RankOrder::default(), RankOrder::Descending);
    }
}
