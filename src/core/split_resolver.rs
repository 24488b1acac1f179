//! Split resolution module
//!
//! Expands one expense into concrete per-member shares. Resolution is a pure
//! function of the expense and the trip's member list.
//!
//! The resolver is responsible for:
//! - Determining the eligible member set (snapshot or legacy fallback)
//! - Dividing the amount equally or proportionally to weights
//! - Reporting data-quality problems instead of dividing by zero
//!
//! All arithmetic is exact `Decimal` arithmetic. Nothing is rounded here; the
//! last receiving member absorbs the sub-representable remainder of the
//! division so the shares always sum to the expense amount exactly.

use crate::types::{
    DataQualityWarning, Eligibility, Expense, Member, MemberId, RecordRef, Share, SplitMethod,
    WeightEntry,
};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Result of resolving one expense
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSplit {
    /// Allocated shares in member-list order
    pub shares: Vec<Share>,

    /// Data-quality problems encountered while resolving
    pub warnings: Vec<DataQualityWarning>,
}

impl ResolvedSplit {
    /// Sum of all allocated shares
    pub fn allocated(&self) -> Decimal {
        self.shares.iter().map(|share| share.amount).sum()
    }

    /// Whether any part of the expense was allocated
    pub fn is_allocated(&self) -> bool {
        self.shares.iter().any(|share| share.amount > Decimal::ZERO)
    }

    /// Share allocated to a member, zero if the member received none
    pub fn share_of(&self, member_id: &str) -> Decimal {
        self.shares
            .iter()
            .filter(|share| share.member_id == member_id)
            .map(|share| share.amount)
            .sum()
    }
}

/// Determine which members share an expense
///
/// - `Snapshot(ids)`: members whose id appears in the snapshot. Ids that are
///   not on the member list are silently excluded.
/// - `Legacy`: every active member (no `left_at`).
///
/// Members are returned in member-list order, each at most once.
pub fn eligible_members<'a>(expense: &Expense, members: &'a [Member]) -> Vec<&'a Member> {
    match &expense.eligibility {
        Eligibility::Legacy => members.iter().filter(|m| m.is_active()).collect(),
        Eligibility::Snapshot(ids) => {
            let snapshot: HashSet<&str> = ids.iter().map(String::as_str).collect();
            members
                .iter()
                .filter(|m| snapshot.contains(m.id.as_str()))
                .collect()
        }
    }
}

/// Convert one expense into per-member shares
///
/// # Arguments
///
/// * `expense` - The expense to resolve (assumed already validated)
/// * `members` - Authoritative list of members on the trip
///
/// # Returns
///
/// The allocated shares and any data-quality warnings. When the eligible set
/// is empty or the eligible weights sum to zero, no shares are allocated and
/// a warning explains why.
pub fn resolve_split(expense: &Expense, members: &[Member]) -> ResolvedSplit {
    let eligible = eligible_members(expense, members);

    if eligible.is_empty() {
        return ResolvedSplit {
            shares: Vec::new(),
            warnings: vec![DataQualityWarning::NoEligibleMembers {
                expense_id: expense.id.clone(),
            }],
        };
    }

    match &expense.split {
        SplitMethod::Equal => resolve_equal(expense, &eligible),
        SplitMethod::Weighted(weights) => resolve_weighted(expense, weights, &eligible, members),
    }
}

fn resolve_equal(expense: &Expense, eligible: &[&Member]) -> ResolvedSplit {
    let parts: Vec<(&MemberId, Decimal)> = eligible.iter().map(|m| (&m.id, Decimal::ONE)).collect();
    allocate(expense, &parts, Decimal::from(eligible.len()), Vec::new())
}

fn resolve_weighted(
    expense: &Expense,
    weights: &[WeightEntry],
    eligible: &[&Member],
    members: &[Member],
) -> ResolvedSplit {
    let mut warnings = Vec::new();

    let known: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();
    for entry in weights {
        if !known.contains(entry.member_id.as_str()) {
            warnings.push(DataQualityWarning::UnknownWeightMember {
                expense_id: expense.id.clone(),
                member_id: entry.member_id.clone(),
            });
        }
    }

    // Restrict to eligible members, folding duplicate entries together
    let parts: Option<Vec<(&MemberId, Decimal)>> = eligible
        .iter()
        .filter_map(|member| {
            let mut listed = weights.iter().filter(|e| e.member_id == member.id).peekable();
            listed.peek()?;
            Some(checked_sum(listed.map(|e| e.weight)).map(|weight| (&member.id, weight)))
        })
        .collect();

    let Some((parts, total)) = parts.and_then(|parts| {
        let total = checked_sum(parts.iter().map(|(_, weight)| *weight))?;
        Some((parts, total))
    }) else {
        warnings.push(DataQualityWarning::AmountOverflow {
            record: RecordRef::Expense(expense.id.clone()),
        });
        return ResolvedSplit {
            shares: Vec::new(),
            warnings,
        };
    };

    if total <= Decimal::ZERO {
        warnings.push(DataQualityWarning::ZeroTotalWeight {
            expense_id: expense.id.clone(),
        });
        return ResolvedSplit {
            shares: Vec::new(),
            warnings,
        };
    }

    allocate(expense, &parts, total, warnings)
}

fn allocate(
    expense: &Expense,
    parts: &[(&MemberId, Decimal)],
    total: Decimal,
    mut warnings: Vec<DataQualityWarning>,
) -> ResolvedSplit {
    match distribute(expense.amount, parts, total) {
        Some(shares) => ResolvedSplit { shares, warnings },
        None => {
            warnings.push(DataQualityWarning::AmountOverflow {
                record: RecordRef::Expense(expense.id.clone()),
            });
            ResolvedSplit {
                shares: Vec::new(),
                warnings,
            }
        }
    }
}

/// Split `amount` proportionally to `parts` whose weights sum to `total`
///
/// The last part with a positive weight receives whatever remains after the
/// others, so the result sums to `amount` exactly. `None` if a share cannot
/// be represented.
fn distribute(
    amount: Decimal,
    parts: &[(&MemberId, Decimal)],
    total: Decimal,
) -> Option<Vec<Share>> {
    let last_weighted = parts.iter().rposition(|(_, weight)| *weight > Decimal::ZERO);
    let mut assigned = Decimal::ZERO;
    let mut shares = Vec::with_capacity(parts.len());

    for (index, (member_id, weight)) in parts.iter().enumerate() {
        let share = if Some(index) == last_weighted {
            amount.checked_sub(assigned)?
        } else if *weight > Decimal::ZERO {
            proportion(amount, *weight, total)?
        } else {
            Decimal::ZERO
        };
        assigned = assigned.checked_add(share)?;
        shares.push(Share::new(member_id.as_str(), share));
    }

    Some(shares)
}

fn checked_sum(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.fold(Some(Decimal::ZERO), |sum, value| sum?.checked_add(value))
}

/// `amount * weight / total`, dividing first when the product overflows
fn proportion(amount: Decimal, weight: Decimal, total: Decimal) -> Option<Decimal> {
    match amount.checked_mul(weight) {
        Some(product) => product.checked_div(total),
        None => weight.checked_div(total)?.checked_mul(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, MemberRole};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn member(id: &str) -> Member {
        Member::new(
            id,
            id.to_uppercase(),
            MemberRole::Member,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn members(ids: &[&str]) -> Vec<Member> {
        ids.iter().map(|id| member(id)).collect()
    }

    fn expense(amount: Decimal, split: SplitMethod, eligibility: Eligibility) -> Expense {
        Expense {
            id: "e1".to_string(),
            trip_id: "t1".to_string(),
            amount,
            description: "Dinner".to_string(),
            category: Category::Food,
            paid_by: "m1".to_string(),
            split,
            eligibility,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        }
    }

    fn snapshot(ids: &[&str]) -> Eligibility {
        Eligibility::Snapshot(ids.iter().map(|id| id.to_string()).collect())
    }

    fn weights(entries: &[(&str, i64)]) -> SplitMethod {
        SplitMethod::Weighted(
            entries
                .iter()
                .map(|(id, w)| WeightEntry::new(*id, Decimal::from(*w)))
                .collect(),
        )
    }

    #[test]
    fn test_equal_split_among_snapshot() {
        let trip_members = members(&["m1", "m2", "m3"]);
        let exp = expense(
            Decimal::new(300_000, 0),
            SplitMethod::Equal,
            snapshot(&["m1", "m2", "m3"]),
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert!(resolved.warnings.is_empty());
        assert_eq!(resolved.shares.len(), 3);
        for share in &resolved.shares {
            assert_eq!(share.amount, Decimal::new(100_000, 0));
        }
        assert_eq!(resolved.allocated(), Decimal::new(300_000, 0));
    }

    #[rstest]
    #[case(Decimal::new(100, 0), 3)]
    #[case(Decimal::new(1000, 2), 7)]
    #[case(Decimal::new(1, 2), 3)]
    #[case(Decimal::new(99_999, 0), 6)]
    fn test_equal_split_sums_exactly(#[case] amount: Decimal, #[case] count: usize) {
        let ids: Vec<String> = (1..=count).map(|i| format!("m{}", i)).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let trip_members = members(&id_refs);
        let exp = expense(amount, SplitMethod::Equal, Eligibility::Legacy);

        let resolved = resolve_split(&exp, &trip_members);

        assert_eq!(resolved.shares.len(), count);
        assert_eq!(resolved.allocated(), amount);

        let expected = amount / Decimal::from(count);
        let tolerance = Decimal::new(1, 20);
        for share in &resolved.shares {
            assert!((share.amount - expected).abs() < tolerance);
        }
    }

    #[test]
    fn test_weighted_split_with_ineligible_member() {
        let trip_members = members(&["m1", "m2", "m3"]);
        let exp = expense(
            Decimal::new(100, 0),
            weights(&[("m1", 1), ("m2", 3), ("m3", 5)]),
            snapshot(&["m1", "m2"]),
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert!(resolved.warnings.is_empty());
        assert_eq!(resolved.share_of("m1"), Decimal::new(25, 0));
        assert_eq!(resolved.share_of("m2"), Decimal::new(75, 0));
        assert_eq!(resolved.share_of("m3"), Decimal::ZERO);
    }

    #[test]
    fn test_weighted_split_zero_weight_member_gets_zero() {
        let trip_members = members(&["m1", "m2", "m3"]);
        let exp = expense(
            Decimal::new(90, 0),
            weights(&[("m1", 2), ("m2", 0), ("m3", 1)]),
            Eligibility::Legacy,
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert_eq!(resolved.shares.len(), 3);
        assert_eq!(resolved.share_of("m1"), Decimal::new(60, 0));
        assert_eq!(resolved.share_of("m2"), Decimal::ZERO);
        assert_eq!(resolved.share_of("m3"), Decimal::new(30, 0));
    }

    #[test]
    fn test_weighted_split_proportional_to_fractional_weights() {
        let trip_members = members(&["m1", "m2", "m3"]);
        let exp = expense(
            Decimal::new(100, 0),
            SplitMethod::Weighted(vec![
                WeightEntry::new("m1", Decimal::new(5, 1)),
                WeightEntry::new("m2", Decimal::new(5, 1)),
                WeightEntry::new("m3", Decimal::ONE),
            ]),
            Eligibility::Legacy,
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert_eq!(resolved.share_of("m1"), Decimal::new(25, 0));
        assert_eq!(resolved.share_of("m2"), Decimal::new(25, 0));
        assert_eq!(resolved.share_of("m3"), Decimal::new(50, 0));
    }

    #[test]
    fn test_weighted_split_sums_exactly_with_repeating_fraction() {
        let trip_members = members(&["m1", "m2", "m3"]);
        let exp = expense(
            Decimal::new(100, 0),
            weights(&[("m1", 1), ("m2", 1), ("m3", 1)]),
            Eligibility::Legacy,
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert_eq!(resolved.allocated(), Decimal::new(100, 0));
    }

    #[test]
    fn test_weighted_split_duplicate_entries_are_summed() {
        let trip_members = members(&["m1", "m2"]);
        let exp = expense(
            Decimal::new(40, 0),
            weights(&[("m1", 1), ("m2", 1), ("m1", 2)]),
            Eligibility::Legacy,
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert_eq!(resolved.shares.len(), 2);
        assert_eq!(resolved.share_of("m1"), Decimal::new(30, 0));
        assert_eq!(resolved.share_of("m2"), Decimal::new(10, 0));
    }

    #[test]
    fn test_weighted_split_unknown_member_warns_and_is_ignored() {
        let trip_members = members(&["m1", "m2"]);
        let exp = expense(
            Decimal::new(60, 0),
            weights(&[("m1", 1), ("m2", 1), ("gone", 4)]),
            snapshot(&["m1", "m2", "gone"]),
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert_eq!(
            resolved.warnings,
            vec![DataQualityWarning::UnknownWeightMember {
                expense_id: "e1".to_string(),
                member_id: "gone".to_string(),
            }]
        );
        assert_eq!(resolved.share_of("m1"), Decimal::new(30, 0));
        assert_eq!(resolved.share_of("m2"), Decimal::new(30, 0));
    }

    #[test]
    fn test_weighted_split_zero_total_weight_allocates_nothing() {
        let trip_members = members(&["m1", "m2", "m3"]);
        let exp = expense(
            Decimal::new(50, 0),
            weights(&[("m1", 0), ("m3", 4)]),
            snapshot(&["m1", "m2"]),
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert!(resolved.shares.is_empty());
        assert!(!resolved.is_allocated());
        assert_eq!(
            resolved.warnings,
            vec![DataQualityWarning::ZeroTotalWeight {
                expense_id: "e1".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_snapshot_allocates_nothing() {
        let trip_members = members(&["m1", "m2", "m3"]);
        let exp = expense(Decimal::new(75, 0), SplitMethod::Equal, snapshot(&[]));

        let resolved = resolve_split(&exp, &trip_members);

        assert!(resolved.shares.is_empty());
        assert_eq!(
            resolved.warnings,
            vec![DataQualityWarning::NoEligibleMembers {
                expense_id: "e1".to_string()
            }]
        );
    }

    #[test]
    fn test_snapshot_of_only_unknown_members_allocates_nothing() {
        let trip_members = members(&["m1", "m2"]);
        let exp = expense(Decimal::new(75, 0), SplitMethod::Equal, snapshot(&["x", "y"]));

        let resolved = resolve_split(&exp, &trip_members);

        assert!(resolved.shares.is_empty());
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn test_snapshot_unknown_ids_silently_excluded() {
        let trip_members = members(&["m1", "m2", "m3"]);
        let exp = expense(
            Decimal::new(100, 0),
            SplitMethod::Equal,
            snapshot(&["m3", "ghost", "m1"]),
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert!(resolved.warnings.is_empty());
        // Shares follow member-list order, not snapshot order
        let ids: Vec<&str> = resolved.shares.iter().map(|s| s.member_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m3"]);
        assert_eq!(resolved.share_of("m1"), Decimal::new(50, 0));
        assert_eq!(resolved.share_of("m3"), Decimal::new(50, 0));
    }

    #[test]
    fn test_legacy_expense_splits_among_current_members() {
        let mut trip_members = members(&["m1", "m2", "m3", "m4"]);
        trip_members[1].left_at = Some(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap());
        let exp = expense(Decimal::new(90, 0), SplitMethod::Equal, Eligibility::Legacy);

        let resolved = resolve_split(&exp, &trip_members);

        assert_eq!(resolved.shares.len(), 3);
        assert_eq!(resolved.share_of("m2"), Decimal::ZERO);
        assert_eq!(resolved.share_of("m4"), Decimal::new(30, 0));
    }

    #[test]
    fn test_snapshot_keeps_departed_member() {
        let mut trip_members = members(&["m1", "m2"]);
        trip_members[1].left_at = Some(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap());
        let exp = expense(Decimal::new(10, 0), SplitMethod::Equal, snapshot(&["m1", "m2"]));

        let resolved = resolve_split(&exp, &trip_members);

        assert_eq!(resolved.share_of("m2"), Decimal::new(5, 0));
    }

    #[test]
    fn test_resolution_is_pure() {
        let trip_members = members(&["m1", "m2", "m3"]);
        let exp = expense(
            Decimal::new(1000, 2),
            weights(&[("m1", 1), ("m2", 2), ("m3", 4)]),
            Eligibility::Legacy,
        );

        assert_eq!(resolve_split(&exp, &trip_members), resolve_split(&exp, &trip_members));
    }

    #[test]
    fn test_large_weights_do_not_overflow() {
        let trip_members = members(&["m1", "m2"]);
        let exp = expense(
            Decimal::from(1_000_000_000_000_i64),
            weights(&[("m1", 100_000_000_000_000_000), ("m2", 300_000_000_000_000_000)]),
            Eligibility::Legacy,
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert!(resolved.warnings.is_empty());
        assert_eq!(resolved.share_of("m1"), Decimal::from(250_000_000_000_i64));
        assert_eq!(resolved.share_of("m2"), Decimal::from(750_000_000_000_i64));
        assert_eq!(resolved.allocated(), exp.amount);
    }

    #[test]
    fn test_unrepresentable_share_is_reported_instead_of_allocated() {
        // Unvalidated negative weight pushes one ratio far above 1
        let trip_members = members(&["m1", "m2", "m3"]);
        let exp = expense(
            Decimal::MAX,
            weights(&[("m1", 10), ("m2", 1), ("m3", -10)]),
            Eligibility::Legacy,
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert!(resolved.shares.is_empty());
        assert_eq!(
            resolved.warnings,
            vec![DataQualityWarning::AmountOverflow {
                record: RecordRef::Expense("e1".to_string()),
            }]
        );
    }

    #[test]
    fn test_unrepresentable_weight_total_is_reported() {
        let trip_members = members(&["m1", "m2"]);
        let exp = expense(
            Decimal::from(100),
            SplitMethod::Weighted(vec![
                WeightEntry::new("m1", Decimal::MAX),
                WeightEntry::new("m2", Decimal::MAX),
            ]),
            Eligibility::Legacy,
        );

        let resolved = resolve_split(&exp, &trip_members);

        assert!(!resolved.is_allocated());
        assert_eq!(
            resolved.warnings,
            vec![DataQualityWarning::AmountOverflow {
                record: RecordRef::Expense("e1".to_string()),
            }]
        );
    }
}
