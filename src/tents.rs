use serde::{Deserialize, Serialize};

use crate::error::TentError;

/// `count` tents that each sleep up to `capacity` participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TentType {
    pub capacity: u32,
    pub count: u32,
}

impl TentType {
    pub fn new(capacity: u32, count: u32) -> Self {
        TentType { capacity, count }
    }
}

/// Tent types, strictly ascending by capacity.
///
/// The per-tier constraints of the model count "tents larger than this tier"
/// by summing the tiers after it, which is only right for this ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    tiers: Vec<TentType>,
}

impl Inventory {
    pub fn new(tiers: Vec<TentType>) -> Result<Self, TentError> {
        if tiers.is_empty() {
            return Err(TentError::Configuration("no tent types given".into()));
        }
        if let Some(tier) = tiers.iter().find(|t| t.capacity == 0) {
            return Err(TentError::Configuration(format!(
                "tent type with {} tents has capacity 0",
                tier.count
            )));
        }
        if let Some(pair) = tiers.windows(2).find(|w| w[0].capacity >= w[1].capacity) {
            return Err(TentError::Configuration(format!(
                "tent types must be strictly ascending by capacity, found {} before {}",
                pair[0].capacity, pair[1].capacity
            )));
        }
        Ok(Inventory { tiers })
    }

    pub fn tiers(&self) -> &[TentType] {
        &self.tiers
    }

    pub fn max_capacity(&self) -> usize {
        self.tiers.last().map_or(0, |t| t.capacity as usize)
    }

    pub fn total_count(&self) -> u64 {
        self.tiers.iter().map(|t| u64::from(t.count)).sum()
    }

    pub fn total_capacity(&self) -> usize {
        self.tiers
            .iter()
            .map(|t| t.capacity as usize * t.count as usize)
            .sum()
    }

    /// Number of tents strictly larger than tier `index`.
    pub fn count_above(&self, index: usize) -> u64 {
        self.tiers[index + 1..]
            .iter()
            .map(|t| u64::from(t.count))
            .sum()
    }

    /// Fail unless every participant can get a bed.
    pub fn ensure_beds(&self, participants: usize) -> Result<(), TentError> {
        let capacity = self.total_capacity();
        if capacity < participants {
            return Err(TentError::Capacity {
                capacity,
                participants,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascending_inventory_is_accepted() {
        let inventory = Inventory::new(vec![TentType::new(4, 2), TentType::new(6, 4)]).unwrap();
        assert_eq!(inventory.max_capacity(), 6);
        assert_eq!(inventory.total_count(), 6);
        assert_eq!(inventory.total_capacity(), 32);
        assert_eq!(inventory.count_above(0), 4);
        assert_eq!(inventory.count_above(1), 0);
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        let inventory = Inventory::new(vec![
            TentType::new(1, u32::MAX),
            TentType::new(2, u32::MAX),
        ])
        .unwrap();
        assert_eq!(inventory.total_count(), 2 * u64::from(u32::MAX));
        assert_eq!(inventory.count_above(0), u64::from(u32::MAX));
    }

    #[test]
    fn unordered_inventory_is_rejected() {
        let err = Inventory::new(vec![TentType::new(6, 4), TentType::new(4, 2)]).unwrap_err();
        assert!(matches!(err, TentError::Configuration(_)));

        let err = Inventory::new(vec![TentType::new(4, 1), TentType::new(4, 2)]).unwrap_err();
        assert!(matches!(err, TentError::Configuration(_)));
    }

    #[test]
    fn zero_capacity_and_empty_inventory_are_rejected() {
        assert!(Inventory::new(vec![]).is_err());
        assert!(Inventory::new(vec![TentType::new(0, 3)]).is_err());
    }

    #[test]
    fn beds_must_cover_participants() {
        let enough = Inventory::new(vec![TentType::new(4, 2), TentType::new(6, 4)]).unwrap();
        assert!(enough.ensure_beds(30).is_ok());

        let short = Inventory::new(vec![TentType::new(4, 1), TentType::new(6, 3)]).unwrap();
        match short.ensure_beds(30) {
            Err(TentError::Capacity {
                capacity,
                participants,
            }) => {
                assert_eq!(capacity, 22);
                assert_eq!(participants, 30);
            }
            other => panic!("expected capacity error, got {other:?}"),
        }
    }
}
