use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone, PartialEq)]
pub enum TableError {
    #[error("reward table has no entries")]
    Empty,
    #[error("reward weight must be positive and finite (index={index}, weight={weight})")]
    NonPositiveWeight { index: usize, weight: f64 },
    #[error("reward value must be at least 1 (index={index})")]
    ZeroValue { index: usize },
    #[error("reward weights do not sum to a finite total")]
    NonFiniteTotal,
}

/// One row of a [`RewardTable`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RewardEntry {
    pub value: u64,
    pub weight: f64,
}

impl RewardEntry {
    pub const fn new(value: u64, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// Ordered, validated list of (value, weight) pairs.
///
/// Entry order is significant: a draw walks the table front to back, so ties at a bucket edge
/// resolve to the earlier entry. Values may repeat; their weights then add up.
#[derive(Clone, Debug, PartialEq)]
pub struct RewardTable {
    entries: Vec<RewardEntry>,
    total_weight: f64,
}

impl RewardTable {
    pub fn new(entries: Vec<RewardEntry>) -> Result<Self, TableError> {
        if entries.is_empty() {
            return Err(TableError::Empty);
        }
        for (index, entry) in entries.iter().enumerate() {
            // `!(w > 0)` also rejects NaN.
            if !(entry.weight > 0.0) || !entry.weight.is_finite() {
                return Err(TableError::NonPositiveWeight {
                    index,
                    weight: entry.weight,
                });
            }
            if entry.value == 0 {
                return Err(TableError::ZeroValue { index });
            }
        }
        let total_weight: f64 = entries.iter().map(|entry| entry.weight).sum();
        if !total_weight.is_finite() {
            return Err(TableError::NonFiniteTotal);
        }
        Ok(Self {
            entries,
            total_weight,
        })
    }

    pub fn entries(&self) -> &[RewardEntry] {
        &self.entries
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Last entry; the fallback for a draw that floating-point drift pushes past every bucket.
    pub fn last(&self) -> &RewardEntry {
        // Construction guarantees at least one entry.
        &self.entries[self.entries.len() - 1]
    }

    /// Probability of drawing `value`, summed over every entry that carries it.
    pub fn probability_of(&self, value: u64) -> f64 {
        let weight: f64 = self
            .entries
            .iter()
            .filter(|entry| entry.value == value)
            .map(|entry| entry.weight)
            .sum();
        weight / self.total_weight
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
