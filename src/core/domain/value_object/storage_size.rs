use crate::core::domain::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Gigabytes per terabyte, as the IDC storage API counts them.
pub const GB_PER_TB: u64 = 1024;

/// Unit suffix of a storage size string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Gb,
    Tb,
}

/// A storage size as exchanged with the API: `"<N>TB"` on create, `"<M>GB"` on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageSize {
    amount: u64,
    unit: SizeUnit,
}

impl StorageSize {
    #[must_use]
    pub fn from_tb(amount: u64) -> Self {
        Self {
            amount,
            unit: SizeUnit::Tb,
        }
    }

    #[must_use]
    pub fn from_gb(amount: u64) -> Self {
        Self {
            amount,
            unit: SizeUnit::Gb,
        }
    }

    #[must_use]
    pub fn amount(&self) -> u64 {
        self.amount
    }

    #[must_use]
    pub fn unit(&self) -> SizeUnit {
        self.unit
    }

    #[must_use]
    pub fn in_gb(&self) -> u64 {
        match self.unit {
            SizeUnit::Gb => self.amount,
            SizeUnit::Tb => self.amount.saturating_mul(GB_PER_TB),
        }
    }

    /// Whole terabytes, rounding partial terabytes up.
    #[must_use]
    pub fn in_tb(&self) -> u64 {
        match self.unit {
            SizeUnit::Tb => self.amount,
            SizeUnit::Gb => self.amount.div_ceil(GB_PER_TB),
        }
    }
}

impl fmt::Display for StorageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            SizeUnit::Gb => write!(f, "{}GB", self.amount),
            SizeUnit::Tb => write!(f, "{}TB", self.amount),
        }
    }
}

impl FromStr for StorageSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .len()
            .checked_sub(2)
            .filter(|&at| at > 0)
            .and_then(|at| Some((trimmed.get(..at)?, trimmed.get(at..)?)));
        let Some((digits, suffix)) = split else {
            return Err(ValidationError::Format(format!(
                "Invalid storage size '{}': expected <N>GB or <N>TB",
                s
            )));
        };
        let unit = if suffix.eq_ignore_ascii_case("GB") {
            SizeUnit::Gb
        } else if suffix.eq_ignore_ascii_case("TB") {
            SizeUnit::Tb
        } else {
            return Err(ValidationError::Format(format!(
                "Invalid storage size '{}': unit must be GB or TB",
                s
            )));
        };
        let amount = digits.trim().parse::<u64>().map_err(|_| {
            ValidationError::Format(format!(
                "Invalid storage size '{}': amount must be a whole number",
                s
            ))
        })?;
        if amount == 0 {
            return Err(ValidationError::ConstraintViolation(
                "Storage size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { amount, unit })
    }
}
