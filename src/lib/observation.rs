use crate::error::{Result, SamplingError};
use anyhow::bail;
use std::str::FromStr;

/// Cumulative audit evidence: `misstatements` erroneous items found in a
/// sample of `sample_size` items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SampleObservation {
    sample_size: u64,
    misstatements: u64,
}

impl SampleObservation {
    pub fn new(sample_size: u64, misstatements: u64) -> Result<Self> {
        if misstatements > sample_size {
            return Err(SamplingError::InvalidObservation {
                sample_size,
                misstatements,
            });
        }
        Ok(Self {
            sample_size,
            misstatements,
        })
    }

    /// The empty sample, n = 0 and k = 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Counts a sequence of per-item outcomes, `true` marking a misstatement.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        outcomes
            .into_iter()
            .fold(Self::empty(), |obs, is_misstatement| obs.record(is_misstatement))
    }

    /// Evidence after auditing one more item.
    pub fn record(&self, is_misstatement: bool) -> Self {
        Self {
            sample_size: self.sample_size + 1,
            misstatements: self.misstatements + u64::from(is_misstatement),
        }
    }

    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }

    pub fn misstatements(&self) -> u64 {
        self.misstatements
    }

    /// Items audited without a misstatement, n - k.
    pub fn correct_items(&self) -> u64 {
        self.sample_size - self.misstatements
    }

    pub fn is_empty(&self) -> bool {
        self.sample_size == 0
    }
}

/// Per-item audit outcomes, parsed from strings like `"0000000001"` or
/// `".........x"`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutcomeSequence(pub Vec<bool>);

impl OutcomeSequence {
    /// `sample_size` items with the `misstatements` errors found last, the
    /// order the learning scenes reveal them in.
    pub fn misstatements_last(sample_size: u64, misstatements: u64) -> Result<Self> {
        let obs = SampleObservation::new(sample_size, misstatements)?;
        let outcomes = std::iter::repeat_n(false, obs.correct_items() as usize)
            .chain(std::iter::repeat_n(true, misstatements as usize))
            .collect();
        Ok(Self(outcomes))
    }

    pub fn observation(&self) -> SampleObservation {
        SampleObservation::from_outcomes(self.0.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for OutcomeSequence {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut outcomes = Vec::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0' | '.' => outcomes.push(false),
                '1' | 'x' | 'X' => outcomes.push(true),
                ' ' | ',' | '_' => continue,
                _ => bail!("Invalid outcome character: {}, in sequence: {}", c, s),
            }
        }
        Ok(Self(outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let obs = SampleObservation::new(92, 1).unwrap();
        assert_eq!(obs.sample_size(), 92);
        assert_eq!(obs.misstatements(), 1);
        assert_eq!(obs.correct_items(), 91);
        assert!(SampleObservation::new(0, 0).unwrap().is_empty());
        assert!(SampleObservation::new(5, 5).is_ok());
        assert_eq!(
            SampleObservation::new(5, 6),
            Err(SamplingError::InvalidObservation {
                sample_size: 5,
                misstatements: 6
            })
        );
    }

    #[test]
    fn test_record() {
        let obs = SampleObservation::empty();
        let obs = obs.record(false);
        assert_eq!((obs.sample_size(), obs.misstatements()), (1, 0));
        let next = obs.record(true);
        assert_eq!((next.sample_size(), next.misstatements()), (2, 1));
        // Recording returns a new value
        assert_eq!((obs.sample_size(), obs.misstatements()), (1, 0));
    }

    #[test]
    fn test_from_outcomes() {
        let obs = SampleObservation::from_outcomes([false, true, false, true]);
        assert_eq!(obs, SampleObservation::new(4, 2).unwrap());
        assert_eq!(SampleObservation::from_outcomes(std::iter::empty()), SampleObservation::empty());
    }

    #[test]
    fn test_misstatements_last() {
        let seq = OutcomeSequence::misstatements_last(10, 1).unwrap();
        assert_eq!(seq.len(), 10);
        assert!(seq.0[..9].iter().all(|&o| !o));
        assert!(seq.0[9]);
        assert_eq!(seq.observation(), SampleObservation::new(10, 1).unwrap());
        assert!(OutcomeSequence::misstatements_last(3, 4).is_err());
    }

    #[test]
    fn test_parse_outcomes() {
        let seq: OutcomeSequence = "0000000001".parse().unwrap();
        assert_eq!(seq.observation(), SampleObservation::new(10, 1).unwrap());
        let seq: OutcomeSequence = "...x_..X".parse().unwrap();
        assert_eq!(seq.observation(), SampleObservation::new(7, 2).unwrap());
        let seq: OutcomeSequence = "".parse().unwrap();
        assert!(seq.is_empty());
        assert!("0012".parse::<OutcomeSequence>().is_err());
    }
}
