use serde::{Deserialize, Serialize};

/// Direction in which a survey item is worded.
///
/// `FavorableHigh` items are positively worded: agreeing is good.
/// `FavorableLow` items are negatively worded: disagreeing is good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    #[default]
    FavorableHigh,
    FavorableLow,
}

impl Polarity {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::FavorableHigh => Self::FavorableLow,
            Self::FavorableLow => Self::FavorableHigh,
        }
    }
}

impl From<bool> for Polarity {
    fn from(favorable_high: bool) -> Self {
        if favorable_high {
            Self::FavorableHigh
        } else {
            Self::FavorableLow
        }
    }
}

/// Ordered column → polarity mapping.
///
/// Inserting a column twice keeps its first position and the latest polarity,
/// so the number of scored columns never counts duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolarityMap {
    entries: Vec<(String, Polarity)>,
}

impl PolarityMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, polarity: Polarity) {
        let column = column.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = polarity,
            None => self.entries.push((column, polarity)),
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<Polarity> {
        self.entries
            .iter()
            .find_map(|(c, p)| (c == column).then_some(*p))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Polarity)> + '_ {
        self.entries.iter().map(|(c, p)| (c.as_str(), *p))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the same columns with every polarity reversed.
    #[must_use]
    pub fn flipped(&self) -> Self {
        self.entries
            .iter()
            .map(|(c, p)| (c.clone(), p.flipped()))
            .collect()
    }
}

impl<S> FromIterator<(S, Polarity)> for PolarityMap
where
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (S, Polarity)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (column, polarity) in iter {
            map.insert(column, polarity);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_insert_keeps_position() {
        let map = PolarityMap::from_iter([
            ("a", Polarity::FavorableHigh),
            ("b", Polarity::FavorableLow),
            ("a", Polarity::FavorableLow),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(Polarity::FavorableLow));
        assert_eq!(map.get("c"), None);
    }

    #[test]
    fn test_serde_names() {
        let p: Polarity = serde_json::from_str("\"favorable_low\"").unwrap();
        assert_eq!(p, Polarity::FavorableLow);
        assert_eq!(Polarity::from(true), Polarity::FavorableHigh);
    }
}
