use std::collections::{BTreeMap, HashMap};

/// Static population data: identifier to home country code.
///
/// Used for per-country `total` counts and as the fallback when the live
/// feed reports an identifier without a country. The engine replaces the
/// whole table on refresh (copy-on-write) so an animation tick can never
/// observe a half-updated one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopulationTable {
    by_identifier: HashMap<String, String>,
    totals: BTreeMap<String, u64>,
}

impl PopulationTable {
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut by_identifier = HashMap::new();
        let mut totals = BTreeMap::new();
        for (identifier, code) in pairs {
            let code = code.into();
            if by_identifier
                .insert(identifier.into(), code.clone())
                .is_none()
            {
                *totals.entry(code).or_insert(0) += 1;
            }
        }
        Self {
            by_identifier,
            totals,
        }
    }

    pub fn len(&self) -> usize {
        self.by_identifier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identifier.is_empty()
    }

    /// Total known population across all countries.
    pub fn total_population(&self) -> u64 {
        self.by_identifier.len() as u64
    }

    pub fn total_for(&self, code: &str) -> u64 {
        self.totals.get(code).copied().unwrap_or(0)
    }

    /// Last-known home country for an identifier.
    pub fn home_code(&self, identifier: &str) -> Option<&str> {
        self.by_identifier.get(identifier).map(String::as_str)
    }

    /// Per-code totals in stable (sorted) order.
    pub fn code_totals(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.totals.iter().map(|(code, total)| (code.as_str(), *total))
    }
}

#[cfg(test)]
mod tests {
    use super::PopulationTable;
    use pretty_assertions::assert_eq;

    #[test]
    fn totals_count_identifiers_per_code() {
        let table = PopulationTable::from_pairs([
            ("u1", "TL"),
            ("u2", "TL"),
            ("u3", "XY"),
        ]);
        assert_eq!(table.total_population(), 3);
        assert_eq!(table.total_for("TL"), 2);
        assert_eq!(table.total_for("XY"), 1);
        assert_eq!(table.total_for("ZZ"), 0);
        assert_eq!(table.home_code("u2"), Some("TL"));
        assert_eq!(table.home_code("nobody"), None);
    }

    #[test]
    fn duplicate_identifiers_keep_first_entry() {
        let table = PopulationTable::from_pairs([("u1", "TL"), ("u1", "XY")]);
        assert_eq!(table.total_population(), 1);
        assert_eq!(table.total_for("TL"), 1);
        assert_eq!(table.total_for("XY"), 0);
    }

    #[test]
    fn code_totals_are_sorted() {
        let table = PopulationTable::from_pairs([("a", "ZZ"), ("b", "AA"), ("c", "MM")]);
        let codes: Vec<&str> = table.code_totals().map(|(code, _)| code).collect();
        assert_eq!(codes, vec!["AA", "MM", "ZZ"]);
    }
}
