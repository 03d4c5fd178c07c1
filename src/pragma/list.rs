use super::Pragma;
use regex::Regex;

/// Append-only, ordered collection of pragmas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PragmaList {
    pragmas: Vec<Pragma>,
}

impl PragmaList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pragma: Pragma) {
        self.pragmas.push(pragma);
    }

    /// A new list holding the pragmas whose text matches `pattern`, in order
    pub fn find(&self, pattern: &Regex) -> PragmaList {
        PragmaList {
            pragmas: self
                .pragmas
                .iter()
                .filter(|pragma| pattern.is_match(pragma.text()))
                .cloned()
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Pragma> {
        self.pragmas.get(index)
    }

    pub fn first(&self) -> Option<&Pragma> {
        self.pragmas.first()
    }

    pub fn len(&self) -> usize {
        self.pragmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pragmas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pragma> {
        self.pragmas.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(texts: &[&str]) -> PragmaList {
        let mut pragmas = PragmaList::new();
        for text in texts {
            pragmas.add(Pragma::from_text(text));
        }
        pragmas
    }

    #[test]
    fn test_find_filters_in_order() {
        let pragmas = list(&["use strict", "use asm", "use strict"]);
        let strict = pragmas.find(&Regex::new("^use strict$").unwrap());

        assert_eq!(strict.len(), 2);
        assert_eq!(strict.first().map(Pragma::text), Some("use strict"));
        assert_eq!(pragmas.len(), 3);
    }

    #[test]
    fn test_find_without_match_is_empty() {
        let pragmas = list(&["use asm"]);
        let found = pragmas.find(&Regex::new("^use strict$").unwrap());
        assert!(found.is_empty());
        assert!(found.get(0).is_none());
    }

    #[test]
    fn test_pattern_is_not_anchored_by_default() {
        let pragmas = list(&["please use strict mode"]);
        assert_eq!(pragmas.find(&Regex::new("use strict").unwrap()).len(), 1);
    }
}
