//! Per-shader identifier disambiguation

use hashbrown::HashSet;

/// Code names already handed out within one shader
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    assigned: HashSet<String>,
}

impl NameRegistry {
    /// Claim `raw` if it is free, otherwise the first free `raw_2`, `raw_3`, ...
    pub fn assign(&mut self, raw: &str) -> String {
        if self.assigned.insert(raw.to_string()) {
            return raw.to_string();
        }

        let mut suffix = 2u32;
        loop {
            let candidate = format!("{}_{}", raw, suffix);
            if self.assigned.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assigned.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_names() {
        let mut names = NameRegistry::default();
        let assigned: Vec<_> = ["A", "B", "A", "A"]
            .iter()
            .map(|raw| names.assign(raw))
            .collect();
        assert_eq!(assigned, ["A", "B", "A_2", "A_3"]);
    }

    #[test]
    fn test_suffix_skips_taken_names() {
        let mut names = NameRegistry::default();
        assert_eq!(names.assign("A_2"), "A_2");
        assert_eq!(names.assign("A"), "A");
        assert_eq!(names.assign("A"), "A_3");
        assert!(names.contains("A_3"));
        assert!(!names.contains("A_4"));
    }
}
