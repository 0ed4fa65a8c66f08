//! Dimension-scoped placeholders used as the pivot of substitution.
//!
//! A placeholder contains no letters, so no option spelling can ever match
//! inside one, and it embeds the full dimension name, so two dimensions can
//! never share a placeholder. Every placeholder starts and ends with `#`.

/// Which id spelling of an option a placeholder stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdLength {
    Neutral,
    Short,
    Long,
}

/// Which casing of an id a placeholder stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdCase {
    Lower,
    Title,
    Upper,
}

impl IdLength {
    pub const ALL: [IdLength; 3] = [IdLength::Neutral, IdLength::Short, IdLength::Long];

    fn code(self) -> u32 {
        match self {
            IdLength::Neutral => 0,
            IdLength::Short => 1,
            IdLength::Long => 2,
        }
    }
}

impl IdCase {
    pub const ALL: [IdCase; 3] = [IdCase::Lower, IdCase::Title, IdCase::Upper];

    fn code(self) -> u32 {
        match self {
            IdCase::Lower => 0,
            IdCase::Title => 1,
            IdCase::Upper => 2,
        }
    }
}

/// The placeholder family of one dimension name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateOption {
    tag: String,
}

impl IntermediateOption {
    pub fn of(dim: &str) -> Self {
        let tag = dim
            .chars()
            .map(|c| (c as u32).to_string())
            .collect::<Vec<_>>()
            .join(".");
        IntermediateOption { tag }
    }

    fn placeholder(&self, code: u32) -> String {
        format!("#{}:{}#", self.tag, code)
    }

    /// Stands for the class name form, e.g. `Integer`.
    pub fn class_name(&self) -> String {
        self.placeholder(0)
    }

    /// Stands for the standalone keyword form, e.g. `int`.
    pub fn standalone(&self) -> String {
        self.placeholder(1)
    }

    pub fn id(&self, length: IdLength, case: IdCase) -> String {
        self.placeholder(2 + length.code() * 3 + case.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_contain_no_letters() {
        let inter = IntermediateOption::of("elem");
        let mut all = vec![inter.class_name(), inter.standalone()];
        for length in IdLength::ALL {
            for case in IdCase::ALL {
                all.push(inter.id(length, case));
            }
        }
        for p in &all {
            assert!(!p.chars().any(|c| c.is_alphabetic()), "{p}");
            assert!(p.starts_with('#') && p.ends_with('#'));
        }
        let mut unique = all.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn dimensions_do_not_share_placeholders() {
        let a = IntermediateOption::of("key");
        let b = IntermediateOption::of("key.bits");
        assert_ne!(a.standalone(), b.standalone());
        assert!(!b.standalone().contains(&a.standalone()));
    }
}
