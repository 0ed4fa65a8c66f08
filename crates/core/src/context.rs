use std::fmt;

use crate::options::DimOption;

/// An ordered, immutable binding of dimension names to options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    entries: Vec<(String, DimOption)>,
}

/// Collects entries for a [`Context`]. Putting a dimension twice keeps its
/// first position and the last option.
#[derive(Debug, Default)]
pub struct ContextBuilder {
    entries: Vec<(String, DimOption)>,
}

impl ContextBuilder {
    pub fn put(mut self, dim: impl Into<String>, option: DimOption) -> Self {
        self.insert(dim.into(), option);
        self
    }

    fn insert(&mut self, dim: String, option: DimOption) {
        match self.entries.iter_mut().find(|(d, _)| *d == dim) {
            Some(entry) => entry.1 = option,
            None => self.entries.push((dim, option)),
        }
    }

    pub fn build(self) -> Context {
        Context {
            entries: self.entries,
        }
    }
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    pub fn empty() -> Self {
        Context::default()
    }

    /// A new context with `other`'s entries overriding this one's.
    pub fn join(&self, other: &Context) -> Context {
        let mut builder = ContextBuilder {
            entries: self.entries.clone(),
        };
        for (dim, option) in &other.entries {
            builder.insert(dim.clone(), option.clone());
        }
        builder.build()
    }

    pub fn get(&self, dim: &str) -> Option<&DimOption> {
        self.entries
            .iter()
            .find(|(d, _)| d == dim)
            .map(|(_, option)| option)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DimOption)> {
        self.entries.iter().map(|(d, o)| (d.as_str(), o))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (dim, option)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dim}={option}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(name: &str) -> DimOption {
        DimOption::parse(name)
    }

    #[test]
    fn join_overrides_in_place() {
        let base = Context::builder()
            .put("key", opt("int"))
            .put("value", opt("long"))
            .build();
        let extra = Context::builder()
            .put("value", opt("double"))
            .put("mode", opt("Assert"))
            .build();
        let joined = base.join(&extra);
        assert_eq!(joined.to_string(), "{key=Int, value=Double, mode=Assert}");
        assert_eq!(base.get("value"), Some(&opt("long")));
    }

    #[test]
    fn builder_keeps_first_position() {
        let ctx = Context::builder()
            .put("a", opt("int"))
            .put("b", opt("char"))
            .put("a", opt("byte"))
            .build();
        let dims: Vec<_> = ctx.iter().map(|(d, _)| d).collect();
        assert_eq!(dims, ["a", "b"]);
        assert_eq!(ctx.get("a"), Some(&opt("byte")));
        assert_eq!(ctx.get("c"), None);
    }

    #[test]
    fn empty_display() {
        assert_eq!(Context::empty().to_string(), "{}");
        assert!(Context::empty().is_empty());
    }
}
