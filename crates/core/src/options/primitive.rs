use std::fmt;

use super::intermediate::{IdCase, IdLength, IntermediateOption};
use super::spelling::{self, Boundary};
use super::Substitute;

/// A Java primitive type as a dimension option.
///
/// Pairs like `INT`/`INTEGER` share the keyword and class name and differ only
/// in which id spelling is neutral: `INT` writes `intValue`, `INTEGER` writes
/// `integerValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    Boolean,
    Byte,
    Char,
    Character,
    Short,
    Int,
    Integer,
    Long,
    Float,
    Double,
}

/// Bit-reinterpretation calls of a floating type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatingBits {
    /// raw bits -> floating value
    pub wrap: &'static str,
    /// floating value -> canonical bits
    pub unwrap: &'static str,
    /// floating value -> raw bits
    pub unwrap_raw: &'static str,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 11] = [
        PrimitiveType::Bool,
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Character,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Integer,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    /// The default `default_types` of a generator.
    pub const NUMERIC_WITH_SHORT_IDS: [PrimitiveType; 7] = [
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    /// Looks up a variant by name, ignoring case (`int`, `INTEGER`, `Bool`).
    pub fn from_name(name: &str) -> Option<PrimitiveType> {
        PrimitiveType::ALL
            .into_iter()
            .find(|p| p.variant_name().eq_ignore_ascii_case(name))
    }

    fn variant_name(self) -> &'static str {
        match self {
            PrimitiveType::Bool => "BOOL",
            PrimitiveType::Boolean => "BOOLEAN",
            PrimitiveType::Byte => "BYTE",
            PrimitiveType::Char => "CHAR",
            PrimitiveType::Character => "CHARACTER",
            PrimitiveType::Short => "SHORT",
            PrimitiveType::Int => "INT",
            PrimitiveType::Integer => "INTEGER",
            PrimitiveType::Long => "LONG",
            PrimitiveType::Float => "FLOAT",
            PrimitiveType::Double => "DOUBLE",
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Bool | PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char | PrimitiveType::Character => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int | PrimitiveType::Integer => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            PrimitiveType::Bool | PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Byte => "Byte",
            PrimitiveType::Char | PrimitiveType::Character => "Character",
            PrimitiveType::Short => "Short",
            PrimitiveType::Int | PrimitiveType::Integer => "Integer",
            PrimitiveType::Long => "Long",
            PrimitiveType::Float => "Float",
            PrimitiveType::Double => "Double",
        }
    }

    fn lower_id(self) -> &'static str {
        match self {
            PrimitiveType::Bool => "bool",
            PrimitiveType::Character => "character",
            PrimitiveType::Integer => "integer",
            other => other.keyword(),
        }
    }

    fn class_based_id(self) -> &'static str {
        match self {
            PrimitiveType::Bool | PrimitiveType::Boolean => "boolean",
            PrimitiveType::Char | PrimitiveType::Character => "character",
            PrimitiveType::Int | PrimitiveType::Integer => "integer",
            other => other.keyword(),
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Bool | PrimitiveType::Boolean)
    }

    /// The id spelling for `length`. Short and long ids fall back to the
    /// neutral one when the type has no distinct spelling of that length.
    pub fn id(self, length: IdLength) -> &'static str {
        let neutral = self.lower_id();
        let ids = [self.keyword(), neutral, self.class_based_id()];
        match length {
            IdLength::Neutral => neutral,
            IdLength::Short => {
                let shortest = ids
                    .into_iter()
                    .fold(ids[0], |a, b| if b.len() < a.len() { b } else { a });
                if shortest.len() < neutral.len() {
                    shortest
                } else {
                    neutral
                }
            }
            IdLength::Long => {
                let longest = ids
                    .into_iter()
                    .fold(ids[0], |a, b| if b.len() > a.len() { b } else { a });
                if longest.len() > neutral.len() {
                    longest
                } else {
                    neutral
                }
            }
        }
    }

    /// Literal of `value` typed as this primitive.
    pub fn format_value(self, value: &str) -> String {
        match self {
            PrimitiveType::Int | PrimitiveType::Integer => value.to_owned(),
            PrimitiveType::Long => format!("{value}L"),
            PrimitiveType::Float => format!("{value}.0f"),
            PrimitiveType::Double => format!("{value}.0"),
            other => format!("({}) {}", other.keyword(), value),
        }
    }

    pub fn min_value(self) -> String {
        match self.floating_bits() {
            Some(_) => format!("{}.NEGATIVE_INFINITY", self.class_name()),
            None => format!("{}.MIN_VALUE", self.class_name()),
        }
    }

    pub fn max_value(self) -> String {
        match self.floating_bits() {
            Some(_) => format!("{}.POSITIVE_INFINITY", self.class_name()),
            None => format!("{}.MAX_VALUE", self.class_name()),
        }
    }

    /// The integer type holding the raw bits of this type.
    pub fn bits_type(self) -> PrimitiveType {
        match self {
            PrimitiveType::Float => PrimitiveType::Int,
            PrimitiveType::Double => PrimitiveType::Long,
            other => other,
        }
    }

    /// `Some` for the types whose values can be reinterpreted as raw bits.
    pub fn floating_bits(self) -> Option<FloatingBits> {
        match self {
            PrimitiveType::Float => Some(FloatingBits {
                wrap: "Float.intBitsToFloat",
                unwrap: "Float.floatToIntBits",
                unwrap_raw: "Float.floatToRawIntBits",
            }),
            PrimitiveType::Double => Some(FloatingBits {
                wrap: "Double.longBitsToDouble",
                unwrap: "Double.doubleToLongBits",
                unwrap_raw: "Double.doubleToRawLongBits",
            }),
            _ => None,
        }
    }

    /// Offset of the earliest spelling of the type in `text`.
    pub(crate) fn first_occurrence(self, text: &str) -> Option<usize> {
        let mut found = [
            spelling::find(text, self.class_name(), Boundary::ClassName),
            spelling::find(text, self.keyword(), Boundary::Standalone),
        ]
        .into_iter()
        .flatten()
        .min();
        for length in self.distinct_lengths() {
            let id = self.id(length);
            let forms = [
                (id.to_owned(), Boundary::Lower),
                (spelling::capitalize(id), Boundary::MarkedTitle),
                (id.to_uppercase(), Boundary::Upper),
            ];
            for (word, boundary) in &forms {
                if let Some(at) = spelling::find(text, word, *boundary) {
                    found = Some(found.map_or(at, |f| f.min(at)));
                }
            }
        }
        found
    }

    fn distinct_lengths(self) -> impl Iterator<Item = IdLength> {
        let neutral = self.id(IdLength::Neutral);
        IdLength::ALL
            .into_iter()
            .filter(move |&l| l == IdLength::Neutral || self.id(l) != neutral)
    }

    fn own_intermediate_replace(self, text: &str, dim: &str) -> String {
        let inter = IntermediateOption::of(dim);
        let class = inter.class_name();
        let qualified = format!("java.lang.{}", self.class_name());
        let text = text.replace(&qualified, &class);
        let text = spelling::replace(&text, self.class_name(), Boundary::ClassName, &class);
        let mut text =
            spelling::replace(&text, self.keyword(), Boundary::Standalone, &inter.standalone());
        for length in self.distinct_lengths() {
            let id = self.id(length);
            text = spelling::replace(
                &text,
                id,
                Boundary::Lower,
                &inter.id(length, IdCase::Lower),
            );
            text = spelling::replace(
                &text,
                &spelling::capitalize(id),
                Boundary::MarkedTitle,
                &inter.id(length, IdCase::Title),
            );
            text = spelling::replace(
                &text,
                &id.to_uppercase(),
                Boundary::Upper,
                &inter.id(length, IdCase::Upper),
            );
        }
        text
    }

    fn own_final_replace(self, text: &str, dim: &str) -> String {
        let inter = IntermediateOption::of(dim);
        let mut text = text
            .replace(&inter.class_name(), self.class_name())
            .replace(&inter.standalone(), self.keyword());
        for length in IdLength::ALL {
            let id = self.id(length);
            text = text
                .replace(&inter.id(length, IdCase::Lower), id)
                .replace(&inter.id(length, IdCase::Title), &spelling::capitalize(id))
                .replace(&inter.id(length, IdCase::Upper), &id.to_uppercase());
        }
        text
    }
}

fn bits_dim(dim: &str) -> String {
    format!("{dim}.bits")
}

impl Substitute for PrimitiveType {
    fn intermediate_replace(&self, text: &str, dim: &str) -> String {
        let text = self.own_intermediate_replace(text, dim);
        match self.floating_bits() {
            Some(_) => self
                .bits_type()
                .own_intermediate_replace(&text, &bits_dim(dim)),
            None => text,
        }
    }

    fn final_replace(&self, text: &str, dim: &str) -> String {
        match self.floating_bits() {
            Some(_) => {
                let text = self.bits_type().own_final_replace(text, &bits_dim(dim));
                self.own_final_replace(&text, dim)
            }
            None => self.own_final_replace(text, dim),
        }
    }

    fn default_value(&self) -> Option<String> {
        match self {
            PrimitiveType::Bool | PrimitiveType::Boolean => Some("false".to_owned()),
            other => Some(other.format_value("0")),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&spelling::capitalize(self.lower_id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substitute(from: PrimitiveType, to: PrimitiveType, text: &str) -> String {
        let intermediate = from.intermediate_replace(text, "elem");
        to.final_replace(&intermediate, "elem")
    }

    #[test]
    fn short_and_long_ids() {
        assert_eq!(PrimitiveType::Int.id(IdLength::Long), "integer");
        assert_eq!(PrimitiveType::Int.id(IdLength::Short), "int");
        assert_eq!(PrimitiveType::Integer.id(IdLength::Short), "int");
        assert_eq!(PrimitiveType::Char.id(IdLength::Long), "character");
        assert_eq!(PrimitiveType::Bool.id(IdLength::Long), "boolean");
        assert_eq!(PrimitiveType::Boolean.id(IdLength::Short), "boolean");
        assert_eq!(PrimitiveType::Long.id(IdLength::Long), "long");
    }

    #[test]
    fn rewrites_every_surface_form() {
        let text = "Integer box(int v) { return Integer.valueOf(v); } int[] ints; \
                    IntStream getAsInt; MAX_INT_VALUE; intValue";
        assert_eq!(
            substitute(PrimitiveType::Int, PrimitiveType::Long, text),
            "Long box(long v) { return Long.valueOf(v); } long[] longs; \
             LongStream getAsLong; MAX_LONG_VALUE; longValue"
        );
    }

    #[test]
    fn leaves_longer_words_alone() {
        let text = "interest doInterrupt INTERLEAVE_CONSTANT print";
        assert_eq!(substitute(PrimitiveType::Int, PrimitiveType::Long, text), text);
    }

    #[test]
    fn long_id_maps_to_long_id() {
        assert_eq!(
            substitute(PrimitiveType::Int, PrimitiveType::Char, "integerValue intValue"),
            "characterValue charValue"
        );
    }

    #[test]
    fn qualified_class_name_is_unqualified() {
        assert_eq!(
            substitute(PrimitiveType::Int, PrimitiveType::Double, "java.lang.Integer x"),
            "Double x"
        );
        assert_eq!(
            substitute(PrimitiveType::Int, PrimitiveType::Double, "my.Integer x"),
            "my.Integer x"
        );
    }

    #[test]
    fn same_option_round_trip_is_identity() {
        let text = "int x = Integer.MAX_VALUE; long y; IntCursor INT_ZERO";
        assert_eq!(substitute(PrimitiveType::Int, PrimitiveType::Int, text), text);
    }

    #[test]
    fn floating_types_cascade_bits_dimension() {
        let inter = PrimitiveType::Float.intermediate_replace("float x; int bits;", "elem");
        assert!(!inter.contains("float"));
        assert!(!inter.contains("int"));
        assert_eq!(
            PrimitiveType::Double.final_replace(&inter, "elem"),
            "double x; long bits;"
        );
    }

    #[test]
    fn values() {
        assert_eq!(PrimitiveType::Int.format_value("1"), "1");
        assert_eq!(PrimitiveType::Long.format_value("1"), "1L");
        assert_eq!(PrimitiveType::Float.format_value("1"), "1.0f");
        assert_eq!(PrimitiveType::Double.format_value("1"), "1.0");
        assert_eq!(PrimitiveType::Byte.format_value("1"), "(byte) 1");
        assert_eq!(PrimitiveType::Char.min_value(), "Character.MIN_VALUE");
        assert_eq!(PrimitiveType::Float.max_value(), "Float.POSITIVE_INFINITY");
        assert_eq!(PrimitiveType::Boolean.default_value().as_deref(), Some("false"));
        assert_eq!(PrimitiveType::Short.default_value().as_deref(), Some("(short) 0"));
    }

    #[test]
    fn names_and_display() {
        assert_eq!(PrimitiveType::from_name("integer"), Some(PrimitiveType::Integer));
        assert_eq!(PrimitiveType::from_name("Bool"), Some(PrimitiveType::Bool));
        assert_eq!(PrimitiveType::from_name("object"), None);
        assert_eq!(PrimitiveType::Int.to_string(), "Int");
        assert_eq!(PrimitiveType::Character.to_string(), "Character");
    }

    #[test]
    fn first_occurrence_finds_earliest_spelling() {
        assert_eq!(PrimitiveType::Long.first_occurrence("IntLongMap"), Some(3));
        assert_eq!(PrimitiveType::Int.first_occurrence("IntLongMap"), Some(0));
        assert_eq!(PrimitiveType::Float.first_occurrence("IntLongMap"), None);
    }
}
