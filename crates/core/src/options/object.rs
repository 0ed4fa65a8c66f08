use std::fmt;

use super::intermediate::{IdCase, IdLength, IntermediateOption};
use super::Substitute;

/// The reference-type option. Generated code uses a generic parameter named
/// after the dimension (`K` for `key`) and `obj`/`object` id spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectStyle {
    /// Neutral ids spelled `object`, `Object`, `OBJECT`.
    Object,
    /// Neutral ids spelled `obj`, `Obj`, `OBJ`.
    Obj,
}

impl ObjectStyle {
    pub fn from_name(name: &str) -> Option<ObjectStyle> {
        if name.eq_ignore_ascii_case("object") {
            Some(ObjectStyle::Object)
        } else if name.eq_ignore_ascii_case("obj") {
            Some(ObjectStyle::Obj)
        } else {
            None
        }
    }

    fn spelling(self, case: IdCase) -> &'static str {
        match (self, case) {
            (ObjectStyle::Object, IdCase::Lower) => "object",
            (ObjectStyle::Object, IdCase::Title) => "Object",
            (ObjectStyle::Object, IdCase::Upper) => "OBJECT",
            (ObjectStyle::Obj, IdCase::Lower) => "obj",
            (ObjectStyle::Obj, IdCase::Title) => "Obj",
            (ObjectStyle::Obj, IdCase::Upper) => "OBJ",
        }
    }

    fn style_for(self, length: IdLength) -> ObjectStyle {
        match length {
            IdLength::Neutral => self,
            IdLength::Short => ObjectStyle::Obj,
            IdLength::Long => ObjectStyle::Object,
        }
    }
}

/// `key` -> `K`.
fn generic_param_name(dim: &str) -> String {
    dim.chars().take(1).flat_map(char::to_uppercase).collect()
}

impl Substitute for ObjectStyle {
    fn intermediate_replace(&self, text: &str, _dim: &str) -> String {
        log::info!("Object type can't be template source");
        text.to_owned()
    }

    fn final_replace(&self, text: &str, dim: &str) -> String {
        let inter = IntermediateOption::of(dim);
        let generic = generic_param_name(dim);
        let mut text = text
            .replace(&inter.class_name(), &generic)
            .replace(&inter.standalone(), &generic);
        for length in IdLength::ALL {
            let style = self.style_for(length);
            for case in IdCase::ALL {
                text = text.replace(&inter.id(length, case), style.spelling(case));
            }
        }
        text
    }

    fn default_value(&self) -> Option<String> {
        Some("null".to_owned())
    }
}

impl fmt::Display for ObjectStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Object")
    }
}
