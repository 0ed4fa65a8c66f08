use once_cell::sync::Lazy;

use super::{CONST_PRIORITY, JAVA_ID_OR_CONST};
use crate::directive::{self, CheckingPattern};
use crate::error::GenError;
use crate::options::{DimOption, Substitute};
use crate::pipeline::{Downstream, Pass, PassState, Processor, Step};

const CONST_PREFIX: &str = r"(?i)/[*/]\s*const\s+(?P<dim>[a-zA-Z]+)";

static CONST_P: Lazy<CheckingPattern> = Lazy::new(|| {
    CheckingPattern::new(
        "const",
        CONST_PREFIX,
        &format!(
            r"{CONST_PREFIX}\s+(?P<value>-?\d+|min|max|default)\s*[*/]/(?:[^/]*?/[*/]\s*endconst\s*[*/]/|\s*{JAVA_ID_OR_CONST})"
        ),
    )
    .expect("valid const pattern")
});

/// `const DIM VALUE`: replaces the following literal with `VALUE` typed as
/// the target option of `DIM`.
pub struct ConstProcessor;

impl Processor for ConstProcessor {
    fn name(&self) -> &'static str {
        "const"
    }

    // after substitution, which would otherwise rewrite the `char` of `(char) 0`
    fn priority(&self) -> i32 {
        CONST_PRIORITY
    }

    fn process(
        &self,
        text: &str,
        pass: &Pass<'_>,
        _rest: Downstream<'_>,
        _state: &mut PassState,
    ) -> Result<Step, GenError> {
        let out = CONST_P.replace_each(text, |caps| {
            let dim = directive::group(caps, "dim")?;
            let value = directive::group(caps, "value")?;
            let fail = |message: String| GenError::malformed(text, directive::start(caps), message);
            let option = pass.target.get(dim).ok_or_else(|| {
                fail(format!(
                    "Nonexistent dimension: {dim}, available dims: {}",
                    pass.target
                ))
            })?;
            if let DimOption::Simple(_) = option {
                return Err(fail(format!(
                    "Constant values are not supported for simple options, {dim} option: {option}"
                )));
            }
            if value.eq_ignore_ascii_case("default") {
                return option.default_value().ok_or_else(|| {
                    fail(format!("{dim} option {option} has no default value"))
                });
            }
            let numeric = option.as_primitive().filter(|p| p.is_numeric()).ok_or_else(|| {
                fail(format!(
                    "Constant values other than 'default' are supported only for \
                     primitive numeric types, value: {value}, {dim} option: {option}"
                ))
            })?;
            Ok(if value.eq_ignore_ascii_case("min") {
                numeric.min_value()
            } else if value.eq_ignore_ascii_case("max") {
                numeric.max_value()
            } else {
                numeric.format_value(value)
            })
        })?;
        Ok(Step::Continue(out))
    }
}
