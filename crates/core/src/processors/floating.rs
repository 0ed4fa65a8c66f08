use once_cell::sync::Lazy;

use super::FLOATING_PRIORITY;
use crate::directive::{self, CheckingPattern};
use crate::error::GenError;
use crate::pipeline::{Downstream, Pass, PassState, Processor, Step};

static WRAPPING_P: Lazy<CheckingPattern> = Lazy::new(|| {
    CheckingPattern::new(
        "wrap",
        r"(?i)/[*/]\s*(?:wrap|unwrap|unwrapRaw)\b",
        r"(?i)/[*/]\s*(?P<op>wrap|unwrap|unwrapRaw)\s+(?P<dim>\w+)\s*[*/]/(?:(?P<closed>[^/]+)/[*/][*/]/|(?P<open>[^\s{};/*]+))",
    )
    .expect("valid wrap pattern")
});

/// `wrap`/`unwrap`/`unwrapRaw DIM EXPR`: converts `EXPR` between a floating
/// value and its raw bits when `DIM` is a floating type in the target
/// context, otherwise leaves `EXPR` as is.
pub struct FloatingWrappingProcessor;

impl Processor for FloatingWrappingProcessor {
    fn name(&self) -> &'static str {
        "floating"
    }

    fn priority(&self) -> i32 {
        FLOATING_PRIORITY
    }

    fn process(
        &self,
        text: &str,
        pass: &Pass<'_>,
        _rest: Downstream<'_>,
        _state: &mut PassState,
    ) -> Result<Step, GenError> {
        let out = WRAPPING_P.replace_each(text, |caps| {
            let dim = directive::group(caps, "dim")?;
            let body = caps
                .name("closed")
                .or_else(|| caps.name("open"))
                .map(|m| m.as_str())
                .ok_or_else(|| GenError::internal("wrap directive without a body"))?;
            let option = pass.target.get(dim).ok_or_else(|| {
                GenError::malformed(
                    text,
                    directive::start(caps),
                    format!("Nonexistent dimension: {dim}, available dims: {}", pass.target),
                )
            })?;
            let Some(bits) = option.floating_bits() else {
                return Ok(body.to_owned());
            };
            let op = directive::group(caps, "op")?.to_ascii_lowercase();
            let call = match op.as_str() {
                "wrap" => bits.wrap,
                "unwrap" => bits.unwrap,
                _ => bits.unwrap_raw,
            };
            Ok(format!("{call}({body})"))
        })?;
        Ok(Step::Continue(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::filter::ContextFilter;
    use crate::options::DimOption;
    use crate::pipeline::Pipeline;

    fn run(text: &str, elem: &str) -> Result<String, GenError> {
        let pipeline = Pipeline::from_stages(vec![Box::new(FloatingWrappingProcessor)]);
        let ctx = Context::builder().put("elem", DimOption::parse(elem)).build();
        let filter = ContextFilter::default();
        let pass = Pass {
            source: &ctx,
            target: &ctx,
            filter: &filter,
        };
        pipeline.run(text, &pass, &mut PassState::default())
    }

    #[test]
    fn unwrap_float() {
        assert_eq!(
            run("return /* unwrap elem */v;", "float").unwrap(),
            "return Float.floatToIntBits(v);"
        );
    }

    #[test]
    fn non_floating_target_passes_body_through() {
        assert_eq!(run("return /* unwrap elem */v;", "long").unwrap(), "return v;");
        assert_eq!(run("/* wrap elem */bits/**/", "int").unwrap(), "bits");
    }

    #[test]
    fn double_operations() {
        assert_eq!(
            run("/* wrap elem */a[i]/**/ + /* unwrapRaw elem */x", "double").unwrap(),
            "Double.longBitsToDouble(a[i]) + Double.doubleToRawLongBits(x)"
        );
    }

    #[test]
    fn open_body_stops_at_delimiters() {
        assert_eq!(
            run("x = /* unwrapRaw elem */key; {/* wrap elem */y}", "float").unwrap(),
            "x = Float.floatToRawIntBits(key); {Float.intBitsToFloat(y)}"
        );
    }

    #[test]
    fn unknown_dimension_is_malformed() {
        let err = run("/* wrap key */v", "float").unwrap_err();
        assert!(err.to_string().contains("Nonexistent dimension: key"));
    }

    #[test]
    fn misspelled_directive_is_malformed() {
        assert!(matches!(
            run("/* unwrap */v", "float"),
            Err(GenError::Malformed(_))
        ));
    }
}
