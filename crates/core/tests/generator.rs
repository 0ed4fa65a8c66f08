//! Driver-level tests: whole templates through `Generator::generate_all`.

use std::path::{Path, PathBuf};

use primspec_core::{Context, DimOption, GenError, Generator, InMemorySource, PrimitiveType};

fn paths(report: &primspec_core::GenerationReport) -> Vec<PathBuf> {
    report.files.iter().map(|f| f.path.clone()).collect()
}

fn text_of<'a>(report: &'a primspec_core::GenerationReport, path: &str) -> &'a str {
    report
        .files
        .iter()
        .find(|f| f.path == Path::new(path))
        .map(|f| f.text.as_str())
        .unwrap_or_else(|| panic!("{path} not generated"))
}

const INT_SUPPLIER: &str = "public interface IntSupplier {\n    int getAsInt();\n}\n";

#[test]
fn file_name_dimension_spans_default_types() {
    let generator = Generator::builder().build().unwrap();
    let source = InMemorySource::new().with_template("fn/IntSupplier.java", INT_SUPPLIER);
    let report = generator.generate_all(&source).unwrap();
    assert!(report.is_success());
    assert_eq!(
        paths(&report),
        [
            "fn/IntSupplier.java",
            "fn/ByteSupplier.java",
            "fn/CharSupplier.java",
            "fn/ShortSupplier.java",
            "fn/LongSupplier.java",
            "fn/FloatSupplier.java",
            "fn/DoubleSupplier.java",
        ]
        .map(PathBuf::from)
    );
    assert_eq!(
        text_of(&report, "fn/DoubleSupplier.java"),
        "public interface DoubleSupplier {\n    double getAsDouble();\n}\n"
    );
}

#[test]
fn never_drops_combinations() {
    let generator = Generator::builder().never("float|double").build().unwrap();
    let source = InMemorySource::new().with_template("IntSupplier.java", INT_SUPPLIER);
    let report = generator.generate_all(&source).unwrap();
    assert_eq!(report.files.len(), 5);
    assert!(!paths(&report).contains(&PathBuf::from("FloatSupplier.java")));
}

#[test]
fn two_dimensions_multiply() {
    let generator = Generator::builder()
        .default_types("int|long|char")
        .build()
        .unwrap();
    let source = InMemorySource::new().with_template(
        "IntCharMap.java",
        "class IntCharMap { int key; char value; }\n",
    );
    let report = generator.generate_all(&source).unwrap();
    assert_eq!(report.files.len(), 9);
    assert_eq!(
        text_of(&report, "LongIntMap.java"),
        "class LongIntMap { long key; int value; }\n"
    );
}

#[test]
fn include_and_exclude_conditions() {
    let generator = Generator::builder()
        .default_types("int|long|char")
        .include("int|long t")
        .exclude_cli("t=long,u=long")
        .build()
        .unwrap();
    let source = InMemorySource::new().with_template("IntCharMap.java", "IntCharMap\n");
    let report = generator.generate_all(&source).unwrap();
    // t in {int, long} times u in {char, int, long}, minus LongLong
    assert_eq!(report.files.len(), 5);
    assert!(!paths(&report).contains(&PathBuf::from("LongLongMap.java")));
}

#[test]
fn with_header_replaces_inferred_dimensions() {
    let generator = Generator::builder().build().unwrap();
    let template = "/* with int|long key char|int value */\n\
                    class IntCharMap { int k; char v; }\n";
    let source = InMemorySource::new().with_template("IntCharMap.java", template);
    let report = generator.generate_all(&source).unwrap();
    assert_eq!(
        paths(&report),
        ["IntCharMap.java", "LongCharMap.java", "IntIntMap.java", "LongIntMap.java"]
            .map(PathBuf::from)
    );
    assert_eq!(
        text_of(&report, "LongIntMap.java"),
        "class LongIntMap { long k; int v; }\n"
    );
}

#[test]
fn header_options_must_occur_in_file_name() {
    let generator = Generator::builder().build().unwrap();
    let source =
        InMemorySource::new().with_template("IntList.java", "/* with long elem */\nclass X {}\n");
    let report = generator.generate_all(&source).unwrap();
    assert!(!report.is_success());
    let failure = &report.failures[0];
    assert_eq!(failure.template, PathBuf::from("IntList.java"));
    match &failure.error {
        GenError::Malformed(m) => {
            assert_eq!(m.file.as_deref(), Some("IntList.java"));
            assert!(m.message.contains("not found in the file name"));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn file_condition_filters_combinations() {
    let generator = Generator::builder().build().unwrap();
    let template = "/* if !(float|double t) */\nclass IntBits {}\n";
    let source = InMemorySource::new().with_template("IntBits.java", template);
    let report = generator.generate_all(&source).unwrap();
    assert_eq!(report.files.len(), 5);
    assert_eq!(text_of(&report, "LongBits.java"), "class LongBits {}\n");
}

#[test]
fn class_name_definition_renames_output() {
    let generator = Generator::builder().default_types("int|long").build().unwrap();
    let template = "/* define ClassName */IntBagImpl/* enddefine */\
                    public class /* ClassName */ implements IntBag {}\n";
    let source = InMemorySource::new().with_template("IntBag.java", template);
    let report = generator.generate_all(&source).unwrap();
    assert_eq!(
        paths(&report),
        ["IntBagImpl.java", "LongBagImpl.java"].map(PathBuf::from)
    );
    assert_eq!(
        text_of(&report, "LongBagImpl.java"),
        "public class LongBagImpl implements LongBag {}\n"
    );
}

#[test]
fn failing_template_does_not_stop_others() {
    let generator = Generator::builder().default_types("int").build().unwrap();
    let source = InMemorySource::new()
        .with_template("Broken.java", "/* if int t */ never closed")
        .with_template("IntBox.java", "class IntBox {}\n");
    let report = generator.generate_all(&source).unwrap();
    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].template, PathBuf::from("Broken.java"));
    assert_eq!(paths(&report), [PathBuf::from("IntBox.java")]);
}

#[test]
fn class_name_does_not_leak_between_templates() {
    let generator = Generator::builder().default_types("int|long").build().unwrap();
    let source = InMemorySource::new()
        .with_template(
            "IntBag.java",
            "/* define ClassName */IntBagImpl/* enddefine */class /* ClassName */ {}\n",
        )
        .with_template("IntList.java", "class IntList {}\n");
    let report = generator.generate_all(&source).unwrap();
    assert_eq!(
        paths(&report),
        ["IntBagImpl.java", "LongBagImpl.java", "IntList.java", "LongList.java"]
            .map(PathBuf::from)
    );
}

#[test]
fn class_name_follows_blocks() {
    let generator = Generator::builder().default_types("int|long").build().unwrap();
    let template = "/* define ClassName */\
                    /* if long t */LongSpecial/* elif int t */IntThing/* endif */\
                    /* enddefine */class /* ClassName */ {}\n";
    let source = InMemorySource::new().with_template("IntThing.java", template);
    let report = generator.generate_all(&source).unwrap();
    assert_eq!(
        paths(&report),
        ["IntThing.java", "LongSpecial.java"].map(PathBuf::from)
    );
}

fn widen(p: PrimitiveType) -> PrimitiveType {
    match p {
        PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Char => PrimitiveType::Int,
        PrimitiveType::Float => PrimitiveType::Double,
        other => other,
    }
}

#[test]
fn registered_modifier_maps_its_keyword() {
    let generator = Generator::builder()
        .default_types("int|byte|float")
        .modifier("wider", widen, |_: &str| true)
        .build()
        .unwrap();
    let source = InMemorySource::new().with_template(
        "IntSum.java",
        "class IntSum { /* wider t */int total; /* bits t */int raw; int x; }\n",
    );
    let report = generator.generate_all(&source).unwrap();
    assert!(report.is_success());
    assert_eq!(
        text_of(&report, "ByteSum.java"),
        "class ByteSum { int total; byte raw; byte x; }\n"
    );
    assert_eq!(
        text_of(&report, "FloatSum.java"),
        "class FloatSum { double total; int raw; float x; }\n"
    );
}

#[test]
fn bits_keyword_cannot_be_registered_again() {
    let result = Generator::builder()
        .modifier("bits", widen, |_: &str| true)
        .build();
    assert!(matches!(result, Err(GenError::Config(_))));
}

fn single(dim: &str, option: &str) -> Context {
    Context::builder().put(dim, DimOption::parse(option)).build()
}

#[test]
fn generated_text_is_a_fixed_point() {
    let template = "class IntBox {\n\
                    /* bits t */int raw;\n\
                    int max = Integer.MAX_VALUE;\n\
                    long widened = (int) 1;\n\
                    // /*a*/ {@code int} value\n\
                    int[] ints; double interest;\n\
                    /* if int t */int only;\n\
                    /* elif long t */long only;\n\
                    /* endif */\n\
                    }\n";
    let generator = Generator::builder().build().unwrap();
    let source = single("t", "int");
    for option in ["int", "float", "double", "long", "char", "byte", "boolean", "obj"] {
        let target = single("t", option);
        let once = generator.generate(&source, &target, template).unwrap().text;
        let twice = generator.generate(&target, &target, &once).unwrap().text;
        assert_eq!(twice, once, "second pass changed the {option} output");
    }
}
