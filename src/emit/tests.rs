use pretty_assertions::assert_eq;

use crate::config::TransformOptions;
use crate::directive::DirectiveKind;
use crate::parser::Parser;
use crate::span::Span;

use super::Emitter;

fn options() -> TransformOptions {
    TransformOptions::new("@weft/template")
}

fn emit(source: &str, options: &TransformOptions) -> super::Emission {
    let body = Parser::new(source).parse().expect("template parses");
    Emitter::new(options).emit(&body)
}

/// The statements between the wrapper boilerplate and the trailing receiver
/// marker, dedented by one statement level.
fn body_text(source: &str, options: &TransformOptions) -> String {
    let emission = emit(source, options);
    assert_eq!(
        emission.errors,
        vec![],
        "unexpected errors for {source:?}"
    );
    let lines: Vec<&str> = emission.code.lines().collect();
    lines[3..lines.len() - 3]
        .iter()
        .map(|l| l.strip_prefix("    ").unwrap_or(l))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn path_shapes() {
    let declared = options().with_identifiers_in_scope(["obj", "known"]);
    for (source, expected) in [
        (
            "{{message}}",
            "χ.emitValue(χ.resolveOrReturn(χ.Globals[\"message\"])({}));",
        ),
        (
            "{{known}}",
            "χ.emitValue(χ.resolveOrReturn(known)({}));",
        ),
        (
            "{{obj.foo.bar}}",
            "χ.emitValue(χ.resolveOrReturn(obj?.foo?.bar)({}));",
        ),
        (
            "{{obj.foo-bar.baz}}",
            "χ.emitValue(χ.resolveOrReturn(obj?.[\"foo-bar\"]?.baz)({}));",
        ),
        ("{{this}}", "χ.emitValue(χ.resolveOrReturn(𝚪.this)({}));"),
        (
            "{{this.foo.bar}}",
            "χ.emitValue(χ.resolveOrReturn(𝚪.this.foo?.bar)({}));",
        ),
        ("{{@foo}}", "χ.emitValue(χ.resolveOrReturn(𝚪.args.foo)({}));"),
        (
            "{{@foo.bar}}",
            "χ.emitValue(χ.resolveOrReturn(𝚪.args.foo?.bar)({}));",
        ),
    ] {
        assert_eq!(body_text(source, &declared), expected, "{source}");
    }
}

#[test]
fn literal_statements() {
    for (source, expected) in [
        ("{{true}}", "true;"),
        ("{{false}}", "false;"),
        ("{{null}}", "null;"),
        ("{{undefined}}", "undefined;"),
        ("{{123}}", "123;"),
        ("{{\"hello\"}}", "\"hello\";"),
    ] {
        assert_eq!(body_text(source, &options()), expected, "{source}");
    }
}

#[test]
fn inline_conditionals() {
    assert_eq!(
        body_text("{{if @foo \"ok\"}}", &options()),
        "(𝚪.args.foo) ? (\"ok\") : (undefined);"
    );
    assert_eq!(
        body_text("{{unless @foo \"ok\" \"nope\"}}", &options()),
        "!(𝚪.args.foo) ? (\"ok\") : (\"nope\");"
    );
}

#[test]
fn keywords_are_shadowed_by_scope() {
    // A caller-declared `array` is an ordinary invocation, not the literal
    // special form.
    let declared = options().with_identifiers_in_scope(["array"]);
    assert_eq!(
        body_text("{{array 1}}", &declared),
        "χ.emitValue(χ.resolve(array)({}, 1));"
    );
    assert_eq!(body_text("{{array 1}}", &options()), "[1];");
}

#[test]
fn block_params_scope_is_popped_after_the_block() {
    let expected = concat!(
        "{\n",
        "  const 𝛄 = χ.emitComponent(χ.resolve(χ.Globals[\"foo\"])({}));\n",
        "  {\n",
        "    const [x] = 𝛄.blockParams.default;\n",
        "    χ.emitValue(χ.resolveOrReturn(x)({}));\n",
        "  }\n",
        "  χ.Globals[\"foo\"];\n",
        "}\n",
        "χ.emitValue(χ.resolveOrReturn(χ.Globals[\"x\"])({}));"
    );
    assert_eq!(
        body_text("{{#foo as |x|}}{{x}}{{/foo}}{{x}}", &options()),
        expected
    );
}

#[test]
fn element_marker_statement_only_without_attributes() {
    let with_marker = body_text("<div></div>", &options());
    assert!(with_marker.contains("𝛄;"), "{with_marker}");

    let without_marker = body_text("<div id=\"a\"></div>", &options());
    assert!(!without_marker.contains("𝛄;"), "{without_marker}");

    // Mustache block invocations never emit the marker.
    let block = body_text("{{#foo}}x{{/foo}}", &options());
    assert!(!block.contains("𝛄;"), "{block}");
}

#[test]
fn every_statement_has_a_mapping() {
    let source = "{{@a}}\n<div>{{@b}}</div>";
    let emission = emit(source, &options());
    assert_eq!(emission.errors, vec![]);
    // Top-level mustache, element, nested mustache.
    assert_eq!(emission.mappings.len(), 3);
    assert_eq!(emission.mappings[0].source, Span::new(0, 6));
    assert_eq!(emission.mappings[1].source, Span::new(7, 24));
    assert_eq!(emission.mappings[2].source, Span::new(12, 18));
    for mapping in &emission.mappings {
        assert!(mapping.generated.end > mapping.generated.start);
        assert!(mapping.generated.end <= emission.code.len());
    }
    // Pre-order: the element record opens before and closes after its child.
    assert!(emission.mappings[1].generated.start < emission.mappings[2].generated.start);
    assert!(emission.mappings[1].generated.end > emission.mappings[2].generated.end);
}

#[test]
fn skipped_statements_produce_no_mapping() {
    let emission = emit("{{yield to=@dynamic}}", &options());
    assert_eq!(emission.errors.len(), 1);
    assert_eq!(emission.mappings.len(), 0);
}

#[test]
fn directives_are_collected_in_source_order() {
    let source = "{{! @weft-suppress }}\n<div></div>\n{{! @weft-assert-error }}\n{{@x}}";
    let emission = emit(source, &options());
    assert_eq!(emission.errors, vec![]);
    let kinds: Vec<DirectiveKind> = emission.directives.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DirectiveKind::Suppress, DirectiveKind::AssertError]);
}

#[test]
fn directive_without_following_sibling_governs_itself() {
    let source = "{{@x}}\n{{! @weft-suppress }}";
    let emission = emit(source, &options());
    let directive = &emission.directives[0];
    assert_eq!(directive.area_of_effect, directive.span);
}

#[test]
fn directive_in_tag_position_governs_the_next_part() {
    let source = "<Foo {{! @weft-suppress }} @arg=\"hi\" />";
    let emission = emit(source, &options());
    let directive = &emission.directives[0];
    let arg_start = source.find("@arg").unwrap();
    assert_eq!(
        directive.area_of_effect,
        Span::new(arg_start, arg_start + "@arg=\"hi\"".len())
    );
}

#[test]
fn emission_continues_past_semantic_errors() {
    let source = "{{if true}}\n{{@ok}}\n{{hash 1 a=2}}";
    let emission = emit(source, &options());
    assert_eq!(emission.errors.len(), 2);
    assert!(emission.errors[0].message.contains("{{if}} requires at least two parameters"));
    assert!(emission.errors[1].message.contains("{{hash}} only accepts named parameters"));
    assert!(emission.code.contains("χ.emitValue(χ.resolveOrReturn(𝚪.args.ok)({}));"));
}

#[test]
fn repeated_emission_is_byte_identical() {
    let source = "{{#if @a}}<Foo @x={{@y}} as |b|>{{b}}</Foo>{{else}}{{! @weft-suppress }}{{@z}}{{/if}}";
    let opts = options().with_identifiers_in_scope(["Foo"]);
    let first = emit(source, &opts);
    let second = emit(source, &opts);
    assert_eq!(first.code, second.code);
    assert_eq!(first.directives, second.directives);
    assert_eq!(first.mappings, second.mappings);
    assert_eq!(first.errors, second.errors);
}
