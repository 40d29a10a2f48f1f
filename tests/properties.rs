use ifacegen::lexer::{Lexer, Tok};
use ifacegen::{extract, render, Error, RenderOptions};
use proptest::prelude::*;

/// Named types that extraction always accepts.
fn leaf_type() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "int",
        "string",
        "error",
        "byte",
        "Entity",
        "context.Context",
        "struct{}",
        "interface{}",
    ])
    .prop_map(String::from)
}

/// `chan`, `<-chan` or `chan<-` over `elem`, written the way Go prints it.
fn chan_type(dir: usize, elem: &str) -> String {
    let elem = if dir != 1 && elem.starts_with("<-chan") {
        format!("({elem})")
    } else {
        elem.to_string()
    };
    match dir {
        0 => format!("chan {elem}"),
        1 => format!("<-chan {elem}"),
        _ => format!("chan<- {elem}"),
    }
}

fn func_type(inputs: &[String], outputs: &[String]) -> String {
    let results = match outputs {
        [] => String::new(),
        [only] => format!(" {only}"),
        many => format!(" ({})", many.join(", ")),
    };
    format!("func({}){results}", inputs.join(", "))
}

/// Arbitrarily nested types in canonical Go spelling.
fn go_type() -> impl Strategy<Value = String> {
    leaf_type().prop_recursive(5, 48, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| format!("*{t}")),
            inner.clone().prop_map(|t| format!("[]{t}")),
            (0u32..64, inner.clone()).prop_map(|(n, t)| format!("[{n}]{t}")),
            (inner.clone(), inner.clone()).prop_map(|(k, v)| format!("map[{k}]{v}")),
            (0usize..3, inner.clone()).prop_map(|(dir, t)| chan_type(dir, &t)),
            (
                prop::collection::vec(inner.clone(), 0..3),
                prop::collection::vec(inner, 0..3),
            )
                .prop_map(|(i, o)| func_type(&i, &o)),
        ]
    })
}

const SIGNATURE_TEMPLATE: &str =
    "{{#each methods}}{{input_parameters this}}|{{output_parameters this}}\n{{/each}}";

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn lexer_never_panics_and_progresses(s in ".*") {
        let lx = Lexer::new(&s);

        let mut max_end = 0usize;
        let mut last_real_end = 0usize;
        let max_steps = s.len().saturating_mul(4) + 64;

        for (steps, (start, tok, end)) in lx.enumerate() {
            prop_assert!(start <= end, "start>end: ({start},{end}) tok={tok:?} input={s:?}");
            prop_assert!(end <= s.len(), "end out of bounds: ({start},{end}) tok={tok:?} input={s:?}");

            let injected_semi = matches!(tok, Tok::Semi) && start == end;
            if !injected_semi {
                prop_assert!(
                    start >= last_real_end,
                    "real token moved backwards: start={start} < {last_real_end} tok={tok:?} input={s:?}"
                );
                last_real_end = end;
                prop_assert!(end >= max_end, "real token end regressed: tok={tok:?} input={s:?}");
            } else {
                prop_assert!(start >= max_end, "injected semi before progress: pos={start} input={s:?}");
            }
            max_end = max_end.max(end);

            prop_assert!(steps <= max_steps, "too many steps (possible hang): input={s:?}");
        }
    }

    #[test]
    fn extract_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = extract(Some(&bytes));
    }

    #[test]
    fn unnamed_parameters_get_sequential_names(
        inputs in prop::collection::vec(go_type(), 0..6),
        outputs in prop::collection::vec(go_type(), 0..6),
    ) {
        let src = format!(
            "package p\n\ntype S interface {{\n\tM({}) ({})\n}}\n",
            inputs.join(", "),
            outputs.join(", "),
        );
        let pkg = extract(Some(src.as_bytes())).map_err(|e| TestCaseError::fail(format!("{e}\n{src}")))?;
        let method = &pkg.interfaces[0].methods[0];

        let want_in: Vec<String> = (1..=inputs.len()).map(|i| format!("_param{i}")).collect();
        let want_out: Vec<String> = (1..=outputs.len()).map(|i| format!("_result{i}")).collect();
        let got_in: Vec<String> = method.inputs.iter().map(|p| p.name.clone()).collect();
        let got_out: Vec<String> = method.outputs.iter().map(|p| p.name.clone()).collect();
        prop_assert_eq!(got_in, want_in);
        prop_assert_eq!(got_out, want_out);
    }

    #[test]
    fn parameter_types_print_back_as_written(ty in go_type()) {
        let src = format!("package p\ntype S interface {{ M(x {ty}) }}\n");
        let pkg = extract(Some(src.as_bytes())).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let printed = pkg.interfaces[0].methods[0].inputs[0].ty.source_in(Some("p")).to_string();
        prop_assert_eq!(printed, ty);
    }

    #[test]
    fn signatures_render_back_as_written(input in go_type(), output in go_type()) {
        let src = format!("package p\n\ntype S interface {{\n\tM(x {input}) (r {output})\n}}\n");
        let pkg = extract(Some(src.as_bytes())).map_err(|e| TestCaseError::fail(format!("{e}\n{src}")))?;
        let opts = RenderOptions {
            template: SIGNATURE_TEMPLATE.as_bytes().to_vec(),
            ..RenderOptions::default()
        };
        let out = render(&pkg, opts).map_err(|e| TestCaseError::fail(format!("{e}\n{src}")))?;
        let out = String::from_utf8(out).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let line = out.lines().last().unwrap_or_default();
        prop_assert_eq!(line, format!("x {input}|(r {output})"));
    }

    #[test]
    fn non_literal_array_lengths_are_unsupported(name in "[A-Z][a-z]{0,6}") {
        let src = format!("package p\nconst {name} = 4\ntype S interface {{ M(a [{name}]int) }}\n");
        let unsupported = matches!(
            extract(Some(src.as_bytes())),
            Err(Error::UnsupportedType { .. })
        );
        prop_assert!(unsupported);
    }
}
