use std::{fs, io::Cursor, thread};

use pretty_assertions::assert_eq;
use puffing::{
    Error, Execution,
    error::{LexError, ParseError, RuntimeError},
    execute, execute_with,
    interpreter::{
        config::InterpreterConfig, evaluator::core::Interpreter, value::core::Value,
    },
    parse, tokenize,
};
use walkdir::WalkDir;

#[test]
fn sample_scripts_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "pf"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected = expected_output(&source).unwrap_or_else(|| {
                                                    panic!("{path:?} has no '?= ' line")
                                                });

        count += 1;
        match execute(&source) {
            Ok(run) => assert_eq!(run.output, expected, "output of {path:?}"),
            Err(e) => panic!("Script {path:?} failed:\n{source}\nError: {e}"),
        }
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

/// The text after the last `?= ` line comment.
fn expected_output(source: &str) -> Option<String> {
    source.lines()
          .rev()
          .find_map(|line| line.trim_start().strip_prefix("?= "))
          .map(str::to_string)
}

fn assert_success(src: &str) -> Execution {
    match execute(src) {
        Ok(run) => run,
        Err(e) => panic!("Expected success, got error: {e}\n{src}"),
    }
}

fn assert_failure(src: &str) -> Error {
    match execute(src) {
        Ok(run) => panic!("Expected failure, got success: {:?}\n{src}", run.value),
        Err(e) => e,
    }
}

fn output(src: &str) -> String {
    assert_success(src).output
}

fn runtime(src: &str) -> RuntimeError {
    match assert_failure(src) {
        Error::Runtime(e) => e,
        other => panic!("Expected a runtime error, got {other:?}"),
    }
}

#[test]
fn precedence_of_arithmetic() {
    assert_eq!(output("let x as 5; let y as 10; print(x + y * 2);"), "25");
    assert_eq!(output("print((1 + 2) * 3, \" \", 2 ** 3 ** 2, \" \", -2 ** 2);"), "9 512 4");
    assert_eq!(output("print(7 / 2, \" \", 6 / 3, \" \", -7 % 3);"), "3.5 2.0 2");
}

#[test]
fn program_value_is_last_statement() {
    let run = assert_success("let x as 4;\nx * 10;");
    assert_eq!(run.value, Value::Integer(40));

    assert_eq!(assert_success("").value, Value::None);
}

#[test]
fn division_and_modulo_by_zero() {
    assert_eq!(runtime("let a as 1;\nprint(a / 0);"), RuntimeError::DivisionByZero { line: 2 });
    assert_eq!(runtime("print(5.5 % 0);"), RuntimeError::ModuloByZero { line: 1 });
    assert_eq!(runtime("print(0 ** -1);"), RuntimeError::DivisionByZero { line: 1 });
}

#[test]
fn integer_overflow_is_reported() {
    assert!(matches!(runtime("print(9223372036854775807 + 1);"), RuntimeError::Overflow { .. }));
    assert!(matches!(runtime("let n as 2; print(n ** 64);"), RuntimeError::Overflow { .. }));
}

#[test]
fn text_and_array_concatenation() {
    assert_eq!(output("print(\"n=\" + 3, \" \", 1.5 + \"!\", \" \", [1] + [2, 3]);"),
               "n=3 1.5! [1, 2, 3]");
    assert!(matches!(runtime("print([1] + 2);"), RuntimeError::TypeMismatch { .. }));
}

#[test]
fn equality_never_fails() {
    assert_eq!(output("print(1 = 1.0, \" \", 1 = \"1\", \" \", true = 1, \" \", [1, 2] = [1, 2]);"),
               "True False False True");
    assert!(matches!(runtime("print(1 < \"2\");"), RuntimeError::InvalidComparison { .. }));
}

#[test]
fn logical_operators_evaluate_both_sides() {
    let src = "fun side() { print(\"side \"); return true; }
               let r as false and side();
               print(r, \" \", true or side(), \" \", !0);";
    assert_eq!(output(src), "side side False True True");
    assert!(matches!(runtime("let x as 0;\nprint(x != 0 and 10 / x > 1);"),
                     RuntimeError::DivisionByZero { line: 2 }));
    assert!(matches!(runtime("print(true or missing);"), RuntimeError::UndefinedVariable { .. }));
}

#[test]
fn indices_start_at_one() {
    let src = "let a as [10, 20, 30];\n";
    assert_eq!(output(&format!("{src}print(a[1], \" \", a[-1], \" \", a[3]);")), "10 30 30");
    assert_eq!(output("print(\"puff\"[2], \"puff\"[-4]);"), "up");

    for index in ["0", "4", "-4"] {
        let err = runtime(&format!("{src}print(a[{index}]);"));
        assert!(matches!(err, RuntimeError::IndexOutOfRange { length: 3, line: 2, .. }),
                "a[{index}] gave {err:?}");
    }
    assert!(matches!(runtime("let a as [1];\na[0] as 5;"), RuntimeError::IndexOutOfRange { .. }));
}

#[test]
fn nested_index_assignment() {
    assert_eq!(output("let grid as [[1, 2], [3, 4]]; grid[2][1] as 9; print(grid);"),
               "[[1, 2], [9, 4]]");
    assert_eq!(output("let m as {\"a\": 1}; m[\"b\"] as 2; print(m);"), "{\"a\": 1, \"b\": 2}");
    assert!(matches!(runtime("let s as \"abc\"; s[1] as \"z\";"),
                     RuntimeError::StringIndexAssignment { .. }));
}

#[test]
fn map_lookup_of_missing_key() {
    let err = runtime("let m as {1: \"one\"};\nprint(m[2]);");
    assert!(matches!(err, RuntimeError::KeyNotFound { line: 2, .. }));
    assert!(matches!(runtime("let k as [1]; let m as {k: 2};"),
                     RuntimeError::InvalidKeyType { .. }));
}

#[test]
fn constants_cannot_change() {
    let err = runtime("lock limit as 3;\nlimit as 4;");
    assert_eq!(err,
               RuntimeError::ConstantModification { name: "limit".into(),
                                                    line: 2, });

    assert!(matches!(runtime("lock xs as [1];\nxs[1] as 2;"),
                     RuntimeError::ConstantModification { .. }));
    assert!(matches!(runtime("lock xs as [1];\npush(xs, 2);"),
                     RuntimeError::ConstantModification { .. }));
    assert!(matches!(runtime("lock n as 1;\nn++;"), RuntimeError::ConstantModification { .. }));
}

#[test]
fn assignment_needs_a_declaration() {
    assert_eq!(runtime("ghost as 1;"),
               RuntimeError::UndefinedVariable { name: "ghost".into(),
                                                 line: 1, });
}

#[test]
fn function_calls_restore_the_environment() {
    let run = assert_success("let n as 1; fun bump() { n as n + 1; let tmp as n; return tmp; } \
                              let got as bump();");
    let names: Vec<&str> = run.bindings.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["bump", "got", "n"]);
    assert_eq!(run.bindings[1].1, Value::Integer(2));
    assert_eq!(run.bindings[2].1, Value::Integer(1));
}

#[test]
fn blocks_do_not_scope() {
    assert_eq!(output("if true { let inner as 5; } print(inner);"), "5");
    assert_eq!(output("let i as 0; for i in [1, 2, 3] { let seen as i; } print(i, seen);"), "03");
    assert!(matches!(runtime("for j in [1] { } print(j);"), RuntimeError::UndefinedVariable { .. }));
}

#[test]
fn functions_see_only_what_existed_when_called() {
    let src = "fun outer() { fun inner() { return 1; } return inner(); }\nprint(outer());\ninner();";
    let err = runtime(src);
    assert_eq!(err,
               RuntimeError::FunctionNotFound { name: "inner".into(),
                                                line: 3, });

    // Mutual recursion works once both functions are bound.
    let src = "fun even(n) { if n = 0 { return true; } return odd(n - 1); }
               fun odd(n) { if n = 0 { return false; } return even(n - 1); }
               print(even(10), odd(7));";
    assert_eq!(output(src), "TrueTrue");
}

#[test]
fn break_and_continue_outside_loops() {
    assert_eq!(runtime("let x as 1;\nbreak;"), RuntimeError::BreakOutsideLoop { line: 2 });
    assert_eq!(runtime("continue;"), RuntimeError::ContinueOutsideLoop { line: 1 });
    assert_eq!(runtime("fun f() { break; } f();"), RuntimeError::BreakOutsideLoop { line: 1 });
    assert_eq!(runtime("\n\nreturn 5;"), RuntimeError::ReturnOutsideFunction { line: 3 });
}

#[test]
fn return_exits_nested_loops() {
    let src = "fun first_over(xs, limit) {
                   for x in xs { while true { if x > limit { return x; } break; } }
                   return 0;
               }
               print(first_over([1, 5, 9], 4), \" \", first_over([1], 4));";
    assert_eq!(output(src), "5 0");
}

#[test]
fn loops_evaluate_to_their_last_body_value() {
    assert_eq!(assert_success("let s as 0; for i in range(3) { s + i; }").value, Value::Integer(3));
    assert_eq!(assert_success("while false { 1; }").value, Value::None);
}

#[test]
fn iteration_targets() {
    assert_eq!(output("for c in \"abc\" { print(c, \"-\"); }"), "a-b-c-");
    assert_eq!(output("let m as {\"x\": 1, \"y\": 2}; for k in m { print(k); }"), "xy");
    assert!(matches!(runtime("for x in 5 { }"), RuntimeError::NotIterable { .. }));
}

#[test]
fn ranges_are_inclusive() {
    assert_eq!(output("print(range(4), range(2, 4), range(10, 0, -5), range(3, 1));"),
               "[1, 2, 3, 4][2, 3, 4][10, 5, 0][]");
    assert!(matches!(runtime("print(range(1, 5, 0));"), RuntimeError::InvalidRange { .. }));
    assert!(matches!(assert_failure("print(range());"),
                     Error::Parse(ParseError::InvalidRangeArguments { count: 0, .. })));
}

#[test]
fn destructuring() {
    assert_eq!(output("let [a, b] as [1, 2, 3]; print(a + b);"), "3");
    assert_eq!(output("let [x, y] as \"hi\"; print(y, x);"), "ih");
    assert!(matches!(runtime("let [a, b, c] as [1, 2];"),
                     RuntimeError::DestructureMismatch { .. }));
    assert!(matches!(runtime("let [a] as 7;"), RuntimeError::InvalidDestructureType { .. }));
}

#[test]
fn increments_and_compound_assignment() {
    assert_eq!(output("let n as 1; n++; ++n; --n; print(n);"), "2");
    assert_eq!(output("let f as 1.5; f++; print(f);"), "2.5");
    assert_eq!(output("let x as 10; *3 x; -4 x; print(x);"), "26");
    assert!(matches!(runtime("let s as \"a\"; s++;"), RuntimeError::InvalidIncrement { .. }));
}

#[test]
fn casts_and_formatting() {
    assert_eq!(output("print((int)\"42\" + 1, \" \", 3.99(int), \" \", (str)12 + \"!\");"),
               "43 3 12!");
    assert_eq!(output("let v as 2.7; print((bool)\"\", (bool)[0], \" \", 3.14159.2f, \" \", v.0f);"),
               "FalseTrue 3.14 3");
    assert!(matches!(runtime("print((int)\"4x\");"), RuntimeError::InvalidCast { .. }));
    assert!(matches!(runtime("print(\"a\".2f);"), RuntimeError::InvalidFormat { .. }));
}

#[test]
fn lambdas_are_values() {
    let src = "let twice as lamb (f, x) => f(f(x));
               print(twice(lamb (n) => n * 3, 2));";
    assert_eq!(output(src), "18");

    let err = runtime("let f as lamb (a, b) => a;\nf(1);");
    assert!(matches!(err, RuntimeError::ArgumentCount { line: 2, .. }));
    assert!(matches!(runtime("let n as 3; n(1);"), RuntimeError::NotCallable { .. }));
}

#[test]
fn builtins_on_collections() {
    let src = "let xs as [3, 1, 2];
               sort(xs);
               insert(xs, 1, 0);
               print(xs, \" \");
               let last as pop(xs);
               print(last, \" \", min(xs), \" \", max(xs), \" \", sum(xs));";
    assert_eq!(output(src), "[0, 1, 2, 3] 3 0 2 3");
    assert!(matches!(runtime("print(min([]));"), RuntimeError::EmptyContainer { .. }));
    assert!(matches!(runtime("let xs as [1, \"a\"]; sort(xs);"),
                     RuntimeError::InvalidSort { .. }));
}

#[test]
fn mutating_a_temporary_value() {
    assert_eq!(output("let g as [[1], [2]]; push(g[1], 9); print(g);"), "[[1, 9], [2]]");
    assert_eq!(output("print(push([1], 2));"), "[1, 2]");
    assert_eq!(output("let m as {\"k\": [1]}; push(m[\"k\"], 2); print(m);"), r#"{"k": [1, 2]}"#);
}

#[test]
fn printed_forms_of_scalars() {
    assert_eq!(output("print(true, \" \", [true, false], \" \", (str)false);"),
               "True [True, False] False");
    assert_eq!(output("fun nothing() { return; } print(nothing(), \" \", [nothing()]);"),
               "None [None]");
    assert_eq!(output("print([\"a\\nb\", \"q\\\"t\"]);"), "[\"a\nb\", \"q\"t\"]");
}

#[test]
fn unit_bases_accept_huge_exponents() {
    assert_eq!(output("print(1 ** 5000000000, (-1) ** 5000000001, 0 ** 5000000000);"), "1-10");
    assert!(matches!(runtime("print(2 ** 5000000000);"), RuntimeError::Overflow { .. }));
}

#[test]
fn sets_hold_scalars() {
    assert_eq!(output("let s as #{1, 2}; set_add(s, 1); set_add(s, 3); print(len(s), set_contains(s, 3));"),
               "3True");
    assert!(matches!(runtime("let s as #{[1]};"), RuntimeError::InvalidSetElement { .. }));
}

#[test]
fn libraries_must_be_imported() {
    assert!(matches!(runtime("print(sqrt(4));"), RuntimeError::FunctionNotFound { .. }));
    assert_eq!(output("lib $math.main; print(sqrt(16), \" \", floor(-0.5));"), "4.0 -1");
    assert_eq!(output("lib $string.main; print(upper(\"puff\"), \" \", split(\"a,b\", \",\"));"),
               "PUFF [\"a\", \"b\"]");
}

#[test]
fn input_reads_lines_from_the_reader() {
    let src = "let n as input(int); let word as input(); print(n * 2, word);";
    let program = parse(&tokenize(src).unwrap()).unwrap();

    let mut interpreter = Interpreter::new(InterpreterConfig::default())
                              .with_input(Cursor::new("21\npuff\n"));
    interpreter.run(&program).unwrap();
    assert_eq!(interpreter.output(), "42puff");

    let mut interpreter = Interpreter::new(InterpreterConfig::default())
                              .with_input(Cursor::new("x\n"));
    let err = interpreter.run(&program).unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidInput { .. }));
}

#[test]
fn deep_recursion_is_an_error() {
    const RUNAWAY: &str = "fun down(n) { return down(n + 1); } down(0);";
    const COUNT: &str = "fun count(n) { if n = 0 { return 0; } return 1 + count(n - 1); }
                         count(40);";

    // Results cross the thread boundary as errors and text, since values are `!Send`.
    let worker = thread::Builder::new().stack_size(256 * 1024 * 1024)
                                       .spawn(|| {
                                           let runaway = execute(RUNAWAY).err();
                                           let config =
                                               InterpreterConfig::default().with_max_call_depth(50);
                                           let count = execute_with(COUNT, config)
                                                           .map(|run| run.value.to_string());
                                           (runaway, count)
                                       })
                                       .unwrap();
    let (runaway, count) = worker.join().unwrap();

    assert!(matches!(runaway,
                     Some(Error::Runtime(RuntimeError::RecursionTooDeep { limit: 200, .. }))));
    assert_eq!(count.unwrap(), "40");
}

#[test]
fn errors_carry_their_phase() {
    assert!(matches!(assert_failure("let s as \"never closed;"),
                     Error::Lex(LexError::UnterminatedString { line: 1, .. })));
    assert!(matches!(assert_failure("let x as ;"), Error::Parse(_)));
    assert_eq!(assert_failure("\n\nprint(missing);").line(), 3);
}

#[test]
fn comments_are_ignored() {
    assert_eq!(output("? nothing here\nprint(1); ?- print(2);\nstill hidden -? print(3);"),
               "13");
}
