//! End-to-end program tests covering the language's observable behavior

mod common;

use common::{assert_output, run_fault};
use rill_runtime::FaultKind;
use rstest::rstest;

#[rstest]
// Precedence and grouping
#[case("print(2 + 3 * 4)", "14\n")]
#[case("print(((2 + 3) * 4))", "20\n")]
#[case("print(10 - 3 - 2)", "5\n")]
#[case("print(100 / 10 / 5)", "2\n")]
// Unary parity
#[case("print(!!!0)", "1\n")]
#[case("print(!!0)", "0\n")]
#[case("print(!5)", "0\n")]
// Division and modulo by zero yield zero
#[case("print(5 / 0)", "0\n")]
#[case("print(5 % 0)", "0\n")]
// Comparisons produce 1/0
#[case("print(3 < 4)", "1\n")]
#[case("print(4 <= 3)", "0\n")]
#[case("print(7 == 7)", "1\n")]
#[case("print(7 != 7)", "0\n")]
// Wrapping arithmetic, rendered signed
#[case("print(0 - 1)", "-1\n")]
#[case("print(18446744073709551615 + 1)", "0\n")]
#[case("x = 0 - 10; print(x)", "-10\n")]
// Boolean literals coerce to 1/0
#[case("print(true + true)", "2\n")]
#[case("if (true) { print(1) }", "1\n")]
fn test_expression_programs(#[case] source: &str, #[case] expected: &str) {
    assert_output(source, expected);
}

#[test]
fn test_logical_operators_do_not_short_circuit() {
    // Both operand calls run even though the left side already decides
    let source = r#"
        fun bump() { n = n + 1; return 0; }
        n = 0;
        x = bump() && bump();
        y = bump() || bump();
        print(n); print(x); print(y);
    "#;
    assert_output(source, "4\n0\n0\n");

    // Side effects on both sides land before the combination: 4 + 5 = 9
    let source = r#"
        a = 0; b = 0;
        fun left() { a = 4; return 1; }
        fun right() { b = 5; return 1; }
        x = left() && right();
        print((a + b));
    "#;
    assert_output(source, "9\n");
}

#[test]
fn test_scope_fallback_reads_global() {
    let source = r#"
        x = 2;
        fun f() { return x; }
        print(f());
    "#;
    assert_output(source, "2\n");
}

#[test]
fn test_global_mutation_through_function() {
    let source = r#"
        x = 1;
        fun f() { x = 2; }
        f();
        print(x);
    "#;
    assert_output(source, "2\n");
}

#[test]
fn test_function_local_stays_local() {
    let source = r#"
        x = 1;
        fun f() { y = 99; return y; }
        f();
        print(y);
    "#;
    let (fault, _) = run_fault(source);
    assert_eq!(fault.kind, FaultKind::UndefinedVariable("y".to_string()));
}

#[test]
fn test_for_loop_output_and_persistent_counter() {
    let source = r#"
        for (integer i = 0; i < 3; i = i + 1) {
            print(i);
        }
        print(i);
    "#;
    assert_output(source, "0\n1\n2\n3\n");
}

#[test]
fn test_for_init_skipped_when_counter_already_bound() {
    let source = r#"
        i = 5;
        for (integer i = 0; i < 7; i = i + 1) { print(i); }
    "#;
    assert_output(source, "5\n6\n");
}

#[test]
fn test_while_loop() {
    assert_output(
        "i = 0; while (i < 3) { print(i); i = i + 1; }",
        "0\n1\n2\n",
    );
}

#[test]
fn test_recursive_factorial() {
    let source = r#"
        fun fact(n) {
            if (n <= 1) { return 1; }
            return n * fact(n - 1);
        }
        print(fact(5));
    "#;
    assert_output(source, "120\n");
}

#[test]
fn test_recursive_fibonacci() {
    let source = r#"
        fun fib(n) {
            if (n < 2) { return n; }
            return fib(n - 1) + fib(n - 2);
        }
        print(fib(10));
    "#;
    assert_output(source, "55\n");
}

#[test]
fn test_call_isolation_faults() {
    // g cannot see f's local even while f's call is on the stack
    let source = r#"
        fun g() { return secret; }
        fun f() { secret = 1; return g(); }
        f();
    "#;
    let (fault, _) = run_fault(source);
    assert_eq!(
        fault.kind,
        FaultKind::UndefinedVariable("secret".to_string())
    );
}

#[test]
fn test_arity_mismatch_faults() {
    let (fault, _) = run_fault("fun f(a) { return a; } f(1, 2);");
    assert_eq!(
        fault.kind,
        FaultKind::ArityMismatch {
            name: "f".to_string(),
            expected: 1,
            got: 2,
        }
    );
}

#[test]
fn test_arguments_evaluate_in_caller_scope() {
    let source = r#"
        fun double(n) { return n * 2; }
        fun f() { k = 10; return double(k + 1); }
        print(f());
    "#;
    assert_output(source, "22\n");
}

#[test]
fn test_implicit_return_is_zero() {
    assert_output("fun f() { a = 1; } print(f());", "0\n");
}

#[test]
fn test_print_concatenation() {
    assert_output(
        r#"x = 7; print("x is " + (x) + ", doubled " + (x * 2))"#,
        "x is 7, doubled 14\n",
    );
}

#[test]
fn test_print_plus_joins_fragments_as_text() {
    // + between fragments is concatenation, not arithmetic
    assert_output("a = 4; b = 5; print(a + b)", "45\n");
}

#[test]
fn test_print_group_fragment_must_close_before_operators() {
    // (2 + 3) is a complete group fragment; * cannot follow it
    let (fault, _) = run_fault("print((2 + 3) * 4)");
    assert!(matches!(fault.kind, FaultKind::Expected { .. }));
}

#[test]
fn test_print_renders_by_stored_type() {
    let source = r#"
        integer n = 0 - 3;
        boolean b = 1;
        string s = "hi";
        print(n); print(b); print(s);
    "#;
    assert_output(source, "-3\n1\nhi\n");
}

#[test]
fn test_boolean_declaration_stores_exact_one() {
    assert_output(
        "boolean a = 1; boolean b = 5; print(a); print(b)",
        "1\n0\n",
    );
}

#[test]
fn test_string_declaration_and_retyping() {
    let source = r#"
        string s = "count " + (40 + 2);
        print(s);
        integer s = 9;
        print(s);
    "#;
    assert_output(source, "count 42\n9\n");
}

#[test]
fn test_array_lifecycle() {
    let source = r#"
        a[3];
        print(a[1]);
        a[1] = 5;
        print(a[1]);
        a[2] = a[1] * 2;
        print((a[0] + a[1] + a[2]));
    "#;
    assert_output(source, "0\n5\n15\n");
}

#[test]
fn test_array_out_of_bounds_read_faults() {
    let (fault, _) = run_fault("a[2]; print(a[9])");
    assert_eq!(fault.kind, FaultKind::IndexOutOfBounds { index: 9, len: 2 });
}

#[test]
fn test_fault_reports_byte_offset_and_remaining_text() {
    let source = "x = 1; print(missing); x = 2;";
    let (fault, output) = run_fault(source);
    assert_eq!(output, "");
    assert_eq!(fault.offset, 13);
    let report = fault.report(source);
    assert!(report.contains("offset 13"));
    assert!(report.ends_with("missing); x = 2;"));
}

#[test]
fn test_output_before_fault_is_kept() {
    let (fault, output) = run_fault(r#"print("one"); print("two"); print(nope)"#);
    assert_eq!(output, "one\ntwo\n");
    assert_eq!(fault.kind, FaultKind::UndefinedVariable("nope".to_string()));
}

#[test]
fn test_nested_control_flow() {
    let source = r#"
        total = 0;
        for (integer i = 1; i <= 3; i = i + 1) {
            j = 0;
            while (j < i) {
                total = total + 1;
                j = j + 1;
            }
        }
        print(total);
    "#;
    assert_output(source, "6\n");
}

#[test]
fn test_return_inside_loop_exits_function() {
    let source = r#"
        fun firstOver(limit) {
            for (integer i = 0; i < 100; i = i + 1) {
                if (i * i > limit) { return i; }
            }
            return 0;
        }
        print(firstOver(10));
    "#;
    assert_output(source, "4\n");
}

#[test]
fn test_else_branch_untaken_side_effects_skipped() {
    let source = r#"
        x = 10;
        if (x > 5) { print("big") } else { print(boom) }
    "#;
    assert_output(source, "big\n");
}
