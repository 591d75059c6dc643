#[cfg(test)]
mod parser_tests {
    use fojaccia::ast_printer::AstPrinter;
    use fojaccia::error::Diagnostics;
    use fojaccia::parser::Parser;
    use fojaccia::scanner::scan_tokens;
    use fojaccia::stmt::Stmt;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> (Vec<Stmt>, Vec<String>) {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);
        let statements = Parser::new(&tokens).parse(&mut diagnostics);

        let messages = diagnostics.iter().map(ToString::to_string).collect();
        (statements, messages)
    }

    fn print_program(source: &str) -> Vec<String> {
        let (statements, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);

        statements.iter().map(AstPrinter::print_stmt).collect()
    }

    fn print_expression(source: &str) -> String {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);
        let expr = Parser::new(&tokens)
            .parse_expression(&mut diagnostics)
            .expect("expression should parse");

        AstPrinter::print_expr(&expr)
    }

    #[test]
    fn test_precedence_shapes() {
        assert_eq!(print_expression("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(print_expression("(1 + 2) * 3"), "(* (group (+ 1 2)) 3)");
        assert_eq!(print_expression("-a - -b"), "(- (- a) (- b))");
        assert_eq!(print_expression("1 < 2 == !false"), "(== (< 1 2) (! false))");
        assert_eq!(print_expression("a or b and c"), "(or a (and b c))");
        assert_eq!(print_expression("8 / 4 / 2"), "(/ (/ 8 4) 2)");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(print_expression("a = b = 3"), "(= a (= b 3))");
        assert_eq!(print_expression("p.x = 1"), "(= (. p x) 1)");
    }

    #[test]
    fn test_chained_calls_and_properties() {
        assert_eq!(
            print_expression("a(b)(c).d(e)"),
            "(call (. (call (call a b) c) d) e)"
        );
    }

    #[test]
    fn test_trailing_tokens_after_expression() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("1 2", &mut diagnostics);
        let expr = Parser::new(&tokens).parse_expression(&mut diagnostics);

        assert!(expr.is_none());
        assert_eq!(
            diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["[line 1] Error at '2': Expected end of expression."]
        );
    }

    #[test]
    fn test_declarations() {
        assert_eq!(
            print_program("var a = 1; var b; print a;"),
            vec!["(var a 1)", "(var b)", "(print a)"]
        );

        assert_eq!(
            print_program("fn add(a, b) { return a + b; }"),
            vec!["(fn add(a b) (return (+ a b)))"]
        );

        assert_eq!(
            print_program("class B < A { init(x) { this.x = x; } get() { return super.get(); } }"),
            vec![
                "(class B < A (method init(x) (; (= (. this x) x))) (method get() (return (call (super get)))))"
            ]
        );
    }

    #[test]
    fn test_for_loop_desugars_to_while() {
        assert_eq!(
            print_program("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec!["(block (var i 0) (while (< i 3) (block (print i) (; (= i (+ i 1))))))"]
        );

        assert_eq!(
            print_program("for (;;) print 1;"),
            vec!["(while true (print 1))"]
        );
    }

    #[test]
    fn test_if_else_binds_to_nearest_if() {
        assert_eq!(
            print_program("if (a) if (b) print 1; else print 2;"),
            vec!["(if a (if b (print 1) (print 2)))"]
        );
    }

    #[test]
    fn test_synchronize_reports_every_broken_statement() {
        let (statements, errors) = parse("var = 1;\nprint 2;\nprint ;\nvar ok = 3;");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at '=': Expected variable name.",
                "[line 3] Error at ';': Expected expression.",
            ]
        );

        let printed: Vec<String> = statements.iter().map(AstPrinter::print_stmt).collect();
        assert_eq!(printed, vec!["(print 2)", "(var ok 3)"]);
    }

    #[test]
    fn test_error_at_end() {
        let (_, errors) = parse("print 1");

        assert_eq!(errors, vec!["[line 1] Error at end: Expected ';' after value."]);
    }

    #[test]
    fn test_invalid_assignment_target_does_not_discard_statement() {
        let (statements, errors) = parse("1 + 2 = 3; print 4;");

        assert_eq!(errors, vec!["[line 1] Error at '=': Invalid assignment target."]);
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_argument_limit() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));

        let (statements, errors) = parse(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Can't have more than 255 arguments."));
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_parameter_limit() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fn f({}) {{}}", params.join(", "));

        let (_, errors) = parse(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Can't have more than 255 parameters."));
    }

    #[test]
    fn test_super_requires_method_name() {
        let (_, errors) = parse("class A < B { m() { super; } }");

        assert_eq!(errors[0], "[line 1] Error at ';': Expected '.' after 'super'.");
    }

    #[test]
    fn test_deeply_nested_grouping_is_rejected() {
        let source = format!("print {}1{};", "(".repeat(300), ")".repeat(300));

        let (statements, errors) = parse(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Error at '(': Nesting too deep."));
        assert!(statements.is_empty());
    }

    #[test]
    fn test_deeply_nested_unary_is_rejected() {
        let source = format!("print {}true;", "!".repeat(300));

        let (_, errors) = parse(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Nesting too deep."));
    }

    #[test]
    fn test_moderate_nesting_still_parses() {
        let source = format!("print {}1{};", "(".repeat(100), ")".repeat(100));

        assert_eq!(print_program(&source).len(), 1);
    }

    #[test]
    fn test_expression_ids_continue_from_first_id() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("print a; b = c;", &mut diagnostics);

        let mut parser = Parser::with_first_id(&tokens, 10);
        parser.parse(&mut diagnostics);

        assert!(diagnostics.is_empty());
        assert!(parser.next_id() > 10);

        let mut fresh = Parser::new(&tokens);
        fresh.parse(&mut diagnostics);
        assert_eq!(parser.next_id() - 10, fresh.next_id());
    }
}
