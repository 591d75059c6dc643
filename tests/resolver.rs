#[cfg(test)]
mod resolver_tests {
    use fojaccia::error::{Diagnostics, Phase};
    use fojaccia::parser::Parser;
    use fojaccia::resolver::{Resolutions, Resolver};
    use fojaccia::scanner::scan_tokens;
    use fojaccia::stmt::Stmt;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Vec<Stmt> {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);
        let statements = Parser::new(&tokens).parse(&mut diagnostics);

        assert!(diagnostics.is_empty(), "source should parse: {}", source);
        statements
    }

    fn resolve(source: &str) -> (Resolutions, Vec<String>) {
        let statements = parse(source);
        let mut diagnostics = Diagnostics::new();
        let resolutions = Resolver::new()
            .with_globals(["clock"])
            .resolve(&statements, &mut diagnostics);

        assert!(diagnostics.iter().all(|e| e.phase() == Phase::Static));

        let messages = diagnostics.iter().map(ToString::to_string).collect();
        (resolutions, messages)
    }

    fn errors(source: &str) -> Vec<String> {
        resolve(source).1
    }

    fn sorted_depths(resolutions: &Resolutions) -> Vec<usize> {
        let mut depths: Vec<usize> = resolutions.values().copied().collect();
        depths.sort_unstable();
        depths
    }

    #[test]
    fn test_globals_are_left_unresolved() {
        let (resolutions, errors) = resolve("var a = 1; print a; a = 2; print clock();");

        assert!(errors.is_empty());
        assert!(resolutions.is_empty());
    }

    #[test]
    fn test_local_distances() {
        let (resolutions, errors) = resolve("{ var a = 1; { var b = 2; print a + b; } }");

        assert!(errors.is_empty());
        // `a` one scope out, `b` in the innermost scope.
        assert_eq!(sorted_depths(&resolutions), vec![0, 1]);
    }

    #[test]
    fn test_closure_binds_to_declaration_scope() {
        let (resolutions, _) = resolve(
            "var a = \"global\";
             {
               fn show() { print a; }
               show();
               var a = \"block\";
               show();
             }",
        );

        // Only the two `show` calls are locals; `a` inside `show` stays global
        // even though a later block-level `a` exists.
        assert_eq!(sorted_depths(&resolutions), vec![0, 0]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let statements = parse("fn f(x) { var y = x; return fn_g(y) + x; } { var z = 1; z = z + 1; }");

        let first = Resolver::new().resolve(&statements, &mut Diagnostics::new());
        let second = Resolver::new().resolve(&statements, &mut Diagnostics::new());

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_top_level_return() {
        assert_eq!(
            errors("return 1;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn test_return_inside_function_is_fine() {
        assert!(errors("fn f() { return 1; }").is_empty());
    }

    #[test]
    fn test_this_outside_class() {
        assert_eq!(
            errors("print this;"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );

        assert_eq!(
            errors("fn f() { return this; }"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
    }

    #[test]
    fn test_super_misuse() {
        assert_eq!(
            errors("fn f() { super.go(); }"),
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );

        assert_eq!(
            errors("class A { m() { super.m(); } }"),
            vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
        );

        assert!(errors("class A { m() {} } class B < A { m() { super.m(); } }").is_empty());
    }

    #[test]
    fn test_class_inheriting_from_itself() {
        assert_eq!(
            errors("class A < A {}"),
            vec!["[line 1] Error at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn test_own_initializer_without_outer_binding() {
        assert_eq!(
            errors("{ var a = a; }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_own_initializer_reads_outer_binding() {
        assert!(errors("var a = 1; { var a = a + 1; }").is_empty());
        assert!(errors("{ var a = 1; { var a = a; } }").is_empty());
    }

    #[test]
    fn test_redeclaration_in_same_scope_is_allowed() {
        assert!(errors("{ var a = 1; var a = 2; }").is_empty());
        assert!(errors("var a = 1; var a = 2;").is_empty());
    }

    #[test]
    fn test_all_errors_are_reported_in_one_pass() {
        let found = errors("return 1;\nprint this;\nclass A < A {}");

        assert_eq!(found.len(), 3);
        assert!(found[2].starts_with("[line 3]"));
    }

    #[test]
    fn test_split_separates_top_level_references() {
        let statements = parse(
            "{ var a = 1; print a; }
             fn f(x) { var y = x; return y; }",
        );

        let (resolutions, top_level) =
            Resolver::new().resolve_split(&statements, &mut Diagnostics::new());

        // `a` in the block; `x` and `y` inside `f`.
        assert_eq!(resolutions.len(), 3);
        assert_eq!(top_level.len(), 1);
        assert!(resolutions.contains_key(&top_level[0]));
    }
}
