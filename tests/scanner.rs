#[cfg(test)]
mod scanner_tests {
    use fojaccia::error::{Diagnostics, FojError};
    use fojaccia::scanner::*;
    use fojaccia::token::*;
    use pretty_assertions::assert_eq;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    fn error_messages(results: &[Result<Token, FojError>]) -> Vec<String> {
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators() {
        assert_token_sequence(
            "! != = == < <= > >= /",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "fn null var classy _x class",
            &[
                (TokenType::FN, "fn"),
                (TokenType::NULL, "null"),
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "classy"),
                (TokenType::IDENTIFIER, "_x"),
                (TokenType::CLASS, "class"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_literals_carry_values() {
        let tokens: Vec<Token> = Scanner::new("\"hi there\" 2.5 7 8.")
            .filter_map(Result::ok)
            .collect();

        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "hi there"),
            other => panic!("expected a string, got {:?}", other),
        }
        assert_eq!(tokens[0].lexeme, "\"hi there\"");

        match tokens[1].token_type {
            TokenType::NUMBER(n) => assert_eq!(n, 2.5),
            ref other => panic!("expected a number, got {:?}", other),
        }

        // A trailing dot is not part of the number.
        assert_eq!(tokens[3].lexeme, "8");
        assert_eq!(tokens[4].token_type, TokenType::DOT);
    }

    #[test]
    fn test_scanner_05_display_format() {
        let rendered: Vec<String> = Scanner::new("var x = 42; \"s\" 1.5")
            .filter_map(Result::ok)
            .map(|t| t.to_string())
            .collect();

        assert_eq!(
            rendered,
            vec![
                "VAR var null",
                "IDENTIFIER x null",
                "EQUAL = null",
                "NUMBER 42 42.0",
                "SEMICOLON ; null",
                "STRING \"s\" s",
                "NUMBER 1.5 1.5",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_scanner_06_comments_are_skipped() {
        assert_token_sequence(
            "a // line comment\n/* block\ncomment */ b /**/ c",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::IDENTIFIER, "b"),
                (TokenType::IDENTIFIER, "c"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_07_line_counter() {
        let tokens: Vec<Token> = Scanner::new("a\n\"two\nlines\"\n/* x\ny */ b")
            .filter_map(Result::ok)
            .collect();

        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();

        assert_eq!(lines, vec![1, 3, 5, 5]);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let results: Vec<_> = Scanner::new(",.$(#").collect();

        // COMMA, DOT, error, LEFT_PAREN, error, EOF
        assert_eq!(results.len(), 6);

        let kinds: Vec<Option<TokenType>> = results
            .iter()
            .map(|r| r.as_ref().ok().map(|t| t.token_type.clone()))
            .collect();

        assert_eq!(
            kinds,
            vec![
                Some(TokenType::COMMA),
                Some(TokenType::DOT),
                None,
                Some(TokenType::LEFT_PAREN),
                None,
                Some(TokenType::EOF),
            ]
        );

        assert_eq!(
            error_messages(&results),
            vec![
                "[line 1] Error: Unexpected character: $",
                "[line 1] Error: Unexpected character: #",
            ]
        );
    }

    #[test]
    fn test_unexpected_multibyte_char_is_skipped_whole() {
        let tokens: Vec<Token> = Scanner::new("a é b").filter_map(Result::ok).collect();
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();

        assert_eq!(lexemes, vec!["a", "b", ""]);
    }

    #[test]
    fn test_unterminated_string_reports_and_still_ends_with_eof() {
        let results: Vec<_> = Scanner::new("print \"open\nstill open").collect();

        assert_eq!(
            error_messages(&results),
            vec!["[line 2] Error: Unterminated string."]
        );

        let last = results.last().and_then(|r| r.as_ref().ok()).map(|t| t.token_type.clone());
        assert_eq!(last, Some(TokenType::EOF));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let results: Vec<_> = Scanner::new("a /* never\nclosed").collect();

        assert_eq!(
            error_messages(&results),
            vec!["[line 2] Error: Unterminated block comment."]
        );
    }

    #[test]
    fn test_lexemes_reproduce_the_source() {
        let source = "fn add(a, b) { return a + b; }";
        let tokens: Vec<Token> = Scanner::new(source).filter_map(Result::ok).collect();

        let joined: String = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        let without_whitespace: String = source.chars().filter(|c| !c.is_whitespace()).collect();

        assert_eq!(joined, without_whitespace);
    }

    #[test]
    fn test_scan_tokens_collects_errors() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("@ 1 ^", &mut diagnostics);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].token_type, TokenType::EOF);
    }
}
