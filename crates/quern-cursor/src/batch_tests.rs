//! Unit tests for the bulk-insert matcher

use pretty_assertions::assert_eq;

use super::batch::match_insert;

mod shape_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_matches_simple_insert() {
        let template = match_insert("INSERT INTO t (a,b) VALUES (%s,%s)").unwrap();
        assert_eq!(template.prefix, "INSERT INTO t (a,b) VALUES ");
        assert_eq!(template.values, "(%s,%s)");
        assert_eq!(template.suffix, "");
    }

    #[test]
    fn test_matches_replace() {
        let template = match_insert("REPLACE INTO t (a) VALUES (%s)").unwrap();
        assert_eq!(template.prefix, "REPLACE INTO t (a) VALUES ");
    }

    #[test]
    fn test_matches_lowercase_without_space() {
        let template = match_insert("insert into t values(%s)").unwrap();
        assert_eq!(template.prefix, "insert into t values");
        assert_eq!(template.values, "(%s)");
    }

    #[test]
    fn test_matches_value_singular() {
        let template = match_insert("INSERT INTO t VALUE (%s)").unwrap();
        assert_eq!(template.prefix, "INSERT INTO t VALUE ");
        assert_eq!(template.values, "(%s)");
    }

    #[test]
    fn test_matches_named_placeholders() {
        let template = match_insert("INSERT INTO t (a,b) VALUES (%(a)s, %(b)s)").unwrap();
        assert_eq!(template.values, "(%(a)s, %(b)s)");
    }

    #[test]
    fn test_matches_multiline_query() {
        let template = match_insert("INSERT INTO t\n  (a, b)\nVALUES\n  (%s, %s)").unwrap();
        assert_eq!(template.prefix, "INSERT INTO t\n  (a, b)\nVALUES\n  ");
        assert_eq!(template.values, "(%s, %s)");
    }

    #[test]
    fn test_matches_trailing_semicolon_and_whitespace() {
        let template = match_insert("INSERT INTO t (a) VALUES (%s);  ").unwrap();
        assert_eq!(template.suffix, "");
    }
}

mod suffix_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_captures_on_duplicate_clause() {
        let template =
            match_insert("INSERT INTO t (a) VALUES (%s) ON DUPLICATE KEY UPDATE a = VALUES(a)")
                .unwrap();
        assert_eq!(template.prefix, "INSERT INTO t (a) VALUES ");
        assert_eq!(template.values, "(%s)");
        assert_eq!(template.suffix, " ON DUPLICATE KEY UPDATE a = VALUES(a)");
    }

    #[test]
    fn test_trailing_whitespace_lands_in_suffix() {
        // The trailing-clause capture is greedy about leading whitespace,
        // so a bare trailing newline travels with the suffix.
        let template = match_insert("INSERT INTO t (a) VALUES (%s)\n").unwrap();
        assert_eq!(template.suffix, "\n");
    }
}

mod rejection_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rejects_update() {
        assert!(match_insert("UPDATE t SET a=%s WHERE id=%s").is_none());
    }

    #[test]
    fn test_rejects_select() {
        assert!(match_insert("SELECT * FROM t WHERE a = %s").is_none());
    }

    #[test]
    fn test_rejects_literal_value_group() {
        // Every comma-separated item must be a placeholder token.
        assert!(match_insert("INSERT INTO t VALUES (1, 2)").is_none());
        assert!(match_insert("INSERT INTO t VALUES (%s, 2)").is_none());
    }

    #[test]
    fn test_rejects_placeholder_without_parentheses() {
        assert!(match_insert("INSERT INTO t VALUES %s").is_none());
    }

    #[test]
    fn test_rejects_content_after_value_group() {
        assert!(match_insert("INSERT INTO t VALUES (%s) RETURNING id").is_none());
    }

    #[test]
    fn test_positional_multi_group_falls_back() {
        // (%s),(%s) is not one placeholder-bearing group; the caller
        // routes such queries through per-row execution instead.
        assert!(match_insert("INSERT INTO t VALUES (%s),(%s)").is_none());
    }
}

mod multi_group_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_named_multi_group_captured_as_one_row_template() {
        // The greedy named-placeholder token spans the comma-separated
        // groups, so the whole span becomes the per-row template. Kept
        // as-is: callers supplying multi-group templates get the exact
        // historical expansion.
        let template = match_insert("INSERT INTO t VALUES (%(a)s),(%(b)s)").unwrap();
        assert_eq!(template.values, "(%(a)s),(%(b)s)");
    }
}
