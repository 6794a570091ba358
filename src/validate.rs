use serde::Serialize;

/// Statement types that mutate data or schema, rejected wherever they
/// appear in the query.
const DENIED_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "TRUNCATE", "CREATE", "GRANT", "REVOKE",
];

pub const REASON_STATEMENT_TYPE: &str = "disallowed statement type";
pub const REASON_STACKED: &str = "stacked statements";
pub const REASON_DENIED_KEYWORD: &str = "disallowed keyword present";

/// Verdict of the allow-list safety check. A query lacking `is_safe` is
/// never executed, under any configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedQuery {
    pub sql_text: String,
    pub is_safe: bool,
    pub rejection_reason: Option<String>,
}

impl ValidatedQuery {
    fn safe(sql: &str) -> Self {
        Self {
            sql_text: sql.to_string(),
            is_safe: true,
            rejection_reason: None,
        }
    }

    fn rejected(sql: &str, reason: &str) -> Self {
        Self {
            sql_text: sql.to_string(),
            is_safe: false,
            rejection_reason: Some(reason.to_string()),
        }
    }
}

/// Syntactic allow-list check: the statement must lead with SELECT, must
/// not stack further statements after a `;`, and must not contain a denied
/// keyword anywhere (including inside subqueries or CTE bodies).
///
/// This is keyword matching, not a SQL parser. It can over-reject (a denied
/// keyword inside a string literal) and cannot reason about obfuscated
/// statements; false rejections are acceptable, false acceptance of a
/// mutation is not.
pub fn validate(sql: &str) -> ValidatedQuery {
    let trimmed = sql.trim();
    let upper = trimmed.to_uppercase();

    let mut tokens = upper
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty());

    match tokens.next() {
        Some("SELECT") => {}
        _ => return ValidatedQuery::rejected(trimmed, REASON_STATEMENT_TYPE),
    }

    if let Some(pos) = upper.find(';') {
        if upper[pos + 1..].chars().any(|c| !c.is_whitespace()) {
            return ValidatedQuery::rejected(trimmed, REASON_STACKED);
        }
    }

    for token in upper
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
    {
        if DENIED_KEYWORDS.contains(&token) {
            return ValidatedQuery::rejected(trimmed, REASON_DENIED_KEYWORD);
        }
    }

    ValidatedQuery::safe(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_select_is_safe() {
        let v = validate("SELECT product, quantity FROM orders ORDER BY quantity DESC LIMIT 10");
        assert!(v.is_safe);
        assert!(v.rejection_reason.is_none());
    }

    #[test]
    fn lowercase_select_is_safe() {
        assert!(validate("select count(*) from orders").is_safe);
    }

    #[test]
    fn trailing_semicolon_alone_is_safe() {
        assert!(validate("SELECT 1;").is_safe);
        assert!(validate("SELECT 1;   \n").is_safe);
    }

    #[test]
    fn every_disallowed_leading_keyword_is_rejected() {
        for sql in [
            "DROP TABLE orders",
            "DELETE FROM orders",
            "INSERT INTO orders VALUES (1)",
            "UPDATE orders SET quantity = 0",
            "ALTER TABLE orders ADD COLUMN x int",
            "TRUNCATE orders",
            "CREATE TABLE x (id int)",
            "GRANT ALL ON orders TO public",
            "REVOKE ALL ON orders FROM public",
        ] {
            let v = validate(sql);
            assert!(!v.is_safe, "{sql} should be rejected");
            assert_eq!(v.rejection_reason.as_deref(), Some(REASON_STATEMENT_TYPE));
        }
    }

    #[test]
    fn stacked_statements_are_rejected() {
        let v = validate("SELECT 1; SELECT 2");
        assert!(!v.is_safe);
        assert_eq!(v.rejection_reason.as_deref(), Some(REASON_STACKED));
    }

    #[test]
    fn embedded_mutation_keyword_is_rejected() {
        let v = validate("SELECT * FROM (DELETE FROM orders RETURNING *) sub");
        assert!(!v.is_safe);
        assert_eq!(v.rejection_reason.as_deref(), Some(REASON_DENIED_KEYWORD));

        let cte = validate("WITH doomed AS (DROP TABLE orders) SELECT 1");
        assert!(!cte.is_safe);
    }

    #[test]
    fn keyword_inside_identifier_does_not_trip_the_deny_list() {
        // created_at contains CREATE as a substring but not as a token
        assert!(validate("SELECT created_at, updated_at FROM orders").is_safe);
        assert!(validate("SELECT dropped_count FROM orders").is_safe);
    }

    #[test]
    fn empty_input_is_rejected() {
        let v = validate("   ");
        assert!(!v.is_safe);
        assert_eq!(v.rejection_reason.as_deref(), Some(REASON_STATEMENT_TYPE));
    }
}
