use crate::error::{AssistantError, Result};

/// Strip markdown artifacts from raw model output and return the candidate
/// SQL. A fenced response yields the first fenced block (```sql ... ``` or
/// ``` ... ```); anything else is trimmed as-is. Fails when nothing
/// statement-like remains.
pub fn extract_sql(raw: &str) -> Result<String> {
    let trimmed = raw.trim();

    let candidate = if let Some(rest) = trimmed.strip_prefix("```") {
        // Skip optional language tag on the first line
        let rest = match rest.find('\n') {
            Some(pos) => &rest[pos + 1..],
            None => rest.strip_prefix("sql").unwrap_or(rest),
        };
        // First fenced block only
        let block = match rest.find("```") {
            Some(end) => &rest[..end],
            None => rest,
        };
        block.trim()
    } else {
        trimmed
    };

    if !candidate.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(AssistantError::EmptyGeneration(
            "model output contained no SQL statement".into(),
        ));
    }

    Ok(candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sql_fence_round_trip() {
        assert_eq!(
            extract_sql("```sql\nSELECT * FROM t\n```").unwrap(),
            "SELECT * FROM t"
        );
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(
            extract_sql("```\nSELECT 1\n```").unwrap(),
            "SELECT 1"
        );
    }

    #[test]
    fn unfenced_output_is_trimmed() {
        assert_eq!(
            extract_sql("  SELECT product FROM orders  \n").unwrap(),
            "SELECT product FROM orders"
        );
    }

    #[test]
    fn keeps_first_fenced_block_only() {
        let raw = "```sql\nSELECT a FROM t\n```\nAnd here is an explanation.";
        assert_eq!(extract_sql(raw).unwrap(), "SELECT a FROM t");
    }

    #[test]
    fn empty_or_punctuation_only_output_fails() {
        assert!(matches!(
            extract_sql(""),
            Err(AssistantError::EmptyGeneration(_))
        ));
        assert!(matches!(
            extract_sql("```sql\n\n```"),
            Err(AssistantError::EmptyGeneration(_))
        ));
        assert!(matches!(
            extract_sql(";;; ---"),
            Err(AssistantError::EmptyGeneration(_))
        ));
    }
}
