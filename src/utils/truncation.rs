/// Upper bound on how much of a response body is kept for keyword matching.
pub const MAX_BODY_LENGTH: usize = 512 * 1024;
const MAX_ERROR_LENGTH: usize = 2_000;

fn floor_char_boundary(s: &str, max: usize) -> usize {
    let mut end = max.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}

pub fn truncate_body(body: String) -> String {
    if body.len() <= MAX_BODY_LENGTH {
        body
    } else {
        let end = floor_char_boundary(&body, MAX_BODY_LENGTH);
        body[..end].to_string()
    }
}

pub fn truncate_error(error: &str) -> String {
    if error.len() <= MAX_ERROR_LENGTH {
        error.to_string()
    } else {
        format!("{}...", &error[..floor_char_boundary(error, MAX_ERROR_LENGTH)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_short_untouched() {
        assert_eq!(truncate_body("DB_PASSWORD=x".to_string()), "DB_PASSWORD=x");
    }

    #[test]
    fn test_truncate_body_respects_char_boundary() {
        let body = "é".repeat(MAX_BODY_LENGTH);
        let out = truncate_body(body);
        assert!(out.len() <= MAX_BODY_LENGTH);
        assert!(out.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_truncate_error_appends_ellipsis() {
        let long = "x".repeat(MAX_ERROR_LENGTH + 10);
        let out = truncate_error(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.len(), MAX_ERROR_LENGTH + 3);
    }
}
