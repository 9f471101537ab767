// regerror.rs - Error code to message conversion.

use crate::regdef::*;

/// Get the format string for an error code.
pub fn error_code_to_format(code: i32) -> &'static str {
    match code {
        ERR_PARSER_BUG => "internal parser error (bug)",
        ERR_PARSE_DEPTH_LIMIT_OVER => "parse depth limit over",
        ERR_PREMATURE_END_OF_CHAR_CLASS => "premature end of char-class",
        ERR_END_PATTERN_AT_ESCAPE => "end pattern at escape",
        ERR_CHAR_CLASS_VALUE_AT_END_OF_RANGE => "char-class value at end of range",
        ERR_CHAR_CLASS_VALUE_AT_START_OF_RANGE => "char-class value at start of range",
        ERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED => {
            "target of repeat operator is not specified"
        }
        ERR_TARGET_OF_REPEAT_OPERATOR_INVALID => "target of repeat operator is invalid",
        ERR_NESTED_REPEAT_OPERATOR => "nested repeat operator",
        ERR_UNMATCHED_CLOSE_PARENTHESIS => "unmatched close parenthesis",
        ERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS => "end pattern with unmatched parenthesis",
        ERR_END_PATTERN_IN_GROUP => "end pattern in group",
        ERR_UNDEFINED_GROUP_OPTION => "undefined group option",
        ERR_INVALID_ESCAPE => "invalid escape <%n>",
        ERR_INVALID_LOOK_BEHIND_PATTERN => "invalid pattern in look-behind",
        ERR_GLOBAL_FLAGS_NOT_AT_START => "global flags not at the start of the expression",
        ERR_INVALID_INLINE_FLAGS => "invalid inline flags <%n>",
        ERR_TOO_BIG_NUMBER_FOR_REPEAT_RANGE => "too big number for repeat range",
        ERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE => {
            "upper is smaller than lower in repeat range"
        }
        ERR_EMPTY_RANGE_IN_CHAR_CLASS => "empty range in char class",
        ERR_INVALID_BACKREF => "invalid backref number/name",
        ERR_TOO_MANY_CAPTURES => "too many captures",
        ERR_EMPTY_GROUP_NAME => "group name is empty",
        ERR_INVALID_GROUP_NAME => "invalid group name <%n>",
        ERR_INVALID_CHAR_IN_GROUP_NAME => "invalid char in group name <%n>",
        ERR_UNDEFINED_NAME_REFERENCE => "undefined name <%n> reference",
        ERR_MULTIPLEX_DEFINED_NAME => "multiplex defined name <%n>",
        ERR_INVALID_CODE_POINT_VALUE => "invalid code point value",
        ERR_GROUP_NOT_FOUND => "no such group <%n>",
        ERR_INVALID_GROUP_REFERENCE => "invalid group reference <%n>",
        _ => "undefined error code",
    }
}

/// Check if an error code requires a parameter (name/pattern text).
pub fn is_error_code_needs_param(code: i32) -> bool {
    matches!(
        code,
        ERR_INVALID_ESCAPE
            | ERR_INVALID_GROUP_NAME
            | ERR_INVALID_CHAR_IN_GROUP_NAME
            | ERR_UNDEFINED_NAME_REFERENCE
            | ERR_MULTIPLEX_DEFINED_NAME
            | ERR_GROUP_NOT_FOUND
            | ERR_INVALID_GROUP_REFERENCE
            | ERR_INVALID_INLINE_FLAGS
    )
}

/// Convert an error code to a human-readable string.
/// For parameterized errors, pass the parameter text in `param`.
pub fn error_code_to_str(code: i32, param: Option<&str>) -> String {
    let fmt = error_code_to_format(code);

    if is_error_code_needs_param(code) {
        let par = param
            .unwrap_or("")
            .chars()
            .map(|c| {
                if c.is_control() {
                    c.escape_default().to_string()
                } else {
                    c.to_string()
                }
            })
            .collect::<String>();
        fmt.replace("%n", &par)
    } else {
        fmt.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_errors() {
        assert_eq!(
            error_code_to_str(ERR_GLOBAL_FLAGS_NOT_AT_START, None),
            "global flags not at the start of the expression"
        );
        assert_eq!(
            error_code_to_str(ERR_INVALID_INLINE_FLAGS, Some("(?-i)")),
            "invalid inline flags <(?-i)>"
        );
    }

    #[test]
    fn test_undefined_error() {
        assert_eq!(error_code_to_str(-9999, None), "undefined error code");
    }

    #[test]
    fn test_parameterized_error() {
        let msg = error_code_to_str(ERR_UNDEFINED_NAME_REFERENCE, Some("foo"));
        assert_eq!(msg, "undefined name <foo> reference");
    }

    #[test]
    fn test_parameterized_error_no_param() {
        let msg = error_code_to_str(ERR_MULTIPLEX_DEFINED_NAME, None);
        assert_eq!(msg, "multiplex defined name <>");
    }

    #[test]
    fn test_control_chars_escaped() {
        let msg = error_code_to_str(ERR_INVALID_GROUP_NAME, Some("a\tb"));
        assert_eq!(msg, "invalid group name <a\\tb>");
    }

    #[test]
    fn test_needs_param() {
        assert!(is_error_code_needs_param(ERR_INVALID_GROUP_REFERENCE));
        assert!(!is_error_code_needs_param(ERR_NESTED_REPEAT_OPERATOR));
        assert!(is_error_code_needs_param(ERR_INVALID_INLINE_FLAGS));
    }
}
