//! Diagnostic ID constants.
//!
//! Codes are grouped by the stage that produces them: `CMD1xxx` for the text
//! reader and argument values, `CMD2xxx` for grammar matching, `CMD3xxx` for
//! dispatch, and `CMD4xxx` for execution and tree analysis.

// ── Reader / value ──────────────────────────────────────────────────────

/// A quoted string was expected but the next character is not a quote.
pub const EXPECTED_START_OF_QUOTE: &str = "CMD1001";
/// A quoted string was opened but never closed.
pub const EXPECTED_END_OF_QUOTE: &str = "CMD1002";
/// A backslash inside a quoted string escapes an unsupported character.
pub const INVALID_ESCAPE: &str = "CMD1003";
/// A specific symbol was required at the cursor.
pub const EXPECTED_SYMBOL: &str = "CMD1004";
/// A numeric token (integer, long, float, double) was required but absent.
pub const EXPECTED_NUMBER: &str = "CMD1010";
/// A numeric token was present but could not be parsed as the target type.
pub const INVALID_NUMBER: &str = "CMD1011";
/// A boolean token was required but absent.
pub const EXPECTED_BOOL: &str = "CMD1012";
/// A token was present but is neither `true` nor `false`.
pub const INVALID_BOOL: &str = "CMD1013";
/// A numeric value is below the argument's minimum.
pub const NUMBER_TOO_LOW: &str = "CMD1020";
/// A numeric value is above the argument's maximum.
pub const NUMBER_TOO_HIGH: &str = "CMD1021";
/// A token is not one of the argument's predefined terms.
pub const INVALID_TERM: &str = "CMD1030";
/// A token is not a UUID in either the dashed or the plain hex form.
pub const INVALID_UUID: &str = "CMD1031";

// ── Grammar ─────────────────────────────────────────────────────────────

/// The input token does not match the literal expected at this position.
pub const LITERAL_INCORRECT: &str = "CMD2001";

// ── Dispatch ────────────────────────────────────────────────────────────

/// No registered command matches the first token.
pub const UNKNOWN_COMMAND: &str = "CMD3001";
/// A command matched but trailing input could not be consumed.
pub const UNKNOWN_ARGUMENT: &str = "CMD3002";
/// An argument value ran into trailing data without a separating space.
pub const EXPECTED_ARGUMENT_SEPARATOR: &str = "CMD3003";
/// An argument parser failed in a way it did not report as a syntax error.
pub const PARSE_EXCEPTION: &str = "CMD3004";

// ── Execution / analysis ────────────────────────────────────────────────

/// A command executor or redirect modifier reported a failure.
pub const COMMAND_FAILED: &str = "CMD4001";
/// Two sibling nodes accept the same example input.
pub const AMBIGUOUS_INPUT: &str = "CMD4002";

/// Every code defined in this module, in declaration order.
pub const ALL: &[&str] = &[
    EXPECTED_START_OF_QUOTE,
    EXPECTED_END_OF_QUOTE,
    INVALID_ESCAPE,
    EXPECTED_SYMBOL,
    EXPECTED_NUMBER,
    INVALID_NUMBER,
    EXPECTED_BOOL,
    INVALID_BOOL,
    NUMBER_TOO_LOW,
    NUMBER_TOO_HIGH,
    INVALID_TERM,
    INVALID_UUID,
    LITERAL_INCORRECT,
    UNKNOWN_COMMAND,
    UNKNOWN_ARGUMENT,
    EXPECTED_ARGUMENT_SEPARATOR,
    PARSE_EXCEPTION,
    COMMAND_FAILED,
    AMBIGUOUS_INPUT,
];

/// Human-readable explanation for a diagnostic code.
pub(crate) fn explanation(id: &str) -> Option<&'static str> {
    let text = match id {
        EXPECTED_START_OF_QUOTE => {
            "A quoted string argument must begin with `\"` or `'`. Wrap the value in quotes."
        }
        EXPECTED_END_OF_QUOTE => {
            "A quoted string reached the end of input without its closing quote."
        }
        INVALID_ESCAPE => {
            "Inside a quoted string a backslash may only escape the quote character or another backslash."
        }
        EXPECTED_SYMBOL => "A specific character was required at this position.",
        EXPECTED_NUMBER => "The argument expects a number here but no numeric characters were found.",
        INVALID_NUMBER => {
            "The token looks numeric but is not a valid value for the argument's number type (overflow or malformed literal)."
        }
        EXPECTED_BOOL => "The argument expects `true` or `false` here but found nothing.",
        INVALID_BOOL => "Boolean arguments only accept `true` or `false`.",
        NUMBER_TOO_LOW => "The value is smaller than the minimum allowed for this argument.",
        NUMBER_TOO_HIGH => "The value is larger than the maximum allowed for this argument.",
        INVALID_TERM => "The argument only accepts one of a fixed set of terms.",
        INVALID_UUID => {
            "UUID arguments take 32 hex digits, either plain or grouped 8-4-4-4-12 with dashes."
        }
        LITERAL_INCORRECT => "The token does not match the keyword expected at this position.",
        UNKNOWN_COMMAND => "No registered command starts with this token, or the sender may not use it.",
        UNKNOWN_ARGUMENT => {
            "The command was recognised but the remaining input does not match any of its arguments."
        }
        EXPECTED_ARGUMENT_SEPARATOR => {
            "An argument was parsed but is followed directly by more text; arguments are separated by a single space."
        }
        PARSE_EXCEPTION => "An argument parser failed unexpectedly while reading this token.",
        COMMAND_FAILED => "The command was parsed correctly but reported a failure while running.",
        AMBIGUOUS_INPUT => {
            "Sibling nodes accept the same input; the earlier-registered (or literal) node always wins."
        }
        _ => return None,
    };
    Some(text)
}
