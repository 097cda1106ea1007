use std::fmt;

use uuid::Uuid;

use crate::error::{CommandResult, SyntaxErrorKind};
use crate::reader::TextReader;

use super::ArgumentType;

/// A UUID written as one unquoted token.
///
/// Accepts the hyphenated `8-4-4-4-12` form and the same 32 hex digits
/// without dashes. Hex digits are case-insensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UuidArgument;

impl<S> ArgumentType<S> for UuidArgument {
    type Value = Uuid;

    fn parse(&self, reader: &mut TextReader<'_>) -> CommandResult<Uuid> {
        let start = reader.cursor();
        let token = reader.read_unquoted_string();
        let parsed = match token.len() {
            32 | 36 => Uuid::try_parse(token).ok(),
            _ => None,
        };
        parsed.ok_or_else(|| {
            let found = token.to_owned();
            reader.set_cursor(start);
            SyntaxErrorKind::InvalidUuid(found).create_with_context(reader)
        })
    }

    fn examples(&self) -> Vec<String> {
        vec![
            "dd12be42-52a9-4a91-a8a1-11c01849e498".to_owned(),
            "dd12be4252a94a91a8a111c01849e498".to_owned(),
        ]
    }
}

impl fmt::Display for UuidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("uuid()")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> CommandResult<Uuid> {
        let mut reader = TextReader::new(input);
        ArgumentType::<()>::parse(&UuidArgument, &mut reader)
    }

    #[test]
    fn dashed_and_plain_forms_agree() {
        let dashed = parse("dd12be42-52a9-4a91-a8a1-11c01849e498").unwrap();
        let plain = parse("DD12BE4252A94A91A8A111C01849E498").unwrap();
        assert_eq!(dashed, plain);
        assert_eq!(dashed.to_string(), "dd12be42-52a9-4a91-a8a1-11c01849e498");
    }

    #[test]
    fn stops_at_whitespace() {
        let mut reader = TextReader::new("dd12be4252a94a91a8a111c01849e498 rest");
        ArgumentType::<()>::parse(&UuidArgument, &mut reader).unwrap();
        assert_eq!(reader.remaining(), " rest");
    }

    #[test]
    fn rejects_malformed_tokens() {
        for input in [
            "dd12be42",
            "dd12be42-52a9-4a91-a8a1-11c01849e49z",
            "{dd12be4252a94a91a8a111c01849e498}",
        ] {
            let err = parse(input).unwrap_err();
            assert!(matches!(err.kind(), SyntaxErrorKind::InvalidUuid(_)), "input {input}");
            assert_eq!(err.cursor(), Some(0));
        }
    }

    #[test]
    fn examples_parse() {
        for example in ArgumentType::<()>::examples(&UuidArgument) {
            assert!(parse(&example).is_ok(), "example {example} should parse");
        }
    }
}
