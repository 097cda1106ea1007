use std::fmt;

use crate::error::{CommandResult, SyntaxErrorKind};
use crate::reader::TextReader;

use super::ArgumentType;

/// Defines a bounded numeric argument type.
///
/// A value outside `min..=max` is reported with the cursor reset to the start
/// of the number.
macro_rules! numeric_argument {
    (
        $(#[$meta:meta])*
        $name:ident, $ty:ty, $read:ident, $too_low:ident, $too_high:ident, [$($example:expr),* $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            min: $ty,
            max: $ty,
        }

        impl $name {
            /// Accept values in `min..=max`.
            pub fn new(min: $ty, max: $ty) -> Self {
                Self { min, max }
            }

            /// Smallest accepted value.
            pub fn minimum(&self) -> $ty {
                self.min
            }

            /// Largest accepted value.
            pub fn maximum(&self) -> $ty {
                self.max
            }
        }

        impl<S> ArgumentType<S> for $name {
            type Value = $ty;

            fn parse(&self, reader: &mut TextReader<'_>) -> CommandResult<$ty> {
                let start = reader.cursor();
                let found = reader.$read()?;
                if found < self.min {
                    reader.set_cursor(start);
                    return Err(SyntaxErrorKind::$too_low { found, min: self.min }
                        .create_with_context(reader));
                }
                if found > self.max {
                    reader.set_cursor(start);
                    return Err(SyntaxErrorKind::$too_high { found, max: self.max }
                        .create_with_context(reader));
                }
                Ok(found)
            }

            fn examples(&self) -> Vec<String> {
                vec![$($example.to_owned()),*]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let unbounded_min = self.min == <$ty>::MIN;
                let unbounded_max = self.max == <$ty>::MAX;
                match (unbounded_min, unbounded_max) {
                    (true, true) => write!(f, "{}()", stringify!($ty)),
                    (false, true) => write!(f, "{}({})", stringify!($ty), self.min),
                    _ => write!(f, "{}({}, {})", stringify!($ty), self.min, self.max),
                }
            }
        }
    };
}

numeric_argument!(
    /// A 16-bit integer argument.
    ShortArgument, i16, read_short, ShortTooLow, ShortTooHigh, ["0", "123", "-123"]
);
numeric_argument!(
    /// A 32-bit integer argument.
    IntegerArgument, i32, read_int, IntegerTooLow, IntegerTooHigh, ["0", "123", "-123"]
);
numeric_argument!(
    /// A 64-bit integer argument.
    LongArgument, i64, read_long, LongTooLow, LongTooHigh, ["0", "123", "-123"]
);
numeric_argument!(
    /// A 32-bit floating-point argument.
    FloatArgument, f32, read_float, FloatTooLow, FloatTooHigh,
    ["0", "1.2", ".5", "-1", "-.5", "-1234.56"]
);
numeric_argument!(
    /// A 64-bit floating-point argument.
    DoubleArgument, f64, read_double, DoubleTooLow, DoubleTooHigh,
    ["0", "1.2", ".5", "-1", "-.5", "-1234.56"]
);

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: ArgumentType<()>>(arg: &T, input: &str) -> CommandResult<T::Value> {
        let mut reader = TextReader::new(input);
        arg.parse(&mut reader)
    }

    #[test]
    fn integer_parses() {
        let mut reader = TextReader::new("15 rest");
        let value = ArgumentType::<()>::parse(&IntegerArgument::new(0, 100), &mut reader).unwrap();
        assert_eq!(value, 15);
        assert_eq!(reader.remaining(), " rest");
    }

    #[test]
    fn integer_too_small() {
        let err = parse(&IntegerArgument::new(0, 100), "-5").unwrap_err();
        assert_eq!(err.kind(), &SyntaxErrorKind::IntegerTooLow { found: -5, min: 0 });
        assert_eq!(err.cursor(), Some(0));
    }

    #[test]
    fn integer_too_big() {
        let mut reader = TextReader::new("x 5");
        reader.set_cursor(2);
        let err = ArgumentType::<()>::parse(&IntegerArgument::new(-100, 0), &mut reader).unwrap_err();
        assert_eq!(err.kind(), &SyntaxErrorKind::IntegerTooHigh { found: 5, max: 0 });
        assert_eq!(err.cursor(), Some(2));
    }

    #[test]
    fn bounds_are_inclusive() {
        let arg = IntegerArgument::new(1, 64);
        assert_eq!(parse(&arg, "1").unwrap(), 1);
        assert_eq!(parse(&arg, "64").unwrap(), 64);
    }

    #[test]
    fn long_and_double() {
        assert_eq!(parse(&LongArgument::new(0, i64::MAX), "5000000000").unwrap(), 5_000_000_000);
        let err = parse(&DoubleArgument::new(0.0, 1.0), "1.5").unwrap_err();
        assert_eq!(err.kind(), &SyntaxErrorKind::DoubleTooHigh { found: 1.5, max: 1.0 });
        assert_eq!(parse(&FloatArgument::new(-1.0, 1.0), "-.5").unwrap(), -0.5);
    }

    #[test]
    fn short_bounds_and_overflow() {
        let arg = ShortArgument::new(-10, 300);
        assert_eq!(parse(&arg, "300").unwrap(), 300);
        let err = parse(&arg, "301").unwrap_err();
        assert_eq!(err.kind(), &SyntaxErrorKind::ShortTooHigh { found: 301, max: 300 });
        assert_eq!(err.cursor(), Some(0));

        let err = parse(&ShortArgument::new(i16::MIN, i16::MAX), "40000").unwrap_err();
        assert_eq!(err.kind(), &SyntaxErrorKind::InvalidShort("40000".into()));
        assert_eq!(ShortArgument::new(0, i16::MAX).to_string(), "i16(0)");
    }

    #[test]
    fn examples_parse_unbounded() {
        let arg = DoubleArgument::new(f64::MIN, f64::MAX);
        for example in ArgumentType::<()>::examples(&arg) {
            assert!(parse(&arg, &example).is_ok(), "example {example} should parse");
        }
    }

    #[test]
    fn display() {
        assert_eq!(IntegerArgument::new(i32::MIN, i32::MAX).to_string(), "i32()");
        assert_eq!(IntegerArgument::new(0, i32::MAX).to_string(), "i32(0)");
        assert_eq!(LongArgument::new(-1, 1).to_string(), "i64(-1, 1)");
    }
}
