//! Message assembly for the concatenate and `ln` call shapes

use super::fields::FieldValue;
use std::borrow::Cow;
use std::fmt::{self, Write};

/// A value that can be passed as a message operand.
///
/// The only thing the joiner needs beyond `Display` is whether the operand
/// is a string, because the concatenate shape separates two adjacent
/// operands only when neither of them is one.
pub trait LogArg: fmt::Display {
    fn is_string(&self) -> bool {
        false
    }
}

impl LogArg for &str {
    fn is_string(&self) -> bool {
        true
    }
}

impl LogArg for String {
    fn is_string(&self) -> bool {
        true
    }
}

impl LogArg for Cow<'_, str> {
    fn is_string(&self) -> bool {
        true
    }
}

impl LogArg for FieldValue {
    fn is_string(&self) -> bool {
        FieldValue::is_string(self)
    }
}

macro_rules! impl_non_string_arg {
    ($($t:ty),*) => {
        $(impl LogArg for $t {})*
    };
}

impl_non_string_arg!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char
);

/// Concatenate operands, inserting a space only between two non-strings.
///
/// `("a", "b")` gives `ab`, `("a", 10)` gives `a10`, `(10, 10)` gives `10 10`.
pub fn concat(args: &[&dyn LogArg]) -> String {
    let mut message = String::new();
    let mut prev_string = false;
    for (idx, arg) in args.iter().enumerate() {
        let is_string = arg.is_string();
        if idx > 0 && !is_string && !prev_string {
            message.push(' ');
        }
        // Writing into a String cannot fail
        let _ = write!(message, "{}", arg);
        prev_string = is_string;
    }
    message
}

/// Join operands with single spaces, whatever their types.
pub fn join_spaced(args: &[&dyn LogArg]) -> String {
    let mut message = String::new();
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            message.push(' ');
        }
        let _ = write!(message, "{}", arg);
    }
    message
}
