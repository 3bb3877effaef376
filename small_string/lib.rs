// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::cmp::Ordering;
use core::fmt;

/// Maximum number of bytes a [SmallString] can inline.
pub const MAX_LEN: usize = 7;

/// Padding byte; never part of valid UTF-8.
const PAD: u8 = 0xFF;

/// Short UTF-8 string stored inline in 7 bytes.
///
/// Used for property keys and string values that are short enough to not
/// require a heap allocation. Two small strings are equal exactly when their
/// contents are equal, which makes them usable directly as hash keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SmallString {
    /// The string will be padded to 7 bytes with the 0xFF byte.
    bytes: [u8; MAX_LEN],
}

impl Ord for SmallString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl PartialOrd for SmallString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<str> for SmallString {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_bytes().eq(other.as_bytes())
    }
}

impl PartialEq<&str> for SmallString {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.eq(*other)
    }
}

impl fmt::Debug for SmallString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.as_str())
    }
}

impl fmt::Display for SmallString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SmallString {
    pub const EMPTY: SmallString = Self {
        bytes: [PAD; MAX_LEN],
    };

    pub const fn len(&self) -> usize {
        // Find the first padding byte: UTF-8 never contains 0xFF so it must
        // mark the end of the string.
        let mut i = 0;
        while i < MAX_LEN {
            if self.bytes[i] == PAD {
                return i;
            }
            i += 1;
        }
        MAX_LEN
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bytes[0] == PAD
    }

    #[inline]
    pub const fn is_ascii(&self) -> bool {
        self.as_bytes().is_ascii()
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8] {
        self.bytes.split_at(self.len()).0
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: SmallStrings are only ever constructed from str data, and
        // the cut-off point is always at a char boundary.
        unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// Create a [SmallString] from a [str] without checking that it is small
    /// enough to fit in the inline buffer.
    ///
    /// # Safety
    ///
    /// Caller must ensure that `string` is 7 bytes or fewer long.
    pub const unsafe fn from_str_unchecked(string: &str) -> Self {
        let string_bytes = string.as_bytes();
        debug_assert!(string_bytes.len() <= MAX_LEN);
        let mut bytes = [PAD; MAX_LEN];
        let mut i = 0;
        while i < string_bytes.len() {
            bytes[i] = string_bytes[i];
            i += 1;
        }
        Self { bytes }
    }

    pub fn from_char(ch: char) -> Self {
        let mut buf = [0u8; 4];
        let string = ch.encode_utf8(&mut buf);
        // SAFETY: a char is at most 4 bytes of UTF-8.
        unsafe { Self::from_str_unchecked(string) }
    }
}

impl TryFrom<&str> for SmallString {
    type Error = ();
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // We have only 7 bytes to work with, so we must fail to convert if the
        // string is longer than that.
        if value.len() <= MAX_LEN {
            // SAFETY: we just checked that the string is 7 bytes or fewer.
            Ok(unsafe { Self::from_str_unchecked(value) })
        } else {
            Err(())
        }
    }
}

impl From<char> for SmallString {
    fn from(value: char) -> Self {
        Self::from_char(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn valid_stack_strings() {
        assert!(SmallString::try_from("").is_ok());
        assert_eq!(SmallString::try_from("").unwrap().len(), 0);
        assert!(SmallString::try_from("asd").is_ok());
        assert_eq!(SmallString::try_from("asd").unwrap().len(), 3);
        assert!(SmallString::try_from("asdasd").is_ok());
        assert_eq!(SmallString::try_from("asdasd").unwrap().len(), 6);
        assert!(SmallString::try_from("asdasda").is_ok());
        assert_eq!(SmallString::try_from("asdasda").unwrap().len(), 7);
        assert!(SmallString::try_from("asd76fd").is_ok());
        assert_eq!(SmallString::try_from("asd76fd").unwrap().len(), 7);
        assert!(SmallString::try_from("💩").is_ok());
        assert_eq!(SmallString::try_from("💩 ").unwrap().len(), 5);
    }

    #[test]
    fn not_valid_stack_strings() {
        assert!(SmallString::try_from("asd asd r 547 gdfg").is_err());
        assert!(SmallString::try_from("hello world").is_err());
    }

    #[test]
    fn round_trips_contents() {
        let s = SmallString::try_from("$").unwrap();
        assert_eq!(s.as_str(), "$");
        assert_eq!(s, "$");
        assert!(SmallString::EMPTY.is_empty());
        assert_eq!(SmallString::from('é').as_str(), "é");
    }

    #[test]
    fn orders_by_bytes() {
        let a = SmallString::try_from("a").unwrap();
        let ab = SmallString::try_from("ab").unwrap();
        assert!(a < ab);
    }
}
