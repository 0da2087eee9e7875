use crate::error::PackError;
use std::fmt;

/// Resource-pack format numbers the builder accepts.
///
/// See <https://minecraft.wiki/w/Pack_format> for the release mapping.
pub const VALID_PACK_FORMATS: [u32; 5] = [
    8,  // 1.18 - 1.18.2
    9,  // 1.19 - 1.19.2
    12, // 1.19.3
    15, // 1.20 - 1.20.1
    18, // 1.20.2
];

/// A pack format that is known to be a member of [`VALID_PACK_FORMATS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackFormat(u32);

impl PackFormat {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<i64> for PackFormat {
    type Error = PackError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .filter(|format| VALID_PACK_FORMATS.contains(format))
            .map(PackFormat)
            .ok_or_else(|| PackError::InvalidFormat {
                value: value.to_string(),
            })
    }
}

/// Coerce `value` to an integer and check it against the allow-list.
pub fn validate_format(value: &str) -> Result<PackFormat, PackError> {
    let parsed: i64 = value.trim().parse().map_err(|_| PackError::InvalidFormat {
        value: value.to_string(),
    })?;
    PackFormat::try_from(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_known_format() {
        for value in VALID_PACK_FORMATS {
            let format = validate_format(&value.to_string()).expect("known format");
            assert_eq!(format.get(), value);
        }
        assert_eq!(validate_format(" 18 ").expect("padded").get(), 18);
    }

    #[test]
    fn rejects_unknown_integers() {
        for value in [-8, 0, 1, 7, 10, 13, 16, 19, 34, i64::MAX] {
            let err = PackFormat::try_from(value).expect_err("unknown format");
            assert!(
                matches!(err, PackError::InvalidFormat { ref value } if !value.is_empty()),
                "unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn rejects_non_numeric_input() {
        for value in ["", "fifteen", "15.0", "0x0f", "1 5"] {
            assert!(
                matches!(
                    validate_format(value),
                    Err(PackError::InvalidFormat { .. })
                ),
                "{value:?} should be rejected"
            );
        }
    }
}
