//! Macros to reduce boilerplate in the codebase

/// Generate the wire-string plumbing for a backend enum.
///
/// Produces `as_str`, `VALID` / `ALL` constants, `Display`, a case-insensitive
/// `FromStr`, and serde impls that read and write the same strings.
///
/// # Usage
///
/// ```rust,ignore
/// enum_display_fromstr!(
///     AssetStatus,
///     "asset status",
///     {
///         EnService => "EN_SERVICE",
///         EnPanne => "EN_PANNE",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $field:expr,
        { $($variant:ident => $str:expr),+ $(,)? }
    ) => {
        impl $enum_name {
            /// All wire values, in declaration order.
            pub const VALID: &'static [&'static str] = &[$($str),+];

            pub const ALL: &'static [$enum_name] = &[$($enum_name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($enum_name::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::ConsoleError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok($enum_name::$variant);
                    }
                )+
                Err($crate::error::ConsoleError::InvalidValue {
                    field: $field,
                    value: s.to_string(),
                    expected: Self::VALID.join(", "),
                })
            }
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[cfg(test)]
mod test {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestEnum {
        First,
        SecondOne,
    }

    enum_display_fromstr!(TestEnum, "test value", {
        First => "FIRST",
        SecondOne => "SECOND_ONE",
    });

    #[test]
    fn test_display() {
        assert_eq!(TestEnum::First.to_string(), "FIRST");
        assert_eq!(TestEnum::SecondOne.to_string(), "SECOND_ONE");
    }

    #[test]
    fn test_fromstr_is_case_insensitive() {
        assert_eq!("second_one".parse::<TestEnum>().unwrap(), TestEnum::SecondOne);
        assert_eq!(" First ".parse::<TestEnum>().unwrap(), TestEnum::First);

        let err = "third".parse::<TestEnum>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid test value 'third', expected one of: FIRST, SECOND_ONE"
        );
    }

    #[test]
    fn test_serde_uses_wire_strings() {
        let json = serde_json::to_string(&TestEnum::SecondOne).unwrap();
        assert_eq!(json, "\"SECOND_ONE\"");
        let back: TestEnum = serde_json::from_str("\"FIRST\"").unwrap();
        assert_eq!(back, TestEnum::First);
        assert!(serde_json::from_str::<TestEnum>("\"NOPE\"").is_err());
    }
}
