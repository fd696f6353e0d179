#[macro_export]
macro_rules! agg_mod {
    [ $( $name:ident $(,)? )+ ] => {
        $(
            pub mod $name;
        )+
    };
}

/// Generates `as_str`, case-insensitive `FromStr` and `Display` for a closed
/// set of unit variants spelled exactly as their wire names.
#[macro_export]
macro_rules! impl_str_enum {
    ($enum_name:ident, $label:literal, $( $variant:ident ),*) => {
        impl $enum_name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $enum_name::$variant => stringify!($variant), )*
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case(stringify!($variant)) {
                        return Ok($enum_name::$variant);
                    }
                )*
                Err(format!("invalid {}: {}", $label, s))
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
