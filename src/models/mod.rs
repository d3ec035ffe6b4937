//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean exactamente
//! a las tablas MySQL. Los estados se guardan como VARCHAR y se
//! convierten a enums al leer cada fila.

pub mod client;
pub mod contract;
pub mod damage_report;
pub mod dashboard;
pub mod invoice;
pub mod reservation;
pub mod role;
pub mod user;
pub mod vehicle;

use thiserror::Error;

/// Valor de texto que no corresponde a ninguna variante del enum
#[derive(Error, Debug, Clone, PartialEq)]
#[error("valor inválido para {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Genera `as_str`, `FromStr`, `TryFrom<String>` y `Display` para enums
/// que se persisten como texto.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err($crate::models::ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::models::ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use text_enum;
