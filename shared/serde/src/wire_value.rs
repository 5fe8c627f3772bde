use std::fmt;

use crate::{Serde, SerdeErr, StreamReader, StreamWriter, Vec2};

// Declares the closed set of types that can travel as RPC parameters or
// constructor arguments. Each entry is `Variant(Type) = tag, "name", accessor`.
macro_rules! wire_set {
    ($( $variant:ident ( $ty:ty ) = $tag:literal, $name:literal, $accessor:ident; )*) => {
        /// Type descriptor of a value that can be carried on the wire
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum WireType {
            $( $variant, )*
        }

        impl WireType {
            pub const ALL: &'static [WireType] = &[ $( WireType::$variant, )* ];

            /// One-byte tag used by the self-describing encoding
            pub fn tag(self) -> u8 {
                match self {
                    $( WireType::$variant => $tag, )*
                }
            }

            pub fn from_tag(tag: u8) -> Result<Self, SerdeErr> {
                match tag {
                    $( $tag => Ok(WireType::$variant), )*
                    _ => Err(SerdeErr::UnsupportedType { tag }),
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $( WireType::$variant => $name, )*
                }
            }
        }

        /// A dynamically typed wire value
        #[derive(Debug, Clone, PartialEq)]
        pub enum WireValue {
            $( $variant($ty), )*
        }

        impl WireValue {
            pub fn wire_type(&self) -> WireType {
                match self {
                    $( WireValue::$variant(_) => WireType::$variant, )*
                }
            }

            /// Reads a value of a known type (no tag).
            pub fn read(wire_type: WireType, reader: &mut StreamReader) -> Result<Self, SerdeErr> {
                match wire_type {
                    $( WireType::$variant => Ok(WireValue::$variant(<$ty as Serde>::de(reader)?)), )*
                }
            }

            /// Writes the value without a tag.
            pub fn write(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
                match self {
                    $( WireValue::$variant(value) => value.ser(writer), )*
                }
            }

            pub fn byte_length(&self) -> usize {
                match self {
                    $( WireValue::$variant(value) => value.byte_length(), )*
                }
            }

            $(
                pub fn $accessor(&self) -> Option<&$ty> {
                    match self {
                        WireValue::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            )*
        }

        $(
            impl From<$ty> for WireValue {
                fn from(value: $ty) -> Self {
                    WireValue::$variant(value)
                }
            }
        )*
    };
}

wire_set! {
    I64(i64) = 1, "i64", as_i64;
    U64(u64) = 2, "u64", as_u64;
    I32(i32) = 3, "i32", as_i32;
    U32(u32) = 4, "u32", as_u32;
    I16(i16) = 5, "i16", as_i16;
    U16(u16) = 6, "u16", as_u16;
    Bool(bool) = 7, "bool", as_bool;
    U8(u8) = 8, "u8", as_u8;
    F32(f32) = 9, "f32", as_f32;
    F64(f64) = 10, "f64", as_f64;
    String(String) = 11, "String", as_string;
    I64Array(Vec<i64>) = 12, "[i64]", as_i64_array;
    U64Array(Vec<u64>) = 13, "[u64]", as_u64_array;
    I32Array(Vec<i32>) = 14, "[i32]", as_i32_array;
    U32Array(Vec<u32>) = 15, "[u32]", as_u32_array;
    I16Array(Vec<i16>) = 16, "[i16]", as_i16_array;
    U16Array(Vec<u16>) = 17, "[u16]", as_u16_array;
    BoolArray(Vec<bool>) = 18, "[bool]", as_bool_array;
    U8Array(Vec<u8>) = 19, "[u8]", as_u8_array;
    F32Array(Vec<f32>) = 20, "[f32]", as_f32_array;
    F64Array(Vec<f64>) = 21, "[f64]", as_f64_array;
    StringArray(Vec<String>) = 22, "[String]", as_string_array;
    Vec2(Vec2) = 23, "Vec2", as_vec2;
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        WireValue::String(value.to_string())
    }
}

/// Writes `value` as `wire_type`, failing if the value is of another type.
pub fn write(wire_type: WireType, value: &WireValue, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
    let actual = value.wire_type();
    if actual != wire_type {
        return Err(SerdeErr::TypeMismatch {
            expected: wire_type,
            actual,
        });
    }
    value.write(writer)
}

pub fn read(wire_type: WireType, reader: &mut StreamReader) -> Result<WireValue, SerdeErr> {
    WireValue::read(wire_type, reader)
}

/// Writes a one-byte type tag followed by the value.
pub fn write_tagged(value: &WireValue, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
    writer.write_byte(value.wire_type().tag());
    value.write(writer)
}

pub fn read_tagged(reader: &mut StreamReader) -> Result<WireValue, SerdeErr> {
    let wire_type = WireType::from_tag(reader.read_byte()?)?;
    WireValue::read(wire_type, reader)
}

/// Reads tagged values until the reader is exhausted.
pub fn read_tagged_all(reader: &mut StreamReader) -> Result<Vec<WireValue>, SerdeErr> {
    let mut output = Vec::new();
    while !reader.is_empty() {
        output.push(read_tagged(reader)?);
    }
    Ok(output)
}
