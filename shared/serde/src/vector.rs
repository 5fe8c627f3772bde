use crate::{ConstByteLength, Serde, SerdeErr, StreamReader, StreamWriter};

/// 2-D vector, encoded as two consecutive `f32`s (x then y).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Serde for Vec2 {
    const MIN_BYTE_LENGTH: usize = 8;

    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        self.x.ser(writer)?;
        self.y.ser(writer)
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let x = f32::de(reader)?;
        let y = f32::de(reader)?;
        Ok(Self { x, y })
    }

    fn byte_length(&self) -> usize {
        8
    }
}

impl ConstByteLength for Vec2 {
    fn const_byte_length() -> usize {
        8
    }
}
