use crate::{SerdeErr, StreamReader, StreamWriter};

/// A type with a fixed wire encoding.
pub trait Serde: Sized {
    /// Smallest possible encoding, used to sanity check untrusted counts
    const MIN_BYTE_LENGTH: usize;

    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr>;

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr>;

    fn byte_length(&self) -> usize;
}

pub trait ConstByteLength {
    fn const_byte_length() -> usize;
}

macro_rules! impl_serde_number {
    ($($ty:ty),* $(,)?) => {$(
        impl Serde for $ty {
            const MIN_BYTE_LENGTH: usize = std::mem::size_of::<$ty>();

            fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
                writer.write_bytes(&self.to_le_bytes());
                Ok(())
            }

            fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
                Ok(<$ty>::from_le_bytes(reader.read_array()?))
            }

            fn byte_length(&self) -> usize {
                Self::MIN_BYTE_LENGTH
            }
        }

        impl ConstByteLength for $ty {
            fn const_byte_length() -> usize {
                std::mem::size_of::<$ty>()
            }
        }
    )*};
}

impl_serde_number!(u8, u16, u32, u64, i16, i32, i64, f32, f64);

impl Serde for bool {
    const MIN_BYTE_LENGTH: usize = 1;

    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_byte(u8::from(*self));
        Ok(())
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(SerdeErr::InvalidBool { byte }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for bool {
    fn const_byte_length() -> usize {
        1
    }
}

impl Serde for String {
    const MIN_BYTE_LENGTH: usize = 4;

    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_blob(self.as_bytes())
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let length = reader.read_length()?;
        let bytes = reader.read_bytes(length)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| SerdeErr::InvalidUtf8)
    }

    fn byte_length(&self) -> usize {
        4 + self.len()
    }
}

impl<T: Serde> Serde for Vec<T> {
    const MIN_BYTE_LENGTH: usize = 4;

    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_length(self.len())?;
        for item in self {
            item.ser(writer)?;
        }
        Ok(())
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let count = reader.read_length()?;
        reader.ensure_elements(count, T::MIN_BYTE_LENGTH)?;
        let mut output = Vec::with_capacity(count);
        for _ in 0..count {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }

    fn byte_length(&self) -> usize {
        4 + self.iter().map(Serde::byte_length).sum::<usize>()
    }
}
