//! Primitive wire readers and writers
//!
//! Big-endian integers, classic (i16 length) strings, compact (varint length)
//! strings and arrays, and tagged-field sections of flexible versions.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::CodecError;

pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, need: usize, context: &'static str) -> Result<(), CodecError> {
        if self.buf.remaining() < need {
            return Err(CodecError::Truncated {
                need,
                remaining: self.buf.remaining(),
                context,
            });
        }
        Ok(())
    }

    pub fn read_i8(&mut self, context: &'static str) -> Result<i8, CodecError> {
        self.ensure(1, context)?;
        Ok(self.buf.get_i8())
    }

    pub fn read_i16(&mut self, context: &'static str) -> Result<i16, CodecError> {
        self.ensure(2, context)?;
        Ok(self.buf.get_i16())
    }

    pub fn read_i32(&mut self, context: &'static str) -> Result<i32, CodecError> {
        self.ensure(4, context)?;
        Ok(self.buf.get_i32())
    }

    pub fn read_uvarint(&mut self) -> Result<u32, CodecError> {
        let mut value: u32 = 0;
        for shift in (0..35).step_by(7) {
            self.ensure(1, "varint")?;
            let byte = self.buf.get_u8();
            value |= u32::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(CodecError::VarintOverflow)
    }

    fn read_utf8(&mut self, len: usize, context: &'static str) -> Result<String, CodecError> {
        self.ensure(len, context)?;
        let s = std::str::from_utf8(&self.buf[..len])
            .map_err(|_| CodecError::InvalidUtf8 { context })?
            .to_string();
        self.buf.advance(len);
        Ok(s)
    }

    /// Classic or compact nullable string
    pub fn read_nullable_string(
        &mut self,
        flexible: bool,
        context: &'static str,
    ) -> Result<Option<String>, CodecError> {
        let len = if flexible {
            i64::from(self.read_uvarint()?) - 1
        } else {
            i64::from(self.read_i16(context)?)
        };

        match len {
            -1 => Ok(None),
            n if n < -1 => Err(CodecError::InvalidLength { length: n, context }),
            n => self.read_utf8(n as usize, context).map(Some),
        }
    }

    pub fn read_string(&mut self, flexible: bool, context: &'static str) -> Result<String, CodecError> {
        self.read_nullable_string(flexible, context)?
            .ok_or(CodecError::InvalidLength { length: -1, context })
    }

    /// Array length, classic (i32) or compact (varint + 1)
    pub fn read_array_len(&mut self, flexible: bool, context: &'static str) -> Result<usize, CodecError> {
        let len = if flexible {
            i64::from(self.read_uvarint()?) - 1
        } else {
            i64::from(self.read_i32(context)?)
        };

        if len < 0 {
            return Err(CodecError::InvalidLength { length: len, context });
        }
        // Every element takes at least one byte
        let len = len as usize;
        self.ensure(len, context)?;
        Ok(len)
    }

    /// Skip a tagged-field section; no tags are defined for this message
    pub fn skip_tagged_fields(&mut self) -> Result<(), CodecError> {
        let count = self.read_uvarint()?;
        for _ in 0..count {
            let _tag = self.read_uvarint()?;
            let size = self.read_uvarint()? as usize;
            self.ensure(size, "tagged field")?;
            self.buf.advance(size);
        }
        Ok(())
    }

    pub fn finish(self) -> Result<(), CodecError> {
        match self.buf.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

pub(crate) struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(64),
        }
    }

    pub fn put_i8(&mut self, v: i8) {
        self.buf.put_i8(v);
    }

    pub fn put_i16(&mut self, v: i16) {
        self.buf.put_i16(v);
    }

    pub fn put_i32(&mut self, v: i32) {
        self.buf.put_i32(v);
    }

    pub fn put_uvarint(&mut self, mut v: u32) {
        while v >= 0x80 {
            self.buf.put_u8((v as u8 & 0x7f) | 0x80);
            v >>= 7;
        }
        self.buf.put_u8(v as u8);
    }

    pub fn put_nullable_string(
        &mut self,
        value: Option<&str>,
        flexible: bool,
        context: &'static str,
    ) -> Result<(), CodecError> {
        match (value, flexible) {
            (None, true) => self.put_uvarint(0),
            (None, false) => self.put_i16(-1),
            (Some(s), true) => {
                let len = u32::try_from(s.len())
                    .ok()
                    .and_then(|n| n.checked_add(1))
                    .ok_or(CodecError::InvalidLength {
                        length: s.len() as i64,
                        context,
                    })?;
                self.put_uvarint(len);
                self.buf.put_slice(s.as_bytes());
            }
            (Some(s), false) => {
                let len = i16::try_from(s.len()).map_err(|_| CodecError::InvalidLength {
                    length: s.len() as i64,
                    context,
                })?;
                self.put_i16(len);
                self.buf.put_slice(s.as_bytes());
            }
        }
        Ok(())
    }

    pub fn put_string(&mut self, value: &str, flexible: bool, context: &'static str) -> Result<(), CodecError> {
        self.put_nullable_string(Some(value), flexible, context)
    }

    pub fn put_array_len(&mut self, len: usize, flexible: bool, context: &'static str) -> Result<(), CodecError> {
        let invalid = || CodecError::InvalidLength {
            length: len as i64,
            context,
        };
        if flexible {
            let n = u32::try_from(len).ok().and_then(|n| n.checked_add(1)).ok_or_else(invalid)?;
            self.put_uvarint(n);
        } else {
            self.put_i32(i32::try_from(len).map_err(|_| invalid())?);
        }
        Ok(())
    }

    /// Empty tagged-field section
    pub fn put_empty_tagged_fields(&mut self) {
        self.put_uvarint(0);
    }

    pub fn finish(self) -> BytesMut {
        self.buf
    }
}
