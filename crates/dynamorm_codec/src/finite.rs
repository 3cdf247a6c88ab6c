//! Pre-encoding check that a record holds no NaN or infinite floats.
//!
//! `serde_json` quietly turns non-finite floats into `null`, which would
//! store a NULL attribute in place of the caller's number. Walking the record
//! once with [`FiniteFloats`] first turns that into an encoding error.

use crate::error::{CodecError, CodecResult};
use serde::ser::{self, Serialize};

/// Fails if any float reachable from `value` is NaN or infinite.
pub(crate) fn ensure_finite<T: Serialize + ?Sized>(value: &T) -> CodecResult<()> {
    value.serialize(FiniteFloats)
}

/// A serializer that produces nothing and only inspects floats.
struct FiniteFloats;

fn check(value: f64) -> CodecResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CodecError::encoding_failed(format!(
            "{value} cannot be stored as a number"
        )))
    }
}

impl ser::Serializer for FiniteFloats {
    type Ok = ();
    type Error = CodecError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_f32(self, v: f32) -> CodecResult<()> {
        check(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> CodecResult<()> {
        check(v)
    }

    fn serialize_bool(self, _: bool) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_i128(self, _: i128) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_u128(self, _: u128) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_char(self, _: char) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_none(self) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> CodecResult<()> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> CodecResult<()> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> CodecResult<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> CodecResult<()> {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> CodecResult<Self> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> CodecResult<Self> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> CodecResult<Self> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> CodecResult<Self> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> CodecResult<Self> {
        Ok(self)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> CodecResult<Self> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> CodecResult<Self> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteFloats {
    type Ok = ();
    type Error = CodecError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> CodecResult<()> {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteFloats {
    type Ok = ();
    type Error = CodecError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> CodecResult<()> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteFloats {
    type Ok = ();
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> CodecResult<()> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteFloats {
    type Ok = ();
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> CodecResult<()> {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteFloats {
    type Ok = ();
    type Error = CodecError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> CodecResult<()> {
        key.serialize(FiniteFloats)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> CodecResult<()> {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteFloats {
    type Ok = ();
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> CodecResult<()> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> CodecResult<()> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteFloats {
    type Ok = ();
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> CodecResult<()> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> CodecResult<()> {
        Ok(())
    }
}
