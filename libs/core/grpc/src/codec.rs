//! Byte-level codec helpers.
//!
//! The dispatcher only ever sees `Bytes`. Typed messages are turned into
//! bytes before a call and back after it, so retries can resend the exact
//! same payload without re-encoding.

use bytes::{Buf, BufMut, Bytes};
use tonic::Status;
use tonic::codec::{Codec, DecodeBuf, Decoder, EncodeBuf, Encoder};

use crate::error::DecodeError;

/// Serialize any prost message.
///
/// prost writes fields in tag order, so equal messages always produce
/// equal bytes as long as their maps are ordered.
pub fn encode_message<M: prost::Message>(message: &M) -> Bytes {
  Bytes::from(message.encode_to_vec())
}

/// Parse bytes into a prost message
pub fn decode_message<M: prost::Message + Default>(bytes: Bytes) -> Result<M, DecodeError> {
  M::decode(bytes).map_err(DecodeError::from)
}

/// Tonic codec that passes already-serialized payloads through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl Codec for RawCodec {
  type Encode = Bytes;
  type Decode = Bytes;
  type Encoder = RawEncoder;
  type Decoder = RawDecoder;

  fn encoder(&mut self) -> Self::Encoder {
    RawEncoder
  }

  fn decoder(&mut self) -> Self::Decoder {
    RawDecoder
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RawEncoder;

impl Encoder for RawEncoder {
  type Item = Bytes;
  type Error = Status;

  fn encode(&mut self, item: Self::Item, dst: &mut EncodeBuf<'_>) -> Result<(), Self::Error> {
    dst.put_slice(&item);
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RawDecoder;

impl Decoder for RawDecoder {
  type Item = Bytes;
  type Error = Status;

  fn decode(&mut self, src: &mut DecodeBuf<'_>) -> Result<Option<Self::Item>, Self::Error> {
    let len = src.remaining();
    Ok(Some(src.copy_to_bytes(len)))
  }
}
