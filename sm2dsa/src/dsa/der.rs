//! ASN.1 DER encoding for SM2 signatures.
//!
//! ```text
//! SM2Signature ::= SEQUENCE {
//!     r INTEGER,
//!     s INTEGER
//! }
//! ```

use super::Signature;
use crate::{Error, Result};
use der::{
    Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Sequence, Writer,
    asn1::UintRef,
};
use primecurve::{BigUint, Curve};

impl Signature {
    /// Parse an ASN.1 DER-encoded signature for `curve`.
    ///
    /// Non-minimal integers, trailing data and out of range scalars are all
    /// rejected with [`Error::Encoding`].
    pub fn from_der(curve: &Curve, bytes: &[u8]) -> Result<Self> {
        let SignatureRef { r, s } = SignatureRef::from_der(bytes).map_err(|_| Error::Encoding)?;

        if r.as_bytes().len() > curve.scalar_bytes() || s.as_bytes().len() > curve.scalar_bytes()
        {
            return Err(Error::Encoding);
        }

        Self::from_scalars(
            curve,
            BigUint::from_bytes_be(r.as_bytes()),
            BigUint::from_bytes_be(s.as_bytes()),
        )
    }

    /// Serialize this signature as ASN.1 DER.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let (r, s) = (self.r.to_bytes_be(), self.s.to_bytes_be());

        SignatureRef {
            r: UintRef::new(&r).map_err(|_| Error::Encoding)?,
            s: UintRef::new(&s).map_err(|_| Error::Encoding)?,
        }
        .to_der()
        .map_err(|_| Error::Encoding)
    }
}

struct SignatureRef<'a> {
    r: UintRef<'a>,
    s: UintRef<'a>,
}

impl EncodeValue for SignatureRef<'_> {
    fn value_len(&self) -> der::Result<Length> {
        self.r.encoded_len()? + self.s.encoded_len()?
    }

    fn encode_value(&self, encoder: &mut impl Writer) -> der::Result<()> {
        self.r.encode(encoder)?;
        self.s.encode(encoder)?;
        Ok(())
    }
}

impl<'a> DecodeValue<'a> for SignatureRef<'a> {
    fn decode_value<R: Reader<'a>>(reader: &mut R, _header: Header) -> der::Result<Self> {
        Ok(Self {
            r: UintRef::decode(reader)?,
            s: UintRef::decode(reader)?,
        })
    }
}

impl<'a> Sequence<'a> for SignatureRef<'a> {}
