//! Distinguished identifier support.

use crate::{Error, Result};
use digest::{Digest, Output};
use primecurve::{AffinePoint, Curve, field::to_be_bytes_padded};
use sm3::Sm3;

/// Type which represents distinguishing identifiers.
pub type DistId = [u8];

/// Identifier used by GM/T 0009 when the signer has none of their own.
pub const DEFAULT_DISTID: &DistId = b"1234567812345678";

/// Hash functions usable for `Z` and the message digest `e`.
///
/// SM2DSA is specified with SM3. Other digests still produce signatures that
/// this crate verifies, but they will not interoperate with other SM2
/// implementations; [`IdentityDigest::CONFORMANT`] says which kind a digest
/// is.
pub trait IdentityDigest: Digest + Clone {
    /// Is this the hash function the SM2 standards prescribe?
    const CONFORMANT: bool;
}

impl IdentityDigest for Sm3 {
    const CONFORMANT: bool = true;
}

#[cfg(feature = "sha2")]
impl IdentityDigest for sha2::Sha256 {
    const CONFORMANT: bool = false;
}

/// Compute user information hash `Z` according to [draft-shen-sm2-ecdsa § 5.1.4.4].
///
/// ```text
/// ZA=H256(ENTLA || IDA || a || b || xG || yG || xA || yA)
/// ```
///
/// Every integer is encoded big endian at the width of the base field.
///
/// [draft-shen-sm2-ecdsa § 5.1.4.4]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5.1.4.4
pub(crate) fn hash_z<D: IdentityDigest>(
    curve: &Curve,
    distid: &DistId,
    public_key: &AffinePoint,
) -> Result<Output<D>> {
    let entla: u16 = distid
        .len()
        .checked_mul(8)
        .and_then(|l| l.try_into().ok())
        .ok_or(Error::InvalidIdentity)?;

    let (xa, ya) = public_key.coordinates().ok_or(Error::InvalidKey)?;
    let params = curve.params();
    let width = params.field_bytes();

    let mut hasher = D::new();
    hasher.update(entla.to_be_bytes());
    hasher.update(distid);

    for value in [params.a(), params.b(), params.gx(), params.gy(), xa, ya] {
        hasher.update(to_be_bytes_padded(value, width)?);
    }

    Ok(hasher.finalize())
}

/// Compute message hash `e` according to [draft-shen-sm2-ecdsa § 5.2.1]
///
/// ```text
/// e=Hv(ZA || M)
/// ```
///
/// [draft-shen-sm2-ecdsa § 5.2.1]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5.2.1
pub(crate) fn hash_msg<D: IdentityDigest>(identity_hash: &Output<D>, msg: &[u8]) -> Output<D> {
    D::new_with_prefix(identity_hash).chain_update(msg).finalize()
}
