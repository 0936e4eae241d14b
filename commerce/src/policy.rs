//! Operator fee types and merchant/operator policy entries.
//!
//! A [`PolicyData`] entry is a tagged union normalized to a fixed 101-byte
//! envelope: one [`PolicyType`] tag byte followed by a 100-byte payload
//! region. Each variant writes its fields at the start of the payload and
//! the remainder is zero padding, which decoders ignore.
//!
//! ```text
//! +-----+------------------------------+----------------------+
//! | tag | variant fields (13-16 bytes) | zero padding         |
//! +-----+------------------------------+----------------------+
//! 0     1                                                     101
//! ```

use serde::{Deserialize, Serialize};

use crate::codec::{ByteReader, ByteWriter, SubRecord};
use crate::error::CodecError;
use crate::layout::{self, total_width};

/// Size of the payload region that follows the policy tag byte.
pub const POLICY_PAYLOAD_SIZE: usize = 100;

/// How the operator fee in a config is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum FeeType {
    /// Fee in basis points of the payment amount.
    #[default]
    Bps = 0,
    /// Fixed fee in the payment token's smallest unit.
    Fixed = 1,
}

impl TryFrom<u8> for FeeType {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Bps),
            1 => Ok(Self::Fixed),
            other => Err(CodecError::UnknownFeeType(other)),
        }
    }
}

impl From<FeeType> for u8 {
    fn from(fee_type: FeeType) -> Self {
        fee_type as Self
    }
}

/// Tag byte identifying the variant of a [`PolicyData`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum PolicyType {
    /// [`RefundPolicy`].
    Refund = 0,
    /// [`ChargebackPolicy`].
    Chargeback = 1,
    /// [`SettlementPolicy`].
    Settlement = 2,
}

impl PolicyType {
    /// Width of the variant's fields, tag byte included.
    #[must_use]
    pub const fn encoded_len(self) -> usize {
        1 + match self {
            Self::Refund => RefundPolicy::LEN,
            Self::Chargeback => ChargebackPolicy::LEN,
            Self::Settlement => SettlementPolicy::LEN,
        }
    }
}

impl TryFrom<u8> for PolicyType {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Refund),
            1 => Ok(Self::Chargeback),
            2 => Ok(Self::Settlement),
            other => Err(CodecError::UnknownPolicyType(other)),
        }
    }
}

impl From<PolicyType> for u8 {
    fn from(policy_type: PolicyType) -> Self {
        policy_type as Self
    }
}

/// Limits on merchant-initiated refunds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundPolicy {
    /// Largest refundable amount.
    pub max_amount: u64,
    /// Refund window after purchase, in seconds.
    pub max_time_after_purchase: u64,
}

impl RefundPolicy {
    /// Encoded width of the variant fields.
    pub const LEN: usize = total_width(layout::REFUND_POLICY);
}

/// Limits on operator-initiated chargebacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargebackPolicy {
    /// Largest amount that can be charged back.
    pub max_amount: u64,
    /// Chargeback window after purchase, in seconds.
    pub max_time_after_purchase: u64,
}

impl ChargebackPolicy {
    /// Encoded width of the variant fields.
    pub const LEN: usize = total_width(layout::CHARGEBACK_POLICY);
}

/// When cleared payments are settled to the merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPolicy {
    /// Smallest amount worth settling.
    pub min_settlement_amount: u64,
    /// Settlement cadence in hours.
    pub settlement_frequency_hours: u32,
    /// Whether settlement happens without an explicit request.
    pub auto_settle: bool,
}

impl SettlementPolicy {
    /// Encoded width of the variant fields.
    pub const LEN: usize = total_width(layout::SETTLEMENT_POLICY);
}

const _: () = {
    assert!(RefundPolicy::LEN <= POLICY_PAYLOAD_SIZE);
    assert!(ChargebackPolicy::LEN <= POLICY_PAYLOAD_SIZE);
    assert!(SettlementPolicy::LEN <= POLICY_PAYLOAD_SIZE);
};

/// One policy entry of a merchant operator config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PolicyData {
    /// Refund limits.
    Refund(RefundPolicy),
    /// Chargeback limits.
    Chargeback(ChargebackPolicy),
    /// Settlement schedule.
    Settlement(SettlementPolicy),
}

impl PolicyData {
    /// Returns the variant tag.
    #[must_use]
    pub const fn policy_type(&self) -> PolicyType {
        match self {
            Self::Refund(_) => PolicyType::Refund,
            Self::Chargeback(_) => PolicyType::Chargeback,
            Self::Settlement(_) => PolicyType::Settlement,
        }
    }

    /// Returns the refund policy, if this entry is one.
    #[must_use]
    pub const fn as_refund(&self) -> Option<&RefundPolicy> {
        match self {
            Self::Refund(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the chargeback policy, if this entry is one.
    #[must_use]
    pub const fn as_chargeback(&self) -> Option<&ChargebackPolicy> {
        match self {
            Self::Chargeback(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the settlement policy, if this entry is one.
    #[must_use]
    pub const fn as_settlement(&self) -> Option<&SettlementPolicy> {
        match self {
            Self::Settlement(p) => Some(p),
            _ => None,
        }
    }
}

impl SubRecord for PolicyData {
    const SIZE: usize = 1 + POLICY_PAYLOAD_SIZE;

    fn write_to(&self, out: &mut [u8]) -> Result<(), CodecError> {
        let policy_type = self.policy_type();
        let mut w = ByteWriter::with_capacity(policy_type.encoded_len());
        w.put_u8(policy_type.into());
        match self {
            Self::Refund(p) => {
                w.put_u64(p.max_amount);
                w.put_u64(p.max_time_after_purchase);
            }
            Self::Chargeback(p) => {
                w.put_u64(p.max_amount);
                w.put_u64(p.max_time_after_purchase);
            }
            Self::Settlement(p) => {
                w.put_u64(p.min_settlement_amount);
                w.put_u32(p.settlement_frequency_hours);
                w.put_u8(u8::from(p.auto_settle));
            }
        }
        let fields = w.into_inner();
        out[..fields.len()].copy_from_slice(&fields);
        Ok(())
    }

    fn read_from(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut r = ByteReader::new(bytes);
        let policy = match PolicyType::try_from(r.read_u8()?)? {
            PolicyType::Refund => Self::Refund(RefundPolicy {
                max_amount: r.read_u64()?,
                max_time_after_purchase: r.read_u64()?,
            }),
            PolicyType::Chargeback => Self::Chargeback(ChargebackPolicy {
                max_amount: r.read_u64()?,
                max_time_after_purchase: r.read_u64()?,
            }),
            PolicyType::Settlement => Self::Settlement(SettlementPolicy {
                min_settlement_amount: r.read_u64()?,
                settlement_frequency_hours: r.read_u32()?,
                auto_settle: r.read_u8()? == 1,
            }),
        };
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode(policy: &PolicyData) -> Vec<u8> {
        let mut out = vec![0u8; PolicyData::SIZE];
        policy.write_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_policy_size() {
        assert_eq!(PolicyData::SIZE, 101);
        assert_eq!(PolicyType::Refund.encoded_len(), 17);
        assert_eq!(PolicyType::Chargeback.encoded_len(), 17);
        assert_eq!(PolicyType::Settlement.encoded_len(), 14);
    }

    #[test]
    fn test_refund_policy_layout() {
        let bytes = encode(&PolicyData::Refund(RefundPolicy {
            max_amount: 1000,
            max_time_after_purchase: 3600,
        }));
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..9], &1000u64.to_le_bytes());
        assert_eq!(&bytes[9..17], &3600u64.to_le_bytes());
        assert!(bytes[17..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_settlement_policy_layout() {
        let bytes = encode(&PolicyData::Settlement(SettlementPolicy {
            min_settlement_amount: 100,
            settlement_frequency_hours: 24,
            auto_settle: true,
        }));
        assert_eq!(bytes[0], 2);
        assert_eq!(&bytes[1..9], &100u64.to_le_bytes());
        assert_eq!(&bytes[9..13], &24u32.to_le_bytes());
        assert_eq!(bytes[13], 1);
        assert!(bytes[14..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_policy_roundtrip_each_variant() {
        let policies = [
            PolicyData::Refund(RefundPolicy {
                max_amount: u64::MAX,
                max_time_after_purchase: 1,
            }),
            PolicyData::Chargeback(ChargebackPolicy {
                max_amount: 5000,
                max_time_after_purchase: 86_400,
            }),
            PolicyData::Settlement(SettlementPolicy {
                min_settlement_amount: 0,
                settlement_frequency_hours: u32::MAX,
                auto_settle: false,
            }),
        ];
        for policy in policies {
            assert_eq!(PolicyData::read_from(&encode(&policy)).unwrap(), policy);
        }
    }

    #[test]
    fn test_padding_ignored_on_decode() {
        let policy = PolicyData::Chargeback(ChargebackPolicy {
            max_amount: 7,
            max_time_after_purchase: 8,
        });
        let mut bytes = encode(&policy);
        bytes[50] = 0xaa;
        bytes[100] = 0xbb;
        assert_eq!(PolicyData::read_from(&bytes).unwrap(), policy);
    }

    #[test]
    fn test_auto_settle_only_one_is_true() {
        let mut bytes = encode(&PolicyData::Settlement(SettlementPolicy::default()));
        bytes[13] = 2;
        let decoded = PolicyData::read_from(&bytes).unwrap();
        assert_eq!(decoded.as_settlement().map(|s| s.auto_settle), Some(false));
    }

    #[test]
    fn test_unknown_policy_type() {
        let mut bytes = vec![0u8; PolicyData::SIZE];
        bytes[0] = 3;
        assert_eq!(
            PolicyData::read_from(&bytes),
            Err(CodecError::UnknownPolicyType(3))
        );
    }

    #[test]
    fn test_fee_type_bytes() {
        assert_eq!(u8::from(FeeType::Bps), 0);
        assert_eq!(u8::from(FeeType::Fixed), 1);
        assert_eq!(FeeType::try_from(1).unwrap(), FeeType::Fixed);
        assert_eq!(FeeType::try_from(2), Err(CodecError::UnknownFeeType(2)));
    }

    #[test]
    fn test_policy_serde_tagged() {
        let policy = PolicyData::Refund(RefundPolicy {
            max_amount: 10,
            max_time_after_purchase: 20,
        });
        let json = serde_json::to_value(policy).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "refund",
                "maxAmount": 10,
                "maxTimeAfterPurchase": 20,
            })
        );
        let back: PolicyData = serde_json::from_value(json).unwrap();
        assert_eq!(back, policy);
    }
}
