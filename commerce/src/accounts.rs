//! Fixed-size commerce accounts and discriminator dispatch.
//!
//! [`Merchant`], [`Operator`] and [`Payment`] always occupy the same number
//! of bytes: the discriminator followed by their fields in declaration
//! order. [`ProgramAccount`] decodes any of the four account kinds by
//! looking at the discriminator byte.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::codec::{ByteReader, ByteWriter};
use crate::config::MerchantOperatorConfig;
use crate::discriminator::{AccountDiscriminator, Discriminator};
use crate::error::{CodecError, ValidationError};
use crate::layout::{self, total_width};

const SECONDS_PER_DAY: i64 = 86_400;

/// An account with a fixed layout behind its discriminator byte.
pub trait FixedAccount: Discriminator + Sized {
    /// Encoded size, discriminator included.
    const LEN: usize;

    /// Writes every field after the discriminator.
    fn write_fields(&self, w: &mut ByteWriter);

    /// Reads every field after the discriminator.
    ///
    /// # Errors
    ///
    /// Returns an error if a field holds an invalid value.
    fn read_fields(r: &mut ByteReader<'_>) -> Result<Self, CodecError>;

    /// Encodes the account, discriminator first.
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(Self::LEN);
        w.put_u8(Self::DISCRIMINATOR.into());
        self.write_fields(&mut w);
        w.into_inner()
    }

    /// Decodes the account from the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if `data` is shorter than
    /// [`Self::LEN`], [`CodecError::DiscriminatorMismatch`] if it holds
    /// another account kind, or a field error.
    fn try_from_bytes(data: &[u8]) -> Result<Self, CodecError> {
        let mut r = ByteReader::new(data);
        r.ensure(Self::LEN)?;
        Self::check_discriminator(r.read_u8()?)?;
        Self::read_fields(&mut r)
    }
}

/// A merchant registered with the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    /// Merchant authority.
    pub owner: Address,
    /// PDA bump seed.
    pub bump: u8,
    /// Wallet whose token accounts receive settled payments.
    pub settlement_wallet: Address,
}

impl Discriminator for Merchant {
    const DISCRIMINATOR: AccountDiscriminator = AccountDiscriminator::Merchant;
}

impl FixedAccount for Merchant {
    const LEN: usize = total_width(layout::MERCHANT);

    fn write_fields(&self, w: &mut ByteWriter) {
        w.put_bytes(self.owner.as_ref());
        w.put_u8(self.bump);
        w.put_bytes(self.settlement_wallet.as_ref());
    }

    fn read_fields(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            owner: r.read_record()?,
            bump: r.read_u8()?,
            settlement_wallet: r.read_record()?,
        })
    }
}

impl Merchant {
    /// Checks that the merchant is owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OwnerMismatch`] otherwise.
    pub fn validate_owner(&self, owner: &Address) -> Result<(), ValidationError> {
        validate_owner(&self.owner, owner)
    }
}

/// An operator registered with the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    /// Operator authority.
    pub owner: Address,
    /// PDA bump seed.
    pub bump: u8,
}

impl Discriminator for Operator {
    const DISCRIMINATOR: AccountDiscriminator = AccountDiscriminator::Operator;
}

impl FixedAccount for Operator {
    const LEN: usize = total_width(layout::OPERATOR);

    fn write_fields(&self, w: &mut ByteWriter) {
        w.put_bytes(self.owner.as_ref());
        w.put_u8(self.bump);
    }

    fn read_fields(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            owner: r.read_record()?,
            bump: r.read_u8()?,
        })
    }
}

impl Operator {
    /// Checks that the operator is owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OwnerMismatch`] otherwise.
    pub fn validate_owner(&self, owner: &Address) -> Result<(), ValidationError> {
        validate_owner(&self.owner, owner)
    }
}

fn validate_owner(actual: &Address, expected: &Address) -> Result<(), ValidationError> {
    if actual != expected {
        return Err(ValidationError::OwnerMismatch {
            expected: *expected,
            found: *actual,
        });
    }
    Ok(())
}

/// Lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum PaymentStatus {
    /// Paid by the buyer, funds held.
    Paid = 0,
    /// Cleared to the merchant.
    Cleared = 1,
    /// Charged back by the operator.
    Chargedback = 2,
    /// Refunded by the merchant.
    Refunded = 3,
}

impl PaymentStatus {
    const fn name(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Cleared => "cleared",
            Self::Chargedback => "chargedback",
            Self::Refunded => "refunded",
        }
    }
}

impl TryFrom<u8> for PaymentStatus {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Paid),
            1 => Ok(Self::Cleared),
            2 => Ok(Self::Chargedback),
            3 => Ok(Self::Refunded),
            other => Err(CodecError::UnknownPaymentStatus(other)),
        }
    }
}

impl From<PaymentStatus> for u8 {
    fn from(status: PaymentStatus) -> Self {
        status as Self
    }
}

/// A single order paid under a merchant operator config.
///
/// Operator, merchant, buyer and mint are not stored; they are part of the
/// account's PDA seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Order id under the config.
    pub order_id: u32,
    /// Amount paid, in the mint's smallest unit.
    pub amount: u64,
    /// Unix timestamp of the payment.
    pub created_at: i64,
    /// Current status.
    pub status: PaymentStatus,
    /// PDA bump seed.
    pub bump: u8,
}

impl Discriminator for Payment {
    const DISCRIMINATOR: AccountDiscriminator = AccountDiscriminator::Payment;
}

impl FixedAccount for Payment {
    const LEN: usize = total_width(layout::PAYMENT);

    fn write_fields(&self, w: &mut ByteWriter) {
        w.put_u32(self.order_id);
        w.put_u64(self.amount);
        w.put_i64(self.created_at);
        w.put_u8(self.status.into());
        w.put_u8(self.bump);
    }

    fn read_fields(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            order_id: r.read_u32()?,
            amount: r.read_u64()?,
            created_at: r.read_i64()?,
            status: PaymentStatus::try_from(r.read_u8()?)?,
            bump: r.read_u8()?,
        })
    }
}

impl Payment {
    /// Checks that the payment is in `status`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPaymentStatus`] otherwise.
    pub const fn validate_status(&self, status: PaymentStatus) -> Result<(), ValidationError> {
        if self.status as u8 != status as u8 {
            return Err(ValidationError::InvalidPaymentStatus(self.status.name()));
        }
        Ok(())
    }

    /// Checks that the payment is not in `status`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPaymentStatus`] if it is.
    pub const fn validate_not_status(&self, status: PaymentStatus) -> Result<(), ValidationError> {
        if self.status as u8 == status as u8 {
            return Err(ValidationError::InvalidPaymentStatus(self.status.name()));
        }
        Ok(())
    }

    /// Checks that the payment can be closed at unix time `now` under a
    /// config with the given `days_to_close`.
    ///
    /// A payment can be closed once it has left the `Paid` state and at
    /// least `days_to_close` whole days have passed since `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPaymentStatus`] for a payment
    /// still `Paid`, [`ValidationError::PaymentCloseWindowNotReached`] if
    /// the window has not elapsed, or
    /// [`ValidationError::ArithmeticOverflow`].
    pub fn can_close_at(&self, now: i64, days_to_close: u16) -> Result<(), ValidationError> {
        self.validate_not_status(PaymentStatus::Paid)?;
        let elapsed_days = now
            .checked_sub(self.created_at)
            .and_then(|secs| secs.checked_div(SECONDS_PER_DAY))
            .ok_or(ValidationError::ArithmeticOverflow)?;
        if elapsed_days < i64::from(days_to_close) {
            return Err(ValidationError::PaymentCloseWindowNotReached);
        }
        Ok(())
    }
}

/// Any commerce program account, identified by its discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "account", rename_all = "camelCase")]
pub enum ProgramAccount {
    /// A [`Merchant`].
    Merchant(Merchant),
    /// An [`Operator`].
    Operator(Operator),
    /// A [`MerchantOperatorConfig`].
    MerchantOperatorConfig(MerchantOperatorConfig),
    /// A [`Payment`].
    Payment(Payment),
}

impl ProgramAccount {
    /// Decodes raw account data, dispatching on the first byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownDiscriminator`] for an unknown first
    /// byte, [`CodecError::Truncated`] for empty or short data, or the
    /// account decoder's error.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let first = *data.first().ok_or_else(|| CodecError::truncated(0, 1, 0))?;
        let discriminator = AccountDiscriminator::try_from(first)?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(?discriminator, len = data.len(), "Decoding program account");

        let account = match discriminator {
            AccountDiscriminator::Merchant => Self::Merchant(Merchant::try_from_bytes(data)?),
            AccountDiscriminator::Operator => Self::Operator(Operator::try_from_bytes(data)?),
            AccountDiscriminator::MerchantOperatorConfig => Self::MerchantOperatorConfig(
                MerchantOperatorConfig::try_from_account_data(data)?,
            ),
            AccountDiscriminator::Payment => Self::Payment(Payment::try_from_bytes(data)?),
        };
        Ok(account)
    }

    /// Encodes the account back into raw account data.
    ///
    /// # Errors
    ///
    /// Only a config can fail to encode; see
    /// [`MerchantOperatorConfig::encode`].
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Merchant(a) => Ok(a.to_bytes()),
            Self::Operator(a) => Ok(a.to_bytes()),
            Self::MerchantOperatorConfig(a) => a.encode(),
            Self::Payment(a) => Ok(a.to_bytes()),
        }
    }

    /// Returns the kind of account.
    #[must_use]
    pub const fn discriminator(&self) -> AccountDiscriminator {
        match self {
            Self::Merchant(_) => AccountDiscriminator::Merchant,
            Self::Operator(_) => AccountDiscriminator::Operator,
            Self::MerchantOperatorConfig(_) => AccountDiscriminator::MerchantOperatorConfig,
            Self::Payment(_) => AccountDiscriminator::Payment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{PolicyData, RefundPolicy};
    use pretty_assertions::assert_eq;

    fn merchant() -> Merchant {
        Merchant {
            owner: Address::new([1; 32]),
            bump: 255,
            settlement_wallet: Address::new([2; 32]),
        }
    }

    fn payment(status: PaymentStatus) -> Payment {
        Payment {
            order_id: 7,
            amount: 1_000_000,
            created_at: 1_700_000_000,
            status,
            bump: 254,
        }
    }

    #[test]
    fn test_merchant_layout() {
        let bytes = merchant().to_bytes();
        assert_eq!(bytes.len(), Merchant::LEN);
        assert_eq!(bytes.len(), 66);
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..33], &[1u8; 32]);
        assert_eq!(bytes[33], 255);
        assert_eq!(&bytes[34..66], &[2u8; 32]);
        assert_eq!(Merchant::try_from_bytes(&bytes).unwrap(), merchant());
    }

    #[test]
    fn test_merchant_wrong_discriminator() {
        let mut data = vec![0; Merchant::LEN];
        data[0] = 1;
        assert_eq!(
            Merchant::try_from_bytes(&data),
            Err(CodecError::DiscriminatorMismatch {
                expected: 0,
                found: 1,
            })
        );
    }

    #[test]
    fn test_operator_roundtrip() {
        let operator = Operator {
            owner: Address::new([3; 32]),
            bump: 1,
        };
        let bytes = operator.to_bytes();
        assert_eq!(bytes.len(), 34);
        assert_eq!(bytes[0], 1);
        assert_eq!(Operator::try_from_bytes(&bytes).unwrap(), operator);
    }

    #[test]
    fn test_operator_truncated() {
        let bytes = Operator {
            owner: Address::new([3; 32]),
            bump: 1,
        }
        .to_bytes();
        assert!(
            Operator::try_from_bytes(&bytes[..33])
                .unwrap_err()
                .is_truncated()
        );
    }

    #[test]
    fn test_payment_layout() {
        let p = Payment {
            created_at: -5,
            ..payment(PaymentStatus::Refunded)
        };
        let bytes = p.to_bytes();
        assert_eq!(bytes.len(), 23);
        assert_eq!(bytes[0], 3);
        assert_eq!(&bytes[1..5], &7u32.to_le_bytes());
        assert_eq!(&bytes[5..13], &1_000_000u64.to_le_bytes());
        assert_eq!(&bytes[13..21], &(-5i64).to_le_bytes());
        assert_eq!(bytes[21], 3);
        assert_eq!(bytes[22], 254);
        assert_eq!(Payment::try_from_bytes(&bytes).unwrap(), p);
    }

    #[test]
    fn test_payment_unknown_status() {
        let mut bytes = payment(PaymentStatus::Paid).to_bytes();
        bytes[21] = 4;
        assert_eq!(
            Payment::try_from_bytes(&bytes),
            Err(CodecError::UnknownPaymentStatus(4))
        );
    }

    #[test]
    fn test_owner_validation() {
        let m = merchant();
        assert!(m.validate_owner(&Address::new([1; 32])).is_ok());
        assert_eq!(
            m.validate_owner(&Address::new([9; 32])),
            Err(ValidationError::OwnerMismatch {
                expected: Address::new([9; 32]),
                found: Address::new([1; 32]),
            })
        );
    }

    #[test]
    fn test_payment_status_checks() {
        let p = payment(PaymentStatus::Cleared);
        assert!(p.validate_status(PaymentStatus::Cleared).is_ok());
        assert_eq!(
            p.validate_status(PaymentStatus::Paid),
            Err(ValidationError::InvalidPaymentStatus("cleared"))
        );
        assert!(p.validate_not_status(PaymentStatus::Paid).is_ok());
        assert!(p.validate_not_status(PaymentStatus::Cleared).is_err());
    }

    #[test]
    fn test_payment_close_window() {
        let p = payment(PaymentStatus::Cleared);
        let created = p.created_at;
        assert_eq!(
            p.can_close_at(created + 6 * SECONDS_PER_DAY, 7),
            Err(ValidationError::PaymentCloseWindowNotReached)
        );
        assert!(p.can_close_at(created + 7 * SECONDS_PER_DAY, 7).is_ok());
        assert!(payment(PaymentStatus::Paid).can_close_at(i64::MAX, 0).is_err());
        assert_eq!(
            p.can_close_at(i64::MIN, 0),
            Err(ValidationError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_program_account_dispatch() {
        let config = MerchantOperatorConfig {
            policies: vec![PolicyData::Refund(RefundPolicy::default())],
            accepted_currencies: vec![Address::new([4; 32])],
            ..MerchantOperatorConfig::default()
        };
        let accounts = [
            ProgramAccount::Merchant(merchant()),
            ProgramAccount::Operator(Operator {
                owner: Address::new([3; 32]),
                bump: 2,
            }),
            ProgramAccount::MerchantOperatorConfig(config),
            ProgramAccount::Payment(payment(PaymentStatus::Paid)),
        ];
        for account in accounts {
            let bytes = account.encode().unwrap();
            assert_eq!(bytes[0], u8::from(account.discriminator()));
            assert_eq!(ProgramAccount::decode(&bytes).unwrap(), account);
        }
    }

    #[test]
    fn test_program_account_unknown_or_empty() {
        assert_eq!(
            ProgramAccount::decode(&[9, 0, 0]),
            Err(CodecError::UnknownDiscriminator(9))
        );
        assert!(ProgramAccount::decode(&[]).unwrap_err().is_truncated());
    }

    #[test]
    fn test_program_account_serde_tag() {
        let json = serde_json::to_value(ProgramAccount::Operator(Operator {
            owner: Address::new([3; 32]),
            bump: 2,
        }))
        .unwrap();
        assert_eq!(json["account"], "operator");
        assert_eq!(json["bump"], 2);
    }
}
