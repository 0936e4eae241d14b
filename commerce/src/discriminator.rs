//! Leading tag bytes that identify commerce accounts.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// First byte of every commerce program account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum AccountDiscriminator {
    /// [`Merchant`](crate::Merchant).
    Merchant = 0,
    /// [`Operator`](crate::Operator).
    Operator = 1,
    /// [`MerchantOperatorConfig`](crate::MerchantOperatorConfig).
    MerchantOperatorConfig = 2,
    /// [`Payment`](crate::Payment).
    Payment = 3,
}

impl TryFrom<u8> for AccountDiscriminator {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Merchant),
            1 => Ok(Self::Operator),
            2 => Ok(Self::MerchantOperatorConfig),
            3 => Ok(Self::Payment),
            other => Err(CodecError::UnknownDiscriminator(other)),
        }
    }
}

impl From<AccountDiscriminator> for u8 {
    fn from(d: AccountDiscriminator) -> Self {
        d as Self
    }
}

/// An account type with a fixed discriminator byte.
pub trait Discriminator {
    /// Discriminator written as the first byte of the account.
    const DISCRIMINATOR: AccountDiscriminator;

    /// Fails unless `found` is this account's discriminator.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DiscriminatorMismatch`] on any other byte.
    fn check_discriminator(found: u8) -> Result<(), CodecError> {
        let expected = u8::from(Self::DISCRIMINATOR);
        if found != expected {
            return Err(CodecError::DiscriminatorMismatch { expected, found });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    impl Discriminator for Probe {
        const DISCRIMINATOR: AccountDiscriminator = AccountDiscriminator::Payment;
    }

    #[test]
    fn test_discriminator_values() {
        for (byte, d) in [
            (0, AccountDiscriminator::Merchant),
            (1, AccountDiscriminator::Operator),
            (2, AccountDiscriminator::MerchantOperatorConfig),
            (3, AccountDiscriminator::Payment),
        ] {
            assert_eq!(AccountDiscriminator::try_from(byte).unwrap(), d);
            assert_eq!(u8::from(d), byte);
        }
    }

    #[test]
    fn test_unknown_discriminator() {
        assert_eq!(
            AccountDiscriminator::try_from(4),
            Err(CodecError::UnknownDiscriminator(4))
        );
    }

    #[test]
    fn test_check_discriminator() {
        assert!(Probe::check_discriminator(3).is_ok());
        assert_eq!(
            Probe::check_discriminator(2),
            Err(CodecError::DiscriminatorMismatch {
                expected: 3,
                found: 2,
            })
        );
    }
}
