//! The merchant operator config account.
//!
//! A config binds one merchant to one operator and carries the operator's
//! fee, the merchant's policies and the token mints the merchant accepts.
//! On the wire it is a fixed 93-byte header followed by two count-driven
//! arrays:
//!
//! | Offset               | Size     | Field                     | Encoding       |
//! |----------------------|----------|---------------------------|----------------|
//! | 0                    | 1        | `discriminator`           | u8             |
//! | 1                    | 4        | `version`                 | u32 LE         |
//! | 5                    | 1        | `bump`                    | u8             |
//! | 6                    | 32       | `merchant`                | address        |
//! | 38                   | 32       | `operator`                | address        |
//! | 70                   | 8        | `operator_fee`            | u64 LE         |
//! | 78                   | 1        | `fee_type`                | u8 (0 or 1)    |
//! | 79                   | 4        | `current_order_id`        | u32 LE         |
//! | 83                   | 2        | `days_to_close`           | u16 LE         |
//! | 85                   | 4        | `num_policies`            | u32 LE         |
//! | 89                   | 4        | `num_accepted_currencies` | u32 LE         |
//! | 93                   | n × 101  | `policies`                | [`PolicyData`] |
//! | 93 + n × 101         | m × 32   | `accepted_currencies`     | [`Address`]    |
//!
//! [`MerchantOperatorConfig`] has no count fields. The counts written to
//! the header always come from the lengths of its two vectors, so the
//! header can never disagree with the payload that follows it.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::codec::{
    ByteReader, ByteWriter, SubRecord, read_region, region_count, region_size, write_region,
};
use crate::discriminator::{AccountDiscriminator, Discriminator};
use crate::error::{CodecError, ValidationError};
use crate::layout::{self, total_width};
use crate::policy::{FeeType, PolicyData, PolicyType};

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = total_width(layout::MERCHANT_OPERATOR_CONFIG_HEADER);

const _: () = assert!(HEADER_SIZE == 93);

/// The fixed 93-byte prefix of a config account, counts included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantOperatorConfigHeader {
    /// Account discriminator byte.
    pub discriminator: u8,
    /// Config version; part of the account's PDA seeds.
    pub version: u32,
    /// PDA bump seed. Passed through unchanged.
    pub bump: u8,
    /// Merchant this config belongs to.
    pub merchant: Address,
    /// Operator this config belongs to.
    pub operator: Address,
    /// Operator fee, interpreted according to `fee_type`.
    pub operator_fee: u64,
    /// How `operator_fee` is interpreted.
    pub fee_type: FeeType,
    /// Last order id used under this config.
    pub current_order_id: u32,
    /// Days after payment before a payment account can be closed.
    pub days_to_close: u16,
    /// Number of policy entries following the header.
    pub num_policies: u32,
    /// Number of accepted-currency mints following the policies.
    pub num_accepted_currencies: u32,
}

impl MerchantOperatorConfigHeader {
    /// Encoded size in bytes.
    pub const LEN: usize = HEADER_SIZE;

    /// Encodes the header into its fixed 93-byte form.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut w = ByteWriter::with_capacity(HEADER_SIZE);
        self.write(&mut w);
        let mut out = [0u8; HEADER_SIZE];
        out.copy_from_slice(&w.into_inner());
        out
    }

    /// Decodes a header starting at `offset`.
    ///
    /// Returns the header and the offset just past it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if fewer than 93 bytes remain at
    /// `offset`, or [`CodecError::UnknownFeeType`] for an invalid fee type.
    pub fn decode(data: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        let mut r = ByteReader::at(data, offset);
        let header = Self::read(&mut r)?;
        Ok((header, r.position()))
    }

    /// Total account size declared by this header's counts.
    #[must_use]
    pub const fn declared_len(&self) -> u64 {
        MerchantOperatorConfig::size_for_counts(self.num_policies, self.num_accepted_currencies)
    }

    pub(crate) fn write(&self, w: &mut ByteWriter) {
        w.put_u8(self.discriminator);
        w.put_u32(self.version);
        w.put_u8(self.bump);
        w.put_bytes(self.merchant.as_ref());
        w.put_bytes(self.operator.as_ref());
        w.put_u64(self.operator_fee);
        w.put_u8(self.fee_type.into());
        w.put_u32(self.current_order_id);
        w.put_u16(self.days_to_close);
        w.put_u32(self.num_policies);
        w.put_u32(self.num_accepted_currencies);
    }

    pub(crate) fn read(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        r.ensure(HEADER_SIZE)?;
        Ok(Self {
            discriminator: r.read_u8()?,
            version: r.read_u32()?,
            bump: r.read_u8()?,
            merchant: r.read_record()?,
            operator: r.read_record()?,
            operator_fee: r.read_u64()?,
            fee_type: FeeType::try_from(r.read_u8()?)?,
            current_order_id: r.read_u32()?,
            days_to_close: r.read_u16()?,
            num_policies: r.read_u32()?,
            num_accepted_currencies: r.read_u32()?,
        })
    }
}

/// A decoded merchant operator config account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantOperatorConfig {
    /// Account discriminator byte, `2` for configs written by the program.
    #[serde(default = "default_discriminator")]
    pub discriminator: u8,
    /// Config version; part of the account's PDA seeds.
    pub version: u32,
    /// PDA bump seed. Passed through unchanged.
    pub bump: u8,
    /// Merchant this config belongs to.
    pub merchant: Address,
    /// Operator this config belongs to.
    pub operator: Address,
    /// Operator fee, interpreted according to `fee_type`.
    pub operator_fee: u64,
    /// How `operator_fee` is interpreted.
    pub fee_type: FeeType,
    /// Last order id used under this config.
    pub current_order_id: u32,
    /// Days after payment before a payment account can be closed.
    pub days_to_close: u16,
    /// Policy entries, in account order.
    #[serde(default)]
    pub policies: Vec<PolicyData>,
    /// Accepted token mints, in account order.
    #[serde(default)]
    pub accepted_currencies: Vec<Address>,
}

const fn default_discriminator() -> u8 {
    AccountDiscriminator::MerchantOperatorConfig as u8
}

impl Default for MerchantOperatorConfig {
    fn default() -> Self {
        Self {
            discriminator: default_discriminator(),
            version: 0,
            bump: 0,
            merchant: Address::default(),
            operator: Address::default(),
            operator_fee: 0,
            fee_type: FeeType::default(),
            current_order_id: 0,
            days_to_close: 0,
            policies: Vec::new(),
            accepted_currencies: Vec::new(),
        }
    }
}

impl Discriminator for MerchantOperatorConfig {
    const DISCRIMINATOR: AccountDiscriminator = AccountDiscriminator::MerchantOperatorConfig;
}

impl MerchantOperatorConfig {
    /// Account size for the given counts.
    ///
    /// Computed in `u64`; any pair of `u32` counts fits.
    #[must_use]
    pub const fn size_for_counts(num_policies: u32, num_accepted_currencies: u32) -> u64 {
        HEADER_SIZE as u64
            + region_size::<PolicyData>(num_policies)
            + region_size::<Address>(num_accepted_currencies)
    }

    /// Number of bytes [`encode`](Self::encode) produces for this value.
    #[must_use]
    pub fn size(&self) -> usize {
        HEADER_SIZE
            + self.policies.len() * PolicyData::SIZE
            + self.accepted_currencies.len() * Address::SIZE
    }

    /// Number of policy entries.
    #[must_use]
    pub fn num_policies(&self) -> usize {
        self.policies.len()
    }

    /// Number of accepted-currency mints.
    #[must_use]
    pub fn num_accepted_currencies(&self) -> usize {
        self.accepted_currencies.len()
    }

    /// Builds a config from a decoded header and its arrays.
    ///
    /// The header's count fields are discarded; the counts of the result
    /// are the lengths of `policies` and `accepted_currencies`.
    #[must_use]
    pub fn from_parts(
        header: MerchantOperatorConfigHeader,
        policies: Vec<PolicyData>,
        accepted_currencies: Vec<Address>,
    ) -> Self {
        Self {
            discriminator: header.discriminator,
            version: header.version,
            bump: header.bump,
            merchant: header.merchant,
            operator: header.operator,
            operator_fee: header.operator_fee,
            fee_type: header.fee_type,
            current_order_id: header.current_order_id,
            days_to_close: header.days_to_close,
            policies,
            accepted_currencies,
        }
    }

    /// Returns the on-wire header, with counts taken from the array lengths.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CountOverflow`] if either array holds more than
    /// `u32::MAX` entries.
    pub fn header(&self) -> Result<MerchantOperatorConfigHeader, CodecError> {
        Ok(MerchantOperatorConfigHeader {
            discriminator: self.discriminator,
            version: self.version,
            bump: self.bump,
            merchant: self.merchant,
            operator: self.operator,
            operator_fee: self.operator_fee,
            fee_type: self.fee_type,
            current_order_id: self.current_order_id,
            days_to_close: self.days_to_close,
            num_policies: region_count("policies", self.policies.len())?,
            num_accepted_currencies: region_count(
                "accepted_currencies",
                self.accepted_currencies.len(),
            )?,
        })
    }

    /// Encodes the config into account data.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::CountOverflow`] if an array is too long for
    /// its `u32` count, or the first policy encoder error unchanged.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let header = self.header()?;
        let size = self.size();
        let mut w = ByteWriter::with_capacity(size);
        header.write(&mut w);
        write_region(&mut w, &self.policies)?;
        write_region(&mut w, &self.accepted_currencies)?;
        debug_assert_eq!(w.position(), size);
        Ok(w.into_inner())
    }

    /// Decodes a config starting at `offset`.
    ///
    /// Returns the config and the offset just past its last accepted
    /// currency, so callers can check it against the buffer length or find
    /// the next record. The discriminator byte is carried over as-is; use
    /// [`try_from_account_data`](Self::try_from_account_data) to check it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if the buffer is shorter than the
    /// header or than the arrays the header declares, and propagates
    /// policy decoder errors unchanged.
    pub fn decode(data: &[u8], offset: usize) -> Result<(Self, usize), CodecError> {
        let mut r = ByteReader::at(data, offset);
        let header = MerchantOperatorConfigHeader::read(&mut r)?;

        #[cfg(feature = "telemetry")]
        tracing::trace!(
            offset,
            num_policies = header.num_policies,
            num_accepted_currencies = header.num_accepted_currencies,
            declared_len = header.declared_len(),
            available = data.len().saturating_sub(offset),
            "Decoded merchant operator config header"
        );

        let policies = read_region(&mut r, header.num_policies)?;
        let accepted_currencies = read_region(&mut r, header.num_accepted_currencies)?;
        let config = Self::from_parts(header, policies, accepted_currencies);
        Ok((config, r.position()))
    }

    /// Decodes a config from the full data of a program account.
    ///
    /// Checks the discriminator first. Bytes past the declared arrays are
    /// ignored since the account may have been allocated larger than needed.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DiscriminatorMismatch`] if the account is not
    /// a config, otherwise as [`decode`](Self::decode).
    pub fn try_from_account_data(data: &[u8]) -> Result<Self, CodecError> {
        let first = *data
            .first()
            .ok_or_else(|| CodecError::truncated(0, HEADER_SIZE, 0))?;
        Self::check_discriminator(first)?;
        let (config, end) = Self::decode(data, 0)?;

        #[cfg(feature = "telemetry")]
        if end < data.len() {
            tracing::debug!(
                consumed = end,
                len = data.len(),
                "Ignoring trailing bytes after merchant operator config"
            );
        }
        #[cfg(not(feature = "telemetry"))]
        let _ = end;

        Ok(config)
    }

    /// Returns the first policy of the given type.
    #[must_use]
    pub fn policy(&self, policy_type: PolicyType) -> Option<&PolicyData> {
        self.policies
            .iter()
            .find(|policy| policy.policy_type() == policy_type)
    }

    /// Returns `true` if any policy has the given type.
    #[must_use]
    pub fn has_policy_type(&self, policy_type: PolicyType) -> bool {
        self.policy(policy_type).is_some()
    }

    /// Returns `true` if any policy of the given type satisfies `check`.
    pub fn check_policy<F>(&self, policy_type: PolicyType, check: F) -> bool
    where
        F: Fn(&PolicyData) -> bool,
    {
        self.policies
            .iter()
            .any(|policy| policy.policy_type() == policy_type && check(policy))
    }

    /// Returns `true` if `mint` is one of the accepted currencies.
    #[must_use]
    pub fn accepts_currency(&self, mint: &Address) -> bool {
        self.accepted_currencies.contains(mint)
    }

    /// Checks that the config belongs to `operator`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OperatorMismatch`] otherwise.
    pub fn validate_operator(&self, operator: &Address) -> Result<(), ValidationError> {
        if self.operator != *operator {
            return Err(ValidationError::OperatorMismatch {
                expected: *operator,
                found: self.operator,
            });
        }
        Ok(())
    }

    /// Checks that the config belongs to `merchant`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MerchantMismatch`] otherwise.
    pub fn validate_merchant(&self, merchant: &Address) -> Result<(), ValidationError> {
        if self.merchant != *merchant {
            return Err(ValidationError::MerchantMismatch {
                expected: *merchant,
                found: self.merchant,
            });
        }
        Ok(())
    }

    /// Checks operator then merchant.
    ///
    /// # Errors
    ///
    /// Returns the first mismatch found.
    pub fn validate_operator_and_merchant(
        &self,
        operator: &Address,
        merchant: &Address,
    ) -> Result<(), ValidationError> {
        self.validate_operator(operator)?;
        self.validate_merchant(merchant)
    }

    /// Checks that `order_id` is not the config's current order id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OrderIdInvalid`] if it is.
    pub const fn validate_order_id(&self, order_id: u32) -> Result<(), ValidationError> {
        if order_id == self.current_order_id {
            return Err(ValidationError::OrderIdInvalid(order_id));
        }
        Ok(())
    }
}
