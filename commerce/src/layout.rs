//! Declarative byte layouts.
//!
//! Each fixed-size region of an account is described by a table of
//! [`Field`]s in wire order. Offsets and total sizes are derived from the
//! table in `const` context, so no call site sums widths by hand and a
//! schema change only touches the table.

/// One fixed-width field of a byte layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, used in diagnostics.
    pub name: &'static str,
    /// Width in bytes.
    pub width: usize,
}

impl Field {
    /// Creates a field descriptor.
    #[must_use]
    pub const fn new(name: &'static str, width: usize) -> Self {
        Self { name, width }
    }
}

/// Returns the sum of all field widths in `fields`.
#[must_use]
pub const fn total_width(fields: &[Field]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < fields.len() {
        total += fields[i].width;
        i += 1;
    }
    total
}

/// Returns the byte offset of `fields[index]`, i.e. the sum of the widths
/// of every field before it.
///
/// # Panics
///
/// Panics (at compile time when used in a `const`) if `index` is out of
/// bounds.
#[must_use]
pub const fn offset_of(fields: &[Field], index: usize) -> usize {
    assert!(index < fields.len(), "field index out of bounds");
    let mut offset = 0;
    let mut i = 0;
    while i < index {
        offset += fields[i].width;
        i += 1;
    }
    offset
}

/// Looks up the offset of the field called `name`.
#[must_use]
pub fn offset_by_name(fields: &[Field], name: &str) -> Option<usize> {
    let index = fields.iter().position(|f| f.name == name)?;
    Some(offset_of(fields, index))
}

/// Width of a Solana address on the wire.
pub const ADDRESS_WIDTH: usize = 32;

/// Byte layout of the [`MerchantOperatorConfig`](crate::MerchantOperatorConfig)
/// header, in wire order.
pub const MERCHANT_OPERATOR_CONFIG_HEADER: &[Field] = &[
    Field::new("discriminator", 1),
    Field::new("version", 4),
    Field::new("bump", 1),
    Field::new("merchant", ADDRESS_WIDTH),
    Field::new("operator", ADDRESS_WIDTH),
    Field::new("operator_fee", 8),
    Field::new("fee_type", 1),
    Field::new("current_order_id", 4),
    Field::new("days_to_close", 2),
    Field::new("num_policies", 4),
    Field::new("num_accepted_currencies", 4),
];

/// Byte layout of a [`Merchant`](crate::Merchant) account.
pub const MERCHANT: &[Field] = &[
    Field::new("discriminator", 1),
    Field::new("owner", ADDRESS_WIDTH),
    Field::new("bump", 1),
    Field::new("settlement_wallet", ADDRESS_WIDTH),
];

/// Byte layout of an [`Operator`](crate::Operator) account.
pub const OPERATOR: &[Field] = &[
    Field::new("discriminator", 1),
    Field::new("owner", ADDRESS_WIDTH),
    Field::new("bump", 1),
];

/// Byte layout of a [`Payment`](crate::Payment) account.
pub const PAYMENT: &[Field] = &[
    Field::new("discriminator", 1),
    Field::new("order_id", 4),
    Field::new("amount", 8),
    Field::new("created_at", 8),
    Field::new("status", 1),
    Field::new("bump", 1),
];

/// Byte layout of the variant payloads inside a policy entry. The policy
/// tag byte precedes these and the rest of the 100-byte payload region is
/// zero padding.
pub const REFUND_POLICY: &[Field] = &[
    Field::new("max_amount", 8),
    Field::new("max_time_after_purchase", 8),
];

/// See [`REFUND_POLICY`].
pub const CHARGEBACK_POLICY: &[Field] = &[
    Field::new("max_amount", 8),
    Field::new("max_time_after_purchase", 8),
];

/// See [`REFUND_POLICY`].
pub const SETTLEMENT_POLICY: &[Field] = &[
    Field::new("min_settlement_amount", 8),
    Field::new("settlement_frequency_hours", 4),
    Field::new("auto_settle", 1),
];
