//! Inspector subcommands.
//!
//! Each command is a plain function over strings and bytes so the binary
//! only parses arguments and prints.

use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

use commerce::layout::{self, Field, offset_of};
use commerce::{AccountBytes, AccountEncoding, MerchantOperatorConfig, ProgramAccount};
use serde::Serialize;

use crate::error::InspectError;

/// Reads account data text from `data`, a file, or `stdin`.
///
/// An explicit `data` argument wins; otherwise `input` names a file, with
/// `-` (or no input at all) meaning `stdin`.
///
/// # Errors
///
/// Returns [`InspectError::Io`] if reading fails and
/// [`InspectError::EmptyInput`] if the text is blank.
pub fn read_input<R: Read>(
    data: Option<&str>,
    input: Option<&Path>,
    stdin: R,
) -> Result<String, InspectError> {
    let text = match (data, input) {
        (Some(data), _) => data.to_owned(),
        (None, Some(path)) if path != Path::new("-") => std::fs::read_to_string(path)?,
        (None, _) => std::io::read_to_string(stdin)?,
    };
    if text.trim().is_empty() {
        return Err(InspectError::EmptyInput);
    }
    Ok(text)
}

/// Decodes account data text into the account it holds.
///
/// # Errors
///
/// Returns an error if the text is not valid in `encoding` or the bytes are
/// not a valid commerce account.
pub fn decode_account(
    text: &str,
    encoding: AccountEncoding,
) -> Result<ProgramAccount, InspectError> {
    let bytes = AccountBytes::decode(text, encoding)?;
    let account = ProgramAccount::decode(bytes.as_ref())?;
    tracing::info!(
        kind = ?account.discriminator(),
        len = bytes.as_ref().len(),
        "Decoded account"
    );
    Ok(account)
}

/// Encodes a JSON [`MerchantOperatorConfig`] into account data text.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or the config cannot be encoded.
pub fn encode_config(json: &str, encoding: AccountEncoding) -> Result<String, InspectError> {
    let config: MerchantOperatorConfig = serde_json::from_str(json)?;
    let bytes = config.encode()?;
    tracing::info!(
        policies = config.num_policies(),
        currencies = config.num_accepted_currencies(),
        len = bytes.len(),
        "Encoded config"
    );
    Ok(AccountBytes::encode(bytes, encoding))
}

/// Returns the encoded size of a config with the given array lengths.
#[must_use]
pub const fn account_size(policies: u32, currencies: u32) -> u64 {
    MerchantOperatorConfig::size_for_counts(policies, currencies)
}

/// Fixed byte regions whose layout can be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LayoutKind {
    /// The merchant operator config header.
    Config,
    /// The merchant account.
    Merchant,
    /// The operator account.
    Operator,
    /// The payment account.
    Payment,
    /// Refund policy payload.
    Refund,
    /// Chargeback policy payload.
    Chargeback,
    /// Settlement policy payload.
    Settlement,
}

impl LayoutKind {
    const fn fields(self) -> &'static [Field] {
        match self {
            Self::Config => layout::MERCHANT_OPERATOR_CONFIG_HEADER,
            Self::Merchant => layout::MERCHANT,
            Self::Operator => layout::OPERATOR,
            Self::Payment => layout::PAYMENT,
            Self::Refund => layout::REFUND_POLICY,
            Self::Chargeback => layout::CHARGEBACK_POLICY,
            Self::Settlement => layout::SETTLEMENT_POLICY,
        }
    }
}

/// One printed row of a layout table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutRow {
    /// Field name.
    pub name: &'static str,
    /// Byte offset within the region.
    pub offset: usize,
    /// Width in bytes.
    pub width: usize,
}

/// Returns the fields of `kind` with their offsets.
#[must_use]
pub fn layout_rows(kind: LayoutKind) -> Vec<LayoutRow> {
    let fields = kind.fields();
    fields
        .iter()
        .enumerate()
        .map(|(i, f)| LayoutRow {
            name: f.name,
            offset: offset_of(fields, i),
            width: f.width,
        })
        .collect()
}

/// Renders a layout as an aligned text table.
#[must_use]
pub fn render_layout(rows: &[LayoutRow]) -> String {
    let mut out = String::from("offset  width  field\n");
    for row in rows {
        let _ = writeln!(out, "{:>6}  {:>5}  {}", row.offset, row.width, row.name);
    }
    let total: usize = rows.iter().map(|r| r.width).sum();
    let _ = writeln!(out, "{:>6}  {total:>5}  (total)", "");
    out
}

/// Serializes `value` as JSON.
///
/// # Errors
///
/// Returns [`InspectError::Json`] if serialization fails.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, InspectError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use commerce::{Address, Operator, PolicyData, RefundPolicy};
    use pretty_assertions::assert_eq;

    fn config() -> MerchantOperatorConfig {
        MerchantOperatorConfig {
            version: 1,
            current_order_id: 12,
            days_to_close: 30,
            policies: vec![PolicyData::Refund(RefundPolicy {
                max_amount: 500,
                max_time_after_purchase: 86_400,
            })],
            accepted_currencies: vec![Address::new([7; 32])],
            ..MerchantOperatorConfig::default()
        }
    }

    #[test]
    fn test_read_input_prefers_argument() {
        let text = read_input(Some("AgE="), None, std::io::empty()).unwrap();
        assert_eq!(text, "AgE=");
    }

    #[test]
    fn test_read_input_stdin() {
        let stdin = std::io::Cursor::new(b"AgE=\n".to_vec());
        let text = read_input(None, Some(Path::new("-")), stdin).unwrap();
        assert_eq!(text.trim(), "AgE=");
    }

    #[test]
    fn test_read_input_empty() {
        assert!(matches!(
            read_input(None, None, std::io::Cursor::new(b"  \n".to_vec())),
            Err(InspectError::EmptyInput)
        ));
    }

    #[test]
    fn test_encode_then_decode_config() {
        let json = serde_json::to_string(&config()).unwrap();
        for encoding in [AccountEncoding::Base64, AccountEncoding::Base58] {
            let text = encode_config(&json, encoding).unwrap();
            let account = decode_account(&text, encoding).unwrap();
            assert_eq!(account, ProgramAccount::MerchantOperatorConfig(config()));
        }
    }

    #[test]
    fn test_decode_fixed_account() {
        let operator = Operator {
            owner: Address::new([5; 32]),
            bump: 9,
        };
        let text = AccountBytes::encode(
            commerce::FixedAccount::to_bytes(&operator),
            AccountEncoding::Base64,
        );
        assert_eq!(
            decode_account(&text, AccountEncoding::Base64).unwrap(),
            ProgramAccount::Operator(operator)
        );
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_account("!!", AccountEncoding::Base64),
            Err(InspectError::Text(_))
        ));
        let truncated = AccountBytes::encode([2u8; 10], AccountEncoding::Base64);
        assert!(matches!(
            decode_account(&truncated, AccountEncoding::Base64),
            Err(InspectError::Codec(e)) if e.is_truncated()
        ));
    }

    #[test]
    fn test_encode_invalid_json() {
        assert!(matches!(
            encode_config("{", AccountEncoding::Base64),
            Err(InspectError::Json(_))
        ));
    }

    #[test]
    fn test_account_size() {
        assert_eq!(account_size(0, 0), 93);
        assert_eq!(account_size(2, 3), 93 + 2 * 101 + 3 * 32);
    }

    #[test]
    fn test_config_layout_offsets() {
        let rows = layout_rows(LayoutKind::Config);
        let offsets: Vec<usize> = rows.iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 1, 5, 6, 38, 70, 78, 79, 83, 85, 89]);
        assert_eq!(rows[9].name, "num_policies");
        let table = render_layout(&rows);
        assert!(table.contains("    85      4  num_policies"));
        assert!(table.ends_with("93  (total)\n"));
    }

    #[test]
    fn test_to_json_compact() {
        let rows = layout_rows(LayoutKind::Operator);
        let json = to_json(&rows, false).unwrap();
        assert!(json.starts_with("[{\"name\":\"discriminator\",\"offset\":0,\"width\":1}"));
    }
}
