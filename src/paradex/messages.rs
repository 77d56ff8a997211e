//! Typed messages signed by Paradex accounts.
//!
//! Every message shares the `StarkNetDomain(name:felt,chainId:felt,version:felt)`
//! domain with `name = "Paradex"` and `version = "1"`. The chain id is passed
//! through as text, so both a chain name (`PRIVATE_SN_POTC_SEPOLIA`) and its
//! hex encoding produce the same domain hash.

use super::quantums::{to_quantums, QUANTUM_DECIMALS};
use crate::error::{ErrorCode, SignerResult};
use crate::typed_data::{TypeDeclaration, TypeSet, TypedMessage, Value, DEFAULT_DOMAIN_TYPE};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const DOMAIN_NAME: &str = "Paradex";
const DOMAIN_VERSION: &str = "1";

/// Domain data for `chain_id`.
pub fn domain(chain_id: &str) -> BTreeMap<String, Value> {
    fields([
        ("name", Value::text(DOMAIN_NAME)),
        ("chainId", Value::text(chain_id)),
        ("version", Value::text(DOMAIN_VERSION)),
    ])
}

/// `Constant{action:"Onboarding"}`, signed once when an account is registered.
pub fn onboarding_message(chain_id: &str) -> SignerResult<TypedMessage> {
    build(
        chain_id,
        "Constant",
        &[("action", "felt")],
        fields([("action", Value::text("Onboarding"))]),
    )
}

/// `Request{POST /v1/auth}` exchanged for a session token.
pub fn auth_message(chain_id: &str, timestamp: u64, expiration: u64) -> SignerResult<TypedMessage> {
    build(
        chain_id,
        "Request",
        &[
            ("method", "felt"),
            ("path", "felt"),
            ("body", "felt"),
            ("timestamp", "felt"),
            ("expiration", "felt"),
        ],
        fields([
            ("method", Value::text("POST")),
            ("path", Value::text("/v1/auth")),
            ("body", Value::text("")),
            ("timestamp", Value::Scalar(timestamp.into())),
            ("expiration", Value::Scalar(expiration.into())),
        ]),
    )
}

/// Order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    /// Encoded as `1`
    Buy,
    /// Encoded as `2`
    Sell,
}

impl OrderSide {
    /// Numeric code carried in the signed message.
    pub fn code(&self) -> &'static str {
        match self {
            OrderSide::Buy => "1",
            OrderSide::Sell => "2",
        }
    }
}

impl FromStr for OrderSide {
    type Err = ErrorCode;

    fn from_str(s: &str) -> SignerResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" | "1" => Ok(OrderSide::Buy),
            "SELL" | "2" => Ok(OrderSide::Sell),
            _ => Err(ErrorCode::E203_UnexpectedValue(
                "side".to_string(),
                format!("unknown order side '{}'", s),
            )),
        }
    }
}

/// Order kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    /// Executes at the best available price; signed with price `0`
    Market,
    /// Rests at a limit price
    Limit,
}

impl OrderType {
    /// Name carried in the signed message.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ErrorCode;

    fn from_str(s: &str) -> SignerResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            _ => Err(ErrorCode::E203_UnexpectedValue(
                "orderType".to_string(),
                format!("unknown order type '{}'", s),
            )),
        }
    }
}

/// Order fields as entered by a trader, in decimal units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPayload {
    /// Signature time, in milliseconds
    pub timestamp_ms: u64,
    /// Market symbol, e.g. `ETH-USD-PERP`
    pub market: String,
    /// Buy or sell
    pub side: OrderSide,
    /// Market or limit
    pub order_type: OrderType,
    /// Size in base units
    pub size: String,
    /// Limit price; ignored for market orders
    pub price: String,
}

/// `Order{...}` with size and price scaled to quantums.
pub fn order_message(chain_id: &str, order: &OrderPayload) -> SignerResult<TypedMessage> {
    let size = to_quantums(&order.size, QUANTUM_DECIMALS)?;
    let price = match order.order_type {
        OrderType::Market => "0".to_string(),
        OrderType::Limit => to_quantums(&order.price, QUANTUM_DECIMALS)?,
    };
    build(
        chain_id,
        "Order",
        &[
            ("timestamp", "felt"),
            ("market", "felt"),
            ("side", "felt"),
            ("orderType", "felt"),
            ("size", "felt"),
            ("price", "felt"),
        ],
        fields([
            ("timestamp", Value::Scalar(order.timestamp_ms.into())),
            ("market", Value::text(order.market.as_str())),
            ("side", Value::text(order.side.code())),
            ("orderType", Value::text(order.order_type.as_str())),
            ("size", Value::Text(size)),
            ("price", Value::Text(price)),
        ]),
    )
}

fn build(
    chain_id: &str,
    primary_type: &str,
    declaration: &[(&str, &str)],
    message: BTreeMap<String, Value>,
) -> SignerResult<TypedMessage> {
    let mut types = BTreeMap::new();
    types.insert(
        DEFAULT_DOMAIN_TYPE.to_string(),
        TypeDeclaration::from_pairs(&[("name", "felt"), ("chainId", "felt"), ("version", "felt")])?,
    );
    types.insert(primary_type.to_string(), TypeDeclaration::from_pairs(declaration)?);
    TypedMessage::new(TypeSet::new(types)?, primary_type, domain(chain_id), message)
}

fn fields<const N: usize>(pairs: [(&str, Value); N]) -> BTreeMap<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldElement;
    use crate::hash::TablePedersen;
    use crate::typed_data::{message_hash, type_signature};

    const GOERLI: &str = "PRIVATE_SN_POTC_GOERLI";
    const ACCOUNT: &str = "0x0129f3f3d6d5d1fb1c1cb8bb2fb2c1d7d6e2f9a0b3c4d5e6f708192a3b4c5d6e";

    fn hash(typed: &TypedMessage) -> String {
        let account = FieldElement::from_hex(ACCOUNT).unwrap();
        message_hash(&TablePedersen, typed, &account).unwrap().to_hex()
    }

    #[test]
    fn test_onboarding() {
        let typed = onboarding_message("0x1").unwrap();
        assert_eq!(
            type_signature(typed.types(), "Constant").unwrap(),
            "Constant(action:felt)"
        );
        assert_eq!(
            hash(&typed),
            "0x214c361ad7bf045ddda2b4bf49757bc85ddc6bc2a207eccb275a15dcf354e58"
        );
    }

    #[test]
    fn test_auth() {
        let typed = auth_message(GOERLI, 1_700_000_000, 1_700_604_800).unwrap();
        assert_eq!(
            hash(&typed),
            "0x5ec2fcaf0ce95f728aefa42ea41101e6918619071f781613a276662a50bafb9"
        );
    }

    #[test]
    fn test_chain_id_name_equals_hex() {
        let by_name = auth_message(GOERLI, 1, 2).unwrap();
        let encoded = FieldElement::from_short_string(GOERLI).unwrap().to_hex();
        let by_hex = auth_message(&encoded, 1, 2).unwrap();
        assert_eq!(hash(&by_name), hash(&by_hex));
    }

    #[test]
    fn test_limit_order() {
        let order = OrderPayload {
            timestamp_ms: 1_700_000_000_123,
            market: "ETH-USD-PERP".to_string(),
            side: "SELL".parse().unwrap(),
            order_type: OrderType::Limit,
            size: "4".to_string(),
            price: "5900".to_string(),
        };
        assert_eq!(
            hash(&order_message(GOERLI, &order).unwrap()),
            "0x103c5c3b53f7b32e7cc56721cc0cbe83897f363310b83691f0012d6d0eace45"
        );
    }

    #[test]
    fn test_market_order_ignores_price() {
        let mut order = OrderPayload {
            timestamp_ms: 1_700_000_000_123,
            market: "BTC-USD-PERP".to_string(),
            side: OrderSide::Buy,
            order_type: "market".parse().unwrap(),
            size: "0.001".to_string(),
            price: "".to_string(),
        };
        let expected = "0x3ece348e686dbc19f5722f6fd6f6787ceb6325602bb723e9d89761f1ec00c2c";
        assert_eq!(hash(&order_message(GOERLI, &order).unwrap()), expected);
        order.price = "65000".to_string();
        assert_eq!(hash(&order_message(GOERLI, &order).unwrap()), expected);
    }

    #[test]
    fn test_order_enum_parsing() {
        assert_eq!("buy".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert_eq!("2".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        assert!("hold".parse::<OrderSide>().is_err());
        assert!("STOP".parse::<OrderType>().is_err());
        assert_eq!(OrderType::Limit.to_string(), "LIMIT");
    }
}
