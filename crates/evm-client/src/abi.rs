//! ABI fragments for the venue call surface
//!
//! Encoders/decoders for the handful of read-only router and pair calls the
//! adapters issue. Functions are described as `ethabi::Function` values so
//! selectors are derived from the signature rather than hardcoded.

#![allow(deprecated)] // ethabi::Function::constant is deprecated but required by the struct literal

use ethabi::{Function, Param, ParamType, StateMutability, Token};
use ethereum_types::{Address, U256};
use routescout_core::RpcError;

fn param(name: &str, kind: ParamType) -> Param {
    Param {
        name: name.to_string(),
        kind,
        internal_type: None,
    }
}

fn view_function(name: &str, inputs: Vec<Param>, outputs: Vec<Param>) -> Function {
    Function {
        name: name.to_string(),
        inputs,
        outputs,
        constant: None,
        state_mutability: StateMutability::View,
    }
}

/// `getAmountsOut(uint256,address[])` on a Uniswap-V2-style router
pub fn get_amounts_out() -> Function {
    view_function(
        "getAmountsOut",
        vec![
            param("amountIn", ParamType::Uint(256)),
            param("path", ParamType::Array(Box::new(ParamType::Address))),
        ],
        vec![param(
            "amounts",
            ParamType::Array(Box::new(ParamType::Uint(256))),
        )],
    )
}

/// `getAmountsOut(uint256,(address,address,bool)[])` on a Solidly-style
/// router, where each route names its pool sub-type via the `stable` flag
pub fn get_amounts_out_routes() -> Function {
    let route = ParamType::Tuple(vec![ParamType::Address, ParamType::Address, ParamType::Bool]);
    view_function(
        "getAmountsOut",
        vec![
            param("amountIn", ParamType::Uint(256)),
            param("routes", ParamType::Array(Box::new(route))),
        ],
        vec![param(
            "amounts",
            ParamType::Array(Box::new(ParamType::Uint(256))),
        )],
    )
}

/// `getPair(address,address)` on a V2 factory
pub fn get_pair() -> Function {
    view_function(
        "getPair",
        vec![
            param("tokenA", ParamType::Address),
            param("tokenB", ParamType::Address),
        ],
        vec![param("pair", ParamType::Address)],
    )
}

/// `getReserves()` on a V2 pair
pub fn get_reserves() -> Function {
    view_function(
        "getReserves",
        vec![],
        vec![
            param("reserve0", ParamType::Uint(112)),
            param("reserve1", ParamType::Uint(112)),
            param("blockTimestampLast", ParamType::Uint(32)),
        ],
    )
}

/// Encode a `getAmountsOut` call for a plain address path
pub fn encode_get_amounts_out(amount_in: U256, path: &[Address]) -> Result<Vec<u8>, RpcError> {
    let path_tokens: Vec<Token> = path.iter().map(|&a| Token::Address(a)).collect();
    get_amounts_out()
        .encode_input(&[Token::Uint(amount_in), Token::Array(path_tokens)])
        .map_err(|e| RpcError::Parse(format!("encode getAmountsOut: {}", e)))
}

/// Encode a Solidly-style `getAmountsOut` call for a single (from, to, stable) route
pub fn encode_get_amounts_out_route(
    amount_in: U256,
    from: Address,
    to: Address,
    stable: bool,
) -> Result<Vec<u8>, RpcError> {
    let route = Token::Tuple(vec![
        Token::Address(from),
        Token::Address(to),
        Token::Bool(stable),
    ]);
    get_amounts_out_routes()
        .encode_input(&[Token::Uint(amount_in), Token::Array(vec![route])])
        .map_err(|e| RpcError::Parse(format!("encode getAmountsOut(routes): {}", e)))
}

/// Decode the `uint256[] amounts` return of either `getAmountsOut` variant
/// and extract the final hop's output amount
pub fn decode_amounts_out(function: &Function, data: &[u8]) -> Result<U256, RpcError> {
    let decoded = function
        .decode_output(data)
        .map_err(|e| RpcError::Parse(format!("decode getAmountsOut: {}", e)))?;
    let amounts = match decoded.first() {
        Some(Token::Array(arr)) => arr,
        _ => return Err(RpcError::Parse("unexpected getAmountsOut shape".to_string())),
    };
    match amounts.last() {
        Some(Token::Uint(value)) => Ok(*value),
        _ => Err(RpcError::Parse("empty amounts array".to_string())),
    }
}

/// Encode a `getPair` call
pub fn encode_get_pair(token_a: Address, token_b: Address) -> Result<Vec<u8>, RpcError> {
    get_pair()
        .encode_input(&[Token::Address(token_a), Token::Address(token_b)])
        .map_err(|e| RpcError::Parse(format!("encode getPair: {}", e)))
}

/// Decode a `getPair` return. A zero address means the pair does not exist.
pub fn decode_pair(data: &[u8]) -> Result<Option<Address>, RpcError> {
    let decoded = get_pair()
        .decode_output(data)
        .map_err(|e| RpcError::Parse(format!("decode getPair: {}", e)))?;
    match decoded.first() {
        Some(Token::Address(addr)) if addr.is_zero() => Ok(None),
        Some(Token::Address(addr)) => Ok(Some(*addr)),
        _ => Err(RpcError::Parse("unexpected getPair shape".to_string())),
    }
}

/// Encode a `getReserves` call
pub fn encode_get_reserves() -> Result<Vec<u8>, RpcError> {
    get_reserves()
        .encode_input(&[])
        .map_err(|e| RpcError::Parse(format!("encode getReserves: {}", e)))
}

/// Decode a `getReserves` return into (reserve0, reserve1)
pub fn decode_reserves(data: &[u8]) -> Result<(U256, U256), RpcError> {
    let decoded = get_reserves()
        .decode_output(data)
        .map_err(|e| RpcError::Parse(format!("decode getReserves: {}", e)))?;
    match (decoded.first(), decoded.get(1)) {
        (Some(Token::Uint(r0)), Some(Token::Uint(r1))) => Ok((*r0, *r1)),
        _ => Err(RpcError::Parse("unexpected getReserves shape".to_string())),
    }
}
