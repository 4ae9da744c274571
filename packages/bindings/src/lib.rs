use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use bond_yield_core::contract::{self, BondRequest};
use bond_yield_core::{pricing, schedule, BondYieldError};

/// Convert an engine error into a napi::Error, keeping its kind visible to JS callers.
fn to_napi_error(e: BondYieldError) -> napi::Error {
    napi::Error::from_reason(format!("{}: {}", e.kind(), e))
}

fn parse_request(request_json: &str) -> NapiResult<BondRequest> {
    serde_json::from_str(request_json).map_err(|e| to_napi_error(e.into()))
}

/// Request JSON in, response JSON out: the contract the web form consumes.
#[napi]
pub fn calculate_bond(request_json: String) -> NapiResult<String> {
    let request = parse_request(&request_json)?;
    let response = contract::calculate_bond(&request).map_err(to_napi_error)?;
    serde_json::to_string(&response).map_err(|e| to_napi_error(e.into()))
}

/// Cash-flow schedule only, as a JSON array.
#[napi]
pub fn generate_schedule(request_json: String) -> NapiResult<String> {
    let params = parse_request(&request_json)?
        .to_parameters()
        .map_err(to_napi_error)?;
    let rows = schedule::generate_schedule(&params).map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(|e| to_napi_error(e.into()))
}

/// Price of the bond described by `request_json` at `annual_yield` percent.
#[napi]
pub fn price_at_yield(request_json: String, annual_yield: f64) -> NapiResult<f64> {
    let params = parse_request(&request_json)?
        .to_parameters()
        .map_err(to_napi_error)?;
    let y = Decimal::from_f64(annual_yield)
        .ok_or_else(|| napi::Error::from_reason("InvalidParameter: yield must be finite"))?;
    let price = pricing::price_at_yield(&params, y).map_err(to_napi_error)?;
    price
        .to_f64()
        .ok_or_else(|| napi::Error::from_reason("InvalidParameter: price is not representable"))
}
