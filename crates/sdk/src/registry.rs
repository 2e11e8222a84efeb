#![warn(missing_docs)]
//! Network parameter discovery through the on-chain registry contract.

use ethabi::ParamType;
use ethabi::Token;
use jsonrpc_core::Call;
use jsonrpc_core::Id;
use jsonrpc_core::MethodCall;
use jsonrpc_core::Output;
use jsonrpc_core::Params;
use jsonrpc_core::Request;
use jsonrpc_core::Response;
use jsonrpc_core::Version;
use reqwest::Client as HttpClient;
use tiny_keccak::Hasher;
use tiny_keccak::Keccak;

use crate::error::Error;
use crate::error::Result;
use crate::types::ClientParams;
use crate::types::NetworkParams;

/// Solidity signature of the registry read method.
const GET_RELAYER_SIGNATURE: &str = "getRelayer()";

/// Read-only client of the registry contract.
pub struct RegistryClient {
    client: HttpClient,
    provider_url: String,
}

impl RegistryClient {
    /// Creates a new RegistryClient against the given json-rpc provider.
    pub fn new(provider_url: &str) -> Self {
        Self {
            client: HttpClient::default(),
            provider_url: provider_url.to_string(),
        }
    }

    /// Call `getRelayer()` on the registry contract and map its
    /// `(string, bytes[])` return value to [NetworkParams], taking the first
    /// public key.
    pub async fn get_relayer(&self, contract_address: &str) -> Result<NetworkParams> {
        let call = serde_json::json!({
            "to": contract_address,
            "data": format!("0x{}", hex::encode(selector(GET_RELAYER_SIGNATURE))),
        });

        let jsonrpc_request = Request::Single(Call::MethodCall(MethodCall {
            jsonrpc: Some(Version::V2),
            method: "eth_call".to_string(),
            params: Params::Array(vec![call, serde_json::Value::String("latest".to_string())]),
            id: Id::Num(1),
        }));

        let result = self.do_jsonrpc_request(&jsonrpc_request).await?;

        let return_hex = result
            .as_str()
            .ok_or_else(|| Error::Registry("eth_call result is not a string".to_string()))?;
        let return_data = hex::decode(return_hex.trim_start_matches("0x"))
            .map_err(|e| Error::Registry(format!("eth_call result is not hex: {e}")))?;

        decode_relayer_record(&return_data)
    }

    async fn do_jsonrpc_request(&self, req: &Request) -> Result<serde_json::Value> {
        let body =
            serde_json::to_string(req).map_err(|e| Error::Registry(e.to_string()))?;

        let resp = self
            .client
            .post(self.provider_url.as_str())
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Registry(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Registry(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| Error::Registry(e.to_string()))?;

        let jsonrpc_resp = Response::from_json(&String::from_utf8_lossy(&resp))
            .map_err(|e| Error::Registry(e.to_string()))?;

        match jsonrpc_resp {
            Response::Single(Output::Success(success)) => Ok(success.result),
            Response::Single(Output::Failure(failure)) => Err(Error::Registry(format!(
                "provider returned rpc error: {}",
                failure.error
            ))),
            Response::Batch(_) => Err(Error::Registry(
                "batch response is not supported".to_string(),
            )),
        }
    }
}

/// Fetch the relayer record described by `params`.
pub async fn fetch_network_params(params: &ClientParams) -> Result<NetworkParams> {
    RegistryClient::new(&params.provider_url)
        .get_relayer(&params.contract_address)
        .await
}

fn selector(signature: &str) -> [u8; 4] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(signature.as_bytes());
    hasher.finalize(&mut output);

    let mut selector = [0u8; 4];
    selector.copy_from_slice(&output[..4]);
    selector
}

fn decode_relayer_record(return_data: &[u8]) -> Result<NetworkParams> {
    let types = [
        ParamType::String,
        ParamType::Array(Box::new(ParamType::Bytes)),
    ];
    let mut tokens = ethabi::decode(&types, return_data)
        .map_err(|e| Error::Registry(format!("bad getRelayer return encoding: {e}")))?
        .into_iter();

    let relayer_address = match tokens.next() {
        Some(Token::String(address)) => address,
        other => {
            return Err(Error::Registry(format!(
                "unexpected relayer address token: {other:?}"
            )));
        }
    };

    let public_keys = match tokens.next() {
        Some(Token::Array(keys)) => keys,
        other => {
            return Err(Error::Registry(format!(
                "unexpected public keys token: {other:?}"
            )));
        }
    };

    let resolver_public_key = match public_keys.into_iter().next() {
        Some(Token::Bytes(blob)) => stringify_key(&blob),
        Some(other) => {
            return Err(Error::Registry(format!(
                "unexpected public key token: {other:?}"
            )));
        }
        None => {
            return Err(Error::Registry(
                "registry returned no resolver public keys".to_string(),
            ));
        }
    };

    Ok(NetworkParams {
        relayer_address,
        resolver_public_key,
    })
}

/// Registry key blobs are either PEM text or raw point bytes. Keep PEM as
/// text and hex-encode the rest; both forms convert back to the exact blob.
fn stringify_key(blob: &[u8]) -> String {
    match std::str::from_utf8(blob) {
        Ok(text) if text.trim_start().starts_with("-----BEGIN ") => text.to_string(),
        _ => format!("0x{}", hex::encode(blob)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(keys: Vec<Vec<u8>>) -> Vec<u8> {
        ethabi::encode(&[
            Token::String("http://localhost:8080".to_string()),
            Token::Array(keys.into_iter().map(Token::Bytes).collect()),
        ])
    }

    #[test]
    fn test_decode_relayer_record_takes_first_key() {
        let first = vec![2u8; 33];
        let second = vec![3u8; 33];
        let params = decode_relayer_record(&record(vec![first.clone(), second])).unwrap();

        assert_eq!(params.relayer_address, "http://localhost:8080");
        assert_eq!(
            params.resolver_public_key,
            format!("0x{}", hex::encode(first))
        );
    }

    #[test]
    fn test_decode_relayer_record_keeps_pem_text() {
        let pem = "-----BEGIN RSA PUBLIC KEY-----\nAAAA\n-----END RSA PUBLIC KEY-----\n";
        let params = decode_relayer_record(&record(vec![pem.as_bytes().to_vec()])).unwrap();

        assert_eq!(params.resolver_public_key, pem);
    }

    #[test]
    fn test_decode_relayer_record_requires_a_key() {
        assert!(matches!(
            decode_relayer_record(&record(vec![])),
            Err(Error::Registry(_))
        ));
    }

    #[test]
    fn test_decode_relayer_record_rejects_garbage() {
        assert!(matches!(
            decode_relayer_record(&[0xde, 0xad, 0xbe, 0xef]),
            Err(Error::Registry(_))
        ));
    }
}
