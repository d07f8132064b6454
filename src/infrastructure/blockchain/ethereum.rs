//! # Ethereum Contract Client
//!
//! Marketplace and NFT contract bindings using ethers-rs.
//!
//! Reads go through a plain HTTP provider. Writes go through a
//! [`SignerMiddleware`] wrapping the same provider, and each write waits for
//! the configured number of confirmations before returning.

use super::client::{
    ChainError, ChainResult, ListingRecord, MarketplaceReader, MarketplaceSigner, Network,
    TxHash, TxReceipt,
};
use crate::domain::value_objects::ListingId;
use async_trait::async_trait;
use bindings::{MarketplaceContract, NftContract};
use ethers::contract::ContractCall;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, U64, U256};
use std::sync::Arc;

mod bindings {
    #![allow(missing_docs)]

    use ethers::contract::abigen;

    abigen!(
        MarketplaceContract,
        r#"[
            function listNFT(address nft,uint256 tokenId,uint256 price)
            function buyNFT(uint256 listingId) payable
            function cancelListing(uint256 listingId)
            function listings(uint256) view returns (address seller,address nft,uint256 tokenId,uint256 price,bool active)
            function listingCount() view returns (uint256)
        ]"#
    );

    abigen!(
        NftContract,
        r#"[
            function setApprovalForAll(address operator,bool approved)
            function isApprovedForAll(address owner,address operator) view returns (bool)
        ]"#
    );
}

/// Provider with a local signing key attached.
pub type SignedClient = SignerMiddleware<Provider<Http>, LocalWallet>;

fn u256_to_u64(value: U256, what: &str) -> ChainResult<u64> {
    if value > U256::from(u64::MAX) {
        return Err(ChainError::decode(format!("{what} {value} exceeds u64")));
    }
    Ok(value.as_u64())
}

/// Read-only marketplace client over HTTP JSON-RPC.
#[derive(Debug, Clone)]
pub struct EthereumReader {
    provider: Arc<Provider<Http>>,
    marketplace: MarketplaceContract<Provider<Http>>,
}

impl EthereumReader {
    /// Creates a reader for the marketplace at `marketplace`.
    ///
    /// No request is made until the first call.
    ///
    /// # Errors
    ///
    /// Returns an error if `rpc_url` is not a valid URL.
    pub fn new(rpc_url: &str, marketplace: Address) -> ChainResult<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ChainError::connection(e.to_string()))?;
        let provider = Arc::new(provider);

        Ok(Self {
            marketplace: MarketplaceContract::new(marketplace, Arc::clone(&provider)),
            provider,
        })
    }

    /// Returns the underlying provider.
    #[must_use]
    pub fn provider(&self) -> Arc<Provider<Http>> {
        Arc::clone(&self.provider)
    }

    /// Returns the chain ID reported by the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    pub async fn chain_id(&self) -> ChainResult<u64> {
        let chain_id = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| ChainError::connection(e.to_string()))?;
        u256_to_u64(chain_id, "chain ID")
    }

    /// Checks that the endpoint serves `network`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::ChainMismatch`] if it serves another chain, or a
    /// connection error if the endpoint is unreachable.
    pub async fn ensure_network(&self, network: Network) -> ChainResult<()> {
        let actual = self.chain_id().await?;
        if actual != network.chain_id() {
            return Err(ChainError::ChainMismatch {
                expected: network.chain_id(),
                actual,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MarketplaceReader for EthereumReader {
    async fn listing_count(&self) -> ChainResult<u64> {
        let count = self
            .marketplace
            .listing_count()
            .call()
            .await
            .map_err(|e| ChainError::call(e.to_string()))?;
        u256_to_u64(count, "listing count")
    }

    async fn listing(&self, id: ListingId) -> ChainResult<ListingRecord> {
        let (seller, nft_contract, token_id, price, active) = self
            .marketplace
            .listings(id.into())
            .call()
            .await
            .map_err(|e| ChainError::call(format!("listings({id}): {e}")))?;

        Ok(ListingRecord {
            seller,
            nft_contract,
            token_id,
            price,
            active,
        })
    }

    async fn is_approved_for_all(
        &self,
        nft_contract: Address,
        owner: Address,
        operator: Address,
    ) -> ChainResult<bool> {
        NftContract::new(nft_contract, Arc::clone(&self.provider))
            .is_approved_for_all(owner, operator)
            .call()
            .await
            .map_err(|e| ChainError::call(e.to_string()))
    }
}

/// Signing marketplace client for one local account.
#[derive(Debug, Clone)]
pub struct EthereumSigner {
    account: Address,
    client: Arc<SignedClient>,
    marketplace: MarketplaceContract<SignedClient>,
    confirmations: usize,
}

impl EthereumSigner {
    /// Creates a signer that sends from `wallet` through `provider`.
    #[must_use]
    pub fn new(
        provider: Provider<Http>,
        wallet: LocalWallet,
        marketplace: Address,
        confirmations: usize,
    ) -> Self {
        let account = wallet.address();
        let client = Arc::new(SignerMiddleware::new(provider, wallet));

        Self {
            account,
            marketplace: MarketplaceContract::new(marketplace, Arc::clone(&client)),
            client,
            confirmations,
        }
    }

    /// Sends `call` and waits for it to be confirmed.
    async fn submit(
        &self,
        call: ContractCall<SignedClient, ()>,
        action: &'static str,
    ) -> ChainResult<TxReceipt> {
        let pending = call
            .send()
            .await
            .map_err(|e| ChainError::transaction(e.to_string()))?;
        let tx_hash = TxHash::from(pending.tx_hash());
        tracing::info!(action, tx_hash = %tx_hash, "transaction submitted");

        let receipt = pending
            .confirmations(self.confirmations)
            .await
            .map_err(|e| ChainError::transaction(e.to_string()))?
            .ok_or_else(|| {
                ChainError::transaction(format!("transaction {tx_hash} dropped from mempool"))
            })?;

        if receipt.status != Some(U64::one()) {
            return Err(ChainError::reverted(format!("{action} ({tx_hash})")));
        }

        Ok(TxReceipt {
            tx_hash,
            block_number: receipt.block_number.map(|n| n.as_u64()).unwrap_or_default(),
            gas_used: receipt.gas_used.map(|g| g.low_u64()).unwrap_or_default(),
        })
    }
}

#[async_trait]
impl MarketplaceSigner for EthereumSigner {
    fn account(&self) -> Address {
        self.account
    }

    async fn set_approval_for_all(
        &self,
        nft_contract: Address,
        operator: Address,
        approved: bool,
    ) -> ChainResult<TxReceipt> {
        let call = NftContract::new(nft_contract, Arc::clone(&self.client))
            .set_approval_for_all(operator, approved);
        self.submit(call, "setApprovalForAll").await
    }

    async fn list_nft(
        &self,
        nft_contract: Address,
        token_id: U256,
        price: U256,
    ) -> ChainResult<TxReceipt> {
        let call = self.marketplace.list_nft(nft_contract, token_id, price);
        self.submit(call, "listNFT").await
    }

    async fn buy_nft(&self, id: ListingId, value: U256) -> ChainResult<TxReceipt> {
        let call = self.marketplace.buy_nft(id.into()).value(value);
        self.submit(call, "buyNFT").await
    }

    async fn cancel_listing(&self, id: ListingId) -> ChainResult<TxReceipt> {
        let call = self.marketplace.cancel_listing(id.into());
        self.submit(call, "cancelListing").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use ethers::abi::{Token, encode};
    use ethers::utils::hex;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rpc_result(result: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": result,
        }))
    }

    fn abi_hex(tokens: &[Token]) -> String {
        format!("0x{}", hex::encode(encode(tokens)))
    }

    fn reader_for(server: &MockServer) -> EthereumReader {
        EthereumReader::new(&server.uri(), Address::from_low_u64_be(0x3a4b)).unwrap()
    }

    #[test]
    fn rejects_malformed_rpc_url() {
        let result = EthereumReader::new("not a url", Address::zero());
        assert!(matches!(result, Err(ChainError::Connection(_))));
    }

    #[test]
    fn u256_conversion_guards_overflow() {
        assert_eq!(u256_to_u64(U256::from(9u64), "count").unwrap(), 9);
        assert!(matches!(
            u256_to_u64(U256::MAX, "count"),
            Err(ChainError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn reads_listing_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_call" })))
            .respond_with(rpc_result(json!(abi_hex(&[Token::Uint(U256::from(5u64))]))))
            .mount(&server)
            .await;

        let reader = reader_for(&server);
        assert_eq!(reader.listing_count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn reads_listing_record() {
        let seller = Address::from_low_u64_be(0xa11ce);
        let nft = Address::from_low_u64_be(0x4f7);
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_call" })))
            .respond_with(rpc_result(json!(abi_hex(&[
                Token::Address(seller),
                Token::Address(nft),
                Token::Uint(U256::from(42u64)),
                Token::Uint(U256::exp10(18)),
                Token::Bool(true),
            ]))))
            .mount(&server)
            .await;

        let reader = reader_for(&server);
        let record = reader.listing(ListingId::FIRST).await.unwrap();
        assert_eq!(record.seller, seller);
        assert_eq!(record.nft_contract, nft);
        assert_eq!(record.token_id, U256::from(42u64));
        assert_eq!(record.price, U256::exp10(18));
        assert!(record.active);
    }

    #[tokio::test]
    async fn rpc_error_becomes_call_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32000, "message": "execution reverted" },
            })))
            .mount(&server)
            .await;

        let reader = reader_for(&server);
        assert!(matches!(
            reader.listing_count().await,
            Err(ChainError::Call(_))
        ));
    }

    #[tokio::test]
    async fn network_check_accepts_matching_chain() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_chainId" })))
            .respond_with(rpc_result(json!("0xaa36a7")))
            .mount(&server)
            .await;

        let reader = reader_for(&server);
        assert_eq!(reader.chain_id().await.unwrap(), 11_155_111);
        assert!(reader.ensure_network(Network::Sepolia).await.is_ok());
    }

    #[tokio::test]
    async fn network_check_rejects_other_chain() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_chainId" })))
            .respond_with(rpc_result(json!("0x1")))
            .mount(&server)
            .await;

        let reader = reader_for(&server);
        let err = reader.ensure_network(Network::Sepolia).await.unwrap_err();
        assert!(matches!(
            err,
            ChainError::ChainMismatch {
                expected: 11_155_111,
                actual: 1
            }
        ));
    }

    mod signing {
        use super::*;
        use ethers::types::transaction::eip2718::TypedTransaction;
        use ethers::utils::{id, rlp::Rlp};
        use std::time::Duration;

        // Well-known development key (anvil/hardhat account #0).
        const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        const TX_HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";
        const BLOCK_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

        fn marketplace() -> Address {
            Address::from_low_u64_be(0x3a4b)
        }

        fn nft() -> Address {
            Address::from_low_u64_be(0x4f7)
        }

        fn signer_for(server: &MockServer) -> EthereumSigner {
            let provider = Provider::<Http>::try_from(server.uri().as_str())
                .unwrap()
                .interval(Duration::from_millis(10));
            let wallet = DEV_KEY
                .parse::<LocalWallet>()
                .unwrap()
                .with_chain_id(Network::Sepolia.chain_id());
            EthereumSigner::new(provider, wallet, marketplace(), 1)
        }

        async fn answer(server: &MockServer, rpc_method: &str, result: serde_json::Value) {
            Mock::given(method("POST"))
                .and(body_partial_json(json!({ "method": rpc_method })))
                .respond_with(rpc_result(result))
                .mount(server)
                .await;
        }

        /// Nonce, fee and gas queries made while filling a transaction.
        async fn fillable(server: &MockServer) {
            answer(server, "eth_getTransactionCount", json!("0x0")).await;
            answer(
                server,
                "eth_getBlockByNumber",
                json!({ "number": "0x10", "baseFeePerGas": "0x3b9aca00" }),
            )
            .await;
            answer(
                server,
                "eth_feeHistory",
                json!({
                    "oldestBlock": "0x6",
                    "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
                    "gasUsedRatio": [0.5],
                    "reward": [],
                }),
            )
            .await;
            answer(server, "eth_estimateGas", json!("0xc350")).await;
        }

        /// A node that accepts the transaction and mines it with `status`.
        async fn mining(server: &MockServer, status: &str) {
            fillable(server).await;
            answer(server, "eth_sendRawTransaction", json!(TX_HASH)).await;
            answer(
                server,
                "eth_getTransactionByHash",
                json!({
                    "hash": TX_HASH,
                    "nonce": "0x0",
                    "blockHash": BLOCK_HASH,
                    "blockNumber": "0x10",
                    "transactionIndex": "0x0",
                    "value": "0x0",
                    "gas": "0xc350",
                    "input": "0x",
                    "v": "0x1",
                    "r": "0x1",
                    "s": "0x1",
                }),
            )
            .await;
            answer(
                server,
                "eth_getTransactionReceipt",
                json!({
                    "transactionHash": TX_HASH,
                    "transactionIndex": "0x0",
                    "blockHash": BLOCK_HASH,
                    "blockNumber": "0x10",
                    "from": format!("{:#x}", Address::zero()),
                    "to": format!("{:#x}", marketplace()),
                    "cumulativeGasUsed": "0xc350",
                    "gasUsed": "0xc350",
                    "contractAddress": null,
                    "logs": [],
                    "status": status,
                    "logsBloom": format!("0x{}", "0".repeat(512)),
                }),
            )
            .await;
        }

        /// Decodes the raw transaction the node received.
        async fn sent(server: &MockServer) -> TypedTransaction {
            let raw = server
                .received_requests()
                .await
                .unwrap()
                .iter()
                .find_map(|request| {
                    let body: serde_json::Value = request.body_json().ok()?;
                    if body["method"] != "eth_sendRawTransaction" {
                        return None;
                    }
                    body["params"][0].as_str().map(str::to_owned)
                })
                .unwrap();
            let bytes = hex::decode(raw.trim_start_matches("0x")).unwrap();
            TypedTransaction::decode_signed(&Rlp::new(&bytes)).unwrap().0
        }

        fn calldata(signature: &str, args: &[Token]) -> Vec<u8> {
            let mut data = id(signature).to_vec();
            data.extend(encode(args));
            data
        }

        #[tokio::test]
        async fn confirmed_purchase_attaches_payment() {
            let server = MockServer::start().await;
            mining(&server, "0x1").await;
            let price = U256::from(1_500_000_000_000_000_000u64);

            let receipt = signer_for(&server)
                .buy_nft(ListingId::new(3).unwrap(), price)
                .await
                .unwrap();
            assert_eq!(receipt.tx_hash.as_str(), TX_HASH);
            assert_eq!(receipt.block_number, 16);
            assert_eq!(receipt.gas_used, 50_000);

            let tx = sent(&server).await;
            assert_eq!(tx.to_addr(), Some(&marketplace()));
            assert_eq!(tx.value(), Some(&price));
            assert_eq!(
                tx.data().unwrap().to_vec(),
                calldata("buyNFT(uint256)", &[Token::Uint(U256::from(3u64))])
            );
        }

        #[tokio::test]
        async fn approval_targets_nft_contract() {
            let server = MockServer::start().await;
            mining(&server, "0x1").await;

            signer_for(&server)
                .set_approval_for_all(nft(), marketplace(), true)
                .await
                .unwrap();

            let tx = sent(&server).await;
            assert_eq!(tx.to_addr(), Some(&nft()));
            assert_eq!(tx.value().copied().unwrap_or_default(), U256::zero());
            assert_eq!(
                tx.data().unwrap().to_vec(),
                calldata(
                    "setApprovalForAll(address,bool)",
                    &[Token::Address(marketplace()), Token::Bool(true)]
                )
            );
        }

        #[tokio::test]
        async fn failed_status_is_a_revert() {
            let server = MockServer::start().await;
            mining(&server, "0x0").await;

            let result = signer_for(&server).cancel_listing(ListingId::FIRST).await;
            assert!(matches!(result, Err(ChainError::Reverted(_))));
        }

        #[tokio::test]
        async fn dropped_transaction_is_a_transaction_error() {
            let server = MockServer::start().await;
            fillable(&server).await;
            answer(&server, "eth_sendRawTransaction", json!(TX_HASH)).await;
            answer(&server, "eth_getTransactionByHash", serde_json::Value::Null).await;

            let result = signer_for(&server)
                .list_nft(nft(), U256::from(7u64), U256::exp10(17))
                .await;
            assert!(matches!(result, Err(ChainError::Transaction(_))));
        }

        #[tokio::test]
        async fn rejected_submission_is_a_transaction_error() {
            let server = MockServer::start().await;
            fillable(&server).await;
            Mock::given(method("POST"))
                .and(body_partial_json(json!({ "method": "eth_sendRawTransaction" })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": { "code": -32000, "message": "insufficient funds for gas * price + value" },
                })))
                .mount(&server)
                .await;

            let result = signer_for(&server)
                .buy_nft(ListingId::FIRST, U256::exp10(18))
                .await;
            assert!(matches!(result, Err(ChainError::Transaction(_))));
        }
    }
}
