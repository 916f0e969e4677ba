//! Tracked liquidity pools and the category ("cluster") each belongs to.
//!
//! Addresses are matched case-insensitively; the dashboard receives them in
//! both checksummed and lowercase form.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum PoolCluster {
    #[strum(serialize = "Stable Pairs")]
    #[serde(rename = "Stable Pairs")]
    StablePairs,
    #[strum(serialize = "WBTC-WETH")]
    #[serde(rename = "WBTC-WETH")]
    WbtcWeth,
    #[strum(serialize = "USDC-WETH")]
    #[serde(rename = "USDC-WETH")]
    UsdcWeth,
    #[strum(serialize = "USDT-WETH")]
    #[serde(rename = "USDT-WETH")]
    UsdtWeth,
    #[strum(serialize = "DAI-WETH")]
    #[serde(rename = "DAI-WETH")]
    DaiWeth,
    #[strum(serialize = "USDC-WBTC")]
    #[serde(rename = "USDC-WBTC")]
    UsdcWbtc,
    #[strum(serialize = "Altcoin-WETH")]
    #[serde(rename = "Altcoin-WETH")]
    AltcoinWeth,
}

impl PoolCluster {
    /// Canonical category order for cluster charts.
    pub fn universe() -> Vec<String> {
        PoolCluster::iter().map(|c| c.to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool {
    pub address: &'static str,
    pub name: &'static str,
    pub cluster: PoolCluster,
}

const fn pool(address: &'static str, name: &'static str, cluster: PoolCluster) -> Pool {
    Pool {
        address,
        name,
        cluster,
    }
}

static POOLS: [Pool; 23] = [
    pool("0x88e6A0c2dDD26FEEb64F039a2c41296FcB3f5640", "USDC-WETH-500", PoolCluster::UsdcWeth),
    pool("0x3416cF6C708Da44DB2624D63ea0AAef7113527C6", "USDC-USDT-100", PoolCluster::StablePairs),
    pool("0x11b815efB8f581194ae79006d24E0d814B7697F6", "WETH-USDT-500", PoolCluster::UsdtWeth),
    pool("0x4585FE77225b41b697C938B018E2Ac67Ac5a20c0", "WBTC-WETH-500", PoolCluster::WbtcWeth),
    pool("0x8ad599c3A0ff1De082011EFDDc58f1908eb6e6D8", "USDC-WETH-3000", PoolCluster::UsdcWeth),
    pool("0xc7bBeC68d12a0d1830360F8Ec58fA599bA1b0e9b", "WETH-USDT-100", PoolCluster::UsdtWeth),
    pool("0xCBCdF9626bC03E24f779434178A73a0B4bad62eD", "WBTC-WETH-3000", PoolCluster::WbtcWeth),
    pool("0x5777d92f208679DB4b9778590Fa3CAB3aC9e2168", "DAI-USDC-100", PoolCluster::StablePairs),
    pool("0x4e68Ccd3E89f51C3074ca5072bbAC773960dFa36", "WETH-USDT-3000", PoolCluster::UsdtWeth),
    pool("0x60594a405d53811d3BC4766596EFD80fd545A270", "DAI-WETH-500", PoolCluster::DaiWeth),
    pool("0x7858E59e0C01EA06Df3aF3D20aC7B0003275D4Bf", "USDC-USDT-500", PoolCluster::StablePairs),
    pool("0x435664008F38B0650fBC1C9fc971D0A3Bc2f1e47", "USDe-USDT-100", PoolCluster::StablePairs),
    pool("0xa6Cc3C2531FdaA6Ae1A3CA84c2855806728693e8", "LINK-WETH-3000", PoolCluster::AltcoinWeth),
    pool("0x11950d141EcB863F01007AdD7D1A342041227b58", "PEPE-WETH-3000", PoolCluster::AltcoinWeth),
    pool("0x9a772018FbD77fcD2d25657e5C547BAfF3Fd7D16", "WBTC-USDC-500", PoolCluster::UsdcWbtc),
    pool("0x99ac8cA7087fA4A2A1FB6357269965A2014ABc35", "WBTC-USDC-3000", PoolCluster::UsdcWbtc),
    pool("0xa3f558aebAecAf0e11cA4b2199cC5Ed341edfd74", "LDO-WETH-3000", PoolCluster::AltcoinWeth),
    pool("0x1d42064Fc4Beb5F8aAF85F4617AE8b3b5B8Bd801", "UNI-WETH-3000", PoolCluster::AltcoinWeth),
    pool("0xC2e9F25Be6257c210d7Adf0D4Cd6E3E881ba25f8", "DAI-WETH-3000", PoolCluster::DaiWeth),
    pool("0x48DA0965ab2d2cbf1C17C09cFB5Cbe67Ad5B1406", "DAI-USDT-100", PoolCluster::StablePairs),
    pool("0x840DEEef2f115Cf50DA625F7368C24af6fE74410", "cbETH-WETH-500", PoolCluster::AltcoinWeth),
    pool("0x0d4a11d5EEaaC28EC3F61d100daF4d40471f1852", "USDT-WETH-v2", PoolCluster::UsdtWeth),
    pool("0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc", "WETH-USDC-v2", PoolCluster::UsdcWeth),
];

pub fn pools() -> &'static [Pool] {
    &POOLS
}

pub fn find_pool(address: &str) -> Option<&'static Pool> {
    let address = address.trim();
    POOLS.iter().find(|p| p.address.eq_ignore_ascii_case(address))
}

/// Display name for a pool, or the address itself when it is not tracked.
pub fn pool_name(address: &str) -> String {
    find_pool(address)
        .map(|p| p.name.to_string())
        .unwrap_or_else(|| address.to_string())
}

pub fn cluster_of(address: &str) -> Option<PoolCluster> {
    find_pool(address).map(|p| p.cluster)
}
