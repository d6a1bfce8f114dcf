mod accumulation;
mod cumulative;
mod eom;
mod force_index;
mod mfi;
mod volume_ratio;
mod vwap;

use crate::Price;

pub use accumulation::{Adi, AdiConfig, AdiConfigBuilder, Cmf, CmfConfig, CmfConfigBuilder};
pub use cumulative::{
    Nvi, NviConfig, NviConfigBuilder, Obv, ObvConfig, ObvConfigBuilder, Vpt, VptConfig,
    VptConfigBuilder,
};
pub use eom::{Eom, EomConfig, EomConfigBuilder};
pub use force_index::{ForceIndex, ForceIndexConfig, ForceIndexConfigBuilder};
pub use mfi::{Mfi, MfiConfig, MfiConfigBuilder};
pub use volume_ratio::{VolumeRatio, VolumeRatioConfig, VolumeRatioConfigBuilder};
pub use vwap::{Vwap, VwapConfig, VwapConfigBuilder, Vwema, VwemaConfig, VwemaConfigBuilder};

/// `(H + L + C) / 3`.
#[inline]
fn typical_price(high: Price, low: Price, close: Price) -> Price {
    (high + low + close) / 3.0
}
