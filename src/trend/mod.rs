mod adx;
mod aroon;
mod cci;
mod dpo;
mod ema;
mod macd;
mod psar;
mod sma;
mod trix;
mod vortex;
mod wma;

pub use adx::{Adx, AdxConfig, AdxConfigBuilder, AdxValue};
pub use aroon::{Aroon, AroonConfig, AroonConfigBuilder, AroonValue};
pub use cci::{Cci, CciConfig, CciConfigBuilder};
pub use dpo::{Dpo, DpoConfig, DpoConfigBuilder};
pub use ema::{Ema, EmaConfig, EmaConfigBuilder};
pub use macd::{Macd, MacdConfig, MacdConfigBuilder, MacdValue};
pub use psar::{Psar, PsarConfig, PsarConfigBuilder};
pub use sma::{Sma, SmaConfig, SmaConfigBuilder};
pub use trix::{Trix, TrixConfig, TrixConfigBuilder};
pub use vortex::{Vortex, VortexConfig, VortexConfigBuilder, VortexValue};
pub use wma::{Wma, WmaConfig, WmaConfigBuilder};
