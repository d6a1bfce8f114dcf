mod awesome_oscillator;
mod kama;
mod ppo;
mod roc;
mod rsi;
mod stoch_rsi;
mod stochastic;
mod tsi;
mod ultimate_oscillator;
mod williams_r;

pub use awesome_oscillator::{
    AwesomeOscillator, AwesomeOscillatorConfig, AwesomeOscillatorConfigBuilder,
};
pub use kama::{Kama, KamaConfig, KamaConfigBuilder};
pub use ppo::{Ppo, PpoConfig, PpoConfigBuilder, PpoValue, Pvo, PvoConfig, PvoConfigBuilder};
pub use roc::{Momentum, MomentumConfig, MomentumConfigBuilder, Roc, RocConfig, RocConfigBuilder};
pub use rsi::{Rsi, RsiConfig, RsiConfigBuilder};
pub use stoch_rsi::{StochRsi, StochRsiConfig, StochRsiConfigBuilder, StochRsiValue};
pub use stochastic::{StochValue, Stochastic, StochasticConfig, StochasticConfigBuilder};
pub use tsi::{Tsi, TsiConfig, TsiConfigBuilder};
pub use ultimate_oscillator::{
    UltimateOscillator, UltimateOscillatorConfig, UltimateOscillatorConfigBuilder,
};
pub use williams_r::{WilliamsR, WilliamsRConfig, WilliamsRConfigBuilder};
