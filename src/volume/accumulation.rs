use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, Schema, Tick, backend,
    config::{fixed_config, window_config},
    rolling::WindowSum,
};

/// Close location value: `((C − L) − (H − C)) / (H − L)`, 0 for a flat bar.
#[inline]
fn money_flow_multiplier(high: Price, low: Price, close: Price) -> f64 {
    let range = high - low;
    if range == 0.0 {
        return 0.0;
    }
    ((close - low) - (high - close)) / range
}

fixed_config!(
    /// Configuration for the Accumulation/Distribution Index ([`Adi`]).
    AdiConfig, AdiConfigBuilder,
    schema: Schema::HLCV,
    required_ticks: 1,
);

window_config!(
    /// Configuration for the Chaikin Money Flow ([`Cmf`]).
    ///
    /// Defaults: window 20.
    CmfConfig, CmfConfigBuilder,
    window: 20,
    schema: Schema::HLCV,
    required_ticks: |window| window,
);

/// Accumulation/Distribution Index: running total of money flow volume.
///
/// ```text
/// ADI = ADI' + multiplier × volume
/// ```
#[derive(Clone, Debug)]
pub struct Adi {
    config: AdiConfig,
    total: Option<f64>,
}

impl Indicator for Adi {
    type Config = AdiConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Adi;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            total: None,
        }
    }

    fn config(&self) -> &AdiConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (high, low, close, volume) = tick.hlcv_values()?;
        let flow = money_flow_multiplier(high, low, close) * volume;
        let total = self.total.unwrap_or(0.0) + flow;
        self.total = Some(total);
        Ok(Some(total))
    }

    fn value(&self) -> Option<f64> {
        self.total
    }

    fn reset(&mut self) {
        self.total = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Adi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ADI")
    }
}

/// Chaikin Money Flow: money flow volume over total volume of the window.
///
/// ```text
/// CMF = Σ(multiplier × volume) / Σ volume     (Σ volume = 0 → 0)
/// ```
#[derive(Clone, Debug)]
pub struct Cmf {
    config: CmfConfig,
    backend: Backend,
    flows: WindowSum,
    volumes: WindowSum,
    current: Option<f64>,
}

impl Indicator for Cmf {
    type Config = CmfConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Cmf;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                flows: WindowSum::new(backend, config.window)?,
                volumes: WindowSum::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &CmfConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (high, low, close, volume) = tick.hlcv_values()?;

        let flows = self
            .flows
            .push(money_flow_multiplier(high, low, close) * volume);
        let volumes = self.volumes.push(volume);
        if let (Some(flows), Some(volumes)) = (flows, volumes) {
            self.current = Some(if volumes == 0.0 { 0.0 } else { flows / volumes });
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.flows.clear();
        self.volumes.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for Cmf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CMF({})", self.config.window)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_near, feed, hlcv, walk};

    #[test]
    fn multiplier_spans_minus_one_to_one() {
        assert_eq!(money_flow_multiplier(10.0, 8.0, 10.0), 1.0);
        assert_eq!(money_flow_multiplier(10.0, 8.0, 8.0), -1.0);
        assert_eq!(money_flow_multiplier(10.0, 8.0, 9.0), 0.0);
        assert_eq!(money_flow_multiplier(9.0, 9.0, 9.0), 0.0);
    }

    mod adi {
        use super::*;

        #[test]
        fn accumulates_from_first_tick() {
            let mut adi = Adi::new(AdiConfig);
            let out = feed(
                &mut adi,
                &[hlcv(10.0, 8.0, 10.0, 100.0), hlcv(10.0, 8.0, 8.0, 40.0)],
            );
            assert_eq!(out, vec![Some(100.0), Some(60.0)]);
        }

        #[test]
        fn reset_restarts_total() {
            let mut adi = Adi::new(AdiConfig);
            adi.update(&hlcv(10.0, 8.0, 10.0, 100.0)).unwrap();
            adi.reset();
            assert_eq!(adi.value(), None);
            assert_eq!(adi.update(&hlcv(10.0, 8.0, 10.0, 5.0)), Ok(Some(5.0)));
        }

        #[test]
        fn display() {
            assert_eq!(Adi::new(AdiConfig).to_string(), "ADI");
        }
    }

    mod cmf {
        use super::*;

        #[test]
        fn ratio_of_flow_to_volume() {
            let mut cmf = Cmf::new(CmfConfig::new(2).unwrap());
            let out = feed(
                &mut cmf,
                &[hlcv(10.0, 8.0, 10.0, 30.0), hlcv(10.0, 8.0, 8.0, 10.0)],
            );
            // (30 − 10) / 40
            assert_eq!(out, vec![None, Some(0.5)]);
        }

        #[test]
        fn zero_volume_is_zero() {
            let mut cmf = Cmf::new(CmfConfig::new(2).unwrap());
            let out = feed(&mut cmf, &[hlcv(10.0, 8.0, 10.0, 0.0); 2]);
            assert_eq!(out[1], Some(0.0));
        }

        #[test]
        fn backends_agree() {
            let ticks = walk(120);
            let config = CmfConfig::default();
            let mut native = Cmf::with_backend(config, Backend::Native);
            let mut fallback = Cmf::with_backend(config, Backend::Fallback);
            for (n, f) in feed(&mut native, &ticks).iter().zip(feed(&mut fallback, &ticks)) {
                match (n, f) {
                    (Some(n), Some(f)) => assert_near!(*n, f, 1e-9),
                    (n, f) => assert_eq!(*n, f),
                }
            }
        }

        #[test]
        fn display() {
            assert_eq!(Cmf::new(CmfConfig::default()).to_string(), "CMF(20)");
        }
    }
}
