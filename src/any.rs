use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorKind, IndicatorValue,
    InputError, Params, Schema, Tick, momentum::*, others::*, trend::*, volatility::*,
    volume::*,
};

use std::fmt::Display;

macro_rules! any_indicator {
    ($($kind:ident: $config:ident),* $(,)?) => {
        /// Any indicator, selected at runtime by [`IndicatorKind`].
        ///
        /// Every variant wraps the concrete indicator of the same name, and
        /// every method delegates to it. Outputs are widened to
        /// [`IndicatorValue`].
        ///
        /// # Example
        ///
        /// ```
        /// use quantedge_stream::{AnyIndicator, IndicatorKind, IndicatorValue, Tick};
        ///
        /// let mut roc = AnyIndicator::new(IndicatorKind::Roc);
        /// assert_eq!(roc.to_string(), "ROC(12, Close)");
        /// assert!(!roc.is_ready());
        ///
        /// let value = roc.update(&Tick::price(100.0)).unwrap();
        /// assert_eq!(value, None::<IndicatorValue>);
        /// ```
        #[derive(Clone, Debug)]
        pub enum AnyIndicator {
            $($kind($kind),)*
        }

        impl AnyIndicator {
            /// Builds `kind` with its default parameters on the
            /// process-wide backend.
            #[must_use]
            pub fn new(kind: IndicatorKind) -> Self {
                match kind {
                    $(IndicatorKind::$kind => Self::$kind($kind::new($config::default())),)*
                }
            }

            fn build(
                kind: IndicatorKind,
                params: &Params,
                backend: Option<Backend>,
            ) -> Result<Self, ConstructionError> {
                check_names(kind, params)?;

                Ok(match kind {
                    $(IndicatorKind::$kind => {
                        let config = $config::from_params(params)?;
                        Self::$kind(match backend {
                            Some(backend) => $kind::with_backend(config, backend),
                            None => $kind::new(config),
                        })
                    })*
                })
            }

            /// Kind tag of the wrapped indicator.
            #[must_use]
            pub fn kind(&self) -> IndicatorKind {
                match self {
                    $(Self::$kind(_) => IndicatorKind::$kind,)*
                }
            }

            /// See [`Indicator::update`].
            ///
            /// # Errors
            ///
            /// [`InputError`] if the tick does not satisfy
            /// [`schema`](Self::schema). State does not advance.
            pub fn update(&mut self, tick: &Tick) -> Result<Option<IndicatorValue>, InputError> {
                match self {
                    $(Self::$kind(inner) => {
                        Ok(Indicator::update(inner, tick)?.map(Into::into))
                    })*
                }
            }

            /// See [`Indicator::value`].
            #[must_use]
            pub fn value(&self) -> Option<IndicatorValue> {
                match self {
                    $(Self::$kind(inner) => Indicator::value(inner).map(Into::into),)*
                }
            }

            #[must_use]
            pub fn is_ready(&self) -> bool {
                match self {
                    $(Self::$kind(inner) => inner.is_ready(),)*
                }
            }

            pub fn reset(&mut self) {
                match self {
                    $(Self::$kind(inner) => inner.reset(),)*
                }
            }

            #[must_use]
            pub fn backend(&self) -> Backend {
                match self {
                    $(Self::$kind(inner) => inner.backend(),)*
                }
            }

            /// Tick fields the wrapped indicator reads.
            #[must_use]
            pub fn schema(&self) -> Schema {
                match self {
                    $(Self::$kind(inner) => inner.config().schema(),)*
                }
            }

            /// Updates after which the wrapped indicator is ready.
            #[must_use]
            pub fn required_ticks(&self) -> usize {
                match self {
                    $(Self::$kind(inner) => inner.config().required_ticks(),)*
                }
            }
        }

        impl Display for AnyIndicator {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$kind(inner) => Display::fmt(inner, f),)*
                }
            }
        }

        $(
            impl From<$kind> for AnyIndicator {
                fn from(indicator: $kind) -> Self {
                    Self::$kind(indicator)
                }
            }
        )*

        impl IndicatorKind {
            /// Tick fields the kind reads with its default parameters.
            ///
            /// A [`PriceSource`](crate::PriceSource) override can change this
            /// for single-series kinds.
            #[must_use]
            pub fn default_schema(self) -> Schema {
                match self {
                    $(Self::$kind => $config::default().schema(),)*
                }
            }
        }
    };
}

any_indicator!(
    Sma: SmaConfig,
    Ema: EmaConfig,
    Wma: WmaConfig,
    Macd: MacdConfig,
    Adx: AdxConfig,
    Cci: CciConfig,
    Dpo: DpoConfig,
    Vortex: VortexConfig,
    Trix: TrixConfig,
    Aroon: AroonConfig,
    Psar: PsarConfig,
    Rsi: RsiConfig,
    Stochastic: StochasticConfig,
    WilliamsR: WilliamsRConfig,
    Roc: RocConfig,
    Ppo: PpoConfig,
    Pvo: PvoConfig,
    UltimateOscillator: UltimateOscillatorConfig,
    StochRsi: StochRsiConfig,
    Tsi: TsiConfig,
    AwesomeOscillator: AwesomeOscillatorConfig,
    Kama: KamaConfig,
    Momentum: MomentumConfig,
    Atr: AtrConfig,
    BollingerBands: BollingerBandsConfig,
    KeltnerChannel: KeltnerChannelConfig,
    DonchianChannel: DonchianChannelConfig,
    UlcerIndex: UlcerIndexConfig,
    StdDev: StdDevConfig,
    Variance: VarianceConfig,
    Range: RangeConfig,
    HistoricalVolatility: HistoricalVolatilityConfig,
    Mfi: MfiConfig,
    Adi: AdiConfig,
    Obv: ObvConfig,
    Cmf: CmfConfig,
    ForceIndex: ForceIndexConfig,
    Eom: EomConfig,
    Vpt: VptConfig,
    Nvi: NviConfig,
    Vwap: VwapConfig,
    Vwema: VwemaConfig,
    VolumeRatio: VolumeRatioConfig,
    DailyReturn: DailyReturnConfig,
    DailyLogReturn: DailyLogReturnConfig,
    CumulativeReturn: CumulativeReturnConfig,
    CompoundLogReturn: CompoundLogReturnConfig,
    RollingReturn: RollingReturnConfig,
    MaxDrawdown: MaxDrawdownConfig,
    SharpeRatio: SharpeRatioConfig,
    CalmarRatio: CalmarRatioConfig,
    ZScore: ZScoreConfig,
    LinearRegressionSlope: LinearRegressionSlopeConfig,
    RollingPercentile: RollingPercentileConfig,
);

impl AnyIndicator {
    /// Builds `kind` with `params` written over its defaults, on the
    /// process-wide backend.
    ///
    /// # Errors
    ///
    /// [`ConstructionError::UnknownParameter`] for a name outside
    /// [`IndicatorKind::parameters`], or whatever the config builder rejects.
    pub fn with_params(kind: IndicatorKind, params: &Params) -> Result<Self, ConstructionError> {
        Self::build(kind, params, None)
    }

    /// [`with_params`](Self::with_params) on an explicit backend.
    ///
    /// # Errors
    ///
    /// As [`with_params`](Self::with_params).
    pub fn with_backend(
        kind: IndicatorKind,
        params: &Params,
        backend: Backend,
    ) -> Result<Self, ConstructionError> {
        Self::build(kind, params, Some(backend))
    }
}

fn check_names(kind: IndicatorKind, params: &Params) -> Result<(), ConstructionError> {
    match params.names().find(|name| !kind.accepts(name)) {
        Some(name) => Err(ConstructionError::UnknownParameter {
            indicator: kind.to_string(),
            name: name.to_owned(),
        }),
        None => Ok(()),
    }
}
