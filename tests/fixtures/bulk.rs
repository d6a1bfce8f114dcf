//! Whole-series reference computations.
//!
//! Each function recomputes every output from the raw columns, with no
//! state carried between bars beyond what the definition itself requires
//! (exponential smoothing, running peaks). Outputs are `None` before the
//! first complete window.

#![allow(clippy::cast_precision_loss)]

fn windows(len: usize, window: usize) -> impl Iterator<Item = Option<std::ops::Range<usize>>> {
    (0..len).map(move |i| (i + 1 >= window).then(|| i + 1 - window..i + 1))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64).sqrt()
}

fn highest(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn lowest(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// `100 × numerator / denominator`, or 0 for an empty denominator.
fn percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        100.0 * numerator / denominator
    }
}

fn percent_change(base: f64, value: f64) -> f64 {
    percent(value - base, base)
}

fn log_return(prev: f64, price: f64) -> f64 {
    if prev <= 0.0 || price <= 0.0 {
        0.0
    } else {
        (price / prev).ln()
    }
}

fn money_flow_multiplier(high: f64, low: f64, close: f64) -> f64 {
    let range = high - low;
    if range == 0.0 {
        0.0
    } else {
        ((close - low) - (high - close)) / range
    }
}

/// Applies `f` to each trailing run of `window` defined values.
fn trailing(values: &[Option<f64>], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<Option<f64>> {
    let mut seen = Vec::with_capacity(values.len());
    values
        .iter()
        .map(|value| {
            seen.push((*value)?);
            (seen.len() >= window).then(|| f(&seen[seen.len() - window..]))
        })
        .collect()
}

/// One component of a multi-valued reference.
pub fn column<const N: usize>(rows: &[Option<[f64; N]>], index: usize) -> Vec<Option<f64>> {
    rows.iter().map(|row| row.map(|row| row[index])).collect()
}

fn typical(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    high.iter()
        .zip(low)
        .zip(close)
        .map(|((h, l), c)| (h + l + c) / 3.0)
        .collect()
}

/// Exponential smoothing seeded with the mean of the first `period`
/// values.
fn smooth(values: &[Option<f64>], period: usize, alpha: f64) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut seed = Vec::with_capacity(period);
    let mut state: Option<f64> = None;

    for value in values {
        match (value, state) {
            (None, _) => {}
            (Some(v), Some(s)) => state = Some(s + alpha * (v - s)),
            (Some(v), None) => {
                seed.push(*v);
                if seed.len() == period {
                    state = Some(mean(&seed));
                }
            }
        }
        out.push(state);
    }

    out
}

fn ema_of(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    smooth(values, period, 2.0 / (period + 1) as f64)
}

pub fn sma(close: &[f64], window: usize) -> Vec<Option<f64>> {
    windows(close.len(), window)
        .map(|range| range.map(|r| mean(&close[r])))
        .collect()
}

pub fn ema(close: &[f64], window: usize) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = close.iter().copied().map(Some).collect();
    ema_of(&values, window)
}

pub fn wma(close: &[f64], window: usize) -> Vec<Option<f64>> {
    let denominator = (window * (window + 1)) as f64 / 2.0;
    windows(close.len(), window)
        .map(|range| {
            range.map(|r| {
                close[r]
                    .iter()
                    .enumerate()
                    .map(|(i, price)| (i + 1) as f64 * price)
                    .sum::<f64>()
                    / denominator
            })
        })
        .collect()
}

/// Wilder RSI: first value from simple averages of the first `window`
/// changes.
pub fn rsi(close: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; close.len()];
    let n = window as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..close.len() {
        let change = close[i] - close[i - 1];
        let (gain, loss) = (change.max(0.0), (-change).max(0.0));

        if i < window {
            avg_gain += gain;
            avg_loss += loss;
            continue;
        }
        if i == window {
            avg_gain = (avg_gain + gain) / n;
            avg_loss = (avg_loss + loss) / n;
        } else {
            avg_gain = (avg_gain * (n - 1.0) + gain) / n;
            avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        }

        out[i] = Some(if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        });
    }

    out
}

/// MACD line and signal line.
pub fn macd(close: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<Option<(f64, f64)>> {
    let fast = ema(close, fast);
    let slow = ema(close, slow);
    let line: Vec<Option<f64>> = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal = ema_of(&line, signal);

    line.iter()
        .zip(signal)
        .map(|(l, s)| Some(((*l)?, s?)))
        .collect()
}

pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    (0..close.len())
        .map(|i| match i {
            0 => high[0] - low[0],
            _ => high[i].max(close[i - 1]) - low[i].min(close[i - 1]),
        })
        .collect()
}

pub fn atr(high: &[f64], low: &[f64], close: &[f64], window: usize) -> Vec<Option<f64>> {
    let ranges: Vec<Option<f64>> = true_range(high, low, close).into_iter().map(Some).collect();
    smooth(&ranges, window, 1.0 / window as f64)
}

/// Bollinger Bands over population standard deviation: (upper, middle,
/// lower).
pub fn bollinger(close: &[f64], window: usize, multiplier: f64) -> Vec<Option<(f64, f64, f64)>> {
    windows(close.len(), window)
        .map(|range| {
            range.map(|r| {
                let middle = mean(&close[r.clone()]);
                let offset = multiplier * population_variance(&close[r]).sqrt();
                (middle + offset, middle, middle - offset)
            })
        })
        .collect()
}

pub fn std_dev(close: &[f64], window: usize) -> Vec<Option<f64>> {
    windows(close.len(), window)
        .map(|range| range.map(|r| population_variance(&close[r]).sqrt()))
        .collect()
}

/// Donchian channel: (upper, middle, lower).
pub fn donchian(high: &[f64], low: &[f64], window: usize) -> Vec<Option<(f64, f64, f64)>> {
    windows(high.len(), window)
        .map(|range| {
            range.map(|r| {
                let upper = high[r.clone()].iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let lower = low[r].iter().copied().fold(f64::INFINITY, f64::min);
                (upper, (upper + lower) / 2.0, lower)
            })
        })
        .collect()
}

/// Fast stochastic %K.
pub fn stochastic_k(high: &[f64], low: &[f64], close: &[f64], k: usize) -> Vec<Option<f64>> {
    windows(close.len(), k)
        .enumerate()
        .map(|(i, range)| {
            range.map(|r| {
                let highest = high[r.clone()].iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let lowest = low[r].iter().copied().fold(f64::INFINITY, f64::min);
                if highest == lowest {
                    0.0
                } else {
                    100.0 * (close[i] - lowest) / (highest - lowest)
                }
            })
        })
        .collect()
}

pub fn williams_r(high: &[f64], low: &[f64], close: &[f64], window: usize) -> Vec<Option<f64>> {
    windows(close.len(), window)
        .enumerate()
        .map(|(i, range)| {
            range.map(|r| {
                let highest = high[r.clone()].iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let lowest = low[r].iter().copied().fold(f64::INFINITY, f64::min);
                if highest == lowest {
                    -100.0
                } else {
                    -100.0 * (highest - close[i]) / (highest - lowest)
                }
            })
        })
        .collect()
}

pub fn roc(close: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..close.len())
        .map(|i| {
            let base = close[i.checked_sub(window)?];
            Some(if base == 0.0 {
                0.0
            } else {
                100.0 * (close[i] - base) / base
            })
        })
        .collect()
}

pub fn cci(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    window: usize,
    constant: f64,
) -> Vec<Option<f64>> {
    let tp = typical(high, low, close);
    windows(tp.len(), window)
        .enumerate()
        .map(|(i, range)| {
            range.map(|r| {
                let m = mean(&tp[r.clone()]);
                let mad = tp[r].iter().map(|v| (v - m).abs()).sum::<f64>() / window as f64;
                if mad == 0.0 {
                    0.0
                } else {
                    (tp[i] - m) / (constant * mad)
                }
            })
        })
        .collect()
}

pub fn obv(close: &[f64], volume: &[f64]) -> Vec<Option<f64>> {
    let mut total = volume[0];
    let mut out = vec![Some(total)];
    for i in 1..close.len() {
        if close[i] > close[i - 1] {
            total += volume[i];
        } else if close[i] < close[i - 1] {
            total -= volume[i];
        }
        out.push(Some(total));
    }
    out
}

pub fn mfi(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    window: usize,
) -> Vec<Option<f64>> {
    let tp = typical(high, low, close);
    (0..tp.len())
        .map(|i| {
            let start = (i + 1).checked_sub(window)?;
            if start == 0 {
                return None;
            }
            let (mut positive, mut negative) = (0.0, 0.0);
            for j in start..=i {
                let flow = tp[j] * volume[j];
                if tp[j] > tp[j - 1] {
                    positive += flow;
                } else if tp[j] < tp[j - 1] {
                    negative += flow;
                }
            }
            Some(if negative == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + positive / negative)
            })
        })
        .collect()
}

pub fn cmf(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    window: usize,
) -> Vec<Option<f64>> {
    let flows: Vec<f64> = (0..close.len())
        .map(|i| money_flow_multiplier(high[i], low[i], close[i]) * volume[i])
        .collect();

    windows(close.len(), window)
        .map(|range| {
            range.map(|r| {
                let volumes: f64 = volume[r.clone()].iter().sum();
                if volumes == 0.0 {
                    0.0
                } else {
                    flows[r].iter().sum::<f64>() / volumes
                }
            })
        })
        .collect()
}

pub fn vwap(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    window: usize,
) -> Vec<Option<f64>> {
    let tp = typical(high, low, close);
    windows(tp.len(), window)
        .enumerate()
        .map(|(i, range)| {
            range.map(|r| {
                let volumes: f64 = volume[r.clone()].iter().sum();
                if volumes == 0.0 {
                    tp[i]
                } else {
                    r.map(|j| tp[j] * volume[j]).sum::<f64>() / volumes
                }
            })
        })
        .collect()
}

pub fn z_score(close: &[f64], window: usize) -> Vec<Option<f64>> {
    windows(close.len(), window)
        .enumerate()
        .map(|(i, range)| {
            range.map(|r| {
                let sigma = population_variance(&close[r.clone()]).sqrt();
                if sigma == 0.0 {
                    0.0
                } else {
                    (close[i] - mean(&close[r])) / sigma
                }
            })
        })
        .collect()
}

pub fn linear_regression_slope(close: &[f64], window: usize) -> Vec<Option<f64>> {
    let x_mean = (window - 1) as f64 / 2.0;
    windows(close.len(), window)
        .map(|range| {
            range.map(|r| {
                let y = &close[r];
                let y_mean = mean(y);
                let (mut sxy, mut sxx) = (0.0, 0.0);
                for (i, value) in y.iter().enumerate() {
                    let dx = i as f64 - x_mean;
                    sxy += dx * (value - y_mean);
                    sxx += dx * dx;
                }
                sxy / sxx
            })
        })
        .collect()
}

pub fn rolling_percentile(close: &[f64], window: usize) -> Vec<Option<f64>> {
    windows(close.len(), window)
        .enumerate()
        .map(|(i, range)| {
            range.map(|r| {
                let at_or_below = close[r].iter().filter(|v| **v <= close[i]).count();
                100.0 * at_or_below as f64 / window as f64
            })
        })
        .collect()
}

pub fn daily_return(close: &[f64]) -> Vec<Option<f64>> {
    roc(close, 1)
}

pub fn max_drawdown(close: &[f64]) -> Vec<Option<f64>> {
    let mut peak = f64::NEG_INFINITY;
    let mut deepest = 0.0_f64;
    close
        .iter()
        .map(|price| {
            peak = peak.max(*price);
            if peak > 0.0 {
                deepest = deepest.min(100.0 * (price - peak) / peak);
            }
            Some(deepest)
        })
        .collect()
}

pub fn sharpe(
    close: &[f64],
    window: usize,
    risk_free_rate: f64,
    periods_per_year: f64,
) -> Vec<Option<f64>> {
    (0..close.len())
        .map(|i| {
            let start = i.checked_sub(window)?;
            let returns: Vec<f64> = (start + 1..=i)
                .map(|j| log_return(close[j - 1], close[j]))
                .collect();
            let sigma = sample_std(&returns);
            Some(if sigma == 0.0 {
                0.0
            } else {
                (mean(&returns) - risk_free_rate / periods_per_year) / sigma
                    * periods_per_year.sqrt()
            })
        })
        .collect()
}

/// ADX with its directional indicators: `[adx, +DI, -DI]`.
pub fn adx(high: &[f64], low: &[f64], close: &[f64], window: usize) -> Vec<Option<[f64; 3]>> {
    let n = close.len();
    let ranges = true_range(high, low, close);
    let (mut tr, mut plus, mut minus) = (vec![None; n], vec![None; n], vec![None; n]);
    for i in 1..n {
        let up = high[i] - high[i - 1];
        let down = low[i - 1] - low[i];
        tr[i] = Some(ranges[i]);
        plus[i] = Some(if up > down && up > 0.0 { up } else { 0.0 });
        minus[i] = Some(if down > up && down > 0.0 { down } else { 0.0 });
    }

    let alpha = 1.0 / window as f64;
    let (tr, plus, minus) = (
        smooth(&tr, window, alpha),
        smooth(&plus, window, alpha),
        smooth(&minus, window, alpha),
    );
    let di: Vec<Option<(f64, f64)>> = (0..n)
        .map(|i| {
            let range = tr[i]?;
            Some((percent(plus[i]?, range), percent(minus[i]?, range)))
        })
        .collect();
    let dx: Vec<Option<f64>> = di
        .iter()
        .map(|d| d.map(|(p, m)| percent((p - m).abs(), p + m)))
        .collect();

    smooth(&dx, window, alpha)
        .into_iter()
        .zip(&di)
        .map(|(adx, di)| {
            let (p, m) = (*di)?;
            Some([adx?, p, m])
        })
        .collect()
}

/// Detrended price oscillator: the close `window / 2 + 1` bars back minus
/// the current window mean.
pub fn dpo(close: &[f64], window: usize) -> Vec<Option<f64>> {
    let lag = window / 2 + 1;
    sma(close, window)
        .into_iter()
        .enumerate()
        .map(|(i, mean)| Some(close[i.checked_sub(lag)?] - mean?))
        .collect()
}

/// Vortex indicator: `[+VI, -VI]`.
pub fn vortex(high: &[f64], low: &[f64], close: &[f64], window: usize) -> Vec<Option<[f64; 2]>> {
    let ranges = true_range(high, low, close);
    (0..close.len())
        .map(|i| {
            let start = i.checked_sub(window)? + 1;
            let (mut plus, mut minus, mut tr) = (0.0, 0.0, 0.0);
            for j in start..=i {
                plus += (high[j] - low[j - 1]).abs();
                minus += (low[j] - high[j - 1]).abs();
                tr += ranges[j];
            }
            Some(if tr == 0.0 {
                [0.0, 0.0]
            } else {
                [plus / tr, minus / tr]
            })
        })
        .collect()
}

/// Percent change of a triple-smoothed EMA.
pub fn trix(close: &[f64], window: usize) -> Vec<Option<f64>> {
    let triple = ema_of(&ema_of(&ema(close, window), window), window);
    (0..close.len())
        .map(|i| {
            let prev = triple[i.checked_sub(1)?]?;
            Some(percent_change(prev, triple[i]?))
        })
        .collect()
}

fn age_of_extreme(values: &[f64], replaces: impl Fn(f64, f64) -> bool) -> usize {
    let mut best = 0;
    for (j, value) in values.iter().enumerate() {
        if replaces(*value, values[best]) {
            best = j;
        }
    }
    values.len() - 1 - best
}

/// Aroon over `window + 1` bars, newest extreme winning ties:
/// `[up, down, oscillator]`.
pub fn aroon(high: &[f64], low: &[f64], window: usize) -> Vec<Option<[f64; 3]>> {
    let w = window as f64;
    (0..high.len())
        .map(|i| {
            let span = i.checked_sub(window)?..i + 1;
            let high_age = age_of_extreme(&high[span.clone()], |v, best| v >= best);
            let low_age = age_of_extreme(&low[span], |v, best| v <= best);
            let up = 100.0 * (w - high_age as f64) / w;
            let down = 100.0 * (w - low_age as f64) / w;
            Some([up, down, up - down])
        })
        .collect()
}

/// Parabolic SAR. The trend is seeded from the first two closes and the
/// first two bars are warm-up.
pub fn psar(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    af_start: f64,
    af_step: f64,
    af_max: f64,
) -> Vec<Option<f64>> {
    let n = close.len();
    let mut out = vec![None; n];
    if n < 2 {
        return out;
    }

    let mut long = close[1] > close[0];
    let mut af = af_start;
    let mut extreme = if long { high[1] } else { low[1] };
    let mut sar = if long { low[0] } else { high[0] };

    for i in 2..n {
        let mut next = sar + af * (extreme - sar);
        if long {
            next = next.min(low[i - 1]).min(low[i - 2]);
            if low[i] < next {
                long = false;
                next = extreme;
                extreme = low[i];
                af = af_start;
            } else if high[i] > extreme {
                extreme = high[i];
                af = (af + af_step).min(af_max);
            }
        } else {
            next = next.max(high[i - 1]).max(high[i - 2]);
            if high[i] > next {
                long = true;
                next = extreme;
                extreme = high[i];
                af = af_start;
            } else if low[i] < extreme {
                extreme = low[i];
                af = (af + af_step).min(af_max);
            }
        }
        sar = next;
        out[i] = Some(sar);
    }

    out
}

/// Percentage price oscillator over `values`: `[ppo, signal, histogram]`.
pub fn ppo(values: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<Option<[f64; 3]>> {
    let fast = ema(values, fast);
    let slow = ema(values, slow);
    let line: Vec<Option<f64>> = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| {
            let s = (*s)?;
            Some(percent((*f)? - s, s))
        })
        .collect();
    let signal = ema_of(&line, signal);

    line.iter()
        .zip(signal)
        .map(|(l, s)| {
            let (l, s) = ((*l)?, s?);
            Some([l, s, l - s])
        })
        .collect()
}

pub fn ultimate_oscillator(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    periods: [usize; 3],
) -> Vec<Option<f64>> {
    let n = close.len();
    let (pressure, range): (Vec<f64>, Vec<f64>) = (0..n)
        .map(|i| {
            let (floor, ceiling) = match i {
                0 => (low[0], high[0]),
                _ => (low[i].min(close[i - 1]), high[i].max(close[i - 1])),
            };
            (close[i] - floor, ceiling - floor)
        })
        .unzip();
    let average = |period: usize| -> Vec<Option<f64>> {
        windows(n, period)
            .map(|r| {
                r.map(|r| {
                    let tr: f64 = range[r.clone()].iter().sum();
                    if tr == 0.0 {
                        0.0
                    } else {
                        pressure[r].iter().sum::<f64>() / tr
                    }
                })
            })
            .collect()
    };
    let [short, medium, long] = periods.map(average);

    (0..n)
        .map(|i| Some(100.0 * (4.0 * short[i]? + 2.0 * medium[i]? + long[i]?) / 7.0))
        .collect()
}

/// Stochastic RSI: `[raw, %K, %D]`.
pub fn stoch_rsi(
    close: &[f64],
    rsi_window: usize,
    stoch_window: usize,
    k: usize,
    d: usize,
) -> Vec<Option<[f64; 3]>> {
    let raw = trailing(&rsi(close, rsi_window), stoch_window, |values| {
        let (lo, hi) = (lowest(values), highest(values));
        let newest = values[values.len() - 1];
        if hi == lo { 0.0 } else { (newest - lo) / (hi - lo) }
    });
    let k = trailing(&raw, k, mean);
    let d = trailing(&k, d, mean);

    (0..close.len())
        .map(|i| Some([raw[i]?, k[i]?, d[i]?]))
        .collect()
}

/// True strength index, double-smoothed with mean-seeded EMAs.
pub fn tsi(close: &[f64], first: usize, second: usize) -> Vec<Option<f64>> {
    let changes: Vec<Option<f64>> = (0..close.len())
        .map(|i| Some(close[i] - close[i.checked_sub(1)?]))
        .collect();
    let magnitudes: Vec<Option<f64>> = changes.iter().map(|c| c.map(f64::abs)).collect();
    let momentum = ema_of(&ema_of(&changes, first), second);
    let magnitude = ema_of(&ema_of(&magnitudes, first), second);

    momentum
        .into_iter()
        .zip(magnitude)
        .map(|(m, a)| Some(percent(m?, a?)))
        .collect()
}

pub fn awesome_oscillator(high: &[f64], low: &[f64], fast: usize, slow: usize) -> Vec<Option<f64>> {
    let midpoints: Vec<f64> = high.iter().zip(low).map(|(h, l)| (h + l) / 2.0).collect();
    sma(&midpoints, fast)
        .into_iter()
        .zip(sma(&midpoints, slow))
        .map(|(f, s)| Some(f? - s?))
        .collect()
}

/// Kaufman adaptive moving average, seeded with the first ready close.
pub fn kama(close: &[f64], window: usize, fast: usize, slow: usize) -> Vec<Option<f64>> {
    let fast_sc = 2.0 / (fast + 1) as f64;
    let slow_sc = 2.0 / (slow + 1) as f64;
    let mut state: Option<f64> = None;

    (0..close.len())
        .map(|i| {
            let base = close[i.checked_sub(window)?];
            let volatility: f64 = (i + 1 - window..=i)
                .map(|j| (close[j] - close[j - 1]).abs())
                .sum();
            let efficiency = if volatility == 0.0 {
                0.0
            } else {
                (close[i] - base).abs() / volatility
            };
            let sc = efficiency.mul_add(fast_sc - slow_sc, slow_sc).powi(2);
            let next = state.map_or(close[i], |prev| prev + sc * (close[i] - prev));
            state = Some(next);
            state
        })
        .collect()
}

pub fn momentum(close: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..close.len())
        .map(|i| Some(close[i] - close[i.checked_sub(window)?]))
        .collect()
}

/// Keltner channel around an EMA with ATR-wide bands: `[upper, middle, lower]`.
pub fn keltner(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    window: usize,
    atr_window: usize,
    multiplier: f64,
) -> Vec<Option<[f64; 3]>> {
    ema(close, window)
        .into_iter()
        .zip(atr(high, low, close, atr_window))
        .map(|(middle, atr)| {
            let (middle, offset) = (middle?, multiplier * atr?);
            Some([middle + offset, middle, middle - offset])
        })
        .collect()
}

pub fn ulcer_index(close: &[f64], window: usize) -> Vec<Option<f64>> {
    let drawdowns: Vec<Option<f64>> = windows(close.len(), window)
        .enumerate()
        .map(|(i, range)| range.map(|r| percent_change(highest(&close[r]), close[i])))
        .collect();
    trailing(&drawdowns, window, |d| {
        (d.iter().map(|x| x * x).sum::<f64>() / d.len() as f64).sqrt()
    })
}

pub fn variance(close: &[f64], window: usize) -> Vec<Option<f64>> {
    windows(close.len(), window)
        .map(|range| range.map(|r| population_variance(&close[r])))
        .collect()
}

pub fn range(high: &[f64], low: &[f64], window: usize) -> Vec<Option<f64>> {
    windows(high.len(), window)
        .map(|range| range.map(|r| highest(&high[r.clone()]) - lowest(&low[r])))
        .collect()
}

/// Sample deviation of log returns over `window`, scaled by
/// `sqrt(periods_per_year)`.
pub fn historical_volatility(close: &[f64], window: usize, periods_per_year: f64) -> Vec<Option<f64>> {
    (0..close.len())
        .map(|i| {
            let start = i.checked_sub(window)?;
            let returns: Vec<f64> = (start + 1..=i)
                .map(|j| log_return(close[j - 1], close[j]))
                .collect();
            Some(sample_std(&returns) * periods_per_year.sqrt())
        })
        .collect()
}

pub fn adi(high: &[f64], low: &[f64], close: &[f64], volume: &[f64]) -> Vec<Option<f64>> {
    let mut total = 0.0;
    (0..close.len())
        .map(|i| {
            total += money_flow_multiplier(high[i], low[i], close[i]) * volume[i];
            Some(total)
        })
        .collect()
}

pub fn force_index(close: &[f64], volume: &[f64], window: usize) -> Vec<Option<f64>> {
    let raw: Vec<Option<f64>> = (0..close.len())
        .map(|i| Some((close[i] - close[i.checked_sub(1)?]) * volume[i]))
        .collect();
    ema_of(&raw, window)
}

/// Ease of movement, scaled by 1e8 and averaged over `window`.
pub fn eom(high: &[f64], low: &[f64], volume: &[f64], window: usize) -> Vec<Option<f64>> {
    let raw: Vec<Option<f64>> = (0..high.len())
        .map(|i| {
            let j = i.checked_sub(1)?;
            let distance = (high[i] + low[i]) / 2.0 - (high[j] + low[j]) / 2.0;
            Some(if volume[i] == 0.0 {
                0.0
            } else {
                distance * (high[i] - low[i]) / volume[i] * 1e8
            })
        })
        .collect();
    trailing(&raw, window, mean)
}

pub fn vpt(close: &[f64], volume: &[f64]) -> Vec<Option<f64>> {
    let mut total = 0.0;
    (0..close.len())
        .map(|i| {
            if i > 0 {
                total += volume[i] * percent_change(close[i - 1], close[i]) / 100.0;
            }
            Some(total)
        })
        .collect()
}

pub fn nvi(close: &[f64], volume: &[f64]) -> Vec<Option<f64>> {
    let mut index = 1000.0;
    (0..close.len())
        .map(|i| {
            if i > 0 && volume[i] < volume[i - 1] {
                index *= 1.0 + percent_change(close[i - 1], close[i]) / 100.0;
            }
            Some(index)
        })
        .collect()
}

pub fn vwema(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    vwap_window: usize,
    ema_window: usize,
) -> Vec<Option<f64>> {
    ema_of(&vwap(high, low, close, volume, vwap_window), ema_window)
}

pub fn volume_ratio(volume: &[f64], window: usize) -> Vec<Option<f64>> {
    windows(volume.len(), window)
        .enumerate()
        .map(|(i, range)| {
            range.map(|r| {
                let average = mean(&volume[r]);
                if average == 0.0 { 0.0 } else { volume[i] / average }
            })
        })
        .collect()
}

pub fn daily_log_return(close: &[f64]) -> Vec<Option<f64>> {
    (0..close.len())
        .map(|i| Some(100.0 * log_return(close[i.checked_sub(1)?], close[i])))
        .collect()
}

pub fn cumulative_return(close: &[f64]) -> Vec<Option<f64>> {
    close
        .iter()
        .map(|price| Some(percent_change(close[0], *price)))
        .collect()
}

pub fn compound_log_return(close: &[f64]) -> Vec<Option<f64>> {
    let mut total = 0.0;
    (0..close.len())
        .map(|i| {
            if i > 0 {
                total += log_return(close[i - 1], close[i]);
            }
            Some(100.0 * total.exp_m1())
        })
        .collect()
}

pub fn rolling_return(close: &[f64], window: usize) -> Vec<Option<f64>> {
    windows(close.len(), window)
        .enumerate()
        .map(|(i, range)| range.map(|r| percent_change(close[r.start], close[i])))
        .collect()
}

/// Annualized window return over the window's deepest drawdown.
pub fn calmar(close: &[f64], window: usize, periods_per_year: f64) -> Vec<Option<f64>> {
    windows(close.len(), window)
        .map(|range| {
            range.map(|r| {
                let prices = &close[r];
                let depth = max_drawdown(prices)
                    .last()
                    .copied()
                    .flatten()
                    .unwrap_or(0.0)
                    .abs()
                    / 100.0;
                if depth == 0.0 {
                    return 0.0;
                }
                let (first, last) = (prices[0], prices[prices.len() - 1]);
                let total = if first == 0.0 { 0.0 } else { last / first - 1.0 };
                total * periods_per_year / window as f64 / depth
            })
        })
        .collect()
}
