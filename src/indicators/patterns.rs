//! Candlestick pattern flags.

use crate::constants::DOJI_BODY_RATIO;
use crate::models::Bar;

type Flags = Vec<Option<bool>>;

/// Per-bar doji, hammer and engulfing flags.
///
/// Doji and hammer divide by the bar's range, so both are undefined when
/// `high == low`. Engulfing compares against the previous bar and is
/// undefined on the first bar.
pub fn candlestick_flags(bars: &[Bar]) -> (Flags, Flags, Flags) {
    let mut doji = vec![None; bars.len()];
    let mut hammer = vec![None; bars.len()];
    let mut engulfing = vec![None; bars.len()];

    for (i, bar) in bars.iter().enumerate() {
        let range = bar.high - bar.low;
        if range > 0.0 {
            doji[i] = Some((bar.close - bar.open).abs() / range < DOJI_BODY_RATIO);
            hammer[i] = Some(bar.close > bar.open && (bar.high - bar.close) / range < DOJI_BODY_RATIO);
        }

        if i > 0 {
            let prev = &bars[i - 1];
            engulfing[i] = Some(bar.close > prev.open && bar.open < prev.close);
        }
    }

    (doji, hammer, engulfing)
}
