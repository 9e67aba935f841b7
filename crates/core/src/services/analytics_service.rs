/// Signed percentage gap between the current price and a target.
///
/// - `current == 0` → `0` (an unknown price and a zero price look the same).
/// - `current < target` → `(target - current) / current * 100`, positive: how
///   much the price still has to rise.
/// - otherwise → `-(current - target) / target * 100`, negative: how far the
///   price has overshot. The denominator here is the target, not the price.
///
/// With `target == 0` and `current > 0` the second branch divides by zero and
/// the result is `-inf`. Callers render it as is.
pub fn difference(current: f64, target: f64) -> f64 {
    if current == 0.0 {
        return 0.0;
    }
    if current < target {
        ((target - current) / current) * 100.0
    } else {
        -((current - target) / target) * 100.0
    }
}
