//! Element-wise arithmetic on encoded values of the same shape.
//!
//! Both operands are read into [`Value`] trees and walked together. Numbers are combined,
//! with `null` standing for the NaN it was written from; strings, bools and nulls facing
//! nulls are taken from the left operand. Any other difference between
//! the trees is an error naming where they diverge.

use crate::prelude::*;

/// `(1 - t) * a + t * b` at every numeric leaf.
pub fn interpolate(a: &EncodedValue, b: &EncodedValue, t: f64) -> CombineResult<EncodedValue> {
    interpolate_with_options(a, b, t, &CombineOptionsDefault)
}

pub fn interpolate_with_options(a: &EncodedValue, b: &EncodedValue, t: f64, options: &impl CombineOptions) -> CombineResult<EncodedValue> {
    combine(a, b, options, Weights { a: 1.0 - t, b: t })
}

/// `a + rate * grad` at every numeric leaf.
pub fn add_gradient(a: &EncodedValue, grad: &EncodedValue, rate: f64) -> CombineResult<EncodedValue> {
    add_gradient_with_options(a, grad, rate, &CombineOptionsDefault)
}

pub fn add_gradient_with_options(a: &EncodedValue, grad: &EncodedValue, rate: f64, options: &impl CombineOptions) -> CombineResult<EncodedValue> {
    combine(a, grad, options, Weights { a: 1.0, b: rate })
}

fn combine(a: &EncodedValue, b: &EncodedValue, options: &impl CombineOptions, weights: Weights) -> CombineResult<EncodedValue> {
    let (left, right) = parallel(|| decode::<Value>(a), || decode::<Value>(b), options);
    let combiner = Combiner { weights, parallel: options.parallel() };
    let combined = combiner.node(&left?, &right?)?;

    // The result's blobs go where the left operand's are
    let mut out = EncodedValue::new();
    out.set_blobs(a.blobs().cloned());
    to_json(&mut out, &combined);
    Ok(out)
}

/// The leaf operation `a * x + b * y`.
#[derive(Copy, Clone, Debug)]
struct Weights {
    a: f64,
    b: f64,
}

enum Side {
    Left,
    Right,
}

impl Weights {
    #[inline]
    fn apply(self, x: f64, y: f64) -> f64 {
        self.a * x + self.b * y
    }

    // When the result is one operand whatever the values, that operand is copied rather
    // than recomputed, so no precision is lost and NaN on the other side does not spread.
    fn identity(self) -> Option<Side> {
        match (self.a, self.b) {
            (a, b) if a == 1.0 && b == 0.0 => Some(Side::Left),
            (a, b) if a == 0.0 && b == 1.0 => Some(Side::Right),
            _ => None,
        }
    }

    // Integer weights small enough to be exact in f64 can be applied exactly in i128.
    fn exact(self, x: i128, y: i128) -> Option<i128> {
        let integral = |w: f64| (w.fract() == 0.0 && w.abs() <= (1u64 << 53) as f64).then_some(w as i128);
        integral(self.a)?.checked_mul(x)?.checked_add(integral(self.b)?.checked_mul(y)?)
    }
}

fn diverged() -> CombineError {
    CombineError::ShapeMismatch { path: String::new() }
}

// Prefixes the path of a divergence found below `segment`, escaped as a JSON pointer.
fn within(err: CombineError, segment: &str) -> CombineError {
    match err {
        CombineError::ShapeMismatch { path } => CombineError::ShapeMismatch {
            path: format!("/{}{}", segment.replace('~', "~0").replace('/', "~1"), path),
        },
        other => other,
    }
}

// A float leaf that was NaN is written as null.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(f64::NAN),
        _ => value.as_f64(),
    }
}

fn integer(value: &Value) -> Option<i128> {
    match value {
        Value::Int(value) => Some(i128::from(*value)),
        Value::UInt(value) => Some(i128::from(*value)),
        _ => None,
    }
}

fn numbers(items: &[Value]) -> CombineResult<Vec<f64>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| numeric(item).ok_or_else(|| within(diverged(), &i.to_string())))
        .collect()
}

struct Combiner {
    weights: Weights,
    parallel: bool,
}

impl Combiner {
    fn node(&self, a: &Value, b: &Value) -> CombineResult<Value> {
        if a.is_number() || b.is_number() {
            return self.number(a, b);
        }
        Ok(match (a, b) {
            (Value::Null, Value::Null) | (Value::Bool(_), Value::Bool(_)) | (Value::String(_), Value::String(_)) => a.clone(),
            (Value::Array(xs), Value::Array(ys)) => Value::Array(self.elements(xs, ys)?),
            (Value::Array(xs), Value::Blob(ys)) => Value::Array(self.elements(xs, &ys.to_values())?),
            (Value::Blob(xs), Value::Blob(ys)) => {
                let right = || {
                    if ys.dtype() == xs.dtype() {
                        ys.clone()
                    } else {
                        NumVec::from_f64(xs.dtype(), &ys.to_f64())
                    }
                };
                Value::Blob(self.blob(xs, &ys.to_f64(), right)?)
            }
            (Value::Blob(xs), Value::Array(ys)) => {
                let ys = numbers(ys)?;
                Value::Blob(self.blob(xs, &ys, || NumVec::from_f64(xs.dtype(), &ys))?)
            }
            (Value::Object(xs), Value::Object(ys)) => Value::Object(self.members(xs, ys)?),
            _ => return Err(diverged()),
        })
    }

    fn number(&self, a: &Value, b: &Value) -> CombineResult<Value> {
        let (Some(x), Some(y)) = (numeric(a), numeric(b)) else {
            return Err(diverged());
        };
        Ok(match self.weights.identity() {
            Some(Side::Left) => a.clone(),
            Some(Side::Right) => b.clone(),
            None => match (integer(a), integer(b)) {
                (Some(i), Some(j)) => {
                    let combined = self.weights.exact(i, j).unwrap_or_else(|| self.weights.apply(x, y).round() as i128);
                    saturate_like(a, combined)
                }
                _ => Value::Float(self.weights.apply(x, y)),
            },
        })
    }

    fn elements(&self, xs: &[Value], ys: &[Value]) -> CombineResult<Vec<Value>> {
        if xs.len() != ys.len() {
            return Err(diverged());
        }
        try_zip_map(xs, ys, self.parallel, |i, x, y| self.node(x, y).map_err(|err| within(err, &i.to_string())))
    }

    // Combined in f64 and converted back to the left operand's element type.
    fn blob(&self, xs: &NumVec, ys: &[f64], right: impl FnOnce() -> NumVec) -> CombineResult<NumVec> {
        if xs.len() != ys.len() {
            return Err(diverged());
        }
        Ok(match self.weights.identity() {
            Some(Side::Left) => xs.clone(),
            Some(Side::Right) => right(),
            None => {
                let weights = self.weights;
                let combined = zip_map(&xs.to_f64(), ys, self.parallel, |x, y| weights.apply(*x, *y));
                NumVec::from_f64(xs.dtype(), &combined)
            }
        })
    }

    fn members(&self, xs: &[(String, Value)], ys: &[(String, Value)]) -> CombineResult<Vec<(String, Value)>> {
        let mut out = Vec::with_capacity(xs.len());
        for ((kx, x), (ky, y)) in xs.iter().zip(ys) {
            if kx != ky {
                return Err(within(diverged(), kx));
            }
            out.push((kx.clone(), self.node(x, y).map_err(|err| within(err, kx))?));
        }
        if xs.len() != ys.len() {
            let first_extra = xs.get(ys.len()).or_else(|| ys.get(xs.len())).map(|(key, _)| key.as_str()).unwrap_or_default();
            return Err(within(diverged(), first_extra));
        }
        Ok(out)
    }
}

// Rounds into the integer kind of `like`, saturating at its bounds.
fn saturate_like(like: &Value, value: i128) -> Value {
    match like {
        Value::UInt(_) => Value::from_u64(value.clamp(0, i128::from(u64::MAX)) as u64),
        _ => Value::Int(value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> EncodedValue {
        EncodedValue::from_text(s)
    }

    #[test]
    fn numbers_combine_and_other_leaves_come_from_the_left() {
        let a = text(r#"{"__type":"P","name":"a","x":1,"y":[0.0,2.0],"on":true}"#);
        let b = text(r#"{"__type":"P","name":"b","x":3,"y":[1.0,4.0],"on":false}"#);
        let mid = interpolate(&a, &b, 0.5).unwrap();
        assert_eq!(mid.as_str(), r#"{"__type":"P","name":"a","x":2,"y":[0.5,3.0],"on":true}"#);
    }

    #[test]
    fn integers_round() {
        assert_eq!(add_gradient(&text("[10]"), &text("[1]"), 0.4).unwrap().as_str(), "[10]");
        assert_eq!(add_gradient(&text("[10]"), &text("[1.0]"), 0.4).unwrap().as_str(), "[10.4]");
    }

    #[test]
    fn divergence_is_located() {
        let err = |a: &str, b: &str| interpolate(&text(a), &text(b), 0.5).unwrap_err();
        assert_eq!(err(r#"{"a":[1,2]}"#, r#"{"a":[1]}"#), CombineError::ShapeMismatch { path: "/a".into() });
        assert_eq!(err(r#"{"a":[1,"x"]}"#, r#"{"a":[1,2]}"#), CombineError::ShapeMismatch { path: "/a/1".into() });
        assert_eq!(err(r#"{"a/b":1}"#, r#"{"c":1}"#), CombineError::ShapeMismatch { path: "/a~1b".into() });
        assert_eq!(err(r#"{"a":1}"#, r#"{"a":1,"b":2}"#), CombineError::ShapeMismatch { path: "/b".into() });
        assert_eq!(err("1", "\"1\""), CombineError::ShapeMismatch { path: "".into() });
        assert_eq!(err("null", "[]"), CombineError::ShapeMismatch { path: "".into() });
    }

    #[test]
    fn endpoints_are_exact_for_wide_integers() {
        let big = text(&format!("[{},{},-9007199254740993]", u64::MAX, (1u64 << 53) + 1));
        let small = text("[0,0,0]");
        assert_eq!(interpolate(&big, &small, 0.0).unwrap(), big);
        assert_eq!(interpolate(&small, &big, 1.0).unwrap(), big);
        assert_eq!(add_gradient(&big, &small, 0.0).unwrap(), big);
        // Integer rates stay exact, and results saturate in the left operand's kind.
        assert_eq!(add_gradient(&big, &text("[1,1,-1]"), -1.0).unwrap().as_str(), "[18446744073709551614,9007199254740992,-9007199254740992]");
        assert_eq!(add_gradient(&big, &text("[1,0,0]"), 1.0).unwrap().as_str(), "[18446744073709551615,9007199254740993,-9007199254740993]");
    }

    #[test]
    fn null_leaves_are_nan() {
        let a = text(r#"{"__type":"P","x":null,"y":[1.0,null]}"#);
        let b = text(r#"{"__type":"P","x":1.0,"y":[3.0,2.0]}"#);
        assert_eq!(interpolate(&a, &b, 0.5).unwrap().as_str(), r#"{"__type":"P","x":null,"y":[2.0,null]}"#);
        assert_eq!(interpolate(&a, &b, 1.0).unwrap().as_str(), r#"{"__type":"P","x":1.0,"y":[3.0,2.0]}"#);
        assert_eq!(interpolate(&b, &a, 0.0).unwrap(), b);
    }

    #[test]
    fn broken_operands_are_decode_errors() {
        assert!(matches!(interpolate(&text("[1,"), &text("[1]"), 0.5), Err(CombineError::Decode(_))));
    }
}
