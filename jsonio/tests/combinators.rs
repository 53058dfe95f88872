mod common;
use common::with_store;
use jsonio::options::DisableParallel;
use jsonio::prelude::*;
use jsonio::{add_gradient, combine_options, interpolate, interpolate_with_options, to_json_with_options, CombineError};

#[derive(Encode, Decode, Debug, Default, PartialEq, Clone)]
struct Params {
    label: String,
    steps: u32,
    weights: Vec<f64>,
    scale: Option<f32>,
}

fn params(label: &str, steps: u32, base: f64) -> Params {
    Params {
        label: label.to_owned(),
        steps,
        weights: (0..8).map(|i| base + i as f64).collect(),
        scale: Some(base as f32),
    }
}

#[test]
fn endpoints_reproduce_the_operands() {
    let a = as_json(&params("a", 10, 1.0));
    let b = as_json(&params("b", 20, 5.0));

    let at_a: Params = decode(&interpolate(&a, &b, 0.0).unwrap()).unwrap();
    assert_eq!(at_a, params("a", 10, 1.0));

    // Non-numeric leaves always come from the left operand.
    let at_b: Params = decode(&interpolate(&a, &b, 1.0).unwrap()).unwrap();
    assert_eq!(at_b, Params { label: "a".to_owned(), ..params("b", 20, 5.0) });
}

#[test]
fn midpoint() {
    let a = as_json(&params("a", 10, 1.0));
    let b = as_json(&params("b", 13, 5.0));
    let mid: Params = decode(&interpolate(&a, &b, 0.5).unwrap()).unwrap();
    assert_eq!(mid.steps, 12);
    assert_eq!(mid.weights, (0..8).map(|i| 3.0 + i as f64).collect::<Vec<_>>());
    assert_eq!(mid.scale, Some(3.0));
}

#[test]
fn zero_rate_is_a_no_op() {
    let a = as_json(&params("a", 10, 1.5));
    let grad = as_json(&params("g", 99, -4.0));
    assert_eq!(add_gradient(&a, &grad, 0.0).unwrap(), a);
}

#[test]
fn gradient_step() {
    let a = as_json(&vec![1.0f64, 2.0]);
    let grad = as_json(&vec![0.5f64, -1.0]);
    assert_eq!(add_gradient(&a, &grad, -2.0).unwrap().as_str(), "[0.0,4.0]");
}

#[test]
fn blobs_combine_into_the_left_store() {
    let mut a = with_store();
    let mut b = with_store();
    to_json(&mut a, &vec![1.0f32; 100]);
    to_json(&mut b, &vec![3.0f32; 100]);

    let mid = interpolate(&a, &b, 0.5).unwrap();
    assert!(mid.as_str().contains(r#""dtype":"float32""#));
    assert!(std::sync::Arc::ptr_eq(mid.blobs().unwrap(), a.blobs().unwrap()));
    assert_eq!(decode::<Vec<f32>>(&mid).unwrap(), vec![2.0; 100]);
}

#[test]
fn blob_and_inline_operands_mix() {
    let mut a = with_store();
    to_json(&mut a, &vec![10i32; 100]);
    let b = as_json(&vec![1i32; 100]);

    let stepped = add_gradient(&a, &b, 0.25).unwrap();
    assert!(stepped.as_str().contains(r#""dtype":"int32""#));
    assert_eq!(decode::<Vec<i32>>(&stepped).unwrap(), vec![10; 100]);

    // With the inline operand on the left, the result is inline too.
    let flipped = interpolate(&b, &a, 1.0).unwrap();
    assert!(flipped.blobs().is_none());
    assert_eq!(decode::<Vec<i32>>(&flipped).unwrap(), vec![10; 100]);
}

#[test]
fn sequential_matches_parallel() {
    let mut a = with_store();
    let mut b = with_store();
    let xs: Vec<f64> = (0..10_000).map(|i| i as f64).collect();
    let ys: Vec<f64> = xs.iter().map(|x| x * 3.0).collect();
    to_json_with_options(&mut a, &xs, &jsonio::encode_options! { jsonio::options::InlineBlobs });
    to_json(&mut b, &ys);

    let parallel = interpolate(&a, &b, 0.25).unwrap();
    let sequential = interpolate_with_options(&a, &b, 0.25, &combine_options! { DisableParallel }).unwrap();
    assert_eq!(parallel, sequential);
    assert_eq!(decode::<Vec<f64>>(&parallel).unwrap()[4], 6.0);
}

#[test]
fn shape_errors_name_the_path() {
    let a = EncodedValue::from_text(r#"{"layers":[{"w":[1,2]},{"w":[1,2]}],"a/b":{"c":1}}"#);

    let b = EncodedValue::from_text(r#"{"layers":[{"w":[1,2]},{"w":[1,2,3]}],"a/b":{"c":1}}"#);
    assert_eq!(interpolate(&a, &b, 0.5), Err(CombineError::ShapeMismatch { path: "/layers/1/w".to_owned() }));

    let b = EncodedValue::from_text(r#"{"layers":[{"w":[1,2]},{"w":[1,2]}],"a/b":{"c":"x"}}"#);
    assert_eq!(interpolate(&a, &b, 0.5), Err(CombineError::ShapeMismatch { path: "/a~1b/c".to_owned() }));

    let b = EncodedValue::from_text("[]");
    assert_eq!(interpolate(&a, &b, 0.5), Err(CombineError::ShapeMismatch { path: String::new() }));
}

#[test]
fn missing_store_is_a_decode_error() {
    let mut a = with_store();
    to_json(&mut a, &vec![1.0f64; 100]);
    let detached = EncodedValue::from_text(a.as_str());
    assert_eq!(
        interpolate(&a, &detached, 0.5),
        Err(CombineError::Decode(jsonio::DecodeError::MissingBlobStore))
    );
}

#[test]
fn wide_integer_fields_survive_the_endpoints() {
    #[derive(Encode, Decode, Debug, Default, PartialEq, Clone)]
    struct Counter {
        id: u64,
        offset: i64,
    }

    let a = as_json(&Counter { id: u64::MAX, offset: (1 << 53) + 1 });
    let b = as_json(&Counter { id: 3, offset: -((1 << 53) + 1) });
    assert_eq!(decode::<Counter>(&interpolate(&a, &b, 0.0).unwrap()).unwrap(), Counter { id: u64::MAX, offset: (1 << 53) + 1 });
    assert_eq!(decode::<Counter>(&interpolate(&a, &b, 1.0).unwrap()).unwrap(), Counter { id: 3, offset: -((1 << 53) + 1) });
    assert_eq!(add_gradient(&a, &b, 0.0).unwrap(), a);
}

#[test]
fn nan_fields_still_combine() {
    #[derive(Encode, Decode, Debug, Default, PartialEq, Clone)]
    struct Sample {
        x: f64,
        y: f32,
    }

    let a = as_json(&Sample { x: f64::NAN, y: 1.0 });
    let b = as_json(&Sample { x: 2.0, y: 3.0 });
    let mid: Sample = decode(&interpolate(&a, &b, 0.5).unwrap()).unwrap();
    assert!(mid.x.is_nan());
    assert_eq!(mid.y, 2.0);
    let end: Sample = decode(&interpolate(&a, &b, 1.0).unwrap()).unwrap();
    assert_eq!(end, Sample { x: 2.0, y: 3.0 });
}
