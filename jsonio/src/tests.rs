use crate::prelude::*;
use std::fmt::Debug;

// Create this namespace to hide the prelude. This is a check that the hygenics do not require any types from jsonio to be imported
mod hide_namespace {
    use jsonio_macros::{Decode, Encode};

    #[derive(Encode, Decode, PartialEq, Debug, Clone, Default)]
    pub struct Bits {
        pub int: u32,
        pub obj_array: Vec<Bobs>,
        pub extra: Option<Bobs>,
    }

    #[derive(Encode, Decode, PartialEq, Debug, Clone, Default)]
    pub struct Bobs {
        pub one: Vec<u32>,
    }
}
use hide_namespace::{Bits, Bobs};

fn make_item() -> Bits {
    Bits {
        int: 5,
        extra: Some(Bobs { one: vec![99] }),
        obj_array: vec![
            Bobs { one: vec![3, 2, 1, 0] },
            Bobs { one: vec![] },
            Bobs {
                one: vec![20, 20, 20, 20, 20, 20, 20],
            },
        ],
    }
}

fn round_trip<T: Encode + Decode + Default + Debug + PartialEq>(value: &T) {
    let encoded = as_json(value);
    match decode::<T>(&encoded) {
        Ok(parsed) => assert_eq!(value, &parsed),
        Err(e) => panic!("{} in {}", e, encoded),
    }
}

#[test]
fn round_trip_item() {
    let item = make_item();
    round_trip(&item);
    assert!(as_json(&item).as_str().starts_with(r#"{"__type":"Bits","int":5,"objArray":[{"__type":"Bobs","one":[3,2,1,0]}"#));
}

#[test]
fn round_trip_vec() {
    let item = make_item();
    let item = vec![item; 5];
    round_trip(&item);
}
