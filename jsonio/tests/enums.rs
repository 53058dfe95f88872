mod common;
use common::round_trip;
use jsonio::prelude::*;
use jsonio::DecodeError;

#[test]
fn unnamed_field_one_variant() {
    #[derive(Encode, Decode, Debug, PartialEq, Clone)]
    enum K {
        St(String),
    }

    impl Default for K {
        fn default() -> Self {
            K::St(String::new())
        }
    }

    round_trip(&K::St("s".to_owned()), r#"{"St":"s"}"#);
}

#[test]
fn selects_correct_discriminant() {
    #[derive(Encode, Decode, Debug, PartialEq, Clone)]
    enum Opts {
        One(u32),
        Two(u8),
    }

    impl Default for Opts {
        fn default() -> Self {
            Opts::One(0)
        }
    }

    round_trip(&Opts::One(1), r#"{"One":1}"#);
    round_trip(&Opts::Two(2), r#"{"Two":2}"#);
}

#[test]
fn void_value() {
    #[derive(Encode, Decode, Debug, PartialEq, Clone, Default)]
    enum HasVoid {
        #[default]
        One,
        Two,
    }

    round_trip(&HasVoid::One, r#""One""#);
    round_trip(&HasVoid::Two, r#""Two""#);
}

#[test]
fn mixed_void_and_single() {
    #[derive(Encode, Decode, Debug, PartialEq, Clone, Default)]
    enum Mixed {
        #[default]
        None,
        One(u32),
    }

    round_trip(&Mixed::None, r#""None""#);
    round_trip(&Mixed::One(10), r#"{"One":10}"#);
    round_trip(
        &vec![Mixed::None, Mixed::One(2), Mixed::One(2), Mixed::One(3), Mixed::None],
        r#"["None",{"One":2},{"One":2},{"One":3},"None"]"#,
    );
}

#[test]
fn switching_variants_in_place() {
    #[derive(Encode, Decode, Debug, PartialEq, Clone, Default)]
    enum Slot {
        #[default]
        Free,
        Held(Vec<u8>),
    }

    let mut slot = Slot::Held(vec![1]);
    from_str(r#"{"Held":[2,3]}"#, &mut slot).unwrap();
    assert_eq!(slot, Slot::Held(vec![2, 3]));
    from_str(r#""Free""#, &mut slot).unwrap();
    assert_eq!(slot, Slot::Free);
    from_str(r#"{"Held":[]}"#, &mut slot).unwrap();
    assert_eq!(slot, Slot::Held(vec![]));
}

#[test]
fn unknown_variants_mismatch() {
    #[derive(Encode, Decode, Debug, PartialEq, Clone, Default)]
    enum Mixed {
        #[default]
        Ex,
        One(u32),
    }

    let mut value = Mixed::Ex;
    assert_eq!(from_str(r#""Two""#, &mut value), Err(DecodeError::SchemaMismatch));
    assert_eq!(from_str(r#"{"Two":1}"#, &mut value), Err(DecodeError::SchemaMismatch));
    assert_eq!(from_str(r#"{"One":1,"Ex":2}"#, &mut value), Err(DecodeError::SchemaMismatch));
    assert_eq!(from_str(r#"{}"#, &mut value), Err(DecodeError::SchemaMismatch));
    assert_eq!(from_str("1", &mut value), Err(DecodeError::SchemaMismatch));
}
