// Each option set is a trait with a default per option, a unit struct that takes every
// default, and an override trait. Overrides stack on top of any base set, so callers
// only spell out the options they care about.
macro_rules! options {
    ($Options:ident, $Default:ident, $Override:ident, $Hierarchy:ident, $override_fn:ident, {$($name:ident: $T:ty = $fallback:expr),*}) => {
        pub trait $Options: Send + Sync {
            $(
                #[inline(always)]
                fn $name(&self) -> $T { $fallback }
            )*
        }

        pub struct $Default;
        impl $Options for $Default { }

        pub trait $Override: Send + Sync {
            $(
                #[inline(always)]
                fn $name(&self) -> Option<$T> { None }
            )*
        }

        impl<T0: $Options, T1: $Override> $Options for $Hierarchy<T0, T1> {
            $(
                #[inline(always)]
                fn $name(&self) -> $T {
                    self.overrides.$name().unwrap_or_else(|| self.fallback.$name())
                }
            )*
        }

        struct $Hierarchy<T0, T1> {
            fallback: T0,
            overrides: T1,
        }

        pub fn $override_fn(options: impl $Options, overrides: impl $Override) -> impl $Options {
            $Hierarchy { fallback: options, overrides }
        }
    };
}

options!(EncodeOptions, EncodeOptionsDefault, EncodeOptionsOverride, EncodeOptionsHierarchy, override_encode_options, {
    blob_threshold: usize = 256
});

options!(DecodeOptions, DecodeOptionsDefault, DecodeOptionsOverride, DecodeOptionsHierarchy, override_decode_options, {
    no_type_check: bool = false
});

options!(CombineOptions, CombineOptionsDefault, CombineOptionsOverride, CombineOptionsHierarchy, override_combine_options, {
    parallel: bool = true
});

/// Numeric arrays of at least this many payload bytes go to the blob store.
pub struct BlobThreshold(pub usize);
impl EncodeOptionsOverride for BlobThreshold {
    #[inline(always)]
    fn blob_threshold(&self) -> Option<usize> {
        Some(self.0)
    }
}

/// Never off-load, even when a blob store is attached.
pub struct InlineBlobs;
impl EncodeOptionsOverride for InlineBlobs {
    #[inline(always)]
    fn blob_threshold(&self) -> Option<usize> {
        Some(usize::MAX)
    }
}

pub struct Lenient;
impl DecodeOptionsOverride for Lenient {
    #[inline(always)]
    fn no_type_check(&self) -> Option<bool> {
        Some(true)
    }
}

pub struct Strict;
impl DecodeOptionsOverride for Strict {
    #[inline(always)]
    fn no_type_check(&self) -> Option<bool> {
        Some(false)
    }
}

pub struct EnableParallel;
impl CombineOptionsOverride for EnableParallel {
    #[inline(always)]
    fn parallel(&self) -> Option<bool> {
        Some(true)
    }
}

pub struct DisableParallel;
impl CombineOptionsOverride for DisableParallel {
    #[inline(always)]
    fn parallel(&self) -> Option<bool> {
        Some(false)
    }
}

#[macro_export]
macro_rules! encode_options {
    ($($opts:expr),*) => {
        {
            let options = $crate::options::EncodeOptionsDefault;
            $(
                let options = $crate::options::override_encode_options(options, $opts);
            )*
            options
        }
    }
}

#[macro_export]
macro_rules! decode_options {
    ($($opts:expr),*) => {
        {
            let options = $crate::options::DecodeOptionsDefault;
            $(
                let options = $crate::options::override_decode_options(options, $opts);
            )*
            options
        }
    }
}

#[macro_export]
macro_rules! combine_options {
    ($($opts:expr),*) => {
        {
            let options = $crate::options::CombineOptionsDefault;
            $(
                let options = $crate::options::override_combine_options(options, $opts);
            )*
            options
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_overrides_win() {
        let options = crate::encode_options! { BlobThreshold(10), InlineBlobs };
        assert_eq!(options.blob_threshold(), usize::MAX);
        let options = crate::encode_options! {};
        assert_eq!(options.blob_threshold(), 256);
    }

    #[test]
    fn decode_defaults_to_strict() {
        assert!(!DecodeOptionsDefault.no_type_check());
        let options = crate::decode_options! { Lenient };
        assert!(options.no_type_check());
        let options = crate::decode_options! { Lenient, Strict };
        assert!(!options.no_type_check());
    }
}
